//! Hardware abstraction layer for MIPI DSI panel drivers
//!
//! This crate provides the narrow trait seams a panel driver talks through,
//! so drivers can be developed and tested without a display host.
//!
//! # Architecture Layers
//!
//! ```text
//! Panel driver (nt35950 crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! SoC DSI host / PMIC / GPIO drivers
//! ```
//!
//! # Abstractions
//!
//! - [`DsiLink`] - one DSI endpoint: configure, attach, raw writes
//! - [`DcsExt`] - standard DCS commands on any [`DsiLink`]
//! - [`Regulator`] / [`SupplyProvider`] - supply rails by label
//! - [`RemoteLinkResolver`] - second endpoint of a dual-link panel
//! - [`DisplayMode`] - fixed timing descriptors
//!
//! Reset lines and delays use `embedded-hal` 1.0 directly
//! (`OutputPin`, `DelayNs`).
//!
//! # Features
//!
//! - `std`: `std::error::Error` impls and the [`mocks`] module
//! - `defmt`: `defmt::Format` derives on all public types

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // DCS opcode names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod dsi;
pub mod link;
pub mod mocks;
pub mod mode;
pub mod regulator;

pub use dsi::{dcs, DcsExt, DsiDeviceInfo, DsiLink, LinkConfig, ModeFlags, PixelFormat, TearMode};
pub use link::{LinkLookupError, NoRemoteLink, RemoteLinkResolver};
pub use mode::{DisplayMode, ModeType};
pub use regulator::{Regulator, SupplyProvider};
