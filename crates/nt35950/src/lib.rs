//! Novatek NT35950 DriverIC panel driver
//!
//! Brings an NT35950-based panel from cold to displaying and back:
//!
//! 1. six supply rails enabled in a fixed order with settle windows,
//! 2. a RESX pulse,
//! 3. a page-banked manufacturer command script over MIPI DSI,
//! 4. on teardown, display off, sleep in, reset asserted, rails off.
//!
//! Dual-link panels are addressed as two DSI endpoints. Commands go to the
//! primary endpoint only; the secondary mirrors configuration and the
//! low-power transmission flag.
//!
//! # Architecture
//!
//! ```text
//! Nt35950 (panel)        lifecycle state machine, probe / remove
//!   ├── PowerSequencer   rails, voltage validation, enable order
//!   ├── ResetLine        RESX pulse
//!   ├── script           run_on / run_off step tables
//!   │     ├── page       CMD2 page select
//!   │     └── encoder    fixed-length command writes
//!   └── LinkFanout       primary + optional secondary endpoint
//! ```
//!
//! Hardware access goes through the traits in the `platform` crate plus
//! `embedded-hal` 1.0 `OutputPin` and `DelayNs`.
//!
//! # Features
//!
//! - `std`: `std::error::Error` for [`Error`]
//! - `defmt`: log through `defmt` and derive `defmt::Format` (embedded)
//! - `tracing`: log through `tracing` (host)
//!
//! # Example
//!
//! ```no_run
//! use nt35950::{Nt35950, PanelConfig, PanelDescriptor};
//! use platform::mocks::{MockDelay, MockDsiLink, MockResetPin, MockResolver, MockSupplies, Recorder};
//!
//! let rec = Recorder::new();
//! let desc = PanelDescriptor::from_compatible("sharp,ls055d1sx04").unwrap();
//! let mut panel = Nt35950::probe(
//!     desc,
//!     &PanelConfig::default(),
//!     MockDsiLink::new(0, &rec),
//!     &mut MockSupplies::new(&rec),
//!     Some(MockResetPin::new(&rec)),
//!     &mut MockResolver::with_link(MockDsiLink::new(1, &rec)),
//!     MockDelay::new(&rec),
//! )
//! .unwrap();
//! panel.prepare().unwrap();
//! panel.unprepare();
//! ```

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
#![allow(clippy::doc_markdown)] // register and DCS names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
mod fmt;

pub mod config;
pub mod descriptor;
pub mod encoder;
pub mod error;
pub mod link;
pub mod page;
pub mod panel;
pub mod power;
pub mod registers;
pub mod reset;
pub mod script;
pub mod timing;

pub use config::{PanelConfig, VoltagePolicy};
pub use descriptor::{PanelDescriptor, OF_MATCH, SHARP_LS055D1SX04};
pub use encoder::{CommandSeq, MAX_COMMAND_LEN};
pub use error::{Error, Resource};
pub use page::Page;
pub use panel::{LifecycleState, Nt35950, PanelError};
pub use power::{PowerSequencer, Supply};
pub use registers::Compression;
