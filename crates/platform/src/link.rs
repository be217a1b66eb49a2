//! Secondary DSI endpoint discovery for dual-link panels

use core::marker::PhantomData;

use crate::dsi::{DsiDeviceInfo, DsiLink};

/// Why a secondary link could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkLookupError {
    /// The board description has no second endpoint. Permanent.
    NotPresent,
    /// The second DSI host exists but has not registered yet. Retry later.
    NotReady,
}

impl core::fmt::Display for LinkLookupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotPresent => write!(f, "Secondary DSI endpoint not described"),
            Self::NotReady => write!(f, "Secondary DSI host not ready"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinkLookupError {}

/// Resolves and registers the second DSI endpoint of a dual-link panel.
pub trait RemoteLinkResolver {
    /// Link type produced; must match the primary link type.
    type Link: DsiLink;

    /// Find the remote DSI host and register a device described by `info` on it.
    fn find_secondary(&mut self, info: &DsiDeviceInfo) -> Result<Self::Link, LinkLookupError>;
}

/// Resolver for boards with a single DSI host.
pub struct NoRemoteLink<L>(PhantomData<L>);

impl<L> NoRemoteLink<L> {
    /// Create the resolver.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<L> Default for NoRemoteLink<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DsiLink> RemoteLinkResolver for NoRemoteLink<L> {
    type Link = L;

    fn find_secondary(&mut self, _info: &DsiDeviceInfo) -> Result<L, LinkLookupError> {
        Err(LinkLookupError::NotPresent)
    }
}
