//! Driver error type

use crate::power::Supply;

/// A resource the panel cannot work without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resource {
    /// RESX GPIO
    ResetGpio,
    /// Second DSI endpoint of a dual-link panel
    SecondaryLink,
}

/// NT35950 driver errors.
///
/// `LE` is the DSI link error type, `RE` the regulator error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<LE, RE> {
    /// A command write failed.
    Transport(LE),
    /// Attaching an endpoint to its DSI host failed.
    Attach(LE),
    /// A regulator lookup or enable failed.
    Regulator(RE),
    /// A required resource is not described for this board.
    ResourceUnavailable(Resource),
    /// A dependency has not registered yet; retry construction later.
    NotReady,
    /// A regulator cannot produce the rail's voltage window.
    VoltageUnsupported(Supply),
}

impl<LE, RE> Error<LE, RE> {
    /// `true` if construction should be retried later.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NotReady)
    }
}

impl<LE: core::fmt::Display, RE: core::fmt::Display> core::fmt::Display for Error<LE, RE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "DSI write failed: {e}"),
            Self::Attach(e) => write!(f, "DSI attach failed: {e}"),
            Self::Regulator(e) => write!(f, "Regulator error: {e}"),
            Self::ResourceUnavailable(Resource::ResetGpio) => {
                write!(f, "Reset GPIO unavailable")
            }
            Self::ResourceUnavailable(Resource::SecondaryLink) => {
                write!(f, "Secondary DSI endpoint unavailable")
            }
            Self::NotReady => write!(f, "Secondary DSI host not ready"),
            Self::VoltageUnsupported(s) => write!(f, "Supply {s} voltage window unsupported"),
        }
    }
}

#[cfg(feature = "std")]
impl<LE, RE> std::error::Error for Error<LE, RE>
where
    LE: core::fmt::Debug + core::fmt::Display,
    RE: core::fmt::Debug + core::fmt::Display,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    type E = Error<&'static str, &'static str>;

    #[test]
    fn display_names_the_failure() {
        assert_eq!(E::Transport("nak").to_string(), "DSI write failed: nak");
        assert_eq!(
            E::VoltageUnsupported(Supply::Avee).to_string(),
            "Supply avee voltage window unsupported"
        );
        assert_eq!(
            E::ResourceUnavailable(Resource::SecondaryLink).to_string(),
            "Secondary DSI endpoint unavailable"
        );
    }

    #[test]
    fn only_not_ready_is_retryable() {
        assert!(E::NotReady.is_retryable());
        assert!(!E::ResourceUnavailable(Resource::ResetGpio).is_retryable());
    }
}
