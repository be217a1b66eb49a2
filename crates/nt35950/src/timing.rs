//! Settle windows from the panel power-on specification
//!
//! Each window is a `[min, max]` range in microseconds. The driver always
//! waits the lower bound; the upper bound documents the tolerance a slower
//! delay provider may use.

use embedded_hal::delay::DelayNs;

/// A settle window in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settle {
    /// Minimum wait
    pub min_us: u32,
    /// Maximum acceptable wait
    pub max_us: u32,
}

impl Settle {
    /// Window in microseconds.
    pub const fn us(min_us: u32, max_us: u32) -> Self {
        Self { min_us, max_us }
    }

    /// Window in milliseconds.
    pub const fn ms(min_ms: u32, max_ms: u32) -> Self {
        Self {
            min_us: min_ms.saturating_mul(1_000),
            max_us: max_ms.saturating_mul(1_000),
        }
    }

    /// Fixed wait in milliseconds.
    pub const fn fixed_ms(ms: u32) -> Self {
        Self::ms(ms, ms)
    }

    /// `true` if `us` lies within the window.
    pub const fn contains(self, us: u32) -> bool {
        self.min_us <= us && us <= self.max_us
    }

    /// Block for the lower bound of the window.
    pub fn wait<D: DelayNs>(self, delay: &mut D) {
        delay.delay_us(self.min_us);
    }
}

/// After VDDIO
pub const VDDIO: Settle = Settle::ms(2, 5);
/// After DVDD
pub const DVDD: Settle = Settle::ms(15, 18);
/// After AVDD + AVEE
pub const BIAS: Settle = Settle::ms(12, 13);
/// After TVDDIO + TAVDD
pub const TOUCH: Settle = Settle::ms(15, 16);

/// RESX high before and after the low pulse
pub const RESET_HIGH: Settle = Settle::ms(12, 13);
/// RESX low pulse width
pub const RESET_LOW: Settle = Settle::us(300, 400);

/// After exit_sleep_mode
pub const SLEEP_OUT: Settle = Settle::fixed_ms(120);
/// After set_display_on
pub const DISPLAY_ON: Settle = Settle::fixed_ms(120);
/// After set_display_off
pub const DISPLAY_OFF: Settle = Settle::ms(10, 11);
/// After enter_sleep_mode
pub const SLEEP_IN: Settle = Settle::fixed_ms(150);
