//! MIPI DSI command-link abstraction
//!
//! A [`DsiLink`] is one DSI peripheral endpoint as seen from the panel driver:
//! it can be configured (lanes, pixel format, mode flags), attached to and
//! detached from the host, and it accepts raw buffer writes. The DCS helpers
//! in [`DcsExt`] are layered on top of [`DsiLink::write_buffer`] so every
//! transport gets them for free.

use core::ops::{BitOr, BitOrAssign};

/// DSI link mode flags.
///
/// Bit positions follow the MIPI DSI host conventions so that a hardware
/// implementation can pass [`ModeFlags::bits`] straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeFlags(u32);

impl ModeFlags {
    /// No flags set.
    pub const EMPTY: Self = Self(0);
    /// Video mode (continuous pixel stream) instead of command mode.
    pub const VIDEO: Self = Self(1 << 0);
    /// Send an EoT packet at the end of each HS transmission.
    pub const EOT_PACKET: Self = Self(1 << 9);
    /// Allow the HS clock lane to stop between transmissions.
    pub const CLOCK_NON_CONTINUOUS: Self = Self(1 << 10);
    /// Transmit commands in low-power mode.
    pub const LPM: Self = Self(1 << 11);

    /// Build a flag word from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// `true` when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bitwise union.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `self` with every bit of `other` cleared.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the bits of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for ModeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for ModeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

/// Pixel format carried on the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 24 bits per pixel, 8-8-8.
    Rgb888,
    /// 18 bits per pixel, loosely packed into 24.
    Rgb666,
    /// 18 bits per pixel, tightly packed.
    Rgb666Packed,
    /// 16 bits per pixel, 5-6-5.
    Rgb565,
}

impl PixelFormat {
    /// Bits per pixel on the wire.
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Rgb888 | Self::Rgb666 => 24,
            Self::Rgb666Packed => 18,
            Self::Rgb565 => 16,
        }
    }
}

/// Link parameters applied before attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Number of data lanes (1..=4).
    pub lanes: u8,
    /// Pixel format.
    pub format: PixelFormat,
    /// Initial mode flags.
    pub mode_flags: ModeFlags,
}

/// Identity used when registering a secondary DSI device on a remote host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DsiDeviceInfo {
    /// Device type name, e.g. the panel model.
    pub type_name: &'static str,
    /// DSI virtual channel.
    pub channel: u8,
}

/// One DSI peripheral endpoint.
pub trait DsiLink {
    /// Transport error type
    type Error: core::fmt::Debug;

    /// Write `buf` as one DSI packet. Returns the number of bytes sent.
    fn write_buffer(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;

    /// Current mode flags.
    fn mode_flags(&self) -> ModeFlags;

    /// Replace the mode flags. Takes effect for the next transmission.
    fn set_mode_flags(&mut self, flags: ModeFlags);

    /// Apply lanes, format and flags. Must be called before [`attach`](Self::attach).
    fn configure(&mut self, config: &LinkConfig);

    /// Attach the endpoint to its DSI host.
    fn attach(&mut self) -> Result<(), Self::Error>;

    /// Detach the endpoint from its DSI host.
    fn detach(&mut self) -> Result<(), Self::Error>;
}

/// MIPI DCS opcodes used by panel drivers.
pub mod dcs {
    /// enter_sleep_mode
    pub const ENTER_SLEEP_MODE: u8 = 0x10;
    /// exit_sleep_mode
    pub const EXIT_SLEEP_MODE: u8 = 0x11;
    /// set_display_off
    pub const SET_DISPLAY_OFF: u8 = 0x28;
    /// set_display_on
    pub const SET_DISPLAY_ON: u8 = 0x29;
    /// set_tear_off
    pub const SET_TEAR_OFF: u8 = 0x34;
    /// set_tear_on
    pub const SET_TEAR_ON: u8 = 0x35;
    /// set_tear_scanline
    pub const SET_TEAR_SCANLINE: u8 = 0x44;
}

/// Tearing-effect output mode for `set_tear_on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TearMode {
    /// TE signals V-blanking only.
    VBlank = 0x00,
    /// TE signals both V-blanking and H-blanking.
    VHBlank = 0x01,
}

/// Standard DCS commands, available on every [`DsiLink`].
pub trait DcsExt: DsiLink {
    /// DCS enter_sleep_mode.
    fn enter_sleep_mode(&mut self) -> Result<(), Self::Error> {
        self.write_buffer(&[dcs::ENTER_SLEEP_MODE]).map(drop)
    }

    /// DCS exit_sleep_mode.
    fn exit_sleep_mode(&mut self) -> Result<(), Self::Error> {
        self.write_buffer(&[dcs::EXIT_SLEEP_MODE]).map(drop)
    }

    /// DCS set_display_on.
    fn set_display_on(&mut self) -> Result<(), Self::Error> {
        self.write_buffer(&[dcs::SET_DISPLAY_ON]).map(drop)
    }

    /// DCS set_display_off.
    fn set_display_off(&mut self) -> Result<(), Self::Error> {
        self.write_buffer(&[dcs::SET_DISPLAY_OFF]).map(drop)
    }

    /// DCS set_tear_on with the given TE mode.
    fn set_tear_on(&mut self, mode: TearMode) -> Result<(), Self::Error> {
        self.write_buffer(&[dcs::SET_TEAR_ON, mode as u8]).map(drop)
    }

    /// DCS set_tear_scanline, scanline sent big-endian.
    fn set_tear_scanline(&mut self, scanline: u16) -> Result<(), Self::Error> {
        let [hi, lo] = scanline.to_be_bytes();
        self.write_buffer(&[dcs::SET_TEAR_SCANLINE, hi, lo]).map(drop)
    }
}

impl<T: DsiLink + ?Sized> DcsExt for T {}
