//! NT35950 manufacturer command set (MCS) register map
//!
//! Only the registers the power-on script touches are listed. Several of them
//! are not described in any public NT35950 documentation; those are marked
//! **vendor-undocumented** and their values are reproduced verbatim from the
//! panel vendor's bring-up sequence.
//!
//! # CMD2 pages
//!
//! Manufacturer registers are banked into CMD2 pages 0..=7. A page is
//! selected by writing `MAUCCTR` followed by the unlock key and the page
//! number:
//!
//! ```text
//! F0 55 AA 52 08 <page>
//! ```
//!
//! There is no way to read back the active page, so every register group is
//! preceded by an explicit page select.

// ---------------------------------------------------------------------------
// Page selection
// ---------------------------------------------------------------------------

/// Manufacturer command enable / CMD2 page select
pub const MCS_CMD_MAUCCTR: u8 = 0xF0;

/// Unlock key that follows `MAUCCTR`
pub const MAUCCTR_KEY: [u8; 4] = [0x55, 0xAA, 0x52, 0x08];

/// Highest selectable CMD2 page
pub const CMD2_PAGE_MAX: u8 = 7;

// ---------------------------------------------------------------------------
// CMD2 page 7
// ---------------------------------------------------------------------------

/// SubPixel Rendering enable
pub const MCS_PARAM_SPR_EN: u8 = 0xE3;

/// SubPixel Rendering mode
pub const MCS_PARAM_SPR_MODE: u8 = 0xEF;

/// `SPR_MODE` value: YYG Rainbow-RGB
pub const SPR_MODE_YYG_RAINBOW: u8 = 0x01;

// ---------------------------------------------------------------------------
// CMD2 page 0
// ---------------------------------------------------------------------------

/// **Vendor-undocumented.** Written as `C9 01` right after selecting page 0.
pub const MCS_PARAM_UNKNOWN_C9: u8 = 0xC9;

/// Scaler (resolution upscaling) function
pub const MCS_PARAM_SCALER_FUNCTION: u8 = 0x58;

/// Data compression mode, see [`Compression`]
pub const MCS_PARAM_DATA_COMPRESSION: u8 = 0x90;

/// Display output control
pub const MCS_PARAM_DISP_OUTPUT_CTRL: u8 = 0xB4;

/// `DISP_OUTPUT_CTRL` bit 0: frame SRAM enable
pub const MCS_DISP_OUT_SRAM_EN: u8 = 1 << 0;

/// `DISP_OUTPUT_CTRL` bit 4: video mode
pub const MCS_DISP_OUT_VIDEO_MODE: u8 = 1 << 4;

/// Frame-rate table. The 60 Hz parameter block is **vendor-undocumented**.
pub const MCS_PARAM_FRAME_RATE: u8 = 0xBD;

// ---------------------------------------------------------------------------
// CMD2 page 1
// ---------------------------------------------------------------------------

/// **Vendor-undocumented.** Written as `D4 88 88` on page 1.
pub const MCS_PARAM_UNKNOWN_D4: u8 = 0xD4;

// ---------------------------------------------------------------------------
// CMD3 (test command set)
// ---------------------------------------------------------------------------

/// Test-command unlock prefix; the trailing byte enables (`0x80`) or
/// disables (`0x00`) the test command set.
pub const CMD3_TEST_KEY: [u8; 4] = [0xFF, 0xAA, 0x55, 0xA5];

/// Test command set enable
pub const CMD3_TEST_ENABLE: u8 = 0x80;

/// Test command set disable
pub const CMD3_TEST_DISABLE: u8 = 0x00;

/// **Vendor-undocumented.** First black-image command (`6F 01`).
pub const CMD3_BLACK_IMAGE_0: [u8; 2] = [0x6F, 0x01];

/// **Vendor-undocumented.** Second black-image command (`F3 10`).
pub const CMD3_BLACK_IMAGE_1: [u8; 2] = [0xF3, 0x10];

/// Data compression modes for `MCS_PARAM_DATA_COMPRESSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Compression {
    /// Uncompressed pixel stream
    None = 0x00,
    /// Frame buffer compression
    Fbc = 0x02,
    /// VESA display stream compression
    Dsc = 0x03,
}

impl Compression {
    /// Register value.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// `DISP_OUTPUT_CTRL` value for the given descriptor flags.
pub const fn dispout_bits(sram: bool, video_mode: bool) -> u8 {
    let mut bits = 0x00;
    if video_mode {
        bits |= MCS_DISP_OUT_VIDEO_MODE;
    }
    if sram {
        bits |= MCS_DISP_OUT_SRAM_EN;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispout_combines_flags() {
        assert_eq!(dispout_bits(false, false), 0x00);
        assert_eq!(dispout_bits(true, false), 0x01);
        assert_eq!(dispout_bits(false, true), 0x10);
        assert_eq!(dispout_bits(true, true), 0x11);
    }

    #[test]
    fn compression_register_values() {
        assert_eq!(Compression::None.bits(), 0x00);
        assert_eq!(Compression::Fbc.bits(), 0x02);
        assert_eq!(Compression::Dsc.bits(), 0x03);
    }
}
