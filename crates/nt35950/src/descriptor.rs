//! Panels built on the NT35950
//!
//! A [`PanelDescriptor`] carries everything that varies between panels using
//! this DriverIC: link topology, lane count, output mode and the fixed mode
//! list. Descriptors are `'static` and never change after probe.

use platform::{DisplayMode, DsiDeviceInfo, LinkConfig, ModeFlags, ModeType, PixelFormat};

/// Static description of one NT35950 panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelDescriptor {
    /// Panel model name
    pub model_name: &'static str,
    /// Identity used when registering the secondary DSI device
    pub dsi_info: DsiDeviceInfo,
    /// Supported modes, preferred first
    pub modes: &'static [DisplayMode],
    /// DSI data lanes per link
    pub lanes: u8,
    /// Enable the DriverIC frame SRAM
    pub enable_sram: bool,
    /// Video mode instead of command mode
    pub is_video_mode: bool,
    /// Panel is driven through two DSI links
    pub is_dual_dsi: bool,
}

impl PanelDescriptor {
    /// Look a panel up by its device-tree compatible string.
    pub fn from_compatible(compatible: &str) -> Option<&'static Self> {
        OF_MATCH
            .iter()
            .find(|(c, _)| *c == compatible)
            .map(|(_, desc)| *desc)
    }

    /// Mode flags every endpoint is configured with.
    pub fn mode_flags(&self) -> ModeFlags {
        let mut flags = ModeFlags::EOT_PACKET | ModeFlags::CLOCK_NON_CONTINUOUS | ModeFlags::LPM;
        if self.is_video_mode {
            flags |= ModeFlags::VIDEO;
        }
        flags
    }

    /// Link configuration shared by every endpoint.
    pub fn link_config(&self) -> LinkConfig {
        LinkConfig {
            lanes: self.lanes,
            format: PixelFormat::Rgb888,
            mode_flags: self.mode_flags(),
        }
    }

    /// Number of DSI endpoints.
    pub const fn link_count(&self) -> usize {
        if self.is_dual_dsi {
            2
        } else {
            1
        }
    }
}

// TODO: add the 2160x3840 mode once FBC/DSC compression is wired up.
/// Sharp LS055D1SX04 native mode.
pub const SHARP_LS055D1SX04_MODE: DisplayMode = DisplayMode {
    name: "1080x1920",
    clock_khz: sharp_clock_khz(),
    hdisplay: 1080,
    hsync_start: 1480, // + 400 front porch
    hsync_end: 1520,   // + 40 sync
    htotal: 1820,      // + 300 back porch
    vdisplay: 1920,
    vsync_start: 1932, // + 12 front porch
    vsync_end: 1934,   // + 2 sync
    vtotal: 1944,      // + 10 back porch
    width_mm: 68,
    height_mm: 121,
    mode_type: ModeType::DRIVER.union(ModeType::PREFERRED),
};

#[allow(clippy::arithmetic_side_effects)]
const fn sharp_clock_khz() -> u32 {
    (1080 + 400 + 40 + 300) * (1920 + 12 + 2 + 10) * 60 / 1000
}

/// Sharp LS055D1SX04, 5.5" 1080x1920 dual-DSI.
pub const SHARP_LS055D1SX04: PanelDescriptor = PanelDescriptor {
    model_name: "Sharp LS055D1SX04",
    dsi_info: DsiDeviceInfo {
        type_name: "LS055D1SX04",
        channel: 0,
    },
    modes: &[SHARP_LS055D1SX04_MODE],
    lanes: 4,
    enable_sram: true,
    is_video_mode: false,
    is_dual_dsi: true,
};

/// Compatible-string match table.
pub const OF_MATCH: &[(&str, &PanelDescriptor)] = &[("sharp,ls055d1sx04", &SHARP_LS055D1SX04)];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn compatible_lookup() {
        let desc = PanelDescriptor::from_compatible("sharp,ls055d1sx04").unwrap();
        assert_eq!(desc.dsi_info.type_name, "LS055D1SX04");
        assert!(PanelDescriptor::from_compatible("sharp,ls060t1sx01").is_none());
    }

    #[test]
    fn sharp_mode_timings() {
        let m = SHARP_LS055D1SX04_MODE;
        assert_eq!(m.clock_khz, 212_284);
        assert_eq!((m.hsync_start, m.hsync_end, m.htotal), (1480, 1520, 1820));
        assert_eq!((m.vsync_start, m.vsync_end, m.vtotal), (1932, 1934, 1944));
        assert!(m.is_well_formed());
        assert_eq!(m.refresh_hz(), Some(60));
        assert!(m.mode_type.contains(ModeType::PREFERRED));
    }

    #[test]
    fn command_mode_link_config() {
        let cfg = SHARP_LS055D1SX04.link_config();
        assert_eq!(cfg.lanes, 4);
        assert_eq!(cfg.format, PixelFormat::Rgb888);
        assert_eq!(
            cfg.mode_flags,
            ModeFlags::EOT_PACKET | ModeFlags::CLOCK_NON_CONTINUOUS | ModeFlags::LPM
        );
        assert_eq!(SHARP_LS055D1SX04.link_count(), 2);
    }

    #[test]
    fn video_mode_adds_video_flag() {
        let desc = PanelDescriptor {
            is_video_mode: true,
            ..SHARP_LS055D1SX04
        };
        assert!(desc.mode_flags().contains(ModeFlags::VIDEO));
    }
}
