//! Display timing descriptors

use core::ops::BitOr;

/// Mode type flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeType(u8);

impl ModeType {
    /// Mode supplied by the driver rather than EDID or the user.
    pub const DRIVER: Self = Self(1 << 0);
    /// The panel's native mode.
    pub const PREFERRED: Self = Self(1 << 1);

    /// Raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` when every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bitwise union, usable in constants.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for ModeType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// One fixed display mode.
///
/// Horizontal and vertical values are absolute positions within the line or
/// frame, as in a DRM modeline: `active <= sync_start <= sync_end <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayMode {
    /// Human-readable name, e.g. `"1080x1920"`.
    pub name: &'static str,
    /// Pixel clock in kHz.
    pub clock_khz: u32,
    /// Active pixels per line.
    pub hdisplay: u16,
    /// Start of horizontal sync.
    pub hsync_start: u16,
    /// End of horizontal sync.
    pub hsync_end: u16,
    /// Total pixels per line.
    pub htotal: u16,
    /// Active lines per frame.
    pub vdisplay: u16,
    /// Start of vertical sync.
    pub vsync_start: u16,
    /// End of vertical sync.
    pub vsync_end: u16,
    /// Total lines per frame.
    pub vtotal: u16,
    /// Physical width in millimetres.
    pub width_mm: u16,
    /// Physical height in millimetres.
    pub height_mm: u16,
    /// Mode type flags.
    pub mode_type: ModeType,
}

impl DisplayMode {
    /// Refresh rate in Hz, rounded to nearest. `None` for a degenerate mode.
    pub fn refresh_hz(&self) -> Option<u32> {
        let frame = u64::from(self.htotal).checked_mul(u64::from(self.vtotal))?;
        if frame == 0 {
            return None;
        }
        let pixels_per_sec = u64::from(self.clock_khz).checked_mul(1000)?;
        let rounded = pixels_per_sec.checked_add(frame / 2)?.checked_div(frame)?;
        u32::try_from(rounded).ok()
    }

    /// `true` when every timing field is ordered `active <= start <= end <= total`.
    pub const fn is_well_formed(&self) -> bool {
        self.hdisplay <= self.hsync_start
            && self.hsync_start <= self.hsync_end
            && self.hsync_end <= self.htotal
            && self.vdisplay <= self.vsync_start
            && self.vsync_start <= self.vsync_end
            && self.vsync_end <= self.vtotal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODE: DisplayMode = DisplayMode {
        name: "test",
        clock_khz: 148_500,
        hdisplay: 1920,
        hsync_start: 2008,
        hsync_end: 2052,
        htotal: 2200,
        vdisplay: 1080,
        vsync_start: 1084,
        vsync_end: 1089,
        vtotal: 1125,
        width_mm: 0,
        height_mm: 0,
        mode_type: ModeType::DRIVER,
    };

    #[test]
    fn refresh_rounds_to_nearest() {
        assert_eq!(MODE.refresh_hz(), Some(60));
    }

    #[test]
    fn zero_total_has_no_refresh() {
        let mode = DisplayMode { htotal: 0, ..MODE };
        assert_eq!(mode.refresh_hz(), None);
    }

    #[test]
    fn well_formed_checks_ordering() {
        assert!(MODE.is_well_formed());
        let bad = DisplayMode { hsync_start: 1000, ..MODE };
        assert!(!bad.is_well_formed());
    }

    #[test]
    fn mode_type_combines() {
        let t = ModeType::DRIVER | ModeType::PREFERRED;
        assert!(t.contains(ModeType::PREFERRED));
        assert_eq!(t.bits(), 0b11);
    }
}
