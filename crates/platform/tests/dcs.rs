//! DCS helper encoding tests, driven through the recording mock link.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use platform::mocks::{MockDsiLink, Recorder};
use platform::{DcsExt, DsiLink, LinkConfig, ModeFlags, PixelFormat, TearMode};

fn link() -> (MockDsiLink, Recorder) {
    let rec = Recorder::new();
    (MockDsiLink::new(0, &rec), rec)
}

#[test]
fn sleep_and_display_opcodes_are_single_byte() {
    let (mut dsi, rec) = link();
    dsi.exit_sleep_mode().unwrap();
    dsi.set_display_on().unwrap();
    dsi.set_display_off().unwrap();
    dsi.enter_sleep_mode().unwrap();
    assert_eq!(
        rec.writes_on(0),
        vec![vec![0x11], vec![0x29], vec![0x28], vec![0x10]]
    );
}

#[test]
fn tear_on_carries_mode_byte() {
    let (mut dsi, rec) = link();
    dsi.set_tear_on(TearMode::VBlank).unwrap();
    dsi.set_tear_on(TearMode::VHBlank).unwrap();
    assert_eq!(rec.writes_on(0), vec![vec![0x35, 0x00], vec![0x35, 0x01]]);
}

#[test]
fn tear_scanline_is_big_endian() {
    let (mut dsi, rec) = link();
    dsi.set_tear_scanline(0).unwrap();
    dsi.set_tear_scanline(0x0123).unwrap();
    assert_eq!(
        rec.writes_on(0),
        vec![vec![0x44, 0x00, 0x00], vec![0x44, 0x01, 0x23]]
    );
}

#[test]
fn dcs_error_propagates_unchanged() {
    let rec = Recorder::new();
    let mut dsi = MockDsiLink::new(0, &rec).fail_on(&[0x11]);
    assert!(dsi.exit_sleep_mode().is_err());
    assert!(rec.writes_on(0).is_empty());
}

#[test]
fn configure_seeds_mode_flags() {
    let (mut dsi, _rec) = link();
    let config = LinkConfig {
        lanes: 4,
        format: PixelFormat::Rgb888,
        mode_flags: ModeFlags::EOT_PACKET | ModeFlags::LPM,
    };
    dsi.configure(&config);
    assert!(dsi.mode_flags().contains(ModeFlags::LPM));
}
