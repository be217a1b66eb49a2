//! Power-on and power-off command scripts
//!
//! The on-script is a fixed table of [`OnStep`]s. Each step is fatal: the
//! first transport error aborts the script and is returned as-is. The
//! off-script is best effort and keeps going after a failure so the panel
//! always ends in sleep with low-power transmission selected.
//!
//! ```text
//! LPM on ─ P7: E3 01, EF 01 ─ P0: C9 01 ─ 90 00 ─ 58 01 ─ B4 xx ─ BD ...
//!        ─ 35 00, 44 00 00 ─ P1: D4 88 88 ─ CMD3 black image
//!        ─ 11 (120 ms) ─ 29 (120 ms) ─ LPM off
//! ```

use embedded_hal::delay::DelayNs;
use platform::{DcsExt, DsiLink, TearMode};

use crate::descriptor::PanelDescriptor;
use crate::encoder::{send, CommandSeq};
use crate::link::LinkFanout;
use crate::page::{select_page, Page};
use crate::registers::{
    dispout_bits, Compression, CMD3_BLACK_IMAGE_0, CMD3_BLACK_IMAGE_1, CMD3_TEST_DISABLE,
    CMD3_TEST_ENABLE, CMD3_TEST_KEY, MCS_PARAM_DATA_COMPRESSION, MCS_PARAM_DISP_OUTPUT_CTRL,
    MCS_PARAM_FRAME_RATE, MCS_PARAM_SCALER_FUNCTION, MCS_PARAM_SPR_EN, MCS_PARAM_SPR_MODE,
    MCS_PARAM_UNKNOWN_C9, MCS_PARAM_UNKNOWN_D4, SPR_MODE_YYG_RAINBOW,
};
use crate::timing;

const SPR_ENABLE: CommandSeq<2> = CommandSeq::new([MCS_PARAM_SPR_EN, 0x01]);
const SPR_MODE: CommandSeq<2> = CommandSeq::new([MCS_PARAM_SPR_MODE, SPR_MODE_YYG_RAINBOW]);
const UNKNOWN_C9: CommandSeq<2> = CommandSeq::new([MCS_PARAM_UNKNOWN_C9, 0x01]);
const COMPRESSION_NONE: CommandSeq<2> =
    CommandSeq::new([MCS_PARAM_DATA_COMPRESSION, Compression::None.bits()]);
const SCALER_ON: CommandSeq<2> = CommandSeq::new([MCS_PARAM_SCALER_FUNCTION, 0x01]);
#[rustfmt::skip]
const FRAME_RATE_60HZ: CommandSeq<16> = CommandSeq::new([
    MCS_PARAM_FRAME_RATE,
    0x00, 0xAC, 0x0C, 0x0C, 0x00,
    0x01, 0x56, 0x09, 0x09, 0x01,
    0x01, 0x0C, 0x0C, 0x00, 0xD9,
]);
const UNKNOWN_D4: CommandSeq<3> = CommandSeq::new([MCS_PARAM_UNKNOWN_D4, 0x88, 0x88]);
const TEST_CMD_ENABLE: CommandSeq<5> = test_command(CMD3_TEST_ENABLE);
const TEST_CMD_DISABLE: CommandSeq<5> = test_command(CMD3_TEST_DISABLE);
const BLACK_IMAGE_0: CommandSeq<2> = CommandSeq::new(CMD3_BLACK_IMAGE_0);
const BLACK_IMAGE_1: CommandSeq<2> = CommandSeq::new(CMD3_BLACK_IMAGE_1);

const fn test_command(state: u8) -> CommandSeq<5> {
    let [k0, k1, k2, k3] = CMD3_TEST_KEY;
    CommandSeq::new([k0, k1, k2, k3, state])
}

/// `DISP_OUTPUT_CTRL` command for a panel.
pub const fn dispout_command(desc: &PanelDescriptor) -> CommandSeq<2> {
    CommandSeq::new([
        MCS_PARAM_DISP_OUTPUT_CTRL,
        dispout_bits(desc.enable_sram, desc.is_video_mode),
    ])
}

/// Steps of the power-on script, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OnStep {
    /// Select low-power transmission on every endpoint.
    EnterLowPower,
    /// Page 7: enable subpixel rendering, YYG rainbow mode.
    SubpixelRendering,
    /// Page 0: vendor-undocumented `C9 01`.
    UnknownC9,
    /// No data compression.
    Compression,
    /// Enable the scaler.
    Scaler,
    /// Display output control from the descriptor's SRAM/video flags.
    DisplayOutput,
    /// 60 Hz frame-rate table.
    FrameRate,
    /// Tearing effect on V-blank, scanline 0.
    Tearing,
    /// Page 1: vendor-undocumented `D4 88 88`.
    Page1Tuning,
    /// CMD3 black image injection.
    BlackImage,
    /// exit_sleep_mode, then wait.
    ExitSleep,
    /// set_display_on, then wait.
    DisplayOn,
    /// Return every endpoint to high-speed transmission.
    ExitLowPower,
}

impl OnStep {
    /// Every step, in order.
    pub const ALL: [Self; 13] = [
        Self::EnterLowPower,
        Self::SubpixelRendering,
        Self::UnknownC9,
        Self::Compression,
        Self::Scaler,
        Self::DisplayOutput,
        Self::FrameRate,
        Self::Tearing,
        Self::Page1Tuning,
        Self::BlackImage,
        Self::ExitSleep,
        Self::DisplayOn,
        Self::ExitLowPower,
    ];

    /// Log label.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EnterLowPower => "enter lpm",
            Self::SubpixelRendering => "spr",
            Self::UnknownC9 => "page0 c9",
            Self::Compression => "compression",
            Self::Scaler => "scaler",
            Self::DisplayOutput => "dispout",
            Self::FrameRate => "frame rate",
            Self::Tearing => "tearing",
            Self::Page1Tuning => "page1 d4",
            Self::BlackImage => "black image",
            Self::ExitSleep => "exit sleep",
            Self::DisplayOn => "display on",
            Self::ExitLowPower => "exit lpm",
        }
    }

    fn run<L, D>(
        self,
        links: &mut LinkFanout<L>,
        desc: &PanelDescriptor,
        delay: &mut D,
    ) -> Result<(), L::Error>
    where
        L: DsiLink,
        D: DelayNs,
    {
        match self {
            Self::EnterLowPower => links.set_low_power(true),
            Self::SubpixelRendering => {
                let dsi = links.primary();
                select_page(dsi, Page::P7)?;
                send(dsi, &SPR_ENABLE)?;
                send(dsi, &SPR_MODE)?;
            }
            Self::UnknownC9 => {
                let dsi = links.primary();
                select_page(dsi, Page::P0)?;
                send(dsi, &UNKNOWN_C9)?;
            }
            Self::Compression => {
                send(links.primary(), &COMPRESSION_NONE)?;
            }
            Self::Scaler => {
                send(links.primary(), &SCALER_ON)?;
            }
            Self::DisplayOutput => {
                send(links.primary(), &dispout_command(desc))?;
            }
            Self::FrameRate => {
                send(links.primary(), &FRAME_RATE_60HZ)?;
            }
            Self::Tearing => {
                let dsi = links.primary();
                dsi.set_tear_on(TearMode::VBlank).map_err(|e| {
                    error!("Failed to set tear on");
                    e
                })?;
                dsi.set_tear_scanline(0).map_err(|e| {
                    error!("Failed to set tear scanline");
                    e
                })?;
            }
            Self::Page1Tuning => {
                let dsi = links.primary();
                select_page(dsi, Page::P1)?;
                send(dsi, &UNKNOWN_D4)?;
            }
            Self::BlackImage => {
                let dsi = links.primary();
                send(dsi, &TEST_CMD_ENABLE)?;
                send(dsi, &BLACK_IMAGE_0)?;
                send(dsi, &BLACK_IMAGE_1)?;
                send(dsi, &TEST_CMD_DISABLE)?;
            }
            Self::ExitSleep => {
                links.primary().exit_sleep_mode()?;
                timing::SLEEP_OUT.wait(delay);
            }
            Self::DisplayOn => {
                links.primary().set_display_on()?;
                timing::DISPLAY_ON.wait(delay);
            }
            Self::ExitLowPower => links.set_low_power(false),
        }
        Ok(())
    }
}

/// Run the power-on script. The first failing step aborts the rest.
pub fn run_on<L, D>(
    links: &mut LinkFanout<L>,
    desc: &PanelDescriptor,
    delay: &mut D,
) -> Result<(), L::Error>
where
    L: DsiLink,
    D: DelayNs,
{
    for step in OnStep::ALL {
        debug!("panel on: {}", step.name());
        step.run(links, desc, delay).map_err(|e| {
            error!("panel on: {} failed", step.name());
            e
        })?;
    }
    Ok(())
}

/// Steps of the power-off script, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffStep {
    /// set_display_off, then wait.
    DisplayOff,
    /// enter_sleep_mode, then wait.
    EnterSleep,
    /// Select low-power transmission on every endpoint.
    EnterLowPower,
}

impl OffStep {
    /// Every step, in order.
    pub const ALL: [Self; 3] = [Self::DisplayOff, Self::EnterSleep, Self::EnterLowPower];

    /// Log label.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DisplayOff => "display off",
            Self::EnterSleep => "enter sleep",
            Self::EnterLowPower => "enter lpm",
        }
    }

    fn run<L, D>(self, links: &mut LinkFanout<L>, delay: &mut D) -> Result<(), L::Error>
    where
        L: DsiLink,
        D: DelayNs,
    {
        match self {
            Self::DisplayOff => {
                links.primary().set_display_off().map_err(|e| {
                    error!("Failed to set display off");
                    e
                })?;
                timing::DISPLAY_OFF.wait(delay);
            }
            Self::EnterSleep => {
                links.primary().enter_sleep_mode().map_err(|e| {
                    error!("Failed to enter sleep mode");
                    e
                })?;
                timing::SLEEP_IN.wait(delay);
            }
            Self::EnterLowPower => links.set_low_power(true),
        }
        Ok(())
    }
}

/// Run the power-off script.
///
/// Every step runs even if an earlier one failed; the first error is
/// returned. The settle wait after a failed command is skipped.
pub fn run_off<L, D>(links: &mut LinkFanout<L>, delay: &mut D) -> Result<(), L::Error>
where
    L: DsiLink,
    D: DelayNs,
{
    let mut first = None;
    for step in OffStep::ALL {
        debug!("panel off: {}", step.name());
        if let Err(e) = step.run(links, delay) {
            if first.is_none() {
                first = Some(e);
            }
        }
    }
    first.map_or(Ok(()), Err)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use crate::descriptor::SHARP_LS055D1SX04;
    use platform::mocks::{Event, MockDelay, MockDsiLink, MockError, Recorder};
    use platform::ModeFlags;

    fn single(rec: &Recorder, link: MockDsiLink) -> (LinkFanout<MockDsiLink>, MockDelay) {
        (LinkFanout::single(link), MockDelay::new(rec))
    }

    fn expected_on_writes(dispout: u8) -> Vec<Vec<u8>> {
        vec![
            vec![0xF0, 0x55, 0xAA, 0x52, 0x08, 0x07],
            vec![0xE3, 0x01],
            vec![0xEF, 0x01],
            vec![0xF0, 0x55, 0xAA, 0x52, 0x08, 0x00],
            vec![0xC9, 0x01],
            vec![0x90, 0x00],
            vec![0x58, 0x01],
            vec![0xB4, dispout],
            vec![
                0xBD, 0x00, 0xAC, 0x0C, 0x0C, 0x00, 0x01, 0x56, 0x09, 0x09, 0x01, 0x01, 0x0C,
                0x0C, 0x00, 0xD9,
            ],
            vec![0x35, 0x00],
            vec![0x44, 0x00, 0x00],
            vec![0xF0, 0x55, 0xAA, 0x52, 0x08, 0x01],
            vec![0xD4, 0x88, 0x88],
            vec![0xFF, 0xAA, 0x55, 0xA5, 0x80],
            vec![0x6F, 0x01],
            vec![0xF3, 0x10],
            vec![0xFF, 0xAA, 0x55, 0xA5, 0x00],
            vec![0x11],
            vec![0x29],
        ]
    }

    #[test]
    fn on_script_bytes_are_exact() {
        let rec = Recorder::new();
        let (mut links, mut delay) = single(&rec, MockDsiLink::new(0, &rec));
        run_on(&mut links, &SHARP_LS055D1SX04, &mut delay).unwrap();
        let writes = rec.writes_on(0);
        assert_eq!(writes.len(), 19);
        assert_eq!(writes, expected_on_writes(0x01));
    }

    #[test]
    fn on_script_waits_after_sleep_out_and_display_on() {
        let rec = Recorder::new();
        let (mut links, mut delay) = single(&rec, MockDsiLink::new(0, &rec));
        run_on(&mut links, &SHARP_LS055D1SX04, &mut delay).unwrap();
        let events = rec.events();
        let sleep_out = events
            .iter()
            .position(|e| matches!(e, Event::Write { bytes, .. } if bytes == &[0x11]))
            .unwrap();
        assert_eq!(events[sleep_out + 1], Event::Delay { ns: 120_000_000 });
        assert_eq!(events[sleep_out + 3], Event::Delay { ns: 120_000_000 });
        assert_eq!(rec.delays_us(), vec![120_000, 120_000]);
    }

    #[test]
    fn on_script_brackets_with_low_power() {
        let rec = Recorder::new();
        let (mut links, mut delay) = single(&rec, MockDsiLink::new(0, &rec));
        run_on(&mut links, &SHARP_LS055D1SX04, &mut delay).unwrap();
        let events = rec.events();
        assert!(matches!(events.first(), Some(Event::Flags { flags, .. }) if flags.contains(ModeFlags::LPM)));
        assert!(matches!(events.last(), Some(Event::Flags { flags, .. }) if !flags.contains(ModeFlags::LPM)));
    }

    #[test]
    fn video_mode_without_sram_sets_video_bit() {
        let rec = Recorder::new();
        let (mut links, mut delay) = single(&rec, MockDsiLink::new(0, &rec));
        let desc = PanelDescriptor {
            enable_sram: false,
            is_video_mode: true,
            ..SHARP_LS055D1SX04
        };
        run_on(&mut links, &desc, &mut delay).unwrap();
        assert_eq!(rec.writes_on(0)[7], vec![0xB4, 0x10]);
    }

    #[test]
    fn on_script_stops_at_first_failure() {
        let rec = Recorder::new();
        let link = MockDsiLink::new(0, &rec).fail_on(&[0x44, 0x00, 0x00]);
        let (mut links, mut delay) = single(&rec, link);
        let err = run_on(&mut links, &SHARP_LS055D1SX04, &mut delay).unwrap_err();
        assert_eq!(err, MockError::Injected);
        let writes = rec.writes_on(0);
        assert_eq!(writes.len(), 10);
        assert_eq!(writes.last(), Some(&vec![0x35, 0x00]));
        // LPM never cleared
        assert_eq!(rec.flags_on(0).len(), 1);
    }

    #[test]
    fn off_script_sequence() {
        let rec = Recorder::new();
        let (mut links, mut delay) = single(&rec, MockDsiLink::new(0, &rec));
        run_off(&mut links, &mut delay).unwrap();
        assert_eq!(rec.writes_on(0), vec![vec![0x28], vec![0x10]]);
        assert_eq!(rec.delays_us(), vec![10_000, 150_000]);
        assert!(rec.flags_on(0)[0].contains(ModeFlags::LPM));
    }

    #[test]
    fn off_script_continues_after_failure() {
        let rec = Recorder::new();
        let link = MockDsiLink::new(0, &rec).fail_on(&[0x28]);
        let (mut links, mut delay) = single(&rec, link);
        assert_eq!(run_off(&mut links, &mut delay), Err(MockError::Injected));
        assert_eq!(rec.writes_on(0), vec![vec![0x10]]);
        assert_eq!(rec.delays_us(), vec![150_000]);
        assert_eq!(rec.flags_on(0).len(), 1);
    }

    #[test]
    fn step_tables_are_complete() {
        assert_eq!(OnStep::ALL.len(), 13);
        assert_eq!(OnStep::ALL.first(), Some(&OnStep::EnterLowPower));
        assert_eq!(OnStep::ALL.last(), Some(&OnStep::ExitLowPower));
        assert_eq!(OffStep::ALL.len(), 3);
    }
}
