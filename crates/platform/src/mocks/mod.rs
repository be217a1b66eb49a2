//! Mock implementations for testing
//!
//! Every mock shares one [`Recorder`], so a test sees a single ordered log of
//! regulator, delay, reset-line and DSI events and can assert on the global
//! ordering across all of them.

#![cfg(any(test, feature = "std"))]

extern crate std;

use core::convert::Infallible;
use std::{cell::RefCell, rc::Rc, vec::Vec};

use embedded_hal::{delay::DelayNs, digital};

use crate::dsi::{DsiDeviceInfo, DsiLink, LinkConfig, ModeFlags};
use crate::link::{LinkLookupError, RemoteLinkResolver};
use crate::regulator::{Regulator, SupplyProvider};

/// One observable side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Regulator `label` enabled.
    Enable(&'static str),
    /// Regulator `label` disabled.
    Disable(&'static str),
    /// Blocking delay of `ns` nanoseconds.
    Delay {
        /// Duration in nanoseconds
        ns: u64,
    },
    /// Reset line driven high (`true`) or low (`false`).
    Reset(bool),
    /// Successful buffer write on link `link`.
    Write {
        /// Link id
        link: usize,
        /// Bytes sent
        bytes: Vec<u8>,
    },
    /// Mode flags replaced on link `link`.
    Flags {
        /// Link id
        link: usize,
        /// New flag word
        flags: ModeFlags,
    },
    /// Link configured.
    Configure {
        /// Link id
        link: usize,
        /// Applied configuration
        config: LinkConfig,
    },
    /// Link attached.
    Attach(usize),
    /// Link detached.
    Detach(usize),
    /// Link handle dropped.
    Release(usize),
}

/// Shared, cloneable event log.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Event>>>);

impl Recorder {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Snapshot of every event so far.
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Payloads written on `link`, in order.
    pub fn writes_on(&self, link: usize) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Write { link: l, bytes } if *l == link => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Payloads written on any link, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Write { bytes, .. } => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Regulator labels in enable order.
    pub fn enabled(&self) -> Vec<&'static str> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Enable(name) => Some(*name),
                _ => None,
            })
            .collect()
    }

    /// Regulator labels in disable order.
    pub fn disabled(&self) -> Vec<&'static str> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Disable(name) => Some(*name),
                _ => None,
            })
            .collect()
    }

    /// Delays in whole microseconds, in order.
    pub fn delays_us(&self) -> Vec<u64> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Delay { ns } => Some(ns / 1000),
                _ => None,
            })
            .collect()
    }

    /// Reset-line levels in order.
    pub fn resets(&self) -> Vec<bool> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Reset(level) => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Flag words applied to `link`, in order.
    pub fn flags_on(&self, link: usize) -> Vec<ModeFlags> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Flags { link: l, flags } if *l == link => Some(*flags),
                _ => None,
            })
            .collect()
    }
}

/// Error produced by the mocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// Failure injected by the test.
    Injected,
    /// Requested resource was not configured.
    Missing,
}

impl core::fmt::Display for MockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Injected => write!(f, "Injected mock failure"),
            Self::Missing => write!(f, "Mock resource missing"),
        }
    }
}

impl std::error::Error for MockError {}

// ── Regulators ──────────────────────────────────────────────────────────────

/// Mock regulator that records enable/disable.
#[derive(Debug)]
pub struct MockRegulator {
    label: &'static str,
    recorder: Recorder,
    supported: bool,
    fail_enable: bool,
    fail_disable: bool,
    enabled: bool,
}

impl MockRegulator {
    /// Create a healthy regulator.
    pub fn new(label: &'static str, recorder: &Recorder) -> Self {
        Self {
            label,
            recorder: recorder.clone(),
            supported: true,
            fail_enable: false,
            fail_disable: false,
            enabled: false,
        }
    }

    /// Supply label.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Current output state as seen by the mock.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Regulator for MockRegulator {
    type Error = MockError;

    fn enable(&mut self) -> Result<(), MockError> {
        if self.fail_enable {
            return Err(MockError::Injected);
        }
        self.enabled = true;
        self.recorder.push(Event::Enable(self.label));
        Ok(())
    }

    fn disable(&mut self) -> Result<(), MockError> {
        if self.fail_disable {
            return Err(MockError::Injected);
        }
        self.enabled = false;
        self.recorder.push(Event::Disable(self.label));
        Ok(())
    }

    fn is_supported_voltage(&self, _min_uv: i32, _max_uv: i32) -> bool {
        self.supported
    }
}

/// Mock regulator lookup with per-label fault injection.
#[derive(Debug)]
pub struct MockSupplies {
    recorder: Recorder,
    missing: Vec<&'static str>,
    unsupported: Vec<&'static str>,
    failing_enable: Vec<&'static str>,
    failing_disable: Vec<&'static str>,
    lookups: Vec<&'static str>,
}

impl MockSupplies {
    /// Every label resolves to a healthy regulator.
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            missing: Vec::new(),
            unsupported: Vec::new(),
            failing_enable: Vec::new(),
            failing_disable: Vec::new(),
            lookups: Vec::new(),
        }
    }

    /// Lookup of `label` fails.
    #[must_use]
    pub fn missing(mut self, label: &'static str) -> Self {
        self.missing.push(label);
        self
    }

    /// `label` reports every voltage window as unsupported.
    #[must_use]
    pub fn unsupported(mut self, label: &'static str) -> Self {
        self.unsupported.push(label);
        self
    }

    /// Enabling `label` fails.
    #[must_use]
    pub fn failing_enable(mut self, label: &'static str) -> Self {
        self.failing_enable.push(label);
        self
    }

    /// Disabling `label` fails.
    #[must_use]
    pub fn failing_disable(mut self, label: &'static str) -> Self {
        self.failing_disable.push(label);
        self
    }

    /// Labels requested so far, in order.
    pub fn lookups(&self) -> &[&'static str] {
        &self.lookups
    }
}

impl SupplyProvider for MockSupplies {
    type Regulator = MockRegulator;

    fn get(&mut self, label: &'static str) -> Result<MockRegulator, MockError> {
        self.lookups.push(label);
        if self.missing.contains(&label) {
            return Err(MockError::Missing);
        }
        let mut regulator = MockRegulator::new(label, &self.recorder);
        regulator.supported = !self.unsupported.contains(&label);
        regulator.fail_enable = self.failing_enable.contains(&label);
        regulator.fail_disable = self.failing_disable.contains(&label);
        Ok(regulator)
    }
}

// ── Delay and reset ─────────────────────────────────────────────────────────

/// Delay that records instead of sleeping.
#[derive(Debug, Clone)]
pub struct MockDelay {
    recorder: Recorder,
}

impl MockDelay {
    /// Create a recording delay.
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.recorder.push(Event::Delay { ns: u64::from(ns) });
    }

    fn delay_us(&mut self, us: u32) {
        self.recorder.push(Event::Delay {
            ns: u64::from(us).saturating_mul(1_000),
        });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.recorder.push(Event::Delay {
            ns: u64::from(ms).saturating_mul(1_000_000),
        });
    }
}

/// Reset GPIO that records level changes.
#[derive(Debug, Clone)]
pub struct MockResetPin {
    recorder: Recorder,
}

impl MockResetPin {
    /// Create a recording pin.
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
        }
    }
}

impl digital::ErrorType for MockResetPin {
    type Error = Infallible;
}

impl digital::OutputPin for MockResetPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.recorder.push(Event::Reset(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.recorder.push(Event::Reset(true));
        Ok(())
    }
}

// ── DSI ─────────────────────────────────────────────────────────────────────

/// Mock DSI endpoint.
///
/// Writes are numbered from zero per link; failures can be injected by
/// attempt index or by exact payload.
#[derive(Debug)]
pub struct MockDsiLink {
    id: usize,
    recorder: Recorder,
    flags: ModeFlags,
    attempts: usize,
    fail_at: Option<usize>,
    fail_payload: Option<Vec<u8>>,
    fail_attach: bool,
    fail_detach: bool,
    attached: bool,
}

impl MockDsiLink {
    /// Create a healthy link with the given id.
    pub fn new(id: usize, recorder: &Recorder) -> Self {
        Self {
            id,
            recorder: recorder.clone(),
            flags: ModeFlags::EMPTY,
            attempts: 0,
            fail_at: None,
            fail_payload: None,
            fail_attach: false,
            fail_detach: false,
            attached: false,
        }
    }

    /// Fail the write attempt with zero-based index `index`.
    #[must_use]
    pub fn fail_at_write(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Fail every write whose payload equals `payload`.
    #[must_use]
    pub fn fail_on(mut self, payload: &[u8]) -> Self {
        self.fail_payload = Some(payload.to_vec());
        self
    }

    /// Fail attach.
    #[must_use]
    pub fn fail_attach(mut self) -> Self {
        self.fail_attach = true;
        self
    }

    /// Fail detach.
    #[must_use]
    pub fn fail_detach(mut self) -> Self {
        self.fail_detach = true;
        self
    }

    /// Link id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Whether the link is attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl DsiLink for MockDsiLink {
    type Error = MockError;

    fn write_buffer(&mut self, buf: &[u8]) -> Result<usize, MockError> {
        let attempt = self.attempts;
        self.attempts = self.attempts.saturating_add(1);
        if self.fail_at == Some(attempt) || self.fail_payload.as_deref() == Some(buf) {
            return Err(MockError::Injected);
        }
        self.recorder.push(Event::Write {
            link: self.id,
            bytes: buf.to_vec(),
        });
        Ok(buf.len())
    }

    fn mode_flags(&self) -> ModeFlags {
        self.flags
    }

    fn set_mode_flags(&mut self, flags: ModeFlags) {
        self.flags = flags;
        self.recorder.push(Event::Flags {
            link: self.id,
            flags,
        });
    }

    fn configure(&mut self, config: &LinkConfig) {
        self.flags = config.mode_flags;
        self.recorder.push(Event::Configure {
            link: self.id,
            config: *config,
        });
    }

    fn attach(&mut self) -> Result<(), MockError> {
        if self.fail_attach {
            return Err(MockError::Injected);
        }
        self.attached = true;
        self.recorder.push(Event::Attach(self.id));
        Ok(())
    }

    fn detach(&mut self) -> Result<(), MockError> {
        if self.fail_detach {
            return Err(MockError::Injected);
        }
        self.attached = false;
        self.recorder.push(Event::Detach(self.id));
        Ok(())
    }
}

impl Drop for MockDsiLink {
    fn drop(&mut self) {
        self.recorder.push(Event::Release(self.id));
    }
}

/// Mock secondary-link resolver.
#[derive(Debug)]
pub struct MockResolver {
    link: Option<MockDsiLink>,
    error: LinkLookupError,
    requests: Vec<DsiDeviceInfo>,
}

impl MockResolver {
    /// Resolves to `link` once.
    pub fn with_link(link: MockDsiLink) -> Self {
        Self {
            link: Some(link),
            error: LinkLookupError::NotPresent,
            requests: Vec::new(),
        }
    }

    /// Always fails with [`LinkLookupError::NotPresent`].
    pub fn not_present() -> Self {
        Self {
            link: None,
            error: LinkLookupError::NotPresent,
            requests: Vec::new(),
        }
    }

    /// Fails with [`LinkLookupError::NotReady`] until [`make_ready`](Self::make_ready).
    pub fn not_ready() -> Self {
        Self {
            link: None,
            error: LinkLookupError::NotReady,
            requests: Vec::new(),
        }
    }

    /// The remote host has registered; the next lookup returns `link`.
    pub fn make_ready(&mut self, link: MockDsiLink) {
        self.link = Some(link);
    }

    /// Device infos requested so far.
    pub fn requests(&self) -> &[DsiDeviceInfo] {
        &self.requests
    }
}

impl RemoteLinkResolver for MockResolver {
    type Link = MockDsiLink;

    fn find_secondary(&mut self, info: &DsiDeviceInfo) -> Result<MockDsiLink, LinkLookupError> {
        self.requests.push(*info);
        self.link.take().ok_or(self.error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use embedded_hal::digital::OutputPin;

    #[test]
    fn recorder_orders_events_across_mocks() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec);
        let mut vddio = supplies.get("vddio").unwrap();
        let mut delay = MockDelay::new(&rec);
        let mut pin = MockResetPin::new(&rec);

        vddio.enable().unwrap();
        delay.delay_ms(2);
        pin.set_high().unwrap();

        assert_eq!(
            rec.events(),
            vec![
                Event::Enable("vddio"),
                Event::Delay { ns: 2_000_000 },
                Event::Reset(true),
            ]
        );
        assert_eq!(rec.delays_us(), vec![2_000]);
    }

    #[test]
    fn link_fails_at_indexed_attempt_without_recording() {
        let rec = Recorder::new();
        let mut link = MockDsiLink::new(0, &rec).fail_at_write(1);
        assert_eq!(link.write_buffer(&[0x11]), Ok(1));
        assert_eq!(link.write_buffer(&[0x29]), Err(MockError::Injected));
        assert_eq!(link.write_buffer(&[0x29]), Ok(1));
        assert_eq!(rec.writes_on(0), vec![vec![0x11], vec![0x29]]);
    }

    #[test]
    fn link_fails_on_payload() {
        let rec = Recorder::new();
        let mut link = MockDsiLink::new(0, &rec).fail_on(&[0x10]);
        assert!(link.write_buffer(&[0x10]).is_err());
        assert!(link.write_buffer(&[0x28]).is_ok());
    }

    #[test]
    fn dropping_link_records_release() {
        let rec = Recorder::new();
        drop(MockDsiLink::new(3, &rec));
        assert_eq!(rec.events(), vec![Event::Release(3)]);
    }

    #[test]
    fn supplies_inject_per_label() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec)
            .missing("avee")
            .unsupported("avdd")
            .failing_enable("dvdd");
        assert_eq!(supplies.get("avee").unwrap_err(), MockError::Missing);
        assert!(!supplies.get("avdd").unwrap().is_supported_voltage(0, 1));
        assert!(supplies.get("dvdd").unwrap().enable().is_err());
        assert_eq!(supplies.lookups(), &["avee", "avdd", "dvdd"]);
    }

    #[test]
    fn resolver_not_ready_until_made_ready() {
        let rec = Recorder::new();
        let info = DsiDeviceInfo {
            type_name: "X",
            channel: 0,
        };
        let mut resolver = MockResolver::not_ready();
        assert_eq!(
            resolver.find_secondary(&info).unwrap_err(),
            LinkLookupError::NotReady
        );
        resolver.make_ready(MockDsiLink::new(1, &rec));
        assert_eq!(resolver.find_secondary(&info).unwrap().id(), 1);
        assert_eq!(resolver.requests().len(), 2);
    }
}
