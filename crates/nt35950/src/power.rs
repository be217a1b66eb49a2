//! Supply rails and the power-on sequence
//!
//! # Supply table
//!
//! | idx | label  | range (µV)            | notes                    |
//! |-----|--------|-----------------------|--------------------------|
//! | 0   | vddio  | 1 750 000 - 1 950 000 | logic I/O                |
//! | 1   | tvddio | 1 750 000 - 1 950 000 | touch I/O                |
//! | 2   | tavdd  | 2 800 000 - 3 300 000 | touch analog             |
//! | 3   | avdd   | 5 200 000 - 5 900 000 | positive source bias     |
//! | 4   | avee   | 5 200 000 - 5 900 000 | negative bias, magnitude |
//! | 5   | dvdd   | 1 300 000 - 1 400 000 | core logic               |
//!
//! # Enable order
//!
//! ```text
//! vddio ── 2..5 ms ── dvdd ── 15..18 ms ── avdd, avee ── 12..13 ms
//!       ── tvddio, tavdd ── 15..16 ms ── RESX pulse
//! ```
//!
//! Disabling is the reverse table order and only touches rails this
//! sequencer enabled.

use embedded_hal::delay::DelayNs;
use platform::{Regulator, SupplyProvider};

use crate::config::VoltagePolicy;
use crate::timing::{self, Settle};

/// Number of supply rails.
pub const SUPPLY_COUNT: usize = 6;

/// Panel supply rails, in supply-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Supply {
    /// Logic I/O
    Vddio,
    /// Touch I/O
    Tvddio,
    /// Touch analog
    Tavdd,
    /// Positive source bias
    Avdd,
    /// Negative source bias (range given as magnitude)
    Avee,
    /// Core logic
    Dvdd,
}

impl Supply {
    /// Every rail in table order.
    pub const ALL: [Self; SUPPLY_COUNT] = [
        Self::Vddio,
        Self::Tvddio,
        Self::Tavdd,
        Self::Avdd,
        Self::Avee,
        Self::Dvdd,
    ];

    /// Regulator lookup label.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vddio => "vddio",
            Self::Tvddio => "tvddio",
            Self::Tavdd => "tavdd",
            Self::Avdd => "avdd",
            Self::Avee => "avee",
            Self::Dvdd => "dvdd",
        }
    }

    /// Position in the supply table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Accepted voltage window `(min_uv, max_uv)`.
    pub const fn voltage_range_uv(self) -> (i32, i32) {
        match self {
            Self::Vddio | Self::Tvddio => (1_750_000, 1_950_000),
            Self::Tavdd => (2_800_000, 3_300_000),
            // AVEE is -5.90 V to -5.20 V; the regulator API takes the magnitude.
            Self::Avdd | Self::Avee => (5_200_000, 5_900_000),
            Self::Dvdd => (1_300_000, 1_400_000),
        }
    }
}

impl core::fmt::Display for Supply {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rails enabled together, followed by one settle window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerGroup {
    /// Log label
    pub name: &'static str,
    /// Rails in enable order
    pub supplies: &'static [Supply],
    /// Wait after the last rail of the group
    pub settle: Settle,
}

/// Power-on order.
pub const POWER_ON_SEQUENCE: [PowerGroup; 4] = [
    PowerGroup {
        name: "vio",
        supplies: &[Supply::Vddio],
        settle: timing::VDDIO,
    },
    PowerGroup {
        name: "dvdd",
        supplies: &[Supply::Dvdd],
        settle: timing::DVDD,
    },
    PowerGroup {
        name: "vsp/vsn",
        supplies: &[Supply::Avdd, Supply::Avee],
        settle: timing::BIAS,
    },
    PowerGroup {
        name: "touch",
        supplies: &[Supply::Tvddio, Supply::Tavdd],
        settle: timing::TOUCH,
    },
];

/// One supply rail and its regulator.
pub struct PowerRail<R> {
    supply: Supply,
    regulator: R,
    enabled: bool,
}

impl<R: Regulator> PowerRail<R> {
    /// Wrap a regulator. The rail starts disabled.
    pub fn new(supply: Supply, regulator: R) -> Self {
        Self {
            supply,
            regulator,
            enabled: false,
        }
    }

    /// Which rail this is.
    pub fn supply(&self) -> Supply {
        self.supply
    }

    /// `true` once enabled by this driver and not yet disabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `true` if the regulator supports the rail's voltage window.
    pub fn is_supported(&self) -> bool {
        let (min_uv, max_uv) = self.supply.voltage_range_uv();
        self.regulator.is_supported_voltage(min_uv, max_uv)
    }

    fn enable(&mut self) -> Result<(), R::Error> {
        self.regulator.enable()?;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), R::Error> {
        self.regulator.disable()?;
        self.enabled = false;
        Ok(())
    }
}

/// The six panel rails plus the ordering rules.
pub struct PowerSequencer<R> {
    rails: [PowerRail<R>; SUPPLY_COUNT],
}

impl<R: Regulator> PowerSequencer<R> {
    /// Look up every rail by label, in table order.
    ///
    /// The first failed lookup aborts; regulators already obtained are dropped.
    pub fn acquire<P>(provider: &mut P) -> Result<Self, R::Error>
    where
        P: SupplyProvider<Regulator = R>,
    {
        let mut get = |supply: Supply| {
            provider.get(supply.name()).map_err(|e| {
                error!("failed to get regulator {}", supply.name());
                e
            })
        };
        Ok(Self::from_regulators([
            get(Supply::Vddio)?,
            get(Supply::Tvddio)?,
            get(Supply::Tavdd)?,
            get(Supply::Avdd)?,
            get(Supply::Avee)?,
            get(Supply::Dvdd)?,
        ]))
    }

    /// Build from regulators already in table order.
    pub fn from_regulators(regulators: [R; SUPPLY_COUNT]) -> Self {
        let [vddio, tvddio, tavdd, avdd, avee, dvdd] = regulators;
        Self {
            rails: [
                PowerRail::new(Supply::Vddio, vddio),
                PowerRail::new(Supply::Tvddio, tvddio),
                PowerRail::new(Supply::Tavdd, tavdd),
                PowerRail::new(Supply::Avdd, avdd),
                PowerRail::new(Supply::Avee, avee),
                PowerRail::new(Supply::Dvdd, dvdd),
            ],
        }
    }

    /// Check every rail's voltage window before anything is enabled.
    ///
    /// Under [`VoltagePolicy::Strict`] the first unsupported rail is
    /// returned; under [`VoltagePolicy::Permissive`] it is logged and
    /// validation continues.
    pub fn validate(&self, policy: VoltagePolicy) -> Result<(), Supply> {
        for rail in &self.rails {
            if rail.is_supported() {
                continue;
            }
            match policy {
                VoltagePolicy::Strict => {
                    error!("{} voltage window unsupported", rail.supply.name());
                    return Err(rail.supply);
                }
                VoltagePolicy::Permissive => {
                    warn!(
                        "{} voltage window unsupported, continuing (DEVELOPMENT MODE)",
                        rail.supply.name()
                    );
                }
            }
        }
        Ok(())
    }

    /// Enable every group in [`POWER_ON_SEQUENCE`], waiting each settle
    /// window. The first failure aborts; rails already enabled stay on.
    pub fn power_up<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), R::Error> {
        for group in &POWER_ON_SEQUENCE {
            debug!("power group {}", group.name);
            for &supply in group.supplies {
                if let Some(rail) = self.rail_mut(supply) {
                    rail.enable().map_err(|e| {
                        error!("failed to enable {}", supply.name());
                        e
                    })?;
                }
            }
            group.settle.wait(delay);
        }
        Ok(())
    }

    /// Disable every enabled rail in reverse table order. Never stops early;
    /// failures are logged and the rail is left marked enabled.
    pub fn power_down(&mut self) {
        for rail in self.rails.iter_mut().rev() {
            if !rail.enabled {
                continue;
            }
            if rail.disable().is_err() {
                error!("failed to disable {}", rail.supply.name());
            }
        }
    }

    /// Rails currently enabled, in table order.
    pub fn enabled_supplies(&self) -> impl Iterator<Item = Supply> + '_ {
        self.rails
            .iter()
            .filter(|r| r.enabled)
            .map(PowerRail::supply)
    }

    /// `true` if no rail is enabled.
    pub fn is_off(&self) -> bool {
        self.rails.iter().all(|r| !r.enabled)
    }

    /// Rails in table order.
    pub fn rails(&self) -> &[PowerRail<R>] {
        &self.rails
    }

    fn rail_mut(&mut self, supply: Supply) -> Option<&mut PowerRail<R>> {
        self.rails.iter_mut().find(|r| r.supply == supply)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use platform::mocks::{Event, MockDelay, MockRegulator, MockSupplies, Recorder};

    fn sequencer(supplies: &mut MockSupplies) -> PowerSequencer<MockRegulator> {
        PowerSequencer::acquire(supplies).unwrap()
    }

    #[test]
    fn supply_table_order_and_labels() {
        let labels: Vec<_> = Supply::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(
            labels,
            ["vddio", "tvddio", "tavdd", "avdd", "avee", "dvdd"]
        );
        for (i, s) in Supply::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn voltage_windows() {
        assert_eq!(Supply::Vddio.voltage_range_uv(), (1_750_000, 1_950_000));
        assert_eq!(Supply::Tavdd.voltage_range_uv(), (2_800_000, 3_300_000));
        assert_eq!(Supply::Avee.voltage_range_uv(), (5_200_000, 5_900_000));
        assert_eq!(Supply::Dvdd.voltage_range_uv(), (1_300_000, 1_400_000));
    }

    #[test]
    fn acquire_looks_up_in_table_order() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec);
        let _ = sequencer(&mut supplies);
        assert_eq!(
            supplies.lookups(),
            &["vddio", "tvddio", "tavdd", "avdd", "avee", "dvdd"]
        );
    }

    #[test]
    fn acquire_stops_at_missing_rail() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec).missing("avdd");
        assert!(PowerSequencer::acquire(&mut supplies).is_err());
        assert_eq!(supplies.lookups().last(), Some(&"avdd"));
    }

    #[test]
    fn power_up_follows_group_order_with_settles() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec);
        let mut power = sequencer(&mut supplies);
        power.power_up(&mut MockDelay::new(&rec)).unwrap();

        assert_eq!(
            rec.events(),
            vec![
                Event::Enable("vddio"),
                Event::Delay { ns: 2_000_000 },
                Event::Enable("dvdd"),
                Event::Delay { ns: 15_000_000 },
                Event::Enable("avdd"),
                Event::Enable("avee"),
                Event::Delay { ns: 12_000_000 },
                Event::Enable("tvddio"),
                Event::Enable("tavdd"),
                Event::Delay { ns: 15_000_000 },
            ]
        );
        assert_eq!(power.enabled_supplies().count(), SUPPLY_COUNT);
    }

    #[test]
    fn failed_enable_keeps_earlier_rails_on() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec).failing_enable("avee");
        let mut power = sequencer(&mut supplies);
        assert!(power.power_up(&mut MockDelay::new(&rec)).is_err());
        let on: Vec<_> = power.enabled_supplies().collect();
        assert_eq!(on, vec![Supply::Vddio, Supply::Avdd, Supply::Dvdd]);
    }

    #[test]
    fn power_down_reverses_and_skips_disabled() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec).failing_enable("tvddio");
        let mut power = sequencer(&mut supplies);
        let _ = power.power_up(&mut MockDelay::new(&rec));
        rec.clear();
        power.power_down();
        assert_eq!(rec.disabled(), vec!["dvdd", "avee", "avdd", "vddio"]);
        assert!(power.is_off());
    }

    #[test]
    fn power_down_continues_past_failure() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec).failing_disable("avdd");
        let mut power = sequencer(&mut supplies);
        power.power_up(&mut MockDelay::new(&rec)).unwrap();
        rec.clear();
        power.power_down();
        assert_eq!(
            rec.disabled(),
            vec!["dvdd", "avee", "tavdd", "tvddio", "vddio"]
        );
        assert_eq!(power.enabled_supplies().collect::<Vec<_>>(), vec![Supply::Avdd]);
    }

    #[test]
    fn power_down_with_nothing_enabled_is_silent() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec);
        let mut power = sequencer(&mut supplies);
        power.power_down();
        assert!(rec.is_empty());
    }

    #[test]
    fn strict_validation_names_the_rail() {
        let rec = Recorder::new();
        let mut supplies = MockSupplies::new(&rec).unsupported("tavdd");
        let power = sequencer(&mut supplies);
        assert_eq!(power.validate(VoltagePolicy::Strict), Err(Supply::Tavdd));
        assert_eq!(power.validate(VoltagePolicy::Permissive), Ok(()));
    }
}
