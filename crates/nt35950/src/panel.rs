//! NT35950 panel lifecycle
//!
//! [`Nt35950::probe`] gathers every resource the panel needs and attaches the
//! DSI endpoints; if anything is missing the half-built driver is dropped.
//! After that the panel moves between two stable states:
//!
//! ```text
//!              prepare()                      unprepare()
//! Unprepared ───────────► Preparing ─► Prepared ───────────► Unpreparing ─► Unprepared
//!     ▲                       │ error
//!     └───── power_down ──────┘
//! ```
//!
//! `prepare` on a prepared panel and `unprepare` on an unprepared one are
//! no-ops and touch no hardware.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use platform::{
    DisplayMode, DsiLink, LinkLookupError, Regulator, RemoteLinkResolver, SupplyProvider,
};

use crate::config::PanelConfig;
use crate::descriptor::PanelDescriptor;
use crate::error::{Error, Resource};
use crate::link::LinkFanout;
use crate::power::PowerSequencer;
use crate::reset::ResetLine;
use crate::script;

/// Error type of a panel built from link `L` and regulator `R`.
pub type PanelError<L, R> = Error<<L as DsiLink>::Error, <R as Regulator>::Error>;

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// Rails off, reset asserted.
    Unprepared,
    /// Power-up or on-script in progress.
    Preparing,
    /// Panel initialised and displaying.
    Prepared,
    /// Off-script or power-down in progress.
    Unpreparing,
}

/// NT35950 panel driver.
///
/// Owns the DSI endpoints, the six supply rails, the reset line and a delay
/// provider. All operations take `&mut self`.
pub struct Nt35950<L, R, RST, D>
where
    RST: OutputPin,
{
    desc: &'static PanelDescriptor,
    links: LinkFanout<L>,
    power: PowerSequencer<R>,
    reset: ResetLine<RST>,
    delay: D,
    state: LifecycleState,
}

impl<L, R, RST, D> Nt35950<L, R, RST, D>
where
    L: DsiLink,
    R: Regulator,
    RST: OutputPin,
    D: DelayNs,
{
    /// Bind the driver to a panel.
    ///
    /// In order: looks up and validates the supply rails, takes the reset
    /// GPIO, resolves the secondary endpoint for dual-link panels, configures
    /// and attaches every endpoint, then drives RESX low so the first power
    /// sequence starts from reset.
    #[allow(clippy::too_many_arguments)]
    pub fn probe<S, X>(
        desc: &'static PanelDescriptor,
        config: &PanelConfig,
        primary: L,
        supplies: &mut S,
        reset: Option<RST>,
        resolver: &mut X,
        delay: D,
    ) -> Result<Self, PanelError<L, R>>
    where
        S: SupplyProvider<Regulator = R>,
        X: RemoteLinkResolver<Link = L>,
    {
        info!("probing {}", desc.model_name);

        let power = PowerSequencer::acquire(supplies).map_err(Error::Regulator)?;
        power
            .validate(config.voltage_policy)
            .map_err(Error::VoltageUnsupported)?;

        let mut reset = reset.map(ResetLine::new).ok_or_else(|| {
            error!("reset GPIO unavailable");
            Error::ResourceUnavailable(Resource::ResetGpio)
        })?;

        let mut links = LinkFanout::resolve(desc, primary, resolver).map_err(|e| match e {
            LinkLookupError::NotPresent => Error::ResourceUnavailable(Resource::SecondaryLink),
            LinkLookupError::NotReady => Error::NotReady,
        })?;
        links
            .configure_and_attach(&desc.link_config())
            .map_err(Error::Attach)?;

        reset.assert();

        info!("{} bound, {} DSI link(s)", desc.model_name, links.len());
        Ok(Self {
            desc,
            links,
            power,
            reset,
            delay,
            state: LifecycleState::Unprepared,
        })
    }

    /// Power the panel up and run the on-script.
    ///
    /// On failure every rail enabled so far is disabled again, the state
    /// returns to [`LifecycleState::Unprepared`] and the first error is
    /// returned.
    pub fn prepare(&mut self) -> Result<(), PanelError<L, R>> {
        if self.state == LifecycleState::Prepared {
            return Ok(());
        }
        self.state = LifecycleState::Preparing;
        info!("preparing {}", self.desc.model_name);

        let result = self.power_on();
        match result {
            Ok(()) => {
                self.state = LifecycleState::Prepared;
                info!("{} prepared", self.desc.model_name);
                Ok(())
            }
            Err(e) => {
                error!("failed to initialize panel, powering down");
                self.power.power_down();
                self.state = LifecycleState::Unprepared;
                Err(e)
            }
        }
    }

    fn power_on(&mut self) -> Result<(), PanelError<L, R>> {
        self.power
            .power_up(&mut self.delay)
            .map_err(Error::Regulator)?;
        self.reset.pulse(&mut self.delay);
        script::run_on(&mut self.links, self.desc, &mut self.delay).map_err(Error::Transport)
    }

    /// Run the off-script, assert reset and cut power.
    ///
    /// Off-script failures are logged and do not stop teardown; the panel
    /// always ends [`LifecycleState::Unprepared`].
    pub fn unprepare(&mut self) {
        if self.state != LifecycleState::Prepared {
            return;
        }
        self.state = LifecycleState::Unpreparing;
        info!("unpreparing {}", self.desc.model_name);

        if script::run_off(&mut self.links, &mut self.delay).is_err() {
            error!("failed to un-initialize panel");
        }
        self.reset.assert();
        self.power.power_down();

        self.state = LifecycleState::Unprepared;
    }

    /// Modes the panel supports, preferred first.
    pub fn modes(&self) -> &'static [DisplayMode] {
        self.desc.modes
    }

    /// The panel this driver was probed for.
    pub fn descriptor(&self) -> &'static PanelDescriptor {
        self.desc
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// `true` once [`prepare`](Self::prepare) has succeeded.
    pub fn is_prepared(&self) -> bool {
        self.state == LifecycleState::Prepared
    }

    /// Supply rails, for inspection.
    pub fn power(&self) -> &PowerSequencer<R> {
        &self.power
    }

    /// Unbind: detach every endpoint and release the secondary.
    ///
    /// Detach failures are logged. Returns the primary endpoint to its owner.
    pub fn remove(mut self) -> L {
        info!("removing {}", self.desc.model_name);
        self.links.detach_all();
        self.links.into_primary()
    }
}
