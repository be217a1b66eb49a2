//! One logical panel, one or two DSI endpoints
//!
//! Commands always go to the primary endpoint. The secondary endpoint of a
//! dual-link panel only mirrors configuration and the low-power flag so that
//! both links change transmission mode together.

use core::iter;

use platform::{DsiLink, LinkConfig, LinkLookupError, ModeFlags, RemoteLinkResolver};

use crate::descriptor::PanelDescriptor;

/// The panel's DSI endpoints.
pub struct LinkFanout<L> {
    primary: L,
    secondary: Option<L>,
}

impl<L: DsiLink> LinkFanout<L> {
    /// Single-link panel.
    pub fn single(primary: L) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Resolve the endpoints `desc` needs.
    ///
    /// For dual-link panels the secondary is looked up and registered through
    /// `resolver`; its lookup error is returned unchanged.
    pub fn resolve<R>(
        desc: &PanelDescriptor,
        primary: L,
        resolver: &mut R,
    ) -> Result<Self, LinkLookupError>
    where
        R: RemoteLinkResolver<Link = L>,
    {
        if !desc.is_dual_dsi {
            return Ok(Self::single(primary));
        }
        let secondary = resolver.find_secondary(&desc.dsi_info).map_err(|e| {
            match e {
                LinkLookupError::NotPresent => error!("secondary DSI endpoint not described"),
                LinkLookupError::NotReady => debug!("secondary DSI host not ready, deferring"),
            }
            e
        })?;
        Ok(Self {
            primary,
            secondary: Some(secondary),
        })
    }

    /// Every endpoint, primary first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut L> {
        iter::once(&mut self.primary).chain(self.secondary.as_mut())
    }

    /// Configure then attach every endpoint.
    ///
    /// On an attach failure, endpoints attached earlier are detached again
    /// and the error is returned.
    pub fn configure_and_attach(&mut self, config: &LinkConfig) -> Result<(), L::Error> {
        let mut attached = 0usize;
        let mut failure = None;
        for (i, link) in self.iter_mut().enumerate() {
            link.configure(config);
            if let Err(e) = link.attach() {
                error!("failed to attach DSI link {}", i);
                failure = Some(e);
                break;
            }
            attached = attached.saturating_add(1);
        }
        match failure {
            None => Ok(()),
            Some(e) => {
                for (i, link) in self.iter_mut().take(attached).enumerate() {
                    if link.detach().is_err() {
                        error!("failed to detach DSI link {}", i);
                    }
                }
                Err(e)
            }
        }
    }

    /// Set or clear low-power transmission on every endpoint.
    pub fn set_low_power(&mut self, enabled: bool) {
        for link in self.iter_mut() {
            let mut flags = link.mode_flags();
            if enabled {
                flags.insert(ModeFlags::LPM);
            } else {
                flags.remove(ModeFlags::LPM);
            }
            link.set_mode_flags(flags);
        }
    }

    /// Detach every endpoint, primary first. Failures are logged.
    pub fn detach_all(&mut self) {
        for (i, link) in self.iter_mut().enumerate() {
            if link.detach().is_err() {
                error!("failed to detach DSI link {}", i);
            }
        }
    }

    /// The endpoint that receives commands.
    pub fn primary(&mut self) -> &mut L {
        &mut self.primary
    }

    /// `true` with a secondary endpoint.
    pub fn is_dual(&self) -> bool {
        self.secondary.is_some()
    }

    /// Number of endpoints.
    pub fn len(&self) -> usize {
        if self.is_dual() {
            2
        } else {
            1
        }
    }

    /// Always `false`; there is at least the primary endpoint.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Release the secondary and hand back the primary.
    pub fn into_primary(self) -> L {
        drop(self.secondary);
        self.primary
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::descriptor::SHARP_LS055D1SX04;
    use platform::mocks::{Event, MockDsiLink, MockResolver, Recorder};
    use platform::NoRemoteLink;

    fn single_desc() -> PanelDescriptor {
        PanelDescriptor {
            is_dual_dsi: false,
            ..SHARP_LS055D1SX04
        }
    }

    #[test]
    fn single_link_never_asks_resolver() {
        let rec = Recorder::new();
        let mut resolver = MockResolver::not_present();
        let links =
            LinkFanout::resolve(&single_desc(), MockDsiLink::new(0, &rec), &mut resolver).unwrap();
        assert!(!links.is_dual());
        assert!(resolver.requests().is_empty());
    }

    #[test]
    fn dual_link_registers_secondary_with_panel_identity() {
        let rec = Recorder::new();
        let mut resolver = MockResolver::with_link(MockDsiLink::new(1, &rec));
        let links =
            LinkFanout::resolve(&SHARP_LS055D1SX04, MockDsiLink::new(0, &rec), &mut resolver)
                .unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(resolver.requests(), &[SHARP_LS055D1SX04.dsi_info]);
    }

    #[test]
    fn missing_secondary_is_not_present() {
        let rec = Recorder::new();
        let mut resolver = NoRemoteLink::<MockDsiLink>::new();
        let err = LinkFanout::resolve(&SHARP_LS055D1SX04, MockDsiLink::new(0, &rec), &mut resolver)
            .err()
            .unwrap();
        assert_eq!(err, LinkLookupError::NotPresent);
    }

    #[test]
    fn configure_and_attach_in_endpoint_order() {
        let rec = Recorder::new();
        let mut resolver = MockResolver::with_link(MockDsiLink::new(1, &rec));
        let mut links =
            LinkFanout::resolve(&SHARP_LS055D1SX04, MockDsiLink::new(0, &rec), &mut resolver)
                .unwrap();
        let config = SHARP_LS055D1SX04.link_config();
        links.configure_and_attach(&config).unwrap();
        assert_eq!(
            rec.events(),
            vec![
                Event::Configure { link: 0, config },
                Event::Attach(0),
                Event::Configure { link: 1, config },
                Event::Attach(1),
            ]
        );
    }

    #[test]
    fn failed_secondary_attach_detaches_primary() {
        let rec = Recorder::new();
        let mut resolver = MockResolver::with_link(MockDsiLink::new(1, &rec).fail_attach());
        let mut links =
            LinkFanout::resolve(&SHARP_LS055D1SX04, MockDsiLink::new(0, &rec), &mut resolver)
                .unwrap();
        assert!(links
            .configure_and_attach(&SHARP_LS055D1SX04.link_config())
            .is_err());
        assert_eq!(rec.events().last(), Some(&Event::Detach(0)));
    }

    #[test]
    fn low_power_is_mirrored() {
        let rec = Recorder::new();
        let mut resolver = MockResolver::with_link(MockDsiLink::new(1, &rec));
        let mut links =
            LinkFanout::resolve(&SHARP_LS055D1SX04, MockDsiLink::new(0, &rec), &mut resolver)
                .unwrap();
        links.set_low_power(true);
        links.set_low_power(false);
        for id in 0..2 {
            let flags = rec.flags_on(id);
            assert_eq!(flags.len(), 2);
            assert!(flags.first().unwrap().contains(ModeFlags::LPM));
            assert!(!flags.last().unwrap().contains(ModeFlags::LPM));
        }
    }

    #[test]
    fn detach_failure_does_not_stop_teardown() {
        let rec = Recorder::new();
        let mut resolver = MockResolver::with_link(MockDsiLink::new(1, &rec));
        let mut links = LinkFanout::resolve(
            &SHARP_LS055D1SX04,
            MockDsiLink::new(0, &rec).fail_detach(),
            &mut resolver,
        )
        .unwrap();
        links.detach_all();
        assert_eq!(rec.events(), vec![Event::Detach(1)]);
        let primary = links.into_primary();
        assert_eq!(rec.events().last(), Some(&Event::Release(1)));
        assert_eq!(primary.id(), 0);
    }
}
