//! Driver configuration

/// What to do when a regulator cannot produce a rail's voltage window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltagePolicy {
    /// Refuse to construct the panel.
    #[default]
    Strict,
    /// Log a warning and carry on. Useful on boards whose regulator
    /// constraints are not yet described.
    Permissive,
}

/// Panel driver configuration
#[derive(Debug, Clone, Default)]
pub struct PanelConfig {
    /// Supply voltage validation policy
    pub voltage_policy: VoltagePolicy,
}

impl PanelConfig {
    /// Set the voltage validation policy.
    #[must_use]
    pub const fn with_voltage_policy(mut self, policy: VoltagePolicy) -> Self {
        self.voltage_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_strict() {
        assert_eq!(PanelConfig::default().voltage_policy, VoltagePolicy::Strict);
        assert_eq!(
            PanelConfig::default()
                .with_voltage_policy(VoltagePolicy::Permissive)
                .voltage_policy,
            VoltagePolicy::Permissive
        );
    }
}
