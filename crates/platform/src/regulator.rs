//! Voltage regulator abstraction
//!
//! Panel drivers only care about three things from a supply: turning it on,
//! turning it off, and whether it can be programmed inside a voltage window.
//! Looking regulators up by label is the job of a [`SupplyProvider`].

/// A single voltage regulator output.
pub trait Regulator {
    /// Regulator error type
    type Error: core::fmt::Debug;

    /// Enable the output.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Disable the output.
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// `true` if the regulator can produce some voltage within
    /// `min_uv..=max_uv` microvolts.
    fn is_supported_voltage(&self, min_uv: i32, max_uv: i32) -> bool;
}

/// Looks regulators up by supply label.
///
/// Drivers call [`get`](Self::get) once per entry of their supply table, which
/// makes a sequence of lookups equivalent to a single bulk get.
pub trait SupplyProvider {
    /// Regulator handle type
    type Regulator: Regulator;

    /// Look up the regulator feeding `label`.
    fn get(
        &mut self,
        label: &'static str,
    ) -> Result<Self::Regulator, <Self::Regulator as Regulator>::Error>;
}
