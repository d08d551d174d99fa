//! Built-in termination conditions.

use crate::types::Termination;

/// Built-in stop condition.
///
/// # Examples
///
/// ```
/// use u_anneal::{Termination, Terminator};
///
/// let stop = Terminator::EnergyOrTemperatureIsZero;
/// assert!(stop.should_stop(&(), 0.0, 10.0));
/// assert!(!stop.should_stop(&(), 3.0, 10.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminator {
    /// Stops once the temperature is at or below zero.
    #[default]
    TemperatureIsZero,

    /// Stops on a zero-energy state, or once the temperature is at or
    /// below zero.
    EnergyOrTemperatureIsZero,
}

impl<S> Termination<S> for Terminator {
    fn should_stop(&self, _state: &S, energy: f64, temperature: f64) -> bool {
        let frozen = temperature <= 0.0;
        match self {
            Terminator::TemperatureIsZero => frozen,
            Terminator::EnergyOrTemperatureIsZero => energy <= 0.0 || frozen,
        }
    }
}
