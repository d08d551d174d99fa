//! Built-in cooling schedules.

use crate::config::Field;
use crate::error::{AnnealError, Result};
use crate::types::CoolDown;

/// Built-in cooling schedule.
///
/// Every schedule subtracts a step-dependent amount from the current
/// temperature; `step` starts at 1, so the first step of every schedule
/// removes exactly `cooling_rate`.
///
/// # Examples
///
/// ```
/// use u_anneal::{CoolDown, Cooler};
///
/// let linear = Cooler::Linear;
/// assert!((linear.cool(0.0, 500.0, 0.05, 5) - 499.95).abs() < 1e-9);
///
/// let geometric = Cooler::geometric(3.0).unwrap();
/// assert!((geometric.cool(0.0, 500.0, 0.05, 5) - 495.95).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cooler {
    /// Linear cooling: `T_{k+1} = T_k - rate`.
    #[default]
    Linear,

    /// Exponential cooling: `T_{k+1} = T_k - e^(k - 1) * rate`.
    ///
    /// Behaves like linear on the first step, then accelerates quickly.
    Exponential,

    /// Geometric cooling: `T_{k+1} = T_k - rate * ratio^(k - 1)`.
    ///
    /// Build through [`Cooler::geometric`] so the ratio is checked.
    Geometric {
        /// Growth ratio of the decrement. Must be positive.
        ratio: f64,
    },
}

impl Cooler {
    /// Ratio used by [`Cooler::default_geometric`].
    pub const DEFAULT_GEOMETRIC_RATIO: f64 = 2.0;

    /// Creates a geometric schedule, rejecting a non-positive `ratio`.
    pub fn geometric(ratio: f64) -> Result<Self> {
        if ratio.is_nan() || ratio <= 0.0 {
            return Err(AnnealError::configuration(
                Field::CoolDown,
                format!("geometric ratio must be positive, got {ratio}"),
            ));
        }
        Ok(Cooler::Geometric { ratio })
    }

    /// Geometric schedule with ratio 2.
    pub fn default_geometric() -> Self {
        Cooler::Geometric {
            ratio: Self::DEFAULT_GEOMETRIC_RATIO,
        }
    }
}

impl CoolDown for Cooler {
    fn cool(&self, _energy: f64, temperature: f64, cooling_rate: f64, step: u64) -> f64 {
        // Step 0 never reaches a schedule; treat it like step 1.
        let exponent = step.saturating_sub(1) as f64;
        match *self {
            Cooler::Linear => temperature - cooling_rate,
            Cooler::Exponential => temperature - exponent.exp() * cooling_rate,
            Cooler::Geometric { ratio } => temperature - cooling_rate * ratio.powf(exponent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEMPERATURE: f64 = 500.0;
    const COOLING_RATE: f64 = 0.05;
    const STEP: u64 = 5;

    #[test]
    fn test_linear_reduces_by_rate() {
        let next = Cooler::Linear.cool(0.0, TEMPERATURE, COOLING_RATE, STEP);
        assert!((next - 499.95).abs() < 1e-9, "got {next}");
    }

    #[test]
    fn test_exponential_reduces_by_exp_of_step() {
        let next = Cooler::Exponential.cool(0.0, TEMPERATURE, COOLING_RATE, STEP);
        let expected = TEMPERATURE - 4f64.exp() * COOLING_RATE;
        assert!((next - expected).abs() < 1e-9, "got {next}");
        assert!((next - 497.27).abs() < 0.01, "got {next}");
    }

    #[test]
    fn test_geometric_reduces_by_ratio_power() {
        let cooler = Cooler::geometric(3.0).unwrap();
        let next = cooler.cool(0.0, TEMPERATURE, COOLING_RATE, STEP);
        assert!((next - 495.95).abs() < 1e-9, "got {next}");
    }

    #[test]
    fn test_default_geometric_ratio() {
        assert_eq!(Cooler::default_geometric(), Cooler::Geometric { ratio: 2.0 });
        let next = Cooler::default_geometric().cool(0.0, 100.0, 1.0, 4);
        assert!((next - 92.0).abs() < 1e-9, "got {next}");
    }

    #[test]
    fn test_geometric_rejects_non_positive_ratio() {
        for ratio in [0.0, -2.0, f64::NAN] {
            let err = Cooler::geometric(ratio).unwrap_err();
            assert_eq!(err.field(), Field::CoolDown, "ratio {ratio}");
        }
    }

    #[test]
    fn test_custom_closure_is_a_cool_down() {
        let halve = |_e: f64, t: f64, _r: f64, _s: u64| t / 2.0;
        assert_eq!(halve.cool(0.0, 8.0, 1.0, 1), 4.0);
    }

    proptest! {
        #[test]
        fn prop_first_step_is_linear(
            temperature in 0.0f64..1e6,
            rate in 0.0f64..100.0,
            ratio in 0.01f64..10.0,
        ) {
            let linear = Cooler::Linear.cool(0.0, temperature, rate, 1);
            let exponential = Cooler::Exponential.cool(0.0, temperature, rate, 1);
            let geometric = Cooler::Geometric { ratio }.cool(0.0, temperature, rate, 1);
            prop_assert!((linear - exponential).abs() < 1e-9);
            prop_assert!((linear - geometric).abs() < 1e-9);
        }

        #[test]
        fn prop_linear_ignores_energy_and_step(
            energy in -1e3f64..1e3,
            temperature in 0.0f64..1e6,
            rate in 0.0f64..100.0,
            step in 1u64..10_000,
        ) {
            let next = Cooler::Linear.cool(energy, temperature, rate, step);
            prop_assert!((next - (temperature - rate)).abs() < 1e-9);
        }

        #[test]
        fn prop_exponential_never_cools_slower_than_linear(
            temperature in 0.0f64..1e6,
            rate in 0.0f64..100.0,
            step in 1u64..20,
        ) {
            let linear = Cooler::Linear.cool(0.0, temperature, rate, step);
            let exponential = Cooler::Exponential.cool(0.0, temperature, rate, step);
            prop_assert!(exponential <= linear + 1e-9);
        }
    }
}
