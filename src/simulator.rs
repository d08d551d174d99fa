//! Simulation driver.
//!
//! # Algorithm
//!
//! 1. Validate the resolved temperature, cooling rate, cooling schedule
//!    and termination condition
//! 2. Wrap the initial value in a [`State`] at the initial temperature
//! 3. While the termination condition is false:
//!    a. Increment the step counter
//!    b. Ask the cooling schedule for the next temperature
//!    c. Cool the state (Metropolis acceptance of one neighbor)
//! 4. Return the final state
//!
//! # Reference
//!
//! Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::{Field, Overrides, Resolver};
use crate::error::{AnnealError, Result};
use crate::state::State;
use crate::types::{CoolDown, Termination};

/// Validated control parameters, resolved once per run.
struct Schedule<S> {
    temperature: f64,
    cooling_rate: f64,
    cool_down: Arc<dyn CoolDown>,
    termination_condition: Arc<dyn Termination<S>>,
}

impl<S: 'static> Schedule<S> {
    fn resolve(resolver: &Resolver<'_, S>) -> Result<Self> {
        let temperature = resolver.temperature();
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(AnnealError::configuration(
                Field::Temperature,
                format!("initial temperature must be finite and non-negative, got {temperature}"),
            ));
        }

        let cooling_rate = resolver.cooling_rate();
        if cooling_rate.is_nan() || cooling_rate < 0.0 {
            return Err(AnnealError::configuration(
                Field::CoolingRate,
                format!("cooling rate cannot be negative, got {cooling_rate}"),
            ));
        }

        let cool_down = resolver.cool_down().ok_or_else(|| {
            AnnealError::configuration(Field::CoolDown, "missing cool down function")
        })?;

        let termination_condition = resolver.termination_condition().ok_or_else(|| {
            AnnealError::configuration(
                Field::TerminationCondition,
                "missing termination condition function",
            )
        })?;

        Ok(Self {
            temperature,
            cooling_rate,
            cool_down,
            termination_condition,
        })
    }

    fn should_stop(&self, state: &State<S>) -> bool {
        self.termination_condition
            .should_stop(state.value(), state.energy(), state.temperature())
    }
}

/// Runs simulated annealing from a caller-supplied initial value.
///
/// The simulator owns an instance [`Overrides`] layer. Each run may add a
/// call-time layer on top; it is discarded when the run returns, whether
/// it succeeded or not. Because the call-time layer lives on the caller's
/// stack, a shared simulator can serve concurrent runs.
///
/// # Examples
///
/// ```
/// use rand::RngCore;
/// use u_anneal::{Overrides, Simulator};
///
/// let simulator = Simulator::with_overrides(
///     Overrides::new()
///         .with_energy_calculator(|x: &i64| (x * x) as f64)
///         .with_state_change(|x: &i64, rng: &mut dyn RngCore| {
///             if rng.next_u32() % 2 == 0 { x - 1 } else { x + 1 }
///         })
///         .with_seed(42),
/// );
///
/// let state = simulator
///     .run(25, Overrides::new().with_temperature(100.0).with_cooling_rate(0.1))
///     .unwrap();
/// assert!(state.temperature() <= 0.0);
/// ```
pub struct Simulator<S> {
    overrides: Overrides<S>,
}

impl<S> Default for Simulator<S> {
    fn default() -> Self {
        Self {
            overrides: Overrides::default(),
        }
    }
}

impl<S> fmt::Debug for Simulator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("overrides", &self.overrides)
            .finish()
    }
}

impl<S: fmt::Debug + 'static> Simulator<S> {
    /// Creates a simulator that resolves everything from the global
    /// configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator with an instance configuration layer.
    pub fn with_overrides(overrides: Overrides<S>) -> Self {
        Self { overrides }
    }

    /// The instance layer.
    pub fn overrides(&self) -> &Overrides<S> {
        &self.overrides
    }

    /// Runs `body` with `local` installed as the call-time layer.
    ///
    /// The layer is removed on every exit path. See [`Resolver::scoped`].
    pub fn with_configuration_overrides<R>(
        &self,
        local: Overrides<S>,
        body: impl FnOnce(&Resolver<'_, S>) -> R,
    ) -> R {
        Resolver::scoped(&self.overrides, local, body)
    }

    /// Runs a simulation from `initial` with call-time `overrides`.
    ///
    /// The random source is seeded from the resolved `seed`, or from
    /// system entropy when no layer sets one.
    pub fn run(&self, initial: S, overrides: Overrides<S>) -> Result<State<S>> {
        self.with_configuration_overrides(overrides, |resolver| {
            let mut rng = match resolver.seed() {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            Self::simulate(initial, resolver, &mut rng)
        })
    }

    /// Runs a simulation with a caller-supplied random source.
    ///
    /// Any resolved `seed` is ignored.
    pub fn run_with_rng<R: Rng>(
        &self,
        initial: S,
        overrides: Overrides<S>,
        rng: &mut R,
    ) -> Result<State<S>> {
        self.with_configuration_overrides(overrides, |resolver| {
            Self::simulate(initial, resolver, rng)
        })
    }

    fn simulate<R: Rng>(
        initial: S,
        resolver: &Resolver<'_, S>,
        rng: &mut R,
    ) -> Result<State<S>> {
        let schedule = Schedule::resolve(resolver)?;
        let mut current = State::new(initial, schedule.temperature, resolver)?;
        info!(
            temperature = schedule.temperature,
            cooling_rate = schedule.cooling_rate,
            "original state: {current}"
        );

        let mut steps = 0u64;
        while !schedule.should_stop(&current) {
            steps += 1;
            let next_temperature = schedule.cool_down.cool(
                current.energy(),
                current.temperature(),
                schedule.cooling_rate,
                steps,
            );
            current = current.cooled(next_temperature, rng);
            trace!(
                step = steps,
                temperature = current.temperature(),
                energy = current.energy(),
                "cooled"
            );
        }

        debug!(steps, "termination condition met");
        info!(steps, "optimized state: {current}");
        Ok(current)
    }
}
