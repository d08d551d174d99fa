//! Energy-aware candidate solution.

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::config::{Field, Resolver};
use crate::error::{AnnealError, Result};
use crate::types::{EnergyCalculator, StateChange};

/// Probability of moving to a candidate under the Metropolis criterion.
///
/// `delta` is `current_energy - candidate_energy`, so a positive delta is
/// an improvement and is always accepted. Otherwise the probability is
/// `e^(delta / temperature)`, capped at 1. At or below zero temperature a
/// non-improving move is never accepted.
///
/// # Examples
///
/// ```
/// use u_anneal::acceptance_probability;
///
/// assert_eq!(acceptance_probability(2.0, 0.0), 1.0);
/// assert_eq!(acceptance_probability(0.0, 10_000.0), 1.0);
/// assert_eq!(acceptance_probability(-1.0, 0.0), 0.0);
/// assert!((acceptance_probability(-1.0, 1.0) - (-1.0f64).exp()).abs() < 1e-12);
/// ```
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta > 0.0 {
        1.0
    } else if temperature > 0.0 {
        (delta / temperature).exp().min(1.0)
    } else {
        0.0
    }
}

/// A solution value together with its temperature and lazily computed
/// energy.
///
/// A `State` never mutates its value. Cooling produces either a new
/// `State` around a neighbor, or the same value at the new temperature.
pub struct State<S> {
    value: S,
    temperature: f64,
    energy_calculator: Arc<dyn EnergyCalculator<S>>,
    state_change: Arc<dyn StateChange<S>>,
    energy: OnceCell<f64>,
}

impl<S: 'static> State<S> {
    /// Wraps `value` using the energy calculator and state change resolved
    /// from `resolver`.
    ///
    /// Fails with [`AnnealError::MissingStrategy`] if either is absent at
    /// every layer.
    pub fn new(value: S, temperature: f64, resolver: &Resolver<'_, S>) -> Result<Self> {
        let energy_calculator = resolver
            .energy_calculator()
            .ok_or(AnnealError::MissingStrategy(Field::EnergyCalculator))?;
        let state_change = resolver
            .state_change()
            .ok_or(AnnealError::MissingStrategy(Field::StateChange))?;
        Ok(Self::with_strategies(
            value,
            temperature,
            energy_calculator,
            state_change,
        ))
    }
}

impl<S> State<S> {
    /// Wraps `value` with explicit strategies.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use rand::RngCore;
    /// use u_anneal::State;
    ///
    /// let state = State::with_strategies(
    ///     vec![3, 1, 2],
    ///     100.0,
    ///     Arc::new(|v: &Vec<i32>| v[0] as f64),
    ///     Arc::new(|v: &Vec<i32>, _: &mut dyn RngCore| v.clone()),
    /// );
    /// assert_eq!(state.energy(), 3.0);
    /// assert_eq!(state.temperature(), 100.0);
    /// ```
    pub fn with_strategies(
        value: S,
        temperature: f64,
        energy_calculator: Arc<dyn EnergyCalculator<S>>,
        state_change: Arc<dyn StateChange<S>>,
    ) -> Self {
        Self {
            value,
            temperature,
            energy_calculator,
            state_change,
            energy: OnceCell::new(),
        }
    }

    /// The wrapped solution value.
    pub fn value(&self) -> &S {
        &self.value
    }

    /// Unwraps the solution value.
    pub fn into_value(self) -> S {
        self.value
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Energy of the wrapped value, computed on first access only.
    pub fn energy(&self) -> f64 {
        *self
            .energy
            .get_or_init(|| self.energy_calculator.energy(&self.value))
    }

    /// Moves to a neighbor at `temperature`, or stays put.
    ///
    /// A neighbor is generated with the state change strategy and kept if
    /// [`State::better_than`] accepts it. Otherwise `self` is returned at
    /// the new temperature; its cached energy is kept.
    pub fn cooled<R: RngCore>(mut self, temperature: f64, rng: &mut R) -> Self {
        let candidate = self.neighbor(temperature, rng);
        if self.better_than(&candidate, rng) {
            candidate
        } else {
            self.temperature = temperature;
            self
        }
    }

    /// Whether `candidate` should replace `self` under the Metropolis
    /// criterion, evaluated at the candidate's temperature.
    ///
    /// An improvement is accepted without drawing. Any other candidate
    /// costs exactly one uniform draw from `rng`, even when its
    /// acceptance probability is zero.
    pub fn better_than<R: RngCore + ?Sized>(&self, candidate: &State<S>, rng: &mut R) -> bool {
        let delta = self.energy() - candidate.energy();
        if delta > 0.0 {
            return true;
        }
        let draw: f64 = rng.random();
        draw < acceptance_probability(delta, candidate.temperature)
    }

    fn neighbor<R: RngCore>(&self, temperature: f64, rng: &mut R) -> Self {
        let value = self.state_change.change(&self.value, rng);
        Self::with_strategies(
            value,
            temperature,
            Arc::clone(&self.energy_calculator),
            Arc::clone(&self.state_change),
        )
    }
}

impl<S: fmt::Debug> fmt::Display for State<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.4}:{:.4}:{:?}",
            self.temperature,
            self.energy(),
            self.value
        )
    }
}

impl<S: fmt::Debug> fmt::Debug for State<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &self.value)
            .field("temperature", &self.temperature)
            .field("energy", &self.energy.get())
            .finish()
    }
}
