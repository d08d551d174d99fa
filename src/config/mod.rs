//! Annealing configuration.
//!
//! Parameters are resolved through three layers, highest precedence first:
//!
//! 1. **Call-time** [`Overrides`] passed to a single [`Simulator::run`].
//! 2. **Instance** [`Overrides`] fixed when the [`Simulator`] is built.
//! 3. **Global** [`Configuration`], one per solution type, holding the
//!    defaults until changed through [`configure`].
//!
//! The [`Resolver`] walks these layers on every field access, so a change
//! to the global configuration is visible to the next run of an existing
//! simulator.
//!
//! [`Simulator`]: crate::Simulator
//! [`Simulator::run`]: crate::Simulator::run

mod coolers;
mod overrides;
mod terminators;

pub use coolers::Cooler;
pub use overrides::{Overrides, Resolver};
pub use terminators::Terminator;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::types::{CoolDown, EnergyCalculator, StateChange, Termination};

/// Default initial temperature.
pub const DEFAULT_TEMPERATURE: f64 = 10_000.0;

/// Default cooling rate.
pub const DEFAULT_COOLING_RATE: f64 = 0.0003;

/// Name of a configurable field, used in errors and introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Temperature,
    CoolingRate,
    EnergyCalculator,
    StateChange,
    CoolDown,
    TerminationCondition,
    Seed,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Temperature => "temperature",
            Field::CoolingRate => "cooling rate",
            Field::EnergyCalculator => "energy calculator",
            Field::StateChange => "state change",
            Field::CoolDown => "cool down",
            Field::TerminationCondition => "termination condition",
            Field::Seed => "seed",
        };
        f.write_str(name)
    }
}

/// Full set of annealing parameters for solution type `S`.
///
/// Assignment is unchecked: a negative temperature can be stored and is
/// only rejected when a simulation validates its resolved configuration.
/// A strategy set to `None` counts as missing.
///
/// # Examples
///
/// ```
/// use u_anneal::{Configuration, Cooler};
///
/// let mut config = Configuration::<Vec<u32>>::default();
/// config.temperature = 500.0;
/// config.set_cool_down(Cooler::Exponential);
/// config.set_energy_calculator(|tour: &Vec<u32>| tour.len() as f64);
/// assert!(config.energy_calculator.is_some());
/// assert!(config.state_change.is_none());
/// ```
pub struct Configuration<S> {
    /// Initial temperature. Must be non-negative.
    pub temperature: f64,

    /// Magnitude of each cooling step. Must be non-negative.
    pub cooling_rate: f64,

    /// Energy function. No default.
    pub energy_calculator: Option<Arc<dyn EnergyCalculator<S>>>,

    /// Neighbor function. No default.
    pub state_change: Option<Arc<dyn StateChange<S>>>,

    /// Cooling schedule. Defaults to [`Cooler::Linear`].
    pub cool_down: Option<Arc<dyn CoolDown>>,

    /// Stop condition. Defaults to [`Terminator::TemperatureIsZero`].
    pub termination_condition: Option<Arc<dyn Termination<S>>>,

    /// Random seed for reproducibility (None for entropy).
    pub seed: Option<u64>,
}

impl<S> Default for Configuration<S> {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            cooling_rate: DEFAULT_COOLING_RATE,
            energy_calculator: None,
            state_change: None,
            cool_down: Some(Arc::new(Cooler::Linear)),
            termination_condition: Some(Arc::new(Terminator::TemperatureIsZero)),
            seed: None,
        }
    }
}

impl<S> Clone for Configuration<S> {
    fn clone(&self) -> Self {
        Self {
            temperature: self.temperature,
            cooling_rate: self.cooling_rate,
            energy_calculator: self.energy_calculator.clone(),
            state_change: self.state_change.clone(),
            cool_down: self.cool_down.clone(),
            termination_condition: self.termination_condition.clone(),
            seed: self.seed,
        }
    }
}

impl<S> fmt::Debug for Configuration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("temperature", &self.temperature)
            .field("cooling_rate", &self.cooling_rate)
            .field("energy_calculator", &self.energy_calculator.is_some())
            .field("state_change", &self.state_change.is_some())
            .field("cool_down", &self.cool_down.is_some())
            .field("termination_condition", &self.termination_condition.is_some())
            .field("seed", &self.seed)
            .finish()
    }
}

impl<S> Configuration<S> {
    /// Sets the energy function.
    pub fn set_energy_calculator(&mut self, energy: impl EnergyCalculator<S> + 'static) {
        self.energy_calculator = Some(Arc::new(energy));
    }

    /// Sets the neighbor function.
    pub fn set_state_change(&mut self, change: impl StateChange<S> + 'static) {
        self.state_change = Some(Arc::new(change));
    }

    /// Sets the cooling schedule.
    pub fn set_cool_down(&mut self, cool_down: impl CoolDown + 'static) {
        self.cool_down = Some(Arc::new(cool_down));
    }

    /// Sets the stop condition.
    pub fn set_termination_condition(&mut self, condition: impl Termination<S> + 'static) {
        self.termination_condition = Some(Arc::new(condition));
    }
}

// ---------------------------------------------------------------------------
// Process-wide defaults
// ---------------------------------------------------------------------------

type Registry = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

fn registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(Default::default)
}

/// Reads the global configuration for `S`.
///
/// `f` runs under the registry's read lock and must not call back into
/// the registry. A type that was never configured reads the defaults.
pub(crate) fn read_global<S: 'static, T>(f: impl FnOnce(&Configuration<S>) -> T) -> T {
    {
        let guard = registry().read().unwrap_or_else(PoisonError::into_inner);
        if let Some(config) = guard
            .get(&TypeId::of::<S>())
            .and_then(|slot| slot.downcast_ref::<Configuration<S>>())
        {
            return f(config);
        }
    }
    f(&Configuration::default())
}

fn store_global<S: 'static>(config: Configuration<S>) {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(TypeId::of::<S>(), Box::new(config));
}

/// Mutates the global configuration for solution type `S`.
///
/// Returns a snapshot of the configuration after `f` ran. Changes are seen
/// by every simulator of `S` that does not override the field.
///
/// `f` runs on a copy with no lock held, so it may read or configure any
/// solution type, including `S`. The copy is written back when `f`
/// returns; a concurrent `configure` of the same `S` is overwritten.
///
/// The global layer has no run-level isolation: do not change it while
/// another thread is running a simulation of the same solution type.
///
/// # Examples
///
/// ```
/// use u_anneal::{configure, reset_configuration};
///
/// #[derive(Debug)]
/// struct Route(Vec<u8>);
///
/// let snapshot = configure::<Route>(|config| {
///     config.temperature = 1_000.0;
///     config.cooling_rate = 1.0;
/// });
/// assert_eq!(snapshot.temperature, 1_000.0);
///
/// reset_configuration::<Route>();
/// ```
pub fn configure<S: 'static>(f: impl FnOnce(&mut Configuration<S>)) -> Configuration<S> {
    let mut config = configuration::<S>();
    f(&mut config);
    store_global(config.clone());
    config
}

/// Returns a snapshot of the global configuration for `S`.
pub fn configuration<S: 'static>() -> Configuration<S> {
    read_global(|config: &Configuration<S>| config.clone())
}

/// Restores the global configuration for `S` to built-in defaults.
pub fn reset_configuration<S: 'static>() {
    store_global(Configuration::<S>::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Untouched;

    #[derive(Debug)]
    struct Configured;

    #[derive(Debug)]
    struct Reset;

    #[derive(Debug)]
    struct Reentrant;

    #[derive(Debug)]
    struct Neighbor;

    #[test]
    fn test_default_config() {
        let config = Configuration::<Vec<u32>>::default();
        assert!((config.temperature - 10_000.0).abs() < 1e-10);
        assert!((config.cooling_rate - 0.0003).abs() < 1e-15);
        assert!(config.energy_calculator.is_none());
        assert!(config.state_change.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_default_cool_down_is_linear() {
        let config = Configuration::<Vec<u32>>::default();
        let cool_down = config.cool_down.expect("default cool down");
        assert_eq!(cool_down.cool(0.0, 2.0, 1.0, 1), 1.0);
    }

    #[test]
    fn test_default_termination_is_temperature_zero() {
        let config = Configuration::<Vec<u32>>::default();
        let condition = config.termination_condition.expect("default condition");
        let state = vec![];
        assert!(!condition.should_stop(&state, 0.0, 1.0));
        assert!(condition.should_stop(&state, 0.0, 0.0));
        assert!(condition.should_stop(&state, 0.0, -1.0));
    }

    #[test]
    fn test_unconfigured_type_reads_defaults() {
        let config = configuration::<Untouched>();
        assert!((config.temperature - DEFAULT_TEMPERATURE).abs() < 1e-10);
        assert!(config.cool_down.is_some());
    }

    #[test]
    fn test_configure_mutates_global() {
        let snapshot = configure::<Configured>(|config| {
            config.temperature = 42.0;
            config.cooling_rate = 2.0;
            config.seed = Some(7);
            config.set_energy_calculator(|_: &Configured| 1.0);
        });
        assert_eq!(snapshot.temperature, 42.0);

        let config = configuration::<Configured>();
        assert_eq!(config.temperature, 42.0);
        assert_eq!(config.cooling_rate, 2.0);
        assert_eq!(config.seed, Some(7));
        assert!(config.energy_calculator.is_some());
    }

    #[test]
    fn test_assignment_is_unchecked() {
        let mut config = Configuration::<Vec<u32>>::default();
        config.temperature = -5.0;
        config.cooling_rate = -1.0;
        assert_eq!(config.temperature, -5.0);
        assert_eq!(config.cooling_rate, -1.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        configure::<Reset>(|config| {
            config.temperature = 1.0;
            config.cool_down = None;
        });
        reset_configuration::<Reset>();

        let config = configuration::<Reset>();
        assert!((config.temperature - DEFAULT_TEMPERATURE).abs() < 1e-10);
        assert!(config.cool_down.is_some());
    }

    #[test]
    fn test_configure_callback_can_use_the_registry() {
        let (done, finished) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            configure::<Reentrant>(|config| config.temperature = 5.0);
            let snapshot = configure::<Reentrant>(|config| {
                config.temperature = configuration::<Reentrant>().temperature + 1.0;
                configure::<Neighbor>(|other| other.cooling_rate = 3.0);
                reset_configuration::<Untouched>();
            });
            let _ = done.send(snapshot.temperature);
        });

        let temperature = finished
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("configure callback returned");
        assert_eq!(temperature, 6.0);
        assert_eq!(configuration::<Reentrant>().temperature, 6.0);
        assert_eq!(configuration::<Neighbor>().cooling_rate, 3.0);
    }

    #[test]
    fn test_global_is_per_solution_type() {
        configure::<Configured>(|config| config.cooling_rate = 2.0);
        assert!((configuration::<Untouched>().cooling_rate - DEFAULT_COOLING_RATE).abs() < 1e-15);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::CoolingRate.to_string(), "cooling rate");
        assert_eq!(Field::TerminationCondition.to_string(), "termination condition");
    }
}
