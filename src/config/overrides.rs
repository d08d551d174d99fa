//! Scoped configuration layers.

use std::fmt;
use std::sync::Arc;

use super::{read_global, Configuration, Field};
use crate::types::{CoolDown, EnergyCalculator, StateChange, Termination};

/// A partial configuration layer.
///
/// Every field is optional; an unset field falls through to the next
/// layer. Used both for a simulator's instance layer and for the call-time
/// layer of a single run.
///
/// # Examples
///
/// ```
/// use u_anneal::{Cooler, Field, Overrides};
///
/// let overrides = Overrides::<Vec<u32>>::new()
///     .with_temperature(999.0)
///     .with_cooling_rate(1.0)
///     .with_cool_down(Cooler::Exponential);
/// assert_eq!(
///     overrides.fields(),
///     vec![Field::Temperature, Field::CoolingRate, Field::CoolDown]
/// );
/// ```
pub struct Overrides<S> {
    pub temperature: Option<f64>,
    pub cooling_rate: Option<f64>,
    pub energy_calculator: Option<Arc<dyn EnergyCalculator<S>>>,
    pub state_change: Option<Arc<dyn StateChange<S>>>,
    pub cool_down: Option<Arc<dyn CoolDown>>,
    pub termination_condition: Option<Arc<dyn Termination<S>>>,
    pub seed: Option<u64>,
}

impl<S> Default for Overrides<S> {
    fn default() -> Self {
        Self {
            temperature: None,
            cooling_rate: None,
            energy_calculator: None,
            state_change: None,
            cool_down: None,
            termination_condition: None,
            seed: None,
        }
    }
}

impl<S> Clone for Overrides<S> {
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

impl<S> fmt::Debug for Overrides<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("temperature", &self.temperature)
            .field("cooling_rate", &self.cooling_rate)
            .field("seed", &self.seed)
            .field("fields", &self.fields())
            .finish()
    }
}

impl<S> From<Configuration<S>> for Overrides<S> {
    fn from(config: Configuration<S>) -> Self {
        Self {
            temperature: Some(config.temperature),
            cooling_rate: Some(config.cooling_rate),
            energy_calculator: config.energy_calculator,
            state_change: config.state_change,
            cool_down: config.cool_down,
            termination_condition: config.termination_condition,
            seed: config.seed,
        }
    }
}

impl<S> Overrides<S> {
    /// Creates an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_cooling_rate(mut self, cooling_rate: f64) -> Self {
        self.cooling_rate = Some(cooling_rate);
        self
    }

    pub fn with_energy_calculator(mut self, energy: impl EnergyCalculator<S> + 'static) -> Self {
        self.energy_calculator = Some(Arc::new(energy));
        self
    }

    pub fn with_state_change(mut self, change: impl StateChange<S> + 'static) -> Self {
        self.state_change = Some(Arc::new(change));
        self
    }

    pub fn with_cool_down(mut self, cool_down: impl CoolDown + 'static) -> Self {
        self.cool_down = Some(Arc::new(cool_down));
        self
    }

    pub fn with_termination_condition(
        mut self,
        condition: impl Termination<S> + 'static,
    ) -> Self {
        self.termination_condition = Some(Arc::new(condition));
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Lists the fields set in this layer, in declaration order.
    pub fn fields(&self) -> Vec<Field> {
        [
            (Field::Temperature, self.temperature.is_some()),
            (Field::CoolingRate, self.cooling_rate.is_some()),
            (Field::EnergyCalculator, self.energy_calculator.is_some()),
            (Field::StateChange, self.state_change.is_some()),
            (Field::CoolDown, self.cool_down.is_some()),
            (Field::TerminationCondition, self.termination_condition.is_some()),
            (Field::Seed, self.seed.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
        .collect()
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Returns a new layer where fields set in `top` replace those in `self`.
    pub fn merge(&self, top: &Overrides<S>) -> Overrides<S> {
        Overrides {
            temperature: top.temperature.or(self.temperature),
            cooling_rate: top.cooling_rate.or(self.cooling_rate),
            energy_calculator: top
                .energy_calculator
                .clone()
                .or_else(|| self.energy_calculator.clone()),
            state_change: top
                .state_change
                .clone()
                .or_else(|| self.state_change.clone()),
            cool_down: top.cool_down.clone().or_else(|| self.cool_down.clone()),
            termination_condition: top
                .termination_condition
                .clone()
                .or_else(|| self.termination_condition.clone()),
            seed: top.seed.or(self.seed),
        }
    }
}

/// Resolves fields through the call-time, instance and global layers.
///
/// Nothing is cached: every accessor walks the layers again, so it sees
/// the global configuration as it is at the moment of the call. A resolver
/// only lives inside [`Resolver::scoped`], which guarantees the call-time
/// layer is gone once the body returns.
pub struct Resolver<'a, S> {
    instance: &'a Overrides<S>,
    local: &'a Overrides<S>,
}

impl<'a, S: 'static> Resolver<'a, S> {
    /// Installs `local` as the call-time layer on top of `instance` for
    /// the duration of `body`.
    ///
    /// The call-time layer is owned by this stack frame and dropped on
    /// every exit path, including `?` returns and panics inside `body`.
    /// Neither `instance` nor the global configuration is modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_anneal::{Overrides, Resolver};
    ///
    /// let instance = Overrides::<Vec<u32>>::new().with_temperature(100.0);
    /// let local = Overrides::new().with_temperature(1_000.0);
    ///
    /// let inside = Resolver::scoped(&instance, local, |resolver| resolver.temperature());
    /// assert_eq!(inside, 1_000.0);
    ///
    /// let after = Resolver::scoped(&instance, Overrides::new(), |resolver| resolver.temperature());
    /// assert_eq!(after, 100.0);
    /// ```
    pub fn scoped<R>(
        instance: &Overrides<S>,
        local: Overrides<S>,
        body: impl FnOnce(&Resolver<'_, S>) -> R,
    ) -> R {
        let resolver = Resolver {
            instance,
            local: &local,
        };
        body(&resolver)
    }

    pub fn temperature(&self) -> f64 {
        self.local
            .temperature
            .or(self.instance.temperature)
            .unwrap_or_else(|| read_global(|config: &Configuration<S>| config.temperature))
    }

    pub fn cooling_rate(&self) -> f64 {
        self.local
            .cooling_rate
            .or(self.instance.cooling_rate)
            .unwrap_or_else(|| read_global(|config: &Configuration<S>| config.cooling_rate))
    }

    pub fn seed(&self) -> Option<u64> {
        self.local
            .seed
            .or(self.instance.seed)
            .or_else(|| read_global(|config: &Configuration<S>| config.seed))
    }

    pub fn energy_calculator(&self) -> Option<Arc<dyn EnergyCalculator<S>>> {
        self.local
            .energy_calculator
            .clone()
            .or_else(|| self.instance.energy_calculator.clone())
            .or_else(|| read_global(|config: &Configuration<S>| config.energy_calculator.clone()))
    }

    pub fn state_change(&self) -> Option<Arc<dyn StateChange<S>>> {
        self.local
            .state_change
            .clone()
            .or_else(|| self.instance.state_change.clone())
            .or_else(|| read_global(|config: &Configuration<S>| config.state_change.clone()))
    }

    pub fn cool_down(&self) -> Option<Arc<dyn CoolDown>> {
        self.local
            .cool_down
            .clone()
            .or_else(|| self.instance.cool_down.clone())
            .or_else(|| read_global(|config: &Configuration<S>| config.cool_down.clone()))
    }

    pub fn termination_condition(&self) -> Option<Arc<dyn Termination<S>>> {
        self.local
            .termination_condition
            .clone()
            .or_else(|| self.instance.termination_condition.clone())
            .or_else(|| {
                read_global(|config: &Configuration<S>| config.termination_condition.clone())
            })
    }

    /// Returns the instance layer merged with the call-time layer.
    ///
    /// Global values are not included.
    pub fn configuration_overrides(&self) -> Overrides<S> {
        self.instance.merge(self.local)
    }
}
