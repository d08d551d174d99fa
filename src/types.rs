//! Strategy traits for simulated annealing.
//!
//! The engine is generic over the solution type `S`. Callers plug in four
//! strategies, each with a single call signature:
//!
//! | Strategy | Signature |
//! |----------|-----------|
//! | [`EnergyCalculator`] | `(&S) -> f64` |
//! | [`StateChange`] | `(&S, &mut dyn RngCore) -> S` |
//! | [`CoolDown`] | `(energy, temperature, cooling_rate, step) -> f64` |
//! | [`Termination`] | `(&S, energy, temperature) -> bool` |
//!
//! Every trait has a blanket implementation for closures of the matching
//! shape, so plain closures work wherever a strategy is expected.

use rand::RngCore;

/// Computes the energy (cost) of a solution. Lower is better.
///
/// # Examples
///
/// ```
/// use u_anneal::EnergyCalculator;
///
/// let tour_length = |tour: &Vec<f64>| tour.iter().sum::<f64>();
/// assert_eq!(tour_length.energy(&vec![1.0, 2.5]), 3.5);
/// ```
pub trait EnergyCalculator<S>: Send + Sync {
    /// Returns the energy of `state`.
    fn energy(&self, state: &S) -> f64;
}

impl<S, F> EnergyCalculator<S> for F
where
    F: Fn(&S) -> f64 + Send + Sync,
{
    fn energy(&self, state: &S) -> f64 {
        self(state)
    }
}

/// Generates a neighbor (candidate) from the current solution.
///
/// The neighbor should be a small perturbation of `state`, and the
/// neighborhood must be connected: any solution reachable from any other
/// via a sequence of moves. Randomness must come from `rng` so that runs
/// can be reproduced with a seeded source.
pub trait StateChange<S>: Send + Sync {
    /// Produces a new candidate solution. `state` is never mutated.
    fn change(&self, state: &S, rng: &mut dyn RngCore) -> S;
}

impl<S, F> StateChange<S> for F
where
    F: Fn(&S, &mut dyn RngCore) -> S + Send + Sync,
{
    fn change(&self, state: &S, rng: &mut dyn RngCore) -> S {
        self(state, rng)
    }
}

/// Maps the current temperature to the next one.
///
/// `step` is 1-based: the first cooling of a run receives `1`.
pub trait CoolDown: Send + Sync {
    /// Returns the next temperature.
    fn cool(&self, energy: f64, temperature: f64, cooling_rate: f64, step: u64) -> f64;
}

impl<F> CoolDown for F
where
    F: Fn(f64, f64, f64, u64) -> f64 + Send + Sync,
{
    fn cool(&self, energy: f64, temperature: f64, cooling_rate: f64, step: u64) -> f64 {
        self(energy, temperature, cooling_rate, step)
    }
}

/// Decides when a simulation stops.
///
/// Checked after initialization and after every step. A wall-clock or
/// step budget belongs here too, since the engine has no other
/// cancellation mechanism.
pub trait Termination<S>: Send + Sync {
    /// Returns `true` to stop the simulation.
    fn should_stop(&self, state: &S, energy: f64, temperature: f64) -> bool;
}

impl<S, F> Termination<S> for F
where
    F: Fn(&S, f64, f64) -> bool + Send + Sync,
{
    fn should_stop(&self, state: &S, energy: f64, temperature: f64) -> bool {
        self(state, energy, temperature)
    }
}
