//! Domain-agnostic simulated annealing engine.
//!
//! Callers supply a solution type and the domain strategies (an energy
//! function and a neighbor function); the engine supplies the annealing
//! control logic:
//!
//! - **Configuration**: global defaults per solution type, an instance
//!   layer per [`Simulator`], and a call-time layer per run, resolved
//!   field by field through a [`Resolver`].
//! - **State**: a [`State`] wraps a solution with a memoized energy and
//!   implements the Metropolis acceptance criterion.
//! - **Cooling**: [`Cooler`] provides linear, exponential and geometric
//!   schedules; any `Fn(f64, f64, f64, u64) -> f64` works too.
//! - **Termination**: [`Terminator`] provides temperature and energy based
//!   stop conditions; any `Fn(&S, f64, f64) -> bool` works too.
//!
//! - **Built-ins**: [`RandomSwap`] reorders a vector and [`AdjacentPairs`]
//!   sums a pairwise cost along it.
//!
//! Progress is reported through [`tracing`] events; install a subscriber
//! to see them.
//!
//! # Examples
//!
//! ```
//! use u_anneal::{simulate, Overrides, RandomSwap};
//!
//! let sorted_cost = |v: &Vec<u32>| {
//!     v.windows(2).filter(|w| w[0] > w[1]).count() as f64
//! };
//!
//! let best = simulate(
//!     vec![5, 3, 1, 4, 2],
//!     Overrides::new()
//!         .with_temperature(10.0)
//!         .with_cooling_rate(0.001)
//!         .with_energy_calculator(sorted_cost)
//!         .with_state_change(RandomSwap)
//!         .with_seed(42),
//! )
//! .unwrap();
//! assert_eq!(best.len(), 5);
//! ```
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

pub mod config;
pub mod energies;
pub mod error;
pub mod neighbors;
pub mod simulator;
pub mod state;
pub mod types;

pub use config::{
    configuration, configure, reset_configuration, Configuration, Cooler, Field, Overrides,
    Resolver, Terminator,
};
pub use energies::AdjacentPairs;
pub use error::{AnnealError, Result};
pub use neighbors::RandomSwap;
pub use simulator::Simulator;
pub use state::{acceptance_probability, State};
pub use types::{CoolDown, EnergyCalculator, StateChange, Termination};

/// Anneals `initial` and returns the final solution value.
///
/// Builds a [`Simulator`] with no instance layer and runs it with
/// `overrides` as the call-time layer; anything not overridden comes from
/// the global [`Configuration`] for `S`.
pub fn simulate<S: std::fmt::Debug + 'static>(initial: S, overrides: Overrides<S>) -> Result<S> {
    Simulator::new()
        .run(initial, overrides)
        .map(State::into_value)
}
