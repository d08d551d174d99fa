//! Built-in energy strategies.

use crate::types::EnergyCalculator;

/// Sums a pairwise cost over consecutive elements of a vector.
///
/// For `[a, b, c]` the energy is `cost(a, b) + cost(b, c)`. Vectors with
/// fewer than two elements have zero energy. Pairs with [`RandomSwap`]
/// for ordering problems such as routes and layouts.
///
/// [`RandomSwap`]: crate::RandomSwap
///
/// # Examples
///
/// ```
/// use u_anneal::{AdjacentPairs, EnergyCalculator};
///
/// let gaps = AdjacentPairs(|a: &i32, b: &i32| (a - b).abs() as f64);
/// assert_eq!(gaps.energy(&vec![1, 4, 2]), 5.0);
/// assert_eq!(gaps.energy(&vec![7]), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjacentPairs<F>(pub F);

impl<T, F> EnergyCalculator<Vec<T>> for AdjacentPairs<F>
where
    F: Fn(&T, &T) -> f64 + Send + Sync,
{
    fn energy(&self, state: &Vec<T>) -> f64 {
        state.windows(2).map(|pair| (self.0)(&pair[0], &pair[1])).sum()
    }
}
