//! Built-in neighbor strategies.

use rand::{Rng, RngCore};

use crate::types::StateChange;

/// Swaps two uniformly chosen positions of a vector.
///
/// Both indices are drawn independently, so a move may pick the same
/// position twice and leave the vector unchanged. Empty vectors are
/// returned as-is without drawing.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_anneal::{RandomSwap, StateChange};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let tour = vec![1, 2, 3, 4];
/// let mut neighbor = RandomSwap.change(&tour, &mut rng);
/// neighbor.sort();
/// assert_eq!(neighbor, tour);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomSwap;

impl<T: Clone> StateChange<Vec<T>> for RandomSwap {
    fn change(&self, state: &Vec<T>, rng: &mut dyn RngCore) -> Vec<T> {
        let mut swapped = state.clone();
        if swapped.is_empty() {
            return swapped;
        }
        let a = rng.random_range(0..swapped.len());
        let b = rng.random_range(0..swapped.len());
        swapped.swap(a, b);
        swapped
    }
}
