//! Greedy pack distribution for orders too large for the exact solver.

use crate::error::PackError;
use crate::model::Distribution;
use crate::types::PackSize;

/// Largest-first greedy solver.
///
/// Runs in time linear in the number of pack sizes. The result never falls
/// short of the quantity, but overpack and pack count are not minimised.
pub struct GreedyFallbackSolver;

impl GreedyFallbackSolver {
    /// Fills `quantity` with as many of each size as fit, largest first, then
    /// covers any remainder with one pack of the smallest size.
    pub fn solve(quantity: u64, pack_sizes: &[PackSize]) -> Result<Distribution, PackError> {
        let mut descending: Vec<PackSize> =
            pack_sizes.iter().copied().filter(|&size| size > 0).collect();
        descending.sort_unstable_by(|a, b| b.cmp(a));
        descending.dedup();

        let Some(&smallest) = descending.last() else {
            return Err(PackError::NoSolution { quantity });
        };

        let mut distribution = Distribution::new();
        let mut remaining = quantity;
        for &size in &descending {
            let count = remaining / size;
            if count > 0 {
                distribution.add(size, count);
                remaining -= size * count;
            }
        }

        // After the smallest size, `remaining < smallest`, so one more pack covers it.
        if remaining > 0 {
            distribution.add(smallest, 1);
        }

        Ok(distribution)
    }
}
