//! Exact pack distribution via a bounded dynamic program.
//!
//! The solver explores every total reachable with the configured pack sizes
//! up to `quantity + smallest pack`, keeping the fewest packs per total.
//! The first combination discovered for a total wins ties: totals are
//! scanned in increasing order and pack sizes in ascending order, and only
//! strict improvements replace an entry. Outputs depend on that order, so
//! it must not change.

use std::collections::BTreeMap;

use crate::error::PackError;
use crate::model::Distribution;
use crate::selector::{Candidate, DistributionSelector};
use crate::types::PackSize;

/// How a total was first reached with the fewest packs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Reach {
    packs: u64,
    largest: PackSize,
    /// Last pack added and the total it was added to; `None` for the empty total.
    step: Option<(PackSize, u64)>,
}

impl Reach {
    const ORIGIN: Reach = Reach {
        packs: 0,
        largest: 0,
        step: None,
    };
}

/// Reached totals up to a bound. Totals absent from the map are unreachable.
///
/// Every entry stores a back-pointer instead of a full distribution; an entry
/// is final once the scan has passed it, so walking the pointers yields
/// exactly the distribution the entry was built from.
struct ReachTable {
    reached: BTreeMap<u64, Reach>,
}

impl ReachTable {
    fn build(bound: u64, ascending_sizes: &[PackSize]) -> Self {
        let mut reached = BTreeMap::new();
        reached.insert(0, Reach::ORIGIN);

        let mut cursor = 0u64;
        loop {
            let Some((total, reach)) = reached
                .range(cursor..)
                .next()
                .map(|(&total, &reach)| (total, reach))
            else {
                break;
            };

            for &size in ascending_sizes {
                let next = match total.checked_add(size) {
                    Some(next) if next <= bound => next,
                    // Sizes are ascending: every later size overshoots as well.
                    _ => break,
                };

                let packs = reach.packs + 1;
                let improves = reached
                    .get(&next)
                    .is_none_or(|existing: &Reach| packs < existing.packs);
                if improves {
                    reached.insert(
                        next,
                        Reach {
                            packs,
                            largest: reach.largest.max(size),
                            step: Some((size, total)),
                        },
                    );
                }
            }

            match total.checked_add(1) {
                Some(next_cursor) => cursor = next_cursor,
                None => break,
            }
        }

        Self { reached }
    }

    fn candidates(&self, from: u64, to: u64) -> impl Iterator<Item = Candidate<u64>> + '_ {
        self.reached
            .range(from..=to)
            .map(|(&total, reach)| Candidate {
                achieved_quantity: total,
                total_packs: reach.packs,
                largest_pack_size: reach.largest,
                payload: total,
            })
    }

    fn distribution_for(&self, total: u64) -> Distribution {
        let mut distribution = Distribution::new();
        let mut at = total;
        while let Some((size, from)) = self.reached.get(&at).and_then(|reach| reach.step) {
            distribution.add(size, 1);
            at = from;
        }
        distribution
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.reached.len()
    }
}

/// Exact solver for orders up to the configured exact-quantity limit.
pub struct OptimalDistributionSolver;

impl OptimalDistributionSolver {
    /// Computes the distribution with minimal overpack for `quantity`.
    ///
    /// # Parameters
    /// * `quantity` - Units requested
    /// * `pack_sizes` - Allowed pack sizes, any order; zeros and duplicates are ignored
    ///
    /// # Returns
    /// The winning distribution, or `PackError::NoSolution` if no pack sizes
    /// are available.
    pub fn solve(quantity: u64, pack_sizes: &[PackSize]) -> Result<Distribution, PackError> {
        let mut ascending: Vec<PackSize> =
            pack_sizes.iter().copied().filter(|&size| size > 0).collect();
        ascending.sort_unstable();
        ascending.dedup();

        let Some(&smallest) = ascending.first() else {
            return Err(PackError::NoSolution { quantity });
        };

        let bound = quantity.saturating_add(smallest);
        let table = ReachTable::build(bound, &ascending);

        let best = DistributionSelector::select(table.candidates(quantity, bound), quantity)
            .ok_or(PackError::NoSolution { quantity })?;

        Ok(table.distribution_for(best.payload))
    }
}
