//! Selection among feasible pack distributions.
//!
//! The selector ranks candidates first by overpack, then by a tie-break
//! policy that depends on the order size. The policy is kept in
//! [`tie_break_policy`] so it can change without touching the solvers.

use std::cmp::Ordering;

use crate::types::PackSize;

/// Orders below this quantity prefer smaller packs over fewer packs.
pub const SMALL_ORDER_THRESHOLD: u64 = 500;

/// A feasible distribution as seen by the selector.
///
/// `payload` identifies the distribution to the caller; the exact solver
/// passes its table key so only the winner is ever materialised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate<T> {
    pub achieved_quantity: u64,
    pub total_packs: u64,
    pub largest_pack_size: PackSize,
    pub payload: T,
}

impl<T> Candidate<T> {
    pub fn overpack(&self, quantity: u64) -> u64 {
        self.achieved_quantity.saturating_sub(quantity)
    }
}

/// Ranks two candidates with equal overpack. `Ordering::Less` means `a` wins.
///
/// - `quantity < SMALL_ORDER_THRESHOLD`: smaller largest pack, then fewer packs.
/// - otherwise: fewer packs, then smaller largest pack.
pub fn tie_break_policy<T>(quantity: u64, a: &Candidate<T>, b: &Candidate<T>) -> Ordering {
    if quantity < SMALL_ORDER_THRESHOLD {
        a.largest_pack_size
            .cmp(&b.largest_pack_size)
            .then(a.total_packs.cmp(&b.total_packs))
    } else {
        a.total_packs
            .cmp(&b.total_packs)
            .then(a.largest_pack_size.cmp(&b.largest_pack_size))
    }
}

/// Picks the best candidate for an order.
pub struct DistributionSelector;

impl DistributionSelector {
    /// Returns the candidate with minimal overpack, tie-broken by
    /// [`tie_break_policy`]. Remaining ties keep the earliest candidate.
    ///
    /// Candidates that fall short of `quantity` are ignored; `None` means
    /// no candidate reaches it.
    pub fn select<T>(
        candidates: impl IntoIterator<Item = Candidate<T>>,
        quantity: u64,
    ) -> Option<Candidate<T>> {
        let mut best: Option<Candidate<T>> = None;

        for candidate in candidates {
            if candidate.achieved_quantity < quantity {
                continue;
            }

            let replace = match &best {
                None => true,
                Some(current) => Self::rank(quantity, &candidate, current) == Ordering::Less,
            };
            if replace {
                best = Some(candidate);
            }
        }

        best
    }

    fn rank<T>(quantity: u64, a: &Candidate<T>, b: &Candidate<T>) -> Ordering {
        a.overpack(quantity)
            .cmp(&b.overpack(quantity))
            .then_with(|| tie_break_policy(quantity, a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Distribution;

    fn candidate(counts: &[(PackSize, u64)]) -> Candidate<Distribution> {
        let distribution: Distribution = counts.iter().copied().collect();
        Candidate {
            achieved_quantity: distribution.achieved_quantity(),
            total_packs: distribution.total_packs(),
            largest_pack_size: counts.iter().map(|&(size, _)| size).max().unwrap_or(0),
            payload: distribution,
        }
    }

    fn selected(candidates: Vec<Candidate<Distribution>>, quantity: u64) -> Distribution {
        DistributionSelector::select(candidates, quantity)
            .expect("a candidate reaches the quantity")
            .payload
    }

    #[test]
    fn minimal_overpack_wins_over_everything_else() {
        let picked = selected(
            vec![candidate(&[(500, 1)]), candidate(&[(250, 1), (100, 2)])],
            440,
        );
        assert_eq!(picked.achieved_quantity(), 450);
    }

    #[test]
    fn small_orders_prefer_smaller_largest_pack() {
        // Both reach 400; the 3-pack variant avoids the 300 pack.
        let picked = selected(
            vec![candidate(&[(300, 1), (100, 1)]), candidate(&[(200, 1), (100, 2)])],
            400,
        );
        assert_eq!(picked, [(200, 1), (100, 2)].into_iter().collect());
    }

    #[test]
    fn large_orders_prefer_fewer_packs() {
        let picked = selected(
            vec![
                candidate(&[(200, 2), (100, 1), (50, 2)]),
                candidate(&[(300, 2)]),
            ],
            600,
        );
        assert_eq!(picked, [(300, 2)].into_iter().collect());
    }

    #[test]
    fn threshold_quantity_uses_large_order_policy() {
        let few_big = candidate(&[(400, 1), (100, 1)]);
        let many_small = candidate(&[(200, 2), (100, 1)]);

        let at_threshold = selected(vec![many_small.clone(), few_big.clone()], 500);
        assert_eq!(at_threshold, few_big.payload);

        let below_threshold = selected(vec![few_big.clone(), many_small.clone()], 499);
        assert_eq!(below_threshold, many_small.payload);
    }

    #[test]
    fn second_criterion_breaks_remaining_ties() {
        // Same largest pack, small order: fewer packs wins.
        let picked = selected(
            vec![candidate(&[(200, 1), (50, 4)]), candidate(&[(200, 1), (100, 2)])],
            400,
        );
        assert_eq!(picked.total_packs(), 3);

        // Same pack count, large order: smaller largest pack wins.
        let picked = selected(
            vec![candidate(&[(700, 1), (100, 1)]), candidate(&[(500, 1), (300, 1)])],
            800,
        );
        assert_eq!(picked, [(500, 1), (300, 1)].into_iter().collect());
    }

    #[test]
    fn residual_ties_keep_first_candidate() {
        let first = Candidate {
            achieved_quantity: 500,
            total_packs: 2,
            largest_pack_size: 250,
            payload: "first",
        };
        let second = Candidate {
            payload: "second",
            ..first.clone()
        };

        let picked = DistributionSelector::select(vec![first, second], 500).expect("feasible");
        assert_eq!(picked.payload, "first");
    }

    #[test]
    fn short_candidates_are_never_selected() {
        assert!(DistributionSelector::select(vec![candidate(&[(250, 1)])], 251).is_none());
        assert!(DistributionSelector::select(Vec::<Candidate<()>>::new(), 1).is_none());
    }
}
