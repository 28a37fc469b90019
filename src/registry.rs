//! Process-wide registry of the allowed pack sizes.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::PackError;
use crate::model::PackSizeSet;

/// Holds the current [`PackSizeSet`] behind a reader/writer lock.
///
/// Readers get an `Arc` snapshot and drop the lock before doing any work,
/// so a solve never holds the lock. A replacement swaps the whole `Arc`;
/// a reader sees either the old set or the new one.
#[derive(Debug)]
pub struct PackSizeRegistry {
    current: RwLock<Arc<PackSizeSet>>,
}

impl PackSizeRegistry {
    pub fn new(initial: PackSizeSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Returns the current set.
    pub fn get(&self) -> Arc<PackSizeSet> {
        // The guarded value is a single Arc, so a poisoned lock still holds a whole set.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Validates `sizes` and installs them as the new current set.
    ///
    /// On error the previous set stays in place.
    pub fn replace(
        &self,
        sizes: impl IntoIterator<Item = i64>,
    ) -> Result<Arc<PackSizeSet>, PackError> {
        let validated = PackSizeSet::new(sizes)?;
        Ok(self.install(validated))
    }

    /// Installs an already validated set.
    pub fn install(&self, sizes: PackSizeSet) -> Arc<PackSizeSet> {
        let sizes = Arc::new(sizes);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&sizes);
        sizes
    }
}

impl Default for PackSizeRegistry {
    fn default() -> Self {
        Self::new(PackSizeSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_with_initial_set() {
        let registry = PackSizeRegistry::default();
        assert_eq!(registry.get().as_slice(), &[5000, 2000, 1000, 500, 250]);
    }

    #[test]
    fn replace_round_trips_deduplicated_descending() {
        let registry = PackSizeRegistry::default();
        let installed = registry.replace([23, 53, 31, 23]).expect("valid sizes");

        assert_eq!(installed.as_slice(), &[53, 31, 23]);
        assert_eq!(registry.get().as_slice(), &[53, 31, 23]);
    }

    #[test]
    fn invalid_replacement_keeps_previous_set() {
        let registry = PackSizeRegistry::default();
        registry.replace([100, 200, 300]).expect("valid sizes");

        for invalid in [vec![], vec![100, 0, 300], vec![100, -200, 300]] {
            assert!(matches!(
                registry.replace(invalid),
                Err(PackError::InvalidConfig(_))
            ));
            assert_eq!(registry.get().as_slice(), &[300, 200, 100]);
        }
    }

    #[test]
    fn snapshots_are_unaffected_by_later_replacements() {
        let registry = PackSizeRegistry::default();
        let snapshot = registry.get();

        registry.replace([7]).expect("valid sizes");

        assert_eq!(snapshot.as_slice(), &[5000, 2000, 1000, 500, 250]);
        assert_eq!(registry.get().as_slice(), &[7]);
    }

    #[test]
    fn concurrent_readers_only_observe_complete_sets() {
        let registry = PackSizeRegistry::default();
        let old = PackSizeSet::default();
        let new = PackSizeSet::new([3, 5, 9]).expect("valid sizes");

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1_000 {
                        let seen = registry.get();
                        assert!(*seen == old || *seen == new, "torn read: {:?}", seen);
                    }
                });
            }
            scope.spawn(|| {
                for round in 0..200 {
                    let next = if round % 2 == 0 { new.clone() } else { old.clone() };
                    registry.install(next);
                }
            });
        });
    }
}
