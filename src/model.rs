//! Data models for pack calculation.
//!
//! This module defines the two value types every component passes around:
//! - `PackSizeSet`: the validated, deduplicated set of allowed pack sizes
//! - `Distribution`: how many packs of each size fulfil an order
//!
//! Both are plain values; sharing between requests happens through the
//! registry, which hands out immutable snapshots.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::PackError;
use crate::types::{DEFAULT_PACK_SIZES, PackSize};

/// Helper function to validate a single raw pack size.
fn validate_pack_size(value: i64) -> Result<PackSize, PackError> {
    if value <= 0 {
        return Err(PackError::InvalidConfig(format!(
            "pack sizes must be positive integers, got: {}",
            value
        )));
    }
    Ok(value.unsigned_abs())
}

/// Helper function to reject an empty pack size list.
fn validate_not_empty<T>(values: &[T]) -> Result<(), PackError> {
    if values.is_empty() {
        return Err(PackError::InvalidConfig(
            "provide a non-empty list of pack sizes".to_string(),
        ));
    }
    Ok(())
}

/// Validated set of distinct, positive pack sizes.
///
/// Sizes are stored in descending order. The set is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackSizeSet {
    sizes: Vec<PackSize>,
}

impl PackSizeSet {
    /// Builds a set from raw request values.
    ///
    /// # Returns
    /// `Ok(PackSizeSet)` with duplicates removed and sizes sorted descending,
    /// `Err(PackError::InvalidConfig)` for an empty list or any value `<= 0`.
    pub fn new(raw: impl IntoIterator<Item = i64>) -> Result<Self, PackError> {
        let raw: Vec<i64> = raw.into_iter().collect();
        validate_not_empty(&raw)?;

        let sizes = raw
            .into_iter()
            .map(validate_pack_size)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::canonical(sizes))
    }

    /// Builds a set from already unsigned sizes; zero is rejected.
    pub fn from_sizes(sizes: impl IntoIterator<Item = PackSize>) -> Result<Self, PackError> {
        let sizes: Vec<PackSize> = sizes.into_iter().collect();
        validate_not_empty(&sizes)?;

        if sizes.contains(&0) {
            return Err(PackError::InvalidConfig(
                "pack sizes must be positive integers, got: 0".to_string(),
            ));
        }

        Ok(Self::canonical(sizes))
    }

    fn canonical(mut sizes: Vec<PackSize>) -> Self {
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.dedup();
        Self { sizes }
    }

    /// Sizes in descending order.
    pub fn as_slice(&self) -> &[PackSize] {
        &self.sizes
    }

    pub fn to_vec(&self) -> Vec<PackSize> {
        self.sizes.clone()
    }
}

impl Default for PackSizeSet {
    fn default() -> Self {
        Self::canonical(DEFAULT_PACK_SIZES.to_vec())
    }
}

/// Pack counts per pack size.
///
/// Only sizes with a count above zero are present. Keys iterate in
/// ascending size order, which also fixes the JSON key order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Distribution {
    counts: BTreeMap<PackSize, u64>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` packs of `size`. A zero count leaves the distribution unchanged.
    pub fn add(&mut self, size: PackSize, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(size).or_insert(0) += count;
    }

    /// Total units delivered: sum of `size * count`.
    pub fn achieved_quantity(&self) -> u64 {
        self.counts.iter().map(|(size, count)| size * count).sum()
    }

    /// Total number of packs.
    pub fn total_packs(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Surplus units beyond `quantity`; zero if the distribution falls short.
    pub fn overpack(&self, quantity: u64) -> u64 {
        self.achieved_quantity().saturating_sub(quantity)
    }

    pub fn into_counts(self) -> BTreeMap<PackSize, u64> {
        self.counts
    }
}

impl FromIterator<(PackSize, u64)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (PackSize, u64)>>(iter: I) -> Self {
        let mut distribution = Distribution::new();
        for (size, count) in iter {
            distribution.add(size, count);
        }
        distribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_size_set_dedupes_and_sorts_descending() {
        let set = PackSizeSet::new([300, 100, 200, 100, 300]).expect("valid sizes");
        assert_eq!(set.as_slice(), &[300, 200, 100]);
    }

    #[test]
    fn pack_size_set_rejects_empty_list() {
        let err = PackSizeSet::new(Vec::<i64>::new()).unwrap_err();
        assert!(matches!(err, PackError::InvalidConfig(_)));
        assert!(PackSizeSet::from_sizes(Vec::new()).is_err());
    }

    #[test]
    fn pack_size_set_rejects_non_positive_sizes() {
        assert!(matches!(
            PackSizeSet::new([100, 0, 300]),
            Err(PackError::InvalidConfig(_))
        ));
        assert!(matches!(
            PackSizeSet::new([100, -200, 300]),
            Err(PackError::InvalidConfig(_))
        ));
        assert!(PackSizeSet::from_sizes([5, 0]).is_err());
    }

    #[test]
    fn default_set_holds_standard_sizes() {
        assert_eq!(
            PackSizeSet::default().as_slice(),
            &[5000, 2000, 1000, 500, 250]
        );
    }

    #[test]
    fn distribution_derives_totals() {
        let distribution: Distribution = [(1000, 1), (250, 2)].into_iter().collect();

        assert_eq!(distribution.achieved_quantity(), 1500);
        assert_eq!(distribution.total_packs(), 3);
        assert_eq!(distribution.overpack(1400), 100);
        assert_eq!(distribution.overpack(1600), 0);
        assert_eq!(
            distribution.into_counts(),
            BTreeMap::from([(250, 2), (1000, 1)])
        );
    }

    #[test]
    fn distribution_ignores_zero_counts() {
        let mut distribution = Distribution::new();
        distribution.add(500, 0);
        assert_eq!(distribution, Distribution::default());
        assert_eq!(distribution.total_packs(), 0);

        distribution.add(500, 1);
        distribution.add(500, 2);
        assert_eq!(distribution.into_counts(), BTreeMap::from([(500, 3)]));
    }

    #[test]
    fn distribution_serializes_as_size_keyed_object() {
        let distribution: Distribution = [(500, 1), (250, 1)].into_iter().collect();
        let json = serde_json::to_string(&distribution).expect("serializable");
        assert_eq!(json, r#"{"250":1,"500":1}"#);
    }
}
