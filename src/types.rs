//! Scalar types and fixed limits shared by the calculation core.

use std::fmt;

use crate::error::PackError;

/// Number of units a single pack holds.
pub type PackSize = u64;

/// Pack sizes installed when nothing else is configured.
pub const DEFAULT_PACK_SIZES: [PackSize; 5] = [250, 500, 1000, 2000, 5000];

/// Largest quantity solved with the exact dynamic program.
///
/// Larger orders go through the greedy fallback so the DP table stays bounded.
pub const MAX_EXACT_QUANTITY: u64 = 100_000;

/// Largest quantity accepted at all (the range of a signed 32-bit integer).
pub const MAX_QUANTITY: u64 = i32::MAX as u64;

/// A validated order quantity.
///
/// # Examples
/// ```
/// use sort_my_packages::types::Quantity;
///
/// let quantity = Quantity::new(250).unwrap();
/// assert_eq!(quantity.get(), 250);
/// assert!(Quantity::new(0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u64);

impl Quantity {
    /// Validates a raw request value.
    ///
    /// Rejects zero, negative values and anything above [`MAX_QUANTITY`].
    pub fn new(raw: i64) -> Result<Self, PackError> {
        if raw <= 0 {
            return Err(PackError::InvalidQuantity(format!(
                "quantity must be positive, got: {}",
                raw
            )));
        }

        let value = raw.unsigned_abs();
        if value > MAX_QUANTITY {
            return Err(PackError::InvalidQuantity(format!(
                "quantity exceeds maximum limit of {}, got: {}",
                MAX_QUANTITY, raw
            )));
        }

        Ok(Self(value))
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_accepts_positive_values() {
        assert_eq!(Quantity::new(1).map(Quantity::get), Ok(1));
        assert_eq!(Quantity::new(250).map(Quantity::get), Ok(250));
        assert_eq!(
            Quantity::new(i32::MAX as i64).map(Quantity::get),
            Ok(MAX_QUANTITY)
        );
    }

    #[test]
    fn test_quantity_rejects_zero_and_negative() {
        assert!(matches!(
            Quantity::new(0),
            Err(PackError::InvalidQuantity(_))
        ));
        assert!(matches!(
            Quantity::new(-100),
            Err(PackError::InvalidQuantity(_))
        ));
        assert!(matches!(
            Quantity::new(i64::MIN),
            Err(PackError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_quantity_rejects_values_above_limit() {
        let err = Quantity::new(i32::MAX as i64 + 1).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum limit"));
    }

    #[test]
    fn test_quantity_displays_as_plain_number() {
        assert_eq!(Quantity::new(12_001).unwrap().to_string(), "12001");
    }

    #[test]
    fn test_default_pack_sizes_are_ascending_and_distinct() {
        assert!(DEFAULT_PACK_SIZES.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
