//! Transport-independent entry points.
//!
//! `PackingService` binds one registry to one calculator and exposes the
//! operations the HTTP layer needs, taking raw request values.

use std::sync::Arc;

use crate::calculator::{CalculatorConfig, Calculation, PackCalculator};
use crate::error::PackError;
use crate::model::PackSizeSet;
use crate::registry::PackSizeRegistry;
use crate::types::Quantity;

#[derive(Clone, Debug)]
pub struct PackingService {
    registry: Arc<PackSizeRegistry>,
    calculator: PackCalculator,
}

impl PackingService {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            registry: Arc::new(PackSizeRegistry::new(config.default_pack_sizes.clone())),
            calculator: PackCalculator::from_config(config),
        }
    }

    /// Calculates the distribution for `quantity` with the current pack sizes.
    ///
    /// The registry lock is only held while taking the snapshot.
    pub fn calculate_distribution(&self, quantity: i64) -> Result<Calculation, PackError> {
        let quantity = Quantity::new(quantity)?;
        let pack_sizes = self.registry.get();
        self.calculator.calculate(quantity, &pack_sizes)
    }

    /// Replaces the pack sizes; invalid input leaves the current set untouched.
    pub fn update_pack_sizes(&self, sizes: Vec<i64>) -> Result<Arc<PackSizeSet>, PackError> {
        match self.registry.replace(sizes) {
            Ok(installed) => {
                tracing::info!(pack_sizes = ?installed.as_slice(), "Pack sizes updated");
                Ok(installed)
            }
            Err(err) => {
                tracing::warn!("Rejected pack size update: {err}");
                Err(err)
            }
        }
    }

    pub fn pack_sizes(&self) -> Arc<PackSizeSet> {
        self.registry.get()
    }
}

impl Default for PackingService {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}
