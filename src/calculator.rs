//! Pack calculation facade.
//!
//! Routes each order to the exact solver or the greedy fallback depending on
//! its size, and bundles the result with its pack count.

use crate::error::PackError;
use crate::fallback::GreedyFallbackSolver;
use crate::model::{Distribution, PackSizeSet};
use crate::optimizer::OptimalDistributionSolver;
use crate::types::{MAX_EXACT_QUANTITY, Quantity};

/// Settings for pack calculation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatorConfig {
    /// Orders above this quantity use the greedy fallback
    pub max_exact_quantity: u64,
    /// Pack sizes the registry starts with
    pub default_pack_sizes: PackSizeSet,
}

impl CalculatorConfig {
    pub const DEFAULT_MAX_EXACT_QUANTITY: u64 = MAX_EXACT_QUANTITY;

    /// Creates a builder for custom configuration.
    pub fn builder() -> CalculatorConfigBuilder {
        CalculatorConfigBuilder::default()
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_exact_quantity: Self::DEFAULT_MAX_EXACT_QUANTITY,
            default_pack_sizes: PackSizeSet::default(),
        }
    }
}

/// Builder for CalculatorConfig.
#[derive(Clone, Debug, Default)]
pub struct CalculatorConfigBuilder {
    config: CalculatorConfig,
}

impl CalculatorConfigBuilder {
    /// Sets the largest quantity solved exactly.
    pub fn max_exact_quantity(mut self, quantity: u64) -> Self {
        self.config.max_exact_quantity = quantity;
        self
    }

    /// Sets the pack sizes installed at startup.
    pub fn default_pack_sizes(mut self, sizes: PackSizeSet) -> Self {
        self.config.default_pack_sizes = sizes;
        self
    }

    /// Creates the final configuration.
    pub fn build(self) -> CalculatorConfig {
        self.config
    }
}

/// Which solver produced a calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Exact,
    Fallback,
}

/// Result of a calculation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Calculation {
    pub distribution: Distribution,
    pub total_packs: u64,
    pub strategy: Strategy,
}

impl Calculation {
    fn new(distribution: Distribution, strategy: Strategy) -> Self {
        let total_packs = distribution.total_packs();
        Self {
            distribution,
            total_packs,
            strategy,
        }
    }
}

/// Chooses between exact and greedy solving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackCalculator {
    max_exact_quantity: u64,
}

impl PackCalculator {
    pub fn new(max_exact_quantity: u64) -> Self {
        Self { max_exact_quantity }
    }

    pub fn from_config(config: &CalculatorConfig) -> Self {
        Self::new(config.max_exact_quantity)
    }

    pub fn strategy_for(&self, quantity: Quantity) -> Strategy {
        if quantity.get() <= self.max_exact_quantity {
            Strategy::Exact
        } else {
            Strategy::Fallback
        }
    }

    /// Computes the distribution for `quantity` with one solver only.
    pub fn calculate(
        &self,
        quantity: Quantity,
        pack_sizes: &PackSizeSet,
    ) -> Result<Calculation, PackError> {
        let strategy = self.strategy_for(quantity);
        let distribution = match strategy {
            Strategy::Exact => {
                OptimalDistributionSolver::solve(quantity.get(), pack_sizes.as_slice())?
            }
            Strategy::Fallback => {
                GreedyFallbackSolver::solve(quantity.get(), pack_sizes.as_slice())?
            }
        };

        let calculation = Calculation::new(distribution, strategy);
        tracing::debug!(
            quantity = %quantity,
            strategy = ?calculation.strategy,
            total_packs = calculation.total_packs,
            overpack = calculation.distribution.overpack(quantity.get()),
            "Calculated pack distribution"
        );
        Ok(calculation)
    }
}

impl Default for PackCalculator {
    fn default() -> Self {
        Self::new(MAX_EXACT_QUANTITY)
    }
}
