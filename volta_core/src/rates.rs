//! # Rate Table
//!
//! Base hourly rate per [`LaborCategory`] and a coefficient per
//! ([`LaborType`], [`LaborCategory`]) pair:
//!
//! ```text
//! adjusted_rate(category, type) = base_rate[category] × coefficient[type][category]
//! ```
//!
//! A `RateTable` can only be built through [`RateTable::from_maps`], which
//! rejects any missing entry. Lookups on a built table are therefore
//! infallible.
//!
//! ## Example
//!
//! ```rust
//! use volta_core::config::EstimatorConfig;
//! use volta_core::labor::{LaborCategory, LaborType};
//!
//! let config = EstimatorConfig::builtin().unwrap();
//! let rate = config.rates.adjusted_rate(LaborCategory::Schematics, LaborType::Internal);
//! assert!((rate - 96.0).abs() < 1e-9);
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::errors::{EstimateError, EstimateResult};
use crate::labor::{LaborCategory, LaborType};

const CATEGORY_COUNT: usize = LaborCategory::ALL.len();
const TYPE_COUNT: usize = LaborType::ALL.len();

/// Immutable base rates and coefficient matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    base_rates: [f64; CATEGORY_COUNT],
    coefficients: [[f64; CATEGORY_COUNT]; TYPE_COUNT],
}

impl RateTable {
    /// Build from keyed maps, validating completeness and ranges.
    ///
    /// # Errors
    ///
    /// * `MissingBaseRate` - a category has no base rate
    /// * `MissingCoefficient` - a (type, category) pair has no coefficient
    /// * `InvalidConfig` - a negative rate or a non-positive coefficient
    pub fn from_maps(
        base_rates: &HashMap<LaborCategory, f64>,
        coefficients: &HashMap<LaborType, HashMap<LaborCategory, f64>>,
    ) -> EstimateResult<Self> {
        let mut table = RateTable {
            base_rates: [0.0; CATEGORY_COUNT],
            coefficients: [[0.0; CATEGORY_COUNT]; TYPE_COUNT],
        };

        for category in LaborCategory::ALL {
            let rate = *base_rates
                .get(&category)
                .ok_or_else(|| EstimateError::missing_base_rate(category.code()))?;
            if !rate.is_finite() || rate < 0.0 {
                return Err(EstimateError::invalid_config(
                    format!("labor.base_rates.{}", category.code()),
                    format!("base rate must be a non-negative number, got {}", rate),
                ));
            }
            table.base_rates[category.index()] = rate;
        }

        for labor_type in LaborType::ALL {
            let row = coefficients.get(&labor_type);
            for category in LaborCategory::ALL {
                let coefficient = *row.and_then(|r| r.get(&category)).ok_or_else(|| {
                    EstimateError::missing_coefficient(labor_type.code(), category.code())
                })?;
                if !coefficient.is_finite() || coefficient <= 0.0 {
                    return Err(EstimateError::invalid_config(
                        format!("labor.coefficients.{}.{}", labor_type.code(), category.code()),
                        format!("coefficient must be positive, got {}", coefficient),
                    ));
                }
                table.coefficients[labor_type.index()][category.index()] = coefficient;
            }
        }

        Ok(table)
    }

    /// Base hourly rate before any coefficient
    pub fn base_rate(&self, category: LaborCategory) -> f64 {
        self.base_rates[category.index()]
    }

    /// Coefficient applied to `category` under `labor_type`
    pub fn coefficient(&self, labor_type: LaborType, category: LaborCategory) -> f64 {
        self.coefficients[labor_type.index()][category.index()]
    }

    /// Effective hourly rate for a category under a labor type
    pub fn adjusted_rate(&self, category: LaborCategory, labor_type: LaborType) -> f64 {
        self.base_rate(category) * self.coefficient(labor_type, category)
    }

    /// Adjusted rate for every category, in table order.
    ///
    /// Used to refresh a labor table's rate column when the labor type
    /// changes; recorded hours are not involved.
    pub fn all_adjusted_rates(&self, labor_type: LaborType) -> Vec<(LaborCategory, f64)> {
        LaborCategory::ALL
            .iter()
            .map(|c| (*c, self.adjusted_rate(*c, labor_type)))
            .collect()
    }
}
