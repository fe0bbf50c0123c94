//! # Estimator Configuration
//!
//! Immutable reference tables shared by every aggregator:
//!
//! - [`RateTable`] - base labor rates and the labor-type coefficient matrix
//! - [`SizingRules`] - module-width breakpoints and row-capacity constants
//! - default margin for new panels and the per-manufacturer table capacity
//!
//! The built-in tables ship as a TOML document (`data/estimator.toml`)
//! compiled into the crate. Alternative documents can be loaded with
//! [`EstimatorConfig::from_toml_str`] or [`EstimatorConfig::from_path`].
//!
//! Validation is complete at load time: a missing base rate or coefficient
//! for any enumerated category/type is a fatal error and no
//! `EstimatorConfig` is produced.
//!
//! ## Example
//!
//! ```rust
//! use volta_core::config::EstimatorConfig;
//!
//! let config = EstimatorConfig::builtin().unwrap();
//! assert_eq!(config.table_capacity, 200);
//! assert_eq!(config.sizing.standard_row_modules, 80.0);
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{EstimateError, EstimateResult};
use crate::labor::{LaborCategory, LaborType};
use crate::materials::Manufacturer;
use crate::rates::RateTable;

/// Built-in reference tables
const BUILTIN_TOML: &str = include_str!("../data/estimator.toml");

/// Module-width classification and row-capacity constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizingRules {
    /// Manufacturer whose modules are also counted in the KNX bucket
    pub knx_manufacturer: Manufacturer,
    /// Width of the half-module bucket
    pub half_module_width: f64,
    /// Widths counted as 1P / 1P+N / 2P devices
    pub small_pole_widths: Vec<f64>,
    /// Width counted as 3P / 3P+N devices
    pub three_pole_width: f64,
    /// Smallest width counted as 4P and larger devices
    pub four_pole_min_width: f64,
    /// Installation margin applied to the raw module count
    pub installation_margin: f64,
    /// Module units per standard DIN row
    pub standard_row_modules: f64,
    /// Module units per compact (24-module) row
    pub compact_row_modules: f64,
    /// Length of one standard DIN row (m)
    pub row_length_m: f64,
}

impl Default for SizingRules {
    fn default() -> Self {
        SizingRules {
            knx_manufacturer: Manufacturer::Knx,
            half_module_width: 0.5,
            small_pole_widths: vec![1.0, 2.0],
            three_pole_width: 3.0,
            four_pole_min_width: 4.0,
            installation_margin: 1.3,
            standard_row_modules: 80.0,
            compact_row_modules: 24.0,
            row_length_m: 0.8,
        }
    }
}

impl SizingRules {
    fn validate(&self) -> EstimateResult<()> {
        let positive = [
            ("sizing.installation_margin", self.installation_margin),
            ("sizing.standard_row_modules", self.standard_row_modules),
            ("sizing.compact_row_modules", self.compact_row_modules),
            ("sizing.row_length_m", self.row_length_m),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(EstimateError::invalid_config(key, format!("must be positive, got {}", value)));
            }
        }

        let widths = [
            ("sizing.half_module_width", self.half_module_width),
            ("sizing.three_pole_width", self.three_pole_width),
            ("sizing.four_pole_min_width", self.four_pole_min_width),
        ]
        .into_iter()
        .chain(self.small_pole_widths.iter().map(|w| ("sizing.small_pole_widths", *w)));
        for (key, value) in widths {
            if !value.is_finite() || value < 0.0 {
                return Err(EstimateError::invalid_config(key, format!("width must be non-negative, got {}", value)));
            }
        }
        Ok(())
    }
}

/// Validated, read-only configuration injected into the aggregators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimatorConfig {
    pub rates: RateTable,
    pub sizing: SizingRules,
    /// Margin applied to new panels (percent)
    pub default_margin_percent: f64,
    /// Rows per manufacturer table
    pub table_capacity: usize,
}

/// On-disk shape of the configuration document
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_margin")]
    default_margin_percent: f64,
    #[serde(default = "default_capacity")]
    table_capacity: usize,
    labor: RawLabor,
    #[serde(default)]
    sizing: SizingRules,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLabor {
    #[serde(default)]
    base_rates: HashMap<String, f64>,
    #[serde(default)]
    coefficients: HashMap<String, HashMap<String, f64>>,
}

fn default_margin() -> f64 {
    25.0
}

fn default_capacity() -> usize {
    200
}

impl EstimatorConfig {
    /// The reference tables compiled into the crate.
    pub fn builtin() -> EstimateResult<Self> {
        Self::from_toml_str(BUILTIN_TOML)
    }

    /// Parse and validate a TOML configuration document.
    ///
    /// # Errors
    ///
    /// * `SerializationError` - the document is not valid TOML or has the wrong shape
    /// * `MissingBaseRate` / `MissingCoefficient` - incomplete rate tables
    /// * `InvalidConfig` - unknown keys or out-of-range values
    pub fn from_toml_str(document: &str) -> EstimateResult<Self> {
        let raw: RawConfig = toml::from_str(document).map_err(|e| EstimateError::SerializationError {
            reason: format!("Invalid estimator configuration: {}", e),
        })?;
        Self::from_raw(raw)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn from_path(path: &Path) -> EstimateResult<Self> {
        let document = std::fs::read_to_string(path)
            .map_err(|e| EstimateError::file_error("read config", path.display().to_string(), e.to_string()))?;
        let config = Self::from_toml_str(&document)?;
        info!(path = %path.display(), "loaded estimator configuration");
        Ok(config)
    }

    fn from_raw(raw: RawConfig) -> EstimateResult<Self> {
        if !(0.0..=100.0).contains(&raw.default_margin_percent) {
            return Err(EstimateError::invalid_config(
                "default_margin_percent",
                format!("must be between 0 and 100, got {}", raw.default_margin_percent),
            ));
        }
        if raw.table_capacity == 0 {
            return Err(EstimateError::invalid_config("table_capacity", "must be at least 1"));
        }
        raw.sizing.validate()?;

        let base_rates = raw
            .labor
            .base_rates
            .iter()
            .map(|(code, rate)| parse_category(code, "labor.base_rates").map(|c| (c, *rate)))
            .collect::<EstimateResult<HashMap<_, _>>>()?;

        let mut coefficients = HashMap::new();
        for (type_code, row) in &raw.labor.coefficients {
            let labor_type = LaborType::from_code(type_code).ok_or_else(|| {
                EstimateError::invalid_config(format!("labor.coefficients.{}", type_code), "unknown labor type")
            })?;
            let section = format!("labor.coefficients.{}", type_code);
            let parsed = row
                .iter()
                .map(|(code, c)| parse_category(code, &section).map(|category| (category, *c)))
                .collect::<EstimateResult<HashMap<_, _>>>()?;
            coefficients.insert(labor_type, parsed);
        }

        let rates = RateTable::from_maps(&base_rates, &coefficients)?;

        Ok(EstimatorConfig {
            rates,
            sizing: raw.sizing,
            default_margin_percent: raw.default_margin_percent,
            table_capacity: raw.table_capacity,
        })
    }
}

fn parse_category(code: &str, section: &str) -> EstimateResult<LaborCategory> {
    LaborCategory::from_code(code)
        .ok_or_else(|| EstimateError::invalid_config(format!("{}.{}", section, code), "unknown labor category"))
}
