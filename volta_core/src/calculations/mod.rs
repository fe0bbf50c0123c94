//! # Panel Calculations
//!
//! Pure aggregation functions turning a panel's raw inputs into derived
//! totals. Each stage takes plain inputs and returns a serializable totals
//! record:
//!
//! - [`material`] - price, time and sizing over every manufacturer table
//! - [`module_stats`] - module buckets, terminal blocks, DIN-row capacity
//! - [`labor`] - hours × adjusted rate
//! - [`summary`] - margin and final total
//!
//! [`compute_panel_totals`] runs all of them in Material → Labor → Summary
//! order. Same inputs always give identical outputs; nothing is cached
//! between calls.

pub mod labor;
pub mod material;
pub mod module_stats;
pub mod summary;

use serde::{Deserialize, Serialize};

use crate::config::EstimatorConfig;
use crate::labor::{LaborEntry, LaborType};
use crate::materials::ManufacturerCollection;

// Re-export commonly used types
pub use labor::{total_labor_cost, LaborTotals};
pub use material::{aggregate_materials, MaterialTotals, SkippedRow};
pub use module_stats::{ModuleBucket, ModuleClassifier, ModuleStats, RowCapacityStats, TerminalStats};
pub use summary::{summarize, SummaryTotals};

/// Every derived figure of one panel, from one recompute pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelTotals {
    pub materials: MaterialTotals,
    pub labor: LaborTotals,
    pub summary: SummaryTotals,
}

/// Full recompute of one panel's totals.
pub fn compute_panel_totals(
    collections: &[ManufacturerCollection],
    entries: &[LaborEntry],
    labor_type: LaborType,
    margin_percent: f64,
    config: &EstimatorConfig,
) -> PanelTotals {
    let materials = aggregate_materials(collections, &config.sizing);
    let labor = total_labor_cost(entries, labor_type, &config.rates);
    let summary = summarize(&materials, &labor, margin_percent);

    PanelTotals {
        materials,
        labor,
        summary,
    }
}
