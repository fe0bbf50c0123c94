//! # Panel Summary
//!
//! The four published cost rows of a panel:
//!
//! ```text
//! material_with_margin = total_price × (1 + margin_percent / 100)
//! time                 = ⌊total_time_minutes⌋
//! labor                = labor total cost
//! final_total          = material_with_margin + labor
//! ```
//!
//! All rows come out of one call so they always belong to the same edit
//! generation.

use serde::{Deserialize, Serialize};

use super::labor::LaborTotals;
use super::material::MaterialTotals;

/// Final cost figures of one panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Material total before margin
    pub material_total: f64,
    pub margin_percent: f64,
    pub material_with_margin: f64,
    /// Installation time in whole minutes
    pub total_time_minutes: u64,
    pub labor_total: f64,
    pub final_total: f64,
}

/// Combine material and labor totals with the panel margin.
///
/// # Example
///
/// ```rust
/// use volta_core::calculations::summary::summarize;
/// use volta_core::calculations::{LaborTotals, MaterialTotals};
///
/// let materials = MaterialTotals { total_price: 1000.0, ..Default::default() };
/// let labor = LaborTotals { total_cost: 500.0, ..Default::default() };
///
/// let summary = summarize(&materials, &labor, 25.0);
/// assert_eq!(summary.material_with_margin, 1250.0);
/// assert_eq!(summary.final_total, 1750.0);
/// ```
pub fn summarize(materials: &MaterialTotals, labor: &LaborTotals, margin_percent: f64) -> SummaryTotals {
    let material_with_margin = materials.total_price * (1.0 + margin_percent / 100.0);

    SummaryTotals {
        material_total: materials.total_price,
        margin_percent,
        material_with_margin,
        // Truncation, not rounding
        total_time_minutes: materials.total_time_minutes.max(0.0) as u64,
        labor_total: labor.total_cost,
        final_total: material_with_margin + labor.total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn materials(price: f64, minutes: f64) -> MaterialTotals {
        MaterialTotals {
            total_price: price,
            total_time_minutes: minutes,
            ..MaterialTotals::default()
        }
    }

    fn labor(cost: f64) -> LaborTotals {
        LaborTotals {
            total_cost: cost,
            ..LaborTotals::default()
        }
    }

    #[test]
    fn test_margin_and_final_total() {
        let summary = summarize(&materials(1000.0, 0.0), &labor(500.0), 25.0);
        assert!((summary.material_with_margin - 1250.0).abs() < EPS);
        assert!((summary.final_total - 1750.0).abs() < EPS);
        assert_eq!(summary.material_total, 1000.0);
        assert_eq!(summary.labor_total, 500.0);
    }

    #[test]
    fn test_margin_boundaries() {
        let zero = summarize(&materials(1000.0, 0.0), &labor(0.0), 0.0);
        let full = summarize(&materials(1000.0, 0.0), &labor(0.0), 100.0);
        assert_eq!(zero.material_with_margin, 1000.0);
        assert_eq!(full.material_with_margin, 2000.0);
    }

    #[test]
    fn test_margin_is_monotonic() {
        let mut previous = f64::MIN;
        for step in 0..=20 {
            let margin = step as f64 * 5.0;
            let summary = summarize(&materials(437.25, 0.0), &labor(12.0), margin);
            assert!(summary.material_with_margin >= previous);
            assert!((summary.final_total - (summary.material_with_margin + 12.0)).abs() < EPS);
            previous = summary.material_with_margin;
        }
    }

    #[test]
    fn test_time_truncated_to_whole_minutes() {
        let summary = summarize(&materials(0.0, 22.9), &labor(0.0), 25.0);
        assert_eq!(summary.total_time_minutes, 22);
    }

    #[test]
    fn test_empty_panel_summary() {
        let summary = summarize(&MaterialTotals::default(), &LaborTotals::default(), 25.0);
        assert_eq!(summary.final_total, 0.0);
        assert_eq!(summary.total_time_minutes, 0);
    }
}
