//! # Labor Aggregation
//!
//! ```text
//! total_cost = Σ hours × base_rate[category] × coefficient[labor_type][category]
//! ```
//!
//! Blank or unparsable hours count as zero and never abort the sum.

use serde::{Deserialize, Serialize};

use crate::labor::{LaborEntry, LaborType};
use crate::rates::RateTable;

/// Labor totals of one panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborTotals {
    /// Labor type the cost was priced with
    pub labor_type: LaborType,
    pub total_hours: f64,
    pub total_cost: f64,
}

/// Sum hours × adjusted rate over a panel's labor entries.
///
/// # Example
///
/// ```rust
/// use volta_core::calculations::labor::total_labor_cost;
/// use volta_core::config::EstimatorConfig;
/// use volta_core::labor::{LaborCategory, LaborEntry, LaborType};
///
/// let config = EstimatorConfig::builtin().unwrap();
/// let mut entry = LaborEntry::new(LaborCategory::Schematics);
/// entry.hours = "10".to_string();
///
/// let totals = total_labor_cost(&[entry], LaborType::Internal, &config.rates);
/// assert!((totals.total_cost - 960.0).abs() < 1e-9);
/// ```
pub fn total_labor_cost(entries: &[LaborEntry], labor_type: LaborType, rates: &RateTable) -> LaborTotals {
    entries.iter().fold(
        LaborTotals {
            labor_type,
            ..LaborTotals::default()
        },
        |mut totals, entry| {
            let hours = entry.effective_hours();
            totals.total_hours += hours;
            totals.total_cost += hours * rates.adjusted_rate(entry.category, labor_type);
            totals
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimatorConfig;
    use crate::labor::{default_entries, LaborCategory};

    const EPS: f64 = 1e-9;

    fn rates() -> RateTable {
        EstimatorConfig::builtin().unwrap().rates
    }

    fn with_hours(hours: &[(LaborCategory, &str)]) -> Vec<LaborEntry> {
        let mut entries = default_entries();
        for (category, text) in hours {
            entries[category.index()].hours = text.to_string();
        }
        entries
    }

    #[test]
    fn test_schematics_internal() {
        let entries = with_hours(&[(LaborCategory::Schematics, "10")]);
        let totals = total_labor_cost(&entries, LaborType::Internal, &rates());
        assert!((totals.total_cost - 960.0).abs() < EPS);
        assert_eq!(totals.total_hours, 10.0);
        assert_eq!(totals.labor_type, LaborType::Internal);
    }

    #[test]
    fn test_zero_hours_cost_nothing() {
        let totals = total_labor_cost(&default_entries(), LaborType::External, &rates());
        assert_eq!(totals.total_cost, 0.0);
        assert_eq!(totals.total_hours, 0.0);
    }

    #[test]
    fn test_bad_hours_count_as_zero() {
        let entries = with_hours(&[
            (LaborCategory::Schematics, "10"),
            (LaborCategory::Survey, "two"),
            (LaborCategory::Transport, ""),
            (LaborCategory::Installation, "-3"),
        ]);
        let totals = total_labor_cost(&entries, LaborType::Internal, &rates());
        assert!((totals.total_cost - 960.0).abs() < EPS);
    }

    #[test]
    fn test_labor_type_changes_cost_not_hours() {
        let entries = with_hours(&[
            (LaborCategory::ProjectLead, "4"),
            (LaborCategory::WiringAssembly, "12,5"),
        ]);
        let before = entries.clone();
        let rates = rates();

        let internal = total_labor_cost(&entries, LaborType::Internal, &rates);
        let external = total_labor_cost(&entries, LaborType::External, &rates);
        let bkw = total_labor_cost(&entries, LaborType::Bkw, &rates);

        let expected_internal = 4.0 * 64.0 * 1.3 + 12.5 * 57.0 * 1.25;
        let expected_external = 4.0 * 64.0 * 1.46 + 12.5 * 57.0 * 1.43;
        let expected_bkw = 4.0 * 64.0 * 1.38 + 12.5 * 57.0 * 1.34;
        assert!((internal.total_cost - expected_internal).abs() < 1e-6);
        assert!((external.total_cost - expected_external).abs() < 1e-6);
        assert!((bkw.total_cost - expected_bkw).abs() < 1e-6);
        assert_eq!(internal.total_hours, external.total_hours);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_every_category_contributes() {
        let mut entries = default_entries();
        for entry in &mut entries {
            entry.hours = "1".to_string();
        }
        let rates = rates();
        let totals = total_labor_cost(&entries, LaborType::Internal, &rates);
        let expected: f64 = rates
            .all_adjusted_rates(LaborType::Internal)
            .iter()
            .map(|(_, rate)| rate)
            .sum();
        assert!((totals.total_cost - expected).abs() < 1e-6);
        assert_eq!(totals.total_hours, 7.0);
    }
}
