//! # Module Classification
//!
//! Buckets each active line's module width into size classes and
//! accumulates module, terminal-block and row-capacity statistics.
//!
//! ## Buckets
//!
//! Evaluated in this order, first match wins:
//!
//! | Bucket            | Width (default rules) |
//! |-------------------|-----------------------|
//! | Half module       | `== 0.5`              |
//! | 1P / 1P+N / 2P    | `∈ {1, 2}`            |
//! | 3P / 3P+N         | `== 3`                |
//! | 4P and larger     | `>= 4`                |
//!
//! Widths matching no bucket (e.g. `0` or `1.5`) still add to the
//! continuous module total.
//!
//! ## Row capacity
//!
//! ```text
//! rows_standard = total_module_width × 1.3 / 80
//! rows_24       = total_module_width × 1.3 / 24
//! modules/m     = total_module_width / 0.8
//! ```
//!
//! All are 0 when the total module width is 0.

use serde::{Deserialize, Serialize};

use crate::config::SizingRules;
use crate::materials::{Manufacturer, ProductInfo};

/// Discrete module-width class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleBucket {
    HalfModule,
    OneTwoPole,
    ThreePole,
    FourPolePlus,
}

impl ModuleBucket {
    /// Classify a module width, `None` when it falls in no bucket.
    pub fn classify(width: f64, rules: &SizingRules) -> Option<Self> {
        if width == rules.half_module_width {
            Some(ModuleBucket::HalfModule)
        } else if rules.small_pole_widths.contains(&width) {
            Some(ModuleBucket::OneTwoPole)
        } else if width == rules.three_pole_width {
            Some(ModuleBucket::ThreePole)
        } else if width >= rules.four_pole_min_width {
            Some(ModuleBucket::FourPolePlus)
        } else {
            None
        }
    }

    /// Label used in panel summaries
    pub fn display_name(&self) -> &'static str {
        match self {
            ModuleBucket::HalfModule => "Qty 0.5M",
            ModuleBucket::OneTwoPole => "Qty 1P/1P+N/2P",
            ModuleBucket::ThreePole => "Qty 3P/3P+N",
            ModuleBucket::FourPolePlus => "Qty 4P/+4P",
        }
    }
}

/// Module counts per bucket plus the continuous module total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleStats {
    /// Σ quantity × width over the KNX manufacturer's lines only
    pub knx_modules: f64,
    /// Device quantity in the half-module bucket
    pub half_module: f64,
    /// Device quantity in the 1P / 1P+N / 2P bucket
    pub one_two_pole: f64,
    /// Device quantity in the 3P / 3P+N bucket
    pub three_pole: f64,
    /// Device quantity in the 4P-and-larger bucket
    pub four_pole_plus: f64,
    /// Σ quantity × width over every line with a width
    pub total_module_width: f64,
}

impl ModuleStats {
    /// Quantity counted in one bucket
    pub fn bucket(&self, bucket: ModuleBucket) -> f64 {
        match bucket {
            ModuleBucket::HalfModule => self.half_module,
            ModuleBucket::OneTwoPole => self.one_two_pole,
            ModuleBucket::ThreePole => self.three_pole,
            ModuleBucket::FourPolePlus => self.four_pole_plus,
        }
    }

    /// Sum of all four discrete buckets
    pub fn classified_quantity(&self) -> f64 {
        self.half_module + self.one_two_pole + self.three_pole + self.four_pole_plus
    }

    fn bucket_mut(&mut self, bucket: ModuleBucket) -> &mut f64 {
        match bucket {
            ModuleBucket::HalfModule => &mut self.half_module,
            ModuleBucket::OneTwoPole => &mut self.one_two_pole,
            ModuleBucket::ThreePole => &mut self.three_pole,
            ModuleBucket::FourPolePlus => &mut self.four_pole_plus,
        }
    }
}

/// Terminal-block totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminalStats {
    /// Σ quantity × terminal count
    pub total_terminal_count: f64,
    /// Σ quantity × total terminal width (mm)
    pub total_terminal_space_mm: f64,
    /// Terminal blocks per module unit, 0 without modules
    pub terminals_per_module: f64,
}

/// DIN-row capacity derived from the module total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RowCapacityStats {
    /// Standard rows needed, margin included
    pub rows_standard: f64,
    /// 24-module rows needed, margin included
    pub rows_24_module: f64,
    /// Estimated fill of one standard row, in percent
    pub occupancy_percent: f64,
    /// Module units per meter of standard row
    pub modules_per_meter: f64,
}

/// Accumulator fed one active line at a time.
#[derive(Debug, Clone)]
pub struct ModuleClassifier<'a> {
    rules: &'a SizingRules,
    modules: ModuleStats,
    terminals: TerminalStats,
}

impl<'a> ModuleClassifier<'a> {
    pub fn new(rules: &'a SizingRules) -> Self {
        ModuleClassifier {
            rules,
            modules: ModuleStats::default(),
            terminals: TerminalStats::default(),
        }
    }

    /// Account for one active line of `quantity` units of `product`.
    pub fn add(&mut self, manufacturer: Manufacturer, quantity: f64, product: &ProductInfo) {
        if let Some(width) = product.module_width {
            if manufacturer == self.rules.knx_manufacturer {
                self.modules.knx_modules += quantity * width;
            }
            if let Some(bucket) = ModuleBucket::classify(width, self.rules) {
                *self.modules.bucket_mut(bucket) += quantity;
            }
            self.modules.total_module_width += quantity * width;
        }

        if let Some(count) = product.terminal_count {
            self.terminals.total_terminal_count += quantity * count;
        }
        if let Some(space) = product.total_terminal_width_mm {
            self.terminals.total_terminal_space_mm += quantity * space;
        }
    }

    /// Close the accumulation and derive the row-capacity figures.
    pub fn finish(self) -> (ModuleStats, TerminalStats, RowCapacityStats) {
        let total = self.modules.total_module_width;
        let mut terminals = self.terminals;

        let rows = if total > 0.0 {
            let inflated = total * self.rules.installation_margin;
            let rows_standard = inflated / self.rules.standard_row_modules;
            terminals.terminals_per_module = terminals.total_terminal_count / total;
            RowCapacityStats {
                rows_standard,
                rows_24_module: inflated / self.rules.compact_row_modules,
                occupancy_percent: rows_standard * 100.0,
                modules_per_meter: total / self.rules.row_length_m,
            }
        } else {
            RowCapacityStats::default()
        };

        (self.modules, terminals, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn product(width: Option<f64>) -> ProductInfo {
        ProductInfo {
            reference: "X".into(),
            designation: "Test device".into(),
            unit_price: 10.0,
            unit_time_minutes: 5,
            module_width: width,
            terminal_count: Some(4.0),
            terminal_width_mm: Some(17.5),
            total_terminal_width_mm: Some(70.0),
            price_2s: None,
            price_3s: None,
        }
    }

    #[test]
    fn test_bucket_breakpoints() {
        let rules = SizingRules::default();
        assert_eq!(ModuleBucket::classify(0.5, &rules), Some(ModuleBucket::HalfModule));
        assert_eq!(ModuleBucket::classify(1.0, &rules), Some(ModuleBucket::OneTwoPole));
        assert_eq!(ModuleBucket::classify(2.0, &rules), Some(ModuleBucket::OneTwoPole));
        assert_eq!(ModuleBucket::classify(3.0, &rules), Some(ModuleBucket::ThreePole));
        assert_eq!(ModuleBucket::classify(4.0, &rules), Some(ModuleBucket::FourPolePlus));
        assert_eq!(ModuleBucket::classify(12.0, &rules), Some(ModuleBucket::FourPolePlus));
        assert_eq!(ModuleBucket::classify(0.0, &rules), None);
        assert_eq!(ModuleBucket::classify(1.5, &rules), None);
        assert_eq!(ModuleBucket::classify(3.5, &rules), None);
    }

    #[test]
    fn test_two_pole_line() {
        let rules = SizingRules::default();
        let mut classifier = ModuleClassifier::new(&rules);
        classifier.add(Manufacturer::Schneider, 2.0, &product(Some(2.0)));

        let (modules, terminals, rows) = classifier.finish();
        assert_eq!(modules.one_two_pole, 2.0);
        assert_eq!(modules.knx_modules, 0.0);
        assert_eq!(modules.total_module_width, 4.0);
        assert_eq!(terminals.total_terminal_count, 8.0);
        assert_eq!(terminals.total_terminal_space_mm, 140.0);
        assert!((rows.rows_standard - 0.065).abs() < EPS);
        assert!((rows.rows_24_module - 4.0 * 1.3 / 24.0).abs() < EPS);
        assert!((rows.occupancy_percent - 6.5).abs() < EPS);
        assert!((terminals.terminals_per_module - 2.0).abs() < EPS);
    }

    #[test]
    fn test_modules_per_meter() {
        let rules = SizingRules::default();
        let mut classifier = ModuleClassifier::new(&rules);
        classifier.add(Manufacturer::Hager, 3.0, &product(Some(4.0)));

        let (_, _, rows) = classifier.finish();
        assert!((rows.modules_per_meter - 15.0).abs() < EPS);

        let empty = ModuleClassifier::new(&rules).finish().2;
        assert_eq!(empty.modules_per_meter, 0.0);
    }

    #[test]
    fn test_knx_bucket_only_for_knx() {
        let rules = SizingRules::default();
        let mut classifier = ModuleClassifier::new(&rules);
        classifier.add(Manufacturer::Knx, 2.0, &product(Some(2.0)));
        classifier.add(Manufacturer::Hager, 1.0, &product(Some(4.0)));

        let (modules, _, _) = classifier.finish();
        assert_eq!(modules.knx_modules, 4.0);
        assert_eq!(modules.total_module_width, 8.0);
        assert_eq!(modules.four_pole_plus, 1.0);
    }

    #[test]
    fn test_unbucketed_width_still_counts_towards_total() {
        let rules = SizingRules::default();
        let mut classifier = ModuleClassifier::new(&rules);
        classifier.add(Manufacturer::Mcr, 2.0, &product(Some(1.5)));

        let (modules, _, rows) = classifier.finish();
        assert_eq!(modules.classified_quantity(), 0.0);
        assert_eq!(modules.total_module_width, 3.0);
        assert!(rows.rows_standard > 0.0);
    }

    #[test]
    fn test_missing_width_skips_modules_but_not_terminals() {
        let rules = SizingRules::default();
        let mut classifier = ModuleClassifier::new(&rules);
        classifier.add(Manufacturer::Knx, 3.0, &product(None));

        let (modules, terminals, rows) = classifier.finish();
        assert_eq!(modules, ModuleStats::default());
        assert_eq!(terminals.total_terminal_count, 12.0);
        assert_eq!(terminals.terminals_per_module, 0.0);
        assert_eq!(rows, RowCapacityStats::default());
    }

    #[test]
    fn test_zero_total_gives_zero_rows() {
        let rules = SizingRules::default();
        let mut classifier = ModuleClassifier::new(&rules);
        classifier.add(Manufacturer::Swisspro, 5.0, &product(Some(0.0)));

        let (_, _, rows) = classifier.finish();
        assert_eq!(rows.rows_standard, 0.0);
        assert_eq!(rows.rows_24_module, 0.0);
        assert_eq!(rows.modules_per_meter, 0.0);
        assert!(!rows.rows_standard.is_nan());
    }

    #[test]
    fn test_buckets_are_exclusive() {
        let rules = SizingRules::default();
        let mut classifier = ModuleClassifier::new(&rules);
        let widths = [0.5, 1.0, 2.0, 3.0, 4.0, 6.0, 0.0, 2.5];
        for w in widths {
            classifier.add(Manufacturer::Schneider, 1.0, &product(Some(w)));
        }

        let (modules, _, _) = classifier.finish();
        assert_eq!(modules.classified_quantity(), 6.0);
        assert_eq!(modules.bucket(ModuleBucket::OneTwoPole), 2.0);
        assert_eq!(modules.bucket(ModuleBucket::FourPolePlus), 2.0);
    }

    #[test]
    fn test_custom_rules() {
        let rules = SizingRules {
            standard_row_modules: 18.0,
            installation_margin: 1.0,
            ..SizingRules::default()
        };
        let mut classifier = ModuleClassifier::new(&rules);
        classifier.add(Manufacturer::Hager, 9.0, &product(Some(1.0)));

        let (_, _, rows) = classifier.finish();
        assert!((rows.rows_standard - 0.5).abs() < EPS);
    }
}
