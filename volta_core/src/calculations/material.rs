//! # Material Aggregation
//!
//! Sums price and installation time over every active line of every
//! manufacturer table of a panel, feeding each line to the
//! [`ModuleClassifier`].
//!
//! ```text
//! total_price        = Σ active quantity × unit_price
//! total_time_minutes = Σ active quantity × unit_time_minutes
//! ```
//!
//! A filled-in row whose quantity does not parse is left out of every sum
//! and listed in [`MaterialTotals::skipped_rows`]. One bad row never stops
//! the aggregation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::module_stats::{ModuleClassifier, ModuleStats, RowCapacityStats, TerminalStats};
use crate::config::SizingRules;
use crate::input::is_blank;
use crate::materials::{Manufacturer, ManufacturerCollection};

/// A row that was filled in but left out of the totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub manufacturer: Manufacturer,
    pub row: usize,
    /// Cell that failed to parse
    pub field: String,
    /// The offending text
    pub value: String,
}

/// Material totals of one panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialTotals {
    pub total_price: f64,
    pub total_time_minutes: f64,
    pub modules: ModuleStats,
    pub terminals: TerminalStats,
    pub rows: RowCapacityStats,
    /// Rows excluded because of a parse fault
    #[serde(default)]
    pub skipped_rows: Vec<SkippedRow>,
}

/// Aggregate every manufacturer table of a panel.
///
/// # Example
///
/// ```rust
/// use volta_core::calculations::material::aggregate_materials;
/// use volta_core::catalog::InMemoryCatalog;
/// use volta_core::config::SizingRules;
/// use volta_core::materials::{Manufacturer, ManufacturerCollection};
///
/// let catalog = InMemoryCatalog::with_sample_products();
/// let mut table = ManufacturerCollection::new(Manufacturer::Schneider, 20);
/// table.set_reference(0, "A9F74206", &catalog).unwrap();
/// table.set_quantity(0, "2").unwrap();
///
/// let totals = aggregate_materials([&table], &SizingRules::default());
/// assert!((totals.total_price - 91.2).abs() < 1e-9);
/// assert_eq!(totals.total_time_minutes, 30.0);
/// ```
pub fn aggregate_materials<'c>(
    collections: impl IntoIterator<Item = &'c ManufacturerCollection>,
    rules: &SizingRules,
) -> MaterialTotals {
    let mut total_price = 0.0;
    let mut total_time_minutes = 0.0;
    let mut skipped_rows = Vec::new();
    let mut classifier = ModuleClassifier::new(rules);

    for collection in collections {
        let manufacturer = collection.manufacturer();

        for (row, item) in collection.non_blank_rows() {
            if is_blank(&item.reference) || is_blank(&item.quantity) {
                continue;
            }

            let Some(quantity) = item.parsed_quantity() else {
                debug!(%manufacturer, row, quantity = %item.quantity, "skipping row with unparsable quantity");
                skipped_rows.push(SkippedRow {
                    manufacturer,
                    row,
                    field: "quantity".to_string(),
                    value: item.quantity.clone(),
                });
                continue;
            };

            // Catalog miss: the row is active but carries no figures
            let Some(product) = &item.product else {
                continue;
            };

            total_price += quantity * product.unit_price;
            total_time_minutes += quantity * f64::from(product.unit_time_minutes);
            classifier.add(manufacturer, quantity, product);
        }
    }

    let (modules, terminals, rows) = classifier.finish();

    MaterialTotals {
        total_price,
        total_time_minutes,
        modules,
        terminals,
        rows,
        skipped_rows,
    }
}
