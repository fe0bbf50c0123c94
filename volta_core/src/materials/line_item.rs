//! Material table rows and the catalog fields they carry.

use serde::{Deserialize, Serialize};

use crate::input::{is_blank, parse_number};

/// Static product fields returned by a catalog lookup.
///
/// Optional fields are blank in the catalog for some products; a blank
/// module width keeps the row out of the module buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Catalog key
    pub reference: String,
    pub designation: String,
    /// Unit price (currency units)
    pub unit_price: f64,
    /// Installation time per unit, whole minutes
    pub unit_time_minutes: u32,
    /// DIN-rail width in module units
    #[serde(default)]
    pub module_width: Option<f64>,
    /// Terminal blocks per unit
    #[serde(default)]
    pub terminal_count: Option<f64>,
    /// Width of one terminal block (mm)
    #[serde(default)]
    pub terminal_width_mm: Option<f64>,
    /// Width of all terminal blocks of one unit (mm)
    #[serde(default)]
    pub total_terminal_width_mm: Option<f64>,
    /// Price for a 2-section variant
    #[serde(default)]
    pub price_2s: Option<f64>,
    /// Price for a 3-section variant
    #[serde(default)]
    pub price_3s: Option<f64>,
}

impl ProductInfo {
    /// True when every numeric field present is finite and non-negative.
    ///
    /// Catalog rows always pass; snapshots read back from a record may not.
    pub fn is_valid(&self) -> bool {
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        non_negative(self.unit_price)
            && [
                self.module_width,
                self.terminal_count,
                self.terminal_width_mm,
                self.total_terminal_width_mm,
                self.price_2s,
                self.price_3s,
            ]
            .into_iter()
            .flatten()
            .all(non_negative)
    }
}

/// One row of a manufacturer table.
///
/// `quantity` and `reference` are the raw cell texts. `product` holds the
/// catalog fields from the last reference lookup (`None` after a miss).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub quantity: String,
    pub reference: String,
    #[serde(default)]
    pub product: Option<ProductInfo>,
}

impl LineItem {
    /// Nothing typed and nothing looked up
    pub fn is_blank(&self) -> bool {
        is_blank(&self.quantity) && is_blank(&self.reference) && self.product.is_none()
    }

    /// Both editable cells hold text, whether or not it parses
    pub fn is_filled(&self) -> bool {
        !is_blank(&self.quantity) && !is_blank(&self.reference)
    }

    /// Parsed quantity, `None` for blank or unparsable text
    pub fn parsed_quantity(&self) -> Option<f64> {
        parse_number(&self.quantity)
    }

    /// A row counts towards totals and content flags when a reference is
    /// set and the quantity parses.
    pub fn is_active(&self) -> bool {
        !is_blank(&self.reference) && self.parsed_quantity().is_some()
    }

    /// Designation from the catalog, empty after a miss
    pub fn designation(&self) -> &str {
        self.product.as_ref().map(|p| p.designation.as_str()).unwrap_or("")
    }

    /// Quantity × unit price, 0 for inactive rows or catalog misses
    pub fn line_price(&self) -> f64 {
        match (self.active_quantity(), &self.product) {
            (Some(qty), Some(product)) => qty * product.unit_price,
            _ => 0.0,
        }
    }

    /// Quantity × unit time, truncated to whole minutes
    pub fn line_time_minutes(&self) -> u64 {
        match (self.active_quantity(), &self.product) {
            (Some(qty), Some(product)) => (qty * f64::from(product.unit_time_minutes)) as u64,
            _ => 0,
        }
    }

    fn active_quantity(&self) -> Option<f64> {
        if is_blank(&self.reference) {
            return None;
        }
        self.parsed_quantity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker() -> ProductInfo {
        ProductInfo {
            reference: "A9F74206".into(),
            designation: "iC60N 2P C 6A".into(),
            unit_price: 45.60,
            unit_time_minutes: 15,
            module_width: Some(2.0),
            terminal_count: Some(4.0),
            terminal_width_mm: Some(17.5),
            total_terminal_width_mm: Some(70.0),
            price_2s: Some(50.20),
            price_3s: Some(55.80),
        }
    }

    fn row(quantity: &str, reference: &str) -> LineItem {
        LineItem {
            quantity: quantity.into(),
            reference: reference.into(),
            product: Some(breaker()),
        }
    }

    #[test]
    fn test_activity_rules() {
        assert!(row("2", "A9F74206").is_active());
        assert!(!row("", "A9F74206").is_active());
        assert!(!row("2", " ").is_active());

        let malformed = row("abc", "A9F74206");
        assert!(malformed.is_filled());
        assert!(!malformed.is_active());
    }

    #[test]
    fn test_line_values() {
        let item = row("2", "A9F74206");
        assert!((item.line_price() - 91.2).abs() < 1e-9);
        assert_eq!(item.line_time_minutes(), 30);

        let fractional = row("1.5", "A9F74206");
        assert_eq!(fractional.line_time_minutes(), 22);
    }

    #[test]
    fn test_catalog_miss_contributes_nothing() {
        let item = LineItem {
            quantity: "3".into(),
            reference: "UNKNOWN".into(),
            product: None,
        };
        assert!(item.is_active());
        assert_eq!(item.line_price(), 0.0);
        assert_eq!(item.line_time_minutes(), 0);
        assert_eq!(item.designation(), "");
    }

    #[test]
    fn test_product_validity() {
        assert!(breaker().is_valid());

        let mut negative_price = breaker();
        negative_price.unit_price = -100.0;
        assert!(!negative_price.is_valid());

        let mut negative_width = breaker();
        negative_width.module_width = Some(-4.0);
        assert!(!negative_width.is_valid());

        let mut infinite_terminals = breaker();
        infinite_terminals.terminal_count = Some(f64::INFINITY);
        assert!(!infinite_terminals.is_valid());

        let mut sparse = breaker();
        sparse.module_width = None;
        sparse.price_3s = None;
        assert!(sparse.is_valid());
    }

    #[test]
    fn test_blank_row() {
        assert!(LineItem::default().is_blank());
        assert!(!row("", "").is_blank());
    }
}
