//! Fixed-capacity material table for one manufacturer.

use serde::Serialize;
use tracing::debug;

use super::{LineItem, Manufacturer};
use crate::catalog::ProductCatalog;
use crate::errors::{EstimateError, EstimateResult};

/// Ordered rows of one manufacturer's table on one panel.
///
/// The table always holds exactly `capacity` rows; unused rows are blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManufacturerCollection {
    manufacturer: Manufacturer,
    rows: Vec<LineItem>,
}

impl ManufacturerCollection {
    /// Create a table of `capacity` blank rows.
    pub fn new(manufacturer: Manufacturer, capacity: usize) -> Self {
        ManufacturerCollection {
            manufacturer,
            rows: vec![LineItem::default(); capacity],
        }
    }

    pub fn manufacturer(&self) -> Manufacturer {
        self.manufacturer
    }

    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    /// All rows, blank ones included
    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    /// Get one row
    pub fn row(&self, row: usize) -> EstimateResult<&LineItem> {
        self.rows.get(row).ok_or(EstimateError::RowOutOfRange {
            row,
            capacity: self.rows.len(),
        })
    }

    /// Rows that hold any text or product, with their index
    pub fn non_blank_rows(&self) -> impl Iterator<Item = (usize, &LineItem)> {
        self.rows.iter().enumerate().filter(|(_, item)| !item.is_blank())
    }

    /// Rows that count towards totals, with their index
    pub fn active_rows(&self) -> impl Iterator<Item = (usize, &LineItem)> {
        self.rows.iter().enumerate().filter(|(_, item)| item.is_active())
    }

    /// True iff at least one row is active
    pub fn has_content(&self) -> bool {
        self.rows.iter().any(LineItem::is_active)
    }

    /// Store the quantity text typed into a row.
    pub fn set_quantity(&mut self, row: usize, text: &str) -> EstimateResult<()> {
        let item = self.row_mut(row)?;
        item.quantity = text.trim().to_string();
        Ok(())
    }

    /// Store the reference text typed into a row and refresh its product
    /// fields from the catalog.
    ///
    /// Returns `true` when the catalog knew the reference. A miss clears
    /// the product fields; it is not an error.
    pub fn set_reference(&mut self, row: usize, text: &str, catalog: &dyn ProductCatalog) -> EstimateResult<bool> {
        let manufacturer = self.manufacturer;
        let item = self.row_mut(row)?;
        let reference = text.trim();
        item.reference = reference.to_string();

        if reference.is_empty() {
            item.product = None;
            return Ok(false);
        }

        item.product = catalog.lookup_product(reference, manufacturer);
        if item.product.is_none() {
            debug!(%manufacturer, reference, row, "catalog miss");
        }
        Ok(item.product.is_some())
    }

    /// Look up every row that has a reference but no product fields.
    ///
    /// Used after restoring rows stored without a catalog snapshot.
    /// Returns the number of rows filled in.
    pub fn fill_missing_products(&mut self, catalog: &dyn ProductCatalog) -> usize {
        let manufacturer = self.manufacturer;
        let mut filled = 0;
        for item in self.rows.iter_mut() {
            if item.product.is_some() || item.reference.trim().is_empty() {
                continue;
            }
            item.product = catalog.lookup_product(&item.reference, manufacturer);
            if item.product.is_some() {
                filled += 1;
            }
        }
        filled
    }

    /// Blank every cell of a row.
    pub fn clear_row(&mut self, row: usize) -> EstimateResult<()> {
        *self.row_mut(row)? = LineItem::default();
        Ok(())
    }

    /// Copy of one row, for a clipboard.
    pub fn copy_row(&self, row: usize) -> EstimateResult<LineItem> {
        self.row(row).cloned()
    }

    /// Overwrite a row with a previously copied one.
    pub fn paste_row(&mut self, row: usize, item: LineItem) -> EstimateResult<()> {
        *self.row_mut(row)? = item;
        Ok(())
    }

    fn row_mut(&mut self, row: usize) -> EstimateResult<&mut LineItem> {
        let capacity = self.rows.len();
        self.rows
            .get_mut(row)
            .ok_or(EstimateError::RowOutOfRange { row, capacity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    fn table() -> (ManufacturerCollection, InMemoryCatalog) {
        (
            ManufacturerCollection::new(Manufacturer::Schneider, 10),
            InMemoryCatalog::with_sample_products(),
        )
    }

    #[test]
    fn test_new_table_is_blank() {
        let (table, _) = table();
        assert_eq!(table.capacity(), 10);
        assert!(!table.has_content());
        assert_eq!(table.non_blank_rows().count(), 0);
    }

    #[test]
    fn test_reference_lookup_fills_product() {
        let (mut table, catalog) = table();
        assert!(table.set_reference(3, " A9F74210 ", &catalog).unwrap());

        let item = table.row(3).unwrap();
        assert_eq!(item.reference, "A9F74210");
        assert_eq!(item.designation(), "iC60N 2P C 10A");
    }

    #[test]
    fn test_reference_scoped_to_manufacturer() {
        let (mut table, catalog) = table();
        // Hager product typed into the Schneider table
        assert!(!table.set_reference(0, "HTS263E", &catalog).unwrap());
        assert!(table.row(0).unwrap().product.is_none());
    }

    #[test]
    fn test_catalog_miss_clears_previous_product() {
        let (mut table, catalog) = table();
        table.set_reference(0, "A9F74206", &catalog).unwrap();
        assert!(!table.set_reference(0, "NOPE", &catalog).unwrap());
        assert!(table.row(0).unwrap().product.is_none());
    }

    #[test]
    fn test_has_content_requires_active_row() {
        let (mut table, catalog) = table();
        table.set_reference(0, "A9F74206", &catalog).unwrap();
        assert!(!table.has_content());

        table.set_quantity(0, "abc").unwrap();
        assert!(!table.has_content());

        table.set_quantity(0, "1").unwrap();
        assert!(table.has_content());

        // A malformed row next to a valid one leaves the flag set
        table.set_reference(1, "A9F74210", &catalog).unwrap();
        table.set_quantity(1, "abc").unwrap();
        assert!(table.has_content());
        assert_eq!(table.active_rows().map(|(i, _)| i).collect::<Vec<_>>(), vec![0]);

        table.clear_row(0).unwrap();
        assert!(!table.has_content());
    }

    #[test]
    fn test_copy_paste_row() {
        let (mut table, catalog) = table();
        table.set_reference(1, "A9F74216", &catalog).unwrap();
        table.set_quantity(1, "4").unwrap();

        let copied = table.copy_row(1).unwrap();
        table.paste_row(7, copied).unwrap();

        assert_eq!(table.row(7).unwrap(), table.row(1).unwrap());
        assert_eq!(table.active_rows().map(|(i, _)| i).collect::<Vec<_>>(), vec![1, 7]);
    }

    #[test]
    fn test_fill_missing_products() {
        let (mut table, catalog) = table();
        table
            .paste_row(
                2,
                LineItem {
                    quantity: "1".into(),
                    reference: "A9F74220".into(),
                    product: None,
                },
            )
            .unwrap();
        table.set_quantity(4, "3").unwrap();

        assert_eq!(table.fill_missing_products(&catalog), 1);
        assert_eq!(table.row(2).unwrap().designation(), "iC60N 2P C 20A");
        // Nothing left to fill
        assert_eq!(table.fill_missing_products(&catalog), 0);
    }

    #[test]
    fn test_row_out_of_range() {
        let (mut table, catalog) = table();
        assert_eq!(
            table.set_quantity(10, "1").unwrap_err(),
            EstimateError::RowOutOfRange { row: 10, capacity: 10 }
        );
        assert!(table.set_reference(99, "A9F74206", &catalog).is_err());
        assert!(table.copy_row(10).is_err());
    }
}
