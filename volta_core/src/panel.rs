//! # Panel
//!
//! One electrical board being costed: a material table per manufacturer,
//! one labor entry per category, a margin and the active labor type.
//!
//! Every edit goes through a method on [`Panel`] and moves the panel to
//! [`PanelState::Dirty`]. The derived [`PanelTotals`] are only written by a
//! [`RecomputeController`](crate::recompute::RecomputeController) pass.
//!
//! ## Example
//!
//! ```rust
//! use volta_core::catalog::InMemoryCatalog;
//! use volta_core::config::EstimatorConfig;
//! use volta_core::materials::Manufacturer;
//! use volta_core::panel::Panel;
//! use volta_core::recompute::PanelState;
//!
//! let config = EstimatorConfig::builtin().unwrap();
//! let catalog = InMemoryCatalog::with_sample_products();
//!
//! let mut panel = Panel::new("TD-1", &config);
//! panel.set_reference(Manufacturer::Hager, 0, "HTS240E", &catalog).unwrap();
//! panel.set_quantity(Manufacturer::Hager, 0, "1").unwrap();
//!
//! assert_eq!(panel.state(), PanelState::Dirty);
//! assert_eq!(panel.margin_percent(), 25.0);
//! ```

use std::collections::BTreeMap;

use tracing::warn;
use uuid::Uuid;

use crate::calculations::PanelTotals;
use crate::catalog::ProductCatalog;
use crate::config::EstimatorConfig;
use crate::errors::{EstimateError, EstimateResult};
use crate::input::parse_number;
use crate::labor::{default_entries, LaborCategory, LaborEntry, LaborType};
use crate::materials::{LineItem, Manufacturer, ManufacturerCollection, MANUFACTURER_COUNT};
use crate::rates::RateTable;
use crate::recompute::PanelState;
use crate::record::{LineRecord, PanelRecord};

/// Inputs and last published totals of one panel.
#[derive(Debug, Clone)]
pub struct Panel {
    id: Uuid,
    name: String,
    /// One table per manufacturer, in [`Manufacturer::ALL`] order
    collections: Vec<ManufacturerCollection>,
    /// One entry per category, in [`LaborCategory::ALL`] order
    labor: Vec<LaborEntry>,
    margin_percent: f64,
    labor_type: LaborType,
    state: PanelState,
    totals: PanelTotals,
    /// Last published content flag per manufacturer
    content_flags: [bool; MANUFACTURER_COUNT],
}

impl Panel {
    /// Empty panel with the configured table capacity and default margin.
    ///
    /// New panels start dirty so the first pass publishes their totals.
    pub fn new(name: impl Into<String>, config: &EstimatorConfig) -> Self {
        Panel {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            collections: Manufacturer::ALL
                .iter()
                .map(|m| ManufacturerCollection::new(*m, config.table_capacity))
                .collect(),
            labor: default_entries(),
            margin_percent: config.default_margin_percent,
            labor_type: LaborType::default(),
            state: PanelState::Dirty,
            totals: PanelTotals::default(),
            content_flags: [false; MANUFACTURER_COUNT],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub fn collections(&self) -> &[ManufacturerCollection] {
        &self.collections
    }

    pub fn collection(&self, manufacturer: Manufacturer) -> &ManufacturerCollection {
        &self.collections[manufacturer.index()]
    }

    pub fn labor_entries(&self) -> &[LaborEntry] {
        &self.labor
    }

    pub fn labor_entry(&self, category: LaborCategory) -> &LaborEntry {
        &self.labor[category.index()]
    }

    pub fn margin_percent(&self) -> f64 {
        self.margin_percent
    }

    pub fn labor_type(&self) -> LaborType {
        self.labor_type
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == PanelState::Dirty
    }

    /// Totals from the last recompute pass
    pub fn totals(&self) -> &PanelTotals {
        &self.totals
    }

    /// Content flag from the last recompute pass
    pub fn has_content(&self, manufacturer: Manufacturer) -> bool {
        self.content_flags[manufacturer.index()]
    }

    /// Adjusted rate of every category under the panel's labor type, for
    /// the rate column of a labor table.
    pub fn labor_rates(&self, rates: &RateTable) -> Vec<(LaborCategory, f64)> {
        rates.all_adjusted_rates(self.labor_type)
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Set the quantity text of one row.
    pub fn set_quantity(&mut self, manufacturer: Manufacturer, row: usize, text: &str) -> EstimateResult<()> {
        self.collections[manufacturer.index()].set_quantity(row, text)?;
        self.mark_dirty();
        Ok(())
    }

    /// Set the reference text of one row and look it up in `catalog`.
    ///
    /// Returns `true` when the catalog knew the reference.
    pub fn set_reference(
        &mut self,
        manufacturer: Manufacturer,
        row: usize,
        text: &str,
        catalog: &dyn ProductCatalog,
    ) -> EstimateResult<bool> {
        let found = self.collections[manufacturer.index()].set_reference(row, text, catalog)?;
        self.mark_dirty();
        Ok(found)
    }

    pub fn clear_row(&mut self, manufacturer: Manufacturer, row: usize) -> EstimateResult<()> {
        self.collections[manufacturer.index()].clear_row(row)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn copy_row(&self, manufacturer: Manufacturer, row: usize) -> EstimateResult<LineItem> {
        self.collections[manufacturer.index()].copy_row(row)
    }

    pub fn paste_row(&mut self, manufacturer: Manufacturer, row: usize, item: LineItem) -> EstimateResult<()> {
        self.collections[manufacturer.index()].paste_row(row, item)?;
        self.mark_dirty();
        Ok(())
    }

    /// Set the hours text of one labor category.
    pub fn set_hours(&mut self, category: LaborCategory, text: &str) {
        self.labor[category.index()].hours = text.trim().to_string();
        self.mark_dirty();
    }

    /// Set the margin, clamped to [0, 100]. NaN leaves it unchanged.
    pub fn set_margin_percent(&mut self, margin_percent: f64) {
        if margin_percent.is_nan() {
            return;
        }
        self.margin_percent = margin_percent.clamp(0.0, 100.0);
        self.mark_dirty();
    }

    /// Set the margin from typed text.
    ///
    /// Unparsable text keeps the previous margin and returns `false`.
    pub fn set_margin_text(&mut self, text: &str) -> bool {
        match parse_number(text) {
            Some(margin) => {
                self.set_margin_percent(margin);
                true
            }
            None => false,
        }
    }

    /// Switch the labor type. Recorded hours are untouched.
    pub fn set_labor_type(&mut self, labor_type: LaborType) {
        self.labor_type = labor_type;
        self.mark_dirty();
    }

    /// Fill in product fields of rows restored without a catalog snapshot.
    pub fn fill_missing_products(&mut self, catalog: &dyn ProductCatalog) -> usize {
        let filled: usize = self
            .collections
            .iter_mut()
            .map(|collection| collection.fill_missing_products(catalog))
            .sum();
        if filled > 0 {
            self.mark_dirty();
        }
        filled
    }

    fn mark_dirty(&mut self) {
        self.state = PanelState::Dirty;
    }

    // ------------------------------------------------------------------
    // Recompute hooks
    // ------------------------------------------------------------------

    pub(crate) fn set_state(&mut self, state: PanelState) {
        self.state = state;
    }

    /// Store freshly computed totals and content flags, returning the
    /// manufacturers whose flag flipped.
    pub(crate) fn publish(&mut self, totals: PanelTotals, flags: [bool; MANUFACTURER_COUNT]) -> Vec<(Manufacturer, bool)> {
        let changed = Manufacturer::ALL
            .iter()
            .filter(|m| self.content_flags[m.index()] != flags[m.index()])
            .map(|m| (*m, flags[m.index()]))
            .collect();
        self.totals = totals;
        self.content_flags = flags;
        changed
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    /// Snapshot of the panel inputs. Blank rows are left out.
    pub fn to_record(&self) -> PanelRecord {
        let hours = self
            .labor
            .iter()
            .map(|entry| (entry.category, entry.hours.clone()))
            .collect();

        let mut lines = BTreeMap::new();
        for collection in &self.collections {
            let rows: Vec<LineRecord> = collection
                .non_blank_rows()
                .map(|(row, item)| LineRecord {
                    row,
                    quantity: item.quantity.clone(),
                    reference: item.reference.clone(),
                    product: item.product.clone(),
                })
                .collect();
            if !rows.is_empty() {
                lines.insert(collection.manufacturer(), rows);
            }
        }

        PanelRecord {
            name: self.name.clone(),
            labor_type: self.labor_type,
            margin_percent: self.margin_percent,
            hours,
            lines,
        }
    }

    /// Rebuild a panel from a record. The panel comes back dirty.
    ///
    /// Product snapshots with a negative or non-finite number are dropped,
    /// leaving the row for [`Panel::fill_missing_products`].
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - blank name or non-numeric margin
    /// * `RowOutOfRange` - a stored row does not fit the configured capacity
    pub fn from_record(record: &PanelRecord, config: &EstimatorConfig) -> EstimateResult<Self> {
        if record.name.trim().is_empty() {
            return Err(EstimateError::invalid_input("name", &record.name, "Panel name cannot be blank"));
        }
        if !record.margin_percent.is_finite() {
            return Err(EstimateError::invalid_input(
                "margin_percent",
                record.margin_percent.to_string(),
                "Margin must be a number",
            ));
        }

        let mut panel = Panel::new(record.name.as_str(), config);
        panel.labor_type = record.labor_type;
        panel.margin_percent = record.margin_percent.clamp(0.0, 100.0);

        for (category, hours) in &record.hours {
            panel.labor[category.index()].hours = hours.trim().to_string();
        }

        for (manufacturer, rows) in &record.lines {
            let collection = &mut panel.collections[manufacturer.index()];
            for line in rows {
                // Invalid snapshots are dropped; the product is looked up again
                let product = match &line.product {
                    Some(product) if !product.is_valid() => {
                        warn!(%manufacturer, row = line.row, reference = %line.reference, "dropping invalid product snapshot");
                        None
                    }
                    other => other.clone(),
                };
                collection.paste_row(
                    line.row,
                    LineItem {
                        quantity: line.quantity.trim().to_string(),
                        reference: line.reference.trim().to_string(),
                        product,
                    },
                )?;
            }
        }

        Ok(panel)
    }
}
