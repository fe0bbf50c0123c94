//! # Estimator Session
//!
//! One editing session over a project. The session owns the project, the
//! product catalog and the [`RecomputeController`]; every edit method
//! applies the change to one panel and runs the recompute pass before
//! returning, so published totals are never behind the inputs.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use volta_core::catalog::InMemoryCatalog;
//! use volta_core::config::EstimatorConfig;
//! use volta_core::estimator::Estimator;
//! use volta_core::labor::LaborCategory;
//! use volta_core::materials::Manufacturer;
//! use volta_core::project::Project;
//!
//! let config = Arc::new(EstimatorConfig::builtin().unwrap());
//! let mut session = Estimator::new(
//!     Project::new("Office block", "ACME", "V-2024-017"),
//!     Box::new(InMemoryCatalog::with_sample_products()),
//!     config,
//! );
//!
//! let td1 = session.add_panel("TD-1").unwrap();
//! session.set_reference(td1, Manufacturer::Schneider, 0, "A9F74206").unwrap();
//! session.set_quantity(td1, Manufacturer::Schneider, 0, "2").unwrap();
//! session.set_hours(td1, LaborCategory::Schematics, "10").unwrap();
//!
//! let totals = session.totals(td1).unwrap();
//! assert!((totals.summary.final_total - (91.2 * 1.25 + 960.0)).abs() < 1e-9);
//! ```

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::calculations::PanelTotals;
use crate::catalog::ProductCatalog;
use crate::config::EstimatorConfig;
use crate::errors::EstimateResult;
use crate::export::ProjectExport;
use crate::labor::{LaborCategory, LaborType};
use crate::materials::{LineItem, Manufacturer};
use crate::panel::Panel;
use crate::project::Project;
use crate::recompute::{EstimateObserver, RecomputeController};
use crate::record::ProjectRecord;

/// Editing session over one project.
pub struct Estimator {
    project: Project,
    catalog: Box<dyn ProductCatalog>,
    controller: RecomputeController,
    /// Row copied with [`Estimator::copy_row`]
    clipboard: Option<LineItem>,
}

impl std::fmt::Debug for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("project", &self.project.meta)
            .field("panels", &self.project.panel_count())
            .field("controller", &self.controller)
            .finish()
    }
}

impl Estimator {
    /// Start a session. Dirty panels are recomputed immediately.
    pub fn new(project: Project, catalog: Box<dyn ProductCatalog>, config: Arc<EstimatorConfig>) -> Self {
        let mut session = Estimator {
            project,
            catalog,
            controller: RecomputeController::new(config),
            clipboard: None,
        };
        session.recompute_all();
        session
    }

    /// Start a session from a stored record.
    ///
    /// Rows stored without product fields are looked up in `catalog`.
    pub fn from_record(
        record: &ProjectRecord,
        catalog: Box<dyn ProductCatalog>,
        config: Arc<EstimatorConfig>,
    ) -> EstimateResult<Self> {
        let mut project = Project::from_record(record, &config)?;
        for panel in project.panels_mut() {
            let filled = panel.fill_missing_products(catalog.as_ref());
            if filled > 0 {
                debug!(panel = panel.name(), filled, "product fields looked up from catalog");
            }
        }
        Ok(Self::new(project, catalog, config))
    }

    /// Register an observer for every later recompute pass.
    pub fn subscribe(&mut self, observer: Arc<dyn EstimateObserver>) {
        self.controller.subscribe(observer);
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn config(&self) -> &EstimatorConfig {
        self.controller.config()
    }

    pub fn catalog(&self) -> &dyn ProductCatalog {
        self.catalog.as_ref()
    }

    // ------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------

    /// Create a panel and publish its (empty) totals.
    pub fn add_panel(&mut self, name: &str) -> EstimateResult<Uuid> {
        let id = self.project.add_panel(name, self.controller.config())?;
        let panel = self.project.panel_mut(id)?;
        self.controller.process(panel);
        Ok(id)
    }

    pub fn remove_panel(&mut self, id: Uuid) -> EstimateResult<()> {
        self.project.remove_panel(id).map(|_| ())
    }

    pub fn rename_panel(&mut self, id: Uuid, name: &str) -> EstimateResult<()> {
        self.project.rename_panel(id, name)
    }

    pub fn panel(&self, id: Uuid) -> EstimateResult<&Panel> {
        self.project.panel(id)
    }

    /// Published totals of a panel
    pub fn totals(&self, id: Uuid) -> EstimateResult<&PanelTotals> {
        Ok(self.project.panel(id)?.totals())
    }

    pub fn has_content(&self, id: Uuid, manufacturer: Manufacturer) -> EstimateResult<bool> {
        Ok(self.project.panel(id)?.has_content(manufacturer))
    }

    /// Adjusted rate column of a panel's labor table
    pub fn labor_rates(&self, id: Uuid) -> EstimateResult<Vec<(LaborCategory, f64)>> {
        Ok(self.project.panel(id)?.labor_rates(&self.controller.config().rates))
    }

    /// `(reference, designation)` suggestions for a manufacturer table
    pub fn references(&self, manufacturer: Manufacturer) -> Vec<(String, String)> {
        self.catalog.references(manufacturer)
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    pub fn set_quantity(&mut self, id: Uuid, manufacturer: Manufacturer, row: usize, text: &str) -> EstimateResult<()> {
        self.edit(id, |panel, _| panel.set_quantity(manufacturer, row, text))
    }

    /// Returns `true` when the catalog knew the reference.
    pub fn set_reference(
        &mut self,
        id: Uuid,
        manufacturer: Manufacturer,
        row: usize,
        text: &str,
    ) -> EstimateResult<bool> {
        self.edit(id, |panel, catalog| panel.set_reference(manufacturer, row, text, catalog))
    }

    pub fn clear_row(&mut self, id: Uuid, manufacturer: Manufacturer, row: usize) -> EstimateResult<()> {
        self.edit(id, |panel, _| panel.clear_row(manufacturer, row))
    }

    /// Copy one row to the session clipboard.
    pub fn copy_row(&mut self, id: Uuid, manufacturer: Manufacturer, row: usize) -> EstimateResult<()> {
        let item = self.project.panel(id)?.copy_row(manufacturer, row)?;
        self.clipboard = Some(item);
        Ok(())
    }

    /// Paste the clipboard row. Returns `false` when the clipboard is empty.
    pub fn paste_row(&mut self, id: Uuid, manufacturer: Manufacturer, row: usize) -> EstimateResult<bool> {
        let Some(item) = self.clipboard.clone() else {
            return Ok(false);
        };
        self.edit(id, |panel, _| panel.paste_row(manufacturer, row, item))?;
        Ok(true)
    }

    pub fn set_hours(&mut self, id: Uuid, category: LaborCategory, text: &str) -> EstimateResult<()> {
        self.edit(id, |panel, _| {
            panel.set_hours(category, text);
            Ok(())
        })
    }

    /// Set the margin, clamped to [0, 100].
    pub fn set_margin_percent(&mut self, id: Uuid, margin_percent: f64) -> EstimateResult<()> {
        self.edit(id, |panel, _| {
            panel.set_margin_percent(margin_percent);
            Ok(())
        })
    }

    /// Set the margin from text; unparsable text is ignored (`false`).
    pub fn set_margin_text(&mut self, id: Uuid, text: &str) -> EstimateResult<bool> {
        self.edit(id, |panel, _| Ok(panel.set_margin_text(text)))
    }

    pub fn set_labor_type(&mut self, id: Uuid, labor_type: LaborType) -> EstimateResult<()> {
        self.edit(id, |panel, _| {
            panel.set_labor_type(labor_type);
            Ok(())
        })
    }

    /// Recompute every dirty panel.
    pub fn recompute_all(&mut self) {
        for panel in self.project.panels_mut() {
            self.controller.process(panel);
        }
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    pub fn to_record(&self) -> ProjectRecord {
        self.project.to_record()
    }

    pub fn export(&self) -> ProjectExport {
        ProjectExport::from_project(&self.project, &self.controller.config().rates)
    }

    /// Apply one edit to a panel, then run the recompute pass.
    fn edit<T>(
        &mut self,
        id: Uuid,
        apply: impl FnOnce(&mut Panel, &dyn ProductCatalog) -> EstimateResult<T>,
    ) -> EstimateResult<T> {
        let panel = self.project.panel_mut(id)?;
        let outcome = apply(panel, self.catalog.as_ref())?;
        self.controller.process(panel);
        self.project.touch();
        Ok(outcome)
    }
}
