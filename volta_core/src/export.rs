//! # Export Snapshot
//!
//! Read-only view of a project for a reporting collaborator: project
//! info, and per panel the active material rows, the labor rows and the
//! published totals. No formatting or file writing happens here.
//!
//! The snapshot reads the totals published by the last recompute pass;
//! build it from an [`Estimator`](crate::estimator::Estimator) (which
//! recomputes after every edit) to get current figures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::PanelTotals;
use crate::errors::{EstimateError, EstimateResult};
use crate::labor::{LaborCategory, LaborType};
use crate::materials::Manufacturer;
use crate::panel::Panel;
use crate::project::Project;
use crate::rates::RateTable;

/// Whole-project export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectExport {
    pub info: ProjectInfo,
    pub panels: Vec<PanelExport>,
}

/// Project header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub client: String,
    pub volta_number: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub panel_count: usize,
}

/// One panel's sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelExport {
    pub name: String,
    pub labor_type: LaborType,
    pub margin_percent: f64,
    pub materials: Vec<MaterialRow>,
    pub labor: Vec<LaborRow>,
    pub totals: PanelTotals,
}

/// One active material line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRow {
    pub manufacturer: Manufacturer,
    pub row: usize,
    pub reference: String,
    pub designation: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_price: f64,
    pub unit_time_minutes: u32,
    pub line_time_minutes: u64,
    pub module_width: Option<f64>,
}

/// One labor category line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaborRow {
    pub category: LaborCategory,
    pub hours: f64,
    /// Adjusted hourly rate under the panel's labor type
    pub rate: f64,
    pub cost: f64,
}

impl ProjectExport {
    /// Build the snapshot of every panel, in tab order.
    pub fn from_project(project: &Project, rates: &RateTable) -> Self {
        ProjectExport {
            info: ProjectInfo {
                name: project.meta.name.clone(),
                client: project.meta.client.clone(),
                volta_number: project.meta.volta_number.clone(),
                created: project.meta.created,
                modified: project.meta.modified,
                panel_count: project.panel_count(),
            },
            panels: project
                .panels()
                .iter()
                .map(|panel| PanelExport::from_panel(panel, rates))
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> EstimateResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EstimateError::SerializationError {
            reason: e.to_string(),
        })
    }
}

impl PanelExport {
    pub fn from_panel(panel: &Panel, rates: &RateTable) -> Self {
        let materials = panel
            .collections()
            .iter()
            .flat_map(|collection| {
                let manufacturer = collection.manufacturer();
                collection.active_rows().map(move |(row, item)| {
                    let product = item.product.as_ref();
                    MaterialRow {
                        manufacturer,
                        row,
                        reference: item.reference.clone(),
                        designation: item.designation().to_string(),
                        quantity: item.parsed_quantity().unwrap_or(0.0),
                        unit_price: product.map_or(0.0, |p| p.unit_price),
                        line_price: item.line_price(),
                        unit_time_minutes: product.map_or(0, |p| p.unit_time_minutes),
                        line_time_minutes: item.line_time_minutes(),
                        module_width: product.and_then(|p| p.module_width),
                    }
                })
            })
            .collect();

        let labor_type = panel.labor_type();
        let labor = panel
            .labor_entries()
            .iter()
            .map(|entry| {
                let hours = entry.effective_hours();
                let rate = rates.adjusted_rate(entry.category, labor_type);
                LaborRow {
                    category: entry.category,
                    hours,
                    rate,
                    cost: hours * rate,
                }
            })
            .collect();

        PanelExport {
            name: panel.name().to_string(),
            labor_type,
            margin_percent: panel.margin_percent(),
            materials,
            labor,
            totals: panel.totals().clone(),
        }
    }
}
