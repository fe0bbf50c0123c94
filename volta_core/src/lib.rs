//! # volta_core - Electrical Panel Cost Estimation Engine
//!
//! `volta_core` turns the raw inputs of an electrical-panel estimate
//! (material lines per manufacturer, labor hours, margin, labor type)
//! into consistent derived totals: material cost and time, labor cost,
//! the margin-adjusted final price and panel-sizing statistics.
//!
//! ## Design Philosophy
//!
//! - **Pure aggregation**: totals are a function of current inputs only,
//!   recomputed in full on every pass
//! - **Explicit propagation**: edits mark a panel dirty, a synchronous
//!   pass recomputes and notifies observers
//! - **Injected configuration**: rate tables and sizing rules are a
//!   validated, read-only value
//! - **JSON-First**: records, totals, events and errors serialize cleanly
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use volta_core::{Estimator, EstimatorConfig, InMemoryCatalog, Manufacturer, Project};
//!
//! let config = Arc::new(EstimatorConfig::builtin().unwrap());
//! let mut session = Estimator::new(
//!     Project::new("Office block", "ACME", "V-2024-017"),
//!     Box::new(InMemoryCatalog::with_sample_products()),
//!     config,
//! );
//!
//! let panel = session.add_panel("TD-1").unwrap();
//! session.set_reference(panel, Manufacturer::Knx, 0, "MTN6003-0002").unwrap();
//! session.set_quantity(panel, Manufacturer::Knx, 0, "2").unwrap();
//!
//! let totals = session.totals(panel).unwrap();
//! assert_eq!(totals.materials.modules.knx_modules, 4.0);
//! ```
//!
//! ## Modules
//!
//! - [`estimator`] - Editing session: one method per edit, recompute after each
//! - [`project`] - Project container and metadata
//! - [`panel`] - Panel inputs and published totals
//! - [`calculations`] - Material, module, labor and summary aggregation
//! - [`recompute`] - Dirty → Recomputed → Idle controller and observers
//! - [`materials`] - Manufacturers, line items, manufacturer tables
//! - [`labor`] - Labor categories, labor types, hour entries
//! - [`rates`] - Base rates and labor-type coefficients
//! - [`catalog`] - Product lookup contract
//! - [`config`] - Validated reference tables
//! - [`record`] - Persistence records and schema versioning
//! - [`export`] - Read-only snapshot for reporting
//! - [`input`] - Numeric cell-text parsing
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod estimator;
pub mod export;
pub mod input;
pub mod labor;
pub mod materials;
pub mod panel;
pub mod project;
pub mod rates;
pub mod recompute;
pub mod record;

// Re-export commonly used types at crate root for convenience
pub use calculations::{LaborTotals, MaterialTotals, PanelTotals, SummaryTotals};
pub use catalog::{InMemoryCatalog, ProductCatalog};
pub use config::{EstimatorConfig, SizingRules};
pub use errors::{EstimateError, EstimateResult};
pub use estimator::Estimator;
pub use export::ProjectExport;
pub use labor::{LaborCategory, LaborType};
pub use materials::Manufacturer;
pub use panel::Panel;
pub use project::{Project, ProjectMetadata};
pub use recompute::{EstimateEvent, EstimateObserver, EventLog, PanelState, RecomputeController};
pub use record::{ProjectRecord, SCHEMA_VERSION};
