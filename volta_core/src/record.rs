//! # Persistence Records
//!
//! Plain serializable snapshots of a project's *inputs*. Derived totals
//! are never stored: restoring a record always goes through a recompute.
//!
//! ```text
//! ProjectRecord
//! ├── meta: ProjectMetadata (version, name, client, volta number, timestamps)
//! └── panels: [PanelRecord]
//!     ├── name, labor_type, margin_percent
//!     ├── hours: category → text
//!     └── lines: manufacturer → [LineRecord { row, quantity, reference, product }]
//! ```
//!
//! Only non-blank rows are written. How records reach a disk is up to the
//! caller; JSON helpers are provided for convenience.
//!
//! ## Example
//!
//! ```rust
//! use volta_core::record::{ProjectRecord, SCHEMA_VERSION};
//!
//! let json = format!(
//!     r#"{{
//!         "meta": {{
//!             "version": "{}",
//!             "name": "Office block",
//!             "client": "ACME",
//!             "volta_number": "V-2024-017",
//!             "created": "2024-03-01T08:00:00Z",
//!             "modified": "2024-03-01T08:00:00Z"
//!         }},
//!         "panels": [{{ "name": "TD-1", "margin_percent": 25.0 }}]
//!     }}"#,
//!     SCHEMA_VERSION
//! );
//!
//! let record = ProjectRecord::from_json(&json).unwrap();
//! assert_eq!(record.panels[0].name, "TD-1");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::labor::{LaborCategory, LaborType};
use crate::materials::{Manufacturer, ProductInfo};
use crate::project::ProjectMetadata;

/// Current schema version for estimate records
pub const SCHEMA_VERSION: &str = "0.1.0";

/// One stored table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Row index within the manufacturer table
    pub row: usize,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub reference: String,
    /// Catalog fields captured at the last lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductInfo>,
}

/// Inputs of one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRecord {
    pub name: String,
    #[serde(default)]
    pub labor_type: LaborType,
    pub margin_percent: f64,
    /// Hours text per labor category; missing categories are "0"
    #[serde(default)]
    pub hours: BTreeMap<LaborCategory, String>,
    /// Non-blank rows per manufacturer
    #[serde(default)]
    pub lines: BTreeMap<Manufacturer, Vec<LineRecord>>,
}

/// Inputs of a whole project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub meta: ProjectMetadata,
    #[serde(default)]
    pub panels: Vec<PanelRecord>,
}

impl ProjectRecord {
    /// Parse a JSON record and check its schema version.
    ///
    /// # Errors
    ///
    /// * `SerializationError` - invalid JSON or wrong shape
    /// * `VersionMismatch` - record written by an incompatible schema
    pub fn from_json(json: &str) -> EstimateResult<Self> {
        let record: ProjectRecord = serde_json::from_str(json).map_err(|e| EstimateError::SerializationError {
            reason: format!("Invalid estimate record: {}", e),
        })?;
        validate_version(&record.meta.version)?;
        Ok(record)
    }

    /// Pretty-printed JSON form.
    pub fn to_json_pretty(&self) -> EstimateResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EstimateError::SerializationError {
            reason: e.to_string(),
        })
    }
}

/// Check that a record version is compatible with [`SCHEMA_VERSION`].
///
/// The major version must match. While the schema is 0.x, a record with
/// a newer minor version is rejected as well.
pub fn validate_version(record_version: &str) -> EstimateResult<()> {
    let mismatch = || EstimateError::VersionMismatch {
        file_version: record_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let record_parts: Vec<u32> = record_version
        .split('.')
        .filter_map(|p| p.trim().parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let (Some(record_major), Some(current_major)) = (record_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };

    if record_major != current_major {
        return Err(mismatch());
    }

    if *current_major == 0 {
        if let (Some(record_minor), Some(current_minor)) = (record_parts.get(1), current_parts.get(1)) {
            if record_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}
