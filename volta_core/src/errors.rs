//! # Error Types
//!
//! Structured error types for volta_core. Two families exist:
//!
//! - **Configuration faults** (missing base rate or coefficient, malformed
//!   tables). These are fatal and surface while building an
//!   [`EstimatorConfig`](crate::config::EstimatorConfig), before any panel
//!   is usable.
//! - **Editing faults** (unknown panel, row outside the table, duplicate
//!   panel name, bad record). These are returned to the editing caller.
//!
//! Per-row numeric faults (a quantity of `"abc"`) are deliberately *not*
//! errors: a recompute pass absorbs them and reports them as
//! [`SkippedRow`](crate::calculations::SkippedRow) warnings.
//!
//! ## Example
//!
//! ```rust
//! use volta_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_margin(margin: f64) -> EstimateResult<()> {
//!     if !(0.0..=100.0).contains(&margin) {
//!         return Err(EstimateError::invalid_input(
//!             "margin_percent",
//!             margin.to_string(),
//!             "Margin must be between 0 and 100",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for volta_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for estimator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// A labor category has no base rate in the configuration
    #[error("Missing base rate for labor category '{category}'")]
    MissingBaseRate { category: String },

    /// A (labor type, category) pair has no coefficient in the configuration
    #[error("Missing coefficient for labor type '{labor_type}' and category '{category}'")]
    MissingCoefficient { labor_type: String, category: String },

    /// The configuration document is malformed or holds an out-of-range value
    #[error("Invalid configuration '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },

    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A panel with this name already exists in the project
    #[error("Panel '{name}' already exists in this project")]
    DuplicatePanel { name: String },

    /// No panel with this id or name
    #[error("Panel not found: {panel}")]
    PanelNotFound { panel: String },

    /// Row index outside the manufacturer table
    #[error("Row {row} is outside the table (capacity {capacity})")]
    RowOutOfRange { row: usize, capacity: usize },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: record version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl EstimateError {
    /// Create a MissingBaseRate error
    pub fn missing_base_rate(category: impl Into<String>) -> Self {
        EstimateError::MissingBaseRate {
            category: category.into(),
        }
    }

    /// Create a MissingCoefficient error
    pub fn missing_coefficient(labor_type: impl Into<String>, category: impl Into<String>) -> Self {
        EstimateError::MissingCoefficient {
            labor_type: labor_type.into(),
            category: category.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a PanelNotFound error
    pub fn panel_not_found(panel: impl ToString) -> Self {
        EstimateError::PanelNotFound {
            panel: panel.to_string(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Configuration faults stop initialization; everything else is local
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EstimateError::MissingBaseRate { .. }
                | EstimateError::MissingCoefficient { .. }
                | EstimateError::InvalidConfig { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::MissingBaseRate { .. } => "MISSING_BASE_RATE",
            EstimateError::MissingCoefficient { .. } => "MISSING_COEFFICIENT",
            EstimateError::InvalidConfig { .. } => "INVALID_CONFIG",
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::DuplicatePanel { .. } => "DUPLICATE_PANEL",
            EstimateError::PanelNotFound { .. } => "PANEL_NOT_FOUND",
            EstimateError::RowOutOfRange { .. } => "ROW_OUT_OF_RANGE",
            EstimateError::FileError { .. } => "FILE_ERROR",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
