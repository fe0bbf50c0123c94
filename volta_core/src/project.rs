//! # Project Data Structures
//!
//! The `Project` struct is the root container of an estimate: metadata
//! plus the panels, in tab order.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, name, client, volta number, timestamps)
//! └── panels: Vec<Panel> (unique names, insertion order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use volta_core::config::EstimatorConfig;
//! use volta_core::project::Project;
//!
//! let config = EstimatorConfig::builtin().unwrap();
//! let mut project = Project::new("Office block", "ACME Corp", "V-2024-017");
//!
//! let id = project.add_panel("TD-1", &config).unwrap();
//! assert!(project.add_panel(" TD-1 ", &config).is_err());
//!
//! // Records carry inputs only
//! let json = project.to_record().to_json_pretty().unwrap();
//! assert!(json.contains("TD-1"));
//! # let _ = id;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::EstimatorConfig;
use crate::errors::{EstimateError, EstimateResult};
use crate::panel::Panel;
use crate::record::{validate_version, ProjectRecord, SCHEMA_VERSION};

/// Root project container.
#[derive(Debug, Clone)]
pub struct Project {
    /// Project metadata (version, client, numbering)
    pub meta: ProjectMetadata,

    /// Panels in tab order
    panels: Vec<Panel>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `name` - Project / site name
    /// * `client` - Client name
    /// * `volta_number` - Internal quote number (e.g., "V-2024-017")
    pub fn new(name: impl Into<String>, client: impl Into<String>, volta_number: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                client: client.into(),
                volta_number: volta_number.into(),
                created: now,
                modified: now,
            },
            panels: Vec::new(),
        }
    }

    /// Create an empty panel and append it.
    ///
    /// Returns the id assigned to the panel.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - the trimmed name is empty
    /// * `DuplicatePanel` - a panel with this name already exists
    pub fn add_panel(&mut self, name: &str, config: &EstimatorConfig) -> EstimateResult<Uuid> {
        self.insert_panel(Panel::new(name, config))
    }

    /// Append an existing panel, enforcing name uniqueness.
    pub fn insert_panel(&mut self, panel: Panel) -> EstimateResult<Uuid> {
        self.check_name(panel.name(), None)?;
        let id = panel.id();
        info!(panel = panel.name(), %id, "panel added");
        self.panels.push(panel);
        self.touch();
        Ok(id)
    }

    /// Remove a panel, releasing its tables.
    pub fn remove_panel(&mut self, id: Uuid) -> EstimateResult<Panel> {
        let index = self
            .panels
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| EstimateError::panel_not_found(id))?;
        let panel = self.panels.remove(index);
        info!(panel = panel.name(), %id, "panel removed");
        self.touch();
        Ok(panel)
    }

    /// Rename a panel, keeping names unique.
    pub fn rename_panel(&mut self, id: Uuid, name: &str) -> EstimateResult<()> {
        self.check_name(name, Some(id))?;
        let panel = self.panel_mut(id)?;
        panel.set_name(name);
        self.touch();
        Ok(())
    }

    /// Get a panel by id.
    pub fn panel(&self, id: Uuid) -> EstimateResult<&Panel> {
        self.panels
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| EstimateError::panel_not_found(id))
    }

    /// Get a mutable reference to a panel by id.
    pub fn panel_mut(&mut self, id: Uuid) -> EstimateResult<&mut Panel> {
        self.panels
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| EstimateError::panel_not_found(id))
    }

    /// Find a panel by (trimmed) name.
    pub fn panel_by_name(&self, name: &str) -> Option<&Panel> {
        let wanted = name.trim();
        self.panels.iter().find(|p| p.name() == wanted)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub(crate) fn panels_mut(&mut self) -> &mut [Panel] {
        &mut self.panels
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Snapshot of every input in the project.
    pub fn to_record(&self) -> ProjectRecord {
        let mut meta = self.meta.clone();
        meta.version = SCHEMA_VERSION.to_string();
        ProjectRecord {
            meta,
            panels: self.panels.iter().map(Panel::to_record).collect(),
        }
    }

    /// Rebuild a project from a record. Every panel comes back dirty.
    ///
    /// # Errors
    ///
    /// * `VersionMismatch` - incompatible schema version
    /// * `DuplicatePanel` - two panels share a name
    /// * any error of [`Panel::from_record`]
    pub fn from_record(record: &ProjectRecord, config: &EstimatorConfig) -> EstimateResult<Self> {
        validate_version(&record.meta.version)?;

        let mut project = Project {
            meta: record.meta.clone(),
            panels: Vec::with_capacity(record.panels.len()),
        };
        for panel_record in &record.panels {
            let panel = Panel::from_record(panel_record, config)?;
            project.check_name(panel.name(), None)?;
            project.panels.push(panel);
        }
        project.meta.version = SCHEMA_VERSION.to_string();
        Ok(project)
    }

    fn check_name(&self, name: &str, except: Option<Uuid>) -> EstimateResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EstimateError::invalid_input("name", name, "Panel name cannot be blank"));
        }
        let taken = self
            .panels
            .iter()
            .any(|p| p.name() == name && Some(p.id()) != except);
        if taken {
            return Err(EstimateError::DuplicatePanel { name: name.to_string() });
        }
        Ok(())
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the record header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project / site name
    pub name: String,

    /// Client name
    pub client: String,

    /// Internal quote number
    pub volta_number: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}
