//! # Labor Model
//!
//! Labor roles, labor types and the per-panel hour entries.
//!
//! - [`LaborCategory`] - the seven fixed roles, each with its own base rate
//! - [`LaborType`] - Internal / External / BKW, selects the coefficient
//!   applied to every category's base rate
//! - [`LaborEntry`] - hours recorded for one category on one panel
//!
//! Switching the labor type never touches recorded hours; only the
//! effective rate changes.

use serde::{Deserialize, Serialize};

use crate::input::parse_number;

/// Fixed labor roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborCategory {
    /// Chef Projet
    ProjectLead,
    /// Chef Atelier
    WorkshopLead,
    /// Montage Câblage
    WiringAssembly,
    /// Schéma
    Schematics,
    /// Relevé
    Survey,
    Transport,
    /// Pose
    Installation,
}

impl LaborCategory {
    /// All categories, in table order
    pub const ALL: [LaborCategory; 7] = [
        LaborCategory::ProjectLead,
        LaborCategory::WorkshopLead,
        LaborCategory::WiringAssembly,
        LaborCategory::Schematics,
        LaborCategory::Survey,
        LaborCategory::Transport,
        LaborCategory::Installation,
    ];

    /// Key used in configuration tables and records
    pub fn code(&self) -> &'static str {
        match self {
            LaborCategory::ProjectLead => "project_lead",
            LaborCategory::WorkshopLead => "workshop_lead",
            LaborCategory::WiringAssembly => "wiring_assembly",
            LaborCategory::Schematics => "schematics",
            LaborCategory::Survey => "survey",
            LaborCategory::Transport => "transport",
            LaborCategory::Installation => "installation",
        }
    }

    /// Parse a configuration key
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Display name for tables and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            LaborCategory::ProjectLead => "Project Lead",
            LaborCategory::WorkshopLead => "Workshop Lead",
            LaborCategory::WiringAssembly => "Wiring Assembly",
            LaborCategory::Schematics => "Schematics",
            LaborCategory::Survey => "Survey",
            LaborCategory::Transport => "Transport",
            LaborCategory::Installation => "Installation",
        }
    }

    /// Position in [`LaborCategory::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for LaborCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which coefficient table applies to the base rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborType {
    /// Interne
    #[default]
    Internal,
    /// Externe
    External,
    Bkw,
}

impl LaborType {
    /// All labor types for UI selection
    pub const ALL: [LaborType; 3] = [LaborType::Internal, LaborType::External, LaborType::Bkw];

    /// Key used in configuration tables
    pub fn code(&self) -> &'static str {
        match self {
            LaborType::Internal => "internal",
            LaborType::External => "external",
            LaborType::Bkw => "bkw",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LaborType::Internal => "Internal",
            LaborType::External => "External",
            LaborType::Bkw => "BKW",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for LaborType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Hours recorded for one labor category on one panel.
///
/// Hours are kept as the text the user typed. Blank or unparsable text
/// counts as zero hours in every sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborEntry {
    pub category: LaborCategory,
    pub hours: String,
}

impl LaborEntry {
    /// New entry with the default "0" hours
    pub fn new(category: LaborCategory) -> Self {
        LaborEntry {
            category,
            hours: "0".to_string(),
        }
    }

    /// Parsed hours, `None` for blank or unparsable text
    pub fn parsed_hours(&self) -> Option<f64> {
        parse_number(&self.hours)
    }

    /// Hours used in cost sums (parse faults count as zero)
    pub fn effective_hours(&self) -> f64 {
        self.parsed_hours().unwrap_or(0.0)
    }
}

/// One entry per category, all at zero hours.
pub fn default_entries() -> Vec<LaborEntry> {
    LaborCategory::ALL.iter().map(|c| LaborEntry::new(*c)).collect()
}
