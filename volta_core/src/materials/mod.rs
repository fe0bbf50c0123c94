//! # Materials
//!
//! Bill-of-materials data for one panel.
//!
//! - [`Manufacturer`] - the closed set of manufacturers, one table each
//! - [`ProductInfo`] - static product fields filled in from the catalog
//! - [`LineItem`] - one table row: quantity text, reference text, product
//! - [`ManufacturerCollection`] - the fixed-capacity table of rows for one
//!   manufacturer
//!
//! ## Example
//!
//! ```rust
//! use volta_core::catalog::InMemoryCatalog;
//! use volta_core::materials::{Manufacturer, ManufacturerCollection};
//!
//! let catalog = InMemoryCatalog::with_sample_products();
//! let mut table = ManufacturerCollection::new(Manufacturer::Schneider, 200);
//!
//! table.set_reference(0, "A9F74206", &catalog).unwrap();
//! table.set_quantity(0, "2").unwrap();
//!
//! assert!(table.has_content());
//! assert!((table.rows()[0].line_price() - 91.2).abs() < 1e-9);
//! ```

pub mod collection;
pub mod line_item;

pub use collection::ManufacturerCollection;
pub use line_item::{LineItem, ProductInfo};

use serde::{Deserialize, Serialize};

/// Number of manufacturer tables on a panel
pub const MANUFACTURER_COUNT: usize = Manufacturer::ALL.len();

/// Manufacturers with a material table on every panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Manufacturer {
    Schneider,
    Hager,
    /// Building-automation devices; counted separately in the module stats
    #[serde(rename = "KNX")]
    Knx,
    #[serde(rename = "MCR")]
    Mcr,
    Swisspro,
}

impl Manufacturer {
    /// All manufacturers, in tab order
    pub const ALL: [Manufacturer; 5] = [
        Manufacturer::Schneider,
        Manufacturer::Hager,
        Manufacturer::Knx,
        Manufacturer::Mcr,
        Manufacturer::Swisspro,
    ];

    /// Code used in catalogs, records and configuration
    pub fn code(&self) -> &'static str {
        match self {
            Manufacturer::Schneider => "Schneider",
            Manufacturer::Hager => "Hager",
            Manufacturer::Knx => "KNX",
            Manufacturer::Mcr => "MCR",
            Manufacturer::Swisspro => "Swisspro",
        }
    }

    /// Parse a manufacturer code, ignoring case and surrounding whitespace
    pub fn from_str_flexible(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.code().eq_ignore_ascii_case(wanted))
    }

    /// Position in [`Manufacturer::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_serialization() {
        let json = serde_json::to_string(&Manufacturer::Knx).unwrap();
        assert_eq!(json, "\"KNX\"");
        let roundtrip: Manufacturer = serde_json::from_str("\"Swisspro\"").unwrap();
        assert_eq!(roundtrip, Manufacturer::Swisspro);
    }

    #[test]
    fn test_from_str_flexible() {
        assert_eq!(Manufacturer::from_str_flexible("knx"), Some(Manufacturer::Knx));
        assert_eq!(Manufacturer::from_str_flexible(" Hager "), Some(Manufacturer::Hager));
        assert_eq!(Manufacturer::from_str_flexible("Legrand"), None);
    }

    #[test]
    fn test_all_codes_parse_back() {
        for m in Manufacturer::ALL {
            assert_eq!(Manufacturer::from_str_flexible(m.code()), Some(m));
        }
        for (i, m) in Manufacturer::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }
}
