//! # Product Catalog
//!
//! The engine only *reads* the catalog: a reference typed into a
//! manufacturer table is looked up to fill the row's product fields.
//! How products are stored or searched is up to the implementor.
//!
//! [`InMemoryCatalog`] is a map-backed implementation, used by the CLI demo
//! and by tests. [`InMemoryCatalog::with_sample_products`] carries a small
//! demo data set covering every manufacturer.
//!
//! ## Example
//!
//! ```rust
//! use volta_core::catalog::{InMemoryCatalog, ProductCatalog};
//! use volta_core::materials::Manufacturer;
//!
//! let catalog = InMemoryCatalog::with_sample_products();
//! let product = catalog.lookup_product("MTN6003-0002", Manufacturer::Knx).unwrap();
//! assert_eq!(product.designation, "KNX IP Router");
//!
//! // Lookups are scoped to the manufacturer
//! assert!(catalog.lookup_product("MTN6003-0002", Manufacturer::Hager).is_none());
//! ```

use std::collections::HashMap;

use crate::materials::{Manufacturer, ProductInfo};

/// Read contract of a product catalog.
pub trait ProductCatalog: Send + Sync {
    /// Product fields for `reference` in `manufacturer`'s range, `None` if unknown.
    fn lookup_product(&self, reference: &str, manufacturer: Manufacturer) -> Option<ProductInfo>;

    /// `(reference, designation)` pairs of one manufacturer, sorted by
    /// reference. Backs reference auto-completion.
    fn references(&self, manufacturer: Manufacturer) -> Vec<(String, String)>;
}

/// Map-backed catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<(Manufacturer, String), ProductInfo>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product.
    pub fn insert(&mut self, manufacturer: Manufacturer, product: ProductInfo) {
        self.products
            .insert((manufacturer, product.reference.clone()), product);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_product(mut self, manufacturer: Manufacturer, product: ProductInfo) -> Self {
        self.insert(manufacturer, product);
        self
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Demo data set: breakers, actuators and accessories across the five
    /// manufacturers.
    pub fn with_sample_products() -> Self {
        // (reference, designation, price, minutes, modules, terminals, terminal mm, total terminal mm, 2S, 3S)
        type Row = (&'static str, &'static str, f64, u32, f64, f64, f64, f64, f64, f64);
        let data: [(Manufacturer, &[Row]); 5] = [
            (
                Manufacturer::Schneider,
                &[
                    ("A9F74206", "iC60N 2P C 6A", 45.60, 15, 2.0, 4.0, 17.5, 70.0, 50.20, 55.80),
                    ("A9F74210", "iC60N 2P C 10A", 48.90, 15, 2.0, 4.0, 17.5, 70.0, 53.80, 59.40),
                    ("A9F74216", "iC60N 2P C 16A", 52.30, 15, 2.0, 4.0, 17.5, 70.0, 57.50, 63.30),
                    ("A9F74220", "iC60N 2P C 20A", 55.70, 15, 2.0, 4.0, 17.5, 70.0, 61.30, 67.40),
                    ("A9F74225", "iC60N 2P C 25A", 58.40, 15, 2.0, 4.0, 17.5, 70.0, 64.20, 70.60),
                ],
            ),
            (
                Manufacturer::Hager,
                &[
                    ("HTS263E", "Switch 2P C 63A", 62.30, 20, 4.0, 6.0, 17.5, 105.0, 68.50, 75.40),
                    ("HTS240E", "Switch 2P C 40A", 58.70, 20, 4.0, 6.0, 17.5, 105.0, 64.60, 71.20),
                    ("HTS232E", "Switch 2P C 32A", 55.90, 20, 4.0, 6.0, 17.5, 105.0, 61.50, 67.70),
                    ("HTS225E", "Switch 2P C 25A", 54.30, 20, 4.0, 6.0, 17.5, 105.0, 59.70, 65.70),
                ],
            ),
            (
                Manufacturer::Knx,
                &[
                    ("MTN6725-0001", "KNX Power Supply 640mA", 385.0, 30, 4.0, 8.0, 17.5, 140.0, 423.50, 465.85),
                    ("MTN6003-0002", "KNX IP Router", 420.0, 35, 2.0, 4.0, 17.5, 70.0, 462.00, 508.20),
                    ("MTN6164-0004", "KNX Switch Actuator 4-fold", 275.0, 25, 4.0, 8.0, 17.5, 140.0, 302.50, 332.75),
                ],
            ),
            (
                Manufacturer::Mcr,
                &[
                    ("MCR001", "Control relay", 145.30, 25, 2.0, 6.0, 17.5, 105.0, 159.83, 175.81),
                    ("MCR002", "Digital timer", 168.50, 28, 2.0, 4.0, 17.5, 70.0, 185.35, 203.89),
                    ("MCR003", "Energy meter", 195.70, 30, 4.0, 8.0, 17.5, 140.0, 215.27, 236.80),
                ],
            ),
            (
                Manufacturer::Swisspro,
                &[
                    ("SP001", "Socket T13", 35.40, 10, 1.0, 3.0, 17.5, 52.5, 38.94, 42.83),
                    ("SP002", "Switch", 42.60, 12, 1.0, 4.0, 17.5, 70.0, 46.86, 51.55),
                    ("SP003", "LED dimmer", 85.30, 15, 2.0, 6.0, 17.5, 105.0, 93.83, 103.21),
                ],
            ),
        ];

        let mut catalog = InMemoryCatalog::new();
        for (manufacturer, rows) in data {
            for &(reference, designation, price, minutes, modules, terminals, terminal_mm, total_mm, p2, p3) in rows {
                catalog.insert(
                    manufacturer,
                    ProductInfo {
                        reference: reference.to_string(),
                        designation: designation.to_string(),
                        unit_price: price,
                        unit_time_minutes: minutes,
                        module_width: Some(modules),
                        terminal_count: Some(terminals),
                        terminal_width_mm: Some(terminal_mm),
                        total_terminal_width_mm: Some(total_mm),
                        price_2s: Some(p2),
                        price_3s: Some(p3),
                    },
                );
            }
        }
        catalog
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn lookup_product(&self, reference: &str, manufacturer: Manufacturer) -> Option<ProductInfo> {
        self.products
            .get(&(manufacturer, reference.trim().to_string()))
            .cloned()
    }

    fn references(&self, manufacturer: Manufacturer) -> Vec<(String, String)> {
        let mut refs: Vec<(String, String)> = self
            .products
            .iter()
            .filter(|((m, _), _)| *m == manufacturer)
            .map(|((_, reference), product)| (reference.clone(), product.designation.clone()))
            .collect();
        refs.sort();
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_covers_every_manufacturer() {
        let catalog = InMemoryCatalog::with_sample_products();
        assert_eq!(catalog.len(), 18);
        for manufacturer in Manufacturer::ALL {
            assert!(!catalog.references(manufacturer).is_empty(), "{}", manufacturer);
        }
    }

    #[test]
    fn test_lookup_fields() {
        let catalog = InMemoryCatalog::with_sample_products();
        let product = catalog.lookup_product("A9F74206", Manufacturer::Schneider).unwrap();
        assert_eq!(product.unit_price, 45.60);
        assert_eq!(product.unit_time_minutes, 15);
        assert_eq!(product.module_width, Some(2.0));
        assert_eq!(product.total_terminal_width_mm, Some(70.0));
    }

    #[test]
    fn test_lookup_miss() {
        let catalog = InMemoryCatalog::with_sample_products();
        assert!(catalog.lookup_product("A9F99999", Manufacturer::Schneider).is_none());
        assert!(catalog.lookup_product("SP001", Manufacturer::Schneider).is_none());
    }

    #[test]
    fn test_references_sorted() {
        let catalog = InMemoryCatalog::with_sample_products();
        let refs = catalog.references(Manufacturer::Mcr);
        let keys: Vec<&str> = refs.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(keys, vec!["MCR001", "MCR002", "MCR003"]);
        assert_eq!(refs[1].1, "Digital timer");
    }

    #[test]
    fn test_custom_product() {
        let catalog = InMemoryCatalog::new().with_product(
            Manufacturer::Hager,
            ProductInfo {
                reference: "HAGER-HALF".into(),
                designation: "Half-module accessory".into(),
                unit_price: 4.0,
                unit_time_minutes: 2,
                module_width: Some(0.5),
                terminal_count: None,
                terminal_width_mm: None,
                total_terminal_width_mm: None,
                price_2s: None,
                price_3s: None,
            },
        );
        assert!(catalog.lookup_product("HAGER-HALF", Manufacturer::Hager).is_some());
        assert!(!catalog.is_empty());
    }
}
