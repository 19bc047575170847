//! Product document types.
//!
//! Products are immutable once created: there is no update or delete
//! surface, so the record type carries no status/version machinery.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::ProductId;

/// One size entry on a product (`{size label, quantity on hand}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVariant {
    pub size: String,
    pub quantity: u32,
}

/// A product as submitted for creation (no identifier yet; the store
/// assigns one on insert).
///
/// Shape validation is what JSON deserialization gives us — field presence
/// and types. Price range is deliberately not checked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub sizes: Vec<SizeVariant>,
}

/// A product as persisted, identifier included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub sizes: Vec<SizeVariant>,
}

impl ProductRecord {
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            price: new.price,
            sizes: new.sizes,
        }
    }
}

/// Listing projection: `sizes` is stripped from catalog listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

impl From<ProductRecord> for ProductSummary {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            price: record.price,
        }
    }
}

/// Catalog listing filter.
///
/// `name` is a case-insensitive substring match; `size` is an exact label
/// match against any of the product's size entries. Both absent means
/// "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub size: Option<String>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.size.is_none()
    }

    /// Predicate form of the filter, used by the in-memory store. The
    /// Postgres store expresses the same semantics in SQL (`ILIKE` plus a
    /// JSONB label probe).
    pub fn matches(&self, record: &ProductRecord) -> bool {
        if let Some(name) = &self.name {
            if !record.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(size) = &self.size {
            if !record.sizes.iter().any(|s| &s.size == size) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(name: &str, sizes: &[(&str, u32)]) -> ProductRecord {
        ProductRecord {
            id: ProductId::new(),
            name: name.to_string(),
            price: dec!(10.0),
            sizes: sizes
                .iter()
                .map(|(label, quantity)| SizeVariant {
                    size: label.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let filter = ProductFilter {
            name: Some("shirt".to_string()),
            size: None,
        };

        assert!(filter.matches(&product("Red Shirt", &[])));
        assert!(filter.matches(&product("shirt-style-2", &[])));
        assert!(!filter.matches(&product("Pants", &[])));
    }

    #[test]
    fn size_filter_is_exact_label_match() {
        let filter = ProductFilter {
            name: None,
            size: Some("M".to_string()),
        };

        assert!(filter.matches(&product("Tee", &[("S", 1), ("M", 3)])));
        assert!(!filter.matches(&product("Tee", &[("S", 1)])));
        // No partial label matching.
        assert!(!filter.matches(&product("Tee", &[("XM", 2)])));
    }

    #[test]
    fn filters_combine_conjunctively() {
        let filter = ProductFilter {
            name: Some("tee".to_string()),
            size: Some("L".to_string()),
        };

        assert!(filter.matches(&product("Green Tee", &[("L", 1)])));
        assert!(!filter.matches(&product("Green Tee", &[("M", 1)])));
        assert!(!filter.matches(&product("Jacket", &[("L", 1)])));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ProductFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&product("Anything", &[])));
    }

    #[test]
    fn summary_drops_sizes() {
        let record = product("Tee", &[("S", 1)]);
        let summary = ProductSummary::from(record.clone());
        assert_eq!(summary.id, record.id);
        assert_eq!(summary.name, "Tee");
        assert_eq!(summary.price, dec!(10.0));
    }
}
