use serde::Deserialize;

use storefront_catalog::ProductFilter;
use storefront_core::{page::DEFAULT_LIMIT, PageRequest};

// Request bodies deserialize straight into the domain's `NewProduct` /
// `NewOrder` types; only query strings need dedicated DTOs here.

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub name: Option<String>,
    pub size: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Deserialize)]
pub struct UserOrdersQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl ListProductsQuery {
    pub fn window(&self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }

    /// Empty query values (`?name=`) mean "no filter", matching the
    /// original surface's treatment of blank parameters.
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            name: self.name.clone().filter(|s| !s.is_empty()),
            size: self.size.clone().filter(|s| !s.is_empty()),
        }
    }
}

impl UserOrdersQuery {
    pub fn window(&self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }
}
