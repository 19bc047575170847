//! `storefront-orders` — order documents and the order enrichment pipeline.

pub mod enrichment;
pub mod order;

pub use enrichment::{enrich_user_orders, referenced_products, EnrichedItem, EnrichedOrder, ProductDetails};
pub use order::{NewOrder, OrderItem, OrderRecord};
