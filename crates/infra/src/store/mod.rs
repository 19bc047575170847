//! Document store boundary.
//!
//! The rest of the system talks to persistence exclusively through the
//! [`DocumentStore`] trait: two collections (`products`, `orders`), insert
//! and read operations, nothing else. The HTTP layer injects one shared
//! implementation into every handler; correctness across concurrent
//! requests relies on the backend's single-write atomicity, with no extra
//! locking or transactions layered on top.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use storefront_catalog::{NewProduct, ProductFilter, ProductRecord, ProductSummary};
use storefront_core::{OrderId, PageRequest, ProductId};
use storefront_orders::{NewOrder, OrderRecord};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Infrastructure-level store failure. Surfaced to HTTP callers as a server
/// error; never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("document encoding failed: {0}")]
    Encoding(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

/// Read/write operations over the `products` and `orders` collections.
///
/// Identifiers are assigned by the store on insert. Reads that match
/// nothing return empty collections, never errors.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a product document; returns the generated identifier.
    async fn insert_product(&self, product: NewProduct) -> Result<ProductId, StoreError>;

    /// List products matching `filter`, windowed by `window`, with the
    /// `sizes` field projected out.
    async fn list_products(
        &self,
        filter: &ProductFilter,
        window: PageRequest,
    ) -> Result<Vec<ProductSummary>, StoreError>;

    /// Insert an order document verbatim; returns the generated identifier.
    /// Product references and quantities are not checked.
    async fn insert_order(&self, order: NewOrder) -> Result<OrderId, StoreError>;

    /// All orders whose `userId` equals `user_id` exactly (case-sensitive),
    /// in insertion order.
    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, StoreError>;

    /// Full product records for the given ids; missing ids are simply
    /// absent from the result (the caller's join treats them as misses).
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductRecord>, StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn insert_product(&self, product: NewProduct) -> Result<ProductId, StoreError> {
        (**self).insert_product(product).await
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        window: PageRequest,
    ) -> Result<Vec<ProductSummary>, StoreError> {
        (**self).list_products(filter, window).await
    }

    async fn insert_order(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        (**self).insert_order(order).await
    }

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, StoreError> {
        (**self).orders_for_user(user_id).await
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductRecord>, StoreError> {
        (**self).products_by_ids(ids).await
    }
}
