//! In-memory document store for tests/dev.

use std::sync::RwLock;

use async_trait::async_trait;

use storefront_catalog::{NewProduct, ProductFilter, ProductRecord, ProductSummary};
use storefront_core::{OrderId, PageRequest, ProductId};
use storefront_orders::{NewOrder, OrderRecord};

use super::{DocumentStore, StoreError};

/// Vec-backed collections; insertion order is document order, matching the
/// time-ordered ids the persistent store sorts by.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<Vec<ProductRecord>>,
    orders: RwLock<Vec<OrderRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_product(&self, product: NewProduct) -> Result<ProductId, StoreError> {
        let id = ProductId::new();
        let mut products = self.products.write().map_err(|_| poisoned())?;
        products.push(ProductRecord::from_new(id, product));
        Ok(id)
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        window: PageRequest,
    ) -> Result<Vec<ProductSummary>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products
            .iter()
            .filter(|record| filter.matches(record))
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .cloned()
            .map(ProductSummary::from)
            .collect())
    }

    async fn insert_order(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        let id = OrderId::new();
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        orders.push(OrderRecord::from_new(id, order));
        Ok(id)
    }

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, StoreError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders
            .iter()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductRecord>, StoreError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products
            .iter()
            .filter(|record| ids.contains(&record.id))
            .cloned()
            .collect())
    }
}
