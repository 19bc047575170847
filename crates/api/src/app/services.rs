use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;

use storefront_catalog::{NewProduct, ProductFilter, ProductRecord, ProductSummary};
use storefront_core::{OrderId, PageRequest, Paginated, ProductId};
use storefront_infra::{DocumentStore, InMemoryStore, PostgresStore, StoreError};
use storefront_orders::{enrich_user_orders, referenced_products, EnrichedOrder, NewOrder};

/// Request-facing services: one shared store handle, injected into every
/// handler via an `Extension` layer (explicit dependency, no process-wide
/// singleton).
pub struct AppServices {
    store: Arc<dyn DocumentStore>,
}

/// Select the store from the environment.
///
/// `DATABASE_URL` present (or `USE_PERSISTENT_STORE=true`) means Postgres;
/// a missing connection string in persistent mode is a fatal configuration
/// error — the process refuses to serve traffic. Otherwise the in-memory
/// store backs dev/test runs.
pub async fn build_services() -> anyhow::Result<AppServices> {
    let use_persistent = persistent_store_requested(
        std::env::var("USE_PERSISTENT_STORE").ok(),
        std::env::var("DATABASE_URL").is_ok(),
    )?;

    let store: Arc<dyn DocumentStore> = if use_persistent {
        let url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set when USE_PERSISTENT_STORE=true")?;
        Arc::new(PostgresStore::connect(&url).await?)
    } else {
        tracing::info!("using in-memory document store");
        Arc::new(InMemoryStore::new())
    };

    Ok(AppServices::new(store))
}

/// Resolve the store mode. An explicit `USE_PERSISTENT_STORE` must parse as
/// a bool — an unparseable value is a fatal configuration error, never a
/// silent fallback to the in-memory store. With no explicit flag, persistence
/// follows `DATABASE_URL` presence.
fn persistent_store_requested(
    flag: Option<String>,
    has_database_url: bool,
) -> anyhow::Result<bool> {
    match flag {
        Some(value) => value.parse::<bool>().map_err(|_| {
            anyhow::anyhow!("USE_PERSISTENT_STORE must be \"true\" or \"false\", got {value:?}")
        }),
        None => Ok(has_database_url),
    }
}

impl AppServices {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<ProductId, StoreError> {
        self.store.insert_product(product).await
    }

    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        window: PageRequest,
    ) -> Result<Paginated<ProductSummary>, StoreError> {
        let data = self.store.list_products(filter, window).await?;
        Ok(Paginated::from_window(data, window))
    }

    pub async fn create_order(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        self.store.insert_order(order).await
    }

    /// The composite read behind `GET /orders/{userId}`: fetch the user's
    /// orders, fetch the products they reference, then run the enrichment
    /// pipeline. Read-only; an unknown user yields an empty page.
    pub async fn user_orders(
        &self,
        user_id: &str,
        window: PageRequest,
    ) -> Result<Paginated<EnrichedOrder>, StoreError> {
        let orders = self.store.orders_for_user(user_id).await?;
        let ids = referenced_products(&orders);
        let products = self.store.products_by_ids(&ids).await?;
        let lookup: HashMap<ProductId, ProductRecord> =
            products.into_iter().map(|p| (p.id, p)).collect();

        Ok(enrich_user_orders(orders, &lookup, window))
    }
}
