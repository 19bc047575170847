//! Postgres-backed document store.
//!
//! Documents keep their flexible shape by storing nested sequences (`sizes`,
//! `items`) as JSONB columns; scalar fields that queries filter or sort on
//! (ids, `name`, `user_id`, `price`) are real columns. Ids are UUIDv7, so
//! `ORDER BY id` reproduces insertion order.
//!
//! All queries rely on the driver's default timeout behavior; there is no
//! application-level retry, backoff, or cancellation propagation.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use uuid::Uuid;

use storefront_catalog::{NewProduct, ProductFilter, ProductRecord, ProductSummary};
use storefront_core::{OrderId, PageRequest, ProductId};
use storefront_orders::{NewOrder, OrderItem, OrderRecord};

use super::{DocumentStore, StoreError};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and bootstrap the two collection tables.
    ///
    /// Table creation is idempotent bootstrap, not migration tooling; the
    /// schema has no versioned history to manage.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().connect(url).await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        tracing::info!("connected to postgres document store");
        Ok(store)
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id    UUID PRIMARY KEY,
                name  TEXT NOT NULL,
                price NUMERIC NOT NULL,
                sizes JSONB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id      UUID PRIMARY KEY,
                user_id TEXT NOT NULL,
                items   JSONB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS orders_user_id_idx ON orders (user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Escape LIKE metacharacters so a filter value only ever matches as a
/// literal substring.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn insert_product(&self, product: NewProduct) -> Result<ProductId, StoreError> {
        let id = ProductId::new();
        let sizes = serde_json::to_value(&product.sizes)?;

        sqlx::query("INSERT INTO products (id, name, price, sizes) VALUES ($1, $2, $3, $4)")
            .bind(id.as_uuid())
            .bind(&product.name)
            .bind(product.price)
            .bind(sizes)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        window: PageRequest,
    ) -> Result<Vec<ProductSummary>, StoreError> {
        let name_pattern = filter
            .name
            .as_deref()
            .map(|name| format!("%{}%", escape_like(name)));

        let rows = sqlx::query(
            r#"
            SELECT id, name, price
            FROM products
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1 FROM jsonb_array_elements(sizes) AS s
                    WHERE s->>'size' = $2
                  ))
            ORDER BY id
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(name_pattern)
        .bind(filter.size.as_deref())
        .bind(window.offset as i64)
        .bind(window.limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ProductSummary {
                    id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
                    name: row.try_get("name")?,
                    price: row.try_get::<Decimal, _>("price")?,
                })
            })
            .collect()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        let id = OrderId::new();
        let items = serde_json::to_value(&order.items)?;

        sqlx::query("INSERT INTO orders (id, user_id, items) VALUES ($1, $2, $3)")
            .bind(id.as_uuid())
            .bind(&order.user_id)
            .bind(items)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, user_id, items FROM orders WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let items: Vec<OrderItem> =
                    serde_json::from_value(row.try_get::<serde_json::Value, _>("items")?)?;
                Ok(OrderRecord {
                    id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
                    user_id: row.try_get("user_id")?,
                    items,
                })
            })
            .collect()
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductRecord>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query("SELECT id, name, price, sizes FROM products WHERE id = ANY($1)")
            .bind(uuids)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let sizes = serde_json::from_value(row.try_get::<serde_json::Value, _>("sizes")?)?;
                Ok(ProductRecord {
                    id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
                    name: row.try_get("name")?,
                    price: row.try_get::<Decimal, _>("price")?,
                    sizes,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("shirt"), "shirt");
    }
}
