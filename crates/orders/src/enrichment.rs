//! Order enrichment pipeline.
//!
//! Given a user's orders and the products their items reference, this module
//! expands each order into per-item rows, inner-joins every row against the
//! catalog, regroups surviving rows by order, computes per-order totals, and
//! paginates the resulting groups. The join is strictly inner: an item whose
//! `productId` does not resolve to a product drops out, and an order with no
//! surviving items does not appear in the output at all.
//!
//! The pipeline is a pure transform; the store round-trips that feed it live
//! behind the `DocumentStore` boundary.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use storefront_catalog::ProductRecord;
use storefront_core::{OrderId, PageRequest, Paginated, ProductId};

use crate::order::OrderRecord;

/// Product fields embedded into each enriched item. `sizes` is stripped by
/// construction: this type has no such field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetails {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

impl From<&ProductRecord> for ProductDetails {
    fn from(record: &ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            price: record.price,
        }
    }
}

/// A line item that survived the join, with its product attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedItem {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub qty: i64,
    #[serde(rename = "productDetails")]
    pub product: ProductDetails,
}

/// One order after enrichment: surviving items plus the computed total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedOrder {
    pub id: OrderId,
    pub items: Vec<EnrichedItem>,
    pub total: Decimal,
}

/// Collect the distinct product ids a batch of orders references, skipping
/// item references that do not parse (those can never join anyway).
pub fn referenced_products(orders: &[OrderRecord]) -> Vec<ProductId> {
    let mut seen = HashSet::new();
    orders
        .iter()
        .flat_map(|order| order.items.iter())
        .filter_map(|item| item.product_ref())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Run the enrichment pipeline over one user's orders.
///
/// `orders` must already be scoped to the user (exact, case-sensitive match)
/// and in insertion order; `products` is the lookup side of the join, keyed
/// by id. Pagination applies to the grouped output: `offset` whole orders
/// are skipped and at most `limit` are returned, with the envelope computed
/// from the requested window.
pub fn enrich_user_orders(
    orders: Vec<OrderRecord>,
    products: &HashMap<ProductId, ProductRecord>,
    window: PageRequest,
) -> Paginated<EnrichedOrder> {
    let mut groups: Vec<EnrichedOrder> = Vec::new();

    for order in orders {
        // Unwind to (order, item) rows, inner-join each row, and regroup in
        // one pass; item order within the order is preserved.
        let mut items: Vec<EnrichedItem> = Vec::new();
        let mut total = Decimal::ZERO;

        for item in order.items {
            let Some(product) = item.product_ref().and_then(|id| products.get(&id)) else {
                continue;
            };
            // Prices and quantities are accepted unvalidated, so the sum
            // saturates instead of panicking on extreme values.
            total = total.saturating_add(Decimal::from(item.qty).saturating_mul(product.price));
            items.push(EnrichedItem {
                product_id: item.product_id,
                qty: item.qty,
                product: ProductDetails::from(product),
            });
        }

        // No surviving rows means no group key: zero-item orders and orders
        // fully eliminated by the join vanish from the result set.
        if items.is_empty() {
            continue;
        }

        groups.push(EnrichedOrder {
            id: order.id,
            items,
            total,
        });
    }

    let data: Vec<EnrichedOrder> = groups
        .into_iter()
        .skip(window.offset as usize)
        .take(window.limit as usize)
        .collect();

    Paginated::from_window(data, window)
}
