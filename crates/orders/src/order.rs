//! Order document types.
//!
//! Orders are written verbatim: `productId` references are plain text and
//! never checked against the catalog at write time, and `qty` is accepted as
//! given. Referential integrity surfaces later, at read time, as inner-join
//! semantics in the enrichment pipeline.

use serde::{Deserialize, Serialize};

use storefront_core::{OrderId, ProductId};

/// One line item on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub qty: i64,
}

impl OrderItem {
    /// The catalog id this item points at, if the raw text parses as one.
    ///
    /// A malformed `productId` is not an error anywhere in the system — it
    /// simply never matches a product, so the item falls out of the join.
    pub fn product_ref(&self) -> Option<ProductId> {
        self.product_id.parse().ok()
    }
}

/// An order as submitted for creation (no identifier yet; the store assigns
/// one on insert).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewOrder {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub items: Vec<OrderItem>,
}

/// An order as persisted, identifier included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub items: Vec<OrderItem>,
}

impl OrderRecord {
    pub fn from_new(id: OrderId, new: NewOrder) -> Self {
        Self {
            id,
            user_id: new.user_id,
            items: new.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_product_id_yields_no_reference() {
        let item = OrderItem {
            product_id: "not-a-uuid".to_string(),
            qty: 1,
        };
        assert_eq!(item.product_ref(), None);
    }

    #[test]
    fn well_formed_product_id_round_trips() {
        let id = ProductId::new();
        let item = OrderItem {
            product_id: id.to_string(),
            qty: 1,
        };
        assert_eq!(item.product_ref(), Some(id));
    }

    #[test]
    fn order_body_uses_wire_field_names() {
        let order: NewOrder = serde_json::from_str(
            r#"{"userId":"u1","items":[{"productId":"p1","qty":2}]}"#,
        )
        .unwrap();
        assert_eq!(order.user_id, "u1");
        assert_eq!(order.items[0].product_id, "p1");
        assert_eq!(order.items[0].qty, 2);
    }
}
