//! Order payloads and order listing summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::{CustomerId, OrderId, OrderStatus, Price, ProductId, Quantity};

/// Display name for orders without a customer name.
pub const WALK_IN_CUSTOMER: &str = "Walk-in customer";

/// One `{productId, quantity}` entry of an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Shipping and billing details entered on the cart screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub shipping_address: String,
    pub billing_address: String,
    pub notes: String,
}

/// A precondition for order submission was not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,
    #[error("Please fill in the shipping and billing addresses.")]
    MissingAddresses,
    #[error("no customer id could be resolved for the signed-in user")]
    MissingCustomer,
}

/// Body of an order-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub customer_id: CustomerId,
    pub shipping_address: String,
    pub billing_address: String,
    pub notes: String,
    pub items: Vec<OrderItem>,
}

impl OrderPayload {
    /// Assemble a payload from the cart and checkout details.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] if the cart is empty, either address is blank,
    /// or no customer id is available. Checks run in that order.
    pub fn assemble(
        cart: &Cart,
        details: &CheckoutDetails,
        customer_id: Option<CustomerId>,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if details.shipping_address.trim().is_empty() || details.billing_address.trim().is_empty()
        {
            return Err(CheckoutError::MissingAddresses);
        }
        let customer_id = customer_id.ok_or(CheckoutError::MissingCustomer)?;

        Ok(Self {
            customer_id,
            shipping_address: details.shipping_address.clone(),
            billing_address: details.billing_address.clone(),
            notes: details.notes.clone(),
            items: cart
                .lines()
                .iter()
                .map(|line| OrderItem {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        })
    }
}

/// An order as returned by the order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Some backends report `orderId`, and some rows carry no id at all.
    #[serde(default, alias = "orderId")]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub total: Option<Price>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderSummary {
    /// Customer display name with the walk-in fallback.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.client_name
            .as_deref()
            .or(self.customer_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(WALK_IN_CUSTOMER)
    }

    /// Row label: `#<id>`, or the row's 1-based position on the page when
    /// the server sent no id.
    #[must_use]
    pub fn row_key(&self, index: usize) -> String {
        self.id.as_ref().map_or_else(
            || format!("row {}", index.saturating_add(1)),
            |id| format!("#{id}"),
        )
    }

    /// Status label, or `-` when the server sent none.
    #[must_use]
    pub fn status_label(&self) -> &str {
        self.status.as_ref().map_or("-", OrderStatus::label)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::CartLine;

    fn cart() -> Cart {
        Cart::from(vec![CartLine {
            product_id: ProductId::new("MUG-01"),
            sku: None,
            name: "Mug".to_string(),
            price: Price::new(Decimal::from(12)),
            quantity: Quantity::new(2).unwrap(),
            image: None,
        }])
    }

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            shipping_address: "1 Main St".to_string(),
            billing_address: "1 Main St".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_assemble_payload() {
        let payload =
            OrderPayload::assemble(&cart(), &details(), Some(CustomerId::new("c-9"))).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["customerId"], "c-9");
        assert_eq!(json["shippingAddress"], "1 Main St");
        assert_eq!(json["items"][0]["productId"], "MUG-01");
        assert_eq!(json["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_assemble_preconditions_in_order() {
        let blank = CheckoutDetails {
            shipping_address: " ".to_string(),
            ..details()
        };
        assert_eq!(
            OrderPayload::assemble(&Cart::new(), &blank, None),
            Err(CheckoutError::EmptyCart)
        );
        assert_eq!(
            OrderPayload::assemble(&cart(), &blank, None),
            Err(CheckoutError::MissingAddresses)
        );
        assert_eq!(
            OrderPayload::assemble(&cart(), &details(), None),
            Err(CheckoutError::MissingCustomer)
        );
    }

    #[test]
    fn test_summary_display_name_fallbacks() {
        let raw = r#"{"id": 3, "customerName": "Ana", "status": 1}"#;
        let summary: OrderSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.display_name(), "Ana");
        assert_eq!(summary.status, Some(OrderStatus::Pending));

        let anonymous: OrderSummary =
            serde_json::from_str(r#"{"id": "o-1", "status": "Completed"}"#).unwrap();
        assert_eq!(anonymous.display_name(), WALK_IN_CUSTOMER);
    }

    #[test]
    fn test_summary_accepts_order_id_alias() {
        let summary: OrderSummary =
            serde_json::from_str(r#"{"orderId": 7, "customerName": "Ana", "status": "Pending"}"#)
                .unwrap();
        assert_eq!(summary.id, Some(OrderId::new("7")));
        assert_eq!(summary.row_key(0), "#7");
        assert_eq!(summary.status_label(), "Pending");
    }

    #[test]
    fn test_summary_without_id_is_keyed_by_row() {
        let summary: OrderSummary =
            serde_json::from_str(r#"{"customerName": "Ana", "status": 2}"#).unwrap();
        assert_eq!(summary.id, None);
        assert_eq!(summary.row_key(4), "row 5");
        assert_eq!(summary.status, Some(OrderStatus::Processing));
    }

    #[test]
    fn test_summary_null_status() {
        let summary: OrderSummary =
            serde_json::from_str(r#"{"id": 7, "customerName": "Ana", "status": null}"#).unwrap();
        assert_eq!(summary.status, None);
        assert_eq!(summary.status_label(), "-");

        let missing: OrderSummary = serde_json::from_str(r#"{"id": 8}"#).unwrap();
        assert_eq!(missing.status, None);
    }
}
