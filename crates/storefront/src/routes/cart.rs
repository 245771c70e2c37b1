//! Cart screen and checkout.
//!
//! The cart is read from storage when the screen opens and written back after
//! every change. Finalizing submits an order for the signed-in customer and
//! empties the cart once the server accepts it.

use askama::Template;
use lavender_core::order::{CheckoutDetails, CheckoutError, OrderPayload};
use lavender_core::ProductId;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::api::ApiClient;
use crate::cart_store::CartStore;
use crate::session::SessionContext;
use crate::storage::{SharedStorage, StorageError};

pub const ORDER_FAILED: &str = "Error processing the order.";

/// Outcome of [`CartPage::finalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum FinalizeOutcome {
    /// The cart was empty; nothing happened.
    Ignored,
    /// Anonymous user; show the sign-in form first.
    LoginRequired,
    /// Shipping or billing address is blank.
    MissingAddresses,
    /// No customer id could be resolved from the session.
    MissingCustomer,
    /// The order was accepted; carries the server's response.
    Placed(Value),
    /// The order was rejected or the request failed.
    Failed(String),
}

impl FinalizeOutcome {
    /// User-facing message for this outcome.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Ignored => None,
            Self::LoginRequired => Some("Please sign in to place your order.".to_string()),
            Self::MissingAddresses => Some(CheckoutError::MissingAddresses.to_string()),
            Self::MissingCustomer => {
                Some("Your account has no customer profile; the order cannot be placed.".to_string())
            }
            Self::Placed(_) => Some("Order placed successfully!".to_string()),
            Self::Failed(message) => Some(format!("Error: {message}")),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart template.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "== Cart ==
{% if items.is_empty() -%}
Your cart is empty.
{% else -%}
{% for item in items -%}
[{{ item.product_id }}] {{ item.name }}  {{ item.quantity }} x {{ item.price }} = {{ item.line_price }}
{% endfor -%}
Items: {{ item_count }}
Total: {{ subtotal }}
{% endif -%}"
)]
pub struct CartTemplate {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: String,
}

// =============================================================================
// Controller
// =============================================================================

/// Controller for the cart screen.
#[derive(Debug)]
pub struct CartPage {
    store: CartStore,
    pub details: CheckoutDetails,
    processing: bool,
}

impl CartPage {
    /// Open the screen, loading the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage cannot be read.
    pub fn open(storage: SharedStorage) -> Result<Self, StorageError> {
        Ok(Self {
            store: CartStore::open(storage)?,
            details: CheckoutDetails::default(),
            processing: false,
        })
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    #[must_use]
    pub const fn is_processing(&self) -> bool {
        self.processing
    }

    /// Raise a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    pub fn increment(&mut self, product_id: &ProductId) -> Result<bool, StorageError> {
        self.store.change_quantity(product_id, 1)
    }

    /// Lower a line's quantity by one, never below one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    pub fn decrement(&mut self, product_id: &ProductId) -> Result<bool, StorageError> {
        self.store.change_quantity(product_id, -1)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be saved.
    pub fn remove(&mut self, product_id: &ProductId) -> Result<bool, StorageError> {
        self.store.remove(product_id)
    }

    /// Place an order for the cart contents.
    ///
    /// Preconditions are checked in order: non-empty cart, signed-in user,
    /// both addresses, a customer id. The processing flag is cleared on
    /// every exit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only if the cart cannot be emptied after the
    /// order was accepted.
    #[instrument(skip_all, fields(lines = self.store.cart().len()))]
    pub async fn finalize(
        &mut self,
        api: &ApiClient,
        session: &SessionContext,
    ) -> Result<FinalizeOutcome, StorageError> {
        if self.store.is_empty() {
            return Ok(FinalizeOutcome::Ignored);
        }
        if !session.is_authenticated() {
            return Ok(FinalizeOutcome::LoginRequired);
        }

        let payload =
            match OrderPayload::assemble(self.store.cart(), &self.details, session.customer_id()) {
                Ok(payload) => payload,
                Err(CheckoutError::EmptyCart) => return Ok(FinalizeOutcome::Ignored),
                Err(CheckoutError::MissingAddresses) => {
                    return Ok(FinalizeOutcome::MissingAddresses);
                }
                Err(CheckoutError::MissingCustomer) => {
                    warn!("Signed-in session carries no customer id");
                    return Ok(FinalizeOutcome::MissingCustomer);
                }
            };

        self.processing = true;
        let result = session.client(api).create_order(&payload).await;
        self.processing = false;

        match result {
            Ok(created) => {
                self.store.clear()?;
                info!("Order placed, cart emptied");
                Ok(FinalizeOutcome::Placed(created))
            }
            Err(e) => {
                error!(error = %e, "Order submission failed");
                let message = e.server_message().unwrap_or(ORDER_FAILED).to_string();
                Ok(FinalizeOutcome::Failed(message))
            }
        }
    }

    /// Snapshot the cart into its template.
    #[must_use]
    pub fn view(&self) -> CartTemplate {
        let totals = self.store.totals();
        CartTemplate {
            items: self
                .store
                .cart()
                .lines()
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product_id.to_string(),
                    name: line.name.clone(),
                    quantity: line.quantity.get(),
                    price: line.price.to_string(),
                    line_price: line.subtotal().to_string(),
                })
                .collect(),
            item_count: totals.total_quantity,
            subtotal: totals.total_amount.to_string(),
        }
    }
}
