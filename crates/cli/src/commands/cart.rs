//! Cart commands.

use lavender_core::ProductId;
use lavender_storefront::error::{AppError, Result};
use lavender_storefront::routes::cart::{CartPage, FinalizeOutcome};
use lavender_storefront::state::AppState;

use super::{emit, say};

/// Show the cart.
///
/// # Errors
///
/// Returns `AppError::Storage` if the cart cannot be read.
pub fn show(state: &AppState) -> Result<()> {
    let page = CartPage::open(state.storage())?;
    emit(&page.view())
}

/// Change a line's quantity by `delta` (floored at one).
///
/// # Errors
///
/// Returns `AppError::Validation` if the line does not exist.
pub fn adjust(state: &AppState, product_id: &str, delta: i64) -> Result<()> {
    let mut page = CartPage::open(state.storage())?;
    let id = ProductId::new(product_id);
    let found = if delta >= 0 {
        page.increment(&id)?
    } else {
        page.decrement(&id)?
    };
    if !found {
        return Err(not_in_cart(product_id));
    }
    emit(&page.view())
}

/// Remove a line.
///
/// # Errors
///
/// Returns `AppError::Validation` if the line does not exist.
pub fn remove(state: &AppState, product_id: &str) -> Result<()> {
    let mut page = CartPage::open(state.storage())?;
    if !page.remove(&ProductId::new(product_id))? {
        return Err(not_in_cart(product_id));
    }
    emit(&page.view())
}

/// Place an order for the cart.
///
/// # Errors
///
/// Returns `AppError::Validation` for any outcome other than a placed order
/// or an empty cart.
pub async fn checkout(
    state: &AppState,
    shipping: String,
    billing: String,
    notes: String,
) -> Result<()> {
    let session = state.session()?;
    let mut page = CartPage::open(state.storage())?;
    page.details.shipping_address = shipping;
    page.details.billing_address = billing;
    page.details.notes = notes;

    let outcome = page.finalize(state.api(), &session).await?;
    let message = outcome.message();
    match outcome {
        FinalizeOutcome::Ignored => say("Your cart is empty."),
        FinalizeOutcome::Placed(created) => {
            if let Some(message) = message {
                say(&message)?;
            }
            say(&serde_json::to_string_pretty(&created).unwrap_or_default())
        }
        _ => Err(AppError::Validation(message.unwrap_or_default())),
    }
}

fn not_in_cart(product_id: &str) -> AppError {
    AppError::Validation(format!("{product_id} is not in the cart"))
}
