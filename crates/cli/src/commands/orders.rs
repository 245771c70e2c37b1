//! Order listing command.

use lavender_admin::auth::require_roles;
use lavender_admin::orders::OrdersPage;
use lavender_core::OrderStatusFilter;
use lavender_storefront::error::{AppError, Result};
use lavender_storefront::state::AppState;

use super::{emit, page_error};

/// List orders for any signed-in user.
///
/// # Errors
///
/// Returns `AppError::AccessDenied` when signed out, or
/// `AppError::Validation` for an out-of-range page.
pub async fn list(
    state: &AppState,
    search: Option<String>,
    status: &str,
    page: u32,
    page_size: Option<u32>,
) -> Result<()> {
    let session = state.session()?;
    require_roles(&session, &[]).map_err(|e| AppError::AccessDenied(e.to_string()))?;
    let api = session.client(state.api());

    let mut orders = OrdersPage::new();
    if let Some(size) = page_size {
        orders.set_page_size(size);
    }
    if let Some(term) = search {
        orders.search(term);
    }
    let Ok(status) = status.parse::<OrderStatusFilter>();
    orders.set_status(status);
    orders.fetch(&api).await;

    if page > 1 {
        orders.go_to_page(page).map_err(page_error)?;
        orders.fetch(&api).await;
    }
    emit(&orders.view())
}
