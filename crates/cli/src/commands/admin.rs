//! Admin commands.

use lavender_admin::auth::require_admin;
use lavender_admin::dashboard::{DashboardTemplate, load_metrics};
use lavender_admin::products::AdminProductsPage;
use lavender_core::ProductStatusFilter;
use lavender_storefront::api::ApiClient;
use lavender_storefront::error::{AppError, Result};
use lavender_storefront::state::AppState;

use super::{emit, page_error};

/// An API client for a signed-in admin.
fn admin_client(state: &AppState) -> Result<ApiClient> {
    let session = state.session()?;
    require_admin(&session).map_err(|e| AppError::AccessDenied(e.to_string()))?;
    Ok(session.client(state.api()))
}

/// List products, including inactive ones.
///
/// # Errors
///
/// Returns `AppError::AccessDenied` without the admin role, or
/// `AppError::Validation` for an out-of-range page.
pub async fn products(
    state: &AppState,
    search: Option<String>,
    status: ProductStatusFilter,
    page: u32,
) -> Result<()> {
    let api = admin_client(state)?;

    let mut products = AdminProductsPage::new();
    if let Some(term) = search {
        products.search(term);
    }
    products.set_status(status);
    products.fetch(&api).await;

    if page > 1 {
        products.go_to_page(page).map_err(page_error)?;
        products.fetch(&api).await;
    }
    emit(&products.view())
}

/// Show the dashboard totals.
///
/// # Errors
///
/// Returns `AppError::AccessDenied` without the admin role.
pub async fn dashboard(state: &AppState) -> Result<()> {
    let api = admin_client(state)?;
    let metrics = load_metrics(&api).await;
    emit(&DashboardTemplate { metrics })
}
