//! Catalog commands.

use lavender_core::ProductId;
use lavender_storefront::cart_store::CartStore;
use lavender_storefront::error::{AppError, Result};
use lavender_storefront::routes::products::{AddToCartError, CatalogPage};
use lavender_storefront::state::AppState;

use super::{emit, page_error, say};

/// Load the catalog on `page`.
///
/// The first page is always fetched to learn the total; later pages outside
/// the reported range are refused without another request.
async fn open(state: &AppState, search: Option<String>, page: u32) -> Result<CatalogPage> {
    let api = state.session()?.client(state.api());
    let mut catalog = CatalogPage::new();
    if let Some(term) = search {
        catalog.search(term);
    }
    catalog.fetch(&api).await;

    if page > 1 {
        catalog.go_to_page(page).map_err(page_error)?;
        catalog.fetch(&api).await;
    }
    Ok(catalog)
}

/// List enabled products.
///
/// # Errors
///
/// Returns `AppError::Validation` for an out-of-range page.
pub async fn list(state: &AppState, search: Option<String>, page: u32) -> Result<()> {
    let catalog = open(state, search, page).await?;
    emit(&catalog.view())
}

/// Add `qty` units of `sku` to the cart.
///
/// # Errors
///
/// Returns `AppError::Validation` if `qty` is zero or the product is not
/// listed, or `AppError::Storage` if the cart cannot be saved.
pub async fn add(
    state: &AppState,
    sku: String,
    qty: u32,
    search: Option<String>,
    page: u32,
) -> Result<()> {
    let mut catalog = open(state, Some(search.unwrap_or_else(|| sku.clone())), page).await?;
    let product_id = ProductId::new(sku);
    catalog.set_pending(&product_id, qty);

    let mut cart = CartStore::open(state.storage())?;
    match catalog.add_to_cart(&product_id, &mut cart) {
        Ok(message) => say(&message),
        Err(AddToCartError::Storage(e)) => Err(e.into()),
        Err(e) => Err(AppError::Validation(e.to_string())),
    }
}
