//! Customer catalog screen.
//!
//! Lists enabled products eight per page. Each product has a pending
//! quantity counter that the user raises or lowers before adding the product
//! to the cart.

use std::collections::HashMap;

use askama::Template;
use lavender_core::pagination::{ListFilter, Page, PageOutOfRange};
use lavender_core::product::Product;
use lavender_core::{ProductId, Quantity};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::api::ApiClient;
use crate::cart_store::CartStore;
use crate::storage::StorageError;

/// Products per catalog page.
pub const CATALOG_PAGE_SIZE: u32 = 8;

pub const SELECT_AT_LEAST_ONE: &str = "You must select at least 1 unit.";

/// Why a product could not be added.
#[derive(Debug, Error)]
pub enum AddToCartError {
    #[error("You must select at least 1 unit.")]
    NothingSelected,

    #[error("Product {0} is not on this page")]
    UnknownProduct(ProductId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

// =============================================================================
// Templates
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub pending: u32,
}

impl ProductView {
    fn new(product: &Product, pending: u32) -> Self {
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description_or_placeholder().to_string(),
            price: product.current_unit_price.to_string(),
            pending,
        }
    }
}

/// Catalog listing template.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "== Catalog ==
{% if let Some(term) = search -%}
Search: {{ term }}
{% endif -%}
{% if products.is_empty() -%}
No products found.
{% endif -%}
{% for p in products -%}
[{{ p.sku }}] {{ p.name }} - {{ p.price }}{% if p.pending > 0 %} (selected: {{ p.pending }}){% endif %}
    {{ p.description }}
{% endfor -%}
{{ pager }}"
)]
pub struct CatalogTemplate {
    pub search: Option<String>,
    pub products: Vec<ProductView>,
    pub pager: String,
}

// =============================================================================
// Controller
// =============================================================================

/// Controller for the customer catalog.
#[derive(Debug)]
pub struct CatalogPage {
    filter: ListFilter<()>,
    page: Page<Product>,
    pending: HashMap<ProductId, u32>,
}

impl Default for CatalogPage {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: ListFilter::new(CATALOG_PAGE_SIZE),
            page: Page::empty(),
            pending: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &ListFilter<()> {
        &self.filter
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.page.items
    }

    /// Set the search term (back to page 1).
    pub fn search(&mut self, term: impl Into<String>) {
        self.filter.set_search(term);
    }

    /// Move to `page` before the next fetch.
    ///
    /// # Errors
    ///
    /// Returns `PageOutOfRange` for pages outside the last reported range.
    pub fn go_to_page(&mut self, page: u32) -> Result<(), PageOutOfRange> {
        self.filter.go_to_page(page)
    }

    /// Load the current page.
    ///
    /// A failed request is logged and leaves an empty page.
    #[instrument(skip(self, api), fields(page = self.filter.page_number()))]
    pub async fn fetch(&mut self, api: &ApiClient) {
        match api.list_products(&self.filter).await {
            Ok(page) => {
                self.filter.record_total(page.total);
                self.page = page;
            }
            Err(e) => {
                error!(error = %e, "Failed to load catalog");
                self.filter.record_total(0);
                self.page = Page::empty();
            }
        }
    }

    /// Pending quantity for a product.
    #[must_use]
    pub fn pending(&self, product_id: &ProductId) -> u32 {
        self.pending.get(product_id).copied().unwrap_or(0)
    }

    /// Set the pending quantity directly.
    pub fn set_pending(&mut self, product_id: &ProductId, quantity: u32) {
        self.pending.insert(product_id.clone(), quantity);
    }

    pub fn increment(&mut self, product_id: &ProductId) {
        let entry = self.pending.entry(product_id.clone()).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    /// Lower the pending quantity, never below zero.
    pub fn decrement(&mut self, product_id: &ProductId) {
        let entry = self.pending.entry(product_id.clone()).or_insert(0);
        *entry = entry.saturating_sub(1);
    }

    /// Add the pending quantity of a listed product to the cart.
    ///
    /// On success the counter resets to zero and the confirmation message is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `AddToCartError::NothingSelected` if the pending quantity is
    /// below one, `UnknownProduct` if the product is not on the current page,
    /// or `Storage` if the cart cannot be saved.
    pub fn add_to_cart(
        &mut self,
        product_id: &ProductId,
        cart: &mut CartStore,
    ) -> Result<String, AddToCartError> {
        let quantity = Quantity::new(i64::from(self.pending(product_id)))
            .map_err(|_| AddToCartError::NothingSelected)?;
        let product = self
            .page
            .items
            .iter()
            .find(|product| &product.key() == product_id)
            .ok_or_else(|| AddToCartError::UnknownProduct(product_id.clone()))?;

        cart.add(product, quantity)?;
        self.pending.insert(product_id.clone(), 0);
        info!(product = %product_id, quantity = %quantity, "Added to cart");

        Ok(format!(
            "Added {quantity} unit(s) of {} to the cart.",
            product.name
        ))
    }

    /// Snapshot the screen into its template.
    #[must_use]
    pub fn view(&self) -> CatalogTemplate {
        CatalogTemplate {
            search: self.filter.search_query().map(str::to_string),
            products: self
                .page
                .items
                .iter()
                .map(|product| ProductView::new(product, self.pending(&product.key())))
                .collect(),
            pager: super::pager(&self.filter),
        }
    }

    #[cfg(test)]
    fn with_page(page: Page<Product>) -> Self {
        let mut catalog = Self::new();
        catalog.filter.record_total(page.total);
        catalog.page = page;
        catalog
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use lavender_core::Price;

    use super::*;
    use crate::storage::{MemoryStorage, SharedStorage};

    fn mug() -> Product {
        Product {
            id: None,
            sku: "MUG-01".to_string(),
            name: "Lavender Mug".to_string(),
            description: None,
            current_unit_price: Price::from_cents(1250),
            image: None,
            is_enabled: Some(true),
        }
    }

    fn catalog() -> CatalogPage {
        CatalogPage::with_page(Page {
            items: vec![mug()],
            total: 20,
        })
    }

    fn cart() -> CartStore {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        CartStore::open(storage).unwrap()
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut page = catalog();
        let id = ProductId::new("MUG-01");
        page.decrement(&id);
        assert_eq!(page.pending(&id), 0);
        page.increment(&id);
        page.increment(&id);
        page.decrement(&id);
        assert_eq!(page.pending(&id), 1);
    }

    #[test]
    fn test_add_requires_a_selection() {
        let mut page = catalog();
        let mut cart = cart();
        let err = page
            .add_to_cart(&ProductId::new("MUG-01"), &mut cart)
            .unwrap_err();
        assert_eq!(err.to_string(), SELECT_AT_LEAST_ONE);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_merges_and_resets_counter() {
        let mut page = catalog();
        let mut cart = cart();
        let id = ProductId::new("MUG-01");

        page.set_pending(&id, 3);
        let message = page.add_to_cart(&id, &mut cart).unwrap();
        assert_eq!(message, "Added 3 unit(s) of Lavender Mug to the cart.");
        assert_eq!(page.pending(&id), 0);

        page.increment(&id);
        page.add_to_cart(&id, &mut cart).unwrap();
        assert_eq!(cart.totals().total_quantity, 4);
    }

    #[test]
    fn test_add_unknown_product() {
        let mut page = catalog();
        let id = ProductId::new("NOPE");
        page.set_pending(&id, 1);
        assert!(matches!(
            page.add_to_cart(&id, &mut cart()),
            Err(AddToCartError::UnknownProduct(_))
        ));
    }

    #[test]
    fn test_page_four_of_three_is_refused() {
        let mut page = catalog();
        assert_eq!(page.filter().total_pages(), 3);
        assert!(page.go_to_page(4).is_err());
        assert_eq!(page.filter().page_number(), 1);
    }

    #[test]
    fn test_view_renders_products() {
        let mut page = catalog();
        page.set_pending(&ProductId::new("MUG-01"), 2);
        let rendered = page.view().render().unwrap();
        assert!(rendered.contains("[MUG-01] Lavender Mug - $12.50 (selected: 2)"));
        assert!(rendered.contains("No description available"));
        assert!(rendered.contains("Page 1 of 3 (20 total)"));
    }
}
