//! Admin product listing.
//!
//! Five products per page, including disabled ones. The status filter
//! chooses all, active or inactive products.

use askama::Template;
use lavender_core::ProductStatusFilter;
use lavender_core::pagination::{ListFilter, Page, PageOutOfRange};
use lavender_core::product::Product;
use lavender_storefront::api::ApiClient;
use lavender_storefront::routes::pager;
use tracing::{error, instrument};

/// Products per admin page.
pub const ADMIN_PRODUCTS_PAGE_SIZE: u32 = 5;

/// Admin product row for templates.
#[derive(Clone)]
pub struct ProductRowView {
    pub sku: String,
    pub name: String,
    pub price: String,
    pub status: String,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        let status = match product.is_enabled {
            Some(true) => "Active",
            Some(false) => "Inactive",
            None => "-",
        };
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            price: product.current_unit_price.to_string(),
            status: status.to_string(),
        }
    }
}

/// Admin product listing template.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "== Products ({{ status }}) ==
{% if let Some(term) = search -%}
Search: {{ term }}
{% endif -%}
{% if rows.is_empty() -%}
No products found.
{% endif -%}
{% for row in rows -%}
{{ row.sku }} | {{ row.name }} | {{ row.price }} | {{ row.status }}
{% endfor -%}
{{ pager }}"
)]
pub struct AdminProductsTemplate {
    pub status: String,
    pub search: Option<String>,
    pub rows: Vec<ProductRowView>,
    pub pager: String,
}

/// Controller for the admin product listing.
#[derive(Debug)]
pub struct AdminProductsPage {
    filter: ListFilter<ProductStatusFilter>,
    page: Page<Product>,
}

impl Default for AdminProductsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminProductsPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: ListFilter::new(ADMIN_PRODUCTS_PAGE_SIZE),
            page: Page::empty(),
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &ListFilter<ProductStatusFilter> {
        &self.filter
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.page.items
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.filter.set_search(term);
    }

    pub fn set_status(&mut self, status: ProductStatusFilter) {
        self.filter.set_status(status);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.filter.set_page_size(page_size);
    }

    /// # Errors
    ///
    /// Returns `PageOutOfRange` for pages outside the last reported range.
    pub fn go_to_page(&mut self, page: u32) -> Result<(), PageOutOfRange> {
        self.filter.go_to_page(page)
    }

    /// Load the current page. A failed request is logged and leaves an empty page.
    #[instrument(skip(self, api), fields(page = self.filter.page_number(), status = %self.filter.status()))]
    pub async fn fetch(&mut self, api: &ApiClient) {
        match api.list_admin_products(&self.filter).await {
            Ok(page) => {
                self.filter.record_total(page.total);
                self.page = page;
            }
            Err(e) => {
                error!(error = %e, "Failed to load admin products");
                self.filter.record_total(0);
                self.page = Page::empty();
            }
        }
    }

    #[must_use]
    pub fn view(&self) -> AdminProductsTemplate {
        AdminProductsTemplate {
            status: self.filter.status().label().to_string(),
            search: self.filter.search_query().map(str::to_string),
            rows: self.page.items.iter().map(ProductRowView::from).collect(),
            pager: pager(&self.filter),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lavender_core::Price;

    use super::*;

    fn product(sku: &str, enabled: bool) -> Product {
        Product {
            id: None,
            sku: sku.to_string(),
            name: format!("Product {sku}"),
            description: None,
            current_unit_price: Price::from_cents(999),
            image: None,
            is_enabled: Some(enabled),
        }
    }

    #[test]
    fn test_defaults() {
        let page = AdminProductsPage::new();
        assert_eq!(page.filter().page_size(), 5);
        assert_eq!(*page.filter().status(), ProductStatusFilter::All);
    }

    #[test]
    fn test_status_change_resets_page() {
        let mut page = AdminProductsPage::new();
        page.filter.record_total(12);
        page.go_to_page(3).unwrap();
        page.set_status(ProductStatusFilter::Inactive);
        assert_eq!(page.filter().page_number(), 1);
        assert_eq!(page.filter().status().query_value(), Some("false"));
    }

    #[test]
    fn test_view_rows() {
        let mut page = AdminProductsPage::new();
        page.page = Page {
            items: vec![product("A", true), product("B", false)],
            total: 2,
        };
        page.filter.record_total(2);
        let rendered = page.view().render().unwrap();
        assert!(rendered.contains("== Products (All products) =="));
        assert!(rendered.contains("A | Product A | $9.99 | Active"));
        assert!(rendered.contains("B | Product B | $9.99 | Inactive"));
        assert!(rendered.contains("Page 1 of 1 (2 total)"));
    }
}
