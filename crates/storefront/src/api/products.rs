//! Product listing endpoints.

use lavender_core::ProductStatusFilter;
use lavender_core::pagination::{ListFilter, Page};
use lavender_core::product::Product;
use tracing::{debug, instrument};

use super::{ApiClient, ApiError, RawPage};

/// Status value the public listing always sends.
const ENABLED_ONLY: &str = "enabled";

impl ApiClient {
    /// Fetch one page of enabled products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body does not decode.
    #[instrument(skip(self, filter), fields(page = filter.page_number(), size = filter.page_size()))]
    pub async fn list_products<S>(&self, filter: &ListFilter<S>) -> Result<Page<Product>, ApiError> {
        let url = self.endpoint(
            "api/products",
            &[
                ("search", Some(filter.search_query().unwrap_or_default().to_string())),
                ("pageNumber", Some(filter.page_number().to_string())),
                ("pageSize", Some(filter.page_size().to_string())),
                ("status", Some(ENABLED_ONLY.to_string())),
            ],
        )?;

        let raw: RawPage<Product> = self.send(self.get(url)).await?;
        let page = raw.into_product_page();
        debug!(items = page.items.len(), total = page.total, "Products listed");
        Ok(page)
    }

    /// Fetch one page of the admin product listing, including disabled products.
    ///
    /// `search` and `status` are omitted from the query when unset.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body does not decode.
    #[instrument(skip(self, filter), fields(page = filter.page_number(), status = %filter.status()))]
    pub async fn list_admin_products(
        &self,
        filter: &ListFilter<ProductStatusFilter>,
    ) -> Result<Page<Product>, ApiError> {
        let url = self.endpoint(
            "api/products/admin",
            &[
                ("search", filter.search_query().map(str::to_string)),
                ("status", filter.status().query_value().map(str::to_string)),
                ("pageNumber", Some(filter.page_number().to_string())),
                ("pageSize", Some(filter.page_size().to_string())),
            ],
        )?;

        let raw: RawPage<Product> = self.send(self.get(url)).await?;
        let page = raw.into_product_page();
        debug!(items = page.items.len(), total = page.total, "Admin products listed");
        Ok(page)
    }

    /// Total number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn count_products(&self) -> Result<u64, ApiError> {
        self.count("api/products").await
    }
}
