//! Order endpoints.

use lavender_core::OrderStatusFilter;
use lavender_core::order::{OrderPayload, OrderSummary};
use lavender_core::pagination::{ListFilter, Page};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::{ApiClient, ApiError, RawPage};

impl ApiClient {
    /// Submit an order and return the server's response body unchanged.
    ///
    /// No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the order is rejected or the request fails.
    #[instrument(skip(self, payload), fields(customer_id = %payload.customer_id, items = payload.items.len()))]
    pub async fn create_order(&self, payload: &OrderPayload) -> Result<Value, ApiError> {
        let url = self.endpoint("api/orders", &[])?;
        let created: Value = self.send(self.post(url).json(payload)).await?;
        info!("Order created");
        Ok(created)
    }

    /// Fetch one page of orders.
    ///
    /// `Search` is omitted when blank and `Status` when the filter is "all".
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body does not decode.
    #[instrument(skip(self, filter), fields(page = filter.page_number(), size = filter.page_size()))]
    pub async fn list_orders(
        &self,
        filter: &ListFilter<OrderStatusFilter>,
    ) -> Result<Page<OrderSummary>, ApiError> {
        let url = self.endpoint(
            "api/orders",
            &[
                ("pageNumber", Some(filter.page_number().to_string())),
                ("pageSize", Some(filter.page_size().to_string())),
                ("Search", filter.search_query().map(str::to_string)),
                ("Status", filter.status().query_value().map(str::to_string)),
            ],
        )?;

        let raw: RawPage<OrderSummary> = self.send(self.get(url)).await?;
        let page = raw.into_order_page();
        debug!(items = page.items.len(), total = page.total, "Orders listed");
        Ok(page)
    }

    /// Total number of orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn count_orders(&self) -> Result<u64, ApiError> {
        self.count("api/orders").await
    }
}
