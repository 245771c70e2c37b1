//! Order listing.
//!
//! Ten orders per page with a search box and a status filter. "All" omits the
//! status from the request.

use askama::Template;
use lavender_core::order::OrderSummary;
use lavender_core::pagination::{ListFilter, Page, PageOutOfRange};
use lavender_core::{OrderStatus, OrderStatusFilter};
use lavender_storefront::api::ApiClient;
use lavender_storefront::routes::pager;
use tracing::{error, instrument};

/// Orders per page.
pub const ORDERS_PAGE_SIZE: u32 = 10;

/// Order row for templates.
#[derive(Clone)]
pub struct OrderRowView {
    pub key: String,
    pub customer: String,
    pub status: String,
    pub total: String,
    pub created_at: String,
}

impl OrderRowView {
    /// Row for the order at `index` on the current page.
    #[must_use]
    pub fn new(index: usize, order: &OrderSummary) -> Self {
        Self {
            key: order.row_key(index),
            customer: order.display_name().to_string(),
            status: order.status_label().to_string(),
            total: order
                .total
                .map_or_else(|| "-".to_string(), |total| total.to_string()),
            created_at: order.created_at.map_or_else(
                || "-".to_string(),
                |at| at.format("%Y-%m-%d %H:%M").to_string(),
            ),
        }
    }
}

/// Order listing template.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "== Orders ({{ status }}) ==
{% if let Some(term) = search -%}
Search: {{ term }}
{% endif -%}
{% if rows.is_empty() -%}
No orders found.
{% endif -%}
{% for row in rows -%}
{{ row.key }} | {{ row.customer }} | {{ row.status }} | {{ row.total }} | {{ row.created_at }}
{% endfor -%}
{{ pager }}
Statuses: All, {{ status_options|join(\", \") }}"
)]
pub struct OrdersTemplate {
    pub status: String,
    pub search: Option<String>,
    pub rows: Vec<OrderRowView>,
    pub pager: String,
    pub status_options: Vec<String>,
}

/// Controller for the order listing.
#[derive(Debug)]
pub struct OrdersPage {
    filter: ListFilter<OrderStatusFilter>,
    page: Page<OrderSummary>,
}

impl Default for OrdersPage {
    fn default() -> Self {
        Self::new()
    }
}

impl OrdersPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: ListFilter::new(ORDERS_PAGE_SIZE),
            page: Page::empty(),
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &ListFilter<OrderStatusFilter> {
        &self.filter
    }

    #[must_use]
    pub fn orders(&self) -> &[OrderSummary] {
        &self.page.items
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.filter.set_search(term);
    }

    pub fn set_status(&mut self, status: OrderStatusFilter) {
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
    #[instrument(skip(self, api), fields(page = self.filter.page_number()))]
    pub async fn fetch(&mut self, api: &ApiClient) {
        match api.list_orders(&self.filter).await {
            Ok(page) => {
                self.filter.record_total(page.total);
                self.page = page;
            }
            Err(e) => {
                error!(error = %e, "Failed to load orders");
                self.filter.record_total(0);
                self.page = Page::empty();
            }
        }
    }

    #[must_use]
    pub fn view(&self) -> OrdersTemplate {
        OrdersTemplate {
            status: self
                .filter
                .status()
                .query_value()
                .unwrap_or("All")
                .to_string(),
            search: self.filter.search_query().map(str::to_string),
            rows: self
                .page
                .items
                .iter()
                .enumerate()
                .map(|(index, order)| OrderRowView::new(index, order))
                .collect(),
            pager: pager(&self.filter),
            status_options: OrderStatus::KNOWN
                .iter()
                .map(|status| status.label().to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn orders_json() -> Vec<OrderSummary> {
        serde_json::from_str(
            r#"[
                {"id": 41, "clientName": "Ana", "status": "Shipped", "total": "25.00",
                 "createdAt": "2026-03-01T10:30:00Z"},
                {"id": 42, "status": 1},
                {"orderId": 43, "customerName": "Bea", "status": null},
                {"customerName": "Cy", "status": "Completed", "total": 4}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_status_filter_resets_page() {
        let mut page = OrdersPage::new();
        page.filter.record_total(35);
        page.go_to_page(4).unwrap();
        page.set_status("Pending".parse().unwrap());
        assert_eq!(page.filter().page_number(), 1);
        assert_eq!(page.filter().status().query_value(), Some("Pending"));

        page.set_status("Todos".parse().unwrap());
        assert_eq!(page.filter().status().query_value(), None);
    }

    #[test]
    fn test_view_rows() {
        let mut page = OrdersPage::new();
        page.page = Page {
            items: orders_json(),
            total: 4,
        };
        page.filter.record_total(4);

        let rendered = page.view().render().unwrap();
        assert!(rendered.contains("== Orders (All) =="));
        assert!(rendered.contains("#41 | Ana | Shipped | $25.00 | 2026-03-01 10:30"));
        assert!(rendered.contains("#42 | Walk-in customer | Pending | - | -"));
        assert!(rendered.contains("#43 | Bea | - | - | -"));
        assert!(rendered.contains("row 4 | Cy | Completed | $4.00 | -"));
        assert!(rendered.contains("Statuses: All, Pending, Processing, Shipped, Completed, Canceled"));
    }
}
