//! Admin dashboard.

use askama::Template;
use lavender_storefront::api::ApiClient;
use tracing::{error, instrument};

/// Dashboard metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardMetrics {
    pub products: u64,
    pub orders: u64,
}

/// Dashboard template.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "== Dashboard ==
Products: {{ metrics.products }} (total in catalog)
Orders:   {{ metrics.orders }} (total placed)"
)]
pub struct DashboardTemplate {
    pub metrics: DashboardMetrics,
}

/// Fetch the product and order totals concurrently.
///
/// If either request fails, both figures show as zero.
#[instrument(skip(api))]
pub async fn load_metrics(api: &ApiClient) -> DashboardMetrics {
    match tokio::try_join!(api.count_products(), api.count_orders()) {
        Ok((products, orders)) => DashboardMetrics { products, orders },
        Err(e) => {
            error!(error = %e, "Failed to fetch dashboard metrics");
            DashboardMetrics::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let rendered = DashboardTemplate {
            metrics: DashboardMetrics {
                products: 12,
                orders: 3,
            },
        }
        .render()
        .unwrap();
        assert!(rendered.contains("Products: 12"));
        assert!(rendered.contains("Orders:   3"));
    }
}
