//! Public catalog listing and paging against the stub API.

#![allow(clippy::unwrap_used)]

use lavender_integration_tests::{PRODUCTS_PATH, StubApi};
use lavender_storefront::routes::products::{CATALOG_PAGE_SIZE, CatalogPage};

async fn stub_with_products(enabled: usize, disabled: usize) -> StubApi {
    let stub = StubApi::start().await.unwrap();
    for n in 1..=enabled {
        stub.add_product(&format!("SKU-{n:02}"), &format!("Widget {n}"), 500, true);
    }
    for n in 1..=disabled {
        stub.add_product(&format!("OFF-{n:02}"), &format!("Retired {n}"), 500, false);
    }
    stub
}

#[tokio::test]
async fn test_first_page_reports_totals() {
    let stub = stub_with_products(20, 2).await;
    let state = stub.app_state().unwrap();

    let mut catalog = CatalogPage::new();
    catalog.fetch(state.api()).await;

    assert_eq!(catalog.products().len(), CATALOG_PAGE_SIZE as usize);
    assert_eq!(catalog.filter().total(), 20);
    assert_eq!(catalog.filter().total_pages(), 3);

    let requests = stub.requests_to(PRODUCTS_PATH);
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.param("status"), Some("enabled"));
    assert_eq!(request.param("search"), Some(""));
    assert_eq!(request.param("pageNumber"), Some("1"));
    assert_eq!(request.param("pageSize"), Some("8"));
    assert!(request.bearer.is_none());
}

#[tokio::test]
async fn test_last_page_and_out_of_range_page() {
    let stub = stub_with_products(20, 0).await;
    let state = stub.app_state().unwrap();

    let mut catalog = CatalogPage::new();
    catalog.fetch(state.api()).await;
    catalog.go_to_page(3).unwrap();
    catalog.fetch(state.api()).await;

    assert_eq!(catalog.products().len(), 4);
    assert_eq!(catalog.products()[0].sku, "SKU-17");

    assert!(catalog.go_to_page(4).is_err());
    assert!(catalog.go_to_page(0).is_err());
    assert_eq!(catalog.filter().page_number(), 3);
    assert_eq!(stub.requests_to(PRODUCTS_PATH).len(), 2);
}

#[tokio::test]
async fn test_search_resets_to_first_page() {
    let stub = stub_with_products(20, 0).await;
    stub.add_product("MUG-01", "Lavender Mug", 1250, true);
    let state = stub.app_state().unwrap();

    let mut catalog = CatalogPage::new();
    catalog.fetch(state.api()).await;
    catalog.go_to_page(2).unwrap();
    catalog.search("mug");
    catalog.fetch(state.api()).await;

    assert_eq!(catalog.filter().page_number(), 1);
    assert_eq!(catalog.filter().total(), 1);
    assert_eq!(catalog.products()[0].name, "Lavender Mug");

    let last = stub.requests_to(PRODUCTS_PATH).pop().unwrap();
    assert_eq!(last.param("search"), Some("mug"));
    assert_eq!(last.param("pageNumber"), Some("1"));

    let rendered = askama::Template::render(&catalog.view()).unwrap();
    assert!(rendered.contains("Lavender Mug"));
    assert!(rendered.contains("Page 1 of 1 (1 total)"));
}
