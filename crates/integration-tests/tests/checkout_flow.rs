//! Cart to order submission against the stub API.

#![allow(clippy::unwrap_used)]

use lavender_core::ProductId;
use lavender_core::auth_form::Credentials;
use lavender_integration_tests::{ORDERS_PATH, StubApi};
use lavender_storefront::cart_store::CartStore;
use lavender_storefront::routes::cart::{CartPage, FinalizeOutcome};
use lavender_storefront::routes::products::CatalogPage;
use lavender_storefront::session::SessionContext;
use lavender_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::json;

async fn sign_in(state: &AppState, username: &str, password: &str) -> SessionContext {
    let mut session = state.session().unwrap();
    session
        .sign_in(
            state.api(),
            &Credentials {
                username: username.to_string(),
                password: SecretString::from(password),
            },
        )
        .await
        .unwrap();
    session
}

/// Put `quantity` of `sku` in the stored cart through the catalog screen.
async fn add_from_catalog(state: &AppState, sku: &str, quantity: u32) -> String {
    let mut catalog = CatalogPage::new();
    catalog.fetch(state.api()).await;
    let id = ProductId::new(sku);
    catalog.set_pending(&id, quantity);
    let mut cart = CartStore::open(state.storage()).unwrap();
    catalog.add_to_cart(&id, &mut cart).unwrap()
}

async fn seeded() -> StubApi {
    let stub = StubApi::start().await.unwrap();
    stub.add_product("MUG-01", "Mug", 1250, true);
    stub.add_product("TEA-02", "Tea", 800, true);
    stub
}

#[tokio::test]
async fn test_checkout_places_order_and_empties_cart() {
    let stub = seeded().await;
    let customer_id = stub.add_user("ana", "s3cret", "ana@example.com", "Customer");
    let state = stub.app_state().unwrap();
    let session = sign_in(&state, "ana", "s3cret").await;

    let message = add_from_catalog(&state, "MUG-01", 2).await;
    assert_eq!(message, "Added 2 unit(s) of Mug to the cart.");
    add_from_catalog(&state, "TEA-02", 1).await;
    add_from_catalog(&state, "MUG-01", 1).await;

    let mut page = CartPage::open(state.storage()).unwrap();
    assert_eq!(page.store().cart().len(), 2);
    page.details.shipping_address = "1 Main St".to_string();
    page.details.billing_address = "1 Main St".to_string();
    page.details.notes = "Leave at the door".to_string();

    let outcome = page.finalize(state.api(), &session).await.unwrap();
    let FinalizeOutcome::Placed(created) = outcome else {
        panic!("expected a placed order, got {outcome:?}");
    };
    assert_eq!(created["status"], "Pending");
    assert_eq!(created["total"], "45.50");
    assert!(!page.is_processing());
    assert!(page.store().is_empty());
    assert!(CartStore::open(state.storage()).unwrap().is_empty());

    let payloads = stub.order_payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(
        payloads[0],
        json!({
            "customerId": customer_id.to_string(),
            "shippingAddress": "1 Main St",
            "billingAddress": "1 Main St",
            "notes": "Leave at the door",
            "items": [
                {"productId": "MUG-01", "quantity": 3},
                {"productId": "TEA-02", "quantity": 1},
            ],
        })
    );

    let post = stub
        .requests_to(ORDERS_PATH)
        .into_iter()
        .find(|request| request.method == "POST")
        .unwrap();
    assert!(post.bearer.is_some());
}

#[tokio::test]
async fn test_anonymous_checkout_requires_login() {
    let stub = seeded().await;
    let state = stub.app_state().unwrap();
    let session = state.session().unwrap();

    add_from_catalog(&state, "TEA-02", 1).await;
    let mut page = CartPage::open(state.storage()).unwrap();
    page.details.shipping_address = "1 Main St".to_string();
    page.details.billing_address = "1 Main St".to_string();

    let outcome = page.finalize(state.api(), &session).await.unwrap();
    assert_eq!(outcome, FinalizeOutcome::LoginRequired);
    assert!(stub.requests_to(ORDERS_PATH).is_empty());
    assert_eq!(page.store().cart().len(), 1);
}

#[tokio::test]
async fn test_missing_addresses_sends_nothing() {
    let stub = seeded().await;
    stub.add_user("ana", "s3cret", "ana@example.com", "Customer");
    let state = stub.app_state().unwrap();
    let session = sign_in(&state, "ana", "s3cret").await;

    add_from_catalog(&state, "MUG-01", 1).await;
    let mut page = CartPage::open(state.storage()).unwrap();
    page.details.shipping_address = "1 Main St".to_string();

    let outcome = page.finalize(state.api(), &session).await.unwrap();
    assert_eq!(outcome, FinalizeOutcome::MissingAddresses);
    assert!(stub.requests_to(ORDERS_PATH).is_empty());
    assert!(!page.store().is_empty());
}

#[tokio::test]
async fn test_empty_cart_is_ignored() {
    let stub = seeded().await;
    stub.add_user("ana", "s3cret", "ana@example.com", "Customer");
    let state = stub.app_state().unwrap();
    let session = sign_in(&state, "ana", "s3cret").await;

    let mut page = CartPage::open(state.storage()).unwrap();
    let outcome = page.finalize(state.api(), &session).await.unwrap();
    assert_eq!(outcome, FinalizeOutcome::Ignored);
    assert!(stub.requests_to(ORDERS_PATH).is_empty());
}

#[tokio::test]
async fn test_cart_edits_persist_between_screens() {
    let stub = seeded().await;
    let state = stub.app_state().unwrap();

    add_from_catalog(&state, "MUG-01", 2).await;
    let mut page = CartPage::open(state.storage()).unwrap();
    let mug = ProductId::new("MUG-01");
    assert!(page.increment(&mug).unwrap());
    assert!(!page.remove(&ProductId::new("NOPE")).unwrap());

    let reopened = CartPage::open(state.storage()).unwrap();
    let line = reopened.store().cart().line(&mug).unwrap();
    assert_eq!(line.quantity.get(), 3);

    let rendered = askama::Template::render(&reopened.view()).unwrap();
    assert!(rendered.contains("Mug"));
}

#[tokio::test]
async fn test_rejected_order_keeps_cart() {
    let stub = seeded().await;
    stub.add_user("ana", "s3cret", "ana@example.com", "Customer");
    let state = stub.app_state().unwrap();
    let session = sign_in(&state, "ana", "s3cret").await;

    add_from_catalog(&state, "MUG-01", 2).await;
    stub.remove_product("MUG-01");

    let mut page = CartPage::open(state.storage()).unwrap();
    page.details.shipping_address = "1 Main St".to_string();
    page.details.billing_address = "1 Main St".to_string();

    let outcome = page.finalize(state.api(), &session).await.unwrap();
    assert_eq!(
        outcome,
        FinalizeOutcome::Failed("Product MUG-01 is no longer available.".to_string())
    );
    assert_eq!(
        outcome.message().as_deref(),
        Some("Error: Product MUG-01 is no longer available.")
    );
    assert!(!page.is_processing());
    assert_eq!(page.store().cart().len(), 1);
    assert!(stub.order_payloads().is_empty());

    let stored = CartStore::open(state.storage()).unwrap();
    let line = stored.cart().line(&ProductId::new("MUG-01")).unwrap();
    assert_eq!(line.quantity.get(), 2);
}
