//! Screen controllers and their text views.
//!
//! # Screens
//!
//! ```text
//! auth      - Login / registration form      (AuthController)
//! products  - Customer catalog, 8 per page   (CatalogPage)
//! cart      - Persisted cart and checkout    (CartPage)
//! ```
//!
//! Each controller holds its screen state and exposes user actions as
//! methods. `view()` snapshots the state into an askama template.

pub mod auth;
pub mod cart;
pub mod products;

use lavender_core::pagination::ListFilter;

/// Pager line shared by every listing view, e.g. `Page 2 of 3 (20 total)`.
#[must_use]
pub fn pager<S>(filter: &ListFilter<S>) -> String {
    format!(
        "Page {} of {} ({} total)",
        filter.page_number(),
        filter.total_pages(),
        filter.total()
    )
}
