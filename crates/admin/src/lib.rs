//! Lavender Admin library.
//!
//! Admin screens built on the storefront client runtime. Every screen here
//! is gated on the `Admin` role except the order listing, which any signed-in
//! user may open.
//!
//! # Modules
//!
//! - [`auth`] - Role guard for admin screens
//! - [`products`] - Product listing with active/inactive filter, 5 per page
//! - [`orders`] - Order listing with status filter, 10 per page
//! - [`dashboard`] - Product and order totals fetched concurrently

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
