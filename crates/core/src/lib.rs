//! Lavender Core - Shared types and pure client logic.
//!
//! This crate provides the types and state machines used across all Lavender components:
//! - `storefront` - Customer-facing client (catalog, cart, checkout, auth)
//! - `admin` - Privileged listings and dashboard
//! - `cli` - Command-line shell driving both
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage access,
//! no HTTP clients. Everything here can be exercised without a network or a disk.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities, emails, and statuses
//! - [`cart`] - Cart line items and merge/quantity/total operations
//! - [`session`] - Access token claims decoding and session derivation
//! - [`auth_form`] - Login/registration form state machine and validation
//! - [`pagination`] - Paged listing filter state
//! - [`order`] - Order payloads and order listing summaries
//! - [`product`] - Catalog product listing items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth_form;
pub mod cart;
pub mod order;
pub mod pagination;
pub mod product;
pub mod session;
pub mod types;

pub use types::*;
