//! Lavender Storefront client library.
//!
//! This crate provides the customer-facing client as a library so that the
//! CLI, the admin crate and the integration tests share one implementation.
//!
//! # Architecture
//!
//! - [`storage`] - Client-local key/value storage that survives restarts
//! - [`cart_store`] - The persisted cart, saved after every mutation
//! - [`session`] - Explicitly passed session context (sign in/out, route guard)
//! - [`api`] - REST adapter; all error-body shapes are normalized here
//! - [`routes`] - Screen controllers (auth form, catalog, cart) and their views
//! - [`state`] - Composition root wiring config, storage and the API client

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart_store;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
