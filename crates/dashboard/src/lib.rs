//! Stockdeck Dashboard library.
//!
//! Server-rendered admin dashboard for the warehouse management API. This
//! crate provides the dashboard as a library so the binary stays thin and the
//! pieces can be tested in isolation.
//!
//! # Architecture
//!
//! - Axum web framework with Askama templates for server-side rendering
//! - `reqwest` client for the WMS REST API (the only backend; the dashboard
//!   itself persists nothing)
//! - `moka` query/mutation cache keyed by (entity, search-term)
//! - Session gate on the API's `jwt` cookie; the token is forwarded, never
//!   parsed

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod wms;
