//! Core types for Stockdeck.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod role;
pub mod stock;

pub use id::*;
pub use role::Role;
pub use stock::StockStatus;
