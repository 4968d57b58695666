//! Client library for the accfb orders backend.
//!
//! The orders backend is an external REST service that owns all order state. This crate
//! wraps its wire surface in a typed [`OrdersApi`] and exposes the pure list helpers
//! (visibility filtering and new-order diffing) that the storefront server builds on.

mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;
mod traits;

pub use api::OrdersApi;
pub use config::OrdersConfig;
pub use data_objects::{DeleteOutcome, Order, OrderId};
pub use error::OrdersApiError;
pub use traits::OrdersGateway;
