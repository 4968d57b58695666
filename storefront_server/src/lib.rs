//! # PG Phone storefront server
//! This module hosts the server code for the storefront and its admin panel. It is responsible for:
//! Serving the product catalog and the admin's order listing.
//! Relaying outbound notifications to the LINE Messaging API and the SMTP provider.
//! Receiving and verifying inbound LINE webhook events.
//! Watching the orders backend for newly placed orders and alerting the admins.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! All order state lives in the external orders backend; this server holds nothing
//! durable. The notification worker's memory of "already alerted" orders is rebuilt
//! from scratch on every restart.

pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod routes;
pub mod server;

pub mod integrations;
pub mod mailer;
pub mod middleware;
pub mod notify_worker;
pub mod products;
pub mod relay_routes;

#[cfg(test)]
mod endpoint_tests;
