//! Order desk server library.
//!
//! Customers, catalog items and orders over a single `SQLite` database, served
//! as a JSON HTTP API. The crate is split into a library so that the CLI and
//! the integration tests can drive the same repositories, services and router
//! as the binary.
//!
//! # Layers
//!
//! - [`db`] - Connection pool, schema bootstrap and repositories
//! - [`services`] - Multi-table transactions (order placement and update)
//! - [`routes`] - HTTP handlers and the application router
//! - [`error`] - Mapping of failures to HTTP status codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
