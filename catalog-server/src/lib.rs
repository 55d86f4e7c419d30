//! # Catalog Server
//!
//! HTTP façade over the catalog: CRUD for movies, series (with their owned
//! seasons and episodes), and games, plus listings of the shared reference
//! data (countries, directors, publishers).
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - SQLite (via sqlx) for persistent storage, schema applied on startup
//! - One pool checkout per request; transactions only where an operation
//!   must be atomic (season + episodes)
//! - `tower-http` for CORS and request tracing

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;
pub mod seed;

pub use infra::{app_state::AppState, config::Config};
