//! # Catalog Core
//!
//! Core library for the catalog service: domain models for movies, series
//! (with their owned seasons and episodes), and games, the shared reference
//! entities they point at (countries, directors, publishers), request
//! payload validation, and the SQLite-backed repositories.
//!
//! ## Architecture
//!
//! - [`models`]: entities as the API returns them, associations eagerly
//!   loaded
//! - [`api_types`]: create/update payloads, list filters, and validation
//! - [`database`]: pool wrapper, embedded migrations, and one repository
//!   per aggregate
//! - [`error`]: the [`CatalogError`] taxonomy every layer maps into

pub mod api_types;
pub mod database;
pub mod error;
pub mod models;

pub use database::CatalogDatabase;
pub use error::{CatalogError, Result};
