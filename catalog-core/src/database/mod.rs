pub mod repositories;
mod sqlite;

pub use sqlite::CatalogDatabase;
