//! Storage collaborator: the catalog of ingredients, diseases and relations
//!
//! The engine only ever reads through [`CatalogStore`]; [`SqliteCatalog`] is
//! the production implementation.

pub mod catalog;
pub mod schema;
pub mod sqlite_catalog;
pub mod sqlite_pragma;

pub use catalog::CatalogStore;
pub use schema::run_schema_migrations;
pub use sqlite_catalog::SqliteCatalog;

use crate::compat_core::IntegrityError;

#[derive(Debug)]
pub enum StoreError {
    Database(rusqlite::Error),
    Io(std::io::Error),
    /// Row contents violate the catalog's own invariants
    Integrity(IntegrityError),
    SchemaDirMissing(String),
    LockPoisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<IntegrityError> for StoreError {
    fn from(err: IntegrityError) -> Self {
        StoreError::Integrity(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Integrity(e) => write!(f, "Integrity error: {}", e),
            StoreError::SchemaDirMissing(dir) => write!(f, "Schema directory not found: {}", dir),
            StoreError::LockPoisoned => write!(f, "Catalog connection lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}
