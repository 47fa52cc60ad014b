//! Catalog error types.

use thiserror::Error;

/// Errors surfaced by the listing engine.
///
/// Malformed request parameters never show up here; they are normalized
/// away while decoding a [`FilterSpec`](crate::search::FilterSpec).
#[derive(Error, Debug)]
pub enum CatalogError {
    /// One of the store queries behind a listing failed. No partial
    /// listing is returned.
    #[error("Catalog query failed: {0}")]
    QueryFailed(String),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by a [`CatalogStore`](crate::store::CatalogStore) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Failed to execute a query.
    #[error("Query execution failed: {0}")]
    Query(String),

    /// Failed to decode a row returned by the store.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The store cannot serve requests right now.
    #[error("Store unavailable")]
    Unavailable,
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        CatalogError::QueryFailed(e.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(e: toml::de::Error) -> Self {
        CatalogError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}
