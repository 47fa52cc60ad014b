//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::CatalogError;
use crate::search::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_WINDOW};

/// Tuning for a [`CatalogEngine`](crate::CatalogEngine).
///
/// ```toml
/// page_size = 12
/// max_concurrent_queries = 4
/// page_window = 7
/// scope_counts = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Entries per listing page.
    pub page_size: u32,
    /// Store queries one listing may have in flight at once.
    pub max_concurrent_queries: usize,
    /// Page counts up to this size list every page number.
    pub page_window: u32,
    /// Whether to compute sibling category/subcategory counts.
    pub scope_counts: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_concurrent_queries: 4,
            page_window: DEFAULT_PAGE_WINDOW,
            scope_counts: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.page_size == 0 {
            return Err(CatalogError::Config("page_size must be at least 1".to_string()));
        }
        if self.max_concurrent_queries == 0 {
            return Err(CatalogError::Config(
                "max_concurrent_queries must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_queries > Semaphore::MAX_PERMITS {
            return Err(CatalogError::Config(format!(
                "max_concurrent_queries must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_concurrent_queries(mut self, limit: usize) -> Self {
        self.max_concurrent_queries = limit;
        self
    }

    pub fn with_scope_counts(mut self, enabled: bool) -> Self {
        self.scope_counts = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.page_window, 7);
        assert!(config.scope_counts);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("max_concurrent_queries = 2\n").unwrap();
        assert_eq!(config.max_concurrent_queries, 2);
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("page_size = 0"),
            Err(CatalogError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("max_concurrent_queries = 0"),
            Err(CatalogError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("page_size = \"twelve\""),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn test_oversized_concurrency_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("max_concurrent_queries = 3000000000000000000"),
            Err(CatalogError::Config(_))
        ));

        let at_limit = EngineConfig::default().with_max_concurrent_queries(Semaphore::MAX_PERMITS);
        assert!(at_limit.validate().is_ok());
        let over = EngineConfig::default().with_max_concurrent_queries(Semaphore::MAX_PERMITS + 1);
        assert!(over.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/catalog.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
