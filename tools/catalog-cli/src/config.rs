//! CLI configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_catalog::EngineConfig;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog JSON file used when `--catalog` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Listing engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };

        config
            .engine
            .validate()
            .with_context(|| format!("Invalid engine settings in {}", path))?;
        Ok(config)
    }
}

/// Generate a default catalog.toml config file.
pub fn generate_default_config() -> String {
    let engine = EngineConfig::default();
    format!(
        r#"# Catalog CLI configuration

# catalog = "catalog.json"

[engine]
page_size = {page_size}
max_concurrent_queries = {max_concurrent_queries}
page_window = {page_window}
scope_counts = {scope_counts}
"#,
        page_size = engine.page_size,
        max_concurrent_queries = engine.max_concurrent_queries,
        page_window = engine.page_window,
        scope_counts = engine.scope_counts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_engine_table_overrides() {
        let config: CliConfig =
            toml::from_str("catalog = \"data/catalog.json\"\n[engine]\npage_size = 24\n").unwrap();
        assert_eq!(config.engine.page_size, 24);
        assert_eq!(config.engine.max_concurrent_queries, 4);
        assert_eq!(config.catalog, Some(PathBuf::from("data/catalog.json")));
    }
}
