//! CLI command implementations.

pub mod browse;
pub mod config;
pub mod url;

use clap::{Args, Subcommand};

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Listing query string, e.g. `category=networking&page=2`.
    #[arg(default_value = "")]
    pub query: String,

    /// Catalog JSON file (array of entries).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Restrict the listing to a category id.
    #[arg(long)]
    pub category: Option<String>,

    /// Restrict the listing to a subcategory id (requires --category).
    #[arg(long, requires = "category")]
    pub subcategory: Option<String>,
}

/// Arguments for the url command.
#[derive(Args)]
pub struct UrlArgs {
    /// Current listing query string.
    #[arg(default_value = "")]
    pub query: String,

    /// Remove a filter: `key` drops every value, `key=value` drops one.
    #[arg(long, value_name = "KEY[=VALUE]")]
    pub remove: Vec<String>,

    /// Add a filter value.
    #[arg(long, value_name = "KEY=VALUE")]
    pub add: Vec<String>,

    /// Toggle a filter value.
    #[arg(long, value_name = "KEY=VALUE")]
    pub toggle: Vec<String>,

    /// Keep the current page after a filter change instead of going back to page 1.
    #[arg(long)]
    pub keep_page: bool,

    /// Sort token (popularity, price-asc, price-desc, rating, newest).
    #[arg(long)]
    pub sort: Option<String>,

    /// View token (grid, compact, list).
    #[arg(long)]
    pub view: Option<String>,

    /// Page number.
    #[arg(long)]
    pub page: Option<u32>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Print a default config file.
    Init,
    /// Validate the config file.
    Validate,
}
