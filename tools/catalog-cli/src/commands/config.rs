//! Configuration management commands.

use anyhow::Result;

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init => {
            print!("{}", generate_default_config());
            Ok(())
        }
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_file {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    if let Some(ref catalog) = ctx.config.catalog {
        ctx.output.kv("catalog", &catalog.display().to_string());
    }

    let engine = &ctx.config.engine;
    ctx.output.info("[engine]");
    ctx.output.kv("page_size", &engine.page_size.to_string());
    ctx.output.kv(
        "max_concurrent_queries",
        &engine.max_concurrent_queries.to_string(),
    );
    ctx.output.kv("page_window", &engine.page_window.to_string());
    ctx.output.kv("scope_counts", &engine.scope_counts.to_string());

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    // Loading already rejected invalid files; re-check what was loaded.
    ctx.config.engine.validate()?;

    if let Some(ref catalog) = ctx.config.catalog {
        let path = ctx.resolve_path(&catalog.to_string_lossy());
        if !path.exists() {
            ctx.output
                .warn(&format!("Catalog file not found: {}", path.display()));
        }
    }

    ctx.output.success("Configuration is valid");
    Ok(())
}
