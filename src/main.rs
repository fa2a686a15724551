//! Folio - a localized static page generator.

mod build;
mod cli;
mod config;
mod generator;
mod logger;
mod render;
mod utils;

use anyhow::{Context, Result};
use build::{Mode, build_site};
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let mode = if cli.is_check() { Mode::Check } else { Mode::Build };
    build_site(&config, mode).map(|_| ())
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file is not an error: every field has a default. The
/// file in use is logged either way.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)
            .with_context(|| format!("loading `{}`", config_path.display()))?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    if config.config_path.exists() {
        log!("config"; "using {}", config.config_path.display());
    } else {
        log!("config"; "{} not found, using defaults", config.config_path.display());
    }
    config.validate()?;

    Ok(config)
}
