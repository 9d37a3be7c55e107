//! Folio - content toolkit for a personal blog and portfolio site.

mod cli;
mod commands;
mod config;
mod content;
mod feed;
mod markdown;
mod seo;
mod utils;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use content::ContentLoader;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let loader = || ContentLoader::from_config(&config.source);

    match &cli.command {
        Commands::Render { file, toc, reading_time } => {
            commands::render_file(file, *toc, *reading_time, &config)
        }
        Commands::Article { slug, toc, head } => {
            commands::show_article(&loader()?, slug, *toc, *head, &config)
        }
        Commands::Articles { filter, json } => commands::list_articles(&loader()?, filter, *json),
        Commands::Tags => commands::list_tags(&loader()?),
        Commands::Categories => commands::list_categories(&loader()?),
        Commands::Projects { featured, json } => {
            commands::list_projects(&loader()?, *featured, *json)
        }
        Commands::Profile { json_ld } => commands::show_profile(&loader()?, *json_ld, &config),
        Commands::Site { head, json_ld } => commands::show_site(*head, *json_ld, &config),
        Commands::Feed { output } => {
            commands::generate_feed(&loader()?, output.as_deref(), &config)
        }
        Commands::Stats => commands::stats(&loader()?, &config),
    }
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file is not an error: every section has defaults.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
