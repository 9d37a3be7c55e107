//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio: personal site content toolkit
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// Content source: a directory or an http(s) base URL.
    ///
    /// Overrides `[source]` in folio.toml, e.g.:
    ///   folio --source https://example.com articles --recent 5
    #[arg(long)]
    pub source: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Filters for the `articles` command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Only articles carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Only articles in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Case-insensitive search over title, excerpt and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only featured articles
    #[arg(short, long)]
    pub featured: bool,

    /// Newest N articles by publish date (default: 5)
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "5")]
    pub recent: Option<usize>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a local Markdown file to HTML
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Print the table of contents instead of HTML
        #[arg(long)]
        toc: bool,

        /// Print the estimated reading time
        #[arg(long)]
        reading_time: bool,
    },

    /// Load one article by slug and render its body
    Article {
        /// Article slug
        slug: String,

        /// Print the table of contents as well
        #[arg(long)]
        toc: bool,

        /// Print the SEO `<head>` elements and JSON-LD as well
        #[arg(long)]
        head: bool,
    },

    /// List article metadata
    Articles {
        #[command(flatten)]
        filter: ArticleFilter,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List all distinct tags
    Tags,

    /// List all distinct categories
    Categories,

    /// List projects
    Projects {
        /// Only featured projects
        #[arg(short, long)]
        featured: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the site owner's profile
    Profile {
        /// Print schema.org JSON-LD instead
        #[arg(long)]
        json_ld: bool,
    },

    /// Show site-wide metadata from `[site]`
    Site {
        /// Print the SEO `<head>` elements
        #[arg(long)]
        head: bool,

        /// Print schema.org WebSite JSON-LD instead
        #[arg(long, conflicts_with = "head")]
        json_ld: bool,
    },

    /// Generate the RSS feed
    Feed {
        /// Output file (default: `[feed].path`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch every article body and compare reading times
    Stats,
}
