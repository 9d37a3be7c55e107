//! Site configuration management.
//!
//! Handles loading, parsing, and validating the `folio.toml` configuration file.

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default values for serde deserialization
pub mod config_defaults {
    pub fn r#true() -> bool {
        true
    }

    pub fn r#false() -> bool {
        false
    }

    pub mod site {
        pub fn title() -> String {
            "My Blog".into()
        }
        pub fn description() -> String {
            "Notes on programming, projects and ideas".into()
        }
        pub fn author() -> String {
            "<YOUR_NAME>".into()
        }
        pub fn url() -> String {
            "https://example.com".into()
        }
        pub fn language() -> String {
            "zh-CN".into()
        }
        pub fn image() -> String {
            "/images/og-image.jpg".into()
        }
    }

    pub mod source {
        use std::path::PathBuf;

        pub fn root() -> PathBuf {
            "public".into()
        }
        pub fn profile() -> String {
            "data/profile.json".into()
        }
        pub fn articles() -> String {
            "data/articles.json".into()
        }
        pub fn projects() -> String {
            "data/projects.json".into()
        }
        pub fn article_dir() -> String {
            "articles".into()
        }
        pub fn timeout() -> u64 {
            30
        }
    }

    pub mod markdown {
        use crate::markdown::DuplicateAnchors;

        pub fn duplicate_anchors() -> DuplicateAnchors {
            DuplicateAnchors::default()
        }
    }

    pub mod feed {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "feed.xml".into()
        }
        pub fn limit() -> usize {
            20
        }
    }
}

/// `[site]` section in folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteInfo {
    /// Site title, also the suffix of every page title
    #[serde(default = "config_defaults::site::title")]
    #[educe(Default = config_defaults::site::title())]
    pub title: String,

    /// Default page description
    #[serde(default = "config_defaults::site::description")]
    #[educe(Default = config_defaults::site::description())]
    pub description: String,

    /// Author name, e.g.: "Bob"
    #[serde(default = "config_defaults::site::author")]
    #[educe(Default = config_defaults::site::author())]
    pub author: String,

    /// Public base URL, e.g.: "https://example.com"
    #[serde(default = "config_defaults::site::url")]
    #[educe(Default = config_defaults::site::url())]
    pub url: String,

    /// Language code, e.g.: "zh-CN", "en-US"
    #[serde(default = "config_defaults::site::language")]
    #[educe(Default = config_defaults::site::language())]
    pub language: String,

    /// Default keywords for the keywords meta tag
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Default social preview image
    #[serde(default = "config_defaults::site::image")]
    #[educe(Default = config_defaults::site::image())]
    pub image: String,
}

impl SiteInfo {
    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Make a site-relative path absolute. Paths already starting with
    /// `http` are returned unchanged.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_owned()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url())
        } else {
            format!("{}/{path}", self.base_url())
        }
    }
}

/// `[source]` section in folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Local directory holding the site's static content
    #[serde(default = "config_defaults::source::root")]
    #[educe(Default = config_defaults::source::root())]
    pub root: PathBuf,

    /// Remote base URL; when set, content is fetched over HTTP instead of `root`
    #[serde(default)]
    pub url: Option<String>,

    /// Profile document path (relative to source)
    #[serde(default = "config_defaults::source::profile")]
    #[educe(Default = config_defaults::source::profile())]
    pub profile: String,

    /// Article metadata list path (relative to source)
    #[serde(default = "config_defaults::source::articles")]
    #[educe(Default = config_defaults::source::articles())]
    pub articles: String,

    /// Project list path (relative to source)
    #[serde(default = "config_defaults::source::projects")]
    #[educe(Default = config_defaults::source::projects())]
    pub projects: String,

    /// Directory holding `{slug}.md` article bodies (relative to source)
    #[serde(default = "config_defaults::source::article_dir")]
    #[educe(Default = config_defaults::source::article_dir())]
    pub article_dir: String,

    /// HTTP timeout in seconds
    #[serde(default = "config_defaults::source::timeout")]
    #[educe(Default = config_defaults::source::timeout())]
    pub timeout: u64,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// `[markdown]` section in folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct MarkdownConfig {
    /// Highlight fenced code blocks with a known language
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub highlight: bool,

    /// Render soft line breaks as `<br />`
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub breaks: bool,

    /// Typographic quotes and dashes
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub smart_punctuation: bool,

    /// Turn bare `scheme://` URLs in text into links
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub linkify: bool,

    /// How to treat headings whose anchors collide
    #[serde(default = "config_defaults::markdown::duplicate_anchors")]
    #[educe(Default = config_defaults::markdown::duplicate_anchors())]
    pub duplicate_anchors: crate::markdown::DuplicateAnchors,
}

/// `[feed]` section in folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Output path for the RSS feed file
    #[serde(default = "config_defaults::feed::path")]
    #[educe(Default = config_defaults::feed::path())]
    pub path: PathBuf,

    /// Maximum number of items in the feed
    #[serde(default = "config_defaults::feed::limit")]
    #[educe(Default = config_defaults::feed::limit())]
    pub limit: usize,

    /// Include the feed link in generated `<head>` output
    #[serde(default = "config_defaults::r#false")]
    #[educe(Default = false)]
    pub advertise: bool,
}

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of the loaded config file
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub site: SiteInfo,

    /// Where content is read from
    #[serde(default)]
    pub source: SourceConfig,

    /// Markdown rendering settings
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// RSS feed settings
    #[serde(default)]
    pub feed: FeedConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));

        if let Some(source) = &cli.source {
            if source.starts_with("http") {
                self.source.url = Some(source.clone());
            } else {
                self.source.url = None;
                self.source.root = PathBuf::from(source);
            }
        }

        let expanded = shellexpand::tilde(&self.source.root.to_string_lossy()).into_owned();
        let source_root = PathBuf::from(expanded);
        self.source.root = if source_root.is_relative() {
            root.join(source_root)
        } else {
            source_root
        };

        if self.feed.path.is_relative() {
            self.feed.path = root.join(&self.feed.path);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.site.url.starts_with("http") {
            bail!(ConfigError::Validation(
                "[site.url] must start with http:// or https://".into()
            ));
        }

        if let Some(url) = &self.source.url
            && !url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[source.url] must start with http:// or https://".into()
            ));
        }

        if self.source.timeout == 0 {
            bail!(ConfigError::Validation(
                "[source.timeout] must be greater than zero".into()
            ));
        }

        if self.feed.limit == 0 {
            bail!(ConfigError::Validation(
                "[feed.limit] must be greater than zero".into()
            ));
        }

        Ok(())
    }
}
