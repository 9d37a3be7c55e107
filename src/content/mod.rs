//! Site content: articles, projects and the profile.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   fetch(path)   ┌───────────────┐   set_*   ┌──────────────┐
//! │  ContentSource   │ ◄────────────── │ ContentLoader │ ────────► │ ContentStore │
//! │  (dir or http)   │ ──────────────► │  load_* / by  │ ◄──────── │   (cache)    │
//! └──────────────────┘   raw text      │  slug lookup  │  articles └──────────────┘
//!                                      └───────┬───────┘
//!                                              │
//!                                              ▼
//!                                     query::{featured, recent,
//!                                      by_tag, search, ...}
//! ```
//!
//! Metadata lists are fetched in bulk and cached; article bodies are fetched
//! per slug on every lookup and never cached.

mod loader;
pub mod query;
mod source;
mod store;
mod types;

pub use loader::ContentLoader;
pub use source::{ContentSource, DirSource, HttpSource};
pub use store::ContentStore;
pub use types::{Article, Profile};

#[cfg(test)]
pub(crate) use source::MemorySource;

use std::path::PathBuf;
use thiserror::Error;

/// Failures while fetching or decoding content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("request for `{path}` failed")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for `{path}` returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("`{0}` not found")]
    NotFound(String),

    #[error("failed to parse `{path}`")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ContentError {
    /// Whether the resource is absent, as opposed to unreachable or malformed.
    #[allow(unused)]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
