//! Where raw content comes from.

use super::ContentError;
use reqwest::{StatusCode, blocking::Client};
use std::{
    fs, io,
    path::PathBuf,
    time::Duration,
};

/// Reads content documents by site-relative path, e.g. `data/articles.json`.
pub trait ContentSource: Send + Sync {
    /// Fetch the text at `path`.
    fn fetch(&self, path: &str) -> Result<String, ContentError>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// Content read from a local directory, typically the site's public folder.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl ContentSource for DirSource {
    fn fetch(&self, path: &str) -> Result<String, ContentError> {
        let file = self.resolve(path);
        fs::read_to_string(&file).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ContentError::NotFound(path.to_owned()),
            _ => ContentError::Io(file, err),
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Content fetched over HTTP from a deployed site.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ContentError::Network {
                path: base_url.to_owned(),
                source,
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    /// Percent-encode each segment, so slugs with spaces or CJK survive.
    fn url_for(&self, path: &str) -> String {
        let encoded: Vec<_> = path
            .trim_start_matches('/')
            .split('/')
            .map(urlencoding::encode)
            .collect();
        format!("{}/{}", self.base_url, encoded.join("/"))
    }
}

impl ContentSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<String, ContentError> {
        let network = |source: reqwest::Error| ContentError::Network {
            path: path.to_owned(),
            source,
        };

        let response = self.client.get(self.url_for(path)).send().map_err(network)?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ContentError::NotFound(path.to_owned())),
            status if !status.is_success() => Err(ContentError::Status {
                path: path.to_owned(),
                status: status.as_u16(),
            }),
            _ => response.text().map_err(network),
        }
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// In-memory documents that record every path requested.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemorySource {
    documents: std::collections::HashMap<String, String>,
    requests: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemorySource {
    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.documents.insert(path.to_owned(), body.to_owned());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[cfg(test)]
impl ContentSource for MemorySource {
    fn fetch(&self, path: &str) -> Result<String, ContentError> {
        self.requests.lock().push(path.to_owned());
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(path.to_owned()))
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
