//! Fetches, decodes and caches site content.

use super::{
    ContentError, ContentSource, ContentStore, DirSource, HttpSource, query,
    types::{Article, Profile, Project},
};
use crate::{config::SourceConfig, log};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Loads content from a [`ContentSource`] into a shared [`ContentStore`].
pub struct ContentLoader {
    source: Box<dyn ContentSource>,
    profile_path: String,
    articles_path: String,
    projects_path: String,
    article_dir: String,
    store: Arc<ContentStore>,
}

impl ContentLoader {
    pub fn new(source: Box<dyn ContentSource>, config: &SourceConfig) -> Self {
        Self {
            source,
            profile_path: config.profile.clone(),
            articles_path: config.articles.clone(),
            projects_path: config.projects.clone(),
            article_dir: config.article_dir.trim_end_matches('/').to_owned(),
            store: Arc::new(ContentStore::new()),
        }
    }

    /// Pick an HTTP source when `url` is set, the local `root` otherwise.
    pub fn from_config(config: &SourceConfig) -> Result<Self, ContentError> {
        let source: Box<dyn ContentSource> = match &config.url {
            Some(url) => Box::new(HttpSource::new(url, config.timeout())?),
            None => Box::new(DirSource::new(&config.root)),
        };
        Ok(Self::new(source, config))
    }

    /// Share an existing cache instead of starting empty.
    #[allow(unused)]
    pub fn with_store(mut self, store: Arc<ContentStore>) -> Self {
        self.store = store;
        self
    }

    #[allow(unused)]
    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ContentError> {
        let text = self.source.fetch(path)?;
        serde_json::from_str(&text).map_err(|source| ContentError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    fn logged<T>(&self, what: &str, result: Result<T, ContentError>) -> Result<T, ContentError> {
        if let Err(err) = &result {
            log!("error"; "failed to load {what} from {}: {}", self.describe(), error_chain(err));
        }
        result
    }

    /// Fetch the profile and replace the cached copy.
    pub fn load_profile(&self) -> Result<Arc<Profile>, ContentError> {
        let profile = self.logged("profile", self.fetch_json(&self.profile_path))?;
        Ok(self.store.set_profile(profile))
    }

    /// Fetch article metadata and replace the cached list.
    pub fn load_articles(&self) -> Result<Arc<[Article]>, ContentError> {
        let articles: Vec<Article> =
            self.logged("articles", self.fetch_json(&self.articles_path))?;
        log!("content"; "loaded {} articles", articles.len());
        Ok(self.store.set_articles(articles))
    }

    /// Fetch the project list and replace the cached list.
    pub fn load_projects(&self) -> Result<Arc<[Project]>, ContentError> {
        let projects: Vec<Project> =
            self.logged("projects", self.fetch_json(&self.projects_path))?;
        log!("content"; "loaded {} projects", projects.len());
        Ok(self.store.set_projects(projects))
    }

    /// Cached articles, loading them on first use.
    pub fn ensure_articles(&self) -> Result<Arc<[Article]>, ContentError> {
        match self.store.articles() {
            Some(articles) => Ok(articles),
            None => self.load_articles(),
        }
    }

    /// Cached projects, loading them on first use.
    pub fn ensure_projects(&self) -> Result<Arc<[Project]>, ContentError> {
        match self.store.projects() {
            Some(projects) => Ok(projects),
            None => self.load_projects(),
        }
    }

    /// Cached profile, loading it on first use.
    pub fn ensure_profile(&self) -> Result<Arc<Profile>, ContentError> {
        match self.store.profile() {
            Some(profile) => Ok(profile),
            None => self.load_profile(),
        }
    }

    /// Markdown body of an article. Never cached.
    pub fn fetch_body(&self, slug: &str) -> Result<String, ContentError> {
        self.source.fetch(&format!("{}/{slug}.md", self.article_dir))
    }

    /// Look up an article and attach its body.
    ///
    /// `Ok(None)` means the slug is not in the metadata list; no body is
    /// requested in that case.
    pub fn try_article_by_slug(&self, slug: &str) -> Result<Option<Article>, ContentError> {
        let articles = self.ensure_articles()?;
        let Some(meta) = articles.iter().find(|a| a.slug == slug) else {
            return Ok(None);
        };

        let content = self.fetch_body(slug)?;
        Ok(Some(Article {
            content: Some(content),
            ..meta.clone()
        }))
    }
}

/// Lookups for callers embedding the loader; the CLI filters slices directly.
#[allow(unused)]
impl ContentLoader {
    /// Like [`Self::try_article_by_slug`], with every failure logged and
    /// turned into `None`.
    pub fn article_by_slug(&self, slug: &str) -> Option<Article> {
        match self.try_article_by_slug(slug) {
            Ok(Some(article)) => Some(article),
            Ok(None) => {
                log!("content"; "no article with slug `{slug}`");
                None
            }
            Err(err) => {
                log!("error"; "failed to load article `{slug}`: {}", error_chain(&err));
                None
            }
        }
    }

    fn select<F>(&self, pick: F) -> Result<Vec<Article>, ContentError>
    where
        F: for<'a> FnOnce(&'a [Article]) -> Vec<&'a Article>,
    {
        let articles = self.ensure_articles()?;
        Ok(pick(&articles[..]).into_iter().cloned().collect())
    }

    pub fn featured_articles(&self) -> Result<Vec<Article>, ContentError> {
        self.select(query::featured)
    }

    pub fn featured_projects(&self) -> Result<Vec<Project>, ContentError> {
        let projects = self.ensure_projects()?;
        Ok(query::featured_projects(&projects).into_iter().cloned().collect())
    }

    pub fn recent_articles(&self, n: usize) -> Result<Vec<Article>, ContentError> {
        self.select(|articles| query::recent(articles, n))
    }

    pub fn articles_by_category(&self, category: &str) -> Result<Vec<Article>, ContentError> {
        self.select(|articles| query::by_category(articles, category))
    }

    pub fn articles_by_tag(&self, tag: &str) -> Result<Vec<Article>, ContentError> {
        self.select(|articles| query::by_tag(articles, tag))
    }

    pub fn search_articles(&self, text: &str) -> Result<Vec<Article>, ContentError> {
        self.select(|articles| query::search(articles, text))
    }

    pub fn all_tags(&self) -> Result<Vec<String>, ContentError> {
        let articles = self.ensure_articles()?;
        Ok(query::all_tags(&articles).into_iter().map(str::to_owned).collect())
    }

    pub fn all_categories(&self) -> Result<Vec<String>, ContentError> {
        let articles = self.ensure_articles()?;
        Ok(query::all_categories(&articles)
            .into_iter()
            .map(str::to_owned)
            .collect())
    }
}

/// `outer: inner: root` rendering of an error and its sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
