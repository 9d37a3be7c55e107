//! Content cache.
//!
//! One store is shared by every loader that should see the same data. It is
//! never filled implicitly: values appear through `set_*` (called by the
//! loader's `load_*`) and disappear through [`ContentStore::invalidate`].
//!
//! # Thread Safety
//!
//! Each cached value sits behind its own `RwLock`; readers get a cheap
//! `Arc` clone and never hold a lock while working on the data.

use super::types::{Article, Profile, Project};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ContentStore {
    profile: RwLock<Option<Arc<Profile>>>,
    articles: RwLock<Option<Arc<[Article]>>>,
    projects: RwLock<Option<Arc<[Project]>>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> Option<Arc<Profile>> {
        self.profile.read().clone()
    }

    pub fn articles(&self) -> Option<Arc<[Article]>> {
        self.articles.read().clone()
    }

    pub fn projects(&self) -> Option<Arc<[Project]>> {
        self.projects.read().clone()
    }

    /// Replace the cached profile.
    pub fn set_profile(&self, profile: Profile) -> Arc<Profile> {
        let profile = Arc::new(profile);
        *self.profile.write() = Some(Arc::clone(&profile));
        profile
    }

    /// Replace the cached article list.
    pub fn set_articles(&self, articles: Vec<Article>) -> Arc<[Article]> {
        let articles: Arc<[Article]> = articles.into();
        *self.articles.write() = Some(Arc::clone(&articles));
        articles
    }

    /// Replace the cached project list.
    pub fn set_projects(&self, projects: Vec<Project>) -> Arc<[Project]> {
        let projects: Arc<[Project]> = projects.into();
        *self.projects.write() = Some(Arc::clone(&projects));
        projects
    }

    /// Drop every cached value; the next lookup fetches again.
    #[allow(unused)]
    pub fn invalidate(&self) {
        *self.profile.write() = None;
        *self.articles.write() = None;
        *self.projects.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(slug: &str) -> Article {
        serde_json::from_value(serde_json::json!({
            "id": slug,
            "title": slug,
            "slug": slug,
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_store() {
        let store = ContentStore::new();
        assert!(store.profile().is_none());
        assert!(store.articles().is_none());
        assert!(store.projects().is_none());
    }

    #[test]
    fn test_set_and_read_articles() {
        let store = ContentStore::new();
        let returned = store.set_articles(vec![article("a"), article("b")]);

        let cached = store.articles().unwrap();
        assert_eq!(cached.len(), 2);
        assert!(Arc::ptr_eq(&returned, &cached));
    }

    #[test]
    fn test_loaded_empty_list_is_cached() {
        let store = ContentStore::new();
        store.set_articles(Vec::new());
        assert_eq!(store.articles().map(|a| a.len()), Some(0));
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let store = ContentStore::new();
        store.set_articles(vec![article("a")]);
        store.set_articles(vec![article("b"), article("c")]);

        let slugs: Vec<_> = store
            .articles()
            .unwrap()
            .iter()
            .map(|a| a.slug.clone())
            .collect();
        assert_eq!(slugs, vec!["b", "c"]);
    }

    #[test]
    fn test_invalidate_clears_everything() {
        let store = ContentStore::new();
        store.set_articles(vec![article("a")]);
        store.set_projects(Vec::new());

        store.invalidate();
        assert!(store.articles().is_none());
        assert!(store.projects().is_none());
    }

    #[test]
    fn test_readers_keep_snapshot_after_invalidate() {
        let store = ContentStore::new();
        store.set_articles(vec![article("a")]);
        let snapshot = store.articles().unwrap();

        store.invalidate();
        assert_eq!(snapshot[0].slug, "a");
    }
}
