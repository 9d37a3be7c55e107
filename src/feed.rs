//! RSS feed generation.
//!
//! Builds an RSS 2.0 channel from article metadata. Bodies are not needed:
//! the excerpt is the item description.

use crate::{
    config::{FeedConfig, SiteInfo},
    content::{Article, query},
    log,
    utils::date::to_rfc2822,
};
use anyhow::{Context, Result, anyhow};
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, Item, ItemBuilder, validation::Validate};
use std::fs;

const GENERATOR: &str = concat!("folio ", env!("CARGO_PKG_VERSION"));

/// Public URL of an article page.
pub fn article_link(site: &SiteInfo, slug: &str) -> String {
    format!("{}/blog/{}", site.base_url(), urlencoding::encode(slug))
}

/// Render the `limit` newest articles as RSS XML.
pub fn build_feed(articles: &[Article], site: &SiteInfo, limit: usize) -> Result<String> {
    let items: Vec<_> = query::recent(articles, limit)
        .into_iter()
        .map(|article| feed_item(article, site))
        .collect();

    let channel = ChannelBuilder::default()
        .title(site.title.clone())
        .link(site.base_url().to_owned())
        .description(site.description.clone())
        .language(Some(site.language.clone()))
        .generator(Some(GENERATOR.to_owned()))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("rss validate: {e}"))?;

    Ok(channel.to_string())
}

fn feed_item(article: &Article, site: &SiteInfo) -> Item {
    let link = article_link(site, &article.slug);

    let categories = std::iter::once(&article.category)
        .filter(|c| !c.is_empty())
        .chain(&article.tags)
        .map(|name| CategoryBuilder::default().name(name.clone()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(Some(article.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(article.excerpt.clone()).filter(|e| !e.is_empty()))
        .pub_date(article.published().and_then(to_rfc2822))
        .categories(categories)
        .build()
}

/// Build the feed and write it to the configured path.
pub fn write_feed(articles: &[Article], site: &SiteInfo, feed: &FeedConfig) -> Result<()> {
    log!("feed"; "generating rss feed");
    let xml = build_feed(articles, site, feed.limit)?;

    if let Some(parent) = feed.path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(&feed.path, xml)
        .with_context(|| format!("failed to write `{}`", feed.path.display()))?;

    log!("feed"; "rss feed written to {}", feed.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::parse_date;
    use serde_json::json;

    fn site() -> SiteInfo {
        SiteInfo {
            title: "My Blog".into(),
            description: "Notes".into(),
            url: "https://blog.example.com/".into(),
            ..SiteInfo::default()
        }
    }

    fn articles() -> Vec<Article> {
        serde_json::from_value(json!([
            { "id": "1", "title": "Old", "slug": "old", "excerpt": "old one",
              "publishDate": "2023-01-01", "category": "tech", "tags": ["rust"] },
            { "id": "2", "title": "New & shiny", "slug": "new", "excerpt": "",
              "publishedAt": "2024-05-01T08:00:00Z", "tags": ["life", "travel"] },
            { "id": "3", "title": "Undated", "slug": "undated" },
        ]))
        .unwrap()
    }

    #[test]
    fn test_article_link() {
        assert_eq!(article_link(&site(), "hello"), "https://blog.example.com/blog/hello");
        assert_eq!(
            article_link(&site(), "a b"),
            "https://blog.example.com/blog/a%20b"
        );
    }

    #[test]
    fn test_build_feed_orders_and_limits() {
        let xml = build_feed(&articles(), &site(), 2).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();

        assert_eq!(channel.title(), "My Blog");
        assert_eq!(channel.link(), "https://blog.example.com");
        assert_eq!(channel.language(), Some("zh-CN"));

        let titles: Vec<_> = channel.items().iter().filter_map(|i| i.title()).collect();
        assert_eq!(titles, vec!["New & shiny", "Old"]);
    }

    #[test]
    fn test_feed_item_fields() {
        let xml = build_feed(&articles(), &site(), 10).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let old = &channel.items()[1];

        assert_eq!(old.link(), Some("https://blog.example.com/blog/old"));
        assert_eq!(old.guid().map(|g| g.value()), Some("https://blog.example.com/blog/old"));
        assert_eq!(old.description(), Some("old one"));
        assert_eq!(old.pub_date(), Some("Sun, 1 Jan 2023 00:00:00 +0000"));
        let published = chrono::DateTime::parse_from_rfc2822(old.pub_date().unwrap()).unwrap();
        assert_eq!(Some(published.to_utc()), parse_date("2023-01-01"));

        let names: Vec<_> = old.categories().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["tech", "rust"]);

        let new = &channel.items()[0];
        assert_eq!(new.description(), None);
        let names: Vec<_> = new.categories().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["life", "travel"]);

        let undated = &channel.items()[2];
        assert_eq!(undated.pub_date(), None);
    }

    #[test]
    fn test_build_feed_empty() {
        let xml = build_feed(&[], &site(), 20).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        assert!(channel.items().is_empty());
    }

    #[test]
    fn test_write_feed_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let feed = FeedConfig {
            path: dir.path().join("out/feed.xml"),
            ..FeedConfig::default()
        };
        write_feed(&articles(), &site(), &feed).unwrap();

        let xml = fs::read_to_string(&feed.path).unwrap();
        assert!(xml.contains("<rss"));
        assert!(xml.contains("New &amp; shiny"));
    }
}
