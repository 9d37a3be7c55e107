//! Command handlers. Results go to stdout, progress and errors to stderr.

use crate::{
    cli::ArticleFilter,
    config::{FeedConfig, SiteConfig},
    content::{Article, ContentLoader, query},
    feed, log,
    markdown::{MarkdownOptions, TocEntry, extract_toc, reading_time, render_document},
    seo::{SeoHead, SeoOptions, StructuredData, structured_data},
    utils::date::{format_date, is_this_year, relative_time},
};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::{fs, path::Path};

pub fn render_file(
    file: &Path,
    toc: bool,
    show_reading_time: bool,
    config: &SiteConfig,
) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read `{}`", file.display()))?;
    let options = MarkdownOptions::from(&config.markdown);

    if toc {
        print_toc(&extract_toc(&text, &options));
    } else {
        let doc = render_document(&text, &options);
        print!("{}", doc.html);
    }
    if show_reading_time {
        println!("reading time: {} min", reading_time(&text));
    }
    Ok(())
}

pub fn show_article(
    loader: &ContentLoader,
    slug: &str,
    toc: bool,
    head: bool,
    config: &SiteConfig,
) -> Result<()> {
    let Some(article) = loader.try_article_by_slug(slug)? else {
        bail!("no article with slug `{slug}`");
    };
    let body = article.content.as_deref().unwrap_or_default();
    let doc = render_document(body, &MarkdownOptions::from(&config.markdown));

    if head {
        let seo = page_head(&SeoOptions::for_article(&article), config);
        println!("{}", seo.to_html()?);

        let ld = structured_data(StructuredData::Article(&article), &config.site);
        println!(
            "<script type=\"application/ld+json\">{}</script>",
            serde_json::to_string(&ld)?
        );
        println!();
    }
    if toc {
        print_toc(&doc.toc);
        println!();
    }

    log!("content"; "`{}`: {} min read, {} headings", article.title, doc.reading_time, doc.toc.len());
    print!("{}", doc.html);
    Ok(())
}

/// Apply every set filter, in the order tag, category, search, featured, recent.
fn filter_articles(articles: &[Article], filter: &ArticleFilter) -> Vec<Article> {
    let mut selected = articles.to_vec();
    let mut narrow = |pick: &dyn Fn(&[Article]) -> Vec<&Article>| {
        selected = pick(&selected).into_iter().cloned().collect();
    };

    if let Some(tag) = &filter.tag {
        narrow(&|a| query::by_tag(a, tag));
    }
    if let Some(category) = &filter.category {
        narrow(&|a| query::by_category(a, category));
    }
    if let Some(text) = &filter.search {
        narrow(&|a| query::search(a, text));
    }
    if filter.featured {
        narrow(&query::featured);
    }
    if let Some(n) = filter.recent {
        narrow(&|a| query::recent(a, n));
    }
    selected
}

pub fn list_articles(loader: &ContentLoader, filter: &ArticleFilter, json: bool) -> Result<()> {
    let articles = loader.ensure_articles()?;
    let selected = filter_articles(&articles, filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }
    let now = Utc::now();
    for article in selected {
        let date = article
            .published()
            .and_then(|date| display_date(date, now))
            .unwrap_or_else(|| "-".into());
        let star = if article.featured { "*" } else { " " };
        println!(
            "{star} {date:<14} {:<28} {} [{}]",
            article.slug,
            article.title,
            article.tags.join(", ")
        );
    }
    Ok(())
}

pub fn list_tags(loader: &ContentLoader) -> Result<()> {
    for tag in loader.all_tags()? {
        println!("{tag}");
    }
    Ok(())
}

pub fn list_categories(loader: &ContentLoader) -> Result<()> {
    for category in loader.all_categories()? {
        println!("{category}");
    }
    Ok(())
}

pub fn list_projects(loader: &ContentLoader, featured: bool, json: bool) -> Result<()> {
    let projects = if featured {
        loader.featured_projects()?
    } else {
        loader.ensure_projects()?.to_vec()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }
    for project in &projects {
        let status = project.status.as_deref().unwrap_or("-");
        println!(
            "{:<24} {:<10} {} ({})",
            project.title,
            status,
            project.technologies.join(", "),
            project.repository().unwrap_or("no repository")
        );
    }
    Ok(())
}

pub fn show_profile(loader: &ContentLoader, json_ld: bool, config: &SiteConfig) -> Result<()> {
    let profile = loader.ensure_profile()?;

    if json_ld {
        let ld = structured_data(StructuredData::Person(&profile), &config.site);
        println!("{}", serde_json::to_string_pretty(&ld)?);
        return Ok(());
    }

    println!("{} - {}", profile.name, profile.title);
    if !profile.bio.is_empty() {
        println!("{}", profile.bio);
    }
    if let Some(location) = &profile.location {
        println!("location: {location}");
    }
    for link in profile.social.links() {
        println!("link: {link}");
    }
    for skill in &profile.skills {
        println!("skill: {} ({})", skill.name, skill.level);
    }
    Ok(())
}

pub fn show_site(head: bool, json_ld: bool, config: &SiteConfig) -> Result<()> {
    if json_ld {
        let ld = structured_data(StructuredData::Website, &config.site);
        println!("{}", serde_json::to_string_pretty(&ld)?);
        return Ok(());
    }

    let seo = page_head(&SeoOptions::default(), config);
    if head {
        println!("{}", seo.to_html()?);
        return Ok(());
    }
    println!("title: {}", seo.title);
    println!("url: {}", seo.url);
    println!("description: {}", seo.description);
    println!("keywords: {}", seo.keywords);
    println!("image: {}", seo.image);
    if let Some(feed) = &seo.feed {
        println!("feed: {feed}");
    }
    Ok(())
}

pub fn generate_feed(
    loader: &ContentLoader,
    output: Option<&Path>,
    config: &SiteConfig,
) -> Result<()> {
    let articles = loader.ensure_articles()?;
    let feed = match output {
        Some(path) => FeedConfig {
            path: path.to_path_buf(),
            ..config.feed.clone()
        },
        None => config.feed.clone(),
    };
    feed::write_feed(&articles, &config.site, &feed)
}

struct ArticleStats {
    slug: String,
    declared: u32,
    computed: Option<u32>,
    headings: usize,
}

pub fn stats(loader: &ContentLoader, config: &SiteConfig) -> Result<()> {
    let articles = loader.ensure_articles()?;
    let options = MarkdownOptions::from(&config.markdown);

    let rows: Vec<_> = articles
        .par_iter()
        .map(|article| {
            let body = loader.fetch_body(&article.slug);
            if let Err(err) = &body {
                log!("error"; "`{}`: {err}", article.slug);
            }
            let body = body.ok();
            ArticleStats {
                slug: article.slug.clone(),
                declared: article.reading_time,
                computed: body.as_deref().map(reading_time),
                headings: body.as_deref().map_or(0, |b| extract_toc(b, &options).len()),
            }
        })
        .collect();

    println!("{:<32} {:>8} {:>8} {:>8}", "slug", "declared", "computed", "headings");
    for row in &rows {
        let computed = row
            .computed
            .map_or_else(|| "-".to_owned(), |m| m.to_string());
        println!(
            "{:<32} {:>8} {:>8} {:>8}",
            row.slug, row.declared, computed, row.headings
        );
    }

    let missing = rows.iter().filter(|r| r.computed.is_none()).count();
    log!("content"; "{} articles, {} bodies missing", rows.len(), missing);
    Ok(())
}

/// Relative form for this year's dates, the long form otherwise.
fn display_date(date: &str, now: DateTime<Utc>) -> Option<String> {
    if is_this_year(date, now) {
        relative_time(date, now)
    } else {
        format_date(date)
    }
}

fn print_toc(toc: &[TocEntry]) {
    for entry in toc {
        let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
        println!("{indent}- {} (#{})", entry.title, entry.anchor);
    }
}

/// Head metadata for a page, with the feed link when `[feed].advertise` is on.
fn page_head(options: &SeoOptions, config: &SiteConfig) -> SeoHead {
    let seo = SeoHead::build(options, &config.site);
    if config.feed.advertise {
        seo.with_feed(feed_href(config))
    } else {
        seo
    }
}

/// Public URL of the feed file.
fn feed_href(config: &SiteConfig) -> String {
    let name = config
        .feed
        .path
        .file_name()
        .map_or_else(|| "feed.xml".into(), |n| n.to_string_lossy());
    config.site.absolute_url(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn articles() -> Vec<Article> {
        serde_json::from_value(json!([
            { "id": "1", "title": "A", "slug": "a", "publishDate": "2024-01-01", "tags": ["rust"], "category": "tech", "featured": true },
            { "id": "2", "title": "B", "slug": "b", "publishDate": "2024-03-01", "tags": ["rust"], "category": "life" },
            { "id": "3", "title": "C", "slug": "c", "publishDate": "2024-02-01", "tags": ["web"], "category": "tech" },
            { "id": "4", "title": "D", "slug": "d", "publishDate": "2024-04-01", "tags": ["rust", "web"], "category": "tech" },
        ]))
        .unwrap()
    }

    fn slugs(selected: &[Article]) -> Vec<String> {
        selected.iter().map(|a| a.slug.clone()).collect()
    }

    #[test]
    fn test_filter_none_keeps_order() {
        let articles = articles();
        let selected = filter_articles(&articles, &ArticleFilter::default());
        assert_eq!(slugs(&selected), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_filters_combine() {
        let articles = articles();
        let filter = ArticleFilter {
            tag: Some("rust".into()),
            category: Some("tech".into()),
            ..ArticleFilter::default()
        };
        assert_eq!(slugs(&filter_articles(&articles, &filter)), vec!["a", "d"]);

        let filter = ArticleFilter {
            tag: Some("rust".into()),
            featured: true,
            ..ArticleFilter::default()
        };
        assert_eq!(slugs(&filter_articles(&articles, &filter)), vec!["a"]);
    }

    #[test]
    fn test_recent_applies_last() {
        let articles = articles();
        let filter = ArticleFilter {
            tag: Some("rust".into()),
            recent: Some(2),
            ..ArticleFilter::default()
        };
        assert_eq!(slugs(&filter_articles(&articles, &filter)), vec!["d", "b"]);
    }

    #[test]
    fn test_display_date() {
        use chrono::TimeZone;
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(display_date("2024-06-10T12:00:00Z", now).as_deref(), Some("5 天前"));
        assert_eq!(display_date("2023-06-10", now).as_deref(), Some("2023年6月10日"));
        assert_eq!(display_date("soon", now), None);
    }

    #[test]
    fn test_feed_href() {
        let mut config = SiteConfig::default();
        config.site.url = "https://blog.example.com".into();
        config.feed.path = "public/rss.xml".into();
        assert_eq!(feed_href(&config), "https://blog.example.com/rss.xml");
    }

    #[test]
    fn test_site_head_uses_site_defaults() {
        let mut config = SiteConfig::default();
        config.site.title = "My Blog".into();
        config.site.description = "Notes".into();
        config.site.url = "https://blog.example.com".into();
        config.site.keywords = vec!["rust".into(), "vue".into()];

        let seo = page_head(&SeoOptions::default(), &config);
        assert_eq!(seo.title, "My Blog");
        assert_eq!(seo.description, "Notes");
        assert_eq!(seo.keywords, "rust,vue");
        assert_eq!(seo.url, "https://blog.example.com");
        assert_eq!(seo.feed, None);

        config.feed.advertise = true;
        let seo = page_head(&SeoOptions::default(), &config);
        assert_eq!(seo.feed.as_deref(), Some("https://blog.example.com/feed.xml"));
    }
}
