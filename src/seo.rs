//! Page metadata: `<title>`, Open Graph/Twitter meta tags and JSON-LD.
//!
//! Anything not set on [`SeoOptions`] falls back to the `[site]` config.

use crate::{
    config::SiteInfo,
    content::{Article, Profile},
};
use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::io::Cursor;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeoKind {
    #[default]
    Website,
    Article,
}

impl SeoKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
        }
    }
}

/// Per-page metadata. `None` means "use the site default".
#[derive(Debug, Clone, Default)]
pub struct SeoOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Comma-separated keyword list
    pub keywords: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub kind: SeoKind,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub author: Option<String>,
    pub section: Option<String>,
    pub tags: Vec<String>,
}

impl SeoOptions {
    /// Options for an article page at `/blog/{slug}`.
    pub fn for_article(article: &Article) -> Self {
        Self {
            title: Some(article.title.clone()),
            description: Some(article.excerpt.clone()).filter(|s| !s.is_empty()),
            keywords: Some(article.tags.join(",")).filter(|s| !s.is_empty()),
            image: article.cover().map(str::to_owned),
            url: Some(format!("/blog/{}", article.slug)),
            kind: SeoKind::Article,
            published_time: article.published().map(str::to_owned),
            modified_time: article.updated().map(str::to_owned),
            author: None,
            section: Some(article.category.clone()).filter(|s| !s.is_empty()),
            tags: article.tags.clone(),
        }
    }
}

/// Whether a meta tag is keyed by `name=` or `property=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttr {
    Name,
    Property,
}

impl MetaAttr {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Property => "property",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub attr: MetaAttr,
    pub key: String,
    pub content: String,
}

impl MetaTag {
    fn name(key: &str, content: &str) -> Self {
        Self {
            attr: MetaAttr::Name,
            key: key.to_owned(),
            content: content.to_owned(),
        }
    }

    fn property(key: &str, content: &str) -> Self {
        Self {
            attr: MetaAttr::Property,
            key: key.to_owned(),
            content: content.to_owned(),
        }
    }
}

/// Resolved head metadata for one page.
#[derive(Debug, Clone)]
pub struct SeoHead {
    pub title: String,
    pub description: String,
    pub keywords: String,
    /// Absolute image URL
    pub image: String,
    /// Absolute page URL
    pub url: String,
    pub meta: Vec<MetaTag>,
    /// RSS link advertised in the head
    pub feed: Option<String>,
}

impl SeoHead {
    pub fn build(options: &SeoOptions, site: &SiteInfo) -> Self {
        let title = match options.title.as_deref() {
            None => site.title.clone(),
            Some(title) if title == site.title => site.title.clone(),
            Some(title) => format!("{title} - {}", site.title),
        };
        let description = options
            .description
            .clone()
            .unwrap_or_else(|| site.description.clone());
        let keywords = options
            .keywords
            .clone()
            .unwrap_or_else(|| site.keywords.join(","));
        let author = options.author.as_deref().unwrap_or(&site.author);
        let image = site.absolute_url(options.image.as_deref().unwrap_or(&site.image));
        let url = match options.url.as_deref() {
            Some(url) => site.absolute_url(url),
            None => site.base_url().to_owned(),
        };

        let mut meta = vec![
            MetaTag::name("description", &description),
            MetaTag::name("keywords", &keywords),
            MetaTag::name("author", author),
            MetaTag::property("og:type", options.kind.as_str()),
            MetaTag::property("og:title", &title),
            MetaTag::property("og:description", &description),
            MetaTag::property("og:image", &image),
            MetaTag::property("og:url", &url),
            MetaTag::property("og:site_name", &site.title),
            MetaTag::name("twitter:card", "summary_large_image"),
            MetaTag::name("twitter:title", &title),
            MetaTag::name("twitter:description", &description),
            MetaTag::name("twitter:image", &image),
        ];

        if options.kind == SeoKind::Article {
            let optional = [
                ("article:published_time", options.published_time.as_deref()),
                ("article:modified_time", options.modified_time.as_deref()),
                ("article:author", Some(author).filter(|a| !a.is_empty())),
                ("article:section", options.section.as_deref()),
            ];
            for (key, value) in optional {
                meta.extend(value.map(|value| MetaTag::property(key, value)));
            }
            for tag in &options.tags {
                meta.push(MetaTag::property("article:tag", tag));
            }
        }

        Self {
            title,
            description,
            keywords,
            image,
            url,
            meta,
            feed: None,
        }
    }

    /// Advertise an RSS feed at `href`.
    pub fn with_feed(mut self, href: String) -> Self {
        self.feed = Some(href);
        self
    }

    /// Content of the first meta tag with `key`.
    #[allow(unused)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.content.as_str())
    }

    /// Serialize as `<head>` children, one element per line.
    pub fn to_html(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 0);

        write_text_element(&mut writer, "title", &self.title)?;
        for tag in &self.meta {
            write_empty_elem(
                &mut writer,
                "meta",
                &[(tag.attr.as_str(), &tag.key), ("content", &tag.content)],
            )?;
        }
        if let Some(feed) = &self.feed {
            write_empty_elem(
                &mut writer,
                "link",
                &[
                    ("rel", "alternate"),
                    ("type", "application/rss+xml"),
                    ("href", feed),
                ],
            )?;
        }

        Ok(String::from_utf8(writer.into_inner().into_inner())?)
    }
}

fn write_text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_empty_elem(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// Subject of a schema.org JSON-LD document.
#[derive(Debug, Clone, Copy)]
pub enum StructuredData<'a> {
    Website,
    Article(&'a Article),
    Person(&'a Profile),
}

/// Build the schema.org JSON-LD object for `data`.
pub fn structured_data(data: StructuredData<'_>, site: &SiteInfo) -> Value {
    let base = site.base_url();
    let owner = json!({
        "@type": "Person",
        "name": site.author,
        "url": base,
    });

    match data {
        StructuredData::Website => json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "name": site.title,
            "description": site.description,
            "url": base,
            "author": owner,
        }),
        StructuredData::Article(article) => {
            let published = article.published();
            json!({
                "@context": "https://schema.org",
                "@type": "BlogPosting",
                "headline": article.title,
                "description": article.excerpt,
                "image": site.absolute_url(article.cover().unwrap_or(&site.image)),
                "datePublished": published,
                "dateModified": article.updated().or(published),
                "author": owner,
                "publisher": owner,
                "mainEntityOfPage": {
                    "@type": "WebPage",
                    "@id": format!("{base}/blog/{}", article.slug),
                },
                "keywords": article.tags.join(", "),
                "articleSection": article.category,
            })
        }
        StructuredData::Person(profile) => {
            let schools: Vec<_> = profile
                .education
                .iter()
                .map(|edu| json!({ "@type": "EducationalOrganization", "name": edu.school }))
                .collect();
            let employers: Vec<_> = profile
                .experience
                .iter()
                .map(|exp| json!({ "@type": "Organization", "name": exp.company }))
                .collect();

            let mut person = json!({
                "@context": "https://schema.org",
                "@type": "Person",
                "name": profile.name,
                "jobTitle": profile.title,
                "description": profile.bio,
                "url": base,
                "sameAs": profile.social.links(),
                "knowsAbout": profile.expertise,
                "alumniOf": schools,
                "worksFor": employers,
            });
            if !profile.avatar.is_empty() {
                person["image"] = json!(site.absolute_url(&profile.avatar));
            }
            person
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteInfo {
        SiteInfo {
            title: "My Blog".into(),
            description: "Default description".into(),
            author: "Alice".into(),
            url: "https://blog.example.com/".into(),
            keywords: vec!["rust".into(), "web".into()],
            ..SiteInfo::default()
        }
    }

    fn article() -> Article {
        serde_json::from_value(json!({
            "id": "1",
            "title": "Hello",
            "slug": "hello",
            "excerpt": "First post",
            "publishDate": "2024-01-15",
            "updateDate": "2024-02-01",
            "category": "tech",
            "tags": ["rust", "cli"],
            "coverImage": "/images/hello.png",
        }))
        .unwrap()
    }

    #[test]
    fn test_full_title_rule() {
        let site = site();
        let head = SeoHead::build(&SeoOptions::default(), &site);
        assert_eq!(head.title, "My Blog");

        let same = SeoOptions {
            title: Some("My Blog".into()),
            ..SeoOptions::default()
        };
        assert_eq!(SeoHead::build(&same, &site).title, "My Blog");

        let page = SeoOptions {
            title: Some("About".into()),
            ..SeoOptions::default()
        };
        assert_eq!(SeoHead::build(&page, &site).title, "About - My Blog");
    }

    #[test]
    fn test_defaults_and_absolute_urls() {
        let head = SeoHead::build(&SeoOptions::default(), &site());
        assert_eq!(head.description, "Default description");
        assert_eq!(head.keywords, "rust,web");
        assert_eq!(head.url, "https://blog.example.com");
        assert_eq!(head.image, "https://blog.example.com/images/og-image.jpg");

        let options = SeoOptions {
            image: Some("https://cdn.example.com/x.png".into()),
            url: Some("/about".into()),
            ..SeoOptions::default()
        };
        let head = SeoHead::build(&options, &site());
        assert_eq!(head.image, "https://cdn.example.com/x.png");
        assert_eq!(head.url, "https://blog.example.com/about");
    }

    #[test]
    fn test_meta_order_for_website() {
        let head = SeoHead::build(&SeoOptions::default(), &site());
        let keys: Vec<_> = head.meta.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "description",
                "keywords",
                "author",
                "og:type",
                "og:title",
                "og:description",
                "og:image",
                "og:url",
                "og:site_name",
                "twitter:card",
                "twitter:title",
                "twitter:description",
                "twitter:image",
            ]
        );
        assert_eq!(head.get("og:type"), Some("website"));
        assert_eq!(head.get("twitter:card"), Some("summary_large_image"));
        assert_eq!(head.meta[3].attr, MetaAttr::Property);
        assert_eq!(head.meta[9].attr, MetaAttr::Name);
    }

    #[test]
    fn test_article_meta() {
        let head = SeoHead::build(&SeoOptions::for_article(&article()), &site());

        assert_eq!(head.title, "Hello - My Blog");
        assert_eq!(head.url, "https://blog.example.com/blog/hello");
        assert_eq!(head.image, "https://blog.example.com/images/hello.png");
        assert_eq!(head.get("og:type"), Some("article"));
        assert_eq!(head.get("article:published_time"), Some("2024-01-15"));
        assert_eq!(head.get("article:modified_time"), Some("2024-02-01"));
        assert_eq!(head.get("article:author"), Some("Alice"));
        assert_eq!(head.get("article:section"), Some("tech"));

        let tags: Vec<_> = head
            .meta
            .iter()
            .filter(|m| m.key == "article:tag")
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(tags, vec!["rust", "cli"]);
    }

    #[test]
    fn test_article_tags_only_for_article_kind() {
        let options = SeoOptions {
            published_time: Some("2024-01-01".into()),
            tags: vec!["rust".into()],
            ..SeoOptions::default()
        };
        let head = SeoHead::build(&options, &site());
        assert!(head.meta.iter().all(|m| !m.key.starts_with("article:")));
    }

    #[test]
    fn test_to_html_escapes() {
        let options = SeoOptions {
            title: Some("Tom & Jerry <3".into()),
            description: Some("say \"hi\"".into()),
            ..SeoOptions::default()
        };
        let html = SeoHead::build(&options, &site())
            .with_feed("https://blog.example.com/feed.xml".into())
            .to_html()
            .unwrap();

        assert!(html.starts_with("<title>Tom &amp; Jerry &lt;3 - My Blog</title>"));
        assert!(html.contains(r#"<meta name="description" content="say &quot;hi&quot;"/>"#));
        assert!(html.contains(r#"<meta property="og:site_name" content="My Blog"/>"#));
        assert!(html.contains(r#"href="https://blog.example.com/feed.xml""#));
        assert_eq!(html.matches("<meta ").count(), 13);
    }

    #[test]
    fn test_structured_data_website() {
        let value = structured_data(StructuredData::Website, &site());
        assert_eq!(value["@type"], "WebSite");
        assert_eq!(value["url"], "https://blog.example.com");
        assert_eq!(value["author"]["name"], "Alice");
    }

    #[test]
    fn test_structured_data_article() {
        let article = article();
        let value = structured_data(StructuredData::Article(&article), &site());
        assert_eq!(value["@type"], "BlogPosting");
        assert_eq!(value["headline"], "Hello");
        assert_eq!(value["image"], "https://blog.example.com/images/hello.png");
        assert_eq!(value["datePublished"], "2024-01-15");
        assert_eq!(value["dateModified"], "2024-02-01");
        assert_eq!(value["mainEntityOfPage"]["@id"], "https://blog.example.com/blog/hello");
        assert_eq!(value["keywords"], "rust, cli");
        assert_eq!(value["articleSection"], "tech");
    }

    #[test]
    fn test_structured_data_article_modified_falls_back() {
        let mut article = article();
        article.update_date = None;
        article.image = None;
        article.cover_image = None;
        let value = structured_data(StructuredData::Article(&article), &site());
        assert_eq!(value["dateModified"], "2024-01-15");
        assert_eq!(value["image"], "https://blog.example.com/images/og-image.jpg");
    }

    #[test]
    fn test_structured_data_person() {
        let profile: Profile = serde_json::from_value(json!({
            "name": "Alice",
            "title": "Engineer",
            "bio": "Writes code",
            "avatar": "/avatar.png",
            "social": { "github": "https://github.com/alice" },
            "expertise": ["Rust"],
            "education": [{ "school": "MIT", "degree": "BSc" }],
            "experience": [{ "company": "Acme", "position": "Dev" }],
        }))
        .unwrap();
        let value = structured_data(StructuredData::Person(&profile), &site());

        assert_eq!(value["@type"], "Person");
        assert_eq!(value["jobTitle"], "Engineer");
        assert_eq!(value["image"], "https://blog.example.com/avatar.png");
        assert_eq!(value["sameAs"], json!(["https://github.com/alice"]));
        assert_eq!(value["alumniOf"][0]["name"], "MIT");
        assert_eq!(value["worksFor"][0]["name"], "Acme");
    }
}
