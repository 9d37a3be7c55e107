//! Derived views over loaded content.
//!
//! Everything here borrows the input slice and returns references in a new
//! `Vec`, so the cached list is never reordered.

use super::types::{Article, Project};
use crate::utils::date::parse_date;
use std::{cmp::Reverse, collections::HashSet};

pub fn featured(articles: &[Article]) -> Vec<&Article> {
    articles.iter().filter(|a| a.featured).collect()
}

pub fn featured_projects(projects: &[Project]) -> Vec<&Project> {
    projects.iter().filter(|p| p.featured).collect()
}

/// The `n` newest articles by publish date.
///
/// Ties keep their original order; missing or unparseable dates sort last.
pub fn recent(articles: &[Article], n: usize) -> Vec<&Article> {
    let mut sorted: Vec<_> = articles.iter().collect();
    sorted.sort_by_key(|a| {
        let date = a.published().and_then(parse_date);
        (date.is_none(), Reverse(date))
    });
    sorted.truncate(n);
    sorted
}

pub fn by_category<'a>(articles: &'a [Article], category: &str) -> Vec<&'a Article> {
    articles.iter().filter(|a| a.category == category).collect()
}

pub fn by_tag<'a>(articles: &'a [Article], tag: &str) -> Vec<&'a Article> {
    articles
        .iter()
        .filter(|a| a.tags.iter().any(|t| t == tag))
        .collect()
}

/// Case-insensitive substring search over title, excerpt and tags.
pub fn search<'a>(articles: &'a [Article], query: &str) -> Vec<&'a Article> {
    let query = query.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&query);

    articles
        .iter()
        .filter(|a| hit(&a.title) || hit(&a.excerpt) || a.tags.iter().any(|t| hit(t)))
        .collect()
}

/// Distinct tags in first-seen order.
pub fn all_tags(articles: &[Article]) -> Vec<&str> {
    distinct(articles.iter().flat_map(|a| a.tags.iter().map(String::as_str)))
}

/// Distinct categories in first-seen order.
pub fn all_categories(articles: &[Article]) -> Vec<&str> {
    distinct(articles.iter().map(|a| a.category.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}
