//! Article extraction from fetched page content
//!
//! This module turns raw HTML into a structured [`Article`]: headline,
//! publication date, category, body paragraphs, and the outbound article
//! links that feed the next crawl level. Every failure here is a per-page
//! condition; the crawl continues with the remaining URLs.

use crate::url::{is_article_href, normalize};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use scraper::{Html, Selector};
use serde_json::json;
use thiserror::Error;
use url::Url;

/// Accepted formats for the `datetime` attribute of the page's time element
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%SZ",
];

/// A structured news article extracted from one fetched page
///
/// Produced once per successfully fetched and parsed URL; immutable after
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// Normalized URL the article was fetched from
    pub url: Url,

    /// Headline text
    pub title: String,

    /// Publication timestamp, UTC
    pub published: DateTime<Utc>,

    /// Section the article belongs to (e.g. "Politics")
    pub category: String,

    /// Body paragraphs in document order
    pub paragraphs: Vec<String>,

    /// Normalized outbound article links, in document order
    pub related: Vec<Url>,
}

impl Article {
    /// The stored JSON representation of this article
    ///
    /// Related links are crawl metadata and are not persisted.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "url": self.url.as_str(),
            "title": self.title,
            "date_published": self.published.to_rfc3339(),
            "category": self.category,
            "paragraphs": self.paragraphs,
        })
    }
}

/// Reasons a fetched page could not be turned into an [`Article`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no headline found")]
    MissingTitle,

    #[error("no publication date found")]
    MissingDate,

    #[error("unrecognized date format: {0}")]
    UnrecognizedDate(String),

    #[error("no category metadata found")]
    MissingCategory,

    #[error("no article body found")]
    MissingBody,
}

/// Extracts a structured article from fetched page content
///
/// # Required fields
///
/// * headline: first `<h1>`
/// * publication date: `datetime` attribute of the first `<time>` carrying
///   one, parsed against the accepted format list
/// * category: `<meta property="article:section">`
/// * body container: an `<article>` element (its text-block paragraphs may
///   legitimately be empty)
///
/// Outbound links are read from every `<a href>`, filtered through the
/// article-path predicate, and normalized against the page URL; links that
/// fail either step are dropped silently.
///
/// # Arguments
///
/// * `html` - The fetched page content
/// * `url` - The normalized URL the page was fetched from
pub fn extract_article(html: &str, url: &Url) -> Result<Article, ExtractError> {
    let document = Html::parse_document(html);

    let title = first_text(&document, "h1").ok_or(ExtractError::MissingTitle)?;

    let raw_date =
        first_attr(&document, "time[datetime]", "datetime").ok_or(ExtractError::MissingDate)?;
    let published =
        parse_published(&raw_date).ok_or(ExtractError::UnrecognizedDate(raw_date))?;

    let category = first_attr(&document, r#"meta[property="article:section"]"#, "content")
        .ok_or(ExtractError::MissingCategory)?;

    let paragraphs = extract_paragraphs(&document)?;
    let related = extract_related(&document, url);

    Ok(Article {
        url: url.clone(),
        title,
        published,
        category,
        paragraphs,
        related,
    })
}

/// Text content of the first element matching the selector, trimmed
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Attribute value of the first element matching the selector
fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.to_string())
}

/// Parses a publication timestamp against the accepted format list
fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    for format in DATE_FORMATS {
        if let Ok(with_offset) = DateTime::parse_from_str(raw, format) {
            return Some(with_offset.with_timezone(&Utc));
        }
        // Formats without an offset are taken as UTC
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Collects the text-block paragraphs inside the article body
fn extract_paragraphs(document: &Html) -> Result<Vec<String>, ExtractError> {
    let body_selector = Selector::parse("article").map_err(|_| ExtractError::MissingBody)?;
    let body = document
        .select(&body_selector)
        .next()
        .ok_or(ExtractError::MissingBody)?;

    let mut paragraphs = Vec::new();
    if let Ok(block_selector) = Selector::parse(r#"div[data-component="text-block"]"#) {
        for block in body.select(&block_selector) {
            let text = block.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs)
}

/// Collects, filters, and normalizes the page's outbound article links
fn extract_related(document: &Html, base: &Url) -> Vec<Url> {
    let mut related = Vec::new();

    if let Ok(anchor_selector) = Selector::parse("a[href]") {
        for element in document.select(&anchor_selector) {
            if let Some(href) = element.value().attr("href") {
                if !is_article_href(href) {
                    continue;
                }

                match normalize(href, Some(base)) {
                    Ok(link) => related.push(link),
                    Err(e) => {
                        tracing::debug!("Dropping unnormalizable link {}: {}", href, e);
                    }
                }
            }
        }
    }

    related
}
