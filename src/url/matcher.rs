use regex::Regex;
use std::sync::LazyLock;

/// Path shape of a news article link: a `/news/` segment followed by a slug
/// carrying a numeric story id, e.g. `/news/uk-politics-50874389`.
static ARTICLE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/news/.+-\d+.").expect("hardcoded regex pattern is valid"));

/// Returns true if a raw href points at a news article
///
/// This is a structural predicate on the link itself; it accepts both relative
/// (`/news/...`) and absolute (`https://host/news/...`) forms and involves no
/// network or domain knowledge. Section indexes (`/news/politics`), live pages,
/// and everything outside `/news/` are rejected.
pub fn is_article_href(href: &str) -> bool {
    ARTICLE_PATH.is_match(href)
}
