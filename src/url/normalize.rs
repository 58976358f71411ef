use crate::UrlError;
use url::Url;

/// Mirror hosts collapsed to one canonical host during normalization
///
/// Two URLs that differ only in one of these aliases are the same page as far
/// as the visited set is concerned.
const HOST_ALIASES: &[(&str, &str)] = &[("www.bbc.com", "www.bbc.co.uk")];

/// Normalizes a raw link into the canonical URL identity used for dedup
///
/// # Normalization Steps
///
/// 1. Resolve relative links (leading `/`) against `base`'s scheme and host
/// 2. Parse; reject if malformed
/// 3. Force http to https
/// 4. Collapse known mirror hosts to their canonical host
/// 5. Strip the query string and fragment; scheme, host, and path remain
///
/// The function is pure and idempotent: normalizing an already-normalized URL
/// returns it unchanged.
///
/// # Arguments
///
/// * `raw` - The link as found in a page or seed list
/// * `base` - The URL of the page the link was found on, for relative links
///
/// # Examples
///
/// ```
/// use newsreel::url::normalize;
///
/// let url = normalize("http://www.bbc.com/news/uk-politics-50874389?at_medium=custom", None).unwrap();
/// assert_eq!(url.as_str(), "https://www.bbc.co.uk/news/uk-politics-50874389");
/// ```
pub fn normalize(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let mut url = if raw.starts_with('/') {
        let base = base.ok_or_else(|| UrlError::RelativeWithoutBase(raw.to_string()))?;
        base.join(raw).map_err(|e| UrlError::Parse(e.to_string()))?
    } else {
        Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?
    };

    match url.scheme() {
        "https" => {}
        "http" => {
            url.set_scheme("https")
                .map_err(|_| UrlError::InvalidScheme("http".to_string()))?;
        }
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?;
    if let Some(canonical) = canonical_host(host) {
        url.set_host(Some(canonical))
            .map_err(|e| UrlError::Parse(e.to_string()))?;
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Looks up the canonical form of a known mirror host
fn canonical_host(host: &str) -> Option<&'static str> {
    HOST_ALIASES
        .iter()
        .find(|(alias, _)| *alias == host)
        .map(|(_, canonical)| *canonical)
}
