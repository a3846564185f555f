use crate::{UrlError, UrlResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use url::Url;

/// Scheme prepended to input that carries neither `http://` nor `https://`
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Accepted URL shape: scheme, dotted host ending in an alphabetic label of
/// at least two characters, optional port, optional path and query.
///
/// This is a syntactic TLD check only; no registry is consulted.
static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}(?::[0-9]{1,5})?(?:/[A-Za-z0-9\-._~%!$&'()*+,;=:@/]*)?(?:\?[A-Za-z0-9\-._~%!$&'()*+,;=:@/?]*)?$",
    )
    .expect("URL shape pattern is valid")
});

/// An absolute `http`/`https` URL that passed the strict shape check
///
/// The only way to obtain one is [`validate_url`], so holding a
/// `NormalizedUrl` means no further syntactic checks are needed before
/// fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    raw: String,
    url: Url,
}

impl NormalizedUrl {
    /// The URL string as submitted, after scheme defaulting
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Prepends `https://` unless the input already starts with `http://` or
/// `https://`
///
/// The prefix check is case-sensitive.
///
/// # Examples
///
/// ```
/// use page_analyzer::url::with_default_scheme;
///
/// assert_eq!(with_default_scheme("example.com"), "https://example.com");
/// assert_eq!(with_default_scheme("http://example.com"), "http://example.com");
/// ```
pub fn with_default_scheme(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{raw}")
    }
}

/// Validates a user-supplied URL string
///
/// # Validation Steps
///
/// 1. Trim whitespace; reject if empty
/// 2. Reject an explicit scheme other than `http`/`https`
/// 3. Prepend `https://` when no scheme is present
/// 4. Parse; reject if the host is empty
/// 5. Match against the accepted URL shape
///
/// No network I/O happens here.
///
/// # Examples
///
/// ```
/// use page_analyzer::url::validate_url;
///
/// let url = validate_url("example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com");
///
/// assert!(validate_url("ftp://example.com").is_err());
/// assert!(validate_url("https://example.com/<script>").is_err());
/// ```
pub fn validate_url(raw: &str) -> UrlResult<NormalizedUrl> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    if let Some((scheme, _)) = trimmed.split_once("://") {
        let looks_like_scheme = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if looks_like_scheme && scheme != "http" && scheme != "https" {
            return Err(UrlError::InvalidScheme(scheme.to_string()));
        }
    }

    let candidate = with_default_scheme(trimmed);

    let url = Url::parse(&candidate).map_err(|e| match e {
        url::ParseError::EmptyHost => UrlError::MissingHost,
        other => UrlError::Parse(other.to_string()),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    if !URL_SHAPE.is_match(&candidate) {
        return Err(UrlError::Malformed(candidate));
    }

    Ok(NormalizedUrl {
        raw: candidate,
        url,
    })
}
