//! Link classification and liveness probing
//!
//! Anchors are split into internal and external by comparing the host as
//! written in each href with the analyzed page's host. External targets are then probed
//! with HEAD requests, concurrently up to a fixed limit.

use crate::analyzer::fetcher::Fetcher;
use crate::url::{has_scheme, same_host, written_host};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use url::Url;

/// Final link counts for one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub internal: usize,
    pub external: usize,
    pub inaccessible: usize,
}

/// Anchors partitioned against an origin, before probing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPartition {
    pub internal: usize,
    /// Resolved external targets, one entry per anchor
    pub external: Vec<Url>,
}

/// Classifies anchor hrefs against the origin URL
///
/// `origin` is the page URL as submitted; `base` is its parsed form, used
/// only to resolve relative references.
///
/// # Rules
///
/// - hrefs are trimmed, then `javascript:` and `mailto:` hrefs are skipped
/// - hrefs that do not parse as a URL reference are skipped
/// - relative references inherit the origin host → internal
/// - absolute and protocol-relative hrefs are internal only when their
///   host, as written, equals the origin host as written
/// - anything else, including schemes without a host (`tel:`) → external
///
/// Skipped hrefs count toward neither total. Host comparison is exact and
/// case-sensitive; subdomains are external.
///
/// # Example
///
/// ```
/// use page_analyzer::analyzer::classify_links;
/// use url::Url;
///
/// let origin = "https://example.com";
/// let base = Url::parse(origin).unwrap();
/// let partition = classify_links(
///     ["/internal", "https://other.org/", "mailto:a@b.c"],
///     origin,
///     &base,
/// );
/// assert_eq!(partition.internal, 1);
/// assert_eq!(partition.external.len(), 1);
/// ```
pub fn classify_links<'a, I>(hrefs: I, origin: &str, base: &Url) -> LinkPartition
where
    I: IntoIterator<Item = &'a str>,
{
    let mut partition = LinkPartition::default();

    for href in hrefs {
        let href = href.trim();
        if href.starts_with("javascript:") || href.starts_with("mailto:") {
            continue;
        }

        let resolved = match base.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(href, error = %e, "Skipping unparseable link");
                continue;
            }
        };

        let internal = if written_host(href).is_some() {
            same_host(href, origin)
        } else {
            !has_scheme(href)
        };

        if internal {
            partition.internal += 1;
        } else {
            partition.external.push(resolved);
        }
    }

    partition
}

/// Probes external links and counts the ones that are not accessible
///
/// Each distinct target is probed once, at most `concurrency` at a time,
/// rather than once per anchor; a target that fails counts once per anchor
/// pointing at it. The result does not depend on the order probes
/// complete in.
pub async fn count_inaccessible(fetcher: &Fetcher, external: &[Url], concurrency: usize) -> usize {
    let mut anchors_per_target: HashMap<Url, usize> = HashMap::new();
    for url in external {
        *anchors_per_target.entry(url.clone()).or_insert(0) += 1;
    }

    stream::iter(anchors_per_target)
        .map(|(url, anchors)| async move {
            if fetcher.probe(&url).await {
                0
            } else {
                anchors
            }
        })
        .buffer_unordered(concurrency.max(1))
        .fold(0, |total, failed| async move { total + failed })
        .await
}

/// Classifies all anchors and probes the external ones
pub async fn check_links(
    fetcher: &Fetcher,
    hrefs: &[String],
    origin: &str,
    base: &Url,
    concurrency: usize,
) -> LinkSummary {
    let partition = classify_links(hrefs.iter().map(String::as_str), origin, base);
    let inaccessible = count_inaccessible(fetcher, &partition.external, concurrency).await;

    tracing::debug!(
        internal = partition.internal,
        external = partition.external.len(),
        inaccessible,
        "Link check complete"
    );

    LinkSummary {
        internal: partition.internal,
        external: partition.external.len(),
        inaccessible,
    }
}
