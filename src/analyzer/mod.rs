//! Page analysis pipeline
//!
//! This module contains the core analysis logic:
//! - Fetching the page with a bounded timeout
//! - Parsing the body into a queryable document
//! - Running the structural extractors
//! - Classifying links and probing external ones
//! - Assembling the final report

mod document;
mod extract;
mod fetcher;
mod links;
mod result;

pub use document::{Document, FetchedDocument, PageBody};
pub use extract::{
    anchor_hrefs, extract_facets, has_login_form, headings, html_version, title, PageFacets,
};
pub use fetcher::{build_http_client, status_description, transport_error_kind, Fetcher};
pub use links::{check_links, classify_links, count_inaccessible, LinkPartition, LinkSummary};
pub use result::{AnalysisResult, HtmlVersion};

use crate::config::Config;
use crate::url::{with_default_scheme, NormalizedUrl};
use crate::{AnalysisError, UrlError};
use chrono::Utc;
use url::Url;

/// Runs page analyses
///
/// One instance is shared by every request; it holds no per-analysis
/// state, so concurrent analyses do not interact.
#[derive(Debug, Clone)]
pub struct Analyzer {
    fetcher: Fetcher,
    max_concurrent_probes: usize,
}

impl Analyzer {
    /// Creates an analyzer from configuration
    ///
    /// # Example
    ///
    /// ```
    /// use page_analyzer::{Analyzer, Config};
    ///
    /// let analyzer = Analyzer::new(&Config::default()).unwrap();
    /// ```
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let fetcher = Fetcher::new(&config.analyzer, &config.user_agent)?;
        Ok(Self::with_fetcher(
            fetcher,
            config.analyzer.max_concurrent_probes,
        ))
    }

    /// Creates an analyzer around an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, max_concurrent_probes: usize) -> Self {
        Self {
            fetcher,
            max_concurrent_probes,
        }
    }

    /// Analyzes a URL that already passed validation
    pub async fn analyze(&self, url: &NormalizedUrl) -> Result<AnalysisResult, AnalysisError> {
        self.run(url.as_str(), url.as_url()).await
    }

    /// Analyzes a raw URL string
    ///
    /// `https://` is prepended when the string has no `http://` or
    /// `https://` prefix. Only URL parsing is applied, not the strict shape
    /// check of [`crate::url::validate_url`]; callers facing user input
    /// should validate first and use [`Analyzer::analyze`].
    pub async fn analyze_url(&self, raw: &str) -> Result<AnalysisResult, AnalysisError> {
        let url_str = with_default_scheme(raw.trim());
        let url = Url::parse(&url_str).map_err(|e| match e {
            url::ParseError::EmptyHost => AnalysisError::InvalidUrl(UrlError::MissingHost),
            other => AnalysisError::InvalidUrl(UrlError::Parse(other.to_string())),
        })?;

        self.run(&url_str, &url).await
    }

    /// Fetch, parse, extract, probe, assemble
    ///
    /// The parsed document lives only inside the synchronous extraction
    /// step; link probing runs on the extracted hrefs.
    async fn run(&self, url_str: &str, url: &Url) -> Result<AnalysisResult, AnalysisError> {
        tracing::info!(url = url_str, "Starting URL analysis");

        let response = self.fetcher.fetch_page(url).await?;
        let page = PageBody::read(response).await?;

        let facets = {
            let fetched = FetchedDocument::parse(&page);
            extract_facets(&fetched)
        };

        let links = check_links(
            &self.fetcher,
            &facets.hrefs,
            url_str,
            url,
            self.max_concurrent_probes,
        )
        .await;

        let result = AnalysisResult {
            url: url_str.to_string(),
            html_version: facets.html_version,
            title: facets.title,
            headings: facets.headings,
            internal_links: links.internal,
            external_links: links.external,
            inaccessible_links: links.inaccessible,
            has_login_form: facets.has_login_form,
            analysis_time: Utc::now(),
        };

        tracing::info!(
            url = url_str,
            html_version = %result.html_version,
            internal_links = result.internal_links,
            external_links = result.external_links,
            inaccessible_links = result.inaccessible_links,
            has_login_form = result.has_login_form,
            "URL analysis complete"
        );

        Ok(result)
    }
}
