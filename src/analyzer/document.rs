//! Document Model: the parsed HTML of a fetched page
//!
//! The parse tree is not `Send`, so a [`FetchedDocument`] is built and
//! consumed inside synchronous code and never held across an `.await`.

use crate::AnalysisError;
use reqwest::Response;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Response body of a successful page fetch, read but not yet parsed
#[derive(Debug, Clone)]
pub struct PageBody {
    /// Effective URL after any redirects the client followed
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Decoded body text
    pub body: String,
}

impl PageBody {
    /// Reads the body of a successful page response
    ///
    /// A body that cannot be read or decoded is a parse failure: the page
    /// answered, but its content cannot be interpreted as HTML.
    pub async fn read(response: Response) -> Result<Self, AnalysisError> {
        let final_url = response.url().clone();
        let status_code = response.status().as_u16();

        let body = response.text().await.map_err(|e| {
            tracing::error!(url = %final_url, error = %e, "Failed to parse HTML");
            AnalysisError::Parse {
                url: final_url.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            final_url,
            status_code,
            body,
        })
    }
}

/// A parsed page tagged with its effective URL and status
pub struct FetchedDocument {
    pub final_url: Url,
    pub status_code: u16,
    pub document: Document,
}

impl FetchedDocument {
    /// Parses a page body into a queryable document
    pub fn parse(page: &PageBody) -> Self {
        Self {
            final_url: page.final_url.clone(),
            status_code: page.status_code,
            document: Document::parse(&page.body),
        }
    }
}

/// Queryable HTML parse tree
///
/// Lookups take CSS selectors. An invalid selector matches nothing.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses an HTML document
    ///
    /// Parsing is lenient: malformed markup is repaired the way browsers
    /// repair it, so this never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use page_analyzer::analyzer::Document;
    ///
    /// let doc = Document::parse("<html><body><h1>a</h1><h1>b</h1></body></html>");
    /// assert_eq!(doc.count("h1"), 2);
    /// ```
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements matching the selector, in document order
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(css) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// First element matching the selector
    pub fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = parse_selector(css)?;
        self.html.select(&selector).next()
    }

    /// Number of elements matching the selector
    pub fn count(&self, css: &str) -> usize {
        match parse_selector(css) {
            Some(selector) => self.html.select(&selector).count(),
            None => 0,
        }
    }

    /// Returns true if at least one element matches the selector
    pub fn contains(&self, css: &str) -> bool {
        self.first(css).is_some()
    }
}

/// Returns true if any descendant of `element` matches the selector
pub fn element_contains(element: &ElementRef<'_>, css: &str) -> bool {
    match parse_selector(css) {
        Some(selector) => element.select(&selector).next().is_some(),
        None => false,
    }
}

/// Trimmed text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!(selector = css, error = ?e, "Invalid CSS selector");
            None
        }
    }
}
