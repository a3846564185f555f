//! Structural extractors
//!
//! Each extractor is a read-only function over a parsed [`Document`]. They
//! share no state and can run in any order.
//!
//! The version and login-form checks are deliberately loose pattern
//! matches. Their rules and priority order are part of the report format
//! and must not be tightened.

use crate::analyzer::document::{element_contains, element_text, Document, FetchedDocument};
use crate::analyzer::result::HtmlVersion;
use std::collections::BTreeMap;

/// Layout elements whose presence marks a document as HTML5
const HTML5_SEMANTIC_TAGS: &str = "header, nav, main, section, article, aside, footer";

/// Inputs that identify a user, checked in order once a form has a
/// password field
const USERNAME_SELECTORS: &[&str] = &[
    "input[name*='user']",
    "input[name*='email']",
    "input[name*='login']",
    "input[name*='username']",
    "input[id*='user']",
    "input[id*='email']",
    "input[id*='login']",
    "input[id*='username']",
];

/// Every facet extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFacets {
    pub html_version: HtmlVersion,
    pub title: String,
    pub headings: BTreeMap<String, usize>,
    pub has_login_form: bool,
    /// Raw `href` values of all anchors, in document order
    pub hrefs: Vec<String>,
}

/// Runs all extractors over a fetched document
pub fn extract_facets(page: &FetchedDocument) -> PageFacets {
    let doc = &page.document;
    PageFacets {
        html_version: html_version(doc),
        title: title(doc),
        headings: headings(doc),
        has_login_form: has_login_form(doc),
        hrefs: anchor_hrefs(doc),
    }
}

/// Guesses the HTML version
///
/// # Rules (first match wins)
///
/// 1. `<html>` carries a `lang` attribute → HTML5
/// 2. Any semantic layout tag is present → HTML5
/// 3. `<html>` carries an `xmlns` attribute → XHTML
/// 4. Otherwise → HTML4
pub fn html_version(doc: &Document) -> HtmlVersion {
    let root_has_lang = doc
        .first("html")
        .map_or(false, |root| root.value().attr("lang").is_some());
    if root_has_lang {
        return HtmlVersion::Html5;
    }

    if doc.contains(HTML5_SEMANTIC_TAGS) {
        return HtmlVersion::Html5;
    }

    if doc.contains("html[xmlns]") {
        return HtmlVersion::Xhtml;
    }

    HtmlVersion::Html4
}

/// Trimmed text of the first `<title>`, or an empty string
pub fn title(doc: &Document) -> String {
    doc.first("title")
        .map(|element| element_text(&element))
        .unwrap_or_default()
}

/// Counts `<h1>` through `<h6>`, omitting levels that do not occur
pub fn headings(doc: &Document) -> BTreeMap<String, usize> {
    (1..=6)
        .filter_map(|level| {
            let tag = format!("h{}", level);
            match doc.count(&tag) {
                0 => None,
                count => Some((tag, count)),
            }
        })
        .collect()
}

/// Detects a login form
///
/// A form qualifies when it holds a password input and at least one input
/// whose `name` or `id` contains `user`, `email`, `login` or `username`
/// (case-sensitive).
pub fn has_login_form(doc: &Document) -> bool {
    doc.select("form").iter().any(|form| {
        element_contains(form, "input[type='password']")
            && USERNAME_SELECTORS
                .iter()
                .any(|selector| element_contains(form, selector))
    })
}

/// `href` values of all anchors that have one
pub fn anchor_hrefs(doc: &Document) -> Vec<String> {
    doc.select("a[href]")
        .iter()
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect()
}
