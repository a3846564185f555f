use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// HTML version guessed from the markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HtmlVersion {
    #[serde(rename = "HTML5")]
    Html5,
    #[serde(rename = "XHTML")]
    Xhtml,
    #[serde(rename = "HTML4")]
    Html4,
}

impl HtmlVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html5 => "HTML5",
            Self::Xhtml => "XHTML",
            Self::Html4 => "HTML4",
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report for one analyzed page
///
/// Field names are the serialization contract. The record is produced
/// only once every extractor and every link probe has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The analyzed URL, after scheme defaulting
    pub url: String,

    pub html_version: HtmlVersion,

    /// Trimmed text of the first `<title>`, empty if there is none
    pub title: String,

    /// Heading counts keyed `"h1"`..`"h6"`; levels with no headings are absent
    pub headings: BTreeMap<String, usize>,

    pub internal_links: usize,

    pub external_links: usize,

    /// External links whose HEAD probe failed or did not answer 200
    pub inaccessible_links: usize,

    pub has_login_form: bool,

    /// When the analysis completed
    pub analysis_time: DateTime<Utc>,
}
