//! HTML version classification derived from the doctype declaration

use serde::{Deserialize, Serialize};
use std::fmt;

/// The HTML version a document declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HtmlVersion {
    #[serde(rename = "XHTML")]
    Xhtml,

    #[serde(rename = "HTML 4")]
    Html4,

    #[serde(rename = "HTML5")]
    Html5,

    #[serde(rename = "Unknown")]
    Unknown,
}

impl HtmlVersion {
    /// Classifies a raw doctype declaration
    ///
    /// Case-insensitive substring match, first hit wins:
    ///
    /// | Declaration contains | Result |
    /// |----------------------|--------|
    /// | `xhtml`  | `XHTML`   |
    /// | `html 4` | `HTML 4`  |
    /// | `html`   | `HTML5`   |
    /// | anything else, or empty | `Unknown` |
    ///
    /// # Examples
    ///
    /// ```
    /// use pagemeta::HtmlVersion;
    ///
    /// assert_eq!(HtmlVersion::classify("<!DOCTYPE html>"), HtmlVersion::Html5);
    /// assert_eq!(HtmlVersion::classify(""), HtmlVersion::Unknown);
    /// ```
    pub fn classify(doctype: &str) -> Self {
        let raw = doctype.to_lowercase();

        if raw.contains("xhtml") {
            Self::Xhtml
        } else if raw.contains("html 4") {
            Self::Html4
        } else if raw.contains("html") {
            Self::Html5
        } else {
            Self::Unknown
        }
    }

    /// The label used on the wire and in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xhtml => "XHTML",
            Self::Html4 => "HTML 4",
            Self::Html5 => "HTML5",
            Self::Unknown => "Unknown",
        }
    }

    /// Parses a label produced by `as_str`
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "XHTML" => Some(Self::Xhtml),
            "HTML 4" => Some(Self::Html4),
            "HTML5" => Some(Self::Html5),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
