//! Shared checks for required free-text input fields.

use std::sync::OnceLock;

use regex::Regex;

static HTML_TAG_RE: OnceLock<Regex> = OnceLock::new();

fn html_tag_regex() -> &'static Regex {
    HTML_TAG_RE.get_or_init(|| {
        Regex::new(r"</?[A-Za-z!][^>]*>")
            .unwrap_or_else(|error| panic!("html tag regex failed to compile: {error}"))
    })
}

/// Why a required text field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextIssue {
    /// Absent, or blank once trimmed.
    Missing,
    /// Contains markup; text is stored verbatim and rendered by clients.
    ContainsHtml,
}

/// Trim and check a required text field.
pub(crate) fn required_text(value: Option<&str>) -> Result<String, TextIssue> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(TextIssue::Missing);
    }
    if html_tag_regex().is_match(trimmed) {
        return Err(TextIssue::ContainsHtml);
    }
    Ok(trimmed.to_owned())
}
