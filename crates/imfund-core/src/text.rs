//! Text cleanup for registry and resolver payloads
//!
//! Resolver abstracts arrive wrapped in JATS/HTML markup and outcome
//! reports carry inline HTML; both get reduced to plain text before
//! display.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r"</?[A-Za-z][^>]*>").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Decode the handful of HTML entities that show up in practice
pub fn decode_html_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Strip markup tags, decode entities, and collapse runs of whitespace
pub fn strip_markup(text: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(text, " ");
    let decoded = decode_html_entities(&without_tags);
    WHITESPACE_REGEX.replace_all(&decoded, " ").trim().to_string()
}
