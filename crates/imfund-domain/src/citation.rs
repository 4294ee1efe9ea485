//! Parsed citation model
//!
//! The raw form is a single delimited string whose field count and order
//! vary record to record; the parsed form is a best-effort recovery of the
//! bibliographic fields. Absence is the empty string throughout, so that a
//! failed extraction still yields a representable value.

use serde::{Deserialize, Serialize};

/// Structured fields recovered from one raw citation string
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCitation {
    /// Four-digit publication year, or empty
    pub year: String,
    /// Author list as free text, or empty
    pub authors: String,
    /// Work title, or empty
    pub title: String,
    /// Journal or container name, or empty
    pub journal: String,
    /// DOI normalized to a resolvable URL, or empty
    pub identifier: String,
}

impl ParsedCitation {
    /// Whether this citation passes the caller-level acceptance gate: a
    /// title longer than `min_title_len` characters.
    pub fn is_renderable(&self, min_title_len: usize) -> bool {
        self.title.chars().count() > min_title_len
    }
}
