//! Citation extraction from delimited registry strings
//!
//! The registry's publication field is one string per citation, fields
//! separated by a fixed delimiter, with no stable field count or order.
//! Extraction is a pure single-pass function over the token sequence:
//! identifier scan, year scan, a tagged layout dispatch, then repair and
//! rejection passes. The worst case is an all-empty citation, which the
//! list-level gate in [`extract_all`] discards; extraction itself never
//! fails.

use crate::config::ExtractorConfig;
use imfund_domain::ParsedCitation;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // DOI capture: bare 10.XXXX/... suffix, with or without a resolver URL
    static ref DOI_REGEX: Regex =
        Regex::new(r#"(?i)(?:https?://(?:dx\.)?doi\.org/)?(?P<doi>10\.\d{4,}/[^\s"',;]+)"#)
            .unwrap();
    static ref YEAR_REGEX: Regex = Regex::new(r"^\d{4}$").unwrap();
    static ref NUMERIC_REGEX: Regex = Regex::new(r"^\d+$").unwrap();
    static ref DATE_SHAPED_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap();
    static ref TRAILING_EMAIL_REGEX: Regex =
        Regex::new(r"[\s(]*[\w.+-]+@[\w-]+(?:\.[\w-]+)+\)?\s*$").unwrap();
}

/// Titles that are placeholders rather than titles
const SENTINEL_TITLES: &[&str] = &["n/a", "na", "none", "null", "tbd"];

/// Author-list marker used by the transposition repair
const AUTHOR_LIST_MARKER: &str = " and ";

/// A transposed title reads like an author list and stays short
const SWAP_TITLE_MAX_LEN: usize = 80;
/// A transposed author field reads like a title and runs long
const SWAP_AUTHORS_MIN_LEN: usize = 50;

/// How many leading tokens the year scan inspects
const YEAR_SCAN_WINDOW: usize = 4;

/// The two observed citation layouts. A new layout means a new variant
/// with its own extraction rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CitationLayout {
    /// `<year>~<authors>~[identifier]~<title>~...`
    YearFirst,
    /// `<journal>~<year>~[volume]~<authors>~...~<title>~...`
    JournalFirst,
}

impl CitationLayout {
    fn detect(tokens: &[String]) -> Self {
        if tokens.first().map(|t| is_year(t)).unwrap_or(false) {
            CitationLayout::YearFirst
        } else {
            CitationLayout::JournalFirst
        }
    }
}

fn is_year(token: &str) -> bool {
    YEAR_REGEX.is_match(token)
}

fn is_numeric(token: &str) -> bool {
    NUMERIC_REGEX.is_match(token)
}

fn is_date_shaped(token: &str) -> bool {
    DATE_SHAPED_REGEX.is_match(token)
}

/// DOI-shaped: carries the resolver host, or the registrant prefix pattern
fn looks_like_identifier(token: &str) -> bool {
    token.contains("doi.org") || DOI_REGEX.is_match(token)
}

fn starts_with_capitalized(text: &str) -> bool {
    text.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

/// Strip punctuation a trailing DOI capture tends to swallow
fn clean_doi(doi: &str) -> String {
    let mut s = doi.to_string();
    while let Some(c) = s.chars().last() {
        if c == '.' || c == ',' || c == ';' || c == ')' || c == ']' {
            s.pop();
        } else {
            break;
        }
    }
    s
}

/// First DOI-shaped token, normalized to a resolvable URL. The position
/// feeds the year-first title rule.
fn find_identifier(tokens: &[String]) -> Option<(usize, String)> {
    tokens.iter().enumerate().find_map(|(i, token)| {
        if !looks_like_identifier(token) {
            return None;
        }
        let url = DOI_REGEX
            .captures(token)
            .and_then(|cap| cap.name("doi"))
            .map(|m| format!("https://doi.org/{}", clean_doi(m.as_str())))
            .unwrap_or_else(|| {
                if token.starts_with("http") {
                    token.clone()
                } else {
                    format!("https://{}", token)
                }
            });
        Some((i, url))
    })
}

/// First 4-digit token among the leading tokens
fn find_year(tokens: &[String]) -> Option<usize> {
    tokens
        .iter()
        .take(YEAR_SCAN_WINDOW)
        .position(|t| is_year(t))
}

fn extract_year_first(
    tokens: &[String],
    identifier: Option<&(usize, String)>,
) -> ParsedCitation {
    let year = tokens[0].clone();
    let authors = tokens.get(1).cloned().unwrap_or_default();

    let candidate = match identifier {
        Some((pos, _)) => tokens.get(pos + 1),
        None => tokens.get(3).or_else(|| tokens.get(2)),
    };
    let title = candidate
        .filter(|t| !looks_like_identifier(t.as_str()))
        .cloned()
        .unwrap_or_default();

    ParsedCitation {
        year,
        authors,
        title,
        ..Default::default()
    }
}

fn extract_journal_first(
    tokens: &[String],
    year_pos: Option<usize>,
    config: &ExtractorConfig,
) -> ParsedCitation {
    let journal = tokens[0].clone();
    let year = year_pos.map(|y| tokens[y].clone()).unwrap_or_default();

    // The token after the year is either the author list or a bare volume
    // number sitting in front of it.
    let (authors, scan_start) = match year_pos {
        Some(y) => {
            let authors_pos = match tokens.get(y + 1) {
                Some(next) if is_numeric(next) && tokens.get(y + 2).is_some() => y + 2,
                _ => y + 1,
            };
            (
                tokens.get(authors_pos).cloned().unwrap_or_default(),
                authors_pos + 1,
            )
        }
        None => (String::new(), 1),
    };

    let title = tokens
        .iter()
        .skip(scan_start)
        .find(|t| {
            t.chars().count() > config.scan_title_min_len
                && !looks_like_identifier(t.as_str())
                && !is_numeric(t.as_str())
                && !config.title_denylist.iter().any(|d| t.contains(d.as_str()))
        })
        .cloned()
        .unwrap_or_default();

    ParsedCitation {
        year,
        authors,
        title,
        journal,
        ..Default::default()
    }
}

/// Undo the common transposition where the author token landed in the
/// title slot and vice versa.
fn swap_if_transposed(citation: &mut ParsedCitation) {
    let title_reads_like_authors = citation.title.chars().count() < SWAP_TITLE_MAX_LEN
        && citation.title.contains(AUTHOR_LIST_MARKER)
        && starts_with_capitalized(&citation.title);
    let authors_read_like_title = citation.authors.chars().count() > SWAP_AUTHORS_MIN_LEN
        && !citation.authors.contains(AUTHOR_LIST_MARKER);

    if title_reads_like_authors && authors_read_like_title {
        std::mem::swap(&mut citation.title, &mut citation.authors);
    }
}

/// Blank titles that are noise: numeric runs, placeholders, too-short
/// fragments, date stamps.
fn reject_noise_title(title: String, config: &ExtractorConfig) -> String {
    let lowered = title.to_lowercase();
    if title.chars().count() < config.min_title_len
        || is_numeric(&title)
        || is_date_shaped(&title)
        || SENTINEL_TITLES.contains(&lowered.as_str())
    {
        String::new()
    } else {
        title
    }
}

/// Drop an email address trailing the author list
fn strip_trailing_email(authors: &str) -> String {
    TRAILING_EMAIL_REGEX
        .replace(authors, "")
        .trim_end()
        .to_string()
}

/// Extract structured fields from one raw citation string.
///
/// Total function: any input yields a `ParsedCitation`, possibly all-empty.
pub fn extract(raw: &str, config: &ExtractorConfig) -> ParsedCitation {
    let tokens: Vec<String> = raw
        .split(config.delimiter)
        .map(|t| t.trim().to_string())
        .collect();

    let identifier = find_identifier(&tokens);
    let year_pos = find_year(&tokens);

    let mut citation = match CitationLayout::detect(&tokens) {
        CitationLayout::YearFirst => extract_year_first(&tokens, identifier.as_ref()),
        CitationLayout::JournalFirst => extract_journal_first(&tokens, year_pos, config),
    };
    citation.identifier = identifier.map(|(_, url)| url).unwrap_or_default();

    swap_if_transposed(&mut citation);
    citation.title = reject_noise_title(citation.title, config);
    citation.authors = strip_trailing_email(&citation.authors);

    citation
}

/// Extract every raw citation, preserving input order and dropping entries
/// that fail the title acceptance gate.
pub fn extract_all(raws: &[String], config: &ExtractorConfig) -> Vec<ParsedCitation> {
    raws.iter()
        .map(|raw| extract(raw, config))
        .filter(|citation| citation.is_renderable(config.min_title_len))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractorConfig {
        ExtractorConfig::default()
    }

    #[test]
    fn test_layout_detection() {
        let year_first = vec!["2019".to_string(), "authors".to_string()];
        assert_eq!(CitationLayout::detect(&year_first), CitationLayout::YearFirst);

        let journal_first = vec!["Nature".to_string(), "2021".to_string()];
        assert_eq!(
            CitationLayout::detect(&journal_first),
            CitationLayout::JournalFirst
        );

        assert_eq!(CitationLayout::detect(&[]), CitationLayout::JournalFirst);
    }

    #[test]
    fn test_find_identifier_bare_doi() {
        let tokens = vec![
            "2019".to_string(),
            "Jane Doe".to_string(),
            "10.1000/xyz123".to_string(),
        ];
        let (pos, url) = find_identifier(&tokens).unwrap();
        assert_eq!(pos, 2);
        assert_eq!(url, "https://doi.org/10.1000/xyz123");
    }

    #[test]
    fn test_find_identifier_already_url() {
        let tokens = vec!["https://doi.org/10.5555/abc.def".to_string()];
        let (_, url) = find_identifier(&tokens).unwrap();
        assert_eq!(url, "https://doi.org/10.5555/abc.def");
    }

    #[test]
    fn test_find_identifier_trailing_punctuation() {
        let tokens = vec!["10.1038/nature12373.".to_string()];
        let (_, url) = find_identifier(&tokens).unwrap();
        assert_eq!(url, "https://doi.org/10.1038/nature12373");
    }

    #[test]
    fn test_year_scan_window() {
        let tokens: Vec<String> = ["a", "b", "c", "d", "2020"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // The year sits beyond the scan window
        assert_eq!(find_year(&tokens), None);

        let tokens: Vec<String> = ["Journal", "2020"].iter().map(|s| s.to_string()).collect();
        assert_eq!(find_year(&tokens), Some(1));
    }

    #[test]
    fn test_extract_year_first_with_identifier() {
        let citation = extract(
            "2019~Jane Doe and John Smith~10.1000/xyz123~A Study of Something Important~",
            &config(),
        );
        assert_eq!(citation.year, "2019");
        assert_eq!(citation.authors, "Jane Doe and John Smith");
        assert_eq!(citation.identifier, "https://doi.org/10.1000/xyz123");
        assert_eq!(citation.title, "A Study of Something Important");
        assert_eq!(citation.journal, "");
    }

    #[test]
    fn test_extract_journal_first_with_volume() {
        let citation = extract(
            "Nature~2021~5~A. Author and B. Author~A Long And Meaningful Title About Research~",
            &config(),
        );
        assert_eq!(citation.journal, "Nature");
        assert_eq!(citation.year, "2021");
        assert_eq!(citation.authors, "A. Author and B. Author");
        assert_eq!(citation.title, "A Long And Meaningful Title About Research");
    }

    #[test]
    fn test_extract_journal_first_without_volume() {
        let citation = extract(
            "Science~2020~C. Researcher~Observations of a Remarkable Phenomenon~",
            &config(),
        );
        assert_eq!(citation.journal, "Science");
        assert_eq!(citation.year, "2020");
        assert_eq!(citation.authors, "C. Researcher");
        assert_eq!(citation.title, "Observations of a Remarkable Phenomenon");
    }

    #[test]
    fn test_title_scan_skips_denylisted_token() {
        let mut cfg = config();
        cfg.title_denylist = vec!["dash.harvard.edu".to_string()];
        let citation = extract(
            "Journal of Things~2018~D. Author~available at dash.harvard.edu/handle/1~The Actual Title of the Work~",
            &cfg,
        );
        assert_eq!(citation.title, "The Actual Title of the Work");
    }

    #[test]
    fn test_swap_correction() {
        let citation = extract(
            "2019~A Detailed Study of Protein Folding Mechanisms in Cells~~Jane Doe and John Smith",
            &config(),
        );
        assert_eq!(citation.title, "A Detailed Study of Protein Folding Mechanisms in Cells");
        assert_eq!(citation.authors, "Jane Doe and John Smith");
    }

    #[test]
    fn test_noise_title_rejected() {
        let cfg = config();
        assert_eq!(reject_noise_title("1234567890123".to_string(), &cfg), "");
        assert_eq!(reject_noise_title("2021-03-15T00:00:00".to_string(), &cfg), "");
        assert_eq!(reject_noise_title("N/A".to_string(), &cfg), "");
        assert_eq!(reject_noise_title("short".to_string(), &cfg), "");
        assert_eq!(
            reject_noise_title("A Genuine Title".to_string(), &cfg),
            "A Genuine Title"
        );
    }

    #[test]
    fn test_trailing_email_stripped() {
        assert_eq!(
            strip_trailing_email("Jane Doe and John Smith jdoe@university.edu"),
            "Jane Doe and John Smith"
        );
        assert_eq!(
            strip_trailing_email("Jane Doe (jane.doe@lab.example.org)"),
            "Jane Doe"
        );
        assert_eq!(strip_trailing_email("Jane Doe"), "Jane Doe");
    }

    #[test]
    fn test_degenerate_input() {
        let citation = extract("N~~~", &config());
        assert_eq!(citation.title, "");
        assert_eq!(citation.journal, "N");
        assert!(!citation.is_renderable(config().min_title_len));
    }

    #[test]
    fn test_extract_all_preserves_order_and_filters() {
        let raws = vec![
            "2019~Jane Doe and John Smith~10.1000/xyz123~A Study of Something Important~"
                .to_string(),
            "N~~~".to_string(),
            "Nature~2021~5~A. Author and B. Author~A Long And Meaningful Title About Research~"
                .to_string(),
        ];
        let citations = extract_all(&raws, &config());
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].title, "A Study of Something Important");
        assert_eq!(citations[1].title, "A Long And Meaningful Title About Research");
    }

    #[test]
    fn test_extract_is_pure() {
        let raw = "2019~Jane Doe and John Smith~10.1000/xyz123~A Study of Something Important~";
        assert_eq!(extract(raw, &config()), extract(raw, &config()));
    }
}
