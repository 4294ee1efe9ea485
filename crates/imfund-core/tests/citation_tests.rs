//! Citation extraction integration tests
//!
//! Boundary behavior of the title thresholds, the list-level acceptance
//! gate, and totality of the extractor over arbitrary input.

use imfund_core::citations::{extract, extract_all};
use imfund_core::config::ExtractorConfig;
use proptest::prelude::*;
use rstest::rstest;

fn config() -> ExtractorConfig {
    ExtractorConfig::default()
}

// === Title-rejection boundary (extraction blanks titles shorter than 10) ===

#[rstest]
#[case::nine_chars("ninechars", "")]
#[case::ten_chars("abcdefghij", "abcdefghij")]
#[case::eleven_chars("abcdefghijk", "abcdefghijk")]
fn extraction_title_length_boundary(#[case] title: &str, #[case] expected: &str) {
    let raw = format!("2019~Some Authors~{}", title);
    let citation = extract(&raw, &config());
    assert_eq!(citation.title, expected);
}

// === Acceptance gate (the list level drops titles of 10 or fewer chars) ===

#[rstest]
#[case::ten_chars_dropped("abcdefghij", 0)]
#[case::eleven_chars_kept("abcdefghijk", 1)]
fn list_gate_boundary(#[case] title: &str, #[case] kept: usize) {
    let raws = vec![format!("2019~Some Authors~{}", title)];
    assert_eq!(extract_all(&raws, &config()).len(), kept);
}

#[test]
fn gate_drops_noise_but_keeps_order() {
    let raws = vec![
        "Nature~2021~5~A. Author and B. Author~A Long And Meaningful Title About Research~"
            .to_string(),
        "N~~~".to_string(),
        "~~~~".to_string(),
        "2019~Jane Doe and John Smith~10.1000/xyz123~A Study of Something Important~".to_string(),
    ];
    let citations = extract_all(&raws, &config());
    assert_eq!(citations.len(), 2);
    assert_eq!(citations[0].journal, "Nature");
    assert_eq!(citations[1].identifier, "https://doi.org/10.1000/xyz123");
}

// === Author cleanup through the full pipeline ===

#[test]
fn trailing_email_is_stripped_from_authors() {
    let citation = extract(
        "2020~Jane Doe and John Smith jdoe@university.edu~10.1000/abc999~Results of a Long Investigation~",
        &config(),
    );
    assert_eq!(citation.authors, "Jane Doe and John Smith");
    assert_eq!(citation.title, "Results of a Long Investigation");
}

// === Configurable denylist ===

#[test]
fn denylist_is_data_not_logic() {
    let mut cfg = config();
    cfg.title_denylist = vec!["repository.example.edu".to_string()];
    let citation = extract(
        "Some Journal~2017~E. Author~see repository.example.edu/record/42~A Perfectly Ordinary Title Here~",
        &cfg,
    );
    assert_eq!(citation.title, "A Perfectly Ordinary Title Here");
}

// === Totality and purity ===

proptest! {
    #[test]
    fn extract_never_panics_and_is_deterministic(raw in ".{0,200}") {
        let cfg = ExtractorConfig::default();
        let first = extract(&raw, &cfg);
        let second = extract(&raw, &cfg);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn gate_output_always_renderable(raws in proptest::collection::vec(".{0,80}", 0..8)) {
        let cfg = ExtractorConfig::default();
        for citation in extract_all(&raws, &cfg) {
            prop_assert!(citation.title.chars().count() > cfg.min_title_len);
        }
    }
}
