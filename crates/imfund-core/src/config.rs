//! Configuration for imfund-core
//!
//! Centralized configuration for the registry endpoint, the sampler's
//! draw parameters, and the citation extractor's heuristics. All sections
//! have working defaults; a TOML file can override any subset:
//!
//! ```toml
//! [registry]
//! base_url = "https://api.nsf.gov/services/v1"
//! timeout_secs = 10
//!
//! [sampler]
//! max_attempts = 20
//! min_abstract_len = 100
//!
//! [extractor]
//! title_denylist = ["dash.harvard.edu"]
//! ```

use serde::{Deserialize, Serialize};

/// System-wide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImfundConfig {
    /// Registry endpoint settings
    pub registry: RegistryConfig,
    /// Sampler draw parameters
    pub sampler: SamplerConfig,
    /// Citation extractor heuristics
    pub extractor: ExtractorConfig,
}

impl ImfundConfig {
    /// Parse a configuration from TOML text; missing sections and keys
    /// keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Award registry endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the award registry API
    pub base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.nsf.gov/services/v1".to_string(),
            user_agent: "imfund/0.1 (https://github.com/yipihey/imfund)".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Sampler draw parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Lowest assigned registry identifier
    pub id_min: u64,
    /// Highest assigned registry identifier
    pub id_max: u64,
    /// Zero-padded width of a formatted identifier
    pub id_width: usize,
    /// Identifier-guessing attempts before falling back to offset sampling
    pub max_attempts: u32,
    /// Minimum abstract length for a guessed record to count as live
    pub min_abstract_len: usize,
    /// Largest offset the registry can address in a filtered query
    pub max_offset: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            id_min: 1_000_000,
            id_max: 2_399_999,
            id_width: 7,
            max_attempts: 20,
            min_abstract_len: 100,
            max_offset: 10_000,
        }
    }
}

/// Citation extractor heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Field delimiter in raw citation strings
    pub delimiter: char,
    /// Titles at or below this length are dropped by the list-level gate;
    /// strictly shorter ones are blanked during extraction
    pub min_title_len: usize,
    /// Minimum length for a token to be considered as a title during the
    /// journal-first forward scan
    pub scan_title_min_len: usize,
    /// Substrings that disqualify a token from being a title. Registry
    /// feeds carry archival-repository boilerplate here; extend per feed.
    pub title_denylist: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            delimiter: '~',
            min_title_len: 10,
            scan_title_min_len: 15,
            title_denylist: vec!["dash.harvard.edu".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImfundConfig::default();
        assert_eq!(config.sampler.max_attempts, 20);
        assert_eq!(config.sampler.min_abstract_len, 100);
        assert_eq!(config.extractor.delimiter, '~');
        assert_eq!(config.extractor.min_title_len, 10);
        assert!(config.registry.base_url.starts_with("https://"));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let toml = r#"
            [sampler]
            max_attempts = 5

            [extractor]
            title_denylist = ["example.org/archive"]
        "#;
        let config = ImfundConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.sampler.max_attempts, 5);
        assert_eq!(config.sampler.min_abstract_len, 100);
        assert_eq!(config.extractor.title_denylist, vec!["example.org/archive"]);
        assert_eq!(config.registry.timeout_secs, 10);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ImfundConfig::from_toml_str("").unwrap();
        assert_eq!(config.sampler.id_width, 7);
    }
}
