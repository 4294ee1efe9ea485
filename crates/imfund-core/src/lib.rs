//! imfund-core: uniform award sampling and citation extraction
//!
//! This library provides the two components behind the random award page:
//! - Sampler: one uniformly-random record from a registry that only exposes
//!   lookup-by-identifier and lookup-by-offset
//! - Citation extraction: structured bibliographic fields recovered from
//!   loosely-delimited free-form strings
//!
//! plus the boundary plumbing they need: an HTTP layer, the registry and
//! DOI-resolver source plugins, text cleanup, and configuration.

pub mod citations;
pub mod config;
pub mod http;
pub mod random;
pub mod sampler;
pub mod sources;
pub mod text;

// Re-export main types for convenience
pub use citations::{extract, extract_all};
pub use config::{ExtractorConfig, ImfundConfig, RegistryConfig, SamplerConfig};
pub use http::{HttpClient, HttpError, HttpResponse};
pub use random::{uniform_in_range, OsEntropy, SeededEntropy, UniformSource};
pub use sampler::{AwardRegistry, Sampler};
pub use sources::{NsfSource, SourceError, SourceMetadata};

// Domain types flow through the public API; re-export them so callers
// need only this crate.
pub use imfund_domain::{AwardRecord, AwardStatus, ParsedCitation, SampleRequest};

/// Returns the version of imfund-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
