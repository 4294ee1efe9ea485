//! Uniform random sampling over the award registry
//!
//! The registry only exposes lookup-by-identifier and lookup-by-offset,
//! so two strategies cover the request shapes:
//!
//! - Strategy A, identifier guessing: identifiers densely populate a
//!   bounded numeric range, so a uniform draw over that range followed by
//!   a direct lookup is a uniform draw over the population. A bounded
//!   number of attempts absorbs unassigned and withdrawn identifiers.
//! - Strategy B, offset sampling: for filtered requests, fetch the
//!   filtered total count, draw one uniform offset, fetch that single
//!   record.
//!
//! Both strategies fail soft: every network or parse failure inside an
//! attempt is logged and treated as "no result this attempt", and the
//! caller sees `None` rather than an error.

use crate::config::SamplerConfig;
use crate::random::{uniform_in_range, OsEntropy, UniformSource};
use crate::sources::{NsfSource, SourceError};
use imfund_domain::{AwardRecord, SampleRequest};

/// The registry operations the sampler needs. `NsfSource` is the wire
/// implementation; tests substitute an in-memory one.
#[allow(async_fn_in_trait)]
pub trait AwardRegistry {
    /// Resolve one identifier; unassigned identifiers yield `Ok(None)`
    async fn award_by_id(&self, id: &str) -> Result<Option<AwardRecord>, SourceError>;

    /// Total number of records matching the request's filter
    async fn matching_count(&self, request: &SampleRequest) -> Result<u64, SourceError>;

    /// The single record at `offset` within the filtered result set
    async fn award_at_offset(
        &self,
        request: &SampleRequest,
        offset: u64,
    ) -> Result<Option<AwardRecord>, SourceError>;
}

impl AwardRegistry for NsfSource {
    async fn award_by_id(&self, id: &str) -> Result<Option<AwardRecord>, SourceError> {
        self.fetch_by_id(id).await
    }

    async fn matching_count(&self, request: &SampleRequest) -> Result<u64, SourceError> {
        self.fetch_count(request).await
    }

    async fn award_at_offset(
        &self,
        request: &SampleRequest,
        offset: u64,
    ) -> Result<Option<AwardRecord>, SourceError> {
        self.fetch_at_offset(request, offset).await
    }
}

pub struct Sampler<R, S = OsEntropy> {
    registry: R,
    entropy: S,
    config: SamplerConfig,
}

impl<R: AwardRegistry> Sampler<R> {
    /// Sampler over `registry` drawing from operating-system entropy
    pub fn new(registry: R, config: SamplerConfig) -> Self {
        Self::with_entropy(registry, config, OsEntropy)
    }
}

impl<R: AwardRegistry, S: UniformSource> Sampler<R, S> {
    pub fn with_entropy(registry: R, config: SamplerConfig, entropy: S) -> Self {
        Self {
            registry,
            entropy,
            config,
        }
    }

    /// One uniformly-random record from the subpopulation the request
    /// selects, or `None` when the population is empty or the registry
    /// would not cooperate.
    pub async fn sample(&mut self, request: &SampleRequest) -> Option<AwardRecord> {
        if request.is_unfiltered() {
            if let Some(award) = self.sample_by_id_guess().await {
                return Some(award);
            }
            tracing::debug!(
                attempts = self.config.max_attempts,
                "identifier guessing exhausted, falling back to offset sampling"
            );
        }
        self.sample_by_offset(request).await
    }

    /// Strategy A. Each attempt is an independent uniform draw; repeats
    /// are acceptable, the guarantee is per-draw uniformity.
    async fn sample_by_id_guess(&mut self) -> Option<AwardRecord> {
        for attempt in 1..=self.config.max_attempts {
            let drawn =
                uniform_in_range(&mut self.entropy, self.config.id_min, self.config.id_max);
            let id = self.format_id(drawn);

            match self.registry.award_by_id(&id).await {
                // The abstract-length check screens out stub and withdrawn
                // records; it is a documented bias of this strategy.
                Ok(Some(award)) if award.abstract_len() > self.config.min_abstract_len => {
                    tracing::debug!(attempt, id = %id, "identifier guess hit");
                    return Some(award);
                }
                Ok(_) => {
                    tracing::debug!(attempt, id = %id, "identifier guess missed");
                }
                Err(e) => {
                    tracing::warn!(attempt, id = %id, error = %e, "identifier lookup failed");
                }
            }
        }
        None
    }

    /// Strategy B. Single-shot: one count query, one offset fetch.
    async fn sample_by_offset(&mut self, request: &SampleRequest) -> Option<AwardRecord> {
        let count = match self.registry.matching_count(request).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "count query failed");
                return None;
            }
        };
        if count == 0 {
            tracing::debug!("filtered population is empty");
            return None;
        }

        // Very large result sets are not fully offset-addressable
        let addressable = count.min(self.config.max_offset);
        let offset = uniform_in_range(&mut self.entropy, 0, addressable - 1);

        match self.registry.award_at_offset(request, offset).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(offset, error = %e, "offset fetch failed");
                None
            }
        }
    }

    fn format_id(&self, n: u64) -> String {
        format!("{:0width$}", n, width = self.config.id_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededEntropy;

    struct NeverRegistry;

    impl AwardRegistry for NeverRegistry {
        async fn award_by_id(&self, _id: &str) -> Result<Option<AwardRecord>, SourceError> {
            Ok(None)
        }
        async fn matching_count(&self, _request: &SampleRequest) -> Result<u64, SourceError> {
            Ok(0)
        }
        async fn award_at_offset(
            &self,
            _request: &SampleRequest,
            _offset: u64,
        ) -> Result<Option<AwardRecord>, SourceError> {
            Ok(None)
        }
    }

    #[test]
    fn test_format_id_zero_pads() {
        let sampler = Sampler::with_entropy(
            NeverRegistry,
            SamplerConfig::default(),
            SeededEntropy::new(1),
        );
        assert_eq!(sampler.format_id(12345), "0012345");
        assert_eq!(sampler.format_id(2399999), "2399999");
    }
}
