//! NSF award registry source plugin
//!
//! API docs: https://resources.research.gov/common/webapi/awardapisearch-v1.htm
//! Lookup is by award identifier or by offset into a filtered result set;
//! there is no random-access primitive. Results arrive in a
//! `{"response": {"award": [...]}}` envelope whose metadata block carries
//! the filtered total count.

use super::traits::{SourceError, SourceMetadata};
use crate::config::RegistryConfig;
use crate::http::HttpClient;
use imfund_domain::{AwardRecord, AwardStatus, SampleRequest};
use serde::Deserialize;

/// Fields requested on every award query. The registry omits everything
/// not named here.
const AWARD_FIELDS: &str = "id,title,abstractText,estimatedTotalAmt,fundsObligatedAmt,\
agency,awardeeName,awardeeCity,awardeeStateCode,piFirstName,piLastName,\
date,startDate,expDate,projectOutComesReport,publicationResearch";

/// Registry API response wrapper
#[derive(Debug, Deserialize)]
struct NsfResponse {
    response: NsfResponseBody,
}

#[derive(Debug, Deserialize)]
struct NsfResponseBody {
    #[serde(default)]
    award: Vec<AwardRecord>,
    metadata: Option<NsfMetadata>,
}

#[derive(Debug, Deserialize)]
struct NsfMetadata {
    #[serde(rename = "totalCount")]
    total_count: Option<u64>,
}

pub struct NsfSource {
    client: HttpClient,
    base_url: String,
}

impl NsfSource {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            client: HttpClient::from_config(config),
            base_url: config.base_url.clone(),
        }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "nsf",
            name: "NSF Award Search",
            description: "US National Science Foundation research award catalog",
            base_url: "https://api.nsf.gov/services/v1",
            rate_limit_per_second: 1.0,
            supports_offset_paging: true,
            requires_api_key: false,
        }
    }

    /// Parse a registry response into its award list
    pub fn parse_award_response(json: &str) -> Result<Vec<AwardRecord>, SourceError> {
        let response: NsfResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid registry JSON: {}", e)))?;
        Ok(response.response.award)
    }

    /// Parse the filtered total count out of a registry response
    pub fn parse_total_count(json: &str) -> Result<u64, SourceError> {
        let response: NsfResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid registry JSON: {}", e)))?;
        response
            .response
            .metadata
            .and_then(|m| m.total_count)
            .ok_or_else(|| SourceError::Parse("Response carries no total count".to_string()))
    }

    /// Query parameters selecting the filtered subpopulation
    fn filter_params(request: &SampleRequest) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(min) = request.min_amount {
            params.push(("estimatedTotalAmtFrom".to_string(), min.to_string()));
        }
        match request.status {
            AwardStatus::Active => params.push(("activeAwards".to_string(), "true".to_string())),
            AwardStatus::Completed => {
                params.push(("expiredAwards".to_string(), "true".to_string()))
            }
            AwardStatus::Any => {}
        }
        params
    }

    fn awards_url(&self) -> String {
        format!("{}/awards.json", self.base_url)
    }

    /// Look one award up by its registry identifier. Unassigned and
    /// withdrawn identifiers resolve to an empty envelope, not an error.
    pub async fn fetch_by_id(&self, id: &str) -> Result<Option<AwardRecord>, SourceError> {
        let url = self.awards_url();
        let params = [("id", id), ("printFields", AWARD_FIELDS)];
        let response = self.client.get_with_params(&url, &params).await?;
        let awards = Self::parse_award_response(&response.body)?;
        Ok(awards.into_iter().next())
    }

    /// Total number of records matching the request's filter
    pub async fn fetch_count(&self, request: &SampleRequest) -> Result<u64, SourceError> {
        let url = self.awards_url();
        let mut params = vec![
            ("rpp".to_string(), "1".to_string()),
            ("offset".to_string(), "0".to_string()),
            ("printFields".to_string(), "id".to_string()),
        ];
        params.extend(Self::filter_params(request));
        let borrowed: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let response = self.client.get_with_params(&url, &borrowed).await?;
        Self::parse_total_count(&response.body)
    }

    /// The single record at `offset` within the filtered result set
    pub async fn fetch_at_offset(
        &self,
        request: &SampleRequest,
        offset: u64,
    ) -> Result<Option<AwardRecord>, SourceError> {
        let url = self.awards_url();
        let mut params = vec![
            ("rpp".to_string(), "1".to_string()),
            ("offset".to_string(), offset.to_string()),
            ("printFields".to_string(), AWARD_FIELDS.to_string()),
        ];
        params.extend(Self::filter_params(request));
        let borrowed: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let response = self.client.get_with_params(&url, &borrowed).await?;
        let awards = Self::parse_award_response(&response.body)?;
        Ok(awards.into_iter().next())
    }
}

impl Default for NsfSource {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}
