//! Crossref source plugin for DOI metadata
//!
//! API docs: https://api.crossref.org/swagger-ui/index.html
//! Used to enrich an extracted citation whose identifier resolved to a DOI.

use super::traits::{SourceError, SourceMetadata};
use crate::config::RegistryConfig;
use crate::http::HttpClient;
use crate::text::strip_markup;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: CrossrefWork,
}

#[derive(Debug, Deserialize)]
struct CrossrefWork {
    #[serde(rename = "DOI")]
    doi: String,
    title: Option<Vec<String>>,
    author: Option<Vec<CrossrefAuthor>>,
    #[serde(rename = "container-title")]
    container_title: Option<Vec<String>>,
    #[serde(rename = "published-print")]
    published_print: Option<CrossrefDate>,
    #[serde(rename = "published-online")]
    published_online: Option<CrossrefDate>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrossrefDate {
    #[serde(rename = "date-parts")]
    date_parts: Option<Vec<Vec<i32>>>,
}

/// Resolved metadata for one DOI
#[derive(Clone, Debug)]
pub struct ResolvedWork {
    pub doi: String,
    pub title: String,
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub year: Option<i32>,
    /// Abstract with markup already stripped to plain text
    pub abstract_text: Option<String>,
    pub url: Option<String>,
}

pub struct CrossrefSource {
    client: HttpClient,
    base_url: String,
}

impl CrossrefSource {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            client: HttpClient::from_config(config),
            base_url: "https://api.crossref.org".to_string(),
        }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "crossref",
            name: "Crossref",
            description: "DOI registration agency with metadata for scholarly works",
            base_url: "https://api.crossref.org",
            rate_limit_per_second: 50.0,
            supports_offset_paging: false,
            requires_api_key: false,
        }
    }

    /// Parse a single-work response (DOI lookup)
    pub fn parse_work_response(json: &str) -> Result<ResolvedWork, SourceError> {
        let response: CrossrefResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid Crossref JSON: {}", e)))?;
        Self::parse_work(response.message)
            .ok_or_else(|| SourceError::Parse("Work carries no title".to_string()))
    }

    fn parse_work(work: CrossrefWork) -> Option<ResolvedWork> {
        let title = work.title.and_then(|t| t.into_iter().next())?;

        let authors: Vec<String> = work
            .author
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| {
                let family = a.family?;
                Some(match a.given {
                    Some(given) => format!("{} {}", given, family),
                    None => family,
                })
            })
            .collect();

        let year = work
            .published_print
            .or(work.published_online)
            .and_then(|d| d.date_parts)
            .and_then(|dp| dp.into_iter().next())
            .and_then(|parts| parts.first().copied());

        let journal = work.container_title.and_then(|t| t.into_iter().next());

        // Crossref abstracts often include XML/JATS markup
        let abstract_text = work.abstract_text.map(|a| strip_markup(&a));

        Some(ResolvedWork {
            doi: work.doi,
            title,
            authors,
            journal,
            year,
            abstract_text,
            url: work.url,
        })
    }

    /// Fetch metadata for one DOI (the bare `10.<registrant>/<suffix>` form)
    pub async fn resolve(&self, doi: &str) -> Result<ResolvedWork, SourceError> {
        let url = format!("{}/works/{}", self.base_url, urlencoding::encode(doi));
        let response = self.client.get(&url).await?;
        if response.status == 404 {
            return Err(SourceError::NotFound);
        }
        Self::parse_work_response(&response.body)
    }
}

impl Default for CrossrefSource {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}
