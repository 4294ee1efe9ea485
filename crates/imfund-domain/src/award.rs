//! Award record and sample request models

use serde::{Deserialize, Serialize};

/// Custom deserializer for monetary fields that the registry serves as
/// either a string ("550000") or a bare number
fn deserialize_amount_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, or null")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(AmountValueVisitor).map(Some)
        }
    }

    struct AmountValueVisitor;

    impl<'de> Visitor<'de> for AmountValueVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.trim().replace(',', "").parse().map_err(de::Error::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }
    }

    deserializer.deserialize_option(AmountVisitor)
}

/// One record from the award registry, deserialized as served.
///
/// Immutable once fetched; the registry may omit any field, including the
/// identifier itself at an untried offset.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "abstractText")]
    pub abstract_text: Option<String>,
    #[serde(
        rename = "estimatedTotalAmt",
        deserialize_with = "deserialize_amount_option"
    )]
    pub estimated_total_amt: Option<f64>,
    #[serde(
        rename = "fundsObligatedAmt",
        deserialize_with = "deserialize_amount_option"
    )]
    pub funds_obligated_amt: Option<f64>,
    pub agency: Option<String>,
    #[serde(rename = "awardeeName")]
    pub awardee_name: Option<String>,
    #[serde(rename = "awardeeCity")]
    pub awardee_city: Option<String>,
    #[serde(rename = "awardeeStateCode")]
    pub awardee_state_code: Option<String>,
    #[serde(rename = "piFirstName")]
    pub pi_first_name: Option<String>,
    #[serde(rename = "piLastName")]
    pub pi_last_name: Option<String>,
    /// Award date, as formatted by the registry
    pub date: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "expDate")]
    pub exp_date: Option<String>,
    /// Free-text outcomes report; may contain inline HTML
    #[serde(rename = "projectOutComesReport")]
    pub project_outcomes_report: Option<String>,
    /// Raw citation strings, one delimited entry per publication
    #[serde(rename = "publicationResearch")]
    pub publication_research: Vec<String>,
}

impl AwardRecord {
    /// Length of the abstract text in characters, zero when absent.
    ///
    /// Used by the sampler as a liveness signal against stub records.
    pub fn abstract_len(&self) -> usize {
        self.abstract_text
            .as_deref()
            .map(|a| a.chars().count())
            .unwrap_or(0)
    }

    /// Principal investigator display name, when the registry provided one
    pub fn pi_name(&self) -> Option<String> {
        match (&self.pi_first_name, &self.pi_last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (None, Some(last)) => Some(last.clone()),
            (Some(first), None) => Some(first.clone()),
            (None, None) => None,
        }
    }
}

/// Award lifecycle filter for sampling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardStatus {
    #[default]
    Any,
    Active,
    Completed,
}

impl AwardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AwardStatus::Any => "any",
            AwardStatus::Active => "active",
            AwardStatus::Completed => "completed",
        }
    }
}

/// Which subpopulation of the registry to sample from
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleRequest {
    /// Minimum total award amount in whole dollars
    pub min_amount: Option<u64>,
    pub status: AwardStatus,
}

impl SampleRequest {
    /// A request over the full registry population
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// True when no filter constrains the population; identifier guessing
    /// is only valid in that case.
    pub fn is_unfiltered(&self) -> bool {
        self.min_amount.is_none() && self.status == AwardStatus::Any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_accepts_string_and_number() {
        let json = r#"{"id": "2012345", "estimatedTotalAmt": "550000", "fundsObligatedAmt": 125000}"#;
        let award: AwardRecord = serde_json::from_str(json).unwrap();
        assert_eq!(award.estimated_total_amt, Some(550000.0));
        assert_eq!(award.funds_obligated_amt, Some(125000.0));
    }

    #[test]
    fn test_missing_fields_default() {
        let award: AwardRecord = serde_json::from_str(r#"{"title": "A Grant"}"#).unwrap();
        assert!(award.id.is_none());
        assert!(award.publication_research.is_empty());
        assert_eq!(award.abstract_len(), 0);
    }

    #[test]
    fn test_pi_name() {
        let award = AwardRecord {
            pi_first_name: Some("Jane".to_string()),
            pi_last_name: Some("Doe".to_string()),
            ..Default::default()
        };
        assert_eq!(award.pi_name(), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_unfiltered_request() {
        assert!(SampleRequest::unfiltered().is_unfiltered());
        let filtered = SampleRequest {
            min_amount: Some(100_000),
            status: AwardStatus::Any,
        };
        assert!(!filtered.is_unfiltered());
        let active = SampleRequest {
            min_amount: None,
            status: AwardStatus::Active,
        };
        assert!(!active.is_unfiltered());
    }
}
