//! imfund-llm: prose summaries for award pages
//!
//! Wraps a chat-completion endpoint behind the narrowest possible
//! contract: a role instruction plus a user prompt in, one text block or
//! an error out. The two prompt builders cover the award page's needs:
//! a plain-language overview of the grant, and a digest of its outcomes
//! and publications.

pub mod provider;
pub mod types;

pub use provider::ChatClient;
pub use types::{LLMError, LLMMessage, LLMRequest, LLMResponse, LLMRole};

mod prompts {
    pub const OVERVIEW_ROLE: &str = "You explain research funding to a general audience. \
Given a grant title and abstract, reply with a short plain-language paragraph on what \
the project does and why it matters. No preamble.";

    pub const OUTCOMES_ROLE: &str = "You summarize research outcomes for a general audience. \
Given a project outcomes report and a list of publications, reply with a short paragraph \
on what came out of the project. No preamble.";
}

/// Request for a plain-language overview of a grant
pub fn grant_overview_request(title: &str, abstract_text: &str) -> LLMRequest {
    LLMRequest {
        model: None,
        messages: vec![
            LLMMessage::system(prompts::OVERVIEW_ROLE),
            LLMMessage::user(format!("Title: {}\n\nAbstract: {}", title, abstract_text)),
        ],
        max_tokens: Some(512),
        temperature: Some(0.3),
    }
}

/// Request for a digest of a project's outcomes and publications
pub fn outcomes_digest_request(outcomes: &str, citation_lines: &[String]) -> LLMRequest {
    let publications = if citation_lines.is_empty() {
        "(none listed)".to_string()
    } else {
        citation_lines.join("\n")
    };
    LLMRequest {
        model: None,
        messages: vec![
            LLMMessage::system(prompts::OUTCOMES_ROLE),
            LLMMessage::user(format!(
                "Outcomes report: {}\n\nPublications:\n{}",
                outcomes, publications
            )),
        ],
        max_tokens: Some(512),
        temperature: Some(0.3),
    }
}
