//! Narrative claim summaries

use crate::config::{SummarizerConfig, SUMMARY_API_KEY_ENV};
use crate::error::{ClaimError, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use claimsat_algorithms::claim::ClaimDecision;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Produces a plain-language summary of a claim decision.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, decision: &ClaimDecision) -> Result<String>;
}

/// Prompt sent to the language model
pub fn build_prompt(decision: &ClaimDecision) -> String {
    format!(
        "You are an AI insurance assistant. Summarize this claim decision in plain English\n\
         for an insurance report. Make it concise but informative and explicitly mention that\n\
         the system compared the satellite-derived severity with validation confidence\n\
         via risk fusion before deciding.\n\
         \n\
         Hazard Type: {}\n\
         Damage Percentage: {:.2}%\n\
         Severity: {}\n\
         Validation Confidence: {} ({:.2})\n\
         Fused Score: {:.2}\n\
         Fused Label: {}\n\
         Decision: {}\n\
         Reason: {}\n\
         \n\
         Write a 3-5 sentence summary explaining what happened, how the severity and validation confidence\n\
         were fused, what the resulting risk level means, and why this decision was made.",
        decision.hazard,
        decision.damage_pct,
        decision.severity,
        decision.confidence_label,
        decision.confidence_score,
        decision.fused_score,
        decision.fused_label,
        decision.claim_status,
        decision.reason,
    )
}

/// Deterministic stand-in used whenever the summarizer fails
pub fn fallback_summary(decision: &ClaimDecision) -> String {
    format!(
        "Automated summary unavailable. {} The claim was marked {} with a fused score of {:.2} ({}).",
        decision.reason, decision.claim_status, decision.fused_score, decision.fused_label
    )
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Summarizer backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatSummarizer {
    client: HttpClient,
    url: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f64,
}

impl ChatSummarizer {
    /// Build from configuration; the API key is read from
    /// `CLAIMSAT_SUMMARY_API_KEY`.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let api_key = std::env::var(SUMMARY_API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        let client = HttpClient::new(Duration::from_secs(config.timeout_secs), 1)?;
        Ok(Self::new(client, config, api_key))
    }

    pub fn new(client: HttpClient, config: &SummarizerConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            url: format!("{}/chat/completions", config.endpoint.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

fn first_reply(resp: ChatResponse) -> Result<String> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ClaimError::Summary("model returned no text".into()))
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, decision: &ClaimDecision) -> Result<String> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(ClaimError::Summary(format!("{SUMMARY_API_KEY_ENV} is not set")));
        };
        let prompt = build_prompt(decision);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You generate concise insurance summaries.",
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let resp: ChatResponse = self.client.post_json(&self.url, Some(key), &body).await?;
        first_reply(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsat_algorithms::claim::{ClaimStatus, FusedLabel};
    use claimsat_algorithms::hazard::{HazardKind, Severity};
    use claimsat_algorithms::validation::ConfidenceLabel;

    fn decision() -> ClaimDecision {
        ClaimDecision {
            hazard: HazardKind::Flood,
            damage_pct: 65.0,
            severity: Severity::Severe,
            confidence_score: 0.64,
            confidence_label: ConfidenceLabel::Medium,
            fused_score: 0.65,
            fused_label: FusedLabel::Moderate,
            claim_status: ClaimStatus::ManualReview,
            reason: "Imagery analysis indicates severe flood damage.".into(),
        }
    }

    #[test]
    fn test_prompt_lists_decision_fields() {
        let prompt = build_prompt(&decision());
        assert!(prompt.contains("Hazard Type: flood"));
        assert!(prompt.contains("Damage Percentage: 65.00%"));
        assert!(prompt.contains("Validation Confidence: Medium (0.64)"));
        assert!(prompt.contains("Decision: Manual Review"));
        assert!(prompt.contains("3-5 sentence summary"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let text = fallback_summary(&decision());
        assert_eq!(text, fallback_summary(&decision()));
        assert!(text.ends_with("marked Manual Review with a fused score of 0.65 (Moderate)."));
    }

    #[tokio::test]
    async fn test_missing_key_is_summary_error() {
        let client = HttpClient::new(Duration::from_secs(1), 0).unwrap();
        let summarizer = ChatSummarizer::new(client, &SummarizerConfig::default(), None);
        let err = summarizer.summarize(&decision()).await.unwrap_err();
        assert!(matches!(err, ClaimError::Summary(ref m) if m.contains(SUMMARY_API_KEY_ENV)));
    }

    #[test]
    fn test_reply_extraction() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant", "content": "  Flood claim.  "}}]}"#)
                .unwrap();
        assert_eq!(first_reply(resp).unwrap(), "Flood claim.");
        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(first_reply(empty).is_err());
    }
}
