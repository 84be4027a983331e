//! AI Client — the single point of entry for skill-evaluation LLM calls.
//!
//! The provider is fixed once at startup ([`crate::config::AiProvider`],
//! injected via [`AiClient::new`]) — selecting an unconfigured provider is a
//! startup error, never a per-call one. Each generate() is one blocking
//! request with no automatic retry; the orchestrator owns retry policy.
//!
//! Parse failures (`InvalidResponse`) are deliberately distinct from
//! transport failures (`ProviderUnavailable`): "reachable but returned
//! garbage" and "unreachable" page different operators.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::AiProvider;
use crate::models::evaluation::CandidateEvaluation;

pub mod prompts;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";

const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("AI provider unreachable: {0}")]
    ProviderUnavailable(String),

    #[error("AI provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid JSON response from AI")]
    InvalidResponse,

    #[error("AI returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// LLM client for the configured provider. Cheap to clone; shares the
/// underlying reqwest connection pool.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    provider: AiProvider,
    api_key: String,
}

impl AiClient {
    pub fn new(provider: AiProvider, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            provider,
            api_key,
        }
    }

    /// Sends `prompt` to the configured provider and parses the response
    /// into candidate evaluations. One request, no retry.
    pub async fn generate(
        &self,
        prompt: &str,
    ) -> Result<Vec<CandidateEvaluation>, GenerationError> {
        let raw = match self.provider {
            AiProvider::OpenAi => self.call_openai(prompt).await?,
            AiProvider::Gemini => self.call_gemini(prompt).await?,
        };

        debug!(provider = %self.provider, bytes = raw.len(), "AI response received");
        parse_evaluations(&raw)
    }

    async fn call_openai(&self, prompt: &str) -> Result<String, GenerationError> {
        let request_body = OpenAiRequest {
            model: OPENAI_MODEL,
            messages: vec![OpenAiMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GenerationError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::ProviderUnavailable(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(GenerationError::EmptyContent)
    }

    async fn call_gemini(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{GEMINI_API_URL}/{GEMINI_MODEL}:generateContent");
        let request_body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GenerationError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::ProviderUnavailable(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(GenerationError::EmptyContent)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response normalization
// ────────────────────────────────────────────────────────────────────────────

/// Parses the raw model output into evaluations.
///
/// Tolerated provider quirks: markdown code fences around the payload, and a
/// bare object where an array was requested (wrapped into a one-element
/// sequence). Anything else unparseable is `InvalidResponse`.
pub fn parse_evaluations(raw: &str) -> Result<Vec<CandidateEvaluation>, GenerationError> {
    let text = strip_json_fences(raw);

    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        error!("AI returned invalid JSON ({e}): {raw}");
        GenerationError::InvalidResponse
    })?;

    let mut evaluations: Vec<CandidateEvaluation> = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value).map_err(|e| {
            error!("AI response array did not match the evaluation schema: {e}");
            GenerationError::InvalidResponse
        })?,
        serde_json::Value::Object(_) => {
            let single: CandidateEvaluation = serde_json::from_value(value).map_err(|e| {
                error!("AI response object did not match the evaluation schema: {e}");
                GenerationError::InvalidResponse
            })?;
            vec![single]
        }
        _ => {
            error!("AI response was neither an object nor an array: {raw}");
            return Err(GenerationError::InvalidResponse);
        }
    };

    if evaluations.is_empty() {
        return Err(GenerationError::EmptyContent);
    }

    for evaluation in &mut evaluations {
        evaluation.normalize();
    }

    Ok(evaluations)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_OBJECT: &str = r#"{
        "candidateName": "Jane Doe",
        "totalExperience": "8 years",
        "jdClarificationProvided": "NO",
        "relevantExperience": "5 years",
        "noticePeriod": "30 days",
        "skills": [
            {"id": 1, "skillName": "Primary Skill - Go", "mandatory": "Mandatory"}
        ]
    }"#;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n[{\"candidateName\": \"Jane\"}]\n```";
        assert_eq!(strip_json_fences(input), "[{\"candidateName\": \"Jane\"}]");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "[{\"candidateName\": \"Jane\"}]";
        assert_eq!(strip_json_fences(input), input);
    }

    #[test]
    fn test_parse_array_response() {
        let raw = format!("[{SINGLE_OBJECT}]");
        let evaluations = parse_evaluations(&raw).unwrap();
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0].candidate_name, "Jane Doe");
        assert_eq!(evaluations[0].skills[0].skill_name, "Primary Skill - Go");
    }

    #[test]
    fn test_single_object_is_wrapped_into_sequence() {
        let evaluations = parse_evaluations(SINGLE_OBJECT).unwrap();
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0].candidate_name, "Jane Doe");
    }

    #[test]
    fn test_fenced_response_still_parses() {
        let raw = format!("```json\n[{SINGLE_OBJECT}]\n```");
        let evaluations = parse_evaluations(&raw).unwrap();
        assert_eq!(evaluations.len(), 1);
    }

    #[test]
    fn test_prose_response_is_invalid() {
        let result = parse_evaluations("Sure! Here is the evaluation you asked for.");
        assert!(matches!(result, Err(GenerationError::InvalidResponse)));
    }

    #[test]
    fn test_scalar_response_is_invalid() {
        let result = parse_evaluations("42");
        assert!(matches!(result, Err(GenerationError::InvalidResponse)));
    }

    #[test]
    fn test_empty_array_is_empty_content() {
        let result = parse_evaluations("[]");
        assert!(matches!(result, Err(GenerationError::EmptyContent)));
    }

    #[test]
    fn test_parse_normalizes_skill_ids() {
        let raw = r#"[{
            "candidateName": "Jane",
            "skills": [
                {"id": 3, "skillName": "Rust"},
                {"id": 3, "skillName": "Go"}
            ]
        }]"#;
        let evaluations = parse_evaluations(raw).unwrap();
        let ids: Vec<u32> = evaluations[0].skills.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
