use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::GeneratorConfig;
use crate::error::{GeminiError, LabError};

/// Sampling knobs sent with every generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl SamplingConfig {
    /// Full lab generation.
    pub const LAB: SamplingConfig = SamplingConfig { temperature: 0.7, max_output_tokens: 8192 };
    /// One-word difficulty answer.
    pub const DIFFICULTY: SamplingConfig = SamplingConfig { temperature: 0.1, max_output_tokens: 10 };
}

/// Anything that turns a prompt into raw text.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, GeminiError>;
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeneratorConfig) -> Result<Self, LabError> {
        if config.api_key.trim().is_empty() {
            return Err(LabError::MissingCredential);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| LabError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent?key={}", self.base_url, self.model, self.api_key)
    }

    fn redact(&self, text: &str) -> String {
        text.replace(&self.api_key, "***")
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, GeminiError> {
        let url = self.endpoint();
        debug!("🔗 Making request to: {}", self.redact(&url));

        let payload = build_request_body(prompt, sampling);

        let response = self.client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.without_url()))?;

        let status = response.status();
        let response_text = response.text().await
            .map_err(|e| GeminiError::Transport(e.without_url()))?;

        if !status.is_success() {
            let body = self.redact(&response_text);
            error!("❌ Gemini API text generation failed with status {}: {}", status, body);
            return Err(GeminiError::Http { status: status.as_u16(), body });
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Envelope(e.to_string()))?;

        extract_text(&parsed)
    }
}

fn build_request_body(prompt: &str, sampling: &SamplingConfig) -> serde_json::Value {
    json!({
        "contents": [{
            "parts": [{"text": prompt}]
        }],
        "generationConfig": {
            "temperature": sampling.temperature,
            "maxOutputTokens": sampling.max_output_tokens
        }
    })
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    #[allow(dead_code)]
    Other(serde_json::Value),
}

/// Joins the text parts of the first candidate.
fn extract_text(resp: &GeminiResponse) -> Result<String, GeminiError> {
    let Some(candidate) = resp.candidates.first() else {
        info!("⚠️ No candidates in Gemini response");
        return Err(GeminiError::EmptyResponse { finish_reason: None });
    };

    let texts: Vec<&str> = candidate.content.parts.iter()
        .filter_map(|p| match p {
            Part::Text { text } => Some(text.as_str()),
            Part::Other(_) => None,
        })
        .collect();

    if texts.is_empty() {
        return Err(GeminiError::EmptyResponse { finish_reason: candidate.finish_reason.clone() });
    }
    Ok(texts.concat())
}
