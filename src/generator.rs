use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::LabError;
use crate::gemini::{GeminiClient, SamplingConfig, TextModel};
use crate::models::{Difficulty, GeneratedLab, GenerationRequest, Technology};
use crate::parser::parse_lab_response;
use crate::prompt::{build_difficulty_prompt, build_lab_prompt};
use crate::retry::RetryPolicy;

/// Generates DevOps labs from trending topics.
pub struct LabGenerator<M = GeminiClient> {
    model: M,
    retry: RetryPolicy,
}

impl LabGenerator<GeminiClient> {
    /// Builds a Gemini-backed generator from the environment.
    /// Fails with [`LabError::MissingCredential`] when no API key is configured.
    pub fn from_env() -> Result<Self, LabError> {
        let config = GeneratorConfig::from_env()?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self, LabError> {
        info!("Using Gemini model {} at {}", config.model, config.base_url);
        Ok(Self::new(GeminiClient::new(config)?))
    }
}

impl<M: TextModel> LabGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model, retry: RetryPolicy::default() }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Generates a lab. When `technology` is `None` one is picked at random.
    pub async fn generate(
        &self,
        topic_title: &str,
        topic_summary: &str,
        technology: Option<Technology>,
        existing_labs: &[String],
    ) -> Result<GeneratedLab, LabError> {
        let request = GenerationRequest::new(topic_title, topic_summary, technology, existing_labs.to_vec());
        self.generate_request(&request).await
    }

    /// Prompt, call and parse as one unit, retried under the generator's policy.
    pub async fn generate_request(&self, request: &GenerationRequest) -> Result<GeneratedLab, LabError> {
        let technology = request.technology.as_str();
        info!("Generating {} lab with Gemini...", technology.to_uppercase());
        info!("   Topic: {}...", truncate_chars(&request.topic_title, 50));

        let lab = self.retry.run(|| self.generate_once(request)).await?;

        info!("✅ Generated: {}", lab.title);
        info!("   Difficulty: {}", lab.difficulty);
        info!("   Files: {:?}", lab.file_names());
        if !lab.has_readme() {
            info!("⚠️ Lab '{}' has no README.md", lab.slug);
        }
        Ok(lab)
    }

    async fn generate_once(&self, request: &GenerationRequest) -> Result<GeneratedLab, LabError> {
        let prompt = build_lab_prompt(
            &request.topic_title,
            &request.topic_summary,
            request.technology.as_str(),
            &request.existing_labs,
        );
        let raw = self.model.generate(&prompt, &SamplingConfig::LAB).await?;
        parse_lab_response(&raw)
    }

    /// Asks the model for a second opinion on the lab's difficulty.
    ///
    /// An answer other than easy, medium or hard keeps the lab's current value.
    /// Transport errors are returned as-is; this call is never retried.
    pub async fn reassess_difficulty(&self, lab: &GeneratedLab) -> Result<String, LabError> {
        let prompt = build_difficulty_prompt(lab);
        let answer = self.model.generate(&prompt, &SamplingConfig::DIFFICULTY).await?;

        match Difficulty::parse_answer(&answer) {
            Some(difficulty) => {
                if difficulty.as_str() != lab.difficulty {
                    info!("Difficulty of '{}' reassessed: {} -> {}", lab.slug, lab.difficulty, difficulty);
                }
                Ok(difficulty.as_str().to_string())
            }
            None => {
                info!("Ignoring difficulty answer {:?} for '{}'", answer, lab.slug);
                Ok(lab.difficulty.clone())
            }
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
