use std::env;
use std::time::Duration;

use crate::error::LabError;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

#[derive(Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Applied to the HTTP client; `None` means requests may wait indefinitely.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }

    /// Reads `GEMINI_API_KEY`, `GEMINI_API_BASE`, `GEMINI_MODEL` and `GEMINI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, LabError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LabError> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(LabError::MissingCredential)?;

        let mut config = Self::new(api_key);
        if let Some(base) = lookup("GEMINI_API_BASE").filter(|v| !v.is_empty()) {
            config.base_url = base;
        }
        if let Some(model) = lookup("GEMINI_MODEL").filter(|v| !v.is_empty()) {
            config.model = model;
        }
        if let Some(secs) = lookup("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                LabError::InvalidConfig(format!("GEMINI_TIMEOUT_SECS must be a whole number of seconds, got {secs:?}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
