use thiserror::Error;

/// Failures surfaced by the external text model itself.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    #[error("HTTP error: status={status} body={body}")]
    Http { status: u16, body: String },
    #[error("could not decode Gemini envelope: {0}")]
    Envelope(String),
    #[error("no text content in response (finish reason: {})", .finish_reason.as_deref().unwrap_or("unknown"))]
    EmptyResponse { finish_reason: Option<String> },
}

#[derive(Debug, Error)]
pub enum LabError {
    #[error("GEMINI_API_KEY environment variable is required")]
    MissingCredential,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("model invocation failed: {0}")]
    Invocation(#[from] GeminiError),
    #[error("failed to parse Gemini response as JSON: {source}; response preview: {preview}")]
    ResponseParse {
        #[source]
        source: serde_json::Error,
        preview: String,
    },
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for field `{field}`: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown technology: {0}")]
    UnknownTechnology(String),
}
