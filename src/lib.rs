//! Generates hands-on DevOps lab exercises from trending topics using the
//! Gemini text API.
//!
//! The pipeline builds a prompt, calls the model, and decodes the answer into
//! a validated [`GeneratedLab`], retrying the whole unit with exponential
//! backoff. A separate, unretried call can re-assess a lab's difficulty.

pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod models;
pub mod parser;
pub mod prompt;
pub mod retry;

pub use config::GeneratorConfig;
pub use error::{GeminiError, LabError};
pub use gemini::{GeminiClient, SamplingConfig, TextModel};
pub use generator::LabGenerator;
pub use models::{Difficulty, GeneratedLab, GenerationRequest, LabStep, Technology};
pub use retry::RetryPolicy;
