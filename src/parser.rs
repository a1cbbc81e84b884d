//! Turns the model's raw text into a [`GeneratedLab`].
//!
//! Decoding happens in two phases: the text is first read into a generic JSON
//! object, then a single materialization step checks the required keys and
//! fills in defaults for the optional ones. Values are not checked beyond
//! their JSON shape: a slug that is not hyphenated or a difficulty outside
//! easy/medium/hard is kept as the model wrote it.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::LabError;
use crate::models::GeneratedLab;

pub const REQUIRED_FIELDS: [&str; 8] = [
    "title",
    "slug",
    "technology",
    "difficulty",
    "description",
    "objectives",
    "steps",
    "files",
];

const FENCE: &str = "```";
const PREVIEW_CHARS: usize = 500;

/// Removes a surrounding code fence.
///
/// Only the first and last lines are dropped, so a response with prose
/// before the fence or an unterminated fence is passed on malformed.
pub fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed.to_string();
    }
    let lines: Vec<&str> = trimmed.split('\n').collect();
    if lines.len() <= 2 {
        return String::new();
    }
    lines[1..lines.len() - 1].join("\n")
}

/// First 500 characters of `text`, for error reports.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

pub fn parse_lab_response(raw: &str) -> Result<GeneratedLab, LabError> {
    let text = strip_code_fence(raw);
    let object: Map<String, Value> = serde_json::from_str(&text).map_err(|source| LabError::ResponseParse {
        source,
        preview: preview(&text),
    })?;
    materialize(object)
}

/// Validates the required keys of a decoded object and builds the record.
pub fn materialize(object: Map<String, Value>) -> Result<GeneratedLab, LabError> {
    if let Some(field) = REQUIRED_FIELDS.into_iter().find(|f| !object.contains_key(*f)) {
        return Err(LabError::MissingField { field });
    }

    Ok(GeneratedLab {
        title: required(&object, "title")?,
        slug: required(&object, "slug")?,
        technology: required(&object, "technology")?,
        difficulty: required(&object, "difficulty")?,
        description: required(&object, "description")?,
        objectives: optional(&object, "objectives")?,
        prerequisites: optional(&object, "prerequisites")?,
        steps: optional(&object, "steps")?,
        files: optional(&object, "files")?,
        hints: optional(&object, "hints")?,
        solution_notes: optional(&object, "solution_notes")?,
    })
}

fn required<T: DeserializeOwned>(object: &Map<String, Value>, field: &'static str) -> Result<T, LabError> {
    let value = object.get(field).cloned().ok_or(LabError::MissingField { field })?;
    serde_json::from_value(value).map_err(|source| LabError::InvalidField { field, source })
}

// absent and null both mean "use the default"
fn optional<T: DeserializeOwned + Default>(object: &Map<String, Value>, field: &'static str) -> Result<T, LabError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|source| LabError::InvalidField { field, source })
        }
    }
}
