use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::LabError;

/// Technologies a lab can focus on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technology {
    Docker,
    Kubernetes,
    Helm,
    Argocd,
    Ansible,
    Aws,
    Terraform,
}

impl Technology {
    pub const ALL: [Technology; 7] = [
        Technology::Docker,
        Technology::Kubernetes,
        Technology::Helm,
        Technology::Argocd,
        Technology::Ansible,
        Technology::Aws,
        Technology::Terraform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::Docker => "docker",
            Technology::Kubernetes => "kubernetes",
            Technology::Helm => "helm",
            Technology::Argocd => "argocd",
            Technology::Ansible => "ansible",
            Technology::Aws => "aws",
            Technology::Terraform => "terraform",
        }
    }

    /// Uniform pick, used by callers that leave the technology open.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        *Self::ALL.choose(&mut rng).unwrap_or(&Technology::Docker)
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Technology {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| LabError::UnknownTechnology(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Reads a one-word classification answer. Anything but an exact level yields `None`.
    pub fn parse_answer(answer: &str) -> Option<Self> {
        let normalized = answer.trim().to_lowercase();
        Self::ALL.into_iter().find(|d| d.as_str() == normalized)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for one lab generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub topic_title: String,
    pub topic_summary: String,
    pub technology: Technology,
    pub existing_labs: Vec<String>,
}

impl GenerationRequest {
    /// Resolves an open technology choice at random, so the pipeline itself only sees concrete inputs.
    pub fn new(
        topic_title: impl Into<String>,
        topic_summary: impl Into<String>,
        technology: Option<Technology>,
        existing_labs: Vec<String>,
    ) -> Self {
        Self {
            topic_title: topic_title.into(),
            topic_summary: topic_summary.into(),
            technology: technology.unwrap_or_else(Technology::random),
            existing_labs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Any other string keys the model put on the step.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// A validated lab as produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedLab {
    pub title: String,
    pub slug: String,
    pub technology: String,
    pub difficulty: String,
    pub description: String,
    pub objectives: Vec<String>,
    pub prerequisites: Vec<String>,
    pub steps: Vec<LabStep>,
    pub files: BTreeMap<String, String>,
    pub hints: Vec<String>,
    pub solution_notes: String,
}

impl GeneratedLab {
    /// Copy of this lab carrying another difficulty.
    pub fn with_difficulty(&self, difficulty: impl Into<String>) -> Self {
        Self {
            difficulty: difficulty.into(),
            ..self.clone()
        }
    }

    pub fn has_readme(&self) -> bool {
        self.files.contains_key("README.md")
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }
}
