//! Prompt text for the two model calls: full lab generation and the
//! difficulty double-check.
//!
//! Both builders are pure. The technology tag is embedded as given, so an
//! unrecognised tag simply reaches the model verbatim.

use crate::models::GeneratedLab;

/// How many of the most recent existing labs are listed as duplicates to avoid.
pub const MAX_EXISTING_LABS: usize = 20;

const TECHNOLOGY_EXAMPLES: &str = "\
- docker: Dockerfile optimization, multi-stage builds, compose, networking
- kubernetes: deployments, services, configmaps, secrets, ingress
- helm: chart creation, values, dependencies, hooks
- argocd: GitOps setup, app-of-apps, sync policies, rollbacks
- ansible: playbooks, roles, inventories, vault, dynamic inventory
- aws: S3, EC2, IAM, VPC, Lambda
- terraform: infrastructure as code, modules, state management, providers";

const DIFFICULTY_RUBRIC: &str = "\
   - easy: Basic concepts, simple commands, < 45 min
   - medium: Multiple components, debugging needed, 45-75 min
   - hard: Complex architecture, troubleshooting, > 75 min";

/// The tail of `existing_labs` that fits in the prompt.
pub fn recent_labs(existing_labs: &[String]) -> &[String] {
    let start = existing_labs.len().saturating_sub(MAX_EXISTING_LABS);
    &existing_labs[start..]
}

fn output_schema(technology: &str) -> String {
    format!(
        r##"{{
  "title": "Short descriptive title (max 60 chars)",
  "slug": "lowercase-hyphenated-slug",
  "technology": "{technology}",
  "difficulty": "easy|medium|hard",
  "description": "2-3 sentence description of what the lab teaches",
  "objectives": [
    "Learning objective 1",
    "Learning objective 2",
    "Learning objective 3"
  ],
  "prerequisites": [
    "Prerequisite 1 (e.g., Docker installed)",
    "Prerequisite 2"
  ],
  "steps": [
    {{
      "title": "Step 1 title",
      "content": "Detailed instructions with commands in markdown code blocks"
    }},
    {{
      "title": "Step 2 title",
      "content": "More instructions..."
    }}
  ],
  "files": {{
    "Dockerfile": "# Dockerfile content here...",
    "docker-compose.yml": "version: '3.8'\nservices:...",
    "README.md": "# Lab Title\n\n## Description\n..."
  }},
  "hints": [
    "Hint if stuck on step 1",
    "Hint for common mistakes"
  ],
  "solution_notes": "Brief explanation of the complete solution"
}}"##
    )
}

/// Builds the lab generation prompt for a topic.
pub fn build_lab_prompt(
    topic_title: &str,
    topic_summary: &str,
    technology: &str,
    existing_labs: &[String],
) -> String {
    let existing = recent_labs(existing_labs)
        .iter()
        .map(|lab| format!("- {lab}"))
        .collect::<Vec<_>>()
        .join("\n");
    let tech_upper = technology.to_uppercase();
    let schema = output_schema(technology);

    format!(
        r#"You are an expert DevOps engineer and technical educator.
Generate a hands-on lab exercise for learning {tech_upper}.

## Context
The lab should be inspired by this trending topic:
**Title:** {topic_title}
**Summary:** {topic_summary}

## Requirements
1. Create a PRACTICAL, HANDS-ON lab (not just reading/theory)
2. The lab should take 30-90 minutes to complete
3. Include real commands, real files, real configurations
4. Progressive difficulty with clear steps
5. Must be completable on a local machine (Docker Desktop, minikube, etc.)
6. Avoid emojis, slang, or informal language
7. Document a complete lab that can be used directly, but do NOT give the direct step-by-step solution: provide only hints and high-level solution notes

## Existing Labs (avoid duplicates)
{existing}

## Technology Focus: {tech_upper}
Generate a lab specifically for {technology}. Examples:
{TECHNOLOGY_EXAMPLES}

## Output Format (JSON)
Return a valid JSON object with this exact structure:
```json
{schema}
```

## Important Rules
1. The "files" object MUST include a complete README.md
2. Include ALL necessary files (Dockerfile, configs, scripts, etc.)
3. Use realistic, production-like examples
4. Difficulty assessment should be honest based on:
{DIFFICULTY_RUBRIC}
5. Return ONLY the JSON object, no markdown wrapper, no extra text

Generate the lab now:"#
    )
}

/// Builds the one-word difficulty classification prompt for an existing lab.
pub fn build_difficulty_prompt(lab: &GeneratedLab) -> String {
    format!(
        r#"Assess the difficulty of this DevOps lab:

Title: {title}
Technology: {technology}
Description: {description}
Number of steps: {steps}
Files included: {files:?}

Prerequisites: {prerequisites:?}

Based on:
- Complexity of concepts
- Time to complete
- Required prior knowledge
- Debugging/troubleshooting needed

Use this scale:
{DIFFICULTY_RUBRIC}

Return ONLY one word: easy, medium, or hard"#,
        title = lab.title,
        technology = lab.technology,
        description = lab.description,
        steps = lab.steps.len(),
        files = lab.file_names(),
        prerequisites = lab.prerequisites,
    )
}
