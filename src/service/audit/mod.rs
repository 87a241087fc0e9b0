//! Manuscript audit service using LLM
//!
//! Sends the manuscript to the model and turns whatever comes back into a
//! guaranteed-shape analysis. Validation is two composed pure stages:
//! [`normalize::normalize`] coerces the untrusted JSON into the canonical
//! shape, [`rigor::enforce_rigor`] applies the business rules and computes
//! advisory warnings.

use std::time::Instant;

use rig::providers::openai;
use serde_json::Value;

use crate::model::{Manuscript, ValidatedAnalysis};
use crate::service::audit::prompts::{build_audit_prompt, AUDIT_SYSTEM_PROMPT};
use crate::service::llm::LlmClient;

/// Environment variable for the audit model
const ENV_AUDIT_MODEL: &str = "AUDIT_MODEL";

/// Default model for manuscript audits
const DEFAULT_MODEL: &str = openai::GPT_4O;

pub mod error;
pub mod normalize;
pub mod prompts;
pub mod rigor;

pub use error::AuditError;

/// Validate a raw LLM response value.
///
/// Total function: every input, including null and non-objects, yields a
/// well-formed [`ValidatedAnalysis`]. There is no error path; failure is a
/// low-content, clearly labeled response.
pub fn validate(raw: &Value) -> ValidatedAnalysis {
    rigor::enforce_rigor(normalize::normalize(raw))
}

/// Service for running manuscript audits
pub struct AuditService {
    llm_client: LlmClient,
    model: String,
}

impl AuditService {
    /// Creates a new audit service
    ///
    /// Uses a shared LLM client passed from startup.
    /// Optionally uses AUDIT_MODEL env var (defaults to gpt-4o)
    pub fn new(llm_client: LlmClient) -> Self {
        let model = std::env::var(ENV_AUDIT_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        tracing::info!(model = %model, "Audit service initialized");

        Self { llm_client, model }
    }

    /// Run a full audit for a manuscript and return the validated analysis
    pub async fn audit(
        &self,
        manuscript: &Manuscript,
        help_types: &[String],
    ) -> Result<ValidatedAnalysis, AuditError> {
        let start_time = Instant::now();

        let prompt = build_audit_prompt(manuscript, help_types);
        let prompt_length = prompt.len();

        tracing::debug!(
            manuscript = %manuscript.id,
            model = %self.model,
            prompt_length = prompt_length,
            "Initiating LLM call for manuscript audit"
        );

        let completion = match self
            .llm_client
            .complete(&self.model, AUDIT_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(text) => {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    manuscript = %manuscript.id,
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    prompt_length = prompt_length,
                    "LLM call for manuscript audit completed successfully"
                );
                text
            }
            Err(e) => {
                let elapsed = start_time.elapsed();
                tracing::error!(
                    manuscript = %manuscript.id,
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    error = %e,
                    "LLM call for manuscript audit failed"
                );
                return Err(AuditError::CompletionFailed(e));
            }
        };

        let raw = parse_completion(&completion);
        let validated = validate(&raw);

        // Rigor warnings are observability signals, logged here so the
        // validation stages stay pure.
        for warning in &validated.warnings {
            tracing::warn!(
                manuscript = %manuscript.id,
                warning = %warning,
                "Audit rigor warning"
            );
        }

        Ok(validated)
    }
}

/// Parse the raw completion text into a JSON value.
///
/// Models wrap JSON in markdown fences often enough that stripping them is
/// part of the contract. Unparseable text degrades to `Value::Null`, which
/// the validator resolves to the labeled empty response; a garbled
/// completion must never crash an audit.
fn parse_completion(text: &str) -> Value {
    let trimmed = text.trim();

    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                error = %e,
                completion_length = text.len(),
                "Completion was not valid JSON, treating as empty response"
            );
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_completion_plain_json() {
        let value = parse_completion(r#"{"readinessScore": 70}"#);
        assert_eq!(value["readinessScore"], json!(70));
    }

    #[test]
    fn test_parse_completion_strips_markdown_fences() {
        let fenced = "```json\n{\"readinessScore\": 70}\n```";
        assert_eq!(parse_completion(fenced)["readinessScore"], json!(70));

        let bare_fence = "```\n{\"readinessScore\": 55}\n```";
        assert_eq!(parse_completion(bare_fence)["readinessScore"], json!(55));
    }

    #[test]
    fn test_parse_completion_garbage_degrades_to_null() {
        assert_eq!(parse_completion("I could not audit this manuscript."), Value::Null);
        assert_eq!(parse_completion(""), Value::Null);
    }

    #[test]
    fn test_validate_composes_normalization_and_rigor() {
        let raw = json!({
            "readinessScore": 90,
            "criticalIssues": [
                {"title": "Fabricated citations", "severity": "critical"}
            ]
        });

        let validated = validate(&raw);

        // Normalization kept the issue, rigor capped the score and covered it
        assert_eq!(validated.response.readiness_score, 80);
        assert_eq!(validated.response.action_items.len(), 1);
        assert_eq!(
            validated.response.action_items[0].task,
            "Address critical issue: Fabricated citations"
        );
        // Sparse output warnings fire for this thin response
        assert!(!validated.warnings.is_empty());
    }

    #[test]
    fn test_validate_is_total_over_adversarial_inputs() {
        for raw in [
            Value::Null,
            json!([]),
            json!({}),
            json!("string"),
            json!({"scoreBreakdown": [1, 2, 3], "actionItems": {"task": "x"}}),
        ] {
            let validated = validate(&raw);
            assert!((0..=100).contains(&validated.response.readiness_score));
            assert!(validated.response.action_items.iter().all(|a| !a.completed));
        }
    }
}
