//! Canonical audit analysis model
//!
//! This is the guaranteed shape every audit response has after validation.
//! Field names follow the JSON contract the audit prompt requests from the
//! model, so a validated response serializes back to the same wire format.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Severity of a reported problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Important,
    Minor,
}

/// Priority of an action item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Per-category score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    /// Score awarded for this category, 0-100
    pub score: i64,
    /// Weight of this category in the overall readiness score
    pub max_weight: i64,
    pub notes: String,
}

/// Fixed set of audit categories
///
/// Modeled as named fields rather than a map so the response always carries
/// exactly these nine categories, no more, no fewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub title_and_keywords: CategoryScore,
    #[serde(rename = "abstract")]
    pub abstract_: CategoryScore,
    pub introduction: CategoryScore,
    pub methods: CategoryScore,
    pub results: CategoryScore,
    pub discussion: CategoryScore,
    pub ethics_and_transparency: CategoryScore,
    pub writing_quality: CategoryScore,
    pub zero_i_perspective: CategoryScore,
}

/// What kind of document the model believes it audited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentClassification {
    pub manuscript_type: String,
    pub discipline: String,
    pub study_design: String,
    pub reporting_guideline: String,
}

/// A problem severe enough to risk outright rejection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriticalIssue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Reference into the Understanding Medical Research curriculum
    pub uma_reference: String,
}

/// A single section-level finding with a suggested fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub section: String,
    pub finding: String,
    pub suggestion: String,
    pub why_it_matters: String,
    pub severity: Severity,
    pub resource_topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_source: Option<String>,
}

/// A discrete remediation task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub task: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Always false after validation; only the user may complete a task
    pub completed: bool,
}

/// Rhetorical-move analysis of the abstract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AbstractAnalysis {
    pub has_background: bool,
    pub has_objective: bool,
    pub has_methods: bool,
    pub has_results: bool,
    pub has_conclusion: bool,
    pub feedback: String,
}

/// First-person-free ("zero-I") writing compliance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZeroIPerspective {
    pub compliant: bool,
    pub violations: Vec<String>,
    pub feedback: String,
}

/// A curated learning resource attached to the audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearnLink {
    pub title: String,
    pub description: String,
    pub topic: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Complete validated audit response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// Publication-submission readiness estimate, 0-100
    pub readiness_score: i64,
    pub executive_summary: String,
    pub document_classification: DocumentClassification,
    pub score_breakdown: ScoreBreakdown,
    pub critical_issues: Vec<CriticalIssue>,
    pub detailed_feedback: Vec<FeedbackItem>,
    pub action_items: Vec<ActionItem>,
    /// Absent means "not evaluated", distinct from "evaluated and compliant"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstract_analysis: Option<AbstractAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_i_perspective: Option<ZeroIPerspective>,
    pub strengths_to_maintain: Vec<String>,
    pub learn_links: Vec<LearnLink>,
}

/// A validated response together with its rigor warnings
///
/// Warnings describe quality shortfalls of the audit output itself (sparse
/// feedback, missing text quoting). They are an observability signal carried
/// next to the response, never inside it, and never alter the data.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedAnalysis {
    pub response: AnalysisResponse,
    pub warnings: Vec<String>,
}
