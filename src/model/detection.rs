//! Paper-type detection model

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Research-design category used to select audit criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PaperType {
    QuantitativeExperimental,
    Observational,
    Qualitative,
    SystematicReview,
    MixedMethods,
    CaseReport,
    /// Fallback when no category scores any keywords; never scored directly
    Generic,
}

impl PaperType {
    /// Stable identifier, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperType::QuantitativeExperimental => "quantitative-experimental",
            PaperType::Observational => "observational",
            PaperType::Qualitative => "qualitative",
            PaperType::SystematicReview => "systematic-review",
            PaperType::MixedMethods => "mixed-methods",
            PaperType::CaseReport => "case-report",
            PaperType::Generic => "generic",
        }
    }

    /// Human-readable label used in explanations and the UI
    pub fn label(&self) -> &'static str {
        match self {
            PaperType::QuantitativeExperimental => "Quantitative (Experimental)",
            PaperType::Observational => "Observational Study",
            PaperType::Qualitative => "Qualitative Research",
            PaperType::SystematicReview => "Systematic Review / Meta-Analysis",
            PaperType::MixedMethods => "Mixed Methods",
            PaperType::CaseReport => "Case Report",
            PaperType::Generic => "General Manuscript",
        }
    }

    /// Parse the stable identifier back into a paper type
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "quantitative-experimental" => Some(PaperType::QuantitativeExperimental),
            "observational" => Some(PaperType::Observational),
            "qualitative" => Some(PaperType::Qualitative),
            "systematic-review" => Some(PaperType::SystematicReview),
            "mixed-methods" => Some(PaperType::MixedMethods),
            "case-report" => Some(PaperType::CaseReport),
            "generic" => Some(PaperType::Generic),
            _ => None,
        }
    }
}

/// Detector's self-assessed certainty in its guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DetectionConfidence {
    High,
    Medium,
    Low,
}

/// Outcome of a single detection call
///
/// Ephemeral; only the chosen paper type is persisted on the manuscript.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub detected_type: PaperType,
    pub confidence: DetectionConfidence,
    pub explanation: String,
    /// Matched keywords per category id, for every category that matched at
    /// least one keyword (not just the winner)
    pub keywords_found: BTreeMap<String, Vec<String>>,
    /// Number of distinct keywords matched by the winning category
    pub top_match_count: usize,
}
