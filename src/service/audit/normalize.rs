//! Field-level normalization of raw audit responses
//!
//! Takes the untrusted JSON value an LLM produced and coerces it into the
//! canonical [`AnalysisResponse`] shape. The policy throughout: coerce
//! toward validity, drop what cannot be salvaged, and never let one invalid
//! nested value take down the whole object. This function is total; every
//! input, however malformed, yields a well-formed response.

use serde_json::{Map, Value};
use url::Url;

use crate::model::{
    AbstractAnalysis, ActionItem, AnalysisResponse, CategoryScore, CriticalIssue,
    DocumentClassification, FeedbackItem, LearnLink, Priority, ScoreBreakdown, Severity,
    ZeroIPerspective,
};

/// Summary used when the model returned something other than a JSON object
pub const INVALID_RESPONSE_MSG: &str = "AI returned invalid response format";

/// Summary used when the response object carried no usable summary text
const DEFAULT_SUMMARY: &str = "No executive summary was provided for this analysis.";

/// Notes placed on score categories the model did not fill in
const NOT_EVALUATED: &str = "Not evaluated";

const UNKNOWN: &str = "Unknown";
const NOT_APPLICABLE: &str = "N/A";

// Default per-category weights; they sum to 100.
const WEIGHT_TITLE_AND_KEYWORDS: i64 = 5;
const WEIGHT_ABSTRACT: i64 = 10;
const WEIGHT_INTRODUCTION: i64 = 10;
const WEIGHT_METHODS: i64 = 20;
const WEIGHT_RESULTS: i64 = 15;
const WEIGHT_DISCUSSION: i64 = 15;
const WEIGHT_ETHICS: i64 = 10;
const WEIGHT_WRITING_QUALITY: i64 = 10;
const WEIGHT_ZERO_I: i64 = 5;

/// Normalize a raw LLM response into the canonical analysis shape.
///
/// Non-object input (null, string, array, number) yields the labeled empty
/// response so the caller can render a clear "analysis failed" state instead
/// of crashing on missing fields.
pub fn normalize(raw: &Value) -> AnalysisResponse {
    let Some(obj) = raw.as_object() else {
        return empty_response(INVALID_RESPONSE_MSG);
    };

    let executive_summary = non_empty_string(obj.get("executiveSummary"))
        .or_else(|| non_empty_string(obj.get("summary")))
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    AnalysisResponse {
        readiness_score: score_or(obj.get("readinessScore"), 0),
        executive_summary,
        document_classification: classification(obj.get("documentClassification")),
        score_breakdown: breakdown(obj.get("scoreBreakdown"), NOT_EVALUATED),
        critical_issues: critical_issues(obj.get("criticalIssues")),
        detailed_feedback: detailed_feedback(obj.get("detailedFeedback")),
        action_items: action_items(obj.get("actionItems")),
        abstract_analysis: abstract_analysis(obj.get("abstractAnalysis")),
        zero_i_perspective: zero_i_perspective(obj.get("zeroIPerspective")),
        strengths_to_maintain: string_list(obj.get("strengthsToMaintain")),
        learn_links: learn_links(obj.get("learnLinks")),
    }
}

/// Build the complete well-formed response used when the raw value was
/// unusable. The message lands in the executive summary and in the notes of
/// every score category.
pub fn empty_response(message: &str) -> AnalysisResponse {
    AnalysisResponse {
        readiness_score: 0,
        executive_summary: message.to_string(),
        document_classification: classification(None),
        score_breakdown: breakdown(None, message),
        critical_issues: Vec::new(),
        detailed_feedback: Vec::new(),
        action_items: Vec::new(),
        abstract_analysis: None,
        zero_i_perspective: None,
        strengths_to_maintain: Vec::new(),
        learn_links: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Section extractors
// ---------------------------------------------------------------------------

fn classification(value: Option<&Value>) -> DocumentClassification {
    let obj = value.and_then(Value::as_object);
    let field = |key: &str, default: &str| {
        obj.and_then(|m| non_empty_string(m.get(key)))
            .unwrap_or_else(|| default.to_string())
    };

    DocumentClassification {
        manuscript_type: field("manuscriptType", UNKNOWN),
        discipline: field("discipline", UNKNOWN),
        study_design: field("studyDesign", UNKNOWN),
        reporting_guideline: field("reportingGuideline", NOT_APPLICABLE),
    }
}

fn breakdown(value: Option<&Value>, default_notes: &str) -> ScoreBreakdown {
    let obj = value.and_then(Value::as_object);

    ScoreBreakdown {
        title_and_keywords: category(obj, "titleAndKeywords", WEIGHT_TITLE_AND_KEYWORDS, default_notes),
        abstract_: category(obj, "abstract", WEIGHT_ABSTRACT, default_notes),
        introduction: category(obj, "introduction", WEIGHT_INTRODUCTION, default_notes),
        methods: category(obj, "methods", WEIGHT_METHODS, default_notes),
        results: category(obj, "results", WEIGHT_RESULTS, default_notes),
        discussion: category(obj, "discussion", WEIGHT_DISCUSSION, default_notes),
        ethics_and_transparency: category(obj, "ethicsAndTransparency", WEIGHT_ETHICS, default_notes),
        writing_quality: category(obj, "writingQuality", WEIGHT_WRITING_QUALITY, default_notes),
        zero_i_perspective: category(obj, "zeroIPerspective", WEIGHT_ZERO_I, default_notes),
    }
}

/// Extract one score category; a missing or malformed entry becomes a
/// complete default entry rather than failing the breakdown.
fn category(
    breakdown: Option<&Map<String, Value>>,
    key: &str,
    weight: i64,
    default_notes: &str,
) -> CategoryScore {
    match breakdown.and_then(|m| m.get(key)).and_then(Value::as_object) {
        Some(entry) => CategoryScore {
            score: score_or(entry.get("score"), 0),
            max_weight: int_or(entry.get("maxWeight"), weight),
            notes: string_or(entry.get("notes"), default_notes),
        },
        None => CategoryScore {
            score: 0,
            max_weight: weight,
            notes: default_notes.to_string(),
        },
    }
}

fn critical_issues(value: Option<&Value>) -> Vec<CriticalIssue> {
    elements(value)
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            // An issue without a title cannot be rendered or tracked
            let title = non_empty_string(obj.get("title"))?;
            Some(CriticalIssue {
                title,
                description: string_or(obj.get("description"), ""),
                severity: parse_severity(obj.get("severity")),
                uma_reference: string_or(obj.get("umaReference"), ""),
            })
        })
        .collect()
}

fn detailed_feedback(value: Option<&Value>) -> Vec<FeedbackItem> {
    elements(value)
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            let finding = non_empty_string(obj.get("finding"));
            let suggestion = non_empty_string(obj.get("suggestion"));
            // Entries carrying neither a finding nor a suggestion say nothing
            if finding.is_none() && suggestion.is_none() {
                return None;
            }
            Some(FeedbackItem {
                section: string_or(obj.get("section"), "General"),
                finding: finding.unwrap_or_default(),
                suggestion: suggestion.unwrap_or_default(),
                why_it_matters: string_or(obj.get("whyItMatters"), ""),
                severity: parse_severity(obj.get("severity")),
                resource_topic: string_or(obj.get("resourceTopic"), ""),
                resource_url: http_url(obj.get("resourceUrl")),
                resource_source: non_empty_string(obj.get("resourceSource")),
            })
        })
        .collect()
}

fn action_items(value: Option<&Value>) -> Vec<ActionItem> {
    elements(value)
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            let task = non_empty_string(obj.get("task"))?;
            Some(ActionItem {
                task,
                priority: parse_priority(obj.get("priority")),
                section: non_empty_string(obj.get("section")),
                // The system is the sole authority on completion state; the
                // model never gets to pre-complete a task.
                completed: false,
            })
        })
        .collect()
}

fn abstract_analysis(value: Option<&Value>) -> Option<AbstractAnalysis> {
    let obj = value.and_then(Value::as_object)?;
    Some(AbstractAnalysis {
        has_background: truthy(obj.get("hasBackground")),
        has_objective: truthy(obj.get("hasObjective")),
        has_methods: truthy(obj.get("hasMethods")),
        has_results: truthy(obj.get("hasResults")),
        has_conclusion: truthy(obj.get("hasConclusion")),
        feedback: string_or(obj.get("feedback"), ""),
    })
}

fn zero_i_perspective(value: Option<&Value>) -> Option<ZeroIPerspective> {
    let obj = value.and_then(Value::as_object)?;
    Some(ZeroIPerspective {
        compliant: truthy(obj.get("compliant")),
        violations: string_list(obj.get("violations")),
        feedback: string_or(obj.get("feedback"), ""),
    })
}

fn learn_links(value: Option<&Value>) -> Vec<LearnLink> {
    elements(value)
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            let title = non_empty_string(obj.get("title"))?;
            Some(LearnLink {
                title,
                description: string_or(obj.get("description"), ""),
                topic: string_or(obj.get("topic"), ""),
                url: http_url(obj.get("url")).unwrap_or_default(),
                source: non_empty_string(obj.get("source")),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Primitive coercions
// ---------------------------------------------------------------------------

/// Array elements, or an empty slice for anything that is not an array
fn elements(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// A string value that is non-empty after trimming
fn non_empty_string(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    non_empty_string(value).unwrap_or_else(|| default.to_string())
}

/// A numeric value rounded to the nearest integer and clamped to [0, 100];
/// anything that is not a JSON number falls back to the default.
fn score_or(value: Option<&Value>, default: i64) -> i64 {
    match value.and_then(Value::as_f64) {
        Some(n) => (n.round() as i64).clamp(0, 100),
        None => default,
    }
}

/// A numeric value rounded to the nearest integer, without range clamping
fn int_or(value: Option<&Value>, default: i64) -> i64 {
    match value.and_then(Value::as_f64) {
        Some(n) => n.round() as i64,
        None => default,
    }
}

/// JSON truthiness: null, false, 0, and "" are falsy; everything else,
/// including arrays and objects, is truthy.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// A string that parses as an absolute http(s) URL
fn http_url(value: Option<&Value>) -> Option<String> {
    let raw = non_empty_string(value)?;
    let url = Url::parse(&raw).ok()?;
    match url.scheme() {
        "http" | "https" => Some(raw),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    elements(value)
        .iter()
        .filter_map(|v| non_empty_string(Some(v)))
        .collect()
}

fn parse_severity(value: Option<&Value>) -> Severity {
    // "high"/"medium" are aliases: the model drifts between the two
    // vocabularies depending on prompt phrasing.
    match value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .as_deref()
    {
        Some("critical") | Some("high") => Severity::Critical,
        Some("important") | Some("medium") => Severity::Important,
        _ => Severity::Minor,
    }
}

fn parse_priority(value: Option<&Value>) -> Priority {
    match value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .as_deref()
    {
        Some("high") => Priority::High,
        Some("low") => Priority::Low,
        _ => Priority::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn breakdown_scores(b: &ScoreBreakdown) -> [i64; 9] {
        [
            b.title_and_keywords.score,
            b.abstract_.score,
            b.introduction.score,
            b.methods.score,
            b.results.score,
            b.discussion.score,
            b.ethics_and_transparency.score,
            b.writing_quality.score,
            b.zero_i_perspective.score,
        ]
    }

    #[test]
    fn test_non_object_input_yields_labeled_empty_response() {
        for raw in [
            Value::Null,
            json!("just a string"),
            json!([1, 2, 3]),
            json!(42),
        ] {
            let response = normalize(&raw);
            assert_eq!(response.readiness_score, 0);
            assert_eq!(response.executive_summary, INVALID_RESPONSE_MSG);
            assert_eq!(response.score_breakdown.methods.notes, INVALID_RESPONSE_MSG);
            assert!(response.critical_issues.is_empty());
            assert!(response.abstract_analysis.is_none());
        }
    }

    #[test]
    fn test_empty_object_gets_full_defaults() {
        let response = normalize(&json!({}));

        assert_eq!(response.readiness_score, 0);
        assert_eq!(
            response.executive_summary,
            "No executive summary was provided for this analysis."
        );
        assert_eq!(response.document_classification.manuscript_type, "Unknown");
        assert_eq!(response.document_classification.reporting_guideline, "N/A");
        assert_eq!(response.score_breakdown.methods.notes, "Not evaluated");
        assert_eq!(response.score_breakdown.methods.max_weight, 20);
        assert_eq!(breakdown_scores(&response.score_breakdown), [0; 9]);
    }

    #[test]
    fn test_readiness_score_is_rounded_and_clamped() {
        assert_eq!(normalize(&json!({"readinessScore": 150})).readiness_score, 100);
        assert_eq!(normalize(&json!({"readinessScore": -10})).readiness_score, 0);
        assert_eq!(normalize(&json!({"readinessScore": 75.6})).readiness_score, 76);
        assert_eq!(normalize(&json!({"readinessScore": 75.4})).readiness_score, 75);
        // Non-numeric score falls back to the default
        assert_eq!(normalize(&json!({"readinessScore": "85"})).readiness_score, 0);
    }

    #[test]
    fn test_summary_fallback_chain() {
        let primary = normalize(&json!({"executiveSummary": "Primary", "summary": "Secondary"}));
        assert_eq!(primary.executive_summary, "Primary");

        let secondary = normalize(&json!({"summary": "Secondary"}));
        assert_eq!(secondary.executive_summary, "Secondary");

        let whitespace = normalize(&json!({"executiveSummary": "   ", "summary": "Secondary"}));
        assert_eq!(whitespace.executive_summary, "Secondary");
    }

    #[test]
    fn test_breakdown_always_has_nine_categories_in_range() {
        let response = normalize(&json!({
            "scoreBreakdown": {
                "methods": {"score": 120, "maxWeight": 20, "notes": "thorough"},
                "abstract": {"score": -5},
                "unexpectedCategory": {"score": 50},
                "results": "not an object"
            }
        }));

        let b = &response.score_breakdown;
        assert_eq!(b.methods.score, 100);
        assert_eq!(b.methods.notes, "thorough");
        assert_eq!(b.abstract_.score, 0);
        assert_eq!(b.abstract_.notes, "Not evaluated");
        assert_eq!(b.results.score, 0);
        for score in breakdown_scores(b) {
            assert!((0..=100).contains(&score));
        }

        // Serialization carries exactly the nine fixed keys
        let serialized = serde_json::to_value(b).unwrap();
        let keys: Vec<&String> = serialized.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 9);
        assert!(serialized.get("abstract").is_some());
        assert!(serialized.get("unexpectedCategory").is_none());
    }

    #[test]
    fn test_critical_issues_without_title_are_dropped() {
        let response = normalize(&json!({
            "criticalIssues": [
                {"title": "Missing ethics approval", "severity": "critical"},
                {"description": "no title here", "severity": "critical"},
                {"title": "   ", "severity": "critical"},
                "not an object",
                null
            ]
        }));

        assert_eq!(response.critical_issues.len(), 1);
        assert_eq!(response.critical_issues[0].title, "Missing ethics approval");
    }

    #[test]
    fn test_severity_aliases_and_fallback() {
        let response = normalize(&json!({
            "criticalIssues": [
                {"title": "a", "severity": "HIGH"},
                {"title": "b", "severity": "Medium"},
                {"title": "c", "severity": "critical"},
                {"title": "d", "severity": "catastrophic"},
                {"title": "e"}
            ]
        }));

        let severities: Vec<Severity> =
            response.critical_issues.iter().map(|i| i.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Critical,
                Severity::Important,
                Severity::Critical,
                Severity::Minor,
                Severity::Minor
            ]
        );
    }

    #[test]
    fn test_feedback_entries_need_finding_or_suggestion() {
        let response = normalize(&json!({
            "detailedFeedback": [
                {"section": "Methods"},
                null,
                "x",
                {"section": "Results", "finding": "The sample size is unjustified"},
                {"suggestion": "Report confidence intervals"}
            ]
        }));

        assert_eq!(response.detailed_feedback.len(), 2);
        assert_eq!(response.detailed_feedback[0].section, "Results");
        assert_eq!(response.detailed_feedback[1].section, "General");
    }

    #[test]
    fn test_feedback_all_malformed_yields_empty() {
        let response = normalize(&json!({
            "detailedFeedback": [{"section": "Methods"}, null, "x"]
        }));
        assert!(response.detailed_feedback.is_empty());
    }

    #[test]
    fn test_resource_url_must_be_http() {
        let response = normalize(&json!({
            "detailedFeedback": [
                {"finding": "a", "resourceUrl": "https://example.org/guide"},
                {"finding": "b", "resourceUrl": "javascript:alert(1)"},
                {"finding": "c", "resourceUrl": "not a url"}
            ]
        }));

        assert_eq!(
            response.detailed_feedback[0].resource_url.as_deref(),
            Some("https://example.org/guide")
        );
        assert!(response.detailed_feedback[1].resource_url.is_none());
        assert!(response.detailed_feedback[2].resource_url.is_none());
    }

    #[test]
    fn test_action_items_completed_is_always_false() {
        let response = normalize(&json!({
            "actionItems": [
                {"task": "Add a CONSORT diagram", "priority": "HIGH", "completed": true},
                {"task": "Clarify exclusions", "completed": 1},
                {"priority": "high"}
            ]
        }));

        assert_eq!(response.action_items.len(), 2);
        assert!(response.action_items.iter().all(|a| !a.completed));
        assert_eq!(response.action_items[0].priority, Priority::High);
        assert_eq!(response.action_items[1].priority, Priority::Medium);
    }

    #[test]
    fn test_unrecognized_priority_falls_back_to_medium() {
        let response = normalize(&json!({
            "actionItems": [{"task": "t", "priority": "urgent"}]
        }));
        assert_eq!(response.action_items[0].priority, Priority::Medium);
    }

    #[test]
    fn test_optional_sections_absent_unless_object() {
        let absent = normalize(&json!({"abstractAnalysis": "yes", "zeroIPerspective": 3}));
        assert!(absent.abstract_analysis.is_none());
        assert!(absent.zero_i_perspective.is_none());

        let present = normalize(&json!({
            "abstractAnalysis": {
                "hasBackground": 1,
                "hasObjective": "yes",
                "hasMethods": false,
                "hasResults": null,
                "feedback": "Missing a conclusion move"
            },
            "zeroIPerspective": {
                "compliant": false,
                "violations": ["I believe", 7, "we think", ""],
                "feedback": "Rephrase in third person"
            }
        }));

        let abs = present.abstract_analysis.unwrap();
        assert!(abs.has_background);
        assert!(abs.has_objective);
        assert!(!abs.has_methods);
        assert!(!abs.has_results);
        assert!(!abs.has_conclusion);

        let zero = present.zero_i_perspective.unwrap();
        assert!(!zero.compliant);
        assert_eq!(zero.violations, vec!["I believe", "we think"]);
    }

    #[test]
    fn test_strengths_keep_only_non_empty_strings() {
        let response = normalize(&json!({
            "strengthsToMaintain": ["Clear figures", "", 42, null, "  ", "Strong abstract"]
        }));
        assert_eq!(
            response.strengths_to_maintain,
            vec!["Clear figures", "Strong abstract"]
        );
    }

    #[test]
    fn test_learn_links_need_title() {
        let response = normalize(&json!({
            "learnLinks": [
                {"title": "CONSORT explained", "url": "https://example.org", "source": "EQUATOR"},
                {"url": "https://example.org/orphan"},
                {"title": "Bad link", "url": "ftp://example.org"}
            ]
        }));

        assert_eq!(response.learn_links.len(), 2);
        assert_eq!(response.learn_links[0].source.as_deref(), Some("EQUATOR"));
        assert_eq!(response.learn_links[1].url, "");
    }

    #[test]
    fn test_non_array_collections_become_empty() {
        let response = normalize(&json!({
            "criticalIssues": "none",
            "detailedFeedback": {"finding": "object not array"},
            "actionItems": 7,
            "strengthsToMaintain": null,
            "learnLinks": false
        }));

        assert!(response.critical_issues.is_empty());
        assert!(response.detailed_feedback.is_empty());
        assert!(response.action_items.is_empty());
        assert!(response.strengths_to_maintain.is_empty());
        assert!(response.learn_links.is_empty());
    }
}
