//! Rigor enforcement over normalized audit responses
//!
//! Runs after field-level normalization, on an already well-formed
//! structure. Two rules adjust the data: a consistency cap that stops the
//! model from pairing a high readiness score with severe findings, and a
//! coverage rule that guarantees every critical issue has a high-priority
//! remediation task. A third pass computes advisory warnings about the
//! quality of the audit output itself; warnings are returned next to the
//! response and never alter it.

use std::collections::HashSet;

use crate::model::{ActionItem, AnalysisResponse, Priority, Severity, ValidatedAnalysis};

/// Score caps by critical-issue count, highest count first. Only the first
/// matching threshold applies; the caps are not cumulative.
const SCORE_CAPS: &[(usize, i64)] = &[(5, 55), (3, 65), (1, 80)];

/// Below this many feedback entries the audit is considered sparse
const FEEDBACK_WARN_FLOOR: usize = 10;
const FEEDBACK_TARGET: usize = 20;

/// Below this many action items the audit is considered sparse
const ACTION_WARN_FLOOR: usize = 8;
const ACTION_TARGET: usize = 15;

/// Minimum fraction of findings expected to quote the manuscript text
const QUOTE_RATE_WARN_FLOOR: f64 = 0.3;
const QUOTE_RATE_TARGET: f64 = 0.5;

/// Characters that indicate a finding quotes the manuscript
const QUOTE_CHARS: [char; 3] = ['"', '\u{201C}', '\u{201D}'];

/// Apply the rigor rules and compute advisory warnings.
pub fn enforce_rigor(mut response: AnalysisResponse) -> ValidatedAnalysis {
    cap_readiness_score(&mut response);
    ensure_action_coverage(&mut response);
    let warnings = rigor_warnings(&response);

    ValidatedAnalysis { response, warnings }
}

/// Cap the readiness score so it cannot contradict the critical issues the
/// model itself reported. Downstream consumers trust the score as the
/// primary signal.
fn cap_readiness_score(response: &mut AnalysisResponse) {
    let critical_count = critical_count(response);

    for (count, cap) in SCORE_CAPS {
        if critical_count >= *count {
            if response.readiness_score > *cap {
                tracing::debug!(
                    critical_count,
                    original_score = response.readiness_score,
                    capped_score = cap,
                    "Readiness score capped to match critical issue count"
                );
                response.readiness_score = *cap;
            }
            return;
        }
    }
}

/// Guarantee at least one high-priority action item per critical issue, so
/// no critical problem is left dangling without a remediation path.
fn ensure_action_coverage(response: &mut AnalysisResponse) {
    let critical_titles: Vec<String> = response
        .critical_issues
        .iter()
        .filter(|i| i.severity == Severity::Critical)
        .map(|i| i.title.clone())
        .collect();

    let mut high_count = response
        .action_items
        .iter()
        .filter(|a| a.priority == Priority::High)
        .count();

    if high_count >= critical_titles.len() {
        return;
    }

    let mut existing: HashSet<String> = response
        .action_items
        .iter()
        .map(|a| a.task.to_lowercase())
        .collect();

    for title in critical_titles.iter() {
        if high_count >= critical_titles.len() {
            break;
        }

        let task = format!("Address critical issue: {}", title);
        let key = task.to_lowercase();
        if existing.contains(&key) {
            continue;
        }
        existing.insert(key);

        tracing::debug!(task = %task, "Synthesized action item for uncovered critical issue");
        response.action_items.push(ActionItem {
            task,
            priority: Priority::High,
            section: None,
            completed: false,
        });
        high_count += 1;
    }
}

/// Compute quality-shortfall warnings. Advisory only: these feed monitoring
/// of audit quality over time and are never user-facing errors.
fn rigor_warnings(response: &AnalysisResponse) -> Vec<String> {
    let mut warnings = Vec::new();

    let feedback_count = response.detailed_feedback.len();
    if feedback_count < FEEDBACK_WARN_FLOOR {
        warnings.push(format!(
            "Detailed feedback is sparse: {} entries (target >= {})",
            feedback_count, FEEDBACK_TARGET
        ));
    }

    let action_count = response.action_items.len();
    if action_count < ACTION_WARN_FLOOR {
        warnings.push(format!(
            "Action item list is sparse: {} items (target >= {})",
            action_count, ACTION_TARGET
        ));
    }

    if feedback_count > 0 {
        let quoting = response
            .detailed_feedback
            .iter()
            .filter(|f| f.finding.contains(&QUOTE_CHARS[..]))
            .count();
        let rate = quoting as f64 / feedback_count as f64;
        if rate < QUOTE_RATE_WARN_FLOOR {
            warnings.push(format!(
                "Low text-quoting rate: {:.0}% of findings quote the manuscript (target >= {:.0}%)",
                rate * 100.0,
                QUOTE_RATE_TARGET * 100.0
            ));
        }
    }

    warnings
}

fn critical_count(response: &AnalysisResponse) -> usize {
    response
        .critical_issues
        .iter()
        .filter(|i| i.severity == Severity::Critical)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CriticalIssue;
    use crate::service::audit::normalize::empty_response;

    fn critical_issue(title: &str) -> CriticalIssue {
        CriticalIssue {
            title: title.to_string(),
            description: String::new(),
            severity: Severity::Critical,
            uma_reference: String::new(),
        }
    }

    fn response_with(score: i64, criticals: usize) -> AnalysisResponse {
        let mut response = empty_response("test");
        response.readiness_score = score;
        response.critical_issues = (0..criticals)
            .map(|i| critical_issue(&format!("Issue {}", i)))
            .collect();
        response
    }

    #[test]
    fn test_score_capped_by_highest_matching_threshold() {
        assert_eq!(enforce_rigor(response_with(90, 5)).response.readiness_score, 55);
        assert_eq!(enforce_rigor(response_with(90, 3)).response.readiness_score, 65);
        assert_eq!(enforce_rigor(response_with(95, 1)).response.readiness_score, 80);
    }

    #[test]
    fn test_score_below_cap_is_untouched() {
        assert_eq!(enforce_rigor(response_with(40, 5)).response.readiness_score, 40);
        assert_eq!(enforce_rigor(response_with(80, 1)).response.readiness_score, 80);
    }

    #[test]
    fn test_no_critical_issues_means_no_cap() {
        assert_eq!(enforce_rigor(response_with(97, 0)).response.readiness_score, 97);
    }

    #[test]
    fn test_non_critical_severities_do_not_trigger_cap() {
        let mut response = response_with(90, 0);
        response.critical_issues = vec![CriticalIssue {
            severity: Severity::Important,
            ..critical_issue("Important but not critical")
        }];
        assert_eq!(enforce_rigor(response).response.readiness_score, 90);
    }

    #[test]
    fn test_action_items_synthesized_for_uncovered_criticals() {
        let validated = enforce_rigor(response_with(50, 2));
        let items = &validated.response.action_items;

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|a| a.priority == Priority::High));
        assert!(items.iter().all(|a| !a.completed));
        assert_eq!(items[0].task, "Address critical issue: Issue 0");
        assert_eq!(items[1].task, "Address critical issue: Issue 1");
    }

    #[test]
    fn test_existing_high_priority_items_count_toward_coverage() {
        let mut response = response_with(50, 1);
        response.action_items = vec![ActionItem {
            task: "Fix the consent statement".to_string(),
            priority: Priority::High,
            section: None,
            completed: false,
        }];

        let validated = enforce_rigor(response);
        assert_eq!(validated.response.action_items.len(), 1);
    }

    #[test]
    fn test_synthesis_dedupes_case_insensitively() {
        let mut response = response_with(50, 1);
        response.critical_issues = vec![critical_issue("Missing Consent")];
        response.action_items = vec![ActionItem {
            task: "ADDRESS CRITICAL ISSUE: MISSING CONSENT".to_string(),
            priority: Priority::Medium,
            section: None,
            completed: false,
        }];

        let validated = enforce_rigor(response);
        // The duplicate task is not re-added even though coverage stays short
        assert_eq!(validated.response.action_items.len(), 1);
    }

    #[test]
    fn test_coverage_invariant_holds_after_enforcement() {
        for criticals in 0..6 {
            let validated = enforce_rigor(response_with(50, criticals));
            let high = validated
                .response
                .action_items
                .iter()
                .filter(|a| a.priority == Priority::High)
                .count();
            assert!(high >= criticals, "coverage short for {} criticals", criticals);
        }
    }

    #[test]
    fn test_sparse_output_produces_warnings() {
        let validated = enforce_rigor(empty_response("test"));

        assert_eq!(validated.warnings.len(), 2);
        assert!(validated.warnings[0].contains("feedback is sparse"));
        assert!(validated.warnings[1].contains("Action item list is sparse"));
    }

    #[test]
    fn test_low_quoting_rate_warns_without_altering_data() {
        let mut response = empty_response("test");
        response.detailed_feedback = (0..12)
            .map(|i| crate::model::FeedbackItem {
                section: "Methods".to_string(),
                finding: format!("Finding {} with no quotation", i),
                suggestion: String::new(),
                why_it_matters: String::new(),
                severity: Severity::Minor,
                resource_topic: String::new(),
                resource_url: None,
                resource_source: None,
            })
            .collect();

        let before = response.clone();
        let validated = enforce_rigor(response);

        assert!(validated
            .warnings
            .iter()
            .any(|w| w.contains("text-quoting rate")));
        assert_eq!(validated.response.detailed_feedback, before.detailed_feedback);
    }

    #[test]
    fn test_quoting_rate_above_floor_does_not_warn() {
        let mut response = empty_response("test");
        response.detailed_feedback = (0..10)
            .map(|i| crate::model::FeedbackItem {
                section: "Methods".to_string(),
                finding: format!("The text states \u{201C}finding {}\u{201D} verbatim", i),
                suggestion: String::new(),
                why_it_matters: String::new(),
                severity: Severity::Minor,
                resource_topic: String::new(),
                resource_url: None,
                resource_source: None,
            })
            .collect();

        let validated = enforce_rigor(response);
        assert!(!validated
            .warnings
            .iter()
            .any(|w| w.contains("text-quoting rate")));
    }
}
