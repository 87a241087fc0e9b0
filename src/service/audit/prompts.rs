//! Prompts for manuscript audits

use crate::model::Manuscript;

/// System prompt for manuscript audits
pub const AUDIT_SYSTEM_PROMPT: &str = r#"You are a senior peer reviewer and scientific editor.

Your role is to audit a manuscript for publication-submission readiness and
produce a structured, evidence-grounded report.

You must:
- Ground every finding in the manuscript text and quote the relevant passage
- Use the reporting guideline appropriate to the study design
- Provide a concrete, actionable suggestion for every finding
- Flag as critical only problems severe enough to risk outright rejection
- Be exhaustive: aim for at least 20 detailed findings and 15 action items

Do not:
- Invent content that is not in the manuscript
- Soften or omit critical problems to keep the readiness score high
- Return prose, markdown, or commentary outside the JSON object

Your output must be a single JSON object conforming exactly to the OUTPUT
FORMAT below."#;

/// JSON shape the model is asked to return. The validator is the enforcement
/// counterpart of this contract; nothing here is trusted on arrival.
const OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT (single JSON object):
{
  "readinessScore": <integer 0-100>,
  "executiveSummary": "<2-4 sentence overall assessment>",
  "documentClassification": {
    "manuscriptType": "...", "discipline": "...",
    "studyDesign": "...", "reportingGuideline": "..."
  },
  "scoreBreakdown": {
    "titleAndKeywords": {"score": 0-100, "maxWeight": 5, "notes": "..."},
    "abstract": {"score": 0-100, "maxWeight": 10, "notes": "..."},
    "introduction": {"score": 0-100, "maxWeight": 10, "notes": "..."},
    "methods": {"score": 0-100, "maxWeight": 20, "notes": "..."},
    "results": {"score": 0-100, "maxWeight": 15, "notes": "..."},
    "discussion": {"score": 0-100, "maxWeight": 15, "notes": "..."},
    "ethicsAndTransparency": {"score": 0-100, "maxWeight": 10, "notes": "..."},
    "writingQuality": {"score": 0-100, "maxWeight": 10, "notes": "..."},
    "zeroIPerspective": {"score": 0-100, "maxWeight": 5, "notes": "..."}
  },
  "criticalIssues": [
    {"title": "...", "description": "...", "severity": "critical|important|minor", "umaReference": "..."}
  ],
  "detailedFeedback": [
    {"section": "...", "finding": "<quote the manuscript>", "suggestion": "...",
     "whyItMatters": "...", "severity": "critical|important|minor",
     "resourceTopic": "...", "resourceUrl": "<optional>", "resourceSource": "<optional>"}
  ],
  "actionItems": [
    {"task": "...", "priority": "high|medium|low", "section": "<optional>", "completed": false}
  ],
  "abstractAnalysis": {
    "hasBackground": true, "hasObjective": true, "hasMethods": true,
    "hasResults": true, "hasConclusion": true, "feedback": "..."
  },
  "zeroIPerspective": {"compliant": true, "violations": ["..."], "feedback": "..."},
  "strengthsToMaintain": ["..."],
  "learnLinks": [
    {"title": "...", "description": "...", "topic": "...", "url": "...", "source": "<optional>"}
  ]
}"#;

/// Build the audit prompt for a manuscript
pub fn build_audit_prompt(manuscript: &Manuscript, help_types: &[String]) -> String {
    let focus = if help_types.is_empty() {
        "Comprehensive Review".to_string()
    } else {
        help_types.join(", ")
    };

    format!(
        "## Manuscript audit request\n\n\
         Title: {}\n\
         Paper type: {}\n\
         Requested focus areas: {}\n\n\
         Audit the manuscript below against the criteria for this paper type.\n\n\
         {}\n\n\
         ## Manuscript text\n\n{}",
        manuscript.title,
        manuscript.paper_type.label(),
        focus,
        OUTPUT_FORMAT,
        manuscript.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaperType;

    #[test]
    fn test_prompt_includes_manuscript_and_contract() {
        let manuscript = Manuscript::new(
            "user-1".to_string(),
            "Outcomes of X".to_string(),
            "We conducted a trial.".to_string(),
            PaperType::QuantitativeExperimental,
        );

        let prompt = build_audit_prompt(&manuscript, &["Methods".to_string()]);

        assert!(prompt.contains("Outcomes of X"));
        assert!(prompt.contains("We conducted a trial."));
        assert!(prompt.contains("Quantitative (Experimental)"));
        assert!(prompt.contains("Requested focus areas: Methods"));
        assert!(prompt.contains("\"readinessScore\""));
        assert!(prompt.contains("\"ethicsAndTransparency\""));
    }

    #[test]
    fn test_empty_help_types_default_to_comprehensive() {
        let manuscript = Manuscript::new(
            "user-1".to_string(),
            "T".to_string(),
            "text".to_string(),
            PaperType::Generic,
        );

        let prompt = build_audit_prompt(&manuscript, &[]);
        assert!(prompt.contains("Requested focus areas: Comprehensive Review"));
    }
}
