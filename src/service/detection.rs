//! Rule-based paper-type detection
//!
//! Scores manuscript text against per-category keyword dictionaries to guess
//! which research design the manuscript follows. The guess selects which
//! audit criteria apply; a wrong guess is recoverable because the user can
//! override the type, so this stays a deliberately simple, deterministic
//! scorer with no learning and no external calls.

use std::collections::BTreeMap;

use crate::model::{DetectionConfidence, DetectionResult, PaperType};

/// Weight of a primary (strong indicator) keyword match
const PRIMARY_WEIGHT: u32 = 2;
/// Weight of a secondary (weaker indicator) keyword match
const SECONDARY_WEIGHT: u32 = 1;

/// Weighted score at or above which the detection is high confidence
const HIGH_CONFIDENCE_SCORE: u32 = 8;
/// Weighted score at or above which the detection is medium confidence
const MEDIUM_CONFIDENCE_SCORE: u32 = 4;

/// Keyword dictionary for one scored category
struct CategoryLexicon {
    paper_type: PaperType,
    /// Strong indicators, typically design-naming phrases
    primary: &'static [&'static str],
    /// Weaker indicators that co-occur with the design
    secondary: &'static [&'static str],
}

/// Scored categories in canonical order; ties resolve to the earliest entry.
/// `PaperType::Generic` is never scored, only used as the zero-match fallback.
const LEXICONS: &[CategoryLexicon] = &[
    CategoryLexicon {
        paper_type: PaperType::QuantitativeExperimental,
        primary: &[
            "randomized controlled trial",
            "randomised controlled trial",
            "control group",
            "intervention group",
            "double-blind",
            "placebo",
            "random allocation",
        ],
        secondary: &[
            "rct",
            "randomization",
            "randomisation",
            "primary outcome",
            "baseline characteristics",
            "trial registration",
            "consort",
            "intention-to-treat",
            "sample size calculation",
        ],
    },
    CategoryLexicon {
        paper_type: PaperType::Observational,
        primary: &[
            "cohort study",
            "case-control study",
            "cross-sectional study",
            "prospective cohort",
            "retrospective cohort",
        ],
        secondary: &[
            "odds ratio",
            "hazard ratio",
            "confounding",
            "exposure",
            "incidence",
            "prevalence",
            "follow-up period",
            "strobe",
            "observational",
        ],
    },
    CategoryLexicon {
        paper_type: PaperType::Qualitative,
        primary: &[
            "thematic analysis",
            "grounded theory",
            "semi-structured interview",
            "focus group",
            "phenomenological",
        ],
        secondary: &[
            "qualitative",
            "data saturation",
            "coding framework",
            "member checking",
            "purposive sampling",
            "participants described",
            "interview guide",
            "coreq",
        ],
    },
    CategoryLexicon {
        paper_type: PaperType::SystematicReview,
        primary: &[
            "systematic review",
            "meta-analysis",
            "prisma",
            "search strategy",
        ],
        secondary: &[
            "inclusion criteria",
            "exclusion criteria",
            "data extraction",
            "risk of bias",
            "heterogeneity",
            "forest plot",
            "pooled estimate",
            "databases searched",
        ],
    },
    CategoryLexicon {
        paper_type: PaperType::MixedMethods,
        primary: &[
            "mixed methods",
            "mixed-methods",
            "convergent design",
            "explanatory sequential",
            "exploratory sequential",
        ],
        secondary: &[
            "quantitative and qualitative",
            "qualitative and quantitative",
            "triangulation",
            "integration of findings",
            "quantitative phase",
            "qualitative phase",
        ],
    },
    CategoryLexicon {
        paper_type: PaperType::CaseReport,
        primary: &[
            "case report",
            "case presentation",
            "we report a case",
            "we present a case",
        ],
        secondary: &[
            "patient presented",
            "chief complaint",
            "physical examination",
            "rare case",
            "follow-up visit",
            "informed consent was obtained from the patient",
            "care guideline",
        ],
    },
];

/// Per-category tally produced during scoring
struct CategoryMatch {
    paper_type: PaperType,
    score: u32,
    matched: Vec<String>,
}

/// Detect the most likely paper type for the given manuscript text.
///
/// Matching is case-insensitive substring search: the dictionaries are
/// multi-word clinical and methodological phrases, so an exact phrase
/// occurring anywhere in the text is the signal, no word boundaries needed.
pub fn detect_paper_type(text: &str) -> DetectionResult {
    let haystack = text.to_lowercase();

    let mut matches: Vec<CategoryMatch> = Vec::with_capacity(LEXICONS.len());
    for lexicon in LEXICONS {
        let mut score = 0u32;
        let mut matched = Vec::new();

        for keyword in lexicon.primary {
            if haystack.contains(keyword) {
                score += PRIMARY_WEIGHT;
                matched.push((*keyword).to_string());
            }
        }
        for keyword in lexicon.secondary {
            if haystack.contains(keyword) {
                score += SECONDARY_WEIGHT;
                matched.push((*keyword).to_string());
            }
        }

        matches.push(CategoryMatch {
            paper_type: lexicon.paper_type,
            score,
            matched,
        });
    }

    // Every category that matched anything is reported, not just the winner;
    // this drives the "why was this detected" affordance in the UI.
    let keywords_found: BTreeMap<String, Vec<String>> = matches
        .iter()
        .filter(|m| !m.matched.is_empty())
        .map(|m| (m.paper_type.as_str().to_string(), m.matched.clone()))
        .collect();

    // Stable max: iteration follows declaration order, and a strictly-greater
    // comparison keeps the earliest category on ties.
    let mut top = &matches[0];
    for m in &matches[1..] {
        if m.score > top.score {
            top = m;
        }
    }

    if top.score == 0 {
        return DetectionResult {
            detected_type: PaperType::Generic,
            confidence: DetectionConfidence::Low,
            explanation: "No strong indicators of a specific research design were found. \
                          Please select the paper type manually."
                .to_string(),
            keywords_found,
            top_match_count: 0,
        };
    }

    let confidence = if top.score >= HIGH_CONFIDENCE_SCORE {
        DetectionConfidence::High
    } else if top.score >= MEDIUM_CONFIDENCE_SCORE {
        DetectionConfidence::Medium
    } else {
        DetectionConfidence::Low
    };

    let suffix = match confidence {
        DetectionConfidence::High => "The indicators strongly match this design.",
        DetectionConfidence::Medium => "Please confirm this is the correct paper type.",
        DetectionConfidence::Low => {
            "Few indicators were found; consider selecting the paper type manually."
        }
    };

    let explanation = format!(
        "Detected as {} based on {} matching keywords. {}",
        top.paper_type.label(),
        top.matched.len(),
        suffix
    );

    tracing::debug!(
        detected_type = top.paper_type.as_str(),
        score = top.score,
        matched = top.matched.len(),
        confidence = ?confidence,
        "Paper type detected"
    );

    DetectionResult {
        detected_type: top.paper_type,
        confidence,
        explanation,
        keywords_found,
        top_match_count: top.matched.len(),
    }
}
