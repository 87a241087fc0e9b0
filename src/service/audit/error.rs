//! Error types for manuscript audits

use thiserror::Error;

/// Error type for the audit pipeline
///
/// Malformed model output is deliberately NOT an error: the validator
/// resolves it to a labeled empty response. Only transport-level failures
/// of the LLM call surface here.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("LLM completion failed: {0}")]
    CompletionFailed(String),
}
