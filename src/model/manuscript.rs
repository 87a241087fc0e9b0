//! Manuscript domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use super::detection::PaperType;

/// A registered manuscript awaiting or holding an audit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Manuscript {
    /// SHA-256 hex digest of the manuscript text
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub paper_type: PaperType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Manuscript {
    pub fn new(owner_id: String, title: String, content: String, paper_type: PaperType) -> Self {
        Self {
            id: content_id(&content),
            owner_id,
            title,
            paper_type,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Content-addressed manuscript identifier
pub fn content_id(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_id_is_stable() {
        assert_eq!(content_id("abc"), content_id("abc"));
        assert_ne!(content_id("abc"), content_id("abd"));
        assert_eq!(content_id("abc").len(), 64);
    }
}
