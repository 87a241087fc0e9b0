//! Database row models

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

use crate::model::{AnalysisResponse, Manuscript, PaperType, UserProgress, ValidatedAnalysis};

/// Row type for the manuscripts table
#[derive(Debug, FromRow)]
pub struct ManuscriptRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub paper_type: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ManuscriptRow {
    pub fn into_domain(self) -> Manuscript {
        Manuscript {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            // Unrecognized stored values degrade to the generic type rather
            // than failing the read
            paper_type: PaperType::parse(&self.paper_type).unwrap_or(PaperType::Generic),
            content: self.content,
            created_at: self.created_at,
        }
    }
}

/// Row type for the analysis_snapshots table
#[derive(Debug, FromRow)]
pub struct AnalysisSnapshotRow {
    pub manuscript_id: String,
    pub payload: Value,
    pub warnings: Value,
    pub created_at: DateTime<Utc>,
}

impl AnalysisSnapshotRow {
    pub fn into_domain(self) -> Result<ValidatedAnalysis, String> {
        let response: AnalysisResponse =
            serde_json::from_value(self.payload).map_err(|e| e.to_string())?;
        let warnings: Vec<String> =
            serde_json::from_value(self.warnings).unwrap_or_default();

        Ok(ValidatedAnalysis { response, warnings })
    }
}

/// Row type for the analysis_history table
#[derive(Debug, FromRow)]
pub struct AnalysisHistoryRow {
    pub id: i64,
    pub manuscript_id: String,
    pub readiness_score: i32,
    pub created_at: DateTime<Utc>,
}

/// Row type for the user_progress table
#[derive(Debug, FromRow)]
pub struct UserProgressRow {
    pub user_id: String,
    pub xp: i64,
    pub level: i32,
    pub streak: i32,
    pub last_active_date: Option<String>,
}

impl UserProgressRow {
    pub fn into_domain(self) -> UserProgress {
        UserProgress {
            user_id: self.user_id,
            xp: self.xp,
            level: self.level,
            streak: self.streak,
            last_active_date: self.last_active_date,
        }
    }
}
