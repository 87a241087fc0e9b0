//! Gamification progress model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user's persisted gamification state
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub xp: i64,
    pub level: i32,
    pub streak: i32,
    /// Last day with activity, as a YYYY-MM-DD calendar date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_date: Option<String>,
}

impl UserProgress {
    /// Fresh progress for a user with no recorded activity
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            xp: 0,
            level: 1,
            streak: 0,
            last_active_date: None,
        }
    }
}

/// Result of advancing a streak for today's activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreakUpdate {
    pub streak: i32,
    /// Today's date in YYYY-MM-DD form
    pub date: String,
}
