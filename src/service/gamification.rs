//! Gamification accumulators
//!
//! Pure calculators for XP, streaks, and levels. Persistence of the results
//! lives in the repository layer; these functions trust their callers to
//! supply well-typed inputs (they sit behind an internal boundary, unlike
//! the audit validator which guards an external one).

use chrono::{Local, NaiveDate};

use crate::model::StreakUpdate;

/// XP awarded for any completed audit
const BASE_AUDIT_XP: u32 = 100;
/// Bonus for manuscripts longer than [`LONG_MANUSCRIPT_CHARS`]
const LONG_MANUSCRIPT_BONUS: u32 = 100;
const LONG_MANUSCRIPT_CHARS: usize = 20_000;
/// Bonus for manuscripts longer than [`MEDIUM_MANUSCRIPT_CHARS`]
const MEDIUM_MANUSCRIPT_BONUS: u32 = 50;
const MEDIUM_MANUSCRIPT_CHARS: usize = 5_000;
/// Bonus for a comprehensive audit request
const COMPREHENSIVE_BONUS: u32 = 50;
const COMPREHENSIVE_HELP_TYPE: &str = "Comprehensive Review";
const COMPREHENSIVE_HELP_TYPE_COUNT: usize = 5;
/// Bonus when the audited manuscript scores at or above [`HIGH_SCORE_FLOOR`]
const HIGH_SCORE_BONUS: u32 = 25;
const HIGH_SCORE_FLOOR: i64 = 80;

/// Cumulative XP required to advance one level scales linearly with the
/// current level: the step from level L to L+1 opens at `L * 1000` total XP.
const XP_PER_LEVEL_STEP: i64 = 1000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Compute XP earned by one audit.
///
/// The length bonuses are mutually exclusive (only the higher one applies),
/// and the comprehensive bonus is granted once whether triggered by the
/// named help type or by the number of help types requested.
pub fn audit_xp(text_length: usize, help_types: &[String], readiness_score: Option<i64>) -> u32 {
    let mut xp = BASE_AUDIT_XP;

    if text_length > LONG_MANUSCRIPT_CHARS {
        xp += LONG_MANUSCRIPT_BONUS;
    } else if text_length > MEDIUM_MANUSCRIPT_CHARS {
        xp += MEDIUM_MANUSCRIPT_BONUS;
    }

    let comprehensive = help_types.iter().any(|h| h == COMPREHENSIVE_HELP_TYPE)
        || help_types.len() >= COMPREHENSIVE_HELP_TYPE_COUNT;
    if comprehensive {
        xp += COMPREHENSIVE_BONUS;
    }

    if readiness_score.is_some_and(|s| s >= HIGH_SCORE_FLOOR) {
        xp += HIGH_SCORE_BONUS;
    }

    xp
}

/// Advance a user's streak for activity happening now.
///
/// Uses the local wall clock; see [`advance_streak_on`] for the calendar
/// rules.
pub fn advance_streak(last_active_date: Option<&str>, current_streak: i32) -> StreakUpdate {
    advance_streak_on(last_active_date, current_streak, Local::now().date_naive())
}

/// Advance a streak against an explicit `today`.
///
/// Comparison is by calendar day, not elapsed hours: "yesterday" is exactly
/// one calendar day before `today`. A missing, malformed, future, or 2+ day
/// old last-active date resets the streak to 1; activity on the same day
/// leaves it unchanged; activity the day after yesterday's increments it.
pub fn advance_streak_on(
    last_active_date: Option<&str>,
    current_streak: i32,
    today: NaiveDate,
) -> StreakUpdate {
    let date = today.format(DATE_FORMAT).to_string();

    let last = last_active_date.and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok());

    let streak = match last {
        Some(d) if d == today => current_streak,
        Some(d) if Some(d) == today.pred_opt() => current_streak + 1,
        _ => 1,
    };

    StreakUpdate { streak, date }
}

/// Compute the level a cumulative XP total has reached.
///
/// Levels start at 1. Each threshold (1000, 2000, 3000, ...) that the total
/// meets or exceeds advances the level by one, so landing exactly on a round
/// multiple clears every threshold up to it in a single jump: 3000 XP clears
/// 1000, 2000, and 3000 and lands on level 4.
pub fn level_for_xp(total_xp: i64) -> i32 {
    let mut level: i32 = 1;
    while total_xp >= i64::from(level) * XP_PER_LEVEL_STEP {
        level += 1;
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    fn help(types: &[&str]) -> Vec<String> {
        types.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_xp_for_short_manuscript() {
        assert_eq!(audit_xp(1000, &help(&["Abstract"]), None), 100);
    }

    #[test]
    fn test_length_bonuses_are_mutually_exclusive() {
        assert_eq!(audit_xp(5001, &[], None), 150);
        assert_eq!(audit_xp(20_001, &[], None), 200);
        // Exactly at the boundary earns no bonus
        assert_eq!(audit_xp(5000, &[], None), 100);
        assert_eq!(audit_xp(20_000, &[], None), 150);
    }

    #[test]
    fn test_comprehensive_bonus_granted_once() {
        // Named help type alone
        assert_eq!(audit_xp(0, &help(&["Comprehensive Review"]), None), 150);
        // Five help types alone
        assert_eq!(audit_xp(0, &help(&["a", "b", "c", "d", "e"]), None), 150);
        // Both conditions still add the bonus only once
        assert_eq!(
            audit_xp(
                0,
                &help(&["Comprehensive Review", "b", "c", "d", "e"]),
                None
            ),
            150
        );
    }

    #[test]
    fn test_high_score_bonus() {
        assert_eq!(audit_xp(0, &[], Some(80)), 125);
        assert_eq!(audit_xp(0, &[], Some(79)), 100);
        assert_eq!(audit_xp(0, &[], None), 100);
    }

    #[test]
    fn test_all_bonuses_stack() {
        assert_eq!(
            audit_xp(25_000, &help(&["Comprehensive Review"]), Some(90)),
            275
        );
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_first_activity_starts_streak() {
        let update = advance_streak_on(None, 0, day("2026-08-06"));
        assert_eq!(
            update,
            StreakUpdate {
                streak: 1,
                date: "2026-08-06".to_string()
            }
        );
    }

    #[test]
    fn test_same_day_does_not_increment() {
        let update = advance_streak_on(Some("2026-08-06"), 5, day("2026-08-06"));
        assert_eq!(update.streak, 5);
    }

    #[test]
    fn test_consecutive_day_increments() {
        let update = advance_streak_on(Some("2026-08-05"), 5, day("2026-08-06"));
        assert_eq!(update.streak, 6);
    }

    #[test]
    fn test_gap_resets_streak() {
        let update = advance_streak_on(Some("2026-08-04"), 10, day("2026-08-06"));
        assert_eq!(update.streak, 1);
    }

    #[test]
    fn test_future_or_malformed_date_resets_streak() {
        assert_eq!(
            advance_streak_on(Some("2026-08-07"), 4, day("2026-08-06")).streak,
            1
        );
        assert_eq!(
            advance_streak_on(Some("not-a-date"), 4, day("2026-08-06")).streak,
            1
        );
    }

    #[test]
    fn test_yesterday_across_month_boundary() {
        let update = advance_streak_on(Some("2026-07-31"), 2, day("2026-08-01"));
        assert_eq!(update.streak, 3);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(999), 1);
        assert_eq!(level_for_xp(1000), 2);
        assert_eq!(level_for_xp(1999), 2);
        assert_eq!(level_for_xp(2000), 3);
    }

    #[test]
    fn test_round_thousands_clear_multiple_thresholds() {
        // 3000 meets the 1000, 2000, and 3000 thresholds in one pass
        assert_eq!(level_for_xp(3000), 4);
        assert_eq!(level_for_xp(2999), 3);
        assert_eq!(level_for_xp(3001), 4);
    }
}
