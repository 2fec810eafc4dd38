// src/models/streak.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Streak columns of a row of the 'users' table.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakState {
    pub current_streak: i32,
    pub longest_streak: i32,

    /// Local (GMT+7) date of the last counted practice.
    pub last_practice_date: Option<NaiveDate>,

    pub freeze_tokens: i32,
}

/// What a streak update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakEvent {
    /// A new day was counted.
    CompleteDay,
    /// Practice on an already counted day.
    MaintainDay,
    /// The streak had dropped to 0 and starts over.
    ResetStreak,
    /// A missed day was covered by a freeze token.
    FreezeUsed,
    /// A missed day without a freeze token ended the streak.
    StreakLost,
    /// The nightly check found nothing to do.
    NoChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub today_completed: bool,
    pub freeze_tokens: i32,
    pub last_milestone: Option<i32>,
    pub last_practice_date: Option<NaiveDate>,
    pub next_milestone: Option<i32>,
    pub days_to_next_milestone: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakUpdate {
    pub event: StreakEvent,
    pub summary: StreakSummary,
    pub milestone_reached: Option<i32>,
    pub message: String,
}

/// Learner who has a live streak but has not practiced today.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ReminderCandidate {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    pub current_streak: i32,
    pub freeze_tokens: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StreakReminder {
    #[serde(flatten)]
    pub candidate: ReminderCandidate,
    pub reminder_date: NaiveDate,
    pub message: String,
}

/// A row of the streak leaderboard.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct StreakLeader {
    pub user_id: i64,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub current_streak: i32,
    pub longest_streak: i32,
}
