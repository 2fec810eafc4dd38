// src/models/standing.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::scoring::{award::AwardBreakdown, tier::ToeicLevel};

/// Represents the 'season_standings' table in the database.
/// One accumulated score per user and season.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct SeasonStanding {
    pub season_id: i64,
    pub user_id: i64,
    pub score: i64,

    /// Estimate at the time the standing was last written, capped at 990.
    pub estimated_toeic: Option<i32>,

    pub first_attempt_date: Option<DateTime<Utc>>,
}

/// A row of the season ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankEntry {
    pub user_id: i64,
    pub full_name: String,
    pub score: i64,
    pub rank: i64,
    pub estimated_toeic: i32,
    pub toeic_level: ToeicLevel,
    pub avatar_url: Option<String>,
}

/// A learner's statistics within one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSeasonStats {
    pub user_id: i64,
    pub current_rank: i64,
    pub current_score: i64,
    pub estimated_toeic: i32,
    pub toeic_level: ToeicLevel,
    pub total_attempts: i64,
    pub correct_answers: i64,
    /// Share of correct answers over the season window, 0.0 to 1.0.
    pub accuracy_rate: f64,
    pub is_ready_for_toeic: bool,
}

impl UserSeasonStats {
    /// Stats of a learner who has no standing in the season.
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            current_rank: 0,
            current_score: 0,
            estimated_toeic: 0,
            toeic_level: ToeicLevel::Beginner,
            total_attempts: 0,
            correct_answers: 0,
            accuracy_rate: 0.0,
            is_ready_for_toeic: false,
        }
    }
}

/// How a learner's next attempts will be scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToeicCalculation {
    pub user_id: i64,
    pub estimated_toeic: i32,
    pub toeic_level: ToeicLevel,
    pub level_description: &'static str,
    pub base_points_per_correct: i64,
    pub time_bonus_pct: i64,
    pub accuracy_bonus_pct: i64,
    pub difficulty_multiplier: f64,
    pub total_season_score: i64,
}

/// DTO for awarding season points after a part is submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct AwardRequest {
    pub attempt_id: i64,
    /// 1 = Listening, 2 = Reading. Other parts do not earn season points.
    pub exam_part_id: i64,
    pub correct_answers: i64,
    pub total_questions: i64,
    pub time_spent_secs: i64,
    pub expected_time_secs: i64,
}

/// Result of an award.
#[derive(Debug, Clone, Serialize)]
pub struct AwardResponse {
    /// Points this part is worth, whether or not they were added.
    pub season_score: i64,
    #[serde(flatten)]
    pub breakdown: AwardBreakdown,
    pub points_added: bool,
    pub is_first_attempt: bool,
    pub message: String,
    pub total_accumulated_score: i64,
}
