// src/models/repetition.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Learning state of a word or vocabulary list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepetitionStatus {
    New,
    Learning,
    Mastered,
}

impl RepetitionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RepetitionStatus::New => "New",
            RepetitionStatus::Learning => "Learning",
            RepetitionStatus::Mastered => "Mastered",
        }
    }
}

/// Represents the 'spaced_repetitions' table in the database,
/// joined with the vocabulary list name and the word.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Repetition {
    pub id: i64,
    pub user_id: i64,

    /// Set for word-level records, NULL for list-level records.
    pub vocabulary_id: Option<i64>,
    pub vocabulary_list_id: i64,
    pub vocabulary_list_name: Option<String>,
    pub vocabulary_word: Option<String>,

    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub next_review_at: Option<DateTime<Utc>>,
    pub review_count: i32,

    /// Current review interval in days.
    pub interval_days: i32,

    /// Status as last written ("New", "Learning" or "Mastered").
    pub status: String,

    pub best_quiz_score: Option<i32>,
    pub last_quiz_score: Option<i32>,
    pub last_quiz_completed_at: Option<DateTime<Utc>>,
    pub total_quiz_attempts: Option<i32>,
}

/// Fields of a record about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRepetition {
    pub user_id: i64,
    pub vocabulary_id: Option<i64>,
    pub vocabulary_list_id: i64,
    pub last_reviewed_at: DateTime<Utc>,
    pub next_review_at: DateTime<Utc>,
}

/// Repetition as returned to learners.
#[derive(Debug, Clone, Serialize)]
pub struct RepetitionView {
    pub id: i64,
    pub user_id: i64,
    pub vocabulary_id: Option<i64>,
    pub vocabulary_list_id: i64,
    pub vocabulary_list_name: String,
    pub vocabulary_word: Option<String>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub next_review_at: Option<DateTime<Utc>>,
    pub review_count: i32,
    pub interval_days: i32,
    pub status: RepetitionStatus,
    pub is_due: bool,
    pub days_until_review: i64,
    pub best_quiz_score: Option<i32>,
    pub last_quiz_score: Option<i32>,
    pub last_quiz_completed_at: Option<DateTime<Utc>>,
    pub total_quiz_attempts: Option<i32>,
}

/// DTO for reviewing a word.
///
/// Either `repetition_id`, or both `vocabulary_id` and `vocabulary_list_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequest {
    pub repetition_id: Option<i64>,
    pub vocabulary_id: Option<i64>,
    pub vocabulary_list_id: Option<i64>,

    /// Recall quality, 0 (forgotten) to 5 (perfect). Out of range values are clamped.
    pub quality: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub repetition: RepetitionView,
    pub next_review_at: DateTime<Utc>,
    pub new_interval_days: i32,
}

/// DTO for recording a vocabulary quiz result.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizResultRequest {
    pub vocabulary_list_id: i64,
    pub score: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuizScore {
    pub vocabulary_list_id: i64,
    pub vocabulary_list_name: String,
    pub best_score: Option<i32>,
    pub last_score: Option<i32>,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub total_attempts: Option<i32>,
}
