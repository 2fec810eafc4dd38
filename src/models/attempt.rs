// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status value of a finished attempt.
pub const COMPLETED: &str = "Completed";

/// Represents a row of 'exam_attempts' joined with its exam part code.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ExamAttempt {
    pub id: i64,
    pub user_id: i64,
    pub exam_id: i64,
    pub exam_part_id: Option<i64>,

    /// Code of the exam part (e.g. "LISTENING_PART_1"), NULL for full-exam attempts.
    pub part_code: Option<String>,

    /// Number of correct answers recorded for the attempt.
    pub score: Option<i32>,

    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ExamAttempt {
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED
    }

    /// Skill of the attempt's exam part, if it is a listening or reading part.
    pub fn skill(&self) -> Option<Skill> {
        self.part_code.as_deref().and_then(Skill::from_part_code)
    }

    /// Minutes between start and end, 0 when the attempt has no end time.
    pub fn minutes_spent(&self) -> f64 {
        match self.end_time {
            Some(end) => (end - self.start_time).num_milliseconds() as f64 / 60_000.0,
            None => 0.0,
        }
    }
}

/// One graded multiple-choice answer of an attempt.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct AnswerRecord {
    pub attempt_id: i64,
    pub is_correct: bool,
}

/// The two TOEIC skills that feed the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Listening,
    Reading,
}

impl Skill {
    pub fn from_part_code(code: &str) -> Option<Self> {
        if code.starts_with("LISTENING") {
            Some(Skill::Listening)
        } else if code.starts_with("READING") {
            Some(Skill::Reading)
        } else {
            None
        }
    }
}
