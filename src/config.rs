// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Exam parts are scored out of this many questions before being scaled to 100.
pub const SCALE_QUESTION_COUNT: i32 = 61;

/// Number of most recent (exam, skill) groups used for the TOEIC estimate.
pub const RECENT_EXAM_WINDOW: usize = 10;

/// Highest estimate a standing can carry.
pub const MAX_TOEIC_SCORE: i32 = 990;

/// Estimate at which a learner is considered ready for the real exam.
pub const READY_FOR_TOEIC_SCORE: i32 = 600;

/// Attempts finished faster than this earn the time bonus during recompute.
pub const FAST_FINISH_MINUTES: f64 = 30.0;

/// Accuracy bonus threshold, as correct / total >= 4 / 5.
pub const ACCURACY_BONUS_NUMERATOR: i64 = 4;
pub const ACCURACY_BONUS_DENOMINATOR: i64 = 5;

/// Exam part ids eligible for per-attempt season points.
pub const LISTENING_PART_ID: i64 = 1;
pub const READING_PART_ID: i64 = 2;

/// Spaced repetition limits, in days.
pub const MAX_REVIEW_INTERVAL_DAYS: i32 = 90;
pub const MASTERED_INTERVAL_DAYS: i32 = 30;
pub const SECOND_REVIEW_INTERVAL_DAYS: i32 = 6;

/// Practice older than this many days before today is not accepted.
pub const PRACTICE_GRACE_DAYS: i64 = 2;

/// Role id of learners (the only users that receive streak reminders).
pub const LEARNER_ROLE_ID: i32 = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    /// Offset of the learners' local time zone from UTC, in hours.
    pub local_utc_offset_hours: i32,
    pub season_sweep_interval_secs: u64,
    /// Local hour at which the daily streak sweep runs.
    pub streak_job_hour: u32,
    /// Local hour at which streak reminders go out.
    pub reminder_job_hour: u32,
    /// Store notices in the in-app inbox. When false they are only logged.
    pub inbox_notifications: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            rust_log,
            local_utc_offset_hours: parse_or("LOCAL_UTC_OFFSET_HOURS", 7),
            season_sweep_interval_secs: parse_or("SEASON_SWEEP_INTERVAL_SECS", 300),
            streak_job_hour: parse_or("STREAK_JOB_HOUR", 0),
            reminder_job_hour: parse_or("REMINDER_JOB_HOUR", 20),
            inbox_notifications: parse_or("INBOX_NOTIFICATIONS", true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            rust_log: "info".to_string(),
            local_utc_offset_hours: 7,
            season_sweep_interval_secs: 300,
            streak_job_hour: 0,
            reminder_job_hour: 20,
            inbox_notifications: true,
        }
    }
}

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring malformed {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
