// src/store/mod.rs

//! Storage seams used by the services.
//!
//! `PgStore` implements every trait against PostgreSQL. Services only see the
//! traits, so they run unchanged against any other implementation.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    error::AppError,
    models::{
        attempt::{AnswerRecord, ExamAttempt},
        repetition::{NewRepetition, Repetition},
        season::{Season, SeasonRequest},
        standing::SeasonStanding,
        streak::{ReminderCandidate, StreakLeader, StreakState},
        user::UserProfile,
    },
    scoring::SeasonWindow,
};

pub use postgres::PgStore;

/// Seasons, exam attempts and season standings.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// All seasons, newest start first (undated seasons last).
    async fn list_seasons(&self, is_active: Option<bool>) -> Result<Vec<Season>, AppError>;

    /// One page of seasons whose name or number contains `keyword`, plus the total match count.
    async fn search_seasons(
        &self,
        keyword: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Season>, i64), AppError>;

    async fn find_season(&self, season_id: i64) -> Result<Option<Season>, AppError>;

    /// Newest active season whose bounds contain `now`.
    async fn current_season(&self, now: DateTime<Utc>) -> Result<Option<Season>, AppError>;

    async fn insert_season(&self, req: &SeasonRequest, now: DateTime<Utc>) -> Result<i64, AppError>;

    async fn update_season(
        &self,
        season_id: i64,
        req: &SeasonRequest,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    async fn delete_season(&self, season_id: i64) -> Result<bool, AppError>;

    /// Marks `season_id` active and every other season inactive.
    async fn set_current_season(&self, season_id: i64, now: DateTime<Utc>) -> Result<bool, AppError>;

    async fn season_number_exists(
        &self,
        season_number: i32,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError>;

    /// Whether `[start, end]` intersects another season. Missing bounds are open.
    async fn date_range_overlaps(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError>;

    /// Activates inactive seasons that have started and not ended. Returns the count.
    async fn activate_due_seasons(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Deactivates active seasons whose end has passed. Returns the count.
    async fn end_expired_seasons(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    async fn count_participants(&self, season_id: i64) -> Result<i64, AppError>;

    /// Completed attempts ending inside `window`, optionally for one user.
    async fn completed_attempts(
        &self,
        window: &SeasonWindow,
        user_id: Option<i64>,
    ) -> Result<Vec<ExamAttempt>, AppError>;

    async fn answers_for_attempts(&self, attempt_ids: &[i64]) -> Result<Vec<AnswerRecord>, AppError>;

    async fn find_attempt(&self, attempt_id: i64) -> Result<Option<ExamAttempt>, AppError>;

    /// Whether the user completed the same (exam, part) in an attempt older than `before_attempt_id`.
    async fn has_earlier_completed_attempt(
        &self,
        user_id: i64,
        exam_id: i64,
        exam_part_id: Option<i64>,
        before_attempt_id: i64,
    ) -> Result<bool, AppError>;

    /// Deletes the season's standings and inserts `standings`, atomically.
    async fn replace_standings(
        &self,
        season_id: i64,
        standings: &[SeasonStanding],
    ) -> Result<u64, AppError>;

    /// Deletes the season's standings. With `archive`, the deleted rows and
    /// their rank are copied to the archive in the same statement.
    /// Returns (archived, cleared).
    async fn reset_standings(
        &self,
        season_id: i64,
        archive: bool,
        now: DateTime<Utc>,
    ) -> Result<(u64, u64), AppError>;

    async fn find_standing(
        &self,
        season_id: i64,
        user_id: i64,
    ) -> Result<Option<SeasonStanding>, AppError>;

    /// Highest scores first.
    async fn top_standings(&self, season_id: i64, limit: i64) -> Result<Vec<SeasonStanding>, AppError>;

    async fn count_scores_above(&self, season_id: i64, score: i64) -> Result<i64, AppError>;

    /// Adds `standing.score` to the (season, user) standing, creating it if needed.
    /// The estimate is overwritten and the first attempt date kept once set.
    async fn add_points(&self, standing: &SeasonStanding) -> Result<SeasonStanding, AppError>;

    async fn user_profiles(&self, user_ids: &[i64]) -> Result<Vec<UserProfile>, AppError>;
}

/// Per-user practice streaks.
#[async_trait]
pub trait StreakStore: Send + Sync {
    async fn find_streak(&self, user_id: i64) -> Result<Option<StreakState>, AppError>;

    async fn save_streak(&self, user_id: i64, state: &StreakState) -> Result<(), AppError>;

    /// Users with a live streak whose last practice is before yesterday.
    async fn users_with_missed_day(&self, today: NaiveDate) -> Result<Vec<i64>, AppError>;

    /// Learners with a live streak who have not practiced on `today`.
    async fn reminder_candidates(&self, today: NaiveDate) -> Result<Vec<ReminderCandidate>, AppError>;

    async fn top_streaks(&self, limit: i64) -> Result<Vec<StreakLeader>, AppError>;
}

/// Spaced-repetition records and the vocabulary lists they point to.
#[async_trait]
pub trait RepetitionStore: Send + Sync {
    async fn find_repetition(&self, repetition_id: i64) -> Result<Option<Repetition>, AppError>;

    async fn find_by_word(&self, user_id: i64, vocabulary_id: i64) -> Result<Option<Repetition>, AppError>;

    /// List-level record (no word) of the user for the list.
    async fn find_by_list(
        &self,
        user_id: i64,
        vocabulary_list_id: i64,
    ) -> Result<Option<Repetition>, AppError>;

    /// All records of the user, latest next review first.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Repetition>, AppError>;

    /// Reviewed, still weak (interval 1) New/Learning records due at `now`, oldest first.
    async fn due_for_user(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<Repetition>, AppError>;

    async fn insert_repetition(&self, new: &NewRepetition) -> Result<Repetition, AppError>;

    async fn update_repetition(&self, repetition: &Repetition) -> Result<(), AppError>;

    async fn vocabulary_list_name(&self, vocabulary_list_id: i64) -> Result<Option<String>, AppError>;
}
