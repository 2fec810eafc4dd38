// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::{
    config::LEARNER_ROLE_ID,
    error::AppError,
    models::{
        attempt::{AnswerRecord, COMPLETED, ExamAttempt},
        repetition::{NewRepetition, Repetition, RepetitionStatus},
        season::{Season, SeasonRequest},
        standing::SeasonStanding,
        streak::{ReminderCandidate, StreakLeader, StreakState},
        user::UserProfile,
    },
    scoring::SeasonWindow,
    store::{LeaderboardStore, RepetitionStore, StreakStore},
};

const SEASON_COLUMNS: &str =
    "id, season_name, season_number, start_date, end_date, is_active, created_at, updated_at";

const STANDING_COLUMNS: &str = "season_id, user_id, score, estimated_toeic, first_attempt_date";

const REPETITION_SELECT: &str = r#"
    SELECT
        r.id, r.user_id, r.vocabulary_id, r.vocabulary_list_id,
        l.name AS vocabulary_list_name,
        v.word AS vocabulary_word,
        r.last_reviewed_at, r.next_review_at, r.review_count, r.interval_days, r.status,
        r.best_quiz_score, r.last_quiz_score, r.last_quiz_completed_at, r.total_quiz_attempts
    FROM spaced_repetitions r
    LEFT JOIN vocabulary_lists l ON l.id = r.vocabulary_list_id
    LEFT JOIN vocabularies v ON v.id = r.vocabulary_id
"#;

/// PostgreSQL implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// LIKE pattern matching `keyword` literally anywhere in the text.
fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl LeaderboardStore for PgStore {
    async fn list_seasons(&self, is_active: Option<bool>) -> Result<Vec<Season>, AppError> {
        let sql = format!(
            "SELECT {} FROM seasons WHERE ($1::BOOLEAN IS NULL OR is_active = $1) \
             ORDER BY start_date DESC NULLS LAST, id DESC",
            SEASON_COLUMNS
        );
        let seasons = sqlx::query_as::<_, Season>(&sql)
            .bind(is_active)
            .fetch_all(&self.pool)
            .await?;
        Ok(seasons)
    }

    async fn search_seasons(
        &self,
        keyword: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Season>, i64), AppError> {
        let pattern = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(contains_pattern);

        let filter = "($1::TEXT IS NULL OR season_name ILIKE $1 ESCAPE '\\' \
                      OR season_number::TEXT LIKE $1 ESCAPE '\\')";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM seasons WHERE {}", filter))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM seasons WHERE {} ORDER BY start_date DESC NULLS LAST, id DESC \
             OFFSET $2 LIMIT $3",
            SEASON_COLUMNS, filter
        );
        let seasons = sqlx::query_as::<_, Season>(&sql)
            .bind(&pattern)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok((seasons, total))
    }

    async fn find_season(&self, season_id: i64) -> Result<Option<Season>, AppError> {
        let sql = format!("SELECT {} FROM seasons WHERE id = $1", SEASON_COLUMNS);
        let season = sqlx::query_as::<_, Season>(&sql)
            .bind(season_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(season)
    }

    async fn current_season(&self, now: DateTime<Utc>) -> Result<Option<Season>, AppError> {
        let sql = format!(
            "SELECT {} FROM seasons \
             WHERE is_active = TRUE \
               AND (start_date IS NULL OR start_date <= $1) \
               AND (end_date IS NULL OR end_date >= $1) \
             ORDER BY start_date DESC NULLS LAST, id DESC \
             LIMIT 1",
            SEASON_COLUMNS
        );
        let season = sqlx::query_as::<_, Season>(&sql)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(season)
    }

    async fn insert_season(&self, req: &SeasonRequest, now: DateTime<Utc>) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO seasons (season_name, season_number, start_date, end_date, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&req.season_name)
        .bind(req.season_number)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.is_active)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update_season(
        &self,
        season_id: i64,
        req: &SeasonRequest,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE seasons
            SET season_name = $1, season_number = $2, start_date = $3, end_date = $4,
                is_active = $5, updated_at = $6
            WHERE id = $7
            "#,
        )
        .bind(&req.season_name)
        .bind(req.season_number)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.is_active)
        .bind(now)
        .bind(season_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_season(&self, season_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM seasons WHERE id = $1")
            .bind(season_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_current_season(&self, season_id: i64, now: DateTime<Utc>) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM seasons WHERE id = $1)")
            .bind(season_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE seasons SET is_active = FALSE, updated_at = $1 WHERE is_active = TRUE AND id <> $2",
        )
        .bind(now)
        .bind(season_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE seasons SET is_active = TRUE, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(season_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn season_number_exists(
        &self,
        season_number: i32,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM seasons WHERE season_number = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(season_number)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn date_range_overlaps(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        let overlaps: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM seasons
                WHERE ($3::BIGINT IS NULL OR id <> $3)
                  AND (start_date IS NULL OR $2::TIMESTAMPTZ IS NULL OR start_date <= $2)
                  AND ($1::TIMESTAMPTZ IS NULL OR end_date IS NULL OR $1 <= end_date)
            )
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(overlaps)
    }

    async fn activate_due_seasons(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE seasons SET is_active = TRUE, updated_at = $1
            WHERE is_active = FALSE
              AND start_date IS NOT NULL AND start_date <= $1
              AND (end_date IS NULL OR end_date >= $1)
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn end_expired_seasons(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE seasons SET is_active = FALSE, updated_at = $1
            WHERE is_active = TRUE AND end_date IS NOT NULL AND end_date < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn count_participants(&self, season_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM season_standings WHERE season_id = $1")
            .bind(season_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn completed_attempts(
        &self,
        window: &SeasonWindow,
        user_id: Option<i64>,
    ) -> Result<Vec<ExamAttempt>, AppError> {
        // A NULL end_time fails any bound comparison, which keeps such attempts
        // out of every bounded window.
        let attempts = sqlx::query_as::<_, ExamAttempt>(
            r#"
            SELECT a.id, a.user_id, a.exam_id, a.exam_part_id, p.part_code,
                   a.score, a.status, a.start_time, a.end_time
            FROM exam_attempts a
            LEFT JOIN exam_parts p ON p.id = a.exam_part_id
            WHERE a.status = $1
              AND ($2::TIMESTAMPTZ IS NULL OR a.end_time >= $2)
              AND ($3::TIMESTAMPTZ IS NULL OR a.end_time <= $3)
              AND ($4::BIGINT IS NULL OR a.user_id = $4)
            ORDER BY a.end_time, a.id
            "#,
        )
        .bind(COMPLETED)
        .bind(window.start)
        .bind(window.end)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attempts)
    }

    async fn answers_for_attempts(&self, attempt_ids: &[i64]) -> Result<Vec<AnswerRecord>, AppError> {
        if attempt_ids.is_empty() {
            return Ok(Vec::new());
        }
        let answers = sqlx::query_as::<_, AnswerRecord>(
            "SELECT attempt_id, is_correct FROM attempt_answers WHERE attempt_id = ANY($1)",
        )
        .bind(attempt_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(answers)
    }

    async fn find_attempt(&self, attempt_id: i64) -> Result<Option<ExamAttempt>, AppError> {
        let attempt = sqlx::query_as::<_, ExamAttempt>(
            r#"
            SELECT a.id, a.user_id, a.exam_id, a.exam_part_id, p.part_code,
                   a.score, a.status, a.start_time, a.end_time
            FROM exam_attempts a
            LEFT JOIN exam_parts p ON p.id = a.exam_part_id
            WHERE a.id = $1
            "#,
        )
        .bind(attempt_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(attempt)
    }

    async fn has_earlier_completed_attempt(
        &self,
        user_id: i64,
        exam_id: i64,
        exam_part_id: Option<i64>,
        before_attempt_id: i64,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM exam_attempts
                WHERE user_id = $1 AND exam_id = $2
                  AND exam_part_id IS NOT DISTINCT FROM $3
                  AND status = $4 AND id < $5
            )
            "#,
        )
        .bind(user_id)
        .bind(exam_id)
        .bind(exam_part_id)
        .bind(COMPLETED)
        .bind(before_attempt_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn replace_standings(
        &self,
        season_id: i64,
        standings: &[SeasonStanding],
    ) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM season_standings WHERE season_id = $1")
            .bind(season_id)
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0;
        for standing in standings {
            let result = sqlx::query(
                r#"
                INSERT INTO season_standings (season_id, user_id, score, estimated_toeic, first_attempt_date)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(season_id)
            .bind(standing.user_id)
            .bind(standing.score)
            .bind(standing.estimated_toeic)
            .bind(standing.first_attempt_date)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn reset_standings(
        &self,
        season_id: i64,
        archive: bool,
        now: DateTime<Utc>,
    ) -> Result<(u64, u64), AppError> {
        if !archive {
            let result = sqlx::query("DELETE FROM season_standings WHERE season_id = $1")
                .bind(season_id)
                .execute(&self.pool)
                .await?;
            return Ok((0, result.rows_affected()));
        }

        // Archive exactly the rows the DELETE removed, so an award landing
        // mid-reset is either archived or kept.
        let result = sqlx::query(
            r#"
            WITH cleared AS (
                DELETE FROM season_standings
                WHERE season_id = $1
                RETURNING season_id, user_id, score, estimated_toeic
            )
            INSERT INTO season_archives (season_id, user_id, score, estimated_toeic, final_rank, archived_at)
            SELECT season_id, user_id, score, estimated_toeic,
                   RANK() OVER (ORDER BY score DESC), $2
            FROM cleared
            "#,
        )
        .bind(season_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let archived = result.rows_affected();
        Ok((archived, archived))
    }

    async fn find_standing(
        &self,
        season_id: i64,
        user_id: i64,
    ) -> Result<Option<SeasonStanding>, AppError> {
        let sql = format!(
            "SELECT {} FROM season_standings WHERE season_id = $1 AND user_id = $2",
            STANDING_COLUMNS
        );
        let standing = sqlx::query_as::<_, SeasonStanding>(&sql)
            .bind(season_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(standing)
    }

    async fn top_standings(&self, season_id: i64, limit: i64) -> Result<Vec<SeasonStanding>, AppError> {
        let sql = format!(
            "SELECT {} FROM season_standings WHERE season_id = $1 \
             ORDER BY score DESC, user_id LIMIT $2",
            STANDING_COLUMNS
        );
        let standings = sqlx::query_as::<_, SeasonStanding>(&sql)
            .bind(season_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(standings)
    }

    async fn count_scores_above(&self, season_id: i64, score: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM season_standings WHERE season_id = $1 AND score > $2",
        )
        .bind(season_id)
        .bind(score)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn add_points(&self, standing: &SeasonStanding) -> Result<SeasonStanding, AppError> {
        let sql = format!(
            r#"
            INSERT INTO season_standings (season_id, user_id, score, estimated_toeic, first_attempt_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (season_id, user_id) DO UPDATE SET
                score = season_standings.score + EXCLUDED.score,
                estimated_toeic = EXCLUDED.estimated_toeic,
                first_attempt_date = COALESCE(season_standings.first_attempt_date, EXCLUDED.first_attempt_date)
            RETURNING {}
            "#,
            STANDING_COLUMNS
        );
        let saved = sqlx::query_as::<_, SeasonStanding>(&sql)
            .bind(standing.season_id)
            .bind(standing.user_id)
            .bind(standing.score)
            .bind(standing.estimated_toeic)
            .bind(standing.first_attempt_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn user_profiles(&self, user_ids: &[i64]) -> Result<Vec<UserProfile>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let profiles = sqlx::query_as::<_, UserProfile>(
            "SELECT id, full_name, avatar_url FROM users WHERE id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }
}

#[async_trait]
impl StreakStore for PgStore {
    async fn find_streak(&self, user_id: i64) -> Result<Option<StreakState>, AppError> {
        let state = sqlx::query_as::<_, StreakState>(
            "SELECT current_streak, longest_streak, last_practice_date, freeze_tokens FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(state)
    }

    async fn save_streak(&self, user_id: i64, state: &StreakState) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET current_streak = $1, longest_streak = $2, last_practice_date = $3, freeze_tokens = $4
            WHERE id = $5
            "#,
        )
        .bind(state.current_streak)
        .bind(state.longest_streak)
        .bind(state.last_practice_date)
        .bind(state.freeze_tokens)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn users_with_missed_day(&self, today: NaiveDate) -> Result<Vec<i64>, AppError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM users
            WHERE current_streak > 0
              AND last_practice_date IS NOT NULL
              AND last_practice_date < $1::DATE - 1
            ORDER BY id
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn reminder_candidates(&self, today: NaiveDate) -> Result<Vec<ReminderCandidate>, AppError> {
        let candidates = sqlx::query_as::<_, ReminderCandidate>(
            r#"
            SELECT id AS user_id, email, full_name, current_streak, freeze_tokens
            FROM users
            WHERE role_id = $1
              AND current_streak > 0
              AND (last_practice_date IS NULL OR last_practice_date < $2)
            ORDER BY current_streak DESC, id
            "#,
        )
        .bind(LEARNER_ROLE_ID)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(candidates)
    }

    async fn top_streaks(&self, limit: i64) -> Result<Vec<StreakLeader>, AppError> {
        let leaders = sqlx::query_as::<_, StreakLeader>(
            r#"
            SELECT id AS user_id, full_name, avatar_url, current_streak, longest_streak
            FROM users
            ORDER BY current_streak DESC, longest_streak DESC, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(leaders)
    }
}

#[async_trait]
impl RepetitionStore for PgStore {
    async fn find_repetition(&self, repetition_id: i64) -> Result<Option<Repetition>, AppError> {
        let sql = format!("{} WHERE r.id = $1", REPETITION_SELECT);
        let repetition = sqlx::query_as::<_, Repetition>(&sql)
            .bind(repetition_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(repetition)
    }

    async fn find_by_word(&self, user_id: i64, vocabulary_id: i64) -> Result<Option<Repetition>, AppError> {
        let sql = format!(
            "{} WHERE r.user_id = $1 AND r.vocabulary_id = $2 ORDER BY r.id LIMIT 1",
            REPETITION_SELECT
        );
        let repetition = sqlx::query_as::<_, Repetition>(&sql)
            .bind(user_id)
            .bind(vocabulary_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(repetition)
    }

    async fn find_by_list(
        &self,
        user_id: i64,
        vocabulary_list_id: i64,
    ) -> Result<Option<Repetition>, AppError> {
        let sql = format!(
            "{} WHERE r.user_id = $1 AND r.vocabulary_list_id = $2 AND r.vocabulary_id IS NULL \
             ORDER BY r.id LIMIT 1",
            REPETITION_SELECT
        );
        let repetition = sqlx::query_as::<_, Repetition>(&sql)
            .bind(user_id)
            .bind(vocabulary_list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(repetition)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Repetition>, AppError> {
        let sql = format!(
            "{} WHERE r.user_id = $1 ORDER BY r.next_review_at DESC NULLS LAST, r.id",
            REPETITION_SELECT
        );
        let repetitions = sqlx::query_as::<_, Repetition>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(repetitions)
    }

    async fn due_for_user(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<Repetition>, AppError> {
        let sql = format!(
            "{} WHERE r.user_id = $1 \
               AND r.next_review_at <= $2 \
               AND r.status IN ($3, $4) \
               AND r.review_count > 0 \
               AND r.interval_days = 1 \
             ORDER BY r.next_review_at, r.id",
            REPETITION_SELECT
        );
        let repetitions = sqlx::query_as::<_, Repetition>(&sql)
            .bind(user_id)
            .bind(now)
            .bind(RepetitionStatus::New.as_str())
            .bind(RepetitionStatus::Learning.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(repetitions)
    }

    async fn insert_repetition(&self, new: &NewRepetition) -> Result<Repetition, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO spaced_repetitions
                (user_id, vocabulary_id, vocabulary_list_id, last_reviewed_at, next_review_at,
                 review_count, interval_days, status)
            VALUES ($1, $2, $3, $4, $5, 0, 1, $6)
            RETURNING id
            "#,
        )
        .bind(new.user_id)
        .bind(new.vocabulary_id)
        .bind(new.vocabulary_list_id)
        .bind(new.last_reviewed_at)
        .bind(new.next_review_at)
        .bind(RepetitionStatus::New.as_str())
        .fetch_one(&self.pool)
        .await?;

        self.find_repetition(id)
            .await?
            .ok_or_else(|| AppError::InternalServerError(format!("Repetition {} vanished after insert", id)))
    }

    async fn update_repetition(&self, repetition: &Repetition) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE spaced_repetitions
            SET last_reviewed_at = $1, next_review_at = $2, review_count = $3, interval_days = $4,
                status = $5, best_quiz_score = $6, last_quiz_score = $7,
                last_quiz_completed_at = $8, total_quiz_attempts = $9
            WHERE id = $10
            "#,
        )
        .bind(repetition.last_reviewed_at)
        .bind(repetition.next_review_at)
        .bind(repetition.review_count)
        .bind(repetition.interval_days)
        .bind(&repetition.status)
        .bind(repetition.best_quiz_score)
        .bind(repetition.last_quiz_score)
        .bind(repetition.last_quiz_completed_at)
        .bind(repetition.total_quiz_attempts)
        .bind(repetition.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn vocabulary_list_name(&self, vocabulary_list_id: i64) -> Result<Option<String>, AppError> {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM vocabulary_lists WHERE id = $1")
            .bind(vocabulary_list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name)
    }
}
