// src/services/repetition.rs

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::{MASTERED_INTERVAL_DAYS, MAX_REVIEW_INTERVAL_DAYS, SECOND_REVIEW_INTERVAL_DAYS},
    error::AppError,
    models::repetition::{
        NewRepetition, QuizResultRequest, QuizScore, Repetition, RepetitionStatus, RepetitionView,
        ReviewOutcome, ReviewRequest,
    },
    store::RepetitionStore,
};

const UNKNOWN_LIST_NAME: &str = "Unknown";

/// Interval and status after a review of quality `quality` (0..=5).
///
/// A simplified SM-2: a weak answer resets to one day, the second review of a
/// fresh item jumps to six days, later good answers stretch the interval by
/// half a step per quality point above 3.
pub fn next_review(quality: i32, interval_days: i32, review_count: i32) -> (i32, RepetitionStatus) {
    let quality = quality.clamp(0, 5);
    let second_review = review_count == 1 && interval_days == 1;

    let (interval, status) = if quality < 3 {
        let status = if review_count == 0 {
            RepetitionStatus::New
        } else {
            RepetitionStatus::Learning
        };
        (1, status)
    } else if quality == 3 {
        let interval = if second_review {
            SECOND_REVIEW_INTERVAL_DAYS
        } else {
            interval_days
        };
        (interval, RepetitionStatus::Learning)
    } else {
        let interval = if second_review {
            SECOND_REVIEW_INTERVAL_DAYS
        } else {
            // interval * (1 + (q - 3) / 2), rounded up
            let numerator = interval_days as i64 * (2 + (quality - 3) as i64);
            ((numerator + 1) / 2) as i32
        };
        let status = if interval >= MASTERED_INTERVAL_DAYS {
            RepetitionStatus::Mastered
        } else {
            RepetitionStatus::Learning
        };
        (interval, status)
    };

    (interval.min(MAX_REVIEW_INTERVAL_DAYS), status)
}

/// Status derived from progress rather than the stored column.
pub fn display_status(repetition: &Repetition) -> RepetitionStatus {
    if repetition.interval_days >= MASTERED_INTERVAL_DAYS {
        RepetitionStatus::Mastered
    } else if repetition.review_count > 0
        || repetition.best_quiz_score.is_some()
        || repetition.last_quiz_score.is_some()
    {
        RepetitionStatus::Learning
    } else {
        RepetitionStatus::New
    }
}

/// Whole days until the next review, never negative.
pub fn days_until_review(next_review_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    next_review_at
        .map(|next| (next - now).num_days().max(0))
        .unwrap_or(0)
}

pub fn to_view(repetition: Repetition, now: DateTime<Utc>) -> RepetitionView {
    let status = display_status(&repetition);
    RepetitionView {
        id: repetition.id,
        user_id: repetition.user_id,
        vocabulary_id: repetition.vocabulary_id,
        vocabulary_list_id: repetition.vocabulary_list_id,
        vocabulary_list_name: repetition
            .vocabulary_list_name
            .unwrap_or_else(|| UNKNOWN_LIST_NAME.to_string()),
        vocabulary_word: repetition.vocabulary_word,
        last_reviewed_at: repetition.last_reviewed_at,
        next_review_at: repetition.next_review_at,
        review_count: repetition.review_count,
        interval_days: repetition.interval_days,
        status,
        is_due: repetition.next_review_at.is_some_and(|next| next <= now),
        days_until_review: days_until_review(repetition.next_review_at, now),
        best_quiz_score: repetition.best_quiz_score,
        last_quiz_score: repetition.last_quiz_score,
        last_quiz_completed_at: repetition.last_quiz_completed_at,
        total_quiz_attempts: repetition.total_quiz_attempts,
    }
}

/// Vocabulary review scheduling and quiz results.
#[derive(Clone)]
pub struct RepetitionService {
    store: Arc<dyn RepetitionStore>,
}

impl RepetitionService {
    pub fn new(store: Arc<dyn RepetitionStore>) -> Self {
        Self { store }
    }

    /// Items the user should review now, oldest first.
    pub async fn due_for_review(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<RepetitionView>, AppError> {
        let items = self.store.due_for_user(user_id, now).await?;
        Ok(items
            .into_iter()
            .map(|item| RepetitionView {
                is_due: true,
                ..to_view(item, now)
            })
            .collect())
    }

    pub async fn user_repetitions(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<RepetitionView>, AppError> {
        let items = self.store.list_for_user(user_id).await?;
        Ok(items.into_iter().map(|item| to_view(item, now)).collect())
    }

    pub async fn by_list(
        &self,
        user_id: i64,
        vocabulary_list_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<RepetitionView>, AppError> {
        let item = self.store.find_by_list(user_id, vocabulary_list_id).await?;
        Ok(item.map(|item| to_view(item, now)))
    }

    /// Starts tracking a vocabulary list. Returns the existing record when there is one.
    pub async fn create_repetition(
        &self,
        user_id: i64,
        vocabulary_list_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RepetitionView, AppError> {
        if let Some(existing) = self.store.find_by_list(user_id, vocabulary_list_id).await? {
            return Ok(to_view(existing, now));
        }

        let created = self.start(user_id, None, vocabulary_list_id, now).await?;
        tracing::info!(
            "User {} started reviewing vocabulary list {}",
            user_id,
            vocabulary_list_id
        );
        Ok(to_view(created, now))
    }

    /// Records a review, addressed by repetition id or by (word, list).
    pub async fn review(
        &self,
        user_id: i64,
        req: &ReviewRequest,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, AppError> {
        let mut repetition = match (req.repetition_id, req.vocabulary_id, req.vocabulary_list_id) {
            (Some(id), _, _) => self
                .store
                .find_repetition(id)
                .await?
                .filter(|r| r.user_id == user_id)
                .ok_or_else(|| AppError::NotFound(format!("Repetition {} not found", id)))?,
            (None, Some(vocabulary_id), Some(list_id)) => {
                match self.store.find_by_word(user_id, vocabulary_id).await? {
                    Some(existing) => existing,
                    None => self.start(user_id, Some(vocabulary_id), list_id, now).await?,
                }
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Either repetition_id or both vocabulary_id and vocabulary_list_id are required."
                        .to_string(),
                ));
            }
        };

        let (interval, status) = next_review(req.quality, repetition.interval_days, repetition.review_count);
        let next_review_at = now + Duration::days(interval as i64);

        repetition.last_reviewed_at = Some(now);
        repetition.next_review_at = Some(next_review_at);
        repetition.review_count += 1;
        repetition.interval_days = interval;
        repetition.status = status.as_str().to_string();

        self.store.update_repetition(&repetition).await?;
        tracing::debug!(
            "Repetition {} reviewed with quality {}: next in {} days",
            repetition.id,
            req.quality,
            interval
        );

        let view = RepetitionView {
            is_due: false,
            days_until_review: interval as i64,
            ..to_view(repetition, now)
        };
        Ok(ReviewOutcome {
            repetition: view,
            next_review_at,
            new_interval_days: interval,
        })
    }

    /// Stores a vocabulary quiz result on the list-level record, creating it if needed.
    pub async fn save_quiz_result(
        &self,
        user_id: i64,
        req: &QuizResultRequest,
        now: DateTime<Utc>,
    ) -> Result<RepetitionView, AppError> {
        let mut repetition = match self.store.find_by_list(user_id, req.vocabulary_list_id).await? {
            Some(existing) => existing,
            None => self.start(user_id, None, req.vocabulary_list_id, now).await?,
        };

        repetition.last_quiz_score = Some(req.score);
        repetition.last_quiz_completed_at = Some(now);
        repetition.total_quiz_attempts = Some(repetition.total_quiz_attempts.unwrap_or(0) + 1);
        if repetition.best_quiz_score.is_none_or(|best| req.score > best) {
            repetition.best_quiz_score = Some(req.score);
        }
        repetition.status = display_status(&repetition).as_str().to_string();

        self.store.update_repetition(&repetition).await?;
        Ok(to_view(repetition, now))
    }

    /// Quiz scores of the user, optionally for one list. Lists never quizzed are left out.
    pub async fn quiz_scores(
        &self,
        user_id: i64,
        vocabulary_list_id: Option<i64>,
    ) -> Result<Vec<QuizScore>, AppError> {
        let items = match vocabulary_list_id {
            Some(list_id) => self
                .store
                .find_by_list(user_id, list_id)
                .await?
                .into_iter()
                .collect(),
            None => self.store.list_for_user(user_id).await?,
        };

        Ok(items
            .into_iter()
            .filter(|r| r.best_quiz_score.is_some() || r.last_quiz_score.is_some())
            .map(|r| QuizScore {
                vocabulary_list_id: r.vocabulary_list_id,
                vocabulary_list_name: r
                    .vocabulary_list_name
                    .unwrap_or_else(|| UNKNOWN_LIST_NAME.to_string()),
                best_score: r.best_quiz_score,
                last_score: r.last_quiz_score,
                last_completed_at: r.last_quiz_completed_at,
                total_attempts: r.total_quiz_attempts,
            })
            .collect())
    }

    /// Inserts a fresh record due tomorrow. The list must exist.
    async fn start(
        &self,
        user_id: i64,
        vocabulary_id: Option<i64>,
        vocabulary_list_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Repetition, AppError> {
        if self
            .store
            .vocabulary_list_name(vocabulary_list_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "Vocabulary list {} not found",
                vocabulary_list_id
            )));
        }

        self.store
            .insert_repetition(&NewRepetition {
                user_id,
                vocabulary_id,
                vocabulary_list_id,
                last_reviewed_at: now,
                next_review_at: now + Duration::days(1),
            })
            .await
    }
}
