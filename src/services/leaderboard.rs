// src/services/leaderboard.rs

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    config::{LISTENING_PART_ID, MAX_TOEIC_SCORE, READING_PART_ID, READY_FOR_TOEIC_SCORE},
    error::AppError,
    models::{
        attempt::ExamAttempt,
        season::Season,
        standing::{
            AwardRequest, AwardResponse, RankEntry, SeasonStanding, ToeicCalculation, UserSeasonStats,
        },
        user::UserProfile,
    },
    scoring::{
        SeasonWindow, ToeicLevel,
        award::{completion_message, compute_award},
        season::recalculate,
        tier::tier_for_score,
        toeic::estimate_toeic,
    },
    services::{
        notifier::{Notice, NoticeKind, Notifier, notify_quietly},
        seasons::season_not_found,
    },
    store::LeaderboardStore,
};

/// Counters of a season reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    pub archived: u64,
    pub cleared: u64,
}

/// Season standings: full recomputation, per-attempt awards and the read side.
#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn LeaderboardStore>,
    notifier: Arc<dyn Notifier>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn LeaderboardStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Rebuilds every standing of the season from its completed attempts.
    /// Returns the number of standings written.
    pub async fn recalculate_season_scores(&self, season_id: i64) -> Result<u64, AppError> {
        let season = self
            .store
            .find_season(season_id)
            .await?
            .ok_or_else(|| season_not_found(season_id))?;
        let window = season.window();

        let attempts = self.store.completed_attempts(&window, None).await?;
        let attempt_ids: Vec<i64> = attempts.iter().map(|a| a.id).collect();
        let answers = self.store.answers_for_attempts(&attempt_ids).await?;

        let standings = recalculate(season_id, &window, &attempts, &answers);
        let written = self.store.replace_standings(season_id, &standings).await?;

        tracing::info!(
            "Recalculated season {}: {} attempts, {} standings",
            season_id,
            attempts.len(),
            written
        );
        Ok(written)
    }

    /// Deletes the season's standings, archiving them first when asked.
    pub async fn reset_season(
        &self,
        season_id: i64,
        archive: bool,
        now: DateTime<Utc>,
    ) -> Result<ResetSummary, AppError> {
        if self.store.find_season(season_id).await?.is_none() {
            return Err(season_not_found(season_id));
        }

        let (archived, cleared) = self.store.reset_standings(season_id, archive, now).await?;

        tracing::info!(
            "Reset season {}: {} archived, {} cleared",
            season_id,
            archived,
            cleared
        );
        Ok(ResetSummary { archived, cleared })
    }

    /// Top `top` standings, ranked 1..n, decorated with profile and estimate.
    /// Empty when there is no such (or no current) season.
    pub async fn season_ranking(
        &self,
        season_id: Option<i64>,
        top: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<RankEntry>, AppError> {
        let Some(season) = self.resolve_season(season_id, now).await? else {
            return Ok(Vec::new());
        };

        let standings = self.store.top_standings(season.id, top.max(0)).await?;
        if standings.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<i64> = standings.iter().map(|s| s.user_id).collect();
        let profiles: HashMap<i64, UserProfile> = self
            .store
            .user_profiles(&user_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let ranked: HashSet<i64> = user_ids.iter().copied().collect();
        let mut attempts_by_user: HashMap<i64, Vec<ExamAttempt>> = HashMap::new();
        for attempt in self.store.completed_attempts(&season.window(), None).await? {
            if ranked.contains(&attempt.user_id) {
                attempts_by_user.entry(attempt.user_id).or_default().push(attempt);
            }
        }

        let entries = standings
            .into_iter()
            .enumerate()
            .map(|(i, standing)| {
                let estimate = attempts_by_user
                    .get(&standing.user_id)
                    .map(|attempts| estimate_toeic(attempts))
                    .unwrap_or(0);
                let profile = profiles.get(&standing.user_id);

                RankEntry {
                    user_id: standing.user_id,
                    full_name: profile
                        .map(|p| p.full_name.clone())
                        .unwrap_or_else(|| UserProfile::fallback_name(standing.user_id)),
                    score: standing.score,
                    rank: i as i64 + 1,
                    estimated_toeic: estimate,
                    toeic_level: ToeicLevel::from_score(estimate),
                    avatar_url: profile.and_then(|p| p.avatar_url.clone()),
                }
            })
            .collect();

        Ok(entries)
    }

    /// 1 + number of strictly higher scores; 0 without a positive score.
    pub async fn user_rank(
        &self,
        user_id: i64,
        season_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let Some(season) = self.resolve_season(season_id, now).await? else {
            return Ok(0);
        };
        let standing = self.store.find_standing(season.id, user_id).await?;
        self.rank_of(season.id, standing.as_ref()).await
    }

    /// Stats of the user in the season. None when the season does not exist
    /// (or there is no current season); zeroed stats without a standing.
    pub async fn user_season_stats(
        &self,
        user_id: i64,
        season_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Option<UserSeasonStats>, AppError> {
        let Some(season) = self.resolve_season(season_id, now).await? else {
            return Ok(None);
        };
        let Some(standing) = self.store.find_standing(season.id, user_id).await? else {
            return Ok(Some(UserSeasonStats::empty(user_id)));
        };

        let rank = self.rank_of(season.id, Some(&standing)).await?;
        let attempts = self
            .store
            .completed_attempts(&season.window(), Some(user_id))
            .await?;
        let attempt_ids: Vec<i64> = attempts.iter().map(|a| a.id).collect();
        let answers = self.store.answers_for_attempts(&attempt_ids).await?;
        let correct = answers.iter().filter(|a| a.is_correct).count() as i64;

        let estimate = estimate_toeic(&attempts).min(MAX_TOEIC_SCORE);

        Ok(Some(UserSeasonStats {
            user_id,
            current_rank: rank,
            current_score: standing.score,
            estimated_toeic: estimate,
            toeic_level: ToeicLevel::from_score(estimate),
            total_attempts: attempts.len() as i64,
            correct_answers: correct,
            accuracy_rate: accuracy_rate(correct, answers.len() as i64),
            is_ready_for_toeic: estimate >= READY_FOR_TOEIC_SCORE,
        }))
    }

    /// How the user's next attempts will be scored in the season.
    /// None when the season does not exist (or there is no current season).
    pub async fn toeic_calculation(
        &self,
        user_id: i64,
        season_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Option<ToeicCalculation>, AppError> {
        let Some(season) = self.resolve_season(season_id, now).await? else {
            return Ok(None);
        };

        let attempts = self
            .store
            .completed_attempts(&season.window(), Some(user_id))
            .await?;
        let estimate = estimate_toeic(&attempts).min(MAX_TOEIC_SCORE);
        let tier = tier_for_score(estimate);

        let total_season_score = self
            .store
            .find_standing(season.id, user_id)
            .await?
            .map(|s| s.score)
            .unwrap_or(0);

        Ok(Some(ToeicCalculation {
            user_id,
            estimated_toeic: estimate,
            toeic_level: tier.level,
            level_description: tier.level.description(),
            base_points_per_correct: tier.base_points,
            time_bonus_pct: tier.time_bonus_pct,
            accuracy_bonus_pct: tier.accuracy_bonus_pct,
            difficulty_multiplier: 1.0,
            total_season_score,
        }))
    }

    /// Scores a freshly submitted listening or reading part and adds the points
    /// to the current season when it is the user's first try at that part.
    pub async fn award_attempt_points(
        &self,
        user_id: i64,
        req: &AwardRequest,
        now: DateTime<Utc>,
    ) -> Result<AwardResponse, AppError> {
        if req.exam_part_id != LISTENING_PART_ID && req.exam_part_id != READING_PART_ID {
            return Err(AppError::BadRequest(format!(
                "Exam part {} does not earn season points.",
                req.exam_part_id
            )));
        }

        let attempt = self
            .store
            .find_attempt(req.attempt_id)
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Attempt {} not found", req.attempt_id)))?;

        let season = self
            .store
            .current_season(now)
            .await?
            .ok_or_else(|| AppError::Conflict("No active season.".to_string()))?;

        let is_first_attempt = !self
            .store
            .has_earlier_completed_attempt(user_id, attempt.exam_id, attempt.exam_part_id, attempt.id)
            .await?;

        let history = self
            .store
            .completed_attempts(&SeasonWindow::default(), Some(user_id))
            .await?;
        let estimate = estimate_toeic(&history).min(MAX_TOEIC_SCORE);
        let level = ToeicLevel::from_score(estimate);

        let breakdown = compute_award(
            req.correct_answers,
            req.total_questions,
            req.time_spent_secs,
            req.expected_time_secs,
            level.tier(),
        );
        let points = breakdown.total();
        let points_added = req.correct_answers > 0 && is_first_attempt;

        let total_accumulated_score = if points_added {
            let saved = self
                .store
                .add_points(&SeasonStanding {
                    season_id: season.id,
                    user_id,
                    score: points,
                    estimated_toeic: Some(estimate),
                    first_attempt_date: Some(now),
                })
                .await?;
            tracing::info!(
                "User {} earned {} points in season {} (attempt {})",
                user_id,
                points,
                season.id,
                attempt.id
            );
            saved.score
        } else {
            self.store
                .find_standing(season.id, user_id)
                .await?
                .map(|s| s.score)
                .unwrap_or(0)
        };

        let season_label = season
            .season_name
            .clone()
            .unwrap_or_else(|| format!("Season {}", season.season_number));
        let points_text = if points_added {
            format!(
                "You earned {} points in {}. Season total: {}.",
                points, season_label, total_accumulated_score
            )
        } else {
            format!(
                "You earned 0 points in {}. Only the first try at a part counts. Season total: {}.",
                season_label, total_accumulated_score
            )
        };
        notify_quietly(
            self.notifier.as_ref(),
            Notice::new(user_id, NoticeKind::SeasonPoints, "Season points", points_text),
        )
        .await;

        if is_first_attempt {
            notify_quietly(
                self.notifier.as_ref(),
                Notice::new(
                    user_id,
                    NoticeKind::ToeicEstimate,
                    format!("Estimated TOEIC: {} ({})", estimate, level),
                    level.message(estimate),
                ),
            )
            .await;
        }

        Ok(AwardResponse {
            season_score: points,
            breakdown,
            points_added,
            is_first_attempt,
            message: completion_message(points, is_first_attempt).to_string(),
            total_accumulated_score,
        })
    }

    /// Explicit season id, or the current season when none is given.
    async fn resolve_season(
        &self,
        season_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Option<Season>, AppError> {
        match season_id {
            Some(id) => self.store.find_season(id).await,
            None => self.store.current_season(now).await,
        }
    }

    async fn rank_of(&self, season_id: i64, standing: Option<&SeasonStanding>) -> Result<i64, AppError> {
        match standing {
            Some(s) if s.score > 0 => Ok(self.store.count_scores_above(season_id, s.score).await? + 1),
            _ => Ok(0),
        }
    }
}

/// Share of correct answers, from 0.0 to 1.0.
fn accuracy_rate(correct: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    correct as f64 / total as f64
}
