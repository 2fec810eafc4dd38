// tests/common/mod.rs

#![allow(dead_code)]

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use toeic_backend::{
    config::{Config, LEARNER_ROLE_ID},
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
    services::notifier::{Notice, Notifier},
    state::AppState,
    store::{LeaderboardStore, RepetitionStore, StreakStore},
};

/// A fixed instant all tests start from.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 15, 10, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub role_id: i32,
    pub streak: StreakState,
}

#[derive(Debug, Clone)]
pub struct ArchivedStanding {
    pub standing: SeasonStanding,
    pub final_rank: i64,
    pub archived_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct Memory {
    pub seasons: Vec<Season>,
    pub attempts: Vec<ExamAttempt>,
    pub answers: Vec<AnswerRecord>,
    pub standings: Vec<SeasonStanding>,
    pub archives: Vec<ArchivedStanding>,
    pub users: Vec<UserRow>,
    pub lists: HashMap<i64, String>,
    pub words: HashMap<i64, String>,
    pub repetitions: Vec<Repetition>,
    pub next_id: i64,
    /// Makes `save_streak` fail for this user.
    pub broken_user: Option<i64>,
    /// Makes `reset_standings` fail for this season.
    pub broken_season: Option<i64>,
}

impl Memory {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store mirroring the PostgreSQL queries.
#[derive(Default)]
pub struct MemoryStore {
    pub data: Mutex<Memory>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Memory) -> R) -> R {
        f(&mut self.data.lock().unwrap())
    }

    pub fn add_season(
        &self,
        number: i32,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        active: bool,
    ) -> i64 {
        self.with(|m| {
            let id = m.next_id();
            m.seasons.push(Season {
                id,
                season_name: Some(format!("Season {}", number)),
                season_number: number,
                start_date: start,
                end_date: end,
                is_active: active,
                created_at: Some(now()),
                updated_at: None,
            });
            id
        })
    }

    pub fn add_user(&self, full_name: &str) -> i64 {
        self.with(|m| {
            let id = m.next_id();
            m.users.push(UserRow {
                id,
                email: format!("user{}@example.com", id),
                full_name: full_name.to_string(),
                avatar_url: None,
                role_id: LEARNER_ROLE_ID,
                streak: StreakState::default(),
            });
            id
        })
    }

    pub fn set_streak(&self, user_id: i64, streak: StreakState) {
        self.with(|m| {
            if let Some(user) = m.users.iter_mut().find(|u| u.id == user_id) {
                user.streak = streak;
            }
        })
    }

    pub fn streak_of(&self, user_id: i64) -> StreakState {
        self.with(|m| {
            m.users
                .iter()
                .find(|u| u.id == user_id)
                .map(|u| u.streak.clone())
                .unwrap()
        })
    }

    /// Adds a completed part attempt with `correct` right and `wrong` wrong answers.
    #[allow(clippy::too_many_arguments)]
    pub fn add_attempt(
        &self,
        user_id: i64,
        exam_id: i64,
        exam_part_id: i64,
        part_code: &str,
        correct: i32,
        wrong: i32,
        end: DateTime<Utc>,
        minutes: i64,
    ) -> i64 {
        self.with(|m| {
            let id = m.next_id();
            m.attempts.push(ExamAttempt {
                id,
                user_id,
                exam_id,
                exam_part_id: Some(exam_part_id),
                part_code: Some(part_code.to_string()),
                score: Some(correct),
                status: COMPLETED.to_string(),
                start_time: end - Duration::minutes(minutes),
                end_time: Some(end),
            });
            for i in 0..(correct + wrong) {
                m.answers.push(AnswerRecord {
                    attempt_id: id,
                    is_correct: i < correct,
                });
            }
            id
        })
    }

    pub fn add_list(&self, name: &str) -> i64 {
        self.with(|m| {
            let id = m.next_id();
            m.lists.insert(id, name.to_string());
            id
        })
    }

    pub fn add_word(&self, word: &str) -> i64 {
        self.with(|m| {
            let id = m.next_id();
            m.words.insert(id, word.to_string());
            id
        })
    }

    pub fn standings_of(&self, season_id: i64) -> Vec<SeasonStanding> {
        self.with(|m| {
            let mut rows: Vec<SeasonStanding> = m
                .standings
                .iter()
                .filter(|s| s.season_id == season_id)
                .cloned()
                .collect();
            rows.sort_by_key(|s| s.user_id);
            rows
        })
    }

    fn decorate(m: &Memory, mut r: Repetition) -> Repetition {
        r.vocabulary_list_name = m.lists.get(&r.vocabulary_list_id).cloned();
        r.vocabulary_word = r.vocabulary_id.and_then(|id| m.words.get(&id).cloned());
        r
    }
}

fn newest_first(a: &Season, b: &Season) -> Ordering {
    match (a.start_date, b.start_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(b.id.cmp(&a.id))
}

#[async_trait]
impl LeaderboardStore for MemoryStore {
    async fn list_seasons(&self, is_active: Option<bool>) -> Result<Vec<Season>, AppError> {
        Ok(self.with(|m| {
            let mut seasons: Vec<Season> = m
                .seasons
                .iter()
                .filter(|s| is_active.is_none_or(|a| s.is_active == a))
                .cloned()
                .collect();
            seasons.sort_by(newest_first);
            seasons
        }))
    }

    async fn search_seasons(
        &self,
        keyword: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Season>, i64), AppError> {
        let keyword = keyword
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty());
        Ok(self.with(|m| {
            let mut seasons: Vec<Season> = m
                .seasons
                .iter()
                .filter(|s| match &keyword {
                    Some(k) => {
                        s.season_name
                            .as_deref()
                            .is_some_and(|n| n.to_lowercase().contains(k.as_str()))
                            || s.season_number.to_string().contains(k.as_str())
                    }
                    None => true,
                })
                .cloned()
                .collect();
            seasons.sort_by(newest_first);
            let total = seasons.len() as i64;
            let page = seasons
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
            (page, total)
        }))
    }

    async fn find_season(&self, season_id: i64) -> Result<Option<Season>, AppError> {
        Ok(self.with(|m| m.seasons.iter().find(|s| s.id == season_id).cloned()))
    }

    async fn current_season(&self, now: DateTime<Utc>) -> Result<Option<Season>, AppError> {
        Ok(self.with(|m| {
            let mut current: Vec<Season> = m
                .seasons
                .iter()
                .filter(|s| s.is_current_at(now))
                .cloned()
                .collect();
            current.sort_by(newest_first);
            current.into_iter().next()
        }))
    }

    async fn insert_season(&self, req: &SeasonRequest, now: DateTime<Utc>) -> Result<i64, AppError> {
        Ok(self.with(|m| {
            let id = m.next_id();
            m.seasons.push(Season {
                id,
                season_name: req.season_name.clone(),
                season_number: req.season_number,
                start_date: req.start_date,
                end_date: req.end_date,
                is_active: req.is_active,
                created_at: Some(now),
                updated_at: None,
            });
            id
        }))
    }

    async fn update_season(
        &self,
        season_id: i64,
        req: &SeasonRequest,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        Ok(self.with(|m| match m.seasons.iter_mut().find(|s| s.id == season_id) {
            Some(s) => {
                s.season_name = req.season_name.clone();
                s.season_number = req.season_number;
                s.start_date = req.start_date;
                s.end_date = req.end_date;
                s.is_active = req.is_active;
                s.updated_at = Some(now);
                true
            }
            None => false,
        }))
    }

    async fn delete_season(&self, season_id: i64) -> Result<bool, AppError> {
        Ok(self.with(|m| {
            let before = m.seasons.len();
            m.seasons.retain(|s| s.id != season_id);
            m.standings.retain(|s| s.season_id != season_id);
            m.seasons.len() < before
        }))
    }

    async fn set_current_season(&self, season_id: i64, now: DateTime<Utc>) -> Result<bool, AppError> {
        Ok(self.with(|m| {
            if !m.seasons.iter().any(|s| s.id == season_id) {
                return false;
            }
            for s in m.seasons.iter_mut() {
                let active = s.id == season_id;
                if s.is_active != active || active {
                    s.is_active = active;
                    s.updated_at = Some(now);
                }
            }
            true
        }))
    }

    async fn season_number_exists(
        &self,
        season_number: i32,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        Ok(self.with(|m| {
            m.seasons
                .iter()
                .any(|s| s.season_number == season_number && Some(s.id) != exclude_id)
        }))
    }

    async fn date_range_overlaps(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        Ok(self.with(|m| {
            m.seasons.iter().any(|s| {
                Some(s.id) != exclude_id
                    && match (s.start_date, end) {
                        (Some(other_start), Some(end)) => other_start <= end,
                        _ => true,
                    }
                    && match (start, s.end_date) {
                        (Some(start), Some(other_end)) => start <= other_end,
                        _ => true,
                    }
            })
        }))
    }

    async fn activate_due_seasons(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        Ok(self.with(|m| {
            let mut count = 0;
            for s in m.seasons.iter_mut() {
                if !s.is_active
                    && s.start_date.is_some_and(|start| start <= now)
                    && s.end_date.is_none_or(|end| end >= now)
                {
                    s.is_active = true;
                    s.updated_at = Some(now);
                    count += 1;
                }
            }
            count
        }))
    }

    async fn end_expired_seasons(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        Ok(self.with(|m| {
            let mut count = 0;
            for s in m.seasons.iter_mut() {
                if s.is_active && s.end_date.is_some_and(|end| end < now) {
                    s.is_active = false;
                    s.updated_at = Some(now);
                    count += 1;
                }
            }
            count
        }))
    }

    async fn count_participants(&self, season_id: i64) -> Result<i64, AppError> {
        Ok(self.with(|m| m.standings.iter().filter(|s| s.season_id == season_id).count() as i64))
    }

    async fn completed_attempts(
        &self,
        window: &SeasonWindow,
        user_id: Option<i64>,
    ) -> Result<Vec<ExamAttempt>, AppError> {
        Ok(self.with(|m| {
            let mut attempts: Vec<ExamAttempt> = m
                .attempts
                .iter()
                .filter(|a| {
                    a.status == COMPLETED
                        && window.contains(a.end_time)
                        && user_id.is_none_or(|u| a.user_id == u)
                })
                .cloned()
                .collect();
            attempts.sort_by_key(|a| (a.end_time, a.id));
            attempts
        }))
    }

    async fn answers_for_attempts(&self, attempt_ids: &[i64]) -> Result<Vec<AnswerRecord>, AppError> {
        Ok(self.with(|m| {
            m.answers
                .iter()
                .filter(|a| attempt_ids.contains(&a.attempt_id))
                .cloned()
                .collect()
        }))
    }

    async fn find_attempt(&self, attempt_id: i64) -> Result<Option<ExamAttempt>, AppError> {
        Ok(self.with(|m| m.attempts.iter().find(|a| a.id == attempt_id).cloned()))
    }

    async fn has_earlier_completed_attempt(
        &self,
        user_id: i64,
        exam_id: i64,
        exam_part_id: Option<i64>,
        before_attempt_id: i64,
    ) -> Result<bool, AppError> {
        Ok(self.with(|m| {
            m.attempts.iter().any(|a| {
                a.user_id == user_id
                    && a.exam_id == exam_id
                    && a.exam_part_id == exam_part_id
                    && a.status == COMPLETED
                    && a.id < before_attempt_id
            })
        }))
    }

    async fn replace_standings(
        &self,
        season_id: i64,
        standings: &[SeasonStanding],
    ) -> Result<u64, AppError> {
        Ok(self.with(|m| {
            m.standings.retain(|s| s.season_id != season_id);
            m.standings.extend(standings.iter().cloned());
            standings.len() as u64
        }))
    }

    async fn reset_standings(
        &self,
        season_id: i64,
        archive: bool,
        now: DateTime<Utc>,
    ) -> Result<(u64, u64), AppError> {
        self.with(|m| {
            if m.broken_season == Some(season_id) {
                return Err(AppError::InternalServerError("connection reset".to_string()));
            }
            let rows: Vec<SeasonStanding> = m
                .standings
                .iter()
                .filter(|s| s.season_id == season_id)
                .cloned()
                .collect();
            m.standings.retain(|s| s.season_id != season_id);
            if !archive {
                return Ok((0, rows.len() as u64));
            }
            for row in &rows {
                let final_rank = rows.iter().filter(|o| o.score > row.score).count() as i64 + 1;
                m.archives.push(ArchivedStanding {
                    standing: row.clone(),
                    final_rank,
                    archived_at: now,
                });
            }
            Ok((rows.len() as u64, rows.len() as u64))
        })
    }

    async fn find_standing(
        &self,
        season_id: i64,
        user_id: i64,
    ) -> Result<Option<SeasonStanding>, AppError> {
        Ok(self.with(|m| {
            m.standings
                .iter()
                .find(|s| s.season_id == season_id && s.user_id == user_id)
                .cloned()
        }))
    }

    async fn top_standings(&self, season_id: i64, limit: i64) -> Result<Vec<SeasonStanding>, AppError> {
        Ok(self.with(|m| {
            let mut rows: Vec<SeasonStanding> = m
                .standings
                .iter()
                .filter(|s| s.season_id == season_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.score.cmp(&a.score).then(a.user_id.cmp(&b.user_id)));
            rows.truncate(limit as usize);
            rows
        }))
    }

    async fn count_scores_above(&self, season_id: i64, score: i64) -> Result<i64, AppError> {
        Ok(self.with(|m| {
            m.standings
                .iter()
                .filter(|s| s.season_id == season_id && s.score > score)
                .count() as i64
        }))
    }

    async fn add_points(&self, standing: &SeasonStanding) -> Result<SeasonStanding, AppError> {
        Ok(self.with(|m| {
            match m
                .standings
                .iter_mut()
                .find(|s| s.season_id == standing.season_id && s.user_id == standing.user_id)
            {
                Some(existing) => {
                    existing.score += standing.score;
                    existing.estimated_toeic = standing.estimated_toeic;
                    if existing.first_attempt_date.is_none() {
                        existing.first_attempt_date = standing.first_attempt_date;
                    }
                    existing.clone()
                }
                None => {
                    m.standings.push(standing.clone());
                    standing.clone()
                }
            }
        }))
    }

    async fn user_profiles(&self, user_ids: &[i64]) -> Result<Vec<UserProfile>, AppError> {
        Ok(self.with(|m| {
            m.users
                .iter()
                .filter(|u| user_ids.contains(&u.id))
                .map(|u| UserProfile {
                    id: u.id,
                    full_name: u.full_name.clone(),
                    avatar_url: u.avatar_url.clone(),
                })
                .collect()
        }))
    }
}

#[async_trait]
impl StreakStore for MemoryStore {
    async fn find_streak(&self, user_id: i64) -> Result<Option<StreakState>, AppError> {
        Ok(self.with(|m| m.users.iter().find(|u| u.id == user_id).map(|u| u.streak.clone())))
    }

    async fn save_streak(&self, user_id: i64, state: &StreakState) -> Result<(), AppError> {
        self.with(|m| {
            if m.broken_user == Some(user_id) {
                return Err(AppError::InternalServerError("connection reset".to_string()));
            }
            match m.users.iter_mut().find(|u| u.id == user_id) {
                Some(user) => {
                    user.streak = state.clone();
                    Ok(())
                }
                None => Err(AppError::NotFound(format!("User {} not found", user_id))),
            }
        })
    }

    async fn users_with_missed_day(&self, today: NaiveDate) -> Result<Vec<i64>, AppError> {
        let yesterday = today - Duration::days(1);
        Ok(self.with(|m| {
            m.users
                .iter()
                .filter(|u| {
                    u.streak.current_streak > 0
                        && u.streak.last_practice_date.is_some_and(|d| d < yesterday)
                })
                .map(|u| u.id)
                .collect()
        }))
    }

    async fn reminder_candidates(&self, today: NaiveDate) -> Result<Vec<ReminderCandidate>, AppError> {
        Ok(self.with(|m| {
            let mut candidates: Vec<ReminderCandidate> = m
                .users
                .iter()
                .filter(|u| {
                    u.role_id == LEARNER_ROLE_ID
                        && u.streak.current_streak > 0
                        && u.streak.last_practice_date.is_none_or(|d| d < today)
                })
                .map(|u| ReminderCandidate {
                    user_id: u.id,
                    email: u.email.clone(),
                    full_name: u.full_name.clone(),
                    current_streak: u.streak.current_streak,
                    freeze_tokens: u.streak.freeze_tokens,
                })
                .collect();
            candidates.sort_by(|a, b| {
                b.current_streak
                    .cmp(&a.current_streak)
                    .then(a.user_id.cmp(&b.user_id))
            });
            candidates
        }))
    }

    async fn top_streaks(&self, limit: i64) -> Result<Vec<StreakLeader>, AppError> {
        Ok(self.with(|m| {
            let mut leaders: Vec<StreakLeader> = m
                .users
                .iter()
                .map(|u| StreakLeader {
                    user_id: u.id,
                    full_name: u.full_name.clone(),
                    avatar_url: u.avatar_url.clone(),
                    current_streak: u.streak.current_streak,
                    longest_streak: u.streak.longest_streak,
                })
                .collect();
            leaders.sort_by(|a, b| {
                b.current_streak
                    .cmp(&a.current_streak)
                    .then(b.longest_streak.cmp(&a.longest_streak))
                    .then(a.user_id.cmp(&b.user_id))
            });
            leaders.truncate(limit as usize);
            leaders
        }))
    }
}

#[async_trait]
impl RepetitionStore for MemoryStore {
    async fn find_repetition(&self, repetition_id: i64) -> Result<Option<Repetition>, AppError> {
        Ok(self.with(|m| {
            m.repetitions
                .iter()
                .find(|r| r.id == repetition_id)
                .cloned()
                .map(|r| Self::decorate(m, r))
        }))
    }

    async fn find_by_word(&self, user_id: i64, vocabulary_id: i64) -> Result<Option<Repetition>, AppError> {
        Ok(self.with(|m| {
            m.repetitions
                .iter()
                .find(|r| r.user_id == user_id && r.vocabulary_id == Some(vocabulary_id))
                .cloned()
                .map(|r| Self::decorate(m, r))
        }))
    }

    async fn find_by_list(
        &self,
        user_id: i64,
        vocabulary_list_id: i64,
    ) -> Result<Option<Repetition>, AppError> {
        Ok(self.with(|m| {
            m.repetitions
                .iter()
                .find(|r| {
                    r.user_id == user_id
                        && r.vocabulary_list_id == vocabulary_list_id
                        && r.vocabulary_id.is_none()
                })
                .cloned()
                .map(|r| Self::decorate(m, r))
        }))
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Repetition>, AppError> {
        Ok(self.with(|m| {
            let mut rows: Vec<Repetition> = m
                .repetitions
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .map(|r| Self::decorate(m, r))
                .collect();
            rows.sort_by(|a, b| b.next_review_at.cmp(&a.next_review_at).then(a.id.cmp(&b.id)));
            rows
        }))
    }

    async fn due_for_user(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<Repetition>, AppError> {
        Ok(self.with(|m| {
            let mut rows: Vec<Repetition> = m
                .repetitions
                .iter()
                .filter(|r| {
                    r.user_id == user_id
                        && r.next_review_at.is_some_and(|next| next <= now)
                        && (r.status == RepetitionStatus::New.as_str()
                            || r.status == RepetitionStatus::Learning.as_str())
                        && r.review_count > 0
                        && r.interval_days == 1
                })
                .cloned()
                .map(|r| Self::decorate(m, r))
                .collect();
            rows.sort_by_key(|r| (r.next_review_at, r.id));
            rows
        }))
    }

    async fn insert_repetition(&self, new: &NewRepetition) -> Result<Repetition, AppError> {
        Ok(self.with(|m| {
            let id = m.next_id();
            let row = Repetition {
                id,
                user_id: new.user_id,
                vocabulary_id: new.vocabulary_id,
                vocabulary_list_id: new.vocabulary_list_id,
                vocabulary_list_name: None,
                vocabulary_word: None,
                last_reviewed_at: Some(new.last_reviewed_at),
                next_review_at: Some(new.next_review_at),
                review_count: 0,
                interval_days: 1,
                status: RepetitionStatus::New.as_str().to_string(),
                best_quiz_score: None,
                last_quiz_score: None,
                last_quiz_completed_at: None,
                total_quiz_attempts: None,
            };
            m.repetitions.push(row.clone());
            Self::decorate(m, row)
        }))
    }

    async fn update_repetition(&self, repetition: &Repetition) -> Result<(), AppError> {
        self.with(|m| {
            if let Some(row) = m.repetitions.iter_mut().find(|r| r.id == repetition.id) {
                *row = repetition.clone();
            }
        });
        Ok(())
    }

    async fn vocabulary_list_name(&self, vocabulary_list_id: i64) -> Result<Option<String>, AppError> {
        Ok(self.with(|m| m.lists.get(&vocabulary_list_id).cloned()))
    }
}

/// Keeps every notice; can be told to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::InternalServerError("mail server down".to_string()));
        }
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// State over a fresh in-memory store and a recording notifier.
pub fn test_state() -> (AppState, Arc<MemoryStore>, Arc<RecordingNotifier>) {
    let store = MemoryStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::from_parts(store.clone(), notifier.clone(), Config::default());
    (state, store, notifier)
}
