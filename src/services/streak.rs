// src/services/streak.rs

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    config::PRACTICE_GRACE_DAYS,
    error::AppError,
    models::streak::{
        StreakEvent, StreakLeader, StreakReminder, StreakState, StreakSummary, StreakUpdate,
    },
    services::notifier::{Notice, NoticeKind, Notifier, notify_quietly},
    store::StreakStore,
    utils::time::local_today,
};

/// Streak lengths that grant freeze tokens, with the number of tokens granted.
pub const MILESTONES: [(i32, i32); 8] = [
    (3, 1),
    (7, 1),
    (14, 1),
    (30, 1),
    (60, 2),
    (100, 3),
    (180, 5),
    (365, 5),
];

pub fn milestone_reward(streak: i32) -> Option<i32> {
    MILESTONES
        .iter()
        .find(|(days, _)| *days == streak)
        .map(|(_, tokens)| *tokens)
}

/// Highest milestone already reached.
pub fn last_milestone(streak: i32) -> Option<i32> {
    MILESTONES
        .iter()
        .map(|(days, _)| *days)
        .filter(|days| *days <= streak)
        .max()
}

/// Lowest milestone not reached yet.
pub fn next_milestone(streak: i32) -> Option<i32> {
    MILESTONES
        .iter()
        .map(|(days, _)| *days)
        .find(|days| *days > streak)
}

/// New state of a streak after one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakChange {
    pub state: StreakState,
    pub event: StreakEvent,
    pub milestone_reached: Option<i32>,
    pub message: String,
}

/// Counts a practice on local date `date`.
///
/// Dates in the future or more than two days back are rejected. Dates before
/// the last counted practice change nothing.
pub fn record_practice(
    state: &StreakState,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<StreakChange, AppError> {
    if date > today {
        return Err(AppError::BadRequest("Invalid practice date (future)".to_string()));
    }
    if (today - date).num_days() > PRACTICE_GRACE_DAYS {
        return Err(AppError::BadRequest("Invalid practice date (too old)".to_string()));
    }

    let mut next = state.clone();
    let (event, message) = match state.last_practice_date {
        None => {
            next.current_streak = 1;
            next.longest_streak = next.longest_streak.max(1);
            next.last_practice_date = Some(date);
            next.freeze_tokens += 1;
            (StreakEvent::CompleteDay, "Your learning streak has started!".to_string())
        }
        Some(last) if date <= last => (
            StreakEvent::MaintainDay,
            "You have already completed today's goal!".to_string(),
        ),
        Some(_) if state.current_streak > 0 => {
            // The next day, or a later one after the nightly sweep froze the gap
            next.current_streak += 1;
            next.last_practice_date = Some(date);
            (
                StreakEvent::CompleteDay,
                format!("Great! {} day streak", next.current_streak),
            )
        }
        Some(_) => {
            next.current_streak = 1;
            next.last_practice_date = Some(date);
            (
                StreakEvent::ResetStreak,
                "Your streak was broken, starting over!".to_string(),
            )
        }
    };

    next.longest_streak = next.longest_streak.max(next.current_streak);

    let mut milestone_reached = None;
    if event == StreakEvent::CompleteDay {
        if let Some(tokens) = milestone_reward(next.current_streak) {
            next.freeze_tokens += tokens;
            milestone_reached = Some(next.current_streak);
        }
    }

    Ok(StreakChange {
        state: next,
        event,
        milestone_reached,
        message,
    })
}

/// Nightly handling of a missed day: spends a freeze token or ends the streak.
///
/// The last practice date is left as is, so every further missed day costs
/// another token.
pub fn apply_auto_freeze_or_reset(state: &StreakState, today: NaiveDate) -> StreakChange {
    let unchanged = |message: &str| StreakChange {
        state: state.clone(),
        event: StreakEvent::NoChange,
        milestone_reached: None,
        message: message.to_string(),
    };

    if state.current_streak <= 0 {
        return unchanged("No active streak to process");
    }
    let Some(last) = state.last_practice_date else {
        return unchanged("No practice date");
    };
    if (today - last).num_days() <= 1 {
        return unchanged("Streak is safe");
    }

    let mut next = state.clone();
    if state.freeze_tokens > 0 {
        next.freeze_tokens -= 1;
        StreakChange {
            message: format!(
                "A freeze token was used! Your {} day streak is protected.",
                state.current_streak
            ),
            state: next,
            event: StreakEvent::FreezeUsed,
            milestone_reached: None,
        }
    } else {
        next.current_streak = 0;
        StreakChange {
            state: next,
            event: StreakEvent::StreakLost,
            milestone_reached: None,
            message: "Your learning streak was lost. Start again today!".to_string(),
        }
    }
}

pub fn summarize(state: &StreakState, today: NaiveDate) -> StreakSummary {
    let current = state.current_streak;
    let next = next_milestone(current);

    StreakSummary {
        current_streak: current,
        longest_streak: state.longest_streak,
        today_completed: state.last_practice_date == Some(today),
        freeze_tokens: state.freeze_tokens,
        last_milestone: last_milestone(current),
        last_practice_date: state.last_practice_date,
        next_milestone: next,
        days_to_next_milestone: next.map(|m| m - current),
    }
}

pub fn reminder_message(current_streak: i32, freeze_tokens: i32) -> String {
    let lead = match current_streak {
        s if s >= 30 => format!(
            "Your {} day streak is impressive! Don't let it break today!",
            s
        ),
        s if s >= 7 => format!(
            "You are on a {} day streak! Keep the momentum going!",
            s
        ),
        s if s >= 3 => format!(
            "Your {} day streak is taking shape! Keep building it today!",
            s
        ),
        s => format!("You have a {} day streak! A great start, keep going!", s),
    };
    format!("{} ({} freeze tokens left)", lead, freeze_tokens)
}

/// Counters of one nightly sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakSweep {
    pub processed: usize,
    pub frozen: usize,
    pub lost: usize,
    pub failed: usize,
}

/// Counters of one reminder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderSweep {
    pub sent: usize,
    pub failed: usize,
}

/// Daily practice streaks of learners.
#[derive(Clone)]
pub struct StreakService {
    store: Arc<dyn StreakStore>,
    notifier: Arc<dyn Notifier>,
    offset_hours: i32,
}

impl StreakService {
    pub fn new(store: Arc<dyn StreakStore>, notifier: Arc<dyn Notifier>, offset_hours: i32) -> Self {
        Self {
            store,
            notifier,
            offset_hours,
        }
    }

    /// The learners' local date at `now`.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        local_today(now, self.offset_hours)
    }

    pub async fn summary(&self, user_id: i64, now: DateTime<Utc>) -> Result<StreakSummary, AppError> {
        let state = self.load(user_id).await?;
        Ok(summarize(&state, self.today(now)))
    }

    /// Counts a valid practice of the user on local date `practice_date`.
    pub async fn record_practice(
        &self,
        user_id: i64,
        practice_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<StreakUpdate, AppError> {
        let today = self.today(now);
        let state = self.load(user_id).await?;

        let change = record_practice(&state, practice_date, today)?;
        if change.state != state {
            self.store.save_streak(user_id, &change.state).await?;
        }
        if let Some(milestone) = change.milestone_reached {
            tracing::info!("User {} reached milestone {}", user_id, milestone);
        }

        Ok(self.update(change, today))
    }

    /// Applies the missed-day rule to one user.
    pub async fn process_user(&self, user_id: i64, today: NaiveDate) -> Result<StreakUpdate, AppError> {
        let state = self.load(user_id).await?;

        let change = apply_auto_freeze_or_reset(&state, today);
        match change.event {
            StreakEvent::FreezeUsed => {
                self.store.save_streak(user_id, &change.state).await?;
                tracing::info!(
                    "Auto-freeze applied for user {}. Freeze tokens left: {}",
                    user_id,
                    change.state.freeze_tokens
                );
            }
            StreakEvent::StreakLost => {
                self.store.save_streak(user_id, &change.state).await?;
                tracing::info!("Streak lost for user {}. Reset to 0", user_id);
            }
            _ => {}
        }

        Ok(self.update(change, today))
    }

    /// Nightly pass over every user who missed yesterday.
    /// A failing user is logged and counted, the sweep goes on.
    pub async fn run_daily_sweep(&self, now: DateTime<Utc>) -> Result<StreakSweep, AppError> {
        let today = self.today(now);
        tracing::info!("Processing streaks for local date {}", today);

        let user_ids = self.store.users_with_missed_day(today).await?;
        if user_ids.is_empty() {
            tracing::info!("No users need streak processing today");
            return Ok(StreakSweep::default());
        }
        tracing::info!("Found {} users needing streak processing", user_ids.len());

        let mut sweep = StreakSweep::default();
        for user_id in user_ids {
            match self.process_user(user_id, today).await {
                Ok(update) => {
                    sweep.processed += 1;
                    match update.event {
                        StreakEvent::FreezeUsed => sweep.frozen += 1,
                        StreakEvent::StreakLost => sweep.lost += 1,
                        _ => {}
                    }
                }
                Err(e) => {
                    sweep.failed += 1;
                    tracing::error!("Failed to process streak for user {}: {}", user_id, e);
                }
            }
        }

        tracing::info!(
            "Streak sweep done: {} processed, {} frozen, {} lost, {} failed",
            sweep.processed,
            sweep.frozen,
            sweep.lost,
            sweep.failed
        );
        Ok(sweep)
    }

    /// Learners to remind today, each with their message.
    pub async fn reminders(&self, now: DateTime<Utc>) -> Result<Vec<StreakReminder>, AppError> {
        let today = self.today(now);
        let candidates = self.store.reminder_candidates(today).await?;

        Ok(candidates
            .into_iter()
            .map(|candidate| StreakReminder {
                message: reminder_message(candidate.current_streak, candidate.freeze_tokens),
                reminder_date: today,
                candidate,
            })
            .collect())
    }

    pub async fn send_reminders(&self, now: DateTime<Utc>) -> Result<ReminderSweep, AppError> {
        let reminders = self.reminders(now).await?;
        tracing::info!("Sending {} streak reminders", reminders.len());

        let mut sweep = ReminderSweep::default();
        for reminder in reminders {
            let notice = Notice::new(
                reminder.candidate.user_id,
                NoticeKind::StreakReminder,
                "Keep your streak alive",
                reminder.message,
            );
            if notify_quietly(self.notifier.as_ref(), notice).await {
                sweep.sent += 1;
            } else {
                sweep.failed += 1;
            }
        }

        tracing::info!("Reminders done: {} sent, {} failed", sweep.sent, sweep.failed);
        Ok(sweep)
    }

    pub async fn top_streaks(&self, limit: i64) -> Result<Vec<StreakLeader>, AppError> {
        self.store.top_streaks(limit.max(0)).await
    }

    async fn load(&self, user_id: i64) -> Result<StreakState, AppError> {
        self.store
            .find_streak(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    fn update(&self, change: StreakChange, today: NaiveDate) -> StreakUpdate {
        StreakUpdate {
            summary: summarize(&change.state, today),
            event: change.event,
            milestone_reached: change.milestone_reached,
            message: change.message,
        }
    }
}
