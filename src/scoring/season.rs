// src/scoring/season.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::{
        ACCURACY_BONUS_DENOMINATOR, ACCURACY_BONUS_NUMERATOR, FAST_FINISH_MINUTES, MAX_TOEIC_SCORE,
    },
    models::{
        attempt::{AnswerRecord, ExamAttempt},
        standing::SeasonStanding,
    },
    scoring::{
        tier::{ScoringTier, tier_for_score},
        toeic::estimate_toeic,
    },
};

/// Time bounds of a season. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl SeasonWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Whether an attempt that ended at `end_time` belongs to the season.
    ///
    /// An attempt without an end time cannot satisfy a bound, so it only
    /// belongs to a fully open season.
    pub fn contains(&self, end_time: Option<DateTime<Utc>>) -> bool {
        match end_time {
            Some(t) => self.start.is_none_or(|s| t >= s) && self.end.is_none_or(|e| t <= e),
            None => self.start.is_none() && self.end.is_none(),
        }
    }
}

/// Season points for one attempt.
///
/// Base points per correct answer come from the tier. A fast finish adds the
/// time bonus and 80%+ accuracy adds the accuracy bonus, both as a share of
/// the base. The sum is truncated.
pub fn score_attempt(correct: i64, total: i64, minutes_spent: f64, tier: &ScoringTier) -> i64 {
    let base = correct * tier.base_points;

    // Work in hundredths of a point so the truncation happens once
    let time_bonus = if minutes_spent < FAST_FINISH_MINUTES {
        base * tier.time_bonus_pct
    } else {
        0
    };
    let accurate = total > 0 && correct * ACCURACY_BONUS_DENOMINATOR >= total * ACCURACY_BONUS_NUMERATOR;
    let accuracy_bonus = if accurate {
        base * tier.accuracy_bonus_pct
    } else {
        0
    };

    (base * 100 + time_bonus + accuracy_bonus) / 100
}

/// Rebuilds every standing of a season from scratch.
///
/// `attempts` may contain anything; only completed attempts inside `window`
/// are scored, and only those with at least one graded answer. Each user's
/// tier comes from their estimate over the same window. The output holds one
/// standing per user, ordered by user id, so running it twice on the same
/// input gives the same rows.
pub fn recalculate(
    season_id: i64,
    window: &SeasonWindow,
    attempts: &[ExamAttempt],
    answers: &[AnswerRecord],
) -> Vec<SeasonStanding> {
    let in_window: Vec<&ExamAttempt> = attempts
        .iter()
        .filter(|a| a.is_completed() && window.contains(a.end_time))
        .collect();

    let mut tallies: HashMap<i64, (i64, i64)> = HashMap::new();
    for answer in answers {
        let entry = tallies.entry(answer.attempt_id).or_insert((0, 0));
        if answer.is_correct {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    let mut by_user: BTreeMap<i64, Vec<ExamAttempt>> = BTreeMap::new();
    for attempt in &in_window {
        by_user.entry(attempt.user_id).or_default().push((*attempt).clone());
    }

    let mut standings = Vec::new();
    for (user_id, user_attempts) in by_user {
        let estimate = estimate_toeic(&user_attempts);
        let tier = tier_for_score(estimate);

        let mut score = 0;
        let mut first_attempt_date: Option<DateTime<Utc>> = None;
        let mut scored_any = false;

        for attempt in &user_attempts {
            let Some(&(correct, total)) = tallies.get(&attempt.id) else {
                continue;
            };
            if total == 0 {
                continue;
            }

            score += score_attempt(correct, total, attempt.minutes_spent(), tier);
            scored_any = true;
            first_attempt_date = match (first_attempt_date, attempt.end_time) {
                (Some(current), Some(end)) => Some(current.min(end)),
                (None, end) => end,
                (current, None) => current,
            };
        }

        if scored_any {
            standings.push(SeasonStanding {
                season_id,
                user_id,
                score,
                estimated_toeic: Some(estimate.min(MAX_TOEIC_SCORE)),
                first_attempt_date,
            });
        }
    }

    tracing::debug!(
        "Recalculated season {}: {} attempts in window, {} standings",
        season_id,
        in_window.len(),
        standings.len()
    );

    standings
}
