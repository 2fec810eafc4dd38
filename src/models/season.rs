// src/models/season.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::scoring::SeasonWindow;

/// Represents the 'seasons' table in the database.
/// A season is one leaderboard period.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Season {
    pub id: i64,
    pub season_name: Option<String>,

    /// Unique, positive, human-facing number ("Season 4").
    pub season_number: i32,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lifecycle phase of a season relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonStatus {
    Upcoming,
    Active,
    Ended,
}

impl Season {
    pub fn window(&self) -> SeasonWindow {
        SeasonWindow::new(self.start_date, self.end_date)
    }

    /// Active flag set and `now` within the (open) bounds.
    pub fn is_current_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_date.is_none_or(|s| s <= now)
            && self.end_date.is_none_or(|e| e >= now)
    }

    /// Status and whole days remaining until the next transition.
    /// Seasons missing either date are reported as upcoming.
    pub fn status_at(&self, now: DateTime<Utc>) -> (SeasonStatus, i64) {
        match (self.start_date, self.end_date) {
            (Some(start), Some(_)) if now < start => {
                (SeasonStatus::Upcoming, (start - now).num_days())
            }
            (Some(_), Some(end)) if now <= end => (SeasonStatus::Active, (end - now).num_days()),
            (Some(_), Some(_)) => (SeasonStatus::Ended, 0),
            _ => (SeasonStatus::Upcoming, 0),
        }
    }
}

/// Season plus the derived fields shown in listings.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonView {
    #[serde(flatten)]
    pub season: Season,
    pub total_participants: i64,
    pub status: SeasonStatus,
    pub days_remaining: i64,
}

impl SeasonView {
    pub fn new(season: Season, total_participants: i64, now: DateTime<Utc>) -> Self {
        let (status, days_remaining) = season.status_at(now);
        Self {
            season,
            total_participants,
            status,
            days_remaining,
        }
    }
}

/// DTO for creating or updating a season.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SeasonRequest {
    #[validate(length(max = 100, message = "Season name must be at most 100 characters."))]
    pub season_name: Option<String>,

    #[validate(range(min = 1, message = "Season number must be positive."))]
    pub season_number: i32,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_active: bool,
}

/// Query parameters for the paginated season listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeasonListParams {
    /// Matches the season name or the season number.
    pub keyword: Option<String>,

    /// 1-based page number (default: 1).
    pub page: Option<i64>,

    /// Items per page (default: 10, max: 100).
    pub page_size: Option<i64>,
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}
