// src/services/seasons.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::{
    error::AppError,
    models::season::{Page, Season, SeasonListParams, SeasonRequest, SeasonView},
    store::LeaderboardStore,
};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Counters of one auto-manage pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeasonSweep {
    pub activated: u64,
    pub ended: u64,
}

/// Season management: CRUD, validation and the activation lifecycle.
#[derive(Clone)]
pub struct SeasonService {
    store: Arc<dyn LeaderboardStore>,
}

impl SeasonService {
    pub fn new(store: Arc<dyn LeaderboardStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, req: SeasonRequest, now: DateTime<Utc>) -> Result<SeasonView, AppError> {
        self.validate(&req, None).await?;

        let id = self.store.insert_season(&req, now).await?;
        tracing::info!("Created season {} (number {})", id, req.season_number);

        self.get(id, now).await
    }

    pub async fn update(
        &self,
        season_id: i64,
        req: SeasonRequest,
        now: DateTime<Utc>,
    ) -> Result<SeasonView, AppError> {
        if self.store.find_season(season_id).await?.is_none() {
            return Err(season_not_found(season_id));
        }
        self.validate(&req, Some(season_id)).await?;

        if !self.store.update_season(season_id, &req, now).await? {
            return Err(season_not_found(season_id));
        }
        tracing::info!("Updated season {}", season_id);

        self.get(season_id, now).await
    }

    /// Checks a create/update request against the field rules and every other season.
    async fn validate(&self, req: &SeasonRequest, exclude_id: Option<i64>) -> Result<(), AppError> {
        req.validate()?;

        if let (Some(start), Some(end)) = (req.start_date, req.end_date) {
            if end < start {
                return Err(AppError::BadRequest(
                    "End date must be on or after start date.".to_string(),
                ));
            }
        }

        if self
            .store
            .season_number_exists(req.season_number, exclude_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Season number {} already exists.",
                req.season_number
            )));
        }

        if self
            .store
            .date_range_overlaps(req.start_date, req.end_date, exclude_id)
            .await?
        {
            return Err(AppError::Conflict(
                "Season dates overlap with an existing season.".to_string(),
            ));
        }

        Ok(())
    }

    /// Paginated search; page defaults to 1 and page size to 10 (at most 100).
    pub async fn search(
        &self,
        params: &SeasonListParams,
        now: DateTime<Utc>,
    ) -> Result<Page<SeasonView>, AppError> {
        let page = params.page.unwrap_or(1).max(1);
        let page_size = params
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let (seasons, total) = self
            .store
            .search_seasons(
                params.keyword.as_deref(),
                (page - 1).saturating_mul(page_size),
                page_size,
            )
            .await?;

        let items = self.views(seasons, now).await?;
        Ok(Page::new(items, total, page, page_size))
    }

    pub async fn list(&self, is_active: Option<bool>, now: DateTime<Utc>) -> Result<Vec<SeasonView>, AppError> {
        let seasons = self.store.list_seasons(is_active).await?;
        self.views(seasons, now).await
    }

    pub async fn get(&self, season_id: i64, now: DateTime<Utc>) -> Result<SeasonView, AppError> {
        let season = self
            .store
            .find_season(season_id)
            .await?
            .ok_or_else(|| season_not_found(season_id))?;
        self.view(season, now).await
    }

    pub async fn current(&self, now: DateTime<Utc>) -> Result<Option<SeasonView>, AppError> {
        match self.store.current_season(now).await? {
            Some(season) => Ok(Some(self.view(season, now).await?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, season_id: i64) -> Result<(), AppError> {
        if !self.store.delete_season(season_id).await? {
            return Err(season_not_found(season_id));
        }
        tracing::info!("Deleted season {}", season_id);
        Ok(())
    }

    /// Makes `season_id` the only active season.
    pub async fn set_current(&self, season_id: i64, now: DateTime<Utc>) -> Result<(), AppError> {
        if !self.store.set_current_season(season_id, now).await? {
            return Err(season_not_found(season_id));
        }
        tracing::info!("Season {} is now the current season", season_id);
        Ok(())
    }

    /// Activates seasons that have started, then ends seasons that are over.
    pub async fn auto_manage(&self, now: DateTime<Utc>) -> Result<SeasonSweep, AppError> {
        let activated = self.store.activate_due_seasons(now).await?;
        let ended = self.store.end_expired_seasons(now).await?;

        if activated > 0 || ended > 0 {
            tracing::info!("Season sweep: {} activated, {} ended", activated, ended);
        }
        Ok(SeasonSweep { activated, ended })
    }

    async fn view(&self, season: Season, now: DateTime<Utc>) -> Result<SeasonView, AppError> {
        let participants = self.store.count_participants(season.id).await?;
        Ok(SeasonView::new(season, participants, now))
    }

    async fn views(&self, seasons: Vec<Season>, now: DateTime<Utc>) -> Result<Vec<SeasonView>, AppError> {
        let mut views = Vec::with_capacity(seasons.len());
        for season in seasons {
            views.push(self.view(season, now).await?);
        }
        Ok(views)
    }
}

pub(crate) fn season_not_found(season_id: i64) -> AppError {
    AppError::NotFound(format!("Season {} not found", season_id))
}
