// src/jobs/season.rs

use std::time::Duration;

use chrono::Utc;
use tokio::time;

use crate::state::AppState;

/// Activates and ends seasons on a fixed interval.
pub async fn season_sweep_task(state: AppState) {
    let secs = state.config.season_sweep_interval_secs.max(1);
    let mut interval = time::interval(Duration::from_secs(secs));

    tracing::info!("Season sweep task started ({}s interval)", secs);

    loop {
        interval.tick().await;

        if let Err(e) = state.seasons.auto_manage(Utc::now()).await {
            tracing::error!("Season sweep failed: {}", e);
        }
    }
}
