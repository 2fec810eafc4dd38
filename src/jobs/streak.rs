// src/jobs/streak.rs

use chrono::Utc;

use crate::{state::AppState, utils::time::until_next_local_hour};

/// Runs the missed-day sweep once a day at the configured local hour.
pub async fn streak_sweep_task(state: AppState) {
    let hour = state.config.streak_job_hour;
    tracing::info!("Streak sweep task started (daily at {:02}:00 local)", hour);

    loop {
        wait_for_local_hour(&state, hour).await;

        let started = Utc::now();
        tracing::info!("=== Daily streak processing started at {} UTC ===", started);
        if let Err(e) = state.streaks.run_daily_sweep(started).await {
            tracing::error!("Daily streak processing failed: {}", e);
        }
    }
}

/// Reminds learners who have not practiced yet, once a day.
pub async fn reminder_task(state: AppState) {
    let hour = state.config.reminder_job_hour;
    tracing::info!("Streak reminder task started (daily at {:02}:00 local)", hour);

    loop {
        wait_for_local_hour(&state, hour).await;

        if let Err(e) = state.streaks.send_reminders(Utc::now()).await {
            tracing::error!("Streak reminders failed: {}", e);
        }
    }
}

async fn wait_for_local_hour(state: &AppState, hour: u32) {
    let wait = until_next_local_hour(Utc::now(), state.config.local_utc_offset_hours, hour);
    tracing::debug!("Next run in {}s", wait.as_secs());
    tokio::time::sleep(wait).await;
}
