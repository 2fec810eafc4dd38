// src/jobs/mod.rs

//! Background jobs of the daemon. Each job is a tokio task that logs its
//! failures and tries again on the next tick.

pub mod season;
pub mod streak;

use tokio::task::JoinHandle;

use crate::state::AppState;

/// Spawns every job. The handles let the caller abort them on shutdown.
pub fn spawn_all(state: &AppState) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(season::season_sweep_task(state.clone())),
        tokio::spawn(streak::streak_sweep_task(state.clone())),
        tokio::spawn(streak::reminder_task(state.clone())),
    ]
}
