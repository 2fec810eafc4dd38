// src/state.rs

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config,
    services::{
        LeaderboardService, LogNotifier, Notifier, RepetitionService, SeasonService, StreakService,
        notifier::InboxNotifier,
    },
    store::{LeaderboardStore, PgStore, RepetitionStore, StreakStore},
};

/// Services shared by the background jobs (and any front end embedding the crate).
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub seasons: SeasonService,
    pub leaderboard: LeaderboardService,
    pub streaks: StreakService,
    pub repetitions: RepetitionService,
}

impl AppState {
    /// PostgreSQL-backed state. Notices land in the in-app inbox unless
    /// `inbox_notifications` is off.
    pub fn new(pool: PgPool, config: Config) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        let notifier: Arc<dyn Notifier> = if config.inbox_notifications {
            Arc::new(InboxNotifier::new(pool))
        } else {
            Arc::new(LogNotifier)
        };
        Self::from_parts(store, notifier, config)
    }

    pub fn from_parts<S>(store: Arc<S>, notifier: Arc<dyn Notifier>, config: Config) -> Self
    where
        S: LeaderboardStore + StreakStore + RepetitionStore + 'static,
    {
        let leaderboard_store: Arc<dyn LeaderboardStore> = store.clone();
        let streak_store: Arc<dyn StreakStore> = store.clone();
        let repetition_store: Arc<dyn RepetitionStore> = store;

        Self {
            seasons: SeasonService::new(leaderboard_store.clone()),
            leaderboard: LeaderboardService::new(leaderboard_store, notifier.clone()),
            streaks: StreakService::new(streak_store, notifier, config.local_utc_offset_hours),
            repetitions: RepetitionService::new(repetition_store),
            config,
        }
    }
}
