// src/services/mod.rs

pub mod leaderboard;
pub mod notifier;
pub mod repetition;
pub mod seasons;
pub mod streak;

pub use leaderboard::LeaderboardService;
pub use notifier::{LogNotifier, Notifier};
pub use repetition::RepetitionService;
pub use seasons::SeasonService;
pub use streak::StreakService;
