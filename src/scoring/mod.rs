// src/scoring/mod.rs

pub mod award;
pub mod season;
pub mod tier;
pub mod toeic;

pub use season::SeasonWindow;
pub use tier::{ScoringTier, ToeicLevel};
