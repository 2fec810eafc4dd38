// src/models/mod.rs

pub mod attempt;
pub mod repetition;
pub mod season;
pub mod standing;
pub mod streak;
pub mod user;
