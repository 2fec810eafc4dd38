// src/lib.rs

pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod scoring;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

// Re-export specific items for convenience if needed
pub use state::AppState;
