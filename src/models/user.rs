// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public part of a row of the 'users' table, used to decorate rankings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// Name shown for a user whose profile could not be loaded.
    pub fn fallback_name(user_id: i64) -> String {
        format!("User {}", user_id)
    }
}
