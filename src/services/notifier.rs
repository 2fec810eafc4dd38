// src/services/notifier.rs

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeKind {
    SeasonPoints,
    ToeicEstimate,
    StreakReminder,
}

/// An outbound message to one learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub user_id: i64,
    pub kind: NoticeKind,
    pub title: String,
    pub content: String,
}

impl Notice {
    pub fn new(user_id: i64, kind: NoticeKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id,
            kind,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Delivery channel for notices (in-app inbox, mail, push...).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &Notice) -> Result<(), AppError>;
}

/// Writes notices to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        tracing::info!(
            user_id = notice.user_id,
            kind = ?notice.kind,
            "{}: {}",
            notice.title,
            notice.content
        );
        Ok(())
    }
}

/// Stores notices in the 'notifications' table, the in-app inbox.
#[derive(Clone)]
pub struct InboxNotifier {
    pool: PgPool,
}

impl InboxNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for InboxNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        sqlx::query("INSERT INTO notifications (user_id, title, content) VALUES ($1, $2, $3)")
            .bind(notice.user_id)
            .bind(&notice.title)
            .bind(&notice.content)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Sends a notice, logging instead of failing when delivery breaks.
pub async fn notify_quietly(notifier: &dyn Notifier, notice: Notice) -> bool {
    match notifier.notify(&notice).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                user_id = notice.user_id,
                kind = ?notice.kind,
                "Failed to deliver notice: {}",
                e
            );
            false
        }
    }
}
