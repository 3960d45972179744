//! Notification port - publish point for collection change notices

use async_trait::async_trait;

use crate::domain::events::ChangeNotice;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification channel closed")]
    Closed,
}

/// Sink for change notices
///
/// Delivery is best-effort: callers log failures and carry on.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn publish(&self, notice: ChangeNotice) -> Result<(), NotificationError>;
}
