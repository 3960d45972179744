//! Broadcast notifier - fans change notices out to in-process subscribers

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::application::ports::outbound::{NotificationError, NotificationPort};
use crate::domain::events::ChangeNotice;

/// Notification sink backed by a tokio broadcast channel
#[derive(Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<ChangeNotice>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotice> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl NotificationPort for BroadcastNotifier {
    async fn publish(&self, notice: ChangeNotice) -> Result<(), NotificationError> {
        let event_name = notice.event_name();
        match self.sender.send(notice) {
            Ok(receivers) => {
                tracing::trace!(event_name, receivers, "Change notice sent");
            }
            // Nobody listening is fine
            Err(_) => {
                tracing::trace!(event_name, "Change notice dropped, no subscribers");
            }
        }
        Ok(())
    }
}

/// Log every notice until the channel closes
///
/// This should be spawned as a background task
pub async fn run_notification_logger(mut rx: broadcast::Receiver<ChangeNotice>) {
    loop {
        match rx.recv().await {
            Ok(notice) => {
                tracing::info!(
                    event_name = notice.event_name(),
                    ids = ?notice.ids,
                    correlation_id = ?notice.metadata.correlation_id,
                    "Collection changed"
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Notification logger lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    tracing::info!("Notification logger shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{ChangeSet, Collection};

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let notifier = BroadcastNotifier::new(4);
        let mut changes = ChangeSet::new("test");
        changes.touch(Collection::Actions);
        for notice in changes.into_notices() {
            assert!(notifier.publish(notice).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_notices_in_order() {
        let notifier = BroadcastNotifier::new(4);
        let mut rx = notifier.subscribe();
        let mut changes = ChangeSet::new("test");
        changes
            .touch(Collection::Actions)
            .touch(Collection::Characters)
            .touch(Collection::Assets);
        for notice in changes.into_notices() {
            notifier.publish(notice).await.unwrap();
        }

        let received: Vec<&str> = vec![
            rx.recv().await.unwrap().event_name(),
            rx.recv().await.unwrap().event_name(),
            rx.recv().await.unwrap().event_name(),
        ];
        assert_eq!(received, vec!["updateCharacters", "updateAssets", "updateActions"]);
    }
}
