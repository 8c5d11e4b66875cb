use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::PageEvent;

/// In-process event bus backed by `tokio::broadcast`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<PageEvent>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publish to current subscribers. Having none is not an error.
    pub fn publish(&self, event: PageEvent) -> usize {
        match self.sender.send(event) {
            Ok(n) => n,
            Err(err) => {
                tracing::trace!(event = err.0.name(), "No event subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::PageChange;
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        assert_eq!(bus.publish(PageEvent::Welcome), 1);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, PageEvent::Welcome));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        let change = PageChange {
            page_id: Uuid::new_v4(),
            slug: "about".into(),
            actor: None,
            timestamp: Utc::now(),
        };
        bus.publish(PageEvent::Archived(change.clone()));

        assert_eq!(rx1.recv().await.unwrap(), PageEvent::Archived(change.clone()));
        assert_eq!(rx2.recv().await.unwrap().page_id(), Some(change.page_id));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(PageEvent::Welcome), 0);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(PageEvent::Welcome).unwrap();
        assert_eq!(json["type"], "welcome");
    }
}
