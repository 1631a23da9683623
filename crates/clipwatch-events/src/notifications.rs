//! FIFO queue of trigger notifications.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use clipwatch_models::NotificationEvent;
use tracing::debug;

/// Notifications kept while nobody drains the queue.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 100;

/// Notifications waiting to be shown, oldest first.
///
/// When no UI polls, the queue stops growing at its capacity and the oldest
/// notification is dropped for each new one.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    queue: Arc<Mutex<VecDeque<NotificationEvent>>>,
    capacity: usize,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_NOTIFICATION_CAPACITY)
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue holding at most `capacity` notifications (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<NotificationEvent>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, notification: NotificationEvent) {
        let mut queue = self.lock();
        while queue.len() >= self.capacity {
            if let Some(dropped) = queue.pop_front() {
                debug!(id = %dropped.id, "Dropping undrained notification");
            }
        }
        queue.push_back(notification);
    }

    /// Removes and returns every queued notification in arrival order.
    pub fn drain(&self) -> Vec<NotificationEvent> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipwatch_models::{ChatEvent, TriggerRecord};

    fn notification(stream: &str, keyword: &str) -> NotificationEvent {
        let event = ChatEvent::new(stream, "alice", format!("say {keyword}"));
        NotificationEvent::from(&TriggerRecord::from_event(&event, keyword))
    }

    #[test]
    fn test_drain_is_fifo_and_empties() {
        let queue = NotificationQueue::new();
        queue.push(notification("streamA", "lock"));
        queue.push(notification("streamB", "ssd"));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].stream.as_str(), "streamA");
        assert_eq!(drained[1].stream.as_str(), "streamB");
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let queue = NotificationQueue::with_capacity(3);
        for keyword in ["a", "b", "c", "d", "e"] {
            queue.push(notification("streamA", keyword));
        }

        let keywords: Vec<String> = queue.drain().into_iter().map(|n| n.keyword).collect();
        assert_eq!(keywords, vec!["c", "d", "e"]);
    }

    #[test]
    fn test_default_capacity() {
        let queue = NotificationQueue::new();
        for i in 0..(DEFAULT_NOTIFICATION_CAPACITY + 20) {
            queue.push(notification("streamA", &format!("k{i}")));
        }
        assert_eq!(queue.len(), DEFAULT_NOTIFICATION_CAPACITY);
    }

    #[test]
    fn test_clones_share_queue() {
        let queue = NotificationQueue::new();
        let other = queue.clone();
        other.push(notification("s", "mine"));
        assert_eq!(queue.len(), 1);
    }
}
