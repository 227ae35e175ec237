//! In-process broadcast topic.
//!
//! Every subscriber gets its own bounded crossbeam channel. Publishing never
//! blocks: a subscriber whose queue is full misses the message, and a
//! subscriber that dropped its receiver is unregistered on the next publish.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::Mutex;

/// Broadcast topic with non-blocking fan-out.
#[derive(Debug)]
pub struct Topic<T> {
    name: &'static str,
    capacity: usize,
    subscribers: Mutex<Vec<Sender<T>>>,
}

impl<T: Clone> Topic<T> {
    /// Create a topic whose subscribers buffer up to `capacity` messages.
    pub fn new(name: &'static str, capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            name,
            capacity: capacity.max(1),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Topic name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Receiver<T> {
        let (tx, rx) = bounded(self.capacity);
        self.subscribers.lock().push(tx);
        tracing::debug!("New subscriber on {}", self.name);
        rx
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Publish to all subscribers. Returns how many received the message.
    pub fn publish(&self, msg: T) -> usize {
        let mut subscribers = self.subscribers.lock();
        let mut delivered = 0;

        subscribers.retain(|tx| match tx.try_send(msg.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                // Slow subscriber - skip this message
                tracing::trace!("Subscriber on {} lagging, message dropped", self.name);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out() {
        let topic = Topic::new("test", 4);
        let a = topic.subscribe();
        let b = topic.subscribe();

        assert_eq!(topic.publish(7u32), 2);
        assert_eq!(a.try_recv().unwrap(), 7);
        assert_eq!(b.try_recv().unwrap(), 7);
    }

    #[test]
    fn test_dropped_subscriber_removed() {
        let topic = Topic::new("test", 4);
        let a = topic.subscribe();
        let b = topic.subscribe();
        drop(b);

        assert_eq!(topic.publish(1u32), 1);
        assert_eq!(topic.subscriber_count(), 1);
        assert_eq!(a.try_recv().unwrap(), 1);
    }

    #[test]
    fn test_full_subscriber_skipped_not_removed() {
        let topic = Topic::new("test", 1);
        let a = topic.subscribe();

        assert_eq!(topic.publish(1u32), 1);
        assert_eq!(topic.publish(2u32), 0);
        assert_eq!(topic.subscriber_count(), 1);
        assert_eq!(a.try_recv().unwrap(), 1);
        assert!(a.try_recv().is_err());
    }
}
