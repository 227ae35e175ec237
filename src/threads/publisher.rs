//! Periodic region cloud publisher.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, select, tick};
use tracing::{debug, info, warn};

use crate::core::types::PointCloud;
use crate::error::Result;
use crate::state::ResultCache;
use crate::streaming::Topic;

/// Background thread republishing the cached region cloud.
pub struct PeriodicPublisher {
    handle: JoinHandle<()>,
}

impl PeriodicPublisher {
    /// Spawn the publisher. It runs until `shutdown` disconnects.
    pub fn spawn(
        cache: Arc<ResultCache>,
        topic: Arc<Topic<Arc<PointCloud>>>,
        period: Duration,
        shutdown: Receiver<()>,
    ) -> Result<Self> {
        let handle = thread::Builder::new()
            .name("region-cloud".into())
            .spawn(move || {
                info!("Publishing region cloud every {:?}", period);
                let ticker = tick(period);
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            publish_region_cloud(&cache, &topic);
                        }
                        recv(shutdown) -> _ => break,
                    }
                }
                debug!("Region cloud publisher stopped");
            })?;
        Ok(Self { handle })
    }

    /// Wait for the thread to finish.
    pub fn join(self) {
        if self.handle.join().is_err() {
            warn!("Region cloud publisher panicked");
        }
    }
}

/// Publish the cached region cloud once. Returns false when there is
/// nothing to publish.
pub fn publish_region_cloud(cache: &ResultCache, topic: &Topic<Arc<PointCloud>>) -> bool {
    match cache.region_cloud() {
        Some(cloud) if !cloud.is_empty() => {
            topic.publish(cloud);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DetectionResult;
    use crossbeam_channel::bounded;

    fn cloud(n: usize) -> PointCloud {
        let mut cloud = PointCloud::new("world");
        for i in 0..n {
            cloud.push(i as f32, 0.0, 0.0);
        }
        cloud
    }

    #[test]
    fn test_skips_when_absent_or_empty() {
        let cache = ResultCache::new();
        let topic = Topic::new("cloud", 4);
        let rx = topic.subscribe();

        assert!(!publish_region_cloud(&cache, &topic));

        cache.replace(DetectionResult::default(), cloud(0));
        assert!(!publish_region_cloud(&cache, &topic));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_publishes_cached_cloud() {
        let cache = ResultCache::new();
        let topic = Topic::new("cloud", 4);
        let rx = topic.subscribe();

        cache.replace(DetectionResult::default(), cloud(3));
        assert!(publish_region_cloud(&cache, &topic));
        assert_eq!(rx.try_recv().unwrap().len(), 3);
    }

    #[test]
    fn test_thread_ticks_and_stops() {
        let cache = Arc::new(ResultCache::new());
        cache.replace(DetectionResult::default(), cloud(2));
        let topic = Topic::new("cloud", 16);
        let rx = topic.subscribe();
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let publisher = PeriodicPublisher::spawn(
            Arc::clone(&cache),
            Arc::clone(&topic),
            Duration::from_millis(10),
            shutdown_rx,
        )
        .unwrap();

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first.len(), 2);

        drop(shutdown_tx);
        publisher.join();
    }
}
