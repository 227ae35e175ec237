//! Service assembly: controller, stages, topics and threads.
//!
//! ```text
//!            ServiceClient ──► DispatchPool ──► PipelineController
//!                                                 │        │
//!   SelectionStore ──events──► ChangeNotifier     │    ResultCache ──► PeriodicPublisher
//!                                  │              │                        │
//!                     selected_surfaces_changed   scan path preview   region_colored_cloud
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::info;

use crate::config::{ParikshaConfig, ServiceConfig};
use crate::controller::PipelineController;
use crate::core::types::PointCloud;
use crate::error::Result;
use crate::params::ParameterSet;
use crate::stages::{
    Detector, Scanner, SelectionEvent, SelectionStore, SimulatedDetector, SimulatedScanner,
    SurfaceServer,
};
use crate::state::ResultCache;
use crate::streaming::{ScanPathPreview, SelectedSurfacesChanged, Topic, names};
use crate::threads::{ChangeNotifier, DispatchPool, PeriodicPublisher, ServiceClient};

/// Per-subscriber queue depth of the outbound topics.
///
/// Topics never block the publisher. A subscriber that falls this many
/// messages behind misses the newer ones, including
/// `SelectedSurfacesChanged`. Every notification carries the full selected
/// list, so the next one delivered brings a lagging subscriber up to date.
const TOPIC_CAPACITY: usize = 16;

/// Outbound topics of the service.
#[derive(Clone)]
pub struct Topics {
    pub selected_surfaces_changed: Arc<Topic<SelectedSurfacesChanged>>,
    pub region_colored_cloud: Arc<Topic<Arc<PointCloud>>>,
    pub scan_path_preview: Arc<Topic<ScanPathPreview>>,
}

impl Topics {
    pub fn new() -> Self {
        Self {
            // Lossy for subscribers more than TOPIC_CAPACITY batches behind
            selected_surfaces_changed: Topic::new(
                names::SELECTED_SURFACES_CHANGED,
                TOPIC_CAPACITY,
            ),
            region_colored_cloud: Topic::new(names::REGION_COLORED_CLOUD, TOPIC_CAPACITY),
            scan_path_preview: Topic::new(names::ROBOT_SCAN_PATH_PREVIEW, TOPIC_CAPACITY),
        }
    }
}

impl Default for Topics {
    fn default() -> Self {
        Self::new()
    }
}

/// The three pipeline stages plus the selection event stream.
pub struct StageSet {
    pub scanner: Box<dyn Scanner>,
    pub detector: Box<dyn Detector>,
    pub selection: Arc<dyn SelectionStore>,
    pub selection_events: Receiver<SelectionEvent>,
}

impl StageSet {
    /// Simulated scan and detection stages with an in-memory selection store.
    pub fn simulated(config: &ParikshaConfig, topics: &Topics) -> Self {
        let (server, selection_events) = SurfaceServer::new();
        Self {
            scanner: Box::new(SimulatedScanner::new(
                config.simulation.clone(),
                Arc::clone(&topics.scan_path_preview),
            )),
            detector: Box::new(SimulatedDetector::new()),
            selection: server,
            selection_events,
        }
    }
}

/// Running surface detection service.
pub struct SurfaceService {
    controller: Arc<PipelineController>,
    client: ServiceClient,
    topics: Topics,
    pool: DispatchPool,
    publisher: Option<PeriodicPublisher>,
    notifier: ChangeNotifier,
    running: Arc<AtomicBool>,
    shutdown_tx: Sender<()>,
}

impl SurfaceService {
    /// Initialize the stages and spawn all service threads.
    ///
    /// A stage initialization failure aborts startup before any thread runs.
    pub fn start(
        config: &ServiceConfig,
        params: ParameterSet,
        stages: StageSet,
        topics: Topics,
    ) -> Result<Self> {
        let cache = Arc::new(ResultCache::new());
        let controller = Arc::new(PipelineController::new(
            params,
            Arc::clone(&cache),
            stages.scanner,
            stages.detector,
            stages.selection,
        ));
        controller.initialize()?;

        let running = Arc::new(AtomicBool::new(true));
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let notifier = ChangeNotifier::spawn(
            stages.selection_events,
            Arc::clone(&topics.selected_surfaces_changed),
            shutdown_rx.clone(),
        )?;

        let publisher = if config.publish_region_point_cloud {
            Some(PeriodicPublisher::spawn(
                Arc::clone(&cache),
                Arc::clone(&topics.region_colored_cloud),
                config.publish_period(),
                shutdown_rx,
            )?)
        } else {
            info!("Region cloud publishing disabled");
            None
        };

        let (pool, client) = DispatchPool::spawn(
            Arc::clone(&controller),
            config.workers,
            config.request_timeout(),
            Arc::clone(&running),
        )?;

        info!("Surface detection service ready");
        Ok(Self {
            controller,
            client,
            topics,
            pool,
            publisher,
            notifier,
            running,
            shutdown_tx,
        })
    }

    /// Start with simulated stages as described by `config`.
    pub fn simulated(config: &ParikshaConfig) -> Result<Self> {
        let topics = Topics::new();
        let stages = StageSet::simulated(config, &topics);
        Self::start(&config.service, config.parameter_set(), stages, topics)
    }

    /// Handle for submitting requests.
    pub fn client(&self) -> ServiceClient {
        self.client.clone()
    }

    pub fn controller(&self) -> &Arc<PipelineController> {
        &self.controller
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    /// Stop all threads and wait for them. In-flight stage calls finish first.
    pub fn shutdown(self) {
        let Self {
            pool,
            publisher,
            notifier,
            running,
            shutdown_tx,
            ..
        } = self;

        info!("Shutting down surface detection service");
        running.store(false, Ordering::Relaxed);
        drop(shutdown_tx);

        pool.join();
        if let Some(publisher) = publisher {
            publisher.join();
        }
        notifier.join();
        info!("Surface detection service stopped");
    }
}
