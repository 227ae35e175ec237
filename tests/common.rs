//! Scripted pipeline stages for integration tests.
//!
//! The scanner and detector follow a shared [`Script`] that tests can change
//! between requests, and record every call in [`Calls`].

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use pariksha::controller::PipelineController;
use pariksha::core::types::{PointCloud, Pose3D, SurfaceMarker, SurfaceMesh};
use pariksha::stages::{
    Detection, Detector, ScanOutcome, Scanner, SelectionEvent, SurfaceServer,
};
use pariksha::{
    BlendingParameters, DetectionParameters, ParameterSet, ParikshaError, ResultCache, Result,
    ScanParameters, StageSet,
};

/// Behavior of the scripted stages.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Poses reached by a scan (0 = scan failure)
    pub reached_poses: usize,
    /// Surfaces returned by detection (None = detection error)
    pub surfaces: Option<usize>,
    /// Time spent inside `scan`
    pub scan_delay: Duration,
    /// Time spent inside `find_surfaces`
    pub find_delay: Duration,
}

/// Call log shared by the scripted stages.
#[derive(Debug, Default)]
pub struct Calls {
    pub previews: AtomicUsize,
    pub scans: AtomicUsize,
    pub clears: AtomicUsize,
    pub clouds_added: AtomicUsize,
    pub finds: AtomicUsize,
    pub finds_in_flight: AtomicUsize,
    pub max_finds_in_flight: AtomicUsize,
    pub scan_params: Mutex<Vec<ScanParameters>>,
    pub detection_params: Mutex<Vec<DetectionParameters>>,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub type SharedScript = Arc<Mutex<Script>>;

pub struct ScriptedScanner {
    script: SharedScript,
    calls: Arc<Calls>,
    latest: Vec<Pose3D>,
}

impl Scanner for ScriptedScanner {
    fn publish_preview(&mut self, params: &ScanParameters) -> Result<()> {
        self.calls.previews.fetch_add(1, Ordering::SeqCst);
        self.calls.scan_params.lock().push(params.clone());
        Ok(())
    }

    fn scan(&mut self, params: &ScanParameters) -> Result<ScanOutcome> {
        let script = self.script.lock().clone();
        self.calls.scans.fetch_add(1, Ordering::SeqCst);
        self.calls.scan_params.lock().push(params.clone());
        thread::sleep(script.scan_delay);

        let mut outcome = ScanOutcome::default();
        for i in 0..script.reached_poses {
            outcome.poses_reached.push(Pose3D::new(i as f64, 0.0, 1.0));
            let mut cloud = PointCloud::new(params.world_frame.clone());
            cloud.push(i as f32, 0.0, 0.0);
            outcome.clouds.push(cloud);
        }
        self.latest = outcome.poses_reached.clone();
        Ok(outcome)
    }

    fn latest_scan_poses(&self) -> Vec<Pose3D> {
        self.latest.clone()
    }
}

pub struct ScriptedDetector {
    script: SharedScript,
    calls: Arc<Calls>,
}

impl Detector for ScriptedDetector {
    fn clear_results(&mut self) {
        self.calls.clears.fetch_add(1, Ordering::SeqCst);
    }

    fn add_cloud(&mut self, _cloud: PointCloud) {
        self.calls.clouds_added.fetch_add(1, Ordering::SeqCst);
    }

    fn find_surfaces(&mut self, params: &DetectionParameters) -> Result<Detection> {
        let script = self.script.lock().clone();
        self.calls.finds.fetch_add(1, Ordering::SeqCst);
        self.calls.detection_params.lock().push(params.clone());

        let in_flight = self.calls.finds_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls
            .max_finds_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);
        thread::sleep(script.find_delay);
        self.calls.finds_in_flight.fetch_sub(1, Ordering::SeqCst);

        let Some(count) = script.surfaces else {
            return Err(ParikshaError::Detection("scripted failure".into()));
        };
        Ok(detection(count, &params.frame_id))
    }
}

/// `count` unit squares side by side, one cloud point per surface.
pub fn detection(count: usize, frame_id: &str) -> Detection {
    let mut detection = Detection {
        region_cloud: PointCloud::new(frame_id),
        ..Default::default()
    };
    for i in 0..count {
        let x = i as f32;
        let mesh = SurfaceMesh::rectangle([x, 0.0], [x + 1.0, 1.0], 0.0);
        detection.markers.push(SurfaceMarker {
            id: i as u32,
            ns: "surfaces".to_string(),
            frame_id: frame_id.to_string(),
            color: [0.0, 1.0, 0.0, 1.0],
            points: mesh.triangle_list(),
        });
        detection.meshes.push(mesh);
        detection.region_cloud.push_colored(x + 0.5, 0.5, 0.0, [0, 255, 0]);
    }
    detection
}

/// Startup parameters used across the tests.
pub fn initial_params() -> ParameterSet {
    ParameterSet {
        robot_scan: ScanParameters {
            group_name: "manipulator".to_string(),
            world_frame: "world".to_string(),
            tcp_frame: "tcp".to_string(),
            cam_to_obj_zoffset: 0.6,
            cam_to_obj_xoffset: 0.4,
            num_scan_points: 12,
            reachable_scan_points_ratio: 0.5,
            ..Default::default()
        },
        surface_detection: DetectionParameters {
            frame_id: "world".to_string(),
            min_cluster_size: 100,
            max_cluster_size: 100_000,
            curvature_threshold: 0.1,
            marker_alpha: 1.0,
            ..Default::default()
        },
        blending_plan: BlendingParameters {
            tool_radius: 0.5,
            margin: 0.1,
            ..Default::default()
        },
    }
}

/// Scripted stages wired to an in-memory selection store.
pub struct Fixture {
    pub script: SharedScript,
    pub calls: Arc<Calls>,
    pub selection: Arc<SurfaceServer>,
    pub stages: StageSet,
}

impl Fixture {
    pub fn new(script: Script) -> Self {
        let script = Arc::new(Mutex::new(script));
        let calls = Arc::new(Calls::default());
        let (selection, selection_events) = SurfaceServer::new();
        let stages = StageSet {
            scanner: Box::new(ScriptedScanner {
                script: Arc::clone(&script),
                calls: Arc::clone(&calls),
                latest: Vec::new(),
            }),
            detector: Box::new(ScriptedDetector {
                script: Arc::clone(&script),
                calls: Arc::clone(&calls),
            }),
            selection: selection.clone(),
            selection_events,
        };
        Self {
            script,
            calls,
            selection,
            stages,
        }
    }
}

/// Controller over scripted stages, driven directly without threads.
pub struct Harness {
    pub controller: PipelineController,
    pub cache: Arc<ResultCache>,
    pub script: SharedScript,
    pub calls: Arc<Calls>,
    pub selection: Arc<SurfaceServer>,
    pub events: Receiver<SelectionEvent>,
}

impl Harness {
    pub fn new(script: Script) -> Self {
        let Fixture {
            script,
            calls,
            selection,
            stages,
        } = Fixture::new(script);
        let cache = Arc::new(ResultCache::new());
        let controller = PipelineController::new(
            initial_params(),
            Arc::clone(&cache),
            stages.scanner,
            stages.detector,
            stages.selection,
        );
        Self {
            controller,
            cache,
            script,
            calls,
            selection,
            events: stages.selection_events,
        }
    }

    pub fn set_script(&self, script: Script) {
        *self.script.lock() = script;
    }
}
