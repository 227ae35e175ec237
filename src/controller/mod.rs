//! Pipeline controller: action dispatch over the three stages.
//!
//! ```text
//! request ─► resolve parameters ─► Scan ─► Find ─► ResultCache + SelectionStore
//!                 │                  │       │
//!            ParameterStore       Scanner  Detector
//! ```
//!
//! The stage mutex is held from parameter resolution until the cache is
//! replaced, so at most one Scan/Find runs at a time and a reader never sees
//! parameters that belong to a different in-flight request.
//!
//! Stage failures never escape [`PipelineController::handle`]: they are
//! logged and reported through `surfaces_found`. Only a malformed request
//! (unknown action code) is returned as an error.

mod actions;
mod protocol;

pub use actions::{Action, ActionPlan, ParameterQueryAction, Procedure, SelectAction};
pub use protocol::{
    ParameterQueryRequest, ParameterQueryResponse, ProcessPlanningResponse,
    SelectSurfaceRequest, SurfaceDetectionRequest, SurfaceDetectionResponse,
};

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::core::types::SurfaceMarker;
use crate::error::Result;
use crate::params::{GroupValue, ParameterGroup, ParameterSet, ParameterStore};
use crate::stages::{Detector, Scanner, SelectionStore};
use crate::state::{CancelTicket, DetectionResult, ResultCache};

/// Stages that must only run one at a time.
struct Stages {
    scanner: Box<dyn Scanner>,
    detector: Box<dyn Detector>,
}

/// Orchestrates scan, detection and selection for incoming requests.
pub struct PipelineController {
    params: ParameterStore,
    cache: Arc<ResultCache>,
    stages: Mutex<Stages>,
    selection: Arc<dyn SelectionStore>,
}

impl PipelineController {
    /// Create a controller. `initial` becomes both current and default parameters.
    pub fn new(
        initial: ParameterSet,
        cache: Arc<ResultCache>,
        scanner: Box<dyn Scanner>,
        detector: Box<dyn Detector>,
        selection: Arc<dyn SelectionStore>,
    ) -> Self {
        Self {
            params: ParameterStore::new(initial),
            cache,
            stages: Mutex::new(Stages { scanner, detector }),
            selection,
        }
    }

    /// Initialize the scan and detection stages.
    pub fn initialize(&self) -> Result<()> {
        let mut stages = self.stages.lock();
        stages.scanner.initialize()?;
        info!("Scan stage initialized");
        stages.detector.initialize()?;
        info!("Detection stage initialized");
        Ok(())
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Handle one surface detection request.
    ///
    /// A raised `ticket` means the caller stopped waiting. A request still
    /// queued on the stage lock is skipped without resolving parameters, and
    /// the outcome of a stage call already in progress is discarded instead
    /// of committed.
    pub fn handle(
        &self,
        request: &SurfaceDetectionRequest,
        ticket: &CancelTicket,
    ) -> Result<SurfaceDetectionResponse> {
        let action = Action::try_from(request.action)?;
        let plan = action.plan();
        debug!(
            "Handling {:?} (defaults={})",
            action, request.use_default_parameters
        );

        match plan.procedure {
            Procedure::ReportCurrent => {
                let set = self.params.current();
                Ok(SurfaceDetectionResponse {
                    robot_scan: Some(set.robot_scan),
                    surface_detection: Some(set.surface_detection),
                    ..Default::default()
                })
            }
            Procedure::ReportDefault => {
                let set = self.params.defaults();
                Ok(SurfaceDetectionResponse {
                    robot_scan: Some(set.robot_scan.clone()),
                    surface_detection: Some(set.surface_detection.clone()),
                    ..Default::default()
                })
            }
            Procedure::ReturnLatest => Ok(self.cache.get().into()),
            Procedure::PreviewScanPath => {
                let mut stages = self.stages.lock();
                if abandoned(action, ticket) {
                    return Ok(SurfaceDetectionResponse::default());
                }
                self.resolve(plan, request);
                if let Err(e) = stages.scanner.publish_preview(&self.params.scan()) {
                    warn!("Scan path preview failed: {}", e);
                }
                Ok(SurfaceDetectionResponse::default())
            }
            Procedure::ScanThenFind | Procedure::Find => {
                let mut stages = self.stages.lock();
                if abandoned(action, ticket) {
                    return Ok(SurfaceDetectionResponse::default());
                }
                self.resolve(plan, request);

                let markers = if plan.procedure == Procedure::ScanThenFind {
                    if self.run_scan(&mut stages, ticket) {
                        self.find_surfaces(&mut stages, ticket)
                    } else {
                        None
                    }
                } else {
                    self.find_surfaces(&mut stages, ticket)
                };
                drop(stages);

                let surfaces_found = markers.is_some();
                let surfaces = match markers {
                    Some(markers) if plan.returns_surfaces => markers,
                    _ => Vec::new(),
                };
                Ok(SurfaceDetectionResponse {
                    surfaces_found,
                    surfaces,
                    ..Default::default()
                })
            }
        }
    }

    /// Apply default reset or override to the groups `plan` touches.
    fn resolve(&self, plan: ActionPlan, request: &SurfaceDetectionRequest) {
        if request.use_default_parameters {
            if plan.touches_scan {
                self.params.reset_current_to_default(ParameterGroup::Scan);
            }
            if plan.touches_detection {
                self.params.reset_current_to_default(ParameterGroup::Detection);
            }
            return;
        }

        if plan.touches_scan
            && let Some(scan) = &request.robot_scan
        {
            self.params.set_current(GroupValue::Scan(scan.clone()));
        }
        if plan.touches_detection
            && let Some(detection) = &request.surface_detection
        {
            self.params
                .set_current(GroupValue::Detection(detection.clone()));
        }
    }

    /// Preview, clear, scan and hand the clouds to the detector.
    ///
    /// Returns whether at least one scan pose was reached.
    fn run_scan(&self, stages: &mut Stages, ticket: &CancelTicket) -> bool {
        let scan = self.params.scan();

        if let Err(e) = stages.scanner.publish_preview(&scan) {
            warn!("Scan path preview failed: {}", e);
        }
        stages.detector.clear_results();

        info!("Starting scan");
        let outcome = match stages.scanner.scan(&scan) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Scan failed: {}", e);
                return false;
            }
        };

        if ticket.is_cancelled() {
            warn!("Request abandoned during scan, discarding scan data");
            return false;
        }
        if outcome.reached_count() == 0 {
            error!("Scan failed: no scan poses reached");
            return false;
        }

        info!("Scan points reached: {}", outcome.reached_count());
        for cloud in outcome.clouds {
            stages.detector.add_cloud(cloud);
        }
        true
    }

    /// Run detection and commit a successful result.
    ///
    /// Returns the new surface markers on success. Any failure clears the
    /// region cloud and leaves the cached result untouched.
    fn find_surfaces(
        &self,
        stages: &mut Stages,
        ticket: &CancelTicket,
    ) -> Option<Vec<SurfaceMarker>> {
        let detection_params = self.params.detection();

        let detection = match stages.detector.find_surfaces(&detection_params) {
            Ok(d) if d.meshes.is_empty() => {
                warn!("Surface detection returned no surfaces");
                self.cache.clear_region_cloud();
                return None;
            }
            Ok(d) => d,
            Err(e) => {
                error!("Surface detection failed: {}", e);
                self.cache.clear_region_cloud();
                return None;
            }
        };

        if ticket.is_cancelled() {
            warn!(
                "Request abandoned during detection, discarding {} surfaces",
                detection.meshes.len()
            );
            return None;
        }

        self.selection.remove_all_surfaces();
        for mesh in detection.meshes {
            self.selection.add_surface(mesh);
        }

        let result = DetectionResult {
            surface_detection: detection_params,
            surfaces_found: true,
            surfaces: detection.markers.clone(),
            robot_scan_poses: stages.scanner.latest_scan_poses(),
        };
        info!("Found {} surfaces", result.surfaces.len());
        self.cache.replace(result, detection.region_cloud);

        Some(detection.markers)
    }

    /// Handle one selection request.
    pub fn select_surface(&self, request: &SelectSurfaceRequest) -> Result<()> {
        let action = SelectAction::try_from(request.action)?;
        debug!(
            "Selection {:?} ({} targets)",
            action,
            request.select_surfaces.len()
        );

        let targets = &request.select_surfaces;
        match action {
            SelectAction::Select => self.selection.set_selection_flags(targets, true),
            SelectAction::Deselect => self.selection.set_selection_flags(targets, false),
            SelectAction::SelectAll => self.selection.select_all(true),
            SelectAction::DeselectAll => self.selection.select_all(false),
            SelectAction::HideAll => self.selection.show_all(false),
            SelectAction::ShowAll => self.selection.show_all(true),
        }
        Ok(())
    }

    /// Current or default values of all three parameter groups.
    pub fn blending_parameters(
        &self,
        request: ParameterQueryRequest,
    ) -> Result<ParameterQueryResponse> {
        let set = match ParameterQueryAction::try_from(request.action)? {
            ParameterQueryAction::GetCurrent => self.params.current(),
            ParameterQueryAction::GetDefault => self.params.defaults().clone(),
        };
        Ok(ParameterQueryResponse {
            surface_detection: set.surface_detection,
            robot_scan: set.robot_scan,
            blending_plan: set.blending_plan,
        })
    }

    /// Process path planning is not provided by this controller.
    pub fn process_path(&self) -> ProcessPlanningResponse {
        warn!("Process path planning is not available");
        ProcessPlanningResponse { succeeded: false }
    }
}

/// A request abandoned while queued on the stage lock must not touch
/// parameters or stages.
fn abandoned(action: Action, ticket: &CancelTicket) -> bool {
    if ticket.is_cancelled() {
        warn!("{:?} abandoned before start, skipping", action);
        return true;
    }
    false
}
