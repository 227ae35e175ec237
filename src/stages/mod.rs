//! Pipeline stage contracts.
//!
//! The controller drives three external collaborators through these traits:
//!
//! | Stage | Trait | Owned by |
//! |-------|-------|----------|
//! | Scan | [`Scanner`] | controller (behind the stage lock) |
//! | Detect | [`Detector`] | controller (behind the stage lock) |
//! | Select | [`SelectionStore`] | shared, internally serialized |
//!
//! Scan data reaches the detector explicitly: the controller feeds every
//! cloud of a [`ScanOutcome`] to [`Detector::add_cloud`].
//!
//! Implementations shipped with the crate:
//! - [`SimulatedScanner`], [`SimulatedDetector`]: hardware-free stand-ins
//! - [`SurfaceServer`]: in-memory selection store with batch events

mod simulated;
mod surface_server;

pub use simulated::{SimulatedDetector, SimulatedScanner, SimulationConfig};
pub use surface_server::{SurfaceServer, SurfaceState};

use crate::core::types::{PointCloud, Pose3D, SurfaceId, SurfaceMarker, SurfaceMesh};
use crate::error::Result;
use crate::params::{DetectionParameters, ScanParameters};

/// Outcome of a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Poses the sensor actually reached
    pub poses_reached: Vec<Pose3D>,
    /// One cloud per captured view
    pub clouds: Vec<PointCloud>,
}

impl ScanOutcome {
    pub fn reached_count(&self) -> usize {
        self.poses_reached.len()
    }
}

/// Surfaces produced by a successful detection.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// One mesh per surface
    pub meshes: Vec<SurfaceMesh>,
    /// One marker per surface, same order as `meshes`
    pub markers: Vec<SurfaceMarker>,
    /// Merged cloud colored by surface
    pub region_cloud: PointCloud,
}

/// Scan stage: plans and executes the sensor sweep.
pub trait Scanner: Send {
    /// Prepare the stage. Failure aborts startup.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Publish the planned scan path without moving.
    fn publish_preview(&mut self, params: &ScanParameters) -> Result<()>;

    /// Execute the scan. Blocks for the full sweep.
    fn scan(&mut self, params: &ScanParameters) -> Result<ScanOutcome>;

    /// Poses of the most recent scan.
    fn latest_scan_poses(&self) -> Vec<Pose3D>;
}

/// Detection stage: extracts surfaces from accumulated scan data.
pub trait Detector: Send {
    /// Prepare the stage. Failure aborts startup.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Drop all accumulated data and previous results.
    fn clear_results(&mut self);

    /// Accumulate one scan cloud.
    fn add_cloud(&mut self, cloud: PointCloud);

    /// Run surface extraction over the accumulated data.
    fn find_surfaces(&mut self, params: &DetectionParameters) -> Result<Detection>;
}

/// Selection stage: operator-visible surface set.
///
/// Implementations serialize access internally and report every completed
/// selection mutation batch exactly once on their event channel.
///
/// Only the flag operations are batches. Replacing the surface set with
/// [`remove_all_surfaces`](Self::remove_all_surfaces) and
/// [`add_surface`](Self::add_surface) emits no event: the selected list
/// becomes empty and listeners keep the ids of the previous set until the
/// next flag operation. A successful detection is visible through its
/// response and the result cache instead.
pub trait SelectionStore: Send + Sync {
    /// Remove every registered surface. Not a selection batch.
    fn remove_all_surfaces(&self);

    /// Register an unselected, visible surface and return its id. Not a
    /// selection batch.
    fn add_surface(&self, mesh: SurfaceMesh) -> SurfaceId;

    /// Set the selection flag of the given surfaces (one batch).
    fn set_selection_flags(&self, ids: &[SurfaceId], selected: bool);

    /// Set the selection flag of every surface (one batch).
    fn select_all(&self, selected: bool);

    /// Set the visibility flag of every surface (one batch).
    fn show_all(&self, visible: bool);

    /// Ids of the currently selected surfaces.
    fn selected_list(&self) -> Vec<SurfaceId>;
}

/// Reported by a [`SelectionStore`] when a mutation batch completes.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    /// Selected ids as of the end of the batch
    pub selected: Vec<SurfaceId>,
}
