//! Parameter groups and their current/default store.
//!
//! Three groups configure the pipeline:
//! - [`ScanParameters`]: scan path planning (robot scan stage)
//! - [`DetectionParameters`]: surface extraction (detection stage)
//! - [`BlendingParameters`]: downstream blending process plan
//!
//! Each group has a mutable *current* value and an immutable *default*
//! snapshotted once at startup (see [`ParameterStore`]).

mod store;

pub use store::{ParameterSet, ParameterStore};

use serde::{Deserialize, Serialize};

/// Robot scan path parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanParameters {
    /// Motion planning group of the scanning arm
    pub group_name: String,
    /// Fixed world frame
    pub world_frame: String,
    /// Tool center point frame carrying the camera
    pub tcp_frame: String,
    /// Camera height above the scanned object (m)
    pub cam_to_obj_zoffset: f64,
    /// Camera horizontal offset from the object (m)
    pub cam_to_obj_xoffset: f64,
    /// Camera tilt towards the object (rad)
    pub cam_tilt_angle: f64,
    /// Sweep start angle around the object (rad)
    pub sweep_angle_start: f64,
    /// Sweep end angle around the object (rad)
    pub sweep_angle_end: f64,
    /// Number of scan poses along the sweep
    pub num_scan_points: u32,
    /// Minimum fraction of reachable poses for a valid scan plan
    pub reachable_scan_points_ratio: f64,
    /// Abort the scan at the first unreachable pose
    pub stop_on_planning_error: bool,
}

/// Surface detection parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionParameters {
    /// Frame of the produced surfaces
    pub frame_id: String,
    /// Neighbors used by statistical outlier removal
    pub mean_k: u32,
    /// Standard deviation multiplier for outlier removal
    pub stdv_threshold: f64,
    /// Voxel grid leaf size (m)
    pub voxel_leaf: f64,
    /// Neighbors used for normal estimation
    pub k_search: u32,
    /// Minimum points per surface cluster
    pub min_cluster_size: u32,
    /// Maximum points per surface cluster
    pub max_cluster_size: u32,
    /// Neighbors used by region growing
    pub num_neighbors: u32,
    /// Region growing smoothness threshold (rad)
    pub smoothness_threshold: f64,
    /// Region growing curvature threshold
    pub curvature_threshold: f64,
    /// Marker transparency
    pub marker_alpha: f64,
    /// Drop the largest cluster (usually the table top)
    pub ignore_largest_cluster: bool,
}

/// Blending process plan parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendingParameters {
    /// Blending tool radius (m)
    pub tool_radius: f64,
    /// Margin kept from surface boundaries (m)
    pub margin: f64,
    /// Overlap between adjacent passes (m)
    pub overlap: f64,
    /// Approach speed (m/s)
    pub approach_spd: f64,
    /// Blending speed (m/s)
    pub blending_spd: f64,
    /// Retract speed (m/s)
    pub retract_spd: f64,
    /// Traverse speed (m/s)
    pub traverse_spd: f64,
    /// Path discretization step (m)
    pub discretization: f64,
    /// Safe height for traverse moves (m)
    pub safe_traverse_height: f64,
}

/// Identifies one parameter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterGroup {
    Scan,
    Detection,
    Blending,
}

/// A value of one parameter group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupValue {
    Scan(ScanParameters),
    Detection(DetectionParameters),
    Blending(BlendingParameters),
}

impl GroupValue {
    /// The group this value belongs to.
    pub fn group(&self) -> ParameterGroup {
        match self {
            GroupValue::Scan(_) => ParameterGroup::Scan,
            GroupValue::Detection(_) => ParameterGroup::Detection,
            GroupValue::Blending(_) => ParameterGroup::Blending,
        }
    }
}
