//! Outbound message types.

use serde::{Deserialize, Serialize};

use crate::core::types::{Pose3D, SurfaceId};

/// Emitted once per completed selection mutation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedSurfacesChanged {
    /// Full list of selected surfaces after the batch
    pub selected_surfaces: Vec<SurfaceId>,
}

/// Planned scan path, published before a scan and on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanPathPreview {
    /// Frame the poses are expressed in
    pub frame_id: String,
    /// Planned scan poses in sweep order
    pub poses: Vec<Pose3D>,
}
