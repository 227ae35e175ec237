//! Cache of the last successful surface detection.
//!
//! The detection result and the region cloud are stored together behind one
//! `RwLock`. A successful detection swaps both in a single write; a failed
//! detection only drops the cloud.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::types::{PointCloud, Pose3D, SurfaceMarker};
use crate::params::DetectionParameters;

/// Snapshot of a successful detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    /// Detection parameters the surfaces were found with
    pub surface_detection: DetectionParameters,
    /// Whether surfaces were found (false only for the initial empty value)
    pub surfaces_found: bool,
    /// Markers of the detected surfaces
    pub surfaces: Vec<SurfaceMarker>,
    /// Scan poses that produced the data
    pub robot_scan_poses: Vec<Pose3D>,
}

/// Consistent view of both cached values.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub result: Arc<DetectionResult>,
    pub region_cloud: Option<Arc<PointCloud>>,
}

/// Process-wide cache of the last successful detection.
#[derive(Debug, Default)]
pub struct ResultCache {
    inner: RwLock<CacheSnapshot>,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successful detection result (empty until one succeeds).
    pub fn get(&self) -> DetectionResult {
        self.inner.read().result.as_ref().clone()
    }

    /// Current region cloud, if the last detection succeeded.
    pub fn region_cloud(&self) -> Option<Arc<PointCloud>> {
        self.inner.read().region_cloud.clone()
    }

    /// Both values, read under one lock.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.inner.read().clone()
    }

    /// Replace result and cloud together.
    pub fn replace(&self, result: DetectionResult, cloud: PointCloud) {
        let next = CacheSnapshot {
            result: Arc::new(result),
            region_cloud: Some(Arc::new(cloud)),
        };
        *self.inner.write() = next;
    }

    /// Drop the region cloud, keeping the last result.
    pub fn clear_region_cloud(&self) {
        self.inner.write().region_cloud = None;
    }
}
