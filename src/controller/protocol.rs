//! Request/response types of the controller services.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{Pose3D, SurfaceId, SurfaceMarker};
use crate::params::{BlendingParameters, DetectionParameters, ScanParameters};
use crate::state::DetectionResult;

/// Surface detection service request.
#[derive(Debug, Clone, Default)]
pub struct SurfaceDetectionRequest {
    /// Raw action code (see [`Action`](super::Action))
    pub action: u8,
    /// Reset touched groups to defaults instead of applying overrides
    pub use_default_parameters: bool,
    /// Scan parameter override
    pub robot_scan: Option<ScanParameters>,
    /// Detection parameter override
    pub surface_detection: Option<DetectionParameters>,
    /// Give up waiting after this long
    pub timeout: Option<Duration>,
}

impl SurfaceDetectionRequest {
    /// Request running `action` with default parameters.
    pub fn with_defaults(action: super::Action) -> Self {
        Self {
            action: action.code(),
            use_default_parameters: true,
            ..Default::default()
        }
    }

    /// Request running `action` with caller-supplied overrides.
    pub fn with_overrides(
        action: super::Action,
        robot_scan: Option<ScanParameters>,
        surface_detection: Option<DetectionParameters>,
    ) -> Self {
        Self {
            action: action.code(),
            use_default_parameters: false,
            robot_scan,
            surface_detection,
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Surface detection service response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDetectionResponse {
    pub surfaces_found: bool,
    pub surfaces: Vec<SurfaceMarker>,
    pub robot_scan: Option<ScanParameters>,
    pub surface_detection: Option<DetectionParameters>,
    pub robot_scan_poses: Vec<Pose3D>,
    /// Caller stopped waiting before the action completed
    pub timed_out: bool,
}

impl SurfaceDetectionResponse {
    /// Failure response for a request that outlived its timeout.
    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Default::default()
        }
    }
}

impl From<DetectionResult> for SurfaceDetectionResponse {
    fn from(result: DetectionResult) -> Self {
        Self {
            surfaces_found: result.surfaces_found,
            surfaces: result.surfaces,
            robot_scan: None,
            surface_detection: Some(result.surface_detection),
            robot_scan_poses: result.robot_scan_poses,
            timed_out: false,
        }
    }
}

/// Selection service request.
#[derive(Debug, Clone, Default)]
pub struct SelectSurfaceRequest {
    /// Raw action code (see [`SelectAction`](super::SelectAction))
    pub action: u8,
    /// Targets of SELECT / DESELECT
    pub select_surfaces: Vec<SurfaceId>,
}

/// Parameter query service request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterQueryRequest {
    /// Raw action code (see [`ParameterQueryAction`](super::ParameterQueryAction))
    pub action: u8,
}

/// Parameter query service response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterQueryResponse {
    pub surface_detection: DetectionParameters,
    pub robot_scan: ScanParameters,
    pub blending_plan: BlendingParameters,
}

/// Process planning service response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessPlanningResponse {
    pub succeeded: bool,
}
