//! Core data types shared by the pipeline stages.
//!
//! - [`Pose3D`]: Position + quaternion orientation of a scan viewpoint
//! - [`PointCloud`]: Colored 3D point cloud (scan output, region cloud)
//! - [`SurfaceMesh`], [`SurfaceMarker`]: Detected surface geometry and its visual marker
//! - [`SurfaceId`]: Stable identifier of a surface registered with the selection stage

mod cloud;
mod pose;
mod surface;

pub use cloud::PointCloud;
pub use pose::Pose3D;
pub use surface::{SurfaceId, SurfaceMarker, SurfaceMesh};
