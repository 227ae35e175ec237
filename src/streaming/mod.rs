//! Outbound streams.
//!
//! Each outbound stream (region cloud, selection changes, scan path preview)
//! is a [`Topic`]: an in-process broadcast that the transport layer
//! subscribes to. Transport framing itself lives outside this crate.

mod messages;
mod topic;

pub use messages::{ScanPathPreview, SelectedSurfacesChanged};
pub use topic::Topic;

/// Topic names as advertised to the transport layer.
pub mod names {
    pub const SELECTED_SURFACES_CHANGED: &str = "selected_surfaces_changed";
    pub const ROBOT_SCAN_PATH_PREVIEW: &str = "robot_scan_path_preview";
    pub const REGION_COLORED_CLOUD: &str = "region_colored_cloud";
}
