//! Hardware-free scan and detection stages.
//!
//! # Scanner
//!
//! Plans `num_scan_points` poses on an arc around the object between the
//! sweep angles, `cam_to_obj_xoffset` out and `cam_to_obj_zoffset` up.
//! Every reached pose captures a square patch of points on the object plane
//! (z = 0) below the camera.
//!
//! # Detector
//!
//! Every accumulated patch with at least `min_cluster_size` points becomes
//! one planar surface spanning the patch bounds.
//!
//! # Configuration
//!
//! ```toml
//! [simulation]
//! scan_delay_ms = 200      # Dwell per scan pose
//! patch_size = 0.1         # Side of the captured patch (m)
//! patch_resolution = 0.01  # Point spacing inside a patch (m)
//! unreachable_every = 0    # Every Nth pose unreachable (0 = none)
//! ```

use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{Detection, Detector, ScanOutcome, Scanner};
use crate::core::types::{PointCloud, Pose3D, SurfaceMarker, SurfaceMesh};
use crate::error::{ParikshaError, Result};
use crate::params::{DetectionParameters, ScanParameters};
use crate::streaming::{ScanPathPreview, Topic};

/// Simulated stage settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Dwell time per scan pose (ms)
    pub scan_delay_ms: u64,
    /// Side of the captured patch (m)
    pub patch_size: f64,
    /// Point spacing inside a patch (m)
    pub patch_resolution: f64,
    /// Every Nth planned pose is unreachable (0 = all reachable)
    pub unreachable_every: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scan_delay_ms: 0,
            patch_size: 0.1,
            patch_resolution: 0.01,
            unreachable_every: 0,
        }
    }
}

/// Colors assigned to surfaces in order.
const PALETTE: [[u8; 3]; 6] = [
    [230, 25, 75],
    [60, 180, 75],
    [0, 130, 200],
    [245, 130, 48],
    [145, 30, 180],
    [70, 240, 240],
];

/// Simulated scan stage.
pub struct SimulatedScanner {
    config: SimulationConfig,
    preview: Arc<Topic<ScanPathPreview>>,
    latest_poses: Vec<Pose3D>,
}

impl SimulatedScanner {
    pub fn new(config: SimulationConfig, preview: Arc<Topic<ScanPathPreview>>) -> Self {
        Self {
            config,
            preview,
            latest_poses: Vec::new(),
        }
    }

    /// Planned scan path for the given parameters.
    pub fn plan(params: &ScanParameters) -> Vec<Pose3D> {
        let n = params.num_scan_points as usize;
        let span = params.sweep_angle_end - params.sweep_angle_start;

        (0..n)
            .map(|i| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                let angle = params.sweep_angle_start + span * t;
                let r = params.cam_to_obj_xoffset;
                Pose3D::new(r * angle.cos(), r * angle.sin(), params.cam_to_obj_zoffset).with_rpy(
                    0.0,
                    PI / 2.0 - params.cam_tilt_angle,
                    angle + PI,
                )
            })
            .collect()
    }

    fn is_reachable(&self, index: usize) -> bool {
        let every = self.config.unreachable_every as usize;
        every == 0 || (index + 1) % every != 0
    }

    /// Capture the object patch seen from `pose`.
    fn capture(&self, pose: &Pose3D, frame_id: &str) -> PointCloud {
        let res = self.config.patch_resolution.max(1e-4);
        let steps = (self.config.patch_size / res).round() as usize + 1;
        let half = self.config.patch_size / 2.0;
        // Patch centered between the camera footprint and the object center
        let cx = pose.x * 0.5;
        let cy = pose.y * 0.5;

        let mut cloud = PointCloud::with_capacity(frame_id, steps * steps);
        for i in 0..steps {
            for j in 0..steps {
                let x = cx - half + i as f64 * res;
                let y = cy - half + j as f64 * res;
                cloud.push(x as f32, y as f32, 0.0);
            }
        }
        cloud
    }
}

impl Scanner for SimulatedScanner {
    fn initialize(&mut self) -> Result<()> {
        if self.config.patch_size <= 0.0 {
            return Err(ParikshaError::StageInit(format!(
                "simulation patch_size must be positive, got {}",
                self.config.patch_size
            )));
        }
        Ok(())
    }

    fn publish_preview(&mut self, params: &ScanParameters) -> Result<()> {
        let poses = Self::plan(params);
        tracing::debug!("Publishing scan path preview ({} poses)", poses.len());
        self.preview.publish(ScanPathPreview {
            frame_id: params.world_frame.clone(),
            poses,
        });
        Ok(())
    }

    fn scan(&mut self, params: &ScanParameters) -> Result<ScanOutcome> {
        let planned = Self::plan(params);
        let reachable: Vec<bool> = (0..planned.len()).map(|i| self.is_reachable(i)).collect();
        let reachable_count = reachable.iter().filter(|&&r| r).count();

        if !planned.is_empty() {
            let ratio = reachable_count as f64 / planned.len() as f64;
            if ratio < params.reachable_scan_points_ratio {
                tracing::warn!(
                    "Only {:.0}% of scan poses reachable (need {:.0}%)",
                    ratio * 100.0,
                    params.reachable_scan_points_ratio * 100.0
                );
                self.latest_poses.clear();
                return Ok(ScanOutcome::default());
            }
        }

        let mut outcome = ScanOutcome::default();
        for (pose, ok) in planned.iter().zip(reachable) {
            if !ok {
                if params.stop_on_planning_error {
                    tracing::warn!("Scan pose unreachable, stopping scan");
                    break;
                }
                tracing::debug!("Scan pose unreachable, skipping");
                continue;
            }

            if self.config.scan_delay_ms > 0 {
                std::thread::sleep(Duration::from_millis(self.config.scan_delay_ms));
            }
            outcome.clouds.push(self.capture(pose, &params.world_frame));
            outcome.poses_reached.push(*pose);
        }

        self.latest_poses = outcome.poses_reached.clone();
        Ok(outcome)
    }

    fn latest_scan_poses(&self) -> Vec<Pose3D> {
        self.latest_poses.clone()
    }
}

/// Simulated detection stage.
#[derive(Debug, Default)]
pub struct SimulatedDetector {
    clouds: Vec<PointCloud>,
}

impl SimulatedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accumulated clouds.
    pub fn cloud_count(&self) -> usize {
        self.clouds.len()
    }
}

impl Detector for SimulatedDetector {
    fn clear_results(&mut self) {
        self.clouds.clear();
    }

    fn add_cloud(&mut self, cloud: PointCloud) {
        self.clouds.push(cloud);
    }

    fn find_surfaces(&mut self, params: &DetectionParameters) -> Result<Detection> {
        if self.clouds.is_empty() {
            return Err(ParikshaError::Detection("no scan data accumulated".into()));
        }

        let min = params.min_cluster_size as usize;
        let max = params.max_cluster_size as usize;
        let mut clusters: Vec<&PointCloud> = self
            .clouds
            .iter()
            .filter(|c| c.len() >= min && (max == 0 || c.len() <= max))
            .collect();

        if params.ignore_largest_cluster && clusters.len() > 1 {
            let largest = clusters
                .iter()
                .enumerate()
                .max_by_key(|(_, c)| c.len())
                .map(|(i, _)| i);
            if let Some(i) = largest {
                clusters.remove(i);
            }
        }

        let mut detection = Detection {
            region_cloud: PointCloud::new(params.frame_id.clone()),
            ..Default::default()
        };

        for (index, cluster) in clusters.iter().enumerate() {
            let Some((lo, hi)) = cluster.bounds() else {
                continue;
            };
            let rgb = PALETTE[index % PALETTE.len()];
            let z = cluster.zs.iter().sum::<f32>() / cluster.len() as f32;
            let mesh = SurfaceMesh::rectangle([lo[0], lo[1]], [hi[0], hi[1]], z);

            detection.markers.push(SurfaceMarker {
                id: index as u32,
                ns: "surfaces".to_string(),
                frame_id: params.frame_id.clone(),
                color: [
                    f32::from(rgb[0]) / 255.0,
                    f32::from(rgb[1]) / 255.0,
                    f32::from(rgb[2]) / 255.0,
                    params.marker_alpha as f32,
                ],
                points: mesh.triangle_list(),
            });
            detection.meshes.push(mesh);

            for (x, y, z) in cluster.points() {
                detection.region_cloud.push_colored(x, y, z, rgb);
            }
        }

        if detection.meshes.is_empty() {
            return Err(ParikshaError::NoSurfaces);
        }

        tracing::debug!(
            "Found {} surfaces in {} clouds",
            detection.meshes.len(),
            self.clouds.len()
        );
        Ok(detection)
    }
}
