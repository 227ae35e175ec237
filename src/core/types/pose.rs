//! Pose type for scan viewpoints.

use serde::{Deserialize, Serialize};

/// Sensor pose in 3D space.
///
/// Position in meters, orientation as a unit quaternion `(qx, qy, qz, qw)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose3D {
    /// X position in meters
    pub x: f64,
    /// Y position in meters
    pub y: f64,
    /// Z position in meters
    pub z: f64,
    /// Quaternion X
    pub qx: f64,
    /// Quaternion Y
    pub qy: f64,
    /// Quaternion Z
    pub qz: f64,
    /// Quaternion W
    pub qw: f64,
}

impl Pose3D {
    /// Create a pose at the given position with identity orientation.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            qx: 0.0,
            qy: 0.0,
            qz: 0.0,
            qw: 1.0,
        }
    }

    /// Identity pose at origin.
    #[inline]
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Same position, orientation from roll/pitch/yaw (radians, XYZ convention).
    pub fn with_rpy(self, roll: f64, pitch: f64, yaw: f64) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();

        Self {
            qx: sr * cp * cy - cr * sp * sy,
            qy: cr * sp * cy + sr * cp * sy,
            qz: cr * cp * sy - sr * sp * cy,
            qw: cr * cp * cy + sr * sp * sy,
            ..self
        }
    }

    /// Euclidean distance between positions.
    #[inline]
    pub fn distance(&self, other: &Pose3D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Default for Pose3D {
    fn default() -> Self {
        Self::identity()
    }
}
