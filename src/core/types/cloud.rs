//! Colored 3D point cloud.

use serde::{Deserialize, Serialize};

/// Colored 3D point cloud in structure-of-arrays layout.
///
/// Used both for raw scan patches and for the merged region cloud produced
/// by surface detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    /// Coordinate frame of the points
    pub frame_id: String,
    /// X coordinates in meters
    pub xs: Vec<f32>,
    /// Y coordinates in meters
    pub ys: Vec<f32>,
    /// Z coordinates in meters
    pub zs: Vec<f32>,
    /// Optional RGB colors (same length as xs/ys/zs)
    pub colors: Option<Vec<[u8; 3]>>,
}

impl PointCloud {
    /// Create an empty cloud in the given frame.
    pub fn new(frame_id: impl Into<String>) -> Self {
        Self {
            frame_id: frame_id.into(),
            ..Default::default()
        }
    }

    /// Create an empty cloud with pre-allocated capacity.
    pub fn with_capacity(frame_id: impl Into<String>, capacity: usize) -> Self {
        Self {
            frame_id: frame_id.into(),
            xs: Vec::with_capacity(capacity),
            ys: Vec::with_capacity(capacity),
            zs: Vec::with_capacity(capacity),
            colors: None,
        }
    }

    /// Add an uncolored point.
    ///
    /// If the cloud already carries colors the point is colored black so
    /// the color array stays aligned.
    #[inline]
    pub fn push(&mut self, x: f32, y: f32, z: f32) {
        self.xs.push(x);
        self.ys.push(y);
        self.zs.push(z);
        if let Some(ref mut colors) = self.colors {
            colors.push([0, 0, 0]);
        }
    }

    /// Add a colored point.
    ///
    /// Promotes an uncolored cloud to a colored one (existing points black).
    #[inline]
    pub fn push_colored(&mut self, x: f32, y: f32, z: f32, rgb: [u8; 3]) {
        let existing = self.xs.len();
        self.xs.push(x);
        self.ys.push(y);
        self.zs.push(z);
        self.colors
            .get_or_insert_with(|| vec![[0, 0, 0]; existing])
            .push(rgb);
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Iterate over `(x, y, z)` triples.
    pub fn points(&self) -> impl Iterator<Item = (f32, f32, f32)> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.zs)
            .map(|((&x, &y), &z)| (x, y, z))
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty cloud.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut iter = self.points();
        let (x, y, z) = iter.next()?;
        let mut min = [x, y, z];
        let mut max = [x, y, z];
        for (x, y, z) in iter {
            min = [min[0].min(x), min[1].min(y), min[2].min(z)];
            max = [max[0].max(x), max[1].max(y), max[2].max(z)];
        }
        Some((min, max))
    }
}
