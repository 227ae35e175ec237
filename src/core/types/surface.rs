//! Surface geometry produced by detection and shown to the operator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a surface registered with the selection stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Triangle mesh of a detected surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    /// Vertex positions in meters
    pub vertices: Vec<[f32; 3]>,
    /// Triangles as vertex index triples
    pub triangles: Vec<[u32; 3]>,
}

impl SurfaceMesh {
    /// Axis-aligned rectangle at height `z` spanning `min`..`max` in XY.
    pub fn rectangle(min: [f32; 2], max: [f32; 2], z: f32) -> Self {
        Self {
            vertices: vec![
                [min[0], min[1], z],
                [max[0], min[1], z],
                [max[0], max[1], z],
                [min[0], max[1], z],
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    /// Flatten triangles into a vertex list (three points per triangle).
    pub fn triangle_list(&self) -> Vec<[f32; 3]> {
        self.triangles
            .iter()
            .flat_map(|t| t.iter().map(|&i| self.vertices[i as usize]))
            .collect()
    }

    /// Total surface area in square meters.
    pub fn area(&self) -> f32 {
        self.triangles
            .iter()
            .map(|t| {
                let a = self.vertices[t[0] as usize];
                let b = self.vertices[t[1] as usize];
                let c = self.vertices[t[2] as usize];
                let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
                let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
                let cross = [
                    u[1] * v[2] - u[2] * v[1],
                    u[2] * v[0] - u[0] * v[2],
                    u[0] * v[1] - u[1] * v[0],
                ];
                0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt()
            })
            .sum()
    }
}

/// Visual marker for a detected surface (triangle list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMarker {
    /// Marker identifier within its namespace
    pub id: u32,
    /// Marker namespace
    pub ns: String,
    /// Coordinate frame of the points
    pub frame_id: String,
    /// RGBA color (0.0-1.0)
    pub color: [f32; 4],
    /// Triangle list, three points per triangle
    pub points: Vec<[f32; 3]>,
}
