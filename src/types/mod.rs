//! Shared types used throughout the library.

mod axis;
mod transform;

pub use axis::{Axis, AxisConvention, CoordinateSystem, SignedAxis, WindingOrder};
pub use transform::CoordinateTransform;

use glam::{DVec2, DVec3};
use std::collections::BTreeMap;

/// A vertex in the exported mesh.
///
/// UV layers and groups are kept in ordered maps, so iterating either map
/// always yields names in lexicographic order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vertex {
    /// Position in the exported coordinate system.
    pub position: DVec3,
    /// Normal vector.
    pub normal: DVec3,
    /// Texture coordinates per UV layer name.
    pub uv: BTreeMap<String, DVec2>,
    /// Weight per group name.
    pub weights: BTreeMap<String, f64>,
}

impl Vertex {
    pub fn new(position: DVec3, normal: DVec3) -> Self {
        Self {
            position,
            normal,
            uv: BTreeMap::new(),
            weights: BTreeMap::new(),
        }
    }

    pub fn with_uv(mut self, layer: impl Into<String>, uv: DVec2) -> Self {
        self.uv.insert(layer.into(), uv);
        self
    }

    pub fn with_weight(mut self, group: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(group.into(), weight);
        self
    }
}

/// A triangle as three canonical vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
}

impl Triangle {
    pub fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn indices(&self) -> [u32; 3] {
        [self.v0, self.v1, self.v2]
    }
}
