//! Source mesh collaborators.
//!
//! The exporter never talks to an authoring tool directly. A host adapter
//! implements [`MeshSource`] and [`SourceMesh`], handing over triangulated
//! meshes as per-corner records.

pub mod json;

pub use json::JsonScene;

use glam::{DVec2, DVec3};
use std::collections::BTreeMap;

/// One (face, vertex) occurrence with its face-specific attribute values.
///
/// Positions and normals are in the authoring tool's coordinate system.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Corner {
    /// Index of the geometric vertex in the source mesh.
    pub vertex: usize,
    pub position: DVec3,
    pub normal: DVec3,
    /// UV coordinate per UV layer name.
    pub uv: BTreeMap<String, DVec2>,
    /// Weight per group name. Providers report `0.0` for groups the vertex
    /// does not belong to.
    pub weights: BTreeMap<String, f64>,
}

/// A triangulated source mesh.
pub trait SourceMesh {
    /// The object name, used to name the exported files.
    fn name(&self) -> &str;

    /// Number of geometric vertices.
    fn vertex_count(&self) -> usize;

    /// Whether the host currently has this mesh selected.
    fn is_selected(&self) -> bool {
        false
    }

    /// Iterate over triangles as three corner records each.
    fn triangles(&self) -> Box<dyn Iterator<Item = [Corner; 3]> + '_>;
}

/// Discovery of the meshes available for export.
pub trait MeshSource {
    /// All meshes, in discovery order.
    fn meshes(&self) -> Box<dyn Iterator<Item = &dyn SourceMesh> + '_>;
}
