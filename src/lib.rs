//! # SMF/T Export
//!
//! A Rust library for exporting face-indexed triangle meshes to the SMF/T
//! text mesh format.
//!
//! ## Overview
//!
//! Authoring tools store attributes such as UV coordinates per face corner,
//! while SMF/T stores every attribute per vertex. The exporter walks each
//! triangle of a source mesh, remaps positions and normals into the target
//! axis convention, and splits vertices whose corners disagree. Every mesh
//! gets its own diagnostics log; a mesh is only published when its export
//! pass logged no errors.
//!
//! ## Quick Start
//!
//! ```ignore
//! use smft_export::{ExportConfig, Exporter, JsonScene};
//!
//! // Load meshes from a JSON scene file
//! let scene = JsonScene::from_path("scene.json")?;
//!
//! // Export every mesh into `out/`
//! let exporter = Exporter::new(ExportConfig::default())?;
//! let report = exporter.write("out".as_ref(), &scene)?;
//!
//! println!("{} published, {} failed", report.published_count(), report.failed_count());
//! ```
//!
//! ## Library Integration
//!
//! To export from an existing scene representation, implement the
//! `MeshSource` and `SourceMesh` traits, or build a `VertexMesh` directly and
//! serialize it with `export_smft()`:
//!
//! ```ignore
//! use smft_export::{export_smft, CoordinateSystem, ExportMetadata, Vertex, VertexMesh};
//!
//! let mut mesh = VertexMesh::new(3);
//! let a = mesh.add_vertex(0, Vertex::new(p0, n))?;
//! let b = mesh.add_vertex(1, Vertex::new(p1, n))?;
//! let c = mesh.add_vertex(2, Vertex::new(p2, n))?;
//! mesh.add_triangle(a, b, c)?;
//!
//! let text = export_smft(&mesh, &CoordinateSystem::default(), &ExportMetadata::new("my-tool 1.0"))?;
//! ```

pub mod error;
pub mod types;
pub mod mesh;
pub mod diagnostics;
pub mod source;
pub mod export;
pub mod exporter;

// Re-export main types for convenience
pub use error::{ExportError, Result};
pub use types::{
    Axis, AxisConvention, CoordinateSystem, CoordinateTransform, SignedAxis, Triangle, Vertex,
    WindingOrder,
};
pub use mesh::{AttributeSchema, VertexMesh};
pub use diagnostics::{Diagnostics, Severity};
pub use source::{Corner, JsonScene, MeshSource, SourceMesh};
pub use export::{export_smft, write_smft, ExportMetadata};
pub use exporter::{ExportConfig, ExportReport, Exporter, MeshOutcome, MeshStatus, Selection};

/// Export every mesh of a JSON scene file into `dir` with the given config.
pub fn export_scene<P: AsRef<std::path::Path>, Q: AsRef<std::path::Path>>(
    scene: P,
    dir: Q,
    config: ExportConfig,
) -> Result<ExportReport> {
    let scene = JsonScene::from_path(scene)?;
    Exporter::new(config)?.write(dir.as_ref(), &scene)
}
