//! Building a [`VertexMesh`] from source corners.

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::mesh::VertexMesh;
use crate::source::{Corner, SourceMesh};
use crate::types::{CoordinateTransform, Vertex, WindingOrder};
use std::io::Write;

/// Feed every triangle of `source` through the coordinate transform into a
/// fresh [`VertexMesh`].
///
/// Source triangles are counter-clockwise; with [`WindingOrder::Clockwise`]
/// each triangle is stored as `(i0, i2, i1)`.
///
/// Malformed corners (out-of-range vertex indices, non-finite values) are
/// logged as errors and the pass continues; the caller decides from the
/// error count whether the result may be published. Schema mismatches and
/// other contract violations abort the build.
pub fn build_vertex_mesh<W: Write>(
    source: &dyn SourceMesh,
    transform: &CoordinateTransform,
    winding: WindingOrder,
    log: &mut Diagnostics<W>,
) -> Result<VertexMesh> {
    let capacity = source.vertex_count();
    let mut mesh = VertexMesh::new(capacity);
    log.debug(format!("created mesh with {} vertices", capacity));

    for (face, corners) in source.triangles().enumerate() {
        if let Some(bad) = corners.iter().find(|c| c.vertex >= capacity) {
            log.error(format!(
                "triangle {}: vertex index {} out of range (mesh has {} vertices)",
                face, bad.vertex, capacity
            ));
            continue;
        }

        let mut indices = [0u32; 3];
        for (k, corner) in corners.into_iter().enumerate() {
            check_finite(face, &corner, log);

            let slot = corner.vertex;
            let vertex = Vertex {
                position: transform.position(corner.position),
                normal: transform.normal(corner.normal),
                uv: corner.uv,
                weights: corner.weights,
            };
            indices[k] = mesh.add_vertex(slot, vertex)?;

            if indices[k] as usize == slot {
                log.debug(format!("add_vertex: [{}] assigned or reused", slot));
            } else {
                log.debug(format!(
                    "add_vertex: [{}] incompatible, assigned to {}",
                    slot, indices[k]
                ));
            }
        }

        let [i0, i1, i2] = indices;
        let (v0, v1, v2) = match winding {
            WindingOrder::CounterClockwise => (i0, i1, i2),
            WindingOrder::Clockwise => (i0, i2, i1),
        };
        mesh.add_triangle(v0, v1, v2)?;
        log.debug(format!("add_triangle: {} {} {}", v0, v1, v2));
    }

    log.debug(format!(
        "built {} vertices ({} split), {} triangles",
        mesh.vertex_count(),
        mesh.split_count(),
        mesh.triangle_count()
    ));
    Ok(mesh)
}

fn check_finite<W: Write>(face: usize, corner: &Corner, log: &mut Diagnostics<W>) {
    let slot = corner.vertex;
    if !corner.position.is_finite() {
        log.error(format!(
            "triangle {}: vertex {} has a non-finite position {:?}",
            face, slot, corner.position
        ));
    }
    if !corner.normal.is_finite() {
        log.error(format!(
            "triangle {}: vertex {} has a non-finite normal {:?}",
            face, slot, corner.normal
        ));
    }
    for (layer, uv) in &corner.uv {
        if !uv.is_finite() {
            log.error(format!(
                "triangle {}: vertex {} has a non-finite UV {:?} in layer {}",
                face, slot, uv, layer
            ));
        }
    }
    for (group, weight) in &corner.weights {
        if !weight.is_finite() {
            log.error(format!(
                "triangle {}: vertex {} has a non-finite weight {} in group {}",
                face, slot, weight, group
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::error::ExportError;
    use crate::source::JsonScene;
    use glam::DVec3;

    fn scene(json: &str) -> JsonScene {
        JsonScene::from_json(json).unwrap()
    }

    fn build(
        scene: &JsonScene,
        winding: WindingOrder,
        log: &mut Diagnostics<Vec<u8>>,
    ) -> Result<VertexMesh> {
        build_vertex_mesh(&scene.meshes[0], &CoordinateTransform::default(), winding, log)
    }

    const SEAMED_QUAD: &str = r#"{ "meshes": [{
        "name": "Quad",
        "vertex_groups": ["bone"],
        "vertices": [
            { "position": [0, 0, 0], "normal": [0, 0, 1], "weights": { "bone": 1.0 } },
            { "position": [1, 0, 0], "normal": [0, 0, 1] },
            { "position": [1, 1, 0], "normal": [0, 0, 1] },
            { "position": [0, 1, 0], "normal": [0, 0, 1] }
        ],
        "triangles": [
            { "indices": [0, 1, 2], "uv": { "UVMap": [[0, 0], [1, 0], [1, 1]] } },
            { "indices": [0, 2, 3], "uv": { "UVMap": [[0, 0], [0.5, 0.5], [0, 1]] } }
        ]
    }]}"#;

    #[test]
    fn test_build_seamed_quad() {
        let scene = scene(SEAMED_QUAD);
        let mut log = Diagnostics::new(Vec::new(), Severity::Debug);
        let mesh = build(&scene, WindingOrder::CounterClockwise, &mut log).unwrap();

        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(log.error_count(), 0);

        // Positions and normals are remapped into the exported axes.
        let v2 = mesh.vertex(2).unwrap();
        assert_eq!(v2.position, DVec3::new(1.0, 0.0, -1.0));
        assert_eq!(v2.normal, DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(mesh.vertex(0).unwrap().weights["bone"], 1.0);
        assert_eq!(mesh.vertex(1).unwrap().weights["bone"], 0.0);
    }

    #[test]
    fn test_out_of_range_corner_is_soft_error() {
        let mut scene = scene(SEAMED_QUAD);
        scene.meshes[0].triangles[1].indices = [0, 2, 7];

        let mut log = Diagnostics::new(Vec::new(), Severity::Info);
        let mesh = build(&scene, WindingOrder::CounterClockwise, &mut log).unwrap();

        assert_eq!(log.error_count(), 1);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_non_finite_values_are_soft_errors() {
        let mut scene = scene(SEAMED_QUAD);
        scene.meshes[0].vertices[1].position = [f64::NAN, 0.0, 0.0];
        scene.meshes[0].vertices[3].weights.insert("bone".into(), f64::INFINITY);

        let mut log = Diagnostics::new(Vec::new(), Severity::Info);
        let mesh = build(&scene, WindingOrder::CounterClockwise, &mut log).unwrap();

        assert_eq!(log.error_count(), 2);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_missing_uv_layer_aborts() {
        let mut scene = scene(SEAMED_QUAD);
        scene.meshes[0].triangles[1].uv.clear();

        let mut log = Diagnostics::new(Vec::new(), Severity::Info);
        let result = build(&scene, WindingOrder::CounterClockwise, &mut log);

        assert!(matches!(
            result,
            Err(ExportError::AttributeSchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_clockwise_winding_reverses_triangles() {
        let scene = scene(SEAMED_QUAD);

        let mut log = Diagnostics::new(Vec::new(), Severity::Info);
        let ccw = build(&scene, WindingOrder::CounterClockwise, &mut log).unwrap();
        let mut log = Diagnostics::new(Vec::new(), Severity::Info);
        let cw = build(&scene, WindingOrder::Clockwise, &mut log).unwrap();

        let ccw: Vec<_> = ccw.triangles().iter().map(|t| t.indices()).collect();
        let cw: Vec<_> = cw.triangles().iter().map(|t| t.indices()).collect();
        assert_eq!(ccw, vec![[0, 1, 2], [0, 4, 3]]);
        assert_eq!(cw, vec![[0, 2, 1], [0, 3, 4]]);
    }
}
