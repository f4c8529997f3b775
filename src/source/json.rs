//! JSON scene files as a mesh source.
//!
//! Vertex positions, normals and group weights are stored per geometric
//! vertex; UV coordinates are stored per triangle corner, since they may
//! differ between faces sharing a vertex.

use super::{Corner, MeshSource, SourceMesh};
use crate::error::Result;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A scene of meshes loaded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonScene {
    pub meshes: Vec<JsonMesh>,
}

/// A triangulated mesh in a JSON scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonMesh {
    pub name: String,
    #[serde(default)]
    pub selected: bool,
    /// Group names declared on the object. Vertices that are not listed in a
    /// group get a weight of 0.0 for it.
    #[serde(default)]
    pub vertex_groups: Vec<String>,
    pub vertices: Vec<JsonVertex>,
    #[serde(default)]
    pub triangles: Vec<JsonTriangle>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonVertex {
    pub position: [f64; 3],
    pub normal: [f64; 3],
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonTriangle {
    pub indices: [usize; 3],
    /// UV coordinates of the three corners, per UV layer.
    #[serde(default)]
    pub uv: BTreeMap<String, [[f64; 2]; 3]>,
}

impl JsonScene {
    /// Load a scene from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a scene from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl MeshSource for JsonScene {
    fn meshes(&self) -> Box<dyn Iterator<Item = &dyn SourceMesh> + '_> {
        Box::new(self.meshes.iter().map(|m| m as &dyn SourceMesh))
    }
}

impl JsonMesh {
    fn corner(&self, triangle: &JsonTriangle, k: usize) -> Corner {
        let index = triangle.indices[k];
        let mut corner = Corner {
            vertex: index,
            ..Corner::default()
        };

        // Out-of-range indices are passed through untouched; the exporter
        // reports them against this mesh.
        if let Some(vertex) = self.vertices.get(index) {
            corner.position = DVec3::from_array(vertex.position);
            corner.normal = DVec3::from_array(vertex.normal);
            corner.weights = self
                .vertex_groups
                .iter()
                .map(|group| {
                    let weight = vertex.weights.get(group).copied().unwrap_or(0.0);
                    (group.clone(), weight)
                })
                .collect();
        }

        corner.uv = triangle
            .uv
            .iter()
            .map(|(layer, uvs)| (layer.clone(), DVec2::from_array(uvs[k])))
            .collect();

        corner
    }
}

impl SourceMesh for JsonMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn triangles(&self) -> Box<dyn Iterator<Item = [Corner; 3]> + '_> {
        Box::new(
            self.triangles
                .iter()
                .map(move |t| [0, 1, 2].map(|k| self.corner(t, k))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "meshes": [{
            "name": "Tri",
            "selected": true,
            "vertex_groups": ["arm", "leg"],
            "vertices": [
                { "position": [0, 0, 0], "normal": [0, 0, 1], "weights": { "arm": 0.25 } },
                { "position": [1, 0, 0], "normal": [0, 0, 1] },
                { "position": [0, 1, 0], "normal": [0, 0, 1], "weights": { "leg": 1.0, "tail": 0.5 } }
            ],
            "triangles": [
                { "indices": [0, 1, 2], "uv": { "UVMap": [[0, 0], [1, 0], [0, 1]] } }
            ]
        }, {
            "name": "Empty",
            "vertices": []
        }]
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = JsonScene::from_json(SCENE).unwrap();
        let meshes: Vec<_> = scene.meshes().collect();

        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[0].name(), "Tri");
        assert!(meshes[0].is_selected());
        assert!(!meshes[1].is_selected());
        assert_eq!(meshes[0].vertex_count(), 3);
        assert_eq!(meshes[1].triangles().count(), 0);
    }

    #[test]
    fn test_corners_fill_missing_groups() {
        let scene = JsonScene::from_json(SCENE).unwrap();
        let triangle = scene.meshes[0].triangles().next().unwrap();

        assert_eq!(triangle[0].weights["arm"], 0.25);
        assert_eq!(triangle[0].weights["leg"], 0.0);
        assert_eq!(triangle[1].weights.len(), 2);
        // Groups not declared on the object are dropped.
        assert!(!triangle[2].weights.contains_key("tail"));
        assert_eq!(triangle[2].weights["leg"], 1.0);
    }

    #[test]
    fn test_corners_take_per_face_uv() {
        let scene = JsonScene::from_json(SCENE).unwrap();
        let triangle = scene.meshes[0].triangles().next().unwrap();

        assert_eq!(triangle[1].uv["UVMap"], DVec2::new(1.0, 0.0));
        assert_eq!(triangle[2].position, DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(triangle[2].vertex, 2);
    }

    #[test]
    fn test_out_of_range_index_passed_through() {
        let mut mesh = JsonScene::from_json(SCENE).unwrap().meshes.remove(0);
        mesh.triangles[0].indices = [0, 1, 9];

        let triangle = mesh.triangles().next().unwrap();
        assert_eq!(triangle[2].vertex, 9);
        assert!(triangle[2].weights.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(JsonScene::from_json("{ \"meshes\": 3 }").is_err());
    }
}
