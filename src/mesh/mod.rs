//! Attribute-consistent vertex/triangle buffers.
//!
//! [`VertexMesh`] turns per-corner vertex data into a flat vertex buffer.
//! A geometric vertex that shows up with different attribute values in
//! different faces (a UV seam, for instance) is split into several
//! canonical vertices.

pub mod schema;

pub use schema::{Attribute, AttributeSchema, COMPONENT_BITS};

use crate::error::{ExportError, Result};
use crate::types::{Triangle, Vertex};

/// Index width declared for triangles. Declared, not derived from the
/// triangle count.
pub const TRIANGLE_INDEX_BITS: u32 = 32;

/// Vertex and triangle buffers built during one export pass.
#[derive(Debug, Clone, Default)]
pub struct VertexMesh {
    vertices: Vec<Option<Vertex>>,
    triangles: Vec<Triangle>,
    schema: Option<AttributeSchema>,
    capacity: usize,
}

impl VertexMesh {
    /// Create a mesh with `capacity` unassigned slots, one per geometric
    /// vertex of the source mesh.
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: vec![None; capacity],
            triangles: Vec::new(),
            schema: None,
            capacity,
        }
    }

    /// Add the vertex seen at geometric slot `slot` and return its
    /// canonical index.
    ///
    /// The first vertex fixes the mesh's [`AttributeSchema`]. A vertex equal
    /// to the slot's first occupant reuses the slot; any other value is
    /// appended as a new vertex. Earlier splits of the same slot are not
    /// searched, so repeated deviations each create their own vertex.
    pub fn add_vertex(&mut self, slot: usize, vertex: Vertex) -> Result<u32> {
        if slot >= self.capacity {
            return Err(ExportError::SlotOutOfRange {
                slot,
                capacity: self.capacity,
            });
        }

        match &self.schema {
            Some(schema) if !schema.matches(&vertex) => {
                return Err(ExportError::AttributeSchemaMismatch {
                    expected: schema.to_string(),
                    found: AttributeSchema::of(&vertex).to_string(),
                });
            }
            Some(_) => {}
            None => self.schema = Some(AttributeSchema::of(&vertex)),
        }

        match &self.vertices[slot] {
            None => {
                let index = to_index(slot)?;
                self.vertices[slot] = Some(vertex);
                Ok(index)
            }
            Some(existing) if *existing == vertex => to_index(slot),
            Some(_) => {
                let index = to_index(self.vertices.len())?;
                tracing::trace!("vertex slot {} split into {}", slot, index);
                self.vertices.push(Some(vertex));
                Ok(index)
            }
        }
    }

    /// Add a triangle by canonical vertex indices.
    ///
    /// Degenerate triangles are accepted as-is.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) -> Result<()> {
        let assigned = |i: u32| matches!(self.vertices.get(i as usize), Some(Some(_)));
        if !(assigned(v0) && assigned(v1) && assigned(v2)) {
            return Err(ExportError::InvalidTriangle(v0, v1, v2));
        }
        self.triangles.push(Triangle::new(v0, v1, v2));
        Ok(())
    }

    /// The schema fixed by the first vertex, if any vertex was added.
    pub fn schema(&self) -> Option<&AttributeSchema> {
        self.schema.as_ref()
    }

    /// Number of vertices, including split vertices and unassigned slots.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of vertices created by splitting.
    pub fn split_count(&self) -> usize {
        self.vertices.len() - self.capacity
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get the vertex at a canonical index, if assigned.
    pub fn vertex(&self, index: u32) -> Option<&Vertex> {
        self.vertices.get(index as usize).and_then(Option::as_ref)
    }

    /// All vertices in index order. Fails on the first slot that was never
    /// assigned.
    pub fn vertices(&self) -> Result<Vec<&Vertex>> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| v.as_ref().ok_or(ExportError::UnassignedVertex(i)))
            .collect()
    }

    /// Triangles in insertion order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

fn to_index(i: usize) -> Result<u32> {
    u32::try_from(i).map_err(|_| ExportError::IndexOverflow(i))
}
