//! SMF/T text export.
//!
//! SMF/T is a line-based text format. The header declares attributes,
//! counts and the coordinate system; the body holds non-interleaved vertex
//! data, triangles and a base64 metadata block. Every section is closed by
//! an `end` line.

use super::metadata::{
    ExportMetadata, METADATA_SCHEMA_ID, METADATA_SCHEMA_MAJOR, METADATA_SCHEMA_MINOR,
};
use crate::error::Result;
use crate::mesh::{Attribute, VertexMesh, COMPONENT_BITS, TRIANGLE_INDEX_BITS};
use crate::types::{CoordinateSystem, Vertex};
use std::io::Write;

/// Major version of the emitted format.
pub const SMF_VERSION_MAJOR: u32 = 1;
/// Minor version of the emitted format.
pub const SMF_VERSION_MINOR: u32 = 0;

/// Export a mesh to SMF/T text.
pub fn export_smft(
    mesh: &VertexMesh,
    coordinates: &CoordinateSystem,
    metadata: &ExportMetadata,
) -> Result<String> {
    // ~60 bytes per attribute line per vertex, ~24 per triangle
    let attribute_count = mesh.schema().map_or(2, |s| s.attributes().len());
    let capacity = 512 + mesh.vertex_count() * attribute_count * 60 + mesh.triangle_count() * 24;
    let mut out = Vec::with_capacity(capacity);
    write_smft(&mut out, mesh, coordinates, metadata)?;
    let text = String::from_utf8(out)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(text)
}

/// Write a mesh as SMF/T to `out`.
///
/// Nothing is written if the mesh still has unassigned vertex slots.
pub fn write_smft<W: Write>(
    out: &mut W,
    mesh: &VertexMesh,
    coordinates: &CoordinateSystem,
    metadata: &ExportMetadata,
) -> Result<()> {
    let vertices = mesh.vertices()?;
    let attributes = mesh
        .schema()
        .map(|schema| schema.attributes())
        .unwrap_or_else(|| vec![Attribute::Position, Attribute::Normal]);

    // Header
    writeln!(out, "smf {} {}", SMF_VERSION_MAJOR, SMF_VERSION_MINOR)?;
    for attribute in &attributes {
        writeln!(
            out,
            "attribute \"{}\" float {} {}",
            attribute.name(),
            attribute.component_count(),
            COMPONENT_BITS
        )?;
    }
    writeln!(out, "vertices {}", vertices.len())?;
    writeln!(
        out,
        "triangles {} {}",
        mesh.triangle_count(),
        TRIANGLE_INDEX_BITS
    )?;
    writeln!(out, "coordinates {}", coordinates)?;
    writeln!(out, "end")?;

    // Vertex data, one attribute at a time
    writeln!(out, "vertices-noninterleaved")?;
    for attribute in &attributes {
        writeln!(out, "attribute \"{}\"", attribute.name())?;
        for vertex in &vertices {
            write_values(out, attribute, vertex)?;
        }
    }
    writeln!(out, "end")?;

    writeln!(out, "triangles")?;
    for triangle in mesh.triangles() {
        writeln!(out, "{} {} {}", triangle.v0, triangle.v1, triangle.v2)?;
    }
    writeln!(out, "end")?;

    // The last field is the number of base64 lines that follow.
    writeln!(
        out,
        "metadata {} {} {} 1",
        METADATA_SCHEMA_ID, METADATA_SCHEMA_MAJOR, METADATA_SCHEMA_MINOR
    )?;
    writeln!(out, "{}", metadata.encode())?;
    writeln!(out, "end")?;

    Ok(())
}

fn write_values<W: Write>(out: &mut W, attribute: &Attribute, vertex: &Vertex) -> Result<()> {
    match attribute {
        Attribute::Position => {
            let p = vertex.position;
            writeln!(out, "{:.15} {:.15} {:.15}", p.x, p.y, p.z)?;
        }
        Attribute::Normal => {
            let n = vertex.normal;
            writeln!(out, "{:.15} {:.15} {:.15}", n.x, n.y, n.z)?;
        }
        Attribute::Uv(layer) => {
            let uv = vertex.uv.get(layer).copied().unwrap_or_default();
            writeln!(out, "{:.15} {:.15}", uv.x, uv.y)?;
        }
        Attribute::Group(group) => {
            let weight = vertex.weights.get(group).copied().unwrap_or_default();
            writeln!(out, "{:.15}", weight)?;
        }
    }
    Ok(())
}
