//! Error types for the SMF/T exporter.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Main error type for mesh export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON scene data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The mesh selection does not satisfy the configured selection policy.
    #[error("Selection error: {0}")]
    Selection(String),

    /// The output path exists and is not a directory.
    #[error("Not a directory: {}", .0.display())]
    InvalidOutputDirectory(PathBuf),

    /// Invalid exporter configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A vertex carried a different set of UV layers or groups than the
    /// first vertex of the mesh.
    #[error("Attribute schema mismatch: expected {expected}, found {found}")]
    AttributeSchemaMismatch { expected: String, found: String },

    /// A vertex was inserted into a slot beyond the declared capacity.
    #[error("Vertex slot {slot} out of range (capacity {capacity})")]
    SlotOutOfRange { slot: usize, capacity: usize },

    /// A triangle referenced a vertex that has not been added.
    #[error("Triangle ({0}, {1}, {2}) references an unassigned vertex")]
    InvalidTriangle(u32, u32, u32),

    /// The vertex buffer outgrew the 32-bit index width.
    #[error("Vertex count {0} exceeds the 32-bit index width")]
    IndexOverflow(usize),

    /// A geometric vertex was never referenced by any triangle.
    #[error("Vertex slot {0} was never assigned")]
    UnassignedVertex(usize),

    /// Error-severity diagnostics were logged during the pass.
    #[error("Exporting failed due to {count} errors. See the log file at: {}", .log.display())]
    SoftErrors { count: usize, log: PathBuf },
}

impl ExportError {
    /// Whether this error only invalidates the mesh being exported, as opposed
    /// to the whole export run.
    pub fn is_mesh_local(&self) -> bool {
        !matches!(
            self,
            ExportError::Selection(_)
                | ExportError::InvalidOutputDirectory(_)
                | ExportError::Config(_)
                | ExportError::Json(_)
        )
    }
}
