//! Mesh export formats.
//!
//! SMF/T is the only format written; [`metadata`] builds the application
//! record embedded in every file.

pub mod metadata;
pub mod smft;

pub use metadata::ExportMetadata;
pub use smft::{export_smft, write_smft};
