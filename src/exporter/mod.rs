//! Export orchestration.
//!
//! Picks the meshes to export, runs each one through
//! [`build_vertex_mesh`] and the SMF/T serializer into a staging file, and
//! publishes the result only when the pass logged no errors.

mod build;

pub use build::build_vertex_mesh;

use crate::diagnostics::{Diagnostics, Severity};
use crate::error::{ExportError, Result};
use crate::export::{write_smft, ExportMetadata};
use crate::source::{MeshSource, SourceMesh};
use crate::types::{AxisConvention, CoordinateSystem, CoordinateTransform, WindingOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File extension of exported meshes.
pub const SMFT_EXTENSION: &str = "smft";

/// Which meshes an export run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Every mesh in the source.
    #[default]
    All,
    /// Every mesh the source reports as selected.
    Selected,
    /// Exactly one selected mesh; anything else is an error.
    Single,
}

/// Exporter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Which meshes to export.
    pub selection: Selection,
    /// Write debug messages to the per-mesh logs.
    pub verbose: bool,
    /// Axis convention of the exported data.
    pub axes: AxisConvention,
    /// Winding order of the exported triangles, declared in the header.
    pub winding: WindingOrder,
    /// Application name and version recorded in the metadata block.
    pub application: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            selection: Selection::All,
            verbose: true,
            axes: AxisConvention::default(),
            winding: WindingOrder::CounterClockwise,
            application: format!("smft-export {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ExportConfig {
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_axes(mut self, axes: AxisConvention) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_winding(mut self, winding: WindingOrder) -> Self {
        self.winding = winding;
        self
    }

    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }
}

/// Result of exporting a single mesh.
#[derive(Debug)]
pub enum MeshStatus {
    /// The output file was published.
    Published,
    /// Nothing was published; the log explains why.
    Failed(ExportError),
}

/// Per-mesh entry of an [`ExportReport`].
#[derive(Debug)]
pub struct MeshOutcome {
    /// Source mesh name.
    pub name: String,
    /// Final path of the exported file (only present if published).
    pub output: PathBuf,
    /// Path of the diagnostics log.
    pub log: PathBuf,
    /// Errors logged during the pass.
    pub errors: usize,
    pub status: MeshStatus,
}

impl MeshOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self.status, MeshStatus::Published)
    }
}

/// Outcome of an export run, one entry per mesh in discovery order.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<MeshOutcome>,
}

impl ExportReport {
    pub fn published_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_published()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.published_count()
    }

    pub fn all_published(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Output, staging and log paths for one mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshPaths {
    pub output: PathBuf,
    pub staging: PathBuf,
    pub log: PathBuf,
}

impl MeshPaths {
    pub fn new(dir: &Path, mesh_name: &str) -> Self {
        let stem = clean_name(mesh_name);
        Self {
            output: dir.join(format!("{}.{}", stem, SMFT_EXTENSION)),
            staging: dir.join(format!("{}.{}.tmp", stem, SMFT_EXTENSION)),
            log: dir.join(format!("{}.log", stem)),
        }
    }
}

/// Make a mesh name safe for use as a file name: ASCII alphanumerics, `-`
/// and `_` are kept, everything else becomes `_`.
pub fn clean_name(name: &str) -> String {
    if name.is_empty() {
        return "untitled".to_string();
    }
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The export driver.
pub struct Exporter {
    config: ExportConfig,
    transform: CoordinateTransform,
}

impl Exporter {
    /// Create an exporter, validating the configured axis convention.
    pub fn new(config: ExportConfig) -> Result<Self> {
        let transform = CoordinateTransform::new(config.axes)?;
        Ok(Self { config, transform })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// The coordinate system declared in every exported header. Derived from
    /// the same convention as the transform.
    pub fn coordinate_system(&self) -> CoordinateSystem {
        CoordinateSystem::new(self.transform.convention(), self.config.winding)
    }

    /// Export the selected meshes of `source` into `dir`.
    ///
    /// Selection and output-directory problems fail the whole run before
    /// anything is written. Per-mesh failures are recorded in the report and
    /// never stop the remaining meshes.
    pub fn write(&self, dir: &Path, source: &dyn MeshSource) -> Result<ExportReport> {
        let meshes = self.select(source)?;
        prepare_directory(dir)?;

        tracing::info!("Exporting {} meshes to {:?}", meshes.len(), dir);

        let mut report = ExportReport::default();
        let mut stems: HashMap<String, &str> = HashMap::new();
        for mesh in meshes {
            let shadowed = stems.insert(clean_name(mesh.name()), mesh.name());
            if let Some(previous) = shadowed {
                tracing::warn!(
                    "Mesh {} shares its file name with mesh {}; the earlier output and log are overwritten",
                    mesh.name(),
                    previous
                );
            }
            let outcome = self.export_mesh_over(dir, mesh, shadowed);
            match &outcome.status {
                MeshStatus::Published => {
                    tracing::info!("Exported {} -> {:?}", outcome.name, outcome.output)
                }
                MeshStatus::Failed(e) => {
                    tracing::warn!("Failed to export {}: {} (log: {:?})", outcome.name, e, outcome.log)
                }
            }
            report.outcomes.push(outcome);
        }
        Ok(report)
    }

    /// Apply the selection policy.
    pub fn select<'a>(&self, source: &'a dyn MeshSource) -> Result<Vec<&'a dyn SourceMesh>> {
        let meshes: Vec<_> = match self.config.selection {
            Selection::All => source.meshes().collect(),
            Selection::Selected | Selection::Single => {
                source.meshes().filter(|m| m.is_selected()).collect()
            }
        };

        if self.config.selection == Selection::Single {
            match meshes.len() {
                1 => {}
                0 => return Err(ExportError::Selection("No mesh selected".to_string())),
                n => {
                    return Err(ExportError::Selection(format!(
                        "{} meshes selected, exactly one is required",
                        n
                    )))
                }
            }
        }

        Ok(meshes)
    }

    /// Export one mesh: stage, check the error count, publish or discard.
    pub fn export_mesh(&self, dir: &Path, mesh: &dyn SourceMesh) -> MeshOutcome {
        self.export_mesh_over(dir, mesh, None)
    }

    /// `shadowed` names an earlier mesh of the run whose files this one
    /// replaces.
    fn export_mesh_over(
        &self,
        dir: &Path,
        mesh: &dyn SourceMesh,
        shadowed: Option<&str>,
    ) -> MeshOutcome {
        let paths = MeshPaths::new(dir, mesh.name());
        let (errors, status) = match self.export_staged(&paths, mesh, shadowed) {
            Ok(errors) => (errors, MeshStatus::Published),
            Err((errors, e)) => {
                discard(&paths.staging);
                (errors, MeshStatus::Failed(e))
            }
        };

        MeshOutcome {
            name: mesh.name().to_string(),
            output: paths.output,
            log: paths.log,
            errors,
            status,
        }
    }

    /// Returns the error count on success, or the error count and the cause
    /// on failure.
    fn export_staged(
        &self,
        paths: &MeshPaths,
        mesh: &dyn SourceMesh,
        shadowed: Option<&str>,
    ) -> std::result::Result<usize, (usize, ExportError)> {
        let mut log = Diagnostics::create(&paths.log, Severity::threshold(self.config.verbose))
            .map_err(|e| (0, e))?;

        log.info(format!("Export started at {}", chrono::Utc::now().to_rfc3339()));
        log.info(format!("File: {}", paths.output.display()));
        log.info(format!("Log:  {}", paths.log.display()));
        if let Some(previous) = shadowed {
            log.info(format!(
                "Overwriting the output of mesh {}, which has the same file name",
                previous
            ));
        }

        let result = self.write_staging(paths, mesh, &mut log);
        let errors = log.error_count();

        let outcome = match result {
            Ok(()) if errors == 0 => match fs::rename(&paths.staging, &paths.output) {
                Ok(()) => {
                    log.info("Exported successfully");
                    Ok(errors)
                }
                Err(e) => {
                    let e = ExportError::from(e);
                    log.error(format!("Publishing failed: {}", e));
                    Err((errors, e))
                }
            },
            Ok(()) => {
                log.error(format!("Export failed with {} errors.", errors));
                Err((
                    errors,
                    ExportError::SoftErrors {
                        count: errors,
                        log: paths.log.clone(),
                    },
                ))
            }
            Err(e) => {
                log.error(format!("Export failed: {}", e));
                Err((errors, e))
            }
        };

        if let Err(e) = log.flush() {
            tracing::warn!("failed to flush {:?}: {}", paths.log, e);
        }
        outcome
    }

    fn write_staging<W: Write>(
        &self,
        paths: &MeshPaths,
        mesh: &dyn SourceMesh,
        log: &mut Diagnostics<W>,
    ) -> Result<()> {
        log.debug(format!("opening: {}", paths.staging.display()));
        let mut out = BufWriter::new(File::create(&paths.staging)?);

        let vertex_mesh = build_vertex_mesh(mesh, &self.transform, self.config.winding, log)?;
        let metadata = ExportMetadata::new(self.config.application.clone());
        write_smft(&mut out, &vertex_mesh, &self.coordinate_system(), &metadata)?;
        out.flush()?;
        Ok(())
    }
}

/// Create the output directory if needed; refuse paths that exist and are
/// not directories.
fn prepare_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    } else if !dir.is_dir() {
        return Err(ExportError::InvalidOutputDirectory(dir.to_path_buf()));
    }
    Ok(())
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("failed to remove staging file {:?}: {}", path, e);
        }
    }
}
