//! SMF/T Export CLI
//!
//! Export meshes from a JSON scene file to SMF/T.

use clap::{Parser, Subcommand, ValueEnum};
use smft_export::{
    AxisConvention, ExportConfig, Exporter, JsonScene, MeshSource, MeshStatus, Selection,
    SignedAxis,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smft-export")]
#[command(author, version, about = "Export meshes to the SMF/T text mesh format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export meshes from a JSON scene file
    Export {
        /// Input JSON scene file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Which meshes to export
        #[arg(short, long, value_enum, default_value = "all")]
        selection: SelectionArg,

        /// Only write info and error messages to the per-mesh logs
        #[arg(short, long)]
        quiet: bool,

        /// Forward axis of the exported data (e.g., "-z")
        #[arg(long, value_parser = parse_axis, allow_hyphen_values = true, default_value = "-z")]
        forward: SignedAxis,

        /// Up axis of the exported data (e.g., "+y")
        #[arg(long, value_parser = parse_axis, allow_hyphen_values = true, default_value = "+y")]
        up: SignedAxis,

        /// Application name and version recorded in the metadata
        #[arg(long)]
        application: Option<String>,
    },

    /// Show the meshes in a JSON scene file
    Info {
        /// Input JSON scene file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SelectionArg {
    /// Every mesh in the scene
    All,
    /// Every selected mesh
    Selected,
    /// Exactly one selected mesh
    Single,
}

impl From<SelectionArg> for Selection {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::All => Selection::All,
            SelectionArg::Selected => Selection::Selected,
            SelectionArg::Single => Selection::Single,
        }
    }
}

fn parse_axis(s: &str) -> Result<SignedAxis, String> {
    SignedAxis::from_str(s)
        .ok_or_else(|| format!("Invalid axis: '{}'. Use x, y or z with an optional sign", s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            selection,
            quiet,
            forward,
            up,
            application,
        } => {
            let mut config = ExportConfig::default()
                .with_selection(selection.into())
                .with_verbose(!quiet)
                .with_axes(AxisConvention::new(forward, up)?);
            if let Some(application) = application {
                config = config.with_application(application);
            }
            export_scene(&input, &output, config)?;
        }
        Commands::Info { input } => {
            show_scene_info(&input)?;
        }
    }

    Ok(())
}

fn export_scene(
    input_path: &PathBuf,
    output_dir: &PathBuf,
    config: ExportConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", input_path);
    let scene = JsonScene::from_path(input_path)?;
    println!("  Found {} meshes", scene.meshes.len());

    let exporter = Exporter::new(config)?;
    println!("Exporting with coordinates: {}", exporter.coordinate_system());

    let report = exporter.write(output_dir, &scene)?;

    for outcome in &report.outcomes {
        match &outcome.status {
            MeshStatus::Published => println!("  {} -> {:?}", outcome.name, outcome.output),
            MeshStatus::Failed(e) => println!("  {} FAILED: {}", outcome.name, e),
        }
    }

    println!(
        "Exported {} meshes, {} failed",
        report.published_count(),
        report.failed_count()
    );

    if !report.all_published() {
        return Err(format!("{} meshes failed to export", report.failed_count()).into());
    }

    Ok(())
}

fn show_scene_info(input_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", input_path);
    let scene = JsonScene::from_path(input_path)?;

    println!("\nScene Info:");
    for mesh in scene.meshes() {
        println!(
            "  {}{}: {} vertices, {} triangles",
            mesh.name(),
            if mesh.is_selected() { " (selected)" } else { "" },
            mesh.vertex_count(),
            mesh.triangles().count()
        );
    }

    Ok(())
}
