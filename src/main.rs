//! lightexport CLI
//!
//! Exports JSON scene descriptions to per-frame documents and OBJ meshes.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use lightexport_core::logging::{init_with_config, TracingConfig};
use lightexport_core::FrameRange;
use lightexport_export::{
    classify_object, ExportDriver, ExportOptions, ObjMeshExporter, TracingConsole,
};
use lightexport_scene::{MemoryScene, ObjectKind, SceneContext};

/// lightexport - scene exporter for the Light path tracer
#[derive(Parser)]
#[command(name = "lightexport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Export every frame of the animation range
    Export(ExportArgs),

    /// Export a single frame and print its document
    Frame(FrameArgs),

    /// List visible objects and their classified materials
    Inspect(InspectArgs),
}

/// Options shared by the exporting commands
#[derive(Args)]
struct OutputArgs {
    /// Path to the JSON scene description
    #[arg(short, long)]
    scene: PathBuf,

    /// JSON export configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides the configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    output: OutputArgs,

    /// First frame to export (defaults to the scene's range)
    #[arg(long, requires = "end")]
    start: Option<i32>,

    /// Last frame to export, inclusive
    #[arg(long, requires = "start")]
    end: Option<i32>,
}

#[derive(Args)]
struct FrameArgs {
    #[command(flatten)]
    output: OutputArgs,

    /// Frame to export; the scene's current state when omitted
    #[arg(short, long)]
    frame: Option<i32>,
}

#[derive(Args)]
struct InspectArgs {
    /// Path to the JSON scene description
    #[arg(short, long)]
    scene: PathBuf,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

fn setup_logging(verbosity: u8) {
    init_with_config(TracingConfig::from_verbosity(verbosity));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Export(args) => cmd_export(args),
        Commands::Frame(args) => cmd_frame(args),
        Commands::Inspect(args) => cmd_inspect(args),
    }
}

fn load_scene(path: &Path) -> Result<MemoryScene> {
    MemoryScene::from_json_file(path)
        .with_context(|| format!("Failed to load scene {}", path.display()))
}

fn load_options(args: &OutputArgs) -> Result<ExportOptions> {
    let mut options = match &args.config {
        Some(path) => ExportOptions::from_json_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ExportOptions::default(),
    };
    if let Some(dir) = &args.output_dir {
        options.output_dir = dir.clone();
    }
    debug!(?options, "Export options");
    Ok(options)
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let mut scene = load_scene(&args.output.scene)?;
    let mut options = load_options(&args.output)?;

    if let (Some(start), Some(end)) = (args.start, args.end) {
        options.frame_range = Some(FrameRange::new(start, end).context("Invalid frame range")?);
    }

    let mut driver = ExportDriver::new(options, ObjMeshExporter::new(), TracingConsole)
        .context("Invalid export options")?;

    let range = driver.frame_range(&scene)?;
    info!("Exporting {} frames ({})", range.len(), range);

    let documents = driver
        .export_animation(&mut scene)
        .context("Export failed")?;

    for document in &documents {
        println!("{}", driver.options().document_path(document.frame).display());
    }
    println!(
        "Exported {} frames, {} mesh files",
        documents.len(),
        driver.serializer().mesh_exporter().files_written()
    );

    Ok(())
}

fn cmd_frame(args: FrameArgs) -> Result<()> {
    let mut scene = load_scene(&args.output.scene)?;
    let options = load_options(&args.output)?;

    let mut driver = ExportDriver::new(options, ObjMeshExporter::new(), TracingConsole)
        .context("Invalid export options")?;

    let document = driver
        .export_frame(&mut scene, args.frame)
        .with_context(|| match args.frame {
            Some(frame) => format!("Failed to export frame {frame}"),
            None => "Failed to export the current scene state".to_string(),
        })?;

    info!(
        "Wrote {}",
        driver.options().document_path(args.frame).display()
    );
    print!("{document}");

    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> Result<()> {
    let scene = load_scene(&args.scene)?;

    let ids = scene.visible_ids();
    if ids.is_empty() {
        bail!("Scene {} has no visible objects", args.scene.display());
    }

    match args.format {
        OutputFormat::Json => {
            let objects: Vec<_> = ids
                .iter()
                .filter_map(|id| scene.object(*id))
                .map(|object| -> Result<serde_json::Value, serde_json::Error> {
                    let materials = match object.kind {
                        ObjectKind::Mesh => match classify_object(object) {
                            Ok(records) => serde_json::to_value(records)?,
                            Err(err) => serde_json::json!({ "error": err.to_string() }),
                        },
                        _ => serde_json::Value::Null,
                    };
                    Ok(serde_json::json!({
                        "name": object.name,
                        "kind": object.kind,
                        "location": object.location().to_array(),
                        "materials": materials,
                    }))
                })
                .collect::<Result<_, serde_json::Error>>()?;

            let json = serde_json::json!({
                "scene": scene.name,
                "frame_range": scene.frame_range(),
                "resolution": scene.resolution(),
                "objects": objects,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("Scene: {}", scene.name);
            println!("Frames: {}", scene.frame_range());
            println!("Resolution: {}", scene.resolution());
            println!();

            for object in ids.iter().filter_map(|id| scene.object(*id)) {
                println!("{:<24} {}", object.name, object.kind);
                if object.kind != ObjectKind::Mesh {
                    continue;
                }
                match classify_object(object) {
                    Ok(records) => {
                        for record in records {
                            println!("    {}", record.type_name());
                        }
                    }
                    Err(err) => println!("    error: {err}"),
                }
            }
        }
    }

    Ok(())
}
