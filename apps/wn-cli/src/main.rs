use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use wn_geo::{UtmZone, projection_for};
use wn_graph::{NetworkGraph, ValidationReport, validate};
use wn_inp::write_inp;
use wn_model::Project;
use wn_results::network_geojson;

#[derive(Parser)]
#[command(name = "wn-cli")]
#[command(about = "Waternet CLI - water distribution network modeling tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project's network topology
    Validate {
        /// Path to the project file (JSON or YAML)
        project_path: PathBuf,
    },
    /// Export solver input (INP) text
    ExportInp {
        /// Path to the project file (JSON or YAML)
        project_path: PathBuf,
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the network as a GeoJSON FeatureCollection
    ExportGeojson {
        /// Path to the project file (JSON or YAML)
        project_path: PathBuf,
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Derive the UTM zone and EPSG code for a coordinate
    Zone {
        /// Longitude in degrees
        lon: f64,
        /// Latitude in degrees
        lat: f64,
    },
}

type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Project error: {0}")]
    Model(#[from] wn_model::ModelError),

    #[error("Export error: {0}")]
    Inp(#[from] wn_inp::InpError),

    #[error("Geo error: {0}")]
    Geo(#[from] wn_geo::GeoError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::ExportInp {
            project_path,
            output,
        } => cmd_export_inp(&project_path, output.as_deref()),
        Commands::ExportGeojson {
            project_path,
            output,
        } => cmd_export_geojson(&project_path, output.as_deref()),
        Commands::Zone { lon, lat } => cmd_zone(lon, lat),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_project(path: &Path) -> CliResult<Project> {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let project = match by_extension.as_deref() {
        Some("yaml") | Some("yml") => wn_model::load_yaml(path)?,
        _ => wn_model::load_json(path)?,
    };
    Ok(project)
}

fn validate_loaded(project: &Project) -> (NetworkGraph, ValidationReport) {
    let graph = NetworkGraph::from_features(&project.features);
    let report = validate(
        &graph,
        &project.patterns,
        &project.curves,
        &project.controls,
    );
    (graph, report)
}

fn cmd_validate(project_path: &Path) -> CliResult<ExitCode> {
    let project = load_project(project_path)?;
    let (graph, report) = validate_loaded(&project);

    println!(
        "Network: {} nodes, {} links",
        graph.nodes().len(),
        graph.links().len()
    );

    for finding in &report.errors {
        println!("error: {finding}");
    }
    for finding in &report.warnings {
        println!("warning: {finding}");
    }

    if report.is_valid() {
        println!(
            "Valid ({} warning{})",
            report.warnings.len(),
            if report.warnings.len() == 1 { "" } else { "s" }
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "Invalid: {} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_export_inp(project_path: &Path, output: Option<&Path>) -> CliResult<ExitCode> {
    let project = load_project(project_path)?;
    let (graph, report) = validate_loaded(&project);

    // Warnings don't block an export, but the user should see them
    for finding in &report.warnings {
        tracing::warn!("{finding}");
    }

    let text = write_inp(
        &graph,
        &project.settings,
        &project.patterns,
        &project.curves,
        &project.controls,
    )?;
    emit(output, &text)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_export_geojson(project_path: &Path, output: Option<&Path>) -> CliResult<ExitCode> {
    let project = load_project(project_path)?;
    let graph = NetworkGraph::from_features(&project.features);
    let projection = projection_for(&project.settings.projection)?;

    let text = network_geojson(&graph, projection.as_ref());
    emit(output, &text)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_zone(lon: f64, lat: f64) -> CliResult<ExitCode> {
    let zone = UtmZone::from_lon_lat(lon, lat)?;
    println!("Zone:  {zone}");
    println!("EPSG:  {}", zone.epsg_code());
    println!("Proj:  {}", zone.proj_definition());
    Ok(ExitCode::SUCCESS)
}

fn emit(output: Option<&Path>, text: &str) -> CliResult<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            io::stdout().write_all(text.as_bytes())?;
        }
    }
    Ok(())
}
