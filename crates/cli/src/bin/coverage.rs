use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use drone_area_calculator::config::{
    CalibrationProfile, DEFAULT_PROFILE, builtin_profiles, find_profile, load_profiles,
};
use drone_area_calculator::estimation::{
    CoverageEstimationEngine, FlightInput, ModelKind, ModelOutcome, ShapeCatalog,
};
use drone_area_calculator::export::{self, Metadata};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Spray drone coverage calculator (area per tank load)"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate coverage with a single model
    Estimate {
        /// Coverage model
        #[arg(long, value_enum)]
        model: ModelArg,

        #[command(flatten)]
        flight: FlightArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run every model on the same inputs
    Compare {
        #[command(flatten)]
        flight: FlightArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the field-shape catalog
    Shapes,
    /// List available calibration profiles
    Profiles {
        /// Profile file (TOML or YAML) or directory of TOML profiles
        #[arg(long)]
        profiles: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FlightArgs {
    /// Ground speed in m/s
    #[arg(long, default_value_t = 5.0)]
    speed: f64,

    /// Effective swath width in m
    #[arg(long, default_value_t = 5.5)]
    swath: f64,

    /// Flow rate per minute (kg/min, or L/min for shape-geometry)
    #[arg(long, default_value_t = 3.0)]
    flow: f64,

    /// Tank load (kg, or L for shape-geometry)
    #[arg(long, default_value_t = 10.0)]
    tank: f64,

    /// Number of turns in the pattern (defaults to 10 when no shape is given)
    #[arg(long, allow_negative_numbers = true)]
    turns: Option<i64>,

    /// Field shape (square, rectangle, long-rectangle, trapezium, rhombus, skewed-rectangle, l-shape)
    #[arg(long)]
    shape: Option<String>,

    /// Calibration profile name
    #[arg(long, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Profile file (TOML or YAML) or directory of TOML profiles
    #[arg(long)]
    profiles: Option<PathBuf>,
}

impl FlightArgs {
    fn to_input(&self) -> FlightInput {
        let defaults = FlightInput::default();
        let turn_count = match (self.turns, &self.shape) {
            (Some(turns), _) => Some(turns),
            (None, None) => defaults.turn_count,
            (None, Some(_)) => None,
        };
        FlightInput {
            speed_mps: self.speed,
            swath_width_m: self.swath,
            flow_rate_per_min: self.flow,
            tank_capacity: self.tank,
            turn_count,
            shape: self.shape.clone(),
        }
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Output path (`-` for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum ModelArg {
    DensityCalibrated,
    FixedTurnLoss,
    ShapeGeometry,
}

impl From<ModelArg> for ModelKind {
    fn from(value: ModelArg) -> Self {
        match value {
            ModelArg::DensityCalibrated => ModelKind::DensityCalibrated,
            ModelArg::FixedTurnLoss => ModelKind::FixedTurnLoss,
            ModelArg::ShapeGeometry => ModelKind::ShapeGeometry,
        }
    }
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Format {
    Text,
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Estimate {
            model,
            flight,
            output,
        } => {
            let (profile, engine) = engine_for(&flight)?;
            let input = flight.to_input();
            let model = ModelKind::from(model);
            let result = engine.estimate(&input, model)?;
            write_report(&output, &profile, &input, &[(model, Ok(result))])
        }
        Command::Compare { flight, output } => {
            let (profile, engine) = engine_for(&flight)?;
            let input = flight.to_input();
            let outcomes = engine.compare(&input)?;
            write_report(&output, &profile, &input, &outcomes)
        }
        Command::Shapes => {
            print_shapes(&ShapeCatalog::builtin());
            Ok(())
        }
        Command::Profiles { profiles } => {
            for profile in available_profiles(profiles.as_ref())? {
                println!(
                    "{:<18} c = {:<6} {}",
                    profile.name,
                    profile.constants.geometry.shape_factor_coefficient,
                    profile.description
                );
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Profiles loaded from disk shadow built-ins of the same name.
fn available_profiles(path: Option<&PathBuf>) -> anyhow::Result<Vec<CalibrationProfile>> {
    let mut profiles = match path {
        Some(path) => load_profiles(path)
            .with_context(|| format!("loading profiles from {}", path.display()))?,
        None => Vec::new(),
    };
    for builtin in builtin_profiles() {
        let shadowed = profiles
            .iter()
            .any(|p| p.name.to_uppercase() == builtin.name.to_uppercase());
        if !shadowed {
            profiles.push(builtin);
        }
    }
    Ok(profiles)
}

fn engine_for(flight: &FlightArgs) -> anyhow::Result<(String, CoverageEstimationEngine)> {
    let profiles = available_profiles(flight.profiles.as_ref())?;
    let profile = find_profile(&profiles, &flight.profile)?;
    let engine = CoverageEstimationEngine::with_profile(&profile)?;
    tracing::debug!(profile = %profile.name, "calibration profile selected");
    Ok((profile.name, engine))
}

fn write_report(
    output: &OutputArgs,
    profile: &str,
    input: &FlightInput,
    outcomes: &[ModelOutcome],
) -> anyhow::Result<()> {
    let mut writer = export::writer_for_path(&output.output)
        .with_context(|| format!("opening {}", output.output.display()))?;
    let meta = Metadata { profile, input };
    match output.format {
        Format::Text => export::table::write_results(writer.as_mut(), &meta, outcomes)?,
        Format::Csv => export::csv::write_results(writer.as_mut(), outcomes)?,
        Format::Json => export::json::write_results(writer.as_mut(), &meta, outcomes)?,
    }
    writer.flush()?;
    Ok(())
}

fn print_shapes(catalog: &ShapeCatalog) {
    println!("{:<18} {:>6} {:>13}", "shape", "turns", "shape factor");
    for entry in catalog.entries() {
        println!(
            "{:<18} {:>6} {:>13}",
            entry.shape.as_str(),
            entry
                .turn_count
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            entry
                .shape_factor
                .map(|f| format!("{f:.2}"))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
}
