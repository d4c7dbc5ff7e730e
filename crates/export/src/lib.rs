//! Export helpers for coverage reports: aligned text tables, CSV, and JSON.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use drone_estimation::FlightInput;

pub use drone_estimation::ModelOutcome;

/// Context printed alongside the results.
#[derive(Debug, Clone, Copy)]
pub struct Metadata<'a> {
    pub profile: &'a str,
    pub input: &'a FlightInput,
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod table {
    use std::io::{self, Write};

    use super::{Metadata, ModelOutcome};

    /// Write a human-readable table, one row per model.
    pub fn write_results(
        writer: &mut dyn Write,
        meta: &Metadata<'_>,
        outcomes: &[ModelOutcome],
    ) -> io::Result<()> {
        let input = meta.input;
        writeln!(writer, "=== Coverage Estimate ===")?;
        writeln!(writer, "Profile : {}", meta.profile)?;
        writeln!(
            writer,
            "Inputs  : speed {:.2} m/s, swath {:.2} m, flow {:.3}/min, tank {:.2}, turns {}, shape {}",
            input.speed_mps,
            input.swath_width_m,
            input.flow_rate_per_min,
            input.tank_capacity,
            input
                .turn_count
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            input.shape.as_deref().unwrap_or("-"),
        )?;
        writeln!(
            writer,
            "{:<20} {:>13} {:>14} {:>10} {:>6}",
            "model", "ideal (acre)", "actual (acre)", "efficiency", "turns"
        )?;
        for (model, outcome) in outcomes {
            match outcome {
                Ok(result) => writeln!(
                    writer,
                    "{:<20} {:>13.4} {:>14.4} {:>10.4} {:>6}",
                    model.as_str(),
                    result.ideal_area_acre,
                    result.actual_area_acre,
                    result.efficiency,
                    result
                        .turn_count
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                )?,
                Err(err) => writeln!(writer, "{:<20} n/a: {}", model.as_str(), err)?,
            }
        }
        Ok(())
    }
}

pub mod csv {
    use std::io::{self, Write};

    use super::ModelOutcome;

    const HEADER: [&str; 6] = [
        "model",
        "ideal_area_acre",
        "actual_area_acre",
        "efficiency",
        "turn_count",
        "status",
    ];

    /// Write the header plus one row per model; failed models leave the numeric columns empty.
    pub fn write_results(writer: &mut dyn Write, outcomes: &[ModelOutcome]) -> io::Result<()> {
        let mut csv = ::csv::Writer::from_writer(writer);
        csv.write_record(HEADER)?;
        for (model, outcome) in outcomes {
            let record = match outcome {
                Ok(result) => [
                    model.as_str().to_string(),
                    format!("{:.6}", result.ideal_area_acre),
                    format!("{:.6}", result.actual_area_acre),
                    format!("{:.6}", result.efficiency),
                    result
                        .turn_count
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                    "ok".to_string(),
                ],
                Err(err) => [
                    model.as_str().to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    err.to_string(),
                ],
            };
            csv.write_record(&record)?;
        }
        csv.flush()
    }
}

pub mod json {
    use std::io::{self, Write};

    use drone_estimation::{EstimationError, EstimationResult, FlightInput, ModelKind};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::{Metadata, ModelOutcome};

    #[derive(Serialize)]
    struct Report<'a> {
        profile: &'a str,
        input: &'a FlightInput,
        results: Vec<Entry<'a>>,
    }

    #[derive(Serialize)]
    struct Entry<'a> {
        model: ModelKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<&'a EstimationResult>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<&'a EstimationError>,
    }

    /// Write a pretty-printed JSON report.
    pub fn write_results(
        writer: &mut dyn Write,
        meta: &Metadata<'_>,
        outcomes: &[ModelOutcome],
    ) -> io::Result<()> {
        let report = Report {
            profile: meta.profile,
            input: meta.input,
            results: outcomes
                .iter()
                .map(|(model, outcome)| Entry {
                    model: *model,
                    result: outcome.as_ref().ok(),
                    error: outcome.as_ref().err(),
                })
                .collect(),
        };
        to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)
    }
}
