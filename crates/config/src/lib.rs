//! Calibration profiles and loaders for the Drone Area Calculator.
//!
//! Every constant the coverage models use lives here so that alternative
//! calibrations can be selected by name instead of being edited in code.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the built-in profile used when none is requested.
pub const DEFAULT_PROFILE: &str = "default";
/// Name of the built-in profile with the gentler shape-factor coefficient.
pub const LOW_SENSITIVITY_PROFILE: &str = "low-sensitivity";

/// Constants of the density-calibrated model.
///
/// The reference density comes from a field trial flown at 5 m/s with a
/// 5.5 m swath dispensing 3 kg/min.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DensityConstants {
    /// Quadratic turn penalty per turn at the reference speed.
    pub k1: f64,
    /// Weight of the relative density mismatch.
    pub k2: f64,
    pub reference_flow: f64,
    pub reference_speed_mps: f64,
    pub reference_swath_m: f64,
    /// Upper clamp on the efficiency factor.
    pub max_efficiency: f64,
}

impl Default for DensityConstants {
    fn default() -> Self {
        Self {
            k1: 0.0045,
            k2: 0.35,
            reference_flow: 3.0,
            reference_speed_mps: 5.0,
            reference_swath_m: 5.5,
            max_efficiency: 1.2,
        }
    }
}

impl DensityConstants {
    /// Application density of the reference trial (flow per m² swept per second).
    pub fn density_ref(&self) -> f64 {
        self.reference_flow / (self.reference_speed_mps * self.reference_swath_m)
    }
}

/// Constants of the fixed per-turn loss model.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TurnLossConstants {
    /// Fraction of coverage lost at every turn.
    pub turn_loss_fraction: f64,
}

impl Default for TurnLossConstants {
    fn default() -> Self {
        Self {
            turn_loss_fraction: 0.02,
        }
    }
}

/// Constants of the shape-geometry model.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeometryConstants {
    /// Growth of the shape factor per turn above `reference_turn_count`.
    pub shape_factor_coefficient: f64,
    pub turn_radius_m: f64,
    pub turn_speed_mps: f64,
    pub reference_turn_count: u32,
}

impl Default for GeometryConstants {
    fn default() -> Self {
        Self {
            shape_factor_coefficient: 0.02,
            turn_radius_m: 5.0,
            turn_speed_mps: 3.0,
            reference_turn_count: 10,
        }
    }
}

/// Full set of model constants.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ModelConstants {
    pub density: DensityConstants,
    pub turn_loss: TurnLossConstants,
    pub geometry: GeometryConstants,
}

impl ModelConstants {
    /// Check every constant against its admissible range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let density = &self.density;
        let geometry = &self.geometry;
        let invalid = |field: &'static str| ConfigError::InvalidConstant { field };

        let non_negative = [("density.k1", density.k1), ("density.k2", density.k2)];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field));
            }
        }

        let positive = [
            ("density.reference_flow", density.reference_flow),
            ("density.reference_speed_mps", density.reference_speed_mps),
            ("density.reference_swath_m", density.reference_swath_m),
            ("density.max_efficiency", density.max_efficiency),
            ("geometry.turn_radius_m", geometry.turn_radius_m),
            ("geometry.turn_speed_mps", geometry.turn_speed_mps),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field));
            }
        }

        let loss = self.turn_loss.turn_loss_fraction;
        if !loss.is_finite() || !(0.0..1.0).contains(&loss) {
            return Err(invalid("turn_loss.turn_loss_fraction"));
        }

        // Keeps 1 + c * (turns - reference) positive for every non-negative turn count.
        let c = geometry.shape_factor_coefficient;
        let ceiling = if geometry.reference_turn_count == 0 {
            f64::INFINITY
        } else {
            1.0 / f64::from(geometry.reference_turn_count)
        };
        if !c.is_finite() || c < 0.0 || c >= ceiling {
            return Err(invalid("geometry.shape_factor_coefficient"));
        }

        Ok(())
    }
}

/// Named calibration profile parsed from profile manifests.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CalibrationProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub constants: ModelConstants,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROFILE.to_string(),
            description: "Shape-factor coefficient 0.02 per turn above ten".to_string(),
            constants: ModelConstants::default(),
        }
    }
}

impl CalibrationProfile {
    /// Profile with the 0.015 shape-factor coefficient; every other constant is the default.
    pub fn low_sensitivity() -> Self {
        let mut constants = ModelConstants::default();
        constants.geometry.shape_factor_coefficient = 0.015;
        Self {
            name: LOW_SENSITIVITY_PROFILE.to_string(),
            description: "Shape-factor coefficient 0.015 per turn above ten".to_string(),
            constants,
        }
    }

    /// Check every constant against its admissible range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.constants.validate().map_err(|err| match err {
            ConfigError::InvalidConstant { field } => ConfigError::Invalid {
                profile: self.name.clone(),
                field,
            },
            other => other,
        })
    }
}

/// Errors that can occur while loading calibration profiles.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("profile '{profile}' has an out-of-range value for {field}")]
    Invalid {
        profile: String,
        field: &'static str,
    },
    #[error("model constant {field} is out of range")]
    InvalidConstant { field: &'static str },
    #[error("calibration profile '{0}' not found")]
    UnknownProfile(String),
}

/// The profiles compiled into the binary.
pub fn builtin_profiles() -> Vec<CalibrationProfile> {
    vec![
        CalibrationProfile::default(),
        CalibrationProfile::low_sensitivity(),
    ]
}

/// Load and validate calibration profiles from a TOML file, a directory of TOML files, or a YAML list.
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<CalibrationProfile>, ConfigError> {
    let path = path.as_ref();
    let profiles: Vec<CalibrationProfile> = load_records(path)?;
    for profile in &profiles {
        profile.validate()?;
    }
    tracing::debug!(
        path = %path.display(),
        count = profiles.len(),
        "loaded calibration profiles"
    );
    Ok(profiles)
}

/// Select a profile by case-insensitive name.
pub fn find_profile(
    profiles: &[CalibrationProfile],
    name: &str,
) -> Result<CalibrationProfile, ConfigError> {
    let upper = name.to_uppercase();
    profiles
        .iter()
        .find(|p| p.name.to_uppercase() == upper)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
