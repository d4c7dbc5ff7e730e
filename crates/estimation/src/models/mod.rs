//! Coverage models sharing one interface.
//!
//! Each model turns validated [`FlightParameters`] into an [`EstimationResult`]:
//! the ideal area a tank load covers with no losses, the derated real area,
//! and the efficiency factor linking them.

pub mod density;
pub mod geometry;
pub mod turn_loss;

use std::str::FromStr;

use serde::Serialize;

use crate::error::{EstimationError, UnknownModelError};
use crate::params::FlightParameters;

pub use density::DensityCalibratedModel;
pub use geometry::ShapeGeometryModel;
pub use turn_loss::FixedTurnLossModel;

/// Identifier of a coverage model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    DensityCalibrated,
    FixedTurnLoss,
    ShapeGeometry,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::DensityCalibrated,
        ModelKind::FixedTurnLoss,
        ModelKind::ShapeGeometry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::DensityCalibrated => "density-calibrated",
            ModelKind::FixedTurnLoss => "fixed-turn-loss",
            ModelKind::ShapeGeometry => "shape-geometry",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = UnknownModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "densitycalibrated" => Ok(ModelKind::DensityCalibrated),
            "fixedturnloss" => Ok(ModelKind::FixedTurnLoss),
            "shapegeometry" => Ok(ModelKind::ShapeGeometry),
            _ => Err(UnknownModelError(s.to_string())),
        }
    }
}

/// Intermediate metrics specific to the model that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ModelDiagnostics {
    DensityCalibrated {
        density: f64,
        density_ref: f64,
        turn_penalty: f64,
        density_bonus: f64,
        /// Efficiency before clamping to `[0, max_efficiency]`.
        unclamped_efficiency: f64,
    },
    FixedTurnLoss {
        spray_time_sec: f64,
        efficiency_per_turn: f64,
    },
    ShapeGeometry {
        ideal_area_m2: f64,
        shape_factor: f64,
        shape_factor_adjusted: f64,
        effective_length_m: f64,
        turn_penalty_distance_m: f64,
    },
}

/// Output of a single model evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimationResult {
    pub model: ModelKind,
    pub ideal_area_acre: f64,
    pub actual_area_acre: f64,
    pub efficiency: f64,
    /// Turn count the model used, after resolution against the shape catalog.
    pub turn_count: Option<u32>,
    pub diagnostics: ModelDiagnostics,
}

impl ModelDiagnostics {
    fn is_finite(&self) -> bool {
        match *self {
            ModelDiagnostics::DensityCalibrated {
                density,
                density_ref,
                turn_penalty,
                density_bonus,
                unclamped_efficiency,
            } => [
                density,
                density_ref,
                turn_penalty,
                density_bonus,
                unclamped_efficiency,
            ]
            .iter()
            .all(|v| v.is_finite()),
            ModelDiagnostics::FixedTurnLoss {
                spray_time_sec,
                efficiency_per_turn,
            } => spray_time_sec.is_finite() && efficiency_per_turn.is_finite(),
            ModelDiagnostics::ShapeGeometry {
                ideal_area_m2,
                shape_factor,
                shape_factor_adjusted,
                effective_length_m,
                turn_penalty_distance_m,
            } => [
                ideal_area_m2,
                shape_factor,
                shape_factor_adjusted,
                effective_length_m,
                turn_penalty_distance_m,
            ]
            .iter()
            .all(|v| v.is_finite()),
        }
    }
}

impl EstimationResult {
    /// Reject results whose arithmetic left the range of `f64`.
    pub(crate) fn ensure_finite(self) -> Result<Self, EstimationError> {
        let headline = [self.ideal_area_acre, self.actual_area_acre, self.efficiency];
        if headline.iter().all(|v| v.is_finite()) && self.diagnostics.is_finite() {
            Ok(self)
        } else {
            Err(EstimationError::NumericRange { model: self.model })
        }
    }
}

/// Common interface of the coverage models.
pub trait EstimationModel {
    const KIND: ModelKind;

    /// Evaluate the model. Fails when the parameters lack an input the model needs
    /// or when they are too large or small to evaluate in `f64`.
    fn estimate(&self, params: &FlightParameters) -> Result<EstimationResult, EstimationError>;
}
