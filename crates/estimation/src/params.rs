//! Flight parameter construction and validation.
//!
//! [`FlightInput`] is the raw request a front-end fills in; [`FlightParameters`]
//! is the validated value every model consumes. Units of flow and tank
//! capacity follow the model: kilograms for the density-calibrated and
//! turn-loss models, litres for the shape-geometry model.

use serde::{Deserialize, Serialize};

use crate::catalog::{ShapeCatalog, ShapeEntry};
use crate::error::{EstimationError, ParameterField};

/// Raw, unvalidated flight request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlightInput {
    pub speed_mps: f64,
    pub swath_width_m: f64,
    /// Dispense rate per minute (kg/min or L/min).
    pub flow_rate_per_min: f64,
    /// Load dispensed per sortie (kg or L).
    pub tank_capacity: f64,
    pub turn_count: Option<i64>,
    pub shape: Option<String>,
}

impl Default for FlightInput {
    fn default() -> Self {
        Self {
            speed_mps: 5.0,
            swath_width_m: 5.5,
            flow_rate_per_min: 3.0,
            tank_capacity: 10.0,
            turn_count: Some(10),
            shape: None,
        }
    }
}

/// Validated flight parameters.
///
/// All four rates are finite and strictly positive, the turn count (if any)
/// is non-negative, and the shape (if any) resolved against a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightParameters {
    speed_mps: f64,
    swath_width_m: f64,
    flow_rate_per_min: f64,
    tank_capacity: f64,
    turn_count: Option<u32>,
    shape: Option<ShapeEntry>,
}

impl FlightParameters {
    /// Validate `input`, resolving its shape against `catalog`.
    ///
    /// Checks run in field order and stop at the first failure.
    pub fn new(input: &FlightInput, catalog: &ShapeCatalog) -> Result<Self, EstimationError> {
        let speed_mps = positive(input.speed_mps, ParameterField::Speed)?;
        let swath_width_m = positive(input.swath_width_m, ParameterField::SwathWidth)?;
        let flow_rate_per_min = positive(input.flow_rate_per_min, ParameterField::FlowRate)?;
        let tank_capacity = positive(input.tank_capacity, ParameterField::TankCapacity)?;

        let turn_count = match input.turn_count {
            Some(turns) => Some(u32::try_from(turns).map_err(|_| {
                EstimationError::InvalidParameter {
                    field: ParameterField::TurnCount,
                }
            })?),
            None => None,
        };

        let shape = match input.shape.as_deref() {
            Some(shape_id) => Some(*catalog.resolve(shape_id)?),
            None => None,
        };

        Ok(Self {
            speed_mps,
            swath_width_m,
            flow_rate_per_min,
            tank_capacity,
            turn_count,
            shape,
        })
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    pub fn swath_width_m(&self) -> f64 {
        self.swath_width_m
    }

    pub fn flow_rate_per_min(&self) -> f64 {
        self.flow_rate_per_min
    }

    pub fn tank_capacity(&self) -> f64 {
        self.tank_capacity
    }

    /// Turn count supplied directly by the caller.
    pub fn turn_count(&self) -> Option<u32> {
        self.turn_count
    }

    /// Catalog entry of the selected shape.
    pub fn shape(&self) -> Option<&ShapeEntry> {
        self.shape.as_ref()
    }

    /// Turn count stored in the selected shape's catalog entry.
    pub fn shape_turn_count(&self) -> Option<u32> {
        self.shape.and_then(|entry| entry.turn_count)
    }

    /// Fields whose values lie outside `envelope`.
    pub fn envelope_warnings(&self, envelope: &OperatingEnvelope) -> Vec<ParameterField> {
        let checks = [
            (ParameterField::Speed, self.speed_mps, envelope.speed_mps),
            (
                ParameterField::SwathWidth,
                self.swath_width_m,
                envelope.swath_width_m,
            ),
            (
                ParameterField::FlowRate,
                self.flow_rate_per_min,
                envelope.flow_rate_per_min,
            ),
            (
                ParameterField::TankCapacity,
                self.tank_capacity,
                envelope.tank_capacity,
            ),
        ];
        let mut fields: Vec<ParameterField> = checks
            .into_iter()
            .filter(|(_, value, (min, max))| value < min || value > max)
            .map(|(field, _, _)| field)
            .collect();
        if let Some(turns) = self.turn_count {
            if turns > envelope.max_turn_count {
                fields.push(ParameterField::TurnCount);
            }
        }
        fields
    }
}

impl TryFrom<&FlightInput> for FlightParameters {
    type Error = EstimationError;

    /// Validate against the built-in shape catalog.
    fn try_from(input: &FlightInput) -> Result<Self, Self::Error> {
        Self::new(input, &ShapeCatalog::builtin())
    }
}

fn positive(value: f64, field: ParameterField) -> Result<f64, EstimationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EstimationError::InvalidParameter { field })
    }
}

/// Recommended operating ranges, as (min, max) tuples.
///
/// Values outside the envelope are still estimated; they are only flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperatingEnvelope {
    pub speed_mps: (f64, f64),
    pub swath_width_m: (f64, f64),
    pub flow_rate_per_min: (f64, f64),
    pub tank_capacity: (f64, f64),
    pub max_turn_count: u32,
}

impl Default for OperatingEnvelope {
    fn default() -> Self {
        Self {
            speed_mps: (0.5, 15.0),
            swath_width_m: (0.5, 15.0),
            flow_rate_per_min: (0.1, 20.0),
            tank_capacity: (1.0, 50.0),
            max_turn_count: 200,
        }
    }
}
