//! Typed failures surfaced by validation and the estimation models.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::ShapeId;
use crate::models::ModelKind;

/// Numeric input fields subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterField {
    Speed,
    SwathWidth,
    FlowRate,
    TankCapacity,
    TurnCount,
}

impl ParameterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterField::Speed => "speed",
            ParameterField::SwathWidth => "swath_width",
            ParameterField::FlowRate => "flow_rate",
            ParameterField::TankCapacity => "tank_capacity",
            ParameterField::TurnCount => "turn_count",
        }
    }
}

impl std::fmt::Display for ParameterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input a model needed but could not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredInput {
    /// Neither an explicit turn count nor a shape with a catalogued turn count.
    TurnCount,
    /// A shape was selected but its catalog entry has no turn count.
    ShapeTurnCount,
    /// No shape selected, or the shape's catalog entry has no shape factor.
    ShapeFactor,
}

impl std::fmt::Display for RequiredInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RequiredInput::TurnCount => "turn count",
            RequiredInput::ShapeTurnCount => "catalogued shape turn count",
            RequiredInput::ShapeFactor => "catalogued shape factor",
        })
    }
}

/// Errors returned by the coverage estimation engine.
///
/// Serializes to structured data (`{"kind": "invalid_parameter", "field": "flow_rate"}`).
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimationError {
    #[error("invalid value for {field}")]
    InvalidParameter { field: ParameterField },
    #[error("shape '{shape_id}' is not in the catalog")]
    UnknownShape { shape_id: String },
    #[error("{model} model requires a {missing}")]
    ModelNotApplicable {
        model: ModelKind,
        missing: RequiredInput,
    },
    #[error("inputs exceed the numeric range of the {model} model")]
    NumericRange { model: ModelKind },
}

/// Errors raised while building a custom [`ShapeCatalog`](crate::ShapeCatalog).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("shape '{0}' appears more than once in the catalog")]
    DuplicateShape(ShapeId),
    #[error("shape '{0}' has a shape factor that is not a positive finite number")]
    InvalidShapeFactor(ShapeId),
}

/// Error returned when a model name does not match any [`ModelKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown estimation model '{0}'")]
pub struct UnknownModelError(pub String);
