//! Coverage estimation engine for agricultural spray drones.
//!
//! Given flight parameters (speed, swath width, flow rate, tank load) and a
//! turn count or field shape, estimates the area one tank load covers under
//! three interchangeable models. The crate performs no I/O; every call is a
//! pure function of its inputs and the engine's immutable constants.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;

pub use catalog::{ShapeCatalog, ShapeEntry, ShapeId};
pub use engine::{CoverageEstimationEngine, ModelOutcome};
pub use error::{CatalogError, EstimationError, ParameterField, RequiredInput, UnknownModelError};
pub use models::{
    DensityCalibratedModel, EstimationModel, EstimationResult, FixedTurnLossModel,
    ModelDiagnostics, ModelKind, ShapeGeometryModel,
};
pub use params::{FlightInput, FlightParameters, OperatingEnvelope};
