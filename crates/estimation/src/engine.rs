//! Engine façade: validates a flight request and dispatches it to the selected model.

use drone_config::{CalibrationProfile, ConfigError, ModelConstants};

use crate::catalog::ShapeCatalog;
use crate::error::EstimationError;
use crate::models::{
    DensityCalibratedModel, EstimationModel, EstimationResult, FixedTurnLossModel, ModelKind,
    ShapeGeometryModel,
};
use crate::params::{FlightInput, FlightParameters, OperatingEnvelope};

/// Outcome of one model inside [`CoverageEstimationEngine::compare`].
pub type ModelOutcome = (ModelKind, Result<EstimationResult, EstimationError>);

/// Stateless coverage estimator.
///
/// Holds only immutable constants and the shape catalog, so a single engine
/// can be shared across threads and called concurrently.
#[derive(Debug, Clone, Default)]
pub struct CoverageEstimationEngine {
    density: DensityCalibratedModel,
    turn_loss: FixedTurnLossModel,
    geometry: ShapeGeometryModel,
    catalog: ShapeCatalog,
    envelope: OperatingEnvelope,
}

impl CoverageEstimationEngine {
    /// Validate `constants` and build an engine over the built-in catalog.
    pub fn new(constants: ModelConstants) -> Result<Self, ConfigError> {
        constants.validate()?;
        Ok(Self::from_validated(constants))
    }

    /// Validate `profile` and build an engine from its constants.
    pub fn with_profile(profile: &CalibrationProfile) -> Result<Self, ConfigError> {
        profile.validate()?;
        Ok(Self::from_validated(profile.constants.clone()))
    }

    fn from_validated(constants: ModelConstants) -> Self {
        Self {
            density: DensityCalibratedModel::new(constants.density),
            turn_loss: FixedTurnLossModel::new(constants.turn_loss),
            geometry: ShapeGeometryModel::new(constants.geometry),
            catalog: ShapeCatalog::builtin(),
            envelope: OperatingEnvelope::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: ShapeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_envelope(mut self, envelope: OperatingEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn envelope(&self) -> &OperatingEnvelope {
        &self.envelope
    }

    /// Validate a raw request against this engine's catalog.
    pub fn validate(&self, input: &FlightInput) -> Result<FlightParameters, EstimationError> {
        let params = FlightParameters::new(input, &self.catalog)?;
        for field in params.envelope_warnings(&self.envelope) {
            tracing::warn!(%field, "input outside the recommended operating envelope");
        }
        Ok(params)
    }

    /// Validate `input` and run the selected model.
    pub fn estimate(
        &self,
        input: &FlightInput,
        model: ModelKind,
    ) -> Result<EstimationResult, EstimationError> {
        let params = self.validate(input)?;
        self.estimate_validated(&params, model)
    }

    /// Run the selected model on parameters that were validated earlier.
    pub fn estimate_validated(
        &self,
        params: &FlightParameters,
        model: ModelKind,
    ) -> Result<EstimationResult, EstimationError> {
        let result = match model {
            ModelKind::DensityCalibrated => self.density.estimate(params),
            ModelKind::FixedTurnLoss => self.turn_loss.estimate(params),
            ModelKind::ShapeGeometry => self.geometry.estimate(params),
        }?;
        tracing::debug!(
            %model,
            turns = ?result.turn_count,
            ideal_acre = result.ideal_area_acre,
            actual_acre = result.actual_area_acre,
            efficiency = result.efficiency,
            "coverage estimated"
        );
        tracing::trace!(diagnostics = ?result.diagnostics);
        Ok(result)
    }

    /// Run every model on one request.
    ///
    /// Validation failures abort the comparison; a model that cannot use the
    /// request reports its own error in its slot.
    pub fn compare(&self, input: &FlightInput) -> Result<Vec<ModelOutcome>, EstimationError> {
        let params = self.validate(input)?;
        Ok(ModelKind::ALL
            .into_iter()
            .map(|model| (model, self.estimate_validated(&params, model)))
            .collect())
    }
}
