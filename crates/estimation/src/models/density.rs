//! Density-calibrated model: quadratic turn penalty plus an application-density correction.
//!
//! ```text
//! A_ideal    = tank * V * W / (flow * 4046.86)
//! D          = flow / (V * W)
//! efficiency = 1 - k1 * N * (V / V_ref)^2 + k2 * (D_ref - D) / D_ref
//! A_real     = A_ideal * clamp(efficiency, 0, max_efficiency)
//! ```
//!
//! Applying less product per square metre than the reference trial counts
//! as a bonus, so efficiency may exceed 1 up to `max_efficiency`.

use drone_config::DensityConstants;
use drone_core::{sweep, units};

use super::{EstimationModel, EstimationResult, ModelDiagnostics, ModelKind};
use crate::error::{EstimationError, RequiredInput};
use crate::params::FlightParameters;

#[derive(Debug, Clone, Default)]
pub struct DensityCalibratedModel {
    constants: DensityConstants,
}

impl DensityCalibratedModel {
    pub(crate) fn new(constants: DensityConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &DensityConstants {
        &self.constants
    }

    // Explicit turn count first, then the shape's catalogued one.
    fn resolve_turns(params: &FlightParameters) -> Result<u32, EstimationError> {
        params
            .turn_count()
            .or_else(|| params.shape_turn_count())
            .ok_or(EstimationError::ModelNotApplicable {
                model: Self::KIND,
                missing: RequiredInput::TurnCount,
            })
    }
}

impl EstimationModel for DensityCalibratedModel {
    const KIND: ModelKind = ModelKind::DensityCalibrated;

    fn estimate(&self, params: &FlightParameters) -> Result<EstimationResult, EstimationError> {
        let turns = Self::resolve_turns(params)?;
        let c = &self.constants;

        let speed = params.speed_mps();
        let flow = params.flow_rate_per_min();
        let area_rate = sweep::area_rate_m2_s(speed, params.swath_width_m());

        let ideal_area_acre = units::m2_to_acre(params.tank_capacity() * area_rate / flow);

        let density = flow / area_rate;
        let density_ref = c.density_ref();
        let speed_ratio = speed / c.reference_speed_mps;
        let turn_penalty = c.k1 * f64::from(turns) * speed_ratio * speed_ratio;
        let density_bonus = c.k2 * (density_ref - density) / density_ref;

        let unclamped_efficiency = 1.0 - turn_penalty + density_bonus;
        let efficiency = unclamped_efficiency.clamp(0.0, c.max_efficiency);

        EstimationResult {
            model: Self::KIND,
            ideal_area_acre,
            actual_area_acre: ideal_area_acre * efficiency,
            efficiency,
            turn_count: Some(turns),
            diagnostics: ModelDiagnostics::DensityCalibrated {
                density,
                density_ref,
                turn_penalty,
                density_bonus,
                unclamped_efficiency,
            },
        }
        .ensure_finite()
    }
}
