//! Fixed per-turn loss model: a constant fraction of coverage is lost at every turn.
//!
//! ```text
//! t_spray = tank / flow * 60
//! A_ideal = V * W * t_spray / 4046.86
//! A_real  = A_ideal * (1 - loss)^N
//! ```

use drone_config::TurnLossConstants;
use drone_core::{sweep, units};

use super::{EstimationModel, EstimationResult, ModelDiagnostics, ModelKind};
use crate::error::{EstimationError, RequiredInput};
use crate::params::FlightParameters;

#[derive(Debug, Clone, Default)]
pub struct FixedTurnLossModel {
    constants: TurnLossConstants,
}

impl FixedTurnLossModel {
    pub(crate) fn new(constants: TurnLossConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &TurnLossConstants {
        &self.constants
    }

    // The selected shape decides the pattern; an explicit count is used only without a shape.
    fn resolve_turns(params: &FlightParameters) -> Result<u32, EstimationError> {
        match params.shape() {
            Some(entry) => entry.turn_count.ok_or(EstimationError::ModelNotApplicable {
                model: Self::KIND,
                missing: RequiredInput::ShapeTurnCount,
            }),
            None => params
                .turn_count()
                .ok_or(EstimationError::ModelNotApplicable {
                    model: Self::KIND,
                    missing: RequiredInput::TurnCount,
                }),
        }
    }
}

impl EstimationModel for FixedTurnLossModel {
    const KIND: ModelKind = ModelKind::FixedTurnLoss;

    fn estimate(&self, params: &FlightParameters) -> Result<EstimationResult, EstimationError> {
        let turns = Self::resolve_turns(params)?;

        let spray_time_sec =
            units::minutes_to_seconds(params.tank_capacity() / params.flow_rate_per_min());
        let area_rate = sweep::area_rate_m2_s(params.speed_mps(), params.swath_width_m());
        let ideal_area_acre = units::m2_to_acre(area_rate * spray_time_sec);

        let efficiency_per_turn = 1.0 - self.constants.turn_loss_fraction;
        let efficiency = efficiency_per_turn.powf(f64::from(turns));

        EstimationResult {
            model: Self::KIND,
            ideal_area_acre,
            actual_area_acre: ideal_area_acre * efficiency,
            efficiency,
            turn_count: Some(turns),
            diagnostics: ModelDiagnostics::FixedTurnLoss {
                spray_time_sec,
                efficiency_per_turn,
            },
        }
        .ensure_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FlightInput;

    fn params(input: FlightInput) -> FlightParameters {
        FlightParameters::try_from(&input).expect("valid input")
    }

    #[test]
    fn square_field_loses_two_percent_per_turn() {
        let result = FixedTurnLossModel::default()
            .estimate(&params(FlightInput {
                turn_count: None,
                shape: Some("Square".to_string()),
                ..FlightInput::default()
            }))
            .unwrap();

        assert_eq!(result.turn_count, Some(16));
        assert!((result.ideal_area_acre - 5_500.0 / 4_046.86).abs() < 1e-12);
        assert!((result.efficiency - 0.98_f64.powi(16)).abs() < 1e-12);
        assert!((result.actual_area_acre - 0.983_69).abs() < 1e-4);
        match result.diagnostics {
            ModelDiagnostics::FixedTurnLoss {
                spray_time_sec,
                efficiency_per_turn,
            } => {
                assert!((spray_time_sec - 200.0).abs() < 1e-9);
                assert!((efficiency_per_turn - 0.98).abs() < 1e-12);
            }
            other => panic!("unexpected diagnostics {other:?}"),
        }
    }

    #[test]
    fn zero_turns_is_identity() {
        let result = FixedTurnLossModel::default()
            .estimate(&params(FlightInput {
                turn_count: Some(0),
                ..FlightInput::default()
            }))
            .unwrap();
        assert_eq!(result.efficiency, 1.0);
        assert_eq!(result.actual_area_acre, result.ideal_area_acre);
    }

    #[test]
    fn shape_turns_override_explicit_count() {
        let result = FixedTurnLossModel::default()
            .estimate(&params(FlightInput {
                turn_count: Some(3),
                shape: Some("rectangle".to_string()),
                ..FlightInput::default()
            }))
            .unwrap();
        assert_eq!(result.turn_count, Some(12));
    }

    #[test]
    fn shape_without_turn_count_is_not_applicable() {
        let err = FixedTurnLossModel::default()
            .estimate(&params(FlightInput {
                shape: Some("rhombus".to_string()),
                ..FlightInput::default()
            }))
            .unwrap_err();
        assert_eq!(
            err,
            EstimationError::ModelNotApplicable {
                model: ModelKind::FixedTurnLoss,
                missing: RequiredInput::ShapeTurnCount,
            }
        );

        let err = FixedTurnLossModel::default()
            .estimate(&params(FlightInput {
                turn_count: None,
                ..FlightInput::default()
            }))
            .unwrap_err();
        assert!(matches!(
            err,
            EstimationError::ModelNotApplicable {
                missing: RequiredInput::TurnCount,
                ..
            }
        ));
    }

    #[test]
    fn overflowing_spray_time_is_a_numeric_range_error() {
        let err = FixedTurnLossModel::default()
            .estimate(&params(FlightInput {
                tank_capacity: 1e300,
                flow_rate_per_min: 1e-300,
                ..FlightInput::default()
            }))
            .unwrap_err();
        assert_eq!(
            err,
            EstimationError::NumericRange {
                model: ModelKind::FixedTurnLoss
            }
        );
    }
}
