//! Shape-geometry model: effective travel length against the distance lost while turning.
//!
//! ```text
//! vol_m2     = (flow / 60) / (V * W)
//! A_ideal    = tank / vol_m2                       [m²]
//! sf_adj     = sf * (1 + c * (N - N_ref))
//! L_eff      = sqrt(A_ideal * sf_adj)
//! d_turn     = pi * r_turn * (V / V_turn)
//! efficiency = L_eff / (L_eff + d_turn)
//! ```
//!
//! Both terms of the ratio are positive, so efficiency stays strictly inside
//! `(0, 1)` without clamping. Inputs so extreme that the ratio rounds to an
//! endpoint are reported as [`EstimationError::NumericRange`]. The coefficient
//! `c` differs between calibration profiles (0.02 and 0.015).

use std::f64::consts::PI;

use drone_config::GeometryConstants;
use drone_core::{sweep, units};

use super::{EstimationModel, EstimationResult, ModelDiagnostics, ModelKind};
use crate::error::{EstimationError, RequiredInput};
use crate::params::FlightParameters;

#[derive(Debug, Clone, Default)]
pub struct ShapeGeometryModel {
    constants: GeometryConstants,
}

impl ShapeGeometryModel {
    pub(crate) fn new(constants: GeometryConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &GeometryConstants {
        &self.constants
    }

    fn resolve_shape_factor(params: &FlightParameters) -> Result<f64, EstimationError> {
        params
            .shape()
            .and_then(|entry| entry.shape_factor)
            .ok_or(EstimationError::ModelNotApplicable {
                model: Self::KIND,
                missing: RequiredInput::ShapeFactor,
            })
    }

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

impl EstimationModel for ShapeGeometryModel {
    const KIND: ModelKind = ModelKind::ShapeGeometry;

    fn estimate(&self, params: &FlightParameters) -> Result<EstimationResult, EstimationError> {
        let shape_factor = Self::resolve_shape_factor(params)?;
        let turns = Self::resolve_turns(params)?;
        let c = &self.constants;

        let flow_per_sec = units::per_minute_to_per_second(params.flow_rate_per_min());
        let area_per_sec = sweep::area_rate_m2_s(params.speed_mps(), params.swath_width_m());
        let volume_per_m2 = flow_per_sec / area_per_sec;

        let ideal_area_m2 = params.tank_capacity() / volume_per_m2;
        let ideal_area_acre = units::m2_to_acre(ideal_area_m2);

        let turn_excess = f64::from(turns) - f64::from(c.reference_turn_count);
        let shape_factor_adjusted =
            shape_factor * (1.0 + c.shape_factor_coefficient * turn_excess);
        let effective_length_m = (ideal_area_m2 * shape_factor_adjusted).sqrt();

        let turn_penalty_distance_m =
            PI * c.turn_radius_m * (params.speed_mps() / c.turn_speed_mps);
        let efficiency = effective_length_m / (effective_length_m + turn_penalty_distance_m);
        // Rounds to 0 or 1 when one distance dwarfs the other.
        if !(efficiency > 0.0 && efficiency < 1.0) {
            return Err(EstimationError::NumericRange { model: Self::KIND });
        }

        EstimationResult {
            model: Self::KIND,
            ideal_area_acre,
            actual_area_acre: ideal_area_acre * efficiency,
            efficiency,
            turn_count: Some(turns),
            diagnostics: ModelDiagnostics::ShapeGeometry {
                ideal_area_m2,
                shape_factor,
                shape_factor_adjusted,
                effective_length_m,
                turn_penalty_distance_m,
            },
        }
        .ensure_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FlightInput;

    fn square_input() -> FlightInput {
        FlightInput {
            speed_mps: 5.0,
            swath_width_m: 5.5,
            flow_rate_per_min: 2.0,
            tank_capacity: 15.0,
            turn_count: Some(12),
            shape: Some("Square".to_string()),
        }
    }

    fn params(input: FlightInput) -> FlightParameters {
        FlightParameters::try_from(&input).expect("valid input")
    }

    #[test]
    fn square_field_matches_hand_calculation() {
        let result = ShapeGeometryModel::default()
            .estimate(&params(square_input()))
            .unwrap();

        let ideal_m2 = 15.0 / ((2.0 / 60.0) / 27.5);
        let length = (ideal_m2 * 1.04_f64).sqrt();
        let penalty = PI * 5.0 * (5.0 / 3.0);
        let expected = length / (length + penalty);

        assert!((result.ideal_area_acre - ideal_m2 / 4046.86).abs() < 1e-9);
        assert!((result.efficiency - expected).abs() < 1e-12);
        assert!(result.efficiency > 0.0 && result.efficiency < 1.0);
        assert!(result.actual_area_acre < result.ideal_area_acre);
        assert_eq!(result.turn_count, Some(12));
    }

    #[test]
    fn lower_coefficient_shrinks_shape_adjustment() {
        let low = ShapeGeometryModel::new(GeometryConstants {
            shape_factor_coefficient: 0.015,
            ..GeometryConstants::default()
        });
        let result = low.estimate(&params(square_input())).unwrap();
        match result.diagnostics {
            ModelDiagnostics::ShapeGeometry {
                shape_factor_adjusted,
                ..
            } => assert!((shape_factor_adjusted - 1.03).abs() < 1e-12),
            other => panic!("unexpected diagnostics {other:?}"),
        }
    }

    #[test]
    fn elongated_fields_are_more_efficient() {
        let model = ShapeGeometryModel::default();
        let square = model.estimate(&params(square_input())).unwrap();
        let long = model
            .estimate(&params(FlightInput {
                shape: Some("long-rectangle".to_string()),
                ..square_input()
            }))
            .unwrap();
        assert_eq!(square.ideal_area_acre, long.ideal_area_acre);
        assert!(long.efficiency > square.efficiency);
    }

    #[test]
    fn shape_factor_is_required() {
        let model = ShapeGeometryModel::default();
        let no_shape = model.estimate(&params(FlightInput {
            shape: None,
            ..square_input()
        }));
        let l_shape = model.estimate(&params(FlightInput {
            shape: Some("l-shape".to_string()),
            ..square_input()
        }));
        for outcome in [no_shape, l_shape] {
            assert_eq!(
                outcome.unwrap_err(),
                EstimationError::ModelNotApplicable {
                    model: ModelKind::ShapeGeometry,
                    missing: RequiredInput::ShapeFactor,
                }
            );
        }
    }

    #[test]
    fn turn_count_falls_back_to_catalog_or_fails() {
        let model = ShapeGeometryModel::default();
        let skewed = model
            .estimate(&params(FlightInput {
                turn_count: None,
                shape: Some("skewed-rectangle".to_string()),
                ..square_input()
            }))
            .unwrap();
        assert_eq!(skewed.turn_count, Some(11));

        let err = model
            .estimate(&params(FlightInput {
                turn_count: None,
                shape: Some("trapezium".to_string()),
                ..square_input()
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
    fn extreme_inputs_are_numeric_range_errors() {
        let model = ShapeGeometryModel::default();
        let overflow = model.estimate(&params(FlightInput {
            speed_mps: 1e200,
            swath_width_m: 1e200,
            ..square_input()
        }));
        // Travel length dwarfs the turn penalty, so the ratio rounds to exactly 1.
        let saturated = model.estimate(&params(FlightInput {
            speed_mps: 1.0,
            swath_width_m: 1e30,
            flow_rate_per_min: 1.0,
            tank_capacity: 1e10,
            turn_count: Some(10),
            shape: Some("square".to_string()),
        }));
        for outcome in [overflow, saturated] {
            assert_eq!(
                outcome.unwrap_err(),
                EstimationError::NumericRange {
                    model: ModelKind::ShapeGeometry
                }
            );
        }
    }
}
