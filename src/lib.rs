//! Spray drone coverage estimation.
//!
//! Estimates the field area an agricultural spray drone covers per tank load
//! from its flight parameters, using one of three interchangeable models.
//! The logic lives in the member crates; this crate gathers them under one
//! roof so front-ends (CLI, GUI, web) can depend on a single package.

pub use drone_config as config;
pub use drone_core as common;
pub use drone_estimation as estimation;
pub use drone_export as export;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
