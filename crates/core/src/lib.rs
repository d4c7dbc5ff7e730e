//! Core units, constants, and shared primitives for the Drone Area Calculator workspace.

/// Unit constants used by every coverage model.
pub mod constants {
    /// Square metres per international acre.
    pub const SQUARE_METRES_PER_ACRE: f64 = 4_046.86;
    /// Seconds per minute.
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{SECONDS_PER_MINUTE, SQUARE_METRES_PER_ACRE};

    /// Convert square metres to acres.
    #[inline]
    pub fn m2_to_acre(v: f64) -> f64 {
        v / SQUARE_METRES_PER_ACRE
    }

    /// Convert a per-minute rate to a per-second rate.
    #[inline]
    pub fn per_minute_to_per_second(v: f64) -> f64 {
        v / SECONDS_PER_MINUTE
    }

    /// Convert minutes to seconds.
    #[inline]
    pub fn minutes_to_seconds(v: f64) -> f64 {
        v * SECONDS_PER_MINUTE
    }
}

/// Flight-pattern geometry helpers.
pub mod sweep {
    /// Ground area swept per second by a pass of the given speed and swath (m²/s).
    #[inline]
    pub fn area_rate_m2_s(speed_mps: f64, swath_width_m: f64) -> f64 {
        speed_mps * swath_width_m
    }
}
