//! # Vehicle pose sample

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single estimated pose of the vehicle, one per guidance tick.
///
/// Positions are in the local NED frame, except for `h_m` which is the
/// altitude (positive up, i.e. the negated down coordinate).
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Pose {
    /// North position in meters.
    pub pn_m: f64,

    /// East position in meters.
    pub pe_m: f64,

    /// Altitude in meters, positive up.
    pub h_m: f64,

    /// Course angle in radians, measured clockwise from north.
    pub chi_rad: f64,

    /// Airspeed in meters/second.
    pub va_ms: f64,
}
