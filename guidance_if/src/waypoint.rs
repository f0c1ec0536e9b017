//! # Waypoint types

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single mission waypoint.
///
/// Waypoints are immutable once accepted by the manager; the mission is
/// changed by appending, clearing, or consuming a temporary head waypoint.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position in the local NED frame, in meters. `w_m[2]` is the down
    /// coordinate, i.e. the negated altitude.
    pub w_m: [f32; 3],

    /// Desired course through this waypoint in radians, clockwise from north.
    ///
    /// Only honoured when `use_chi` is set.
    pub chi_d_rad: f32,

    /// Desired airspeed for the leg departing this waypoint, in meters/second.
    pub va_d_ms: f32,

    /// When true the vehicle must pass through this waypoint at `chi_d_rad`,
    /// which engages Dubins path management for the leg.
    pub use_chi: bool,
}

/// The waypoint the manager is currently steering towards.
///
/// Emitted fire-and-forget whenever the active target changes, for
/// downstream consumers such as visualisation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetWaypoint {
    /// Position in the local NED frame, in meters.
    pub w_m: [f32; 3],

    /// Desired airspeed at the target, in meters/second.
    pub va_d_ms: f32,

    /// True if `w_m` holds geodetic coordinates. Always false here, positions
    /// are local NED.
    pub lla: bool,
}
