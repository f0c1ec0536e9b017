//! # Path primitive commands
//!
//! The guidance core reduces the mission to a single geometric primitive per
//! tick, either a directed straight line or a circular orbit, which the path
//! follower converts into roll/pitch/airspeed demands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Which geometric primitive a [`PathCmd`] describes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathType {
    /// A directed straight line through `r_m` along `q`.
    Line,

    /// A circular orbit about `c_m` with radius `rho_m` and direction `lamda`.
    Orbit,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A path primitive command.
///
/// Only the fields of the active `path_type` are meaningful; the remainder
/// hold placeholder values and must be ignored by consumers.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCmd {
    /// The primitive carried by this command.
    pub path_type: PathType,

    /// Desired airspeed for this leg in meters/second.
    pub va_d_ms: f32,

    /// A point on the line, NED meters. Line only.
    pub r_m: [f32; 3],

    /// Unit direction of the line. Line only.
    pub q: [f32; 3],

    /// Orbit center, NED meters. Orbit only.
    pub c_m: [f32; 3],

    /// Orbit radius in meters. Orbit only.
    pub rho_m: f32,

    /// Orbit direction, +1 clockwise viewed from above, -1 counterclockwise.
    /// Orbit only.
    pub lamda: i8,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for PathCmd {
    fn default() -> Self {
        Self {
            path_type: PathType::Line,
            va_d_ms: 0.0,
            r_m: [0.0; 3],
            q: [0.0; 3],
            c_m: [0.0; 3],
            rho_m: 0.0,
            lamda: 1,
        }
    }
}
