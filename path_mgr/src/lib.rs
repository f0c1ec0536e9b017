//! # Path manager module
//!
//! The path manager is the first stage of the guidance stack: given the
//! mission waypoint list and the vehicle's current pose it emits, once per
//! pose sample, a single geometric primitive (a directed straight line or a
//! circular orbit) for the path follower to track.
//!
//! Three management strategies cover the mission shapes:
//!
//! - *Line*: fly the straight leg into each waypoint and switch legs when
//!   the bisector plane of the corner is crossed.
//! - *Fillet*: as line, but insert a minimum-radius arc at each corner so
//!   the vehicle never has to turn through a discontinuity. Falls back to
//!   line management when the corner is too acute for the turn radius.
//! - *Dubins*: when a waypoint demands a specific course through it, fly the
//!   shortest circle-straight-circle path between successive waypoint
//!   configurations.
//!
//! Degenerate missions are handled before any strategy engages: with no
//! waypoints the vehicle orbits the origin at a default altitude (after a
//! startup grace period), and with a single waypoint it orbits that point
//! in whichever direction is closest to its current course.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod dubins_path;
mod manage_dubins;
mod manage_fillet;
mod manage_line;
mod params;
mod sequencer;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use dubins_path::*;
pub use manage_dubins::DubinsState;
pub use manage_fillet::FilletState;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

use std::time::Duration;

/// Startup grace before the empty-mission warning and origin orbit engage.
pub(crate) const NO_WAYPOINT_GRACE: Duration = Duration::from_secs(10);

/// Minimum interval between repetitions of a persistent warning.
pub(crate) const WARN_PERIOD: Duration = Duration::from_secs(5);
