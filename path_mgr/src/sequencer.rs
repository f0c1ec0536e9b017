//! Waypoint index sequencing
//!
//! The line and fillet managers work on the triple of waypoints around the
//! active corner: the one just departed (`idx_a`), the current target and
//! the one after it. The sequencer derives the latter two from `idx_a` every
//! tick, consumes temporary head waypoints, and owns the last-waypoint
//! orbit override.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use crate::state::PathMgr;
use guidance_if::{PathCmd, PathType, Pose};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The outcome of a sequencing step.
pub(crate) enum Sequenced {
    /// The derived target and look-ahead indices.
    Indices { idx_b: usize, idx_c: usize },

    /// The mission ends on an indefinite orbit of the final waypoint; the
    /// calling manager passes this command through unchanged.
    OrbitLast(PathCmd),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathMgr {
    /// Derive `(idx_b, idx_c)` from `idx_a` for this tick.
    ///
    /// Requires at least two waypoints.
    pub(crate) fn increment_indices(&mut self, pose: &Pose) -> Sequenced {
        // Consume a temporary head waypoint once the vehicle has departed
        // the real waypoint after it
        if self.temp_waypoint && self.idx_a == 1 {
            let old_count = self.waypoints.len();
            self.waypoints.remove(0);
            self.temp_waypoint = false;
            self.idx_a = 0;
            self.update_marker = true;
            self.refresh_orbit_dir(old_count);

            let (idx_b, idx_c) = wrap_indices(self.idx_a, self.waypoints.len());
            return Sequenced::Indices { idx_b, idx_c };
        }

        let num = self.waypoints.len();

        if self.idx_a == num - 1 && self.params.orbit_last {
            let wp = self.waypoints[self.idx_a];

            let lamda = self.orbit_direction(
                pose.pn_m as f32,
                pose.pe_m as f32,
                pose.chi_rad as f32,
                wp.w_m[0],
                wp.w_m[1],
            );

            self.mark_target(self.idx_a);

            return Sequenced::OrbitLast(PathCmd {
                path_type: PathType::Orbit,
                va_d_ms: wp.va_d_ms,
                c_m: wp.w_m,
                rho_m: self.params.r_min_m as f32,
                lamda,
                ..Default::default()
            });
        }

        let (idx_b, idx_c) = wrap_indices(self.idx_a, num);
        self.mark_target(idx_b);

        Sequenced::Indices { idx_b, idx_c }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Target and look-ahead indices after `idx_a`, wrapping over `num`.
pub(crate) fn wrap_indices(idx_a: usize, num: usize) -> (usize, usize) {
    if idx_a == num - 1 {
        (0, 1)
    } else if idx_a == num - 2 {
        (num - 1, 0)
    } else {
        (idx_a + 1, idx_a + 2)
    }
}
