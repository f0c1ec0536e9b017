//! Straight-line waypoint management
//!
//! Flies the straight leg from the departed waypoint towards the target and
//! switches legs when the vehicle crosses the plane that bisects the corner
//! at the target waypoint.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector3;

// Internal
use crate::sequencer::Sequenced;
use crate::state::{ned_position, PathMgr};
use guidance_if::{PathCmd, PathType, Pose};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathMgr {
    /// Manage the mission as straight legs through each waypoint.
    pub(crate) fn manage_line(&mut self, pose: &Pose) -> Option<PathCmd> {
        let orbit_last = self.params.orbit_last;

        let p = ned_position(pose);

        let (idx_b, idx_c) = match self.increment_indices(pose) {
            Sequenced::OrbitLast(cmd) => return Some(cmd),
            Sequenced::Indices { idx_b, idx_c } => (idx_b, idx_c),
        };

        // Approaching the final waypoint with orbit_last set: hold the
        // previous primitive until the sequencer's orbit engages
        if orbit_last && self.idx_a == self.waypoints.len() - 2 {
            return None;
        }

        let w_im1 = Vector3::from(self.waypoints[self.idx_a].w_m);
        let w_i = Vector3::from(self.waypoints[idx_b].w_m);
        let w_ip1 = Vector3::from(self.waypoints[idx_c].w_m);

        let q_im1: Vector3<f32> = (w_i - w_im1).normalize();
        let q_i: Vector3<f32> = (w_ip1 - w_i).normalize();

        let cmd = PathCmd {
            path_type: PathType::Line,
            va_d_ms: self.waypoints[self.idx_a].va_d_ms,
            r_m: w_im1.into(),
            q: q_im1.into(),
            ..Default::default()
        };

        // Normal of the plane bisecting the corner at the target. A reversal
        // (q_i = -q_im1) has no bisector, the leg plane itself is used.
        let n_i = if q_i == -q_im1 {
            q_im1
        } else {
            (q_im1 + q_i).normalize()
        };

        // Transition once the vehicle passes through the bisector plane
        if (p - w_i).dot(&n_i) > 0.0 {
            self.advance_waypoint();
        }

        Some(cmd)
    }
}
