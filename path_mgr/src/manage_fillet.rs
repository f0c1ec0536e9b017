//! Fillet waypoint management
//!
//! As line management, but corners are rounded with an arc of the minimum
//! turn radius tangent to both legs, so the commanded path never asks for an
//! instantaneous course change. Each corner passes through three states:
//! the straight leg in, the transition onto the arc, and the arc itself.
//!
//! The transition state exists because the start-of-arc plane is crossed
//! before the vehicle is geometrically on the arc; without it the
//! end-of-arc test could fire on the same tick the arc is entered.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use crate::sequencer::Sequenced;
use crate::state::{ned_position, PathMgr};
use guidance_if::{PathCmd, PathType, Pose};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The fillet state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum FilletState {
    /// Flying the straight leg into the corner.
    #[default]
    Straight,

    /// Passed the start-of-arc plane, orbiting onto the arc.
    Transition,

    /// On the arc, waiting to cross the end-of-arc plane.
    Orbit,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathMgr {
    /// Manage the mission as straight legs with filleted corners.
    pub(crate) fn manage_fillet(&mut self, pose: &Pose) -> Option<PathCmd> {
        let orbit_last = self.params.orbit_last;
        let r_min = self.params.r_min_m as f32;

        // Filleting needs a corner, which needs three waypoints
        if self.waypoints.len() < 3 {
            return self.manage_line(pose);
        }

        let p = ned_position(pose);

        let (idx_b, idx_c) = match self.increment_indices(pose) {
            Sequenced::OrbitLast(cmd) => return Some(cmd),
            Sequenced::Indices { idx_b, idx_c } => (idx_b, idx_c),
        };

        let w_im1 = Vector3::from(self.waypoints[self.idx_a].w_m);
        let w_i = Vector3::from(self.waypoints[idx_b].w_m);
        let w_ip1 = Vector3::from(self.waypoints[idx_c].w_m);

        // Vector into the corner and its length
        let leg_in = w_i - w_im1;
        let dist_w_im1 = leg_in.norm();
        let q_im1 = leg_in / dist_w_im1;

        // Vector out of the corner and its length
        let leg_out = w_ip1 - w_i;
        let dist_w_ip1 = leg_out.norm();
        let q_i = leg_out / dist_w_ip1;

        // Corner angle
        let varrho = (-q_im1.dot(&q_i)).acos();

        // The largest arc radius these legs can accommodate. If the minimum
        // turn radius does not fit the corner is too acute to fillet.
        let max_r = dist_w_im1.min(dist_w_ip1) * (varrho / 2.0).sin();

        if r_min > max_r {
            if self.acute_corner_throttle.ready() {
                warn!(
                    "Too acute an angle, using line management. Values, max_r: {} R_min: {}",
                    max_r, r_min
                );
            }
            return self.manage_line(pose);
        }

        let mut cmd = PathCmd {
            va_d_ms: self.waypoints[self.idx_a].va_d_ms,
            r_m: w_im1.into(),
            ..Default::default()
        };

        match self.fil_state {
            FilletState::Straight => {
                cmd.path_type = PathType::Line;
                cmd.q = q_im1.into();

                // Start-of-arc plane
                let z = w_i - q_im1 * (r_min / (varrho / 2.0).tan());

                if (p - z).dot(&q_im1) > 0.0 {
                    if q_i == q_im1 {
                        // Colinear legs, no arc to fly
                        self.advance_waypoint();
                    } else {
                        self.fil_state = FilletState::Transition;
                    }
                }
            }
            FilletState::Transition => {
                cmd.path_type = PathType::Orbit;
                cmd.q = q_i.into();

                let c = w_i - (q_im1 - q_i).normalize() * (r_min / (varrho / 2.0).sin());
                cmd.c_m = c.into();
                cmd.rho_m = r_min;
                cmd.lamda = if q_im1[0] * q_i[1] - q_im1[1] * q_i[0] > 0.0 {
                    1
                } else {
                    -1
                };

                // End-of-arc plane
                let z = w_i + q_i * (r_min / (varrho / 2.0).tan());

                if orbit_last && self.idx_a == self.waypoints.len() - 2 {
                    // Hand over to the sequencer's last-waypoint orbit; the
                    // next tick publishes it
                    self.idx_a += 1;
                    self.fil_state = FilletState::Straight;
                } else if (p - z).dot(&q_i) < 0.0 {
                    self.fil_state = FilletState::Orbit;
                }
            }
            FilletState::Orbit => {
                cmd.path_type = PathType::Orbit;
                cmd.q = q_i.into();

                let c = w_i - (q_im1 - q_i).normalize() * (r_min / (varrho / 2.0).sin());
                cmd.c_m = c.into();
                cmd.rho_m = r_min;
                cmd.lamda = if q_im1[0] * q_i[1] - q_im1[1] * q_i[0] > 0.0 {
                    1
                } else {
                    -1
                };

                let z = w_i + q_i * (r_min / (varrho / 2.0).tan());

                if (p - z).dot(&q_i) > 0.0 {
                    self.advance_waypoint();
                    self.fil_state = FilletState::Straight;
                }
            }
        }

        Some(cmd)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::Params;
    use guidance_if::Waypoint;

    fn test_params() -> Params {
        Params {
            r_min_m: 25.0,
            orbit_last: false,
            default_altitude_m: 50.0,
            default_airspeed_ms: 15.0,
            fillet_corners: true,
        }
    }

    fn wp(n: f32, e: f32) -> Waypoint {
        Waypoint {
            w_m: [n, e, -50.0],
            chi_d_rad: 0.0,
            va_d_ms: 18.0,
            use_chi: false,
        }
    }

    fn pose(pn: f64, pe: f64) -> Pose {
        Pose {
            pn_m: pn,
            pe_m: pe,
            h_m: 50.0,
            chi_rad: 0.0,
            va_ms: 18.0,
        }
    }

    /// A right-angle corner: (0,0) -> (100,0) -> (100,100), legs 100 m,
    /// turn angle pi/2, max_r = 100 sin(pi/4) ~ 70.7 > 25.
    fn right_angle_mgr() -> PathMgr {
        let mut mgr = PathMgr::new(test_params());
        mgr.add_waypoint(wp(0.0, 0.0));
        mgr.add_waypoint(wp(100.0, 0.0));
        mgr.add_waypoint(wp(100.0, 100.0));
        mgr
    }

    #[test]
    fn test_straight_before_arc() {
        let mut mgr = right_angle_mgr();

        // Short of the start-of-arc plane at (75, 0): still a line
        let (cmd, report) = mgr.proc(&pose(70.0, 0.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(cmd.path_type, PathType::Line);
        assert_eq!(cmd.r_m, [0.0, 0.0, -50.0]);
        assert_eq!(cmd.q, [1.0, 0.0, 0.0]);
        assert!(matches!(report.fillet_state, FilletState::Straight));
    }

    #[test]
    fn test_transition_orbit_geometry() {
        let mut mgr = right_angle_mgr();

        // Past the start-of-arc plane z = (100,0) - (1,0,0)*25/tan(pi/4)
        // = (75, 0): the fillet arc engages
        let (cmd, report) = mgr.proc(&pose(76.0, 0.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Transition));

        // The pre-transition tick still emitted the straight line
        assert_eq!(cmd.unwrap().path_type, PathType::Line);

        // Next tick emits the arc: center (75, 25), radius 25, clockwise
        let (cmd, _) = mgr.proc(&pose(80.0, 0.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(cmd.path_type, PathType::Orbit);
        assert!((cmd.c_m[0] - 75.0).abs() < 1e-3);
        assert!((cmd.c_m[1] - 25.0).abs() < 1e-3);
        assert!((cmd.c_m[2] + 50.0).abs() < 1e-3);
        assert_eq!(cmd.rho_m, 25.0);
        assert_eq!(cmd.lamda, 1);
    }

    #[test]
    fn test_full_corner_sequence() {
        let mut mgr = right_angle_mgr();

        // Straight leg in
        let (_, report) = mgr.proc(&pose(50.0, 0.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Straight));

        // Cross the start-of-arc plane
        let (_, report) = mgr.proc(&pose(80.0, 0.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Transition));

        // On the arc, short of the end-of-arc plane z = (100, 25): the
        // transition hands over to the orbit state
        let (_, report) = mgr.proc(&pose(95.0, 10.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Orbit));

        // Past the end-of-arc plane: back to straight, next corner active
        let (_, report) = mgr.proc(&pose(100.0, 30.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Straight));
        assert_eq!(report.idx_a, 1);

        // And the new leg is the line out of the corner
        let (cmd, _) = mgr.proc(&pose(100.0, 40.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(cmd.path_type, PathType::Line);
        assert_eq!(cmd.r_m, [100.0, 0.0, -50.0]);
        assert_eq!(cmd.q, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_acute_corner_falls_back_to_line() {
        // A hairpin: the second leg doubles back at ~11 degrees, so
        // max_r = 100 sin(5.7 deg) ~ 10 < 25 and filleting is impossible
        let mut mgr = PathMgr::new(test_params());
        mgr.add_waypoint(wp(0.0, 0.0));
        mgr.add_waypoint(wp(100.0, 0.0));
        mgr.add_waypoint(wp(2.0, 19.6));

        let (cmd, report) = mgr.proc(&pose(50.0, 0.0)).unwrap();
        let cmd = cmd.unwrap();

        // Line management takes over
        assert_eq!(cmd.path_type, PathType::Line);
        assert_eq!(cmd.r_m, [0.0, 0.0, -50.0]);
        assert_eq!(cmd.q, [1.0, 0.0, 0.0]);
        assert!(matches!(report.fillet_state, FilletState::Straight));
    }

    #[test]
    fn test_colinear_corner_skips_arc() {
        // Waypoint 1 lies on the straight line to waypoint 2: no arc needed
        let mut mgr = PathMgr::new(test_params());
        mgr.add_waypoint(wp(0.0, 0.0));
        mgr.add_waypoint(wp(100.0, 0.0));
        mgr.add_waypoint(wp(200.0, 0.0));

        // Before the waypoint: nothing to do
        let (_, report) = mgr.proc(&pose(80.0, 0.0)).unwrap();
        assert_eq!(report.idx_a, 0);

        // Past the waypoint plane the index advances without an arc
        let (cmd, report) = mgr.proc(&pose(101.0, 0.0)).unwrap();
        assert_eq!(cmd.unwrap().path_type, PathType::Line);
        assert_eq!(report.idx_a, 1);
        assert!(matches!(report.fillet_state, FilletState::Straight));
    }

    #[test]
    fn test_orbit_last_handover() {
        let mut mgr = PathMgr::new(Params {
            orbit_last: true,
            ..test_params()
        });
        mgr.add_waypoint(wp(0.0, 0.0));
        mgr.add_waypoint(wp(100.0, 0.0));
        mgr.add_waypoint(wp(100.0, 100.0));

        // Fly the first corner normally
        let (_, report) = mgr.proc(&pose(50.0, 0.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Straight));
        assert_eq!(report.idx_a, 0);

        let (_, report) = mgr.proc(&pose(80.0, 0.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Transition));

        let (_, report) = mgr.proc(&pose(95.0, 10.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Orbit));

        let (_, report) = mgr.proc(&pose(100.0, 30.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Straight));
        assert_eq!(report.idx_a, 1);

        // Approach the corner at the final waypoint: crossing its
        // start-of-arc plane enters the transition state
        let (_, report) = mgr.proc(&pose(100.0, 45.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Transition));

        // The transition at the second-to-last index hands over to the
        // last-waypoint orbit, carrying the arc for one more tick
        let (cmd, report) = mgr.proc(&pose(100.0, 50.0)).unwrap();
        assert!(matches!(report.fillet_state, FilletState::Straight));
        assert_eq!(report.idx_a, 2);
        assert_eq!(cmd.unwrap().path_type, PathType::Orbit);

        // From the next tick the sequencer orbits the final waypoint
        let (cmd, _) = mgr.proc(&pose(100.0, 60.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(cmd.path_type, PathType::Orbit);
        assert_eq!(cmd.c_m, [100.0, 100.0, -50.0]);
        assert_eq!(cmd.rho_m, 25.0);
        assert_eq!(cmd.lamda, 1);
    }
}
