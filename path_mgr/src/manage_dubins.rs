//! Dubins waypoint management
//!
//! When a waypoint demands a specific course through it the mission is
//! consumed pairwise, flying the shortest circle-straight-circle path
//! between successive waypoint configurations. The machine sequences the
//! start arc, the straight tangent and the end arc using the three
//! half-planes reported by the solver; the "wrong side" states keep the
//! vehicle on an arc until it is on the approach side of the relevant
//! plane, so a plane crossing is never declared spuriously.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::error;
use serde::Serialize;

// Internal
use crate::dubins_path::DubinsPath;
use crate::state::{ned_position, PathMgr};
use guidance_if::{PathCmd, PathType, Pose};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The Dubins state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum DubinsState {
    /// No path solved yet for the active pair.
    #[default]
    First,

    /// On the start arc, approaching the straight-segment entry plane.
    BeforeH1,

    /// On the start arc but beyond the entry plane; orbit back around to
    /// the approach side first.
    BeforeH1WrongSide,

    /// On the straight tangent segment.
    Straight,

    /// On the end arc, approaching the arrival plane.
    BeforeH3,

    /// On the end arc but beyond the arrival plane; orbit back around to
    /// the approach side first.
    BeforeH3WrongSide,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathMgr {
    /// Manage the mission as Dubins paths between waypoint configurations.
    pub(crate) fn manage_dubins(&mut self, pose: &Pose) -> Option<PathCmd> {
        let r_min = self.params.r_min_m as f32;

        let p = ned_position(pose);

        let mut cmd = PathCmd {
            va_d_ms: self.waypoints[self.idx_a].va_d_ms,
            ..Default::default()
        };

        match self.dub_state {
            DubinsState::First => {
                let idx_b = (self.idx_a + 1) % self.waypoints.len();

                match DubinsPath::compute(
                    &self.waypoints[self.idx_a],
                    &self.waypoints[idx_b],
                    r_min,
                ) {
                    Ok(path) => self.dubinspath = Some(path),
                    Err(e) => {
                        if self.dubins_error_throttle.ready() {
                            error!("{}", e);
                        }
                        // Hold the previous primitive and retry next tick
                        return None;
                    }
                }

                let path = self.dubinspath.clone()?;
                self.mark_target(idx_b);

                cmd.path_type = PathType::Orbit;
                cmd.c_m = path.cs.into();
                cmd.rho_m = path.r_m;
                cmd.lamda = path.lams;

                self.dub_state = if (p - path.w1).dot(&path.q1) >= 0.0 {
                    DubinsState::BeforeH1WrongSide
                } else {
                    DubinsState::BeforeH1
                };
            }
            DubinsState::BeforeH1 => {
                let path = self.dubinspath.clone()?;

                cmd.path_type = PathType::Orbit;
                cmd.c_m = path.cs.into();
                cmd.rho_m = path.r_m;
                cmd.lamda = path.lams;

                if (p - path.w1).dot(&path.q1) >= 0.0 {
                    self.dub_state = DubinsState::Straight;
                }
            }
            DubinsState::BeforeH1WrongSide => {
                let path = self.dubinspath.clone()?;

                cmd.path_type = PathType::Orbit;
                cmd.c_m = path.cs.into();
                cmd.rho_m = path.r_m;
                cmd.lamda = path.lams;

                if (p - path.w1).dot(&path.q1) < 0.0 {
                    self.dub_state = DubinsState::BeforeH1;
                }
            }
            DubinsState::Straight => {
                let path = self.dubinspath.clone()?;

                cmd.path_type = PathType::Line;
                cmd.r_m = path.w1.into();
                cmd.q = path.q1.into();

                if (p - path.w2).dot(&path.q1) >= 0.0 {
                    self.dub_state = if (p - path.w3).dot(&path.q3) >= 0.0 {
                        DubinsState::BeforeH3WrongSide
                    } else {
                        DubinsState::BeforeH3
                    };
                }
            }
            DubinsState::BeforeH3 => {
                let path = self.dubinspath.clone()?;

                cmd.path_type = PathType::Orbit;
                cmd.c_m = path.ce.into();
                cmd.rho_m = path.r_m;
                cmd.lamda = path.lame;

                if (p - path.w3).dot(&path.q3) >= 0.0 {
                    // Advance to the next waypoint pair
                    let num = self.waypoints.len();
                    let idx_b;
                    if self.idx_a == num - 1 {
                        self.idx_a = 0;
                        idx_b = 1;
                    } else if self.idx_a == num - 2 {
                        self.idx_a += 1;
                        idx_b = 0;
                    } else {
                        self.idx_a += 1;
                        idx_b = self.idx_a + 1;
                    }
                    self.update_marker = true;

                    match DubinsPath::compute(
                        &self.waypoints[self.idx_a],
                        &self.waypoints[idx_b],
                        r_min,
                    ) {
                        Ok(new_path) => {
                            self.mark_target(idx_b);

                            self.dub_state = if (p - new_path.w1).dot(&new_path.q1) >= 0.0 {
                                DubinsState::BeforeH1WrongSide
                            } else {
                                DubinsState::BeforeH1
                            };
                            self.dubinspath = Some(new_path);
                        }
                        Err(e) => {
                            if self.dubins_error_throttle.ready() {
                                error!("{}", e);
                            }
                            // Retry the new pair from scratch next tick
                            self.dub_state = DubinsState::First;
                        }
                    }
                }
            }
            DubinsState::BeforeH3WrongSide => {
                let path = self.dubinspath.clone()?;

                cmd.path_type = PathType::Orbit;
                cmd.c_m = path.ce.into();
                cmd.rho_m = path.r_m;
                cmd.lamda = path.lame;

                if (p - path.w3).dot(&path.q3) < 0.0 {
                    self.dub_state = DubinsState::BeforeH3;
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
    use std::f32::consts::{FRAC_PI_2, PI};

    fn test_params() -> Params {
        Params {
            r_min_m: 50.0,
            orbit_last: false,
            default_altitude_m: 50.0,
            default_airspeed_ms: 15.0,
            fillet_corners: true,
        }
    }

    fn wp(n: f32, e: f32, chi: f32) -> Waypoint {
        Waypoint {
            w_m: [n, e, -50.0],
            chi_d_rad: chi,
            va_d_ms: 20.0,
            use_chi: true,
        }
    }

    fn pose(pn: f64, pe: f64) -> Pose {
        Pose {
            pn_m: pn,
            pe_m: pe,
            h_m: 50.0,
            chi_rad: FRAC_PI_2 as f64,
            va_ms: 20.0,
        }
    }

    /// A single right turn: east through (0,0), south through (-200, 200).
    /// The solved path is RSR with cs = (-50, 0), w1 = (-14.6, 35.4),
    /// q1 = (-1, 1)/sqrt(2), w2 = (-164.6, 185.4), w3 = (-200, 200),
    /// q3 = (-1, 0).
    fn right_turn_mgr() -> PathMgr {
        let mut mgr = PathMgr::new(test_params());
        mgr.add_waypoint(wp(0.0, 0.0, FRAC_PI_2));
        mgr.add_waypoint(wp(-200.0, 200.0, PI));
        mgr
    }

    #[test]
    fn test_sequence_through_path() {
        let mut mgr = right_turn_mgr();

        // First tick solves the pair, emits the start arc, and reports the
        // target configuration
        let (cmd, report) = mgr.proc(&pose(0.0, 0.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(cmd.path_type, PathType::Orbit);
        assert!((cmd.c_m[0] + 50.0).abs() < 1e-2);
        assert!((cmd.c_m[1]).abs() < 1e-2);
        assert_eq!(cmd.rho_m, 50.0);
        assert_eq!(cmd.lamda, 1);
        assert_eq!(cmd.va_d_ms, 20.0);
        assert!(matches!(report.dubins_state, DubinsState::BeforeH1));
        assert_eq!(report.target_wp.unwrap().w_m, [-200.0, 200.0, -50.0]);

        // Crossing the entry plane releases the straight segment
        let (cmd, report) = mgr.proc(&pose(-20.0, 40.0)).unwrap();
        assert_eq!(cmd.unwrap().path_type, PathType::Orbit);
        assert!(matches!(report.dubins_state, DubinsState::Straight));

        // On the tangent: a line through w1 along q1
        let (cmd, report) = mgr.proc(&pose(-100.0, 120.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(cmd.path_type, PathType::Line);
        assert!((cmd.r_m[0] + 14.645).abs() < 1e-2);
        assert!((cmd.r_m[1] - 35.355).abs() < 1e-2);
        let norm = (cmd.q[0].powi(2) + cmd.q[1].powi(2) + cmd.q[2].powi(2)).sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert!(matches!(report.dubins_state, DubinsState::Straight));

        // Crossing the exit plane engages the end arc
        let (_, report) = mgr.proc(&pose(-170.0, 190.0)).unwrap();
        assert!(matches!(report.dubins_state, DubinsState::BeforeH3));

        let (cmd, report) = mgr.proc(&pose(-190.0, 195.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(cmd.path_type, PathType::Orbit);
        assert!((cmd.c_m[0] + 200.0).abs() < 1e-2);
        assert!((cmd.c_m[1] - 150.0).abs() < 1e-2);
        assert_eq!(cmd.lamda, 1);
        assert!(matches!(report.dubins_state, DubinsState::BeforeH3));

        // Crossing the arrival plane advances to the next pair (wrapping)
        // and re-solves; the tick still carries the completed end arc
        let (cmd, report) = mgr.proc(&pose(-201.0, 190.0)).unwrap();
        assert_eq!(cmd.unwrap().path_type, PathType::Orbit);
        assert_eq!(report.idx_a, 1);
        assert!(matches!(
            report.dubins_state,
            DubinsState::BeforeH1 | DubinsState::BeforeH1WrongSide
        ));

        // The new target is reported once
        assert_eq!(report.target_wp.unwrap().w_m, [0.0, 0.0, -50.0]);
        let (_, report) = mgr.proc(&pose(-201.0, 189.0)).unwrap();
        assert!(report.target_wp.is_none());
    }

    #[test]
    fn test_wrong_side_entry() {
        let mut mgr = right_turn_mgr();

        // Starting beyond the entry plane: the machine holds the start arc
        // until the vehicle comes back around
        let (_, report) = mgr.proc(&pose(-100.0, 120.0)).unwrap();
        assert!(matches!(
            report.dubins_state,
            DubinsState::BeforeH1WrongSide
        ));

        // Still wrong side, still orbiting the start circle
        let (cmd, report) = mgr.proc(&pose(-90.0, 110.0)).unwrap();
        assert_eq!(cmd.unwrap().path_type, PathType::Orbit);
        assert!(matches!(
            report.dubins_state,
            DubinsState::BeforeH1WrongSide
        ));

        // Back on the approach side the normal entry sequence resumes
        let (_, report) = mgr.proc(&pose(0.0, 0.0)).unwrap();
        assert!(matches!(report.dubins_state, DubinsState::BeforeH1));
    }

    #[test]
    fn test_infeasible_pair_holds_previous() {
        // Waypoints closer than one turn diameter cannot be joined
        let mut mgr = PathMgr::new(test_params());
        mgr.add_waypoint(wp(0.0, 0.0, 0.0));
        mgr.add_waypoint(wp(50.0, 0.0, 0.0));

        let (cmd, report) = mgr.proc(&pose(0.0, 0.0)).unwrap();
        assert!(cmd.is_none());
        assert!(matches!(report.dubins_state, DubinsState::First));

        // Still nothing on later ticks, the solver keeps refusing
        let (cmd, _) = mgr.proc(&pose(10.0, 0.0)).unwrap();
        assert!(cmd.is_none());
    }
}
