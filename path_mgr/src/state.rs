//! Path manager state and per-tick dispatch

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use nalgebra::Vector3;
use serde::Serialize;
use std::time::Instant;

// Internal
use crate::dubins_path::DubinsPath;
use crate::manage_dubins::DubinsState;
use crate::manage_fillet::FilletState;
use crate::params::Params;
use crate::{NO_WAYPOINT_GRACE, WARN_PERIOD};
use guidance_if::{PathCmd, PathType, Pose, TargetWaypoint, Waypoint};
use util::{params, throttle::Throttle};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The path manager.
///
/// One instance per vehicle. The owner feeds it pose samples through
/// [`PathMgr::proc`] and mutates the mission through the waypoint ingestion
/// functions; ingestion must be serialized with processing (single mutex or
/// an inbox drained between ticks), mutation during a tick is not possible
/// through this API.
#[derive(Debug)]
pub struct PathMgr {
    pub(crate) params: Params,

    /// The mission waypoint list.
    pub(crate) waypoints: Vec<Waypoint>,

    /// True when element 0 is a temporary waypoint to be consumed once the
    /// vehicle reaches the following real waypoint.
    pub(crate) temp_waypoint: bool,

    /// Index of the waypoint most recently departed.
    pub(crate) idx_a: usize,

    /// The management strategy engaged on the previous tick.
    pub(crate) strategy: Strategy,

    /// Fillet state machine.
    pub(crate) fil_state: FilletState,

    /// Dubins state machine.
    pub(crate) dub_state: DubinsState,

    /// The most recently solved Dubins path, if any.
    pub(crate) dubinspath: Option<DubinsPath>,

    /// Sticky orbit direction for degenerate missions, 0 when uncomputed.
    pub(crate) orbit_dir: i8,

    /// True when the active target waypoint has changed and the marker has
    /// not yet been reported.
    pub(crate) update_marker: bool,

    /// Instant this manager was constructed, for the startup grace period.
    pub(crate) start_time: Instant,

    pub(crate) no_waypoints_throttle: Throttle,
    pub(crate) acute_corner_throttle: Throttle,
    pub(crate) dubins_error_throttle: Throttle,

    /// Report for the tick in progress.
    pub(crate) report: StatusReport,
}

/// The status report produced by each processing tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    /// Number of waypoints in the mission.
    pub num_waypoints: usize,

    /// Index of the waypoint most recently departed.
    pub idx_a: usize,

    /// Fillet state machine state.
    pub fillet_state: FilletState,

    /// Dubins state machine state.
    pub dubins_state: DubinsState,

    /// Set when the active target waypoint changed this tick. Collaborators
    /// publish this fire-and-forget; it is reported at most once per change.
    pub target_wp: Option<TargetWaypoint>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors raised by the path manager.
#[derive(Debug, thiserror::Error)]
pub enum PathMgrError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(#[from] params::LoadError),
}

/// The three waypoint management strategies.
///
/// The dispatcher re-selects the strategy every tick; a swap discards the
/// per-strategy state machines so the incoming strategy starts fresh.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Strategy {
    Line,
    Fillet,
    Dubins,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathMgr {
    /// Initialise the path manager.
    ///
    /// Expected init data is a path to the parameter file.
    pub fn init(params_path: &str) -> Result<Self, PathMgrError> {
        let params: Params = params::load(params_path)?;

        Ok(Self::new(params))
    }

    pub fn new(params: Params) -> Self {
        let strategy = if params.fillet_corners {
            Strategy::Fillet
        } else {
            Strategy::Line
        };

        Self {
            params,
            waypoints: Vec::new(),
            temp_waypoint: false,
            idx_a: 0,
            strategy,
            fil_state: FilletState::Straight,
            dub_state: DubinsState::First,
            dubinspath: None,
            orbit_dir: 0,
            update_marker: true,
            start_time: Instant::now(),
            no_waypoints_throttle: Throttle::new(WARN_PERIOD),
            acute_corner_throttle: Throttle::new(WARN_PERIOD),
            dubins_error_throttle: Throttle::new(WARN_PERIOD),
            report: StatusReport::default(),
        }
    }

    /// Process one pose sample into a path primitive.
    ///
    /// Returns `None` for the command when the manager intentionally
    /// publishes nothing this tick, in which case the consumer keeps flying
    /// the previous primitive.
    pub fn proc(&mut self, pose: &Pose) -> Result<(Option<PathCmd>, StatusReport), PathMgrError> {
        debug_assert!(self.params.r_min_m > 0.0);
        debug_assert!(self.waypoints.is_empty() || self.idx_a < self.waypoints.len());

        self.report = StatusReport::default();

        let cmd = match self.waypoints.len() {
            0 => self.manage_no_waypoints(),
            1 => self.manage_single_waypoint(pose),
            _ => {
                // Select the strategy for this tick, discarding stale
                // per-strategy state if it differs from the last one
                let strategy = if self.waypoints[self.idx_a].use_chi {
                    Strategy::Dubins
                } else if self.params.fillet_corners {
                    Strategy::Fillet
                } else {
                    Strategy::Line
                };

                if strategy != self.strategy {
                    self.reset_strategy_state();
                    self.strategy = strategy;
                }

                match strategy {
                    Strategy::Line => self.manage_line(pose),
                    Strategy::Fillet => self.manage_fillet(pose),
                    Strategy::Dubins => self.manage_dubins(pose),
                }
            }
        };

        self.report.num_waypoints = self.waypoints.len();
        self.report.idx_a = self.idx_a;
        self.report.fillet_state = self.fil_state;
        self.report.dubins_state = self.dub_state;

        Ok((cmd, self.report.clone()))
    }

    /// Append a waypoint to the end of the mission.
    pub fn add_waypoint(&mut self, wp: Waypoint) {
        let old_count = self.waypoints.len();
        self.waypoints.push(wp);

        // The active target only changes if there was no full leg before
        if old_count < 2 {
            self.update_marker = true;
        }

        self.refresh_orbit_dir(old_count);
    }

    /// Clear the mission.
    pub fn clear_waypoints(&mut self) {
        let old_count = self.waypoints.len();

        self.waypoints.clear();
        self.temp_waypoint = false;
        self.idx_a = 0;
        self.update_marker = true;

        self.reset_strategy_state();
        self.refresh_orbit_dir(old_count);
    }

    /// Insert a temporary waypoint at the head of the mission.
    ///
    /// The sequencer drops it again once the vehicle departs the following
    /// real waypoint.
    pub fn insert_temporary(&mut self, wp: Waypoint) {
        let old_count = self.waypoints.len();

        self.waypoints.insert(0, wp);
        self.temp_waypoint = true;
        self.idx_a = 0;
        self.update_marker = true;

        self.reset_strategy_state();
        self.refresh_orbit_dir(old_count);
    }

    /// Get the number of waypoints in the mission.
    pub fn num_waypoints(&self) -> usize {
        self.waypoints.len()
    }

    /// Replace the parameter snapshot used from the next tick onwards.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// No waypoints: after a startup grace period, orbit the origin at the
    /// default altitude. During the grace period nothing is published.
    fn manage_no_waypoints(&mut self) -> Option<PathCmd> {
        if self.start_time.elapsed() < NO_WAYPOINT_GRACE {
            return None;
        }

        if self.no_waypoints_throttle.ready() {
            warn!(
                "No waypoints received, orbiting origin at {} meters",
                self.params.default_altitude_m
            );
        }

        Some(PathCmd {
            path_type: PathType::Orbit,
            va_d_ms: self.params.default_airspeed_ms as f32,
            c_m: [0.0, 0.0, -(self.params.default_altitude_m as f32)],
            rho_m: self.params.r_min_m as f32,
            lamda: 1,
            ..Default::default()
        })
    }

    /// A single waypoint: orbit it in whichever direction is closest to the
    /// vehicle's current course.
    fn manage_single_waypoint(&mut self, pose: &Pose) -> Option<PathCmd> {
        let wp = self.waypoints[0];

        let lamda = self.orbit_direction(
            pose.pn_m as f32,
            pose.pe_m as f32,
            pose.chi_rad as f32,
            wp.w_m[0],
            wp.w_m[1],
        );

        Some(PathCmd {
            path_type: PathType::Orbit,
            va_d_ms: wp.va_d_ms,
            c_m: wp.w_m,
            rho_m: self.params.r_min_m as f32,
            lamda,
            ..Default::default()
        })
    }

    /// Pick the orbit direction that requires the smallest course change
    /// from the vehicle's current state, then keep it.
    ///
    /// The cached direction stops the choice oscillating as the vehicle
    /// circles; it is cleared when the mission shape changes.
    pub(crate) fn orbit_direction(
        &mut self,
        pn_m: f32,
        pe_m: f32,
        chi_rad: f32,
        c_n_m: f32,
        c_e_m: f32,
    ) -> i8 {
        if self.orbit_dir != 0 {
            return self.orbit_dir;
        }

        let d = Vector3::new(pn_m - c_n_m, pe_m - c_e_m, 0.0);
        let course = Vector3::new(chi_rad.sin(), chi_rad.cos(), 0.0);

        self.orbit_dir = if d.cross(&course)[2] >= 0.0 { 1 } else { -1 };
        self.orbit_dir
    }

    /// Advance to the next waypoint, wrapping at the end of the mission, and
    /// flag the target marker for re-publication.
    pub(crate) fn advance_waypoint(&mut self) {
        if self.idx_a == self.waypoints.len() - 1 {
            self.idx_a = 0;
        } else {
            self.idx_a += 1;
        }
        self.update_marker = true;
    }

    /// Report the waypoint at `idx` as the active target, once per change.
    pub(crate) fn mark_target(&mut self, idx: usize) {
        if self.update_marker {
            let wp = self.waypoints[idx];
            self.report.target_wp = Some(TargetWaypoint {
                w_m: wp.w_m,
                va_d_ms: wp.va_d_ms,
                lla: false,
            });
            self.update_marker = false;
        }
    }

    /// Discard all per-strategy state.
    pub(crate) fn reset_strategy_state(&mut self) {
        self.fil_state = FilletState::Straight;
        self.dub_state = DubinsState::First;
        self.dubinspath = None;
    }

    /// Clear the sticky orbit direction when the waypoint count moves
    /// between the none / single / multiple regimes.
    pub(crate) fn refresh_orbit_dir(&mut self, old_count: usize) {
        let bucket = |n: usize| n.min(2);

        if bucket(old_count) != bucket(self.waypoints.len()) {
            self.orbit_dir = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The vehicle position in the NED frame.
pub(crate) fn ned_position(pose: &Pose) -> Vector3<f32> {
    Vector3::new(pose.pn_m as f32, pose.pe_m as f32, -(pose.h_m as f32))
}
