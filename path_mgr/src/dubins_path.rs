//! Dubins path computation
//!
//! A Dubins path is the shortest path between two oriented configurations
//! for a vehicle with a minimum turn radius, here restricted to the four
//! circle-straight-circle families (RSR, RSL, LSR, LSL). The solver picks
//! the shortest feasible family and reports the geometry the manager needs:
//! the two arc circles, the straight-segment entry and exit points, and the
//! half-plane normals used to sequence the segments.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

// Internal
use guidance_if::Waypoint;
use util::maths::mod_2pi;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Sentinel length assigned to candidate paths whose tangent does not exist.
const INFEASIBLE_M: f32 = 9999.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The geometry of a computed Dubins path between two oriented waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct DubinsPath {
    /// Start position, NED meters.
    pub ps: Vector3<f32>,

    /// Start course in radians.
    pub chis: f32,

    /// End position, NED meters.
    pub pe: Vector3<f32>,

    /// End course in radians.
    pub chie: f32,

    /// Center of the start arc.
    pub cs: Vector3<f32>,

    /// Direction of the start arc, +1 clockwise viewed from above.
    pub lams: i8,

    /// Center of the end arc.
    pub ce: Vector3<f32>,

    /// Direction of the end arc.
    pub lame: i8,

    /// Entry point of the straight segment.
    pub w1: Vector3<f32>,

    /// Unit direction of the straight segment.
    pub q1: Vector3<f32>,

    /// Exit point of the straight segment.
    pub w2: Vector3<f32>,

    /// Terminal point (the end position).
    pub w3: Vector3<f32>,

    /// Unit direction through the terminal point.
    pub q3: Vector3<f32>,

    /// Turn radius in meters.
    pub r_m: f32,

    /// Total path length in meters.
    pub l_m: f32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised by the Dubins solver.
#[derive(Debug, Error)]
pub enum DubinsError {
    /// The two configurations are closer than one turn diameter, so the
    /// tangent construction has no solution.
    #[error("The distance between nodes must be larger than 2R")]
    NodesTooClose,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DubinsPath {
    /// Compute the shortest circle-straight-circle path from `start` to
    /// `end` with turn radius `r`.
    ///
    /// Candidate families are evaluated in the order RSR, RSL, LSR, LSL and
    /// ties go to the earlier family. RSL and LSR require the circle centers
    /// to be more than one turn diameter apart and are skipped otherwise.
    pub fn compute(start: &Waypoint, end: &Waypoint, r: f32) -> Result<Self, DubinsError> {
        use std::f32::consts::{FRAC_PI_2, PI};

        let ps = Vector3::from(start.w_m);
        let pe = Vector3::from(end.w_m);
        let chis = start.chi_d_rad;
        let chie = end.chi_d_rad;

        let dist = ((ps[0] - pe[0]).powi(2) + (ps[1] - pe[1]).powi(2)).sqrt();
        if dist < 2.0 * r {
            return Err(DubinsError::NodesTooClose);
        }

        let (crs, cls, cre, cle) = tangent_centers(ps, chis, pe, chie, r);
        let lengths = candidate_lengths(crs, cls, cre, cle, chis, chie, r);

        // Select the shortest candidate, earliest wins ties
        let mut idx = 0;
        for (i, &l) in lengths.iter().enumerate() {
            if l < lengths[idx] {
                idx = i;
            }
        }

        let e1 = Vector3::x();
        let (cs, lams, ce, lame, q1, w1, w2) = match idx {
            // RSR
            0 => {
                let q1: Vector3<f32> = (cre - crs).normalize();
                let w1 = crs + (rotz(-FRAC_PI_2) * q1) * r;
                let w2 = cre + (rotz(-FRAC_PI_2) * q1) * r;
                (crs, 1, cre, 1, q1, w1, w2)
            }
            // RSL
            1 => {
                let ell = (cle - crs).norm();
                let theta = (cle[1] - crs[1]).atan2(cle[0] - crs[0]);
                let theta2 = theta - FRAC_PI_2 + (2.0 * r / ell).asin();
                let q1 = rotz(theta2 + FRAC_PI_2) * e1;
                let w1 = crs + (rotz(theta2) * e1) * r;
                let w2 = cle + (rotz(theta2 + PI) * e1) * r;
                (crs, 1, cle, -1, q1, w1, w2)
            }
            // LSR
            2 => {
                let ell = (cre - cls).norm();
                let theta = (cre[1] - cls[1]).atan2(cre[0] - cls[0]);
                let theta2 = (2.0 * r / ell).acos();
                let q1 = rotz(theta + theta2 - FRAC_PI_2) * e1;
                let w1 = cls + (rotz(theta + theta2) * e1) * r;
                let w2 = cre + (rotz(theta + theta2 - PI) * e1) * r;
                (cls, -1, cre, 1, q1, w1, w2)
            }
            // LSL
            _ => {
                let q1: Vector3<f32> = (cle - cls).normalize();
                let w1 = cls + (rotz(FRAC_PI_2) * q1) * r;
                let w2 = cle + (rotz(FRAC_PI_2) * q1) * r;
                (cls, -1, cle, -1, q1, w1, w2)
            }
        };

        Ok(Self {
            ps,
            chis,
            pe,
            chie,
            cs,
            lams,
            ce,
            lame,
            w1,
            q1,
            w2,
            w3: pe,
            q3: rotz(chie) * e1,
            r_m: r,
            l_m: lengths[idx],
        })
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Rotation about the down axis by `theta` radians.
///
/// Applied to a 3-vector the third coordinate is unchanged.
pub fn rotz(theta: f32) -> Matrix3<f32> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(
        c, -s, 0.0, //
        s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The four tangent circle centers for a pair of oriented configurations:
/// right and left of the start, right and left of the end.
fn tangent_centers(
    ps: Vector3<f32>,
    chis: f32,
    pe: Vector3<f32>,
    chie: f32,
    r: f32,
) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>, Vector3<f32>) {
    use std::f32::consts::FRAC_PI_2;

    let crs = ps + r * Vector3::new((chis + FRAC_PI_2).cos(), (chis + FRAC_PI_2).sin(), 0.0);
    let cls = ps + r * Vector3::new((chis - FRAC_PI_2).cos(), (chis - FRAC_PI_2).sin(), 0.0);
    let cre = pe + r * Vector3::new((chie + FRAC_PI_2).cos(), (chie + FRAC_PI_2).sin(), 0.0);
    let cle = pe + r * Vector3::new((chie - FRAC_PI_2).cos(), (chie - FRAC_PI_2).sin(), 0.0);

    (crs, cls, cre, cle)
}

/// Candidate path lengths in family order RSR, RSL, LSR, LSL.
///
/// RSL and LSR tangents only exist when their circle centers are more than
/// one turn diameter apart; blocked families are assigned the
/// infeasibility sentinel.
fn candidate_lengths(
    crs: Vector3<f32>,
    cls: Vector3<f32>,
    cre: Vector3<f32>,
    cle: Vector3<f32>,
    chis: f32,
    chie: f32,
    r: f32,
) -> [f32; 4] {
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    // RSR
    let theta = (cre[1] - crs[1]).atan2(cre[0] - crs[0]);
    let l1 = (crs - cre).norm()
        + r * mod_2pi(TAU + mod_2pi(theta - FRAC_PI_2) - mod_2pi(chis - FRAC_PI_2))
        + r * mod_2pi(TAU + mod_2pi(chie - FRAC_PI_2) - mod_2pi(theta - FRAC_PI_2));

    // RSL
    let ell = (cle - crs).norm();
    let theta = (cle[1] - crs[1]).atan2(cle[0] - crs[0]);
    let l2 = if 2.0 * r > ell {
        INFEASIBLE_M
    } else {
        let theta2 = theta - FRAC_PI_2 + (2.0 * r / ell).asin();
        (ell * ell - 4.0 * r * r).sqrt()
            + r * mod_2pi(TAU + mod_2pi(theta2) - mod_2pi(chis - FRAC_PI_2))
            + r * mod_2pi(TAU + mod_2pi(theta2 + PI) - mod_2pi(chie + FRAC_PI_2))
    };

    // LSR
    let ell = (cre - cls).norm();
    let theta = (cre[1] - cls[1]).atan2(cre[0] - cls[0]);
    let l3 = if 2.0 * r > ell {
        INFEASIBLE_M
    } else {
        let theta2 = (2.0 * r / ell).acos();
        (ell * ell - 4.0 * r * r).sqrt()
            + r * mod_2pi(TAU + mod_2pi(chis + FRAC_PI_2) - mod_2pi(theta + theta2))
            + r * mod_2pi(TAU + mod_2pi(chie - FRAC_PI_2) - mod_2pi(theta + theta2 - PI))
    };

    // LSL
    let theta = (cle[1] - cls[1]).atan2(cle[0] - cls[0]);
    let l4 = (cls - cle).norm()
        + r * mod_2pi(TAU + mod_2pi(chis + FRAC_PI_2) - mod_2pi(theta + FRAC_PI_2))
        + r * mod_2pi(TAU + mod_2pi(theta + FRAC_PI_2) - mod_2pi(chie + FRAC_PI_2));

    [l1, l2, l3, l4]
}
