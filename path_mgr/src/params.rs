//! Path manager parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the path manager
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Minimum turn radius in meters.
    ///
    /// Used as the fillet arc radius, the Dubins turn radius, and the orbit
    /// radius for degenerate missions.
    pub r_min_m: f64,

    /// When true the vehicle orbits the final waypoint indefinitely instead
    /// of wrapping back to the first.
    pub orbit_last: bool,

    /// Orbit altitude in meters (positive up) when no waypoints have been
    /// received.
    pub default_altitude_m: f64,

    /// Orbit airspeed in meters/second when no waypoints have been received.
    pub default_airspeed_ms: f64,

    /// When true corners are smoothed with minimum-radius fillet arcs,
    /// otherwise legs are flown straight through each waypoint.
    pub fillet_corners: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_default_params() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../params/path_mgr.toml");
        let params: Params = util::params::load(path).unwrap();

        assert_eq!(params.r_min_m, 25.0);
        assert!(!params.orbit_last);
        assert_eq!(params.default_altitude_m, 50.0);
        assert_eq!(params.default_airspeed_ms, 15.0);
        assert!(params.fillet_corners);
    }
}

