//! Message throttling
//!
//! Conditions that persist over many ticks (no waypoints, an infeasible
//! corner) would otherwise spam the log at the tick rate. A [`Throttle`]
//! gates such a message to at most one emission per period.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A monotonic rate limiter for repeated log messages.
#[derive(Debug, Clone)]
pub struct Throttle {
    period: Duration,
    last: Option<Instant>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Throttle {
    /// Create a new throttle with the given period.
    ///
    /// The first call to [`Throttle::ready`] always passes.
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    /// Returns true if a full period has elapsed since the last passing call.
    ///
    /// A passing call arms the throttle for the next period.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();

        match self.last {
            Some(last) if now.duration_since(last) < self.period => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_first_call_passes() {
        let mut throttle = Throttle::new(Duration::from_secs(5));
        assert!(throttle.ready());
        assert!(!throttle.ready());
    }

    #[test]
    fn test_period_elapse() {
        let mut throttle = Throttle::new(Duration::from_millis(0));
        assert!(throttle.ready());
        assert!(throttle.ready());
    }
}
