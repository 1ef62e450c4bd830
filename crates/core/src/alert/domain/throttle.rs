use std::time::{Duration, Instant};

/// Minimum-interval gate for a side effect.
///
/// A throttle fires immediately the first time it is asked, then refuses
/// until at least `min_interval` has passed since the last fire. Each
/// instance keeps its own timeline; suppressed attempts never shift it.
#[derive(Clone, Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_fire: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_fire: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns `true` and records the fire if the interval has elapsed
    /// (or nothing has fired yet); otherwise leaves state untouched.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let ready = match self.last_fire {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        };
        if ready {
            self.last_fire = Some(now);
        }
        ready
    }

    /// Record a fire unconditionally, bypassing the interval check.
    /// Used for manually triggered effects that should still hold back
    /// the periodic timeline.
    pub fn force_fire(&mut self, now: Instant) {
        self.last_fire = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn test_first_attempt_fires() {
        let mut t = Throttle::new(Duration::from_millis(5000));
        assert!(t.try_fire(Instant::now()));
    }

    #[rstest]
    #[case(1, false)]
    #[case(4000, false)]
    #[case(4999, false)]
    #[case(5000, true)]
    #[case(6000, true)]
    fn test_second_attempt_against_interval(#[case] ms: u64, #[case] fires: bool) {
        let base = Instant::now();
        let mut t = Throttle::new(Duration::from_millis(5000));
        assert!(t.try_fire(at(base, 0)));
        assert_eq!(t.try_fire(at(base, ms)), fires);
    }

    #[test]
    fn test_suppressed_attempts_do_not_shift_timeline() {
        let base = Instant::now();
        let mut t = Throttle::new(Duration::from_millis(5000));
        assert!(t.try_fire(at(base, 0)));
        // Hammering during the cooldown must not push the window forward
        assert!(!t.try_fire(at(base, 1000)));
        assert!(!t.try_fire(at(base, 2000)));
        assert!(!t.try_fire(at(base, 3000)));
        assert!(t.try_fire(at(base, 5200)));
    }

    #[test]
    fn test_independent_instances() {
        let base = Instant::now();
        let mut alert = Throttle::new(Duration::from_millis(5000));
        let mut snapshot = Throttle::new(Duration::from_millis(10000));
        assert!(alert.try_fire(at(base, 0)));
        assert!(snapshot.try_fire(at(base, 0)));
        // Alert ready again at 6s, snapshot still cooling down
        assert!(alert.try_fire(at(base, 6000)));
        assert!(!snapshot.try_fire(at(base, 6000)));
        assert!(snapshot.try_fire(at(base, 10000)));
    }

    #[test]
    fn test_force_fire_holds_back_next_attempt() {
        let base = Instant::now();
        let mut t = Throttle::new(Duration::from_millis(10000));
        t.force_fire(at(base, 1000));
        assert!(!t.try_fire(at(base, 9000)));
        assert!(t.try_fire(at(base, 11000)));
    }
}
