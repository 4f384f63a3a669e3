use super::WRAP_GUARD_DEGREES;
use ringctl::geom::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Point,
    pub timestamp: i64,
}

/// Estimates how fast the pointer circles a fixed center from its last two samples.
#[derive(Debug, Clone, Default)]
pub struct AngularVelocityTracker {
    center: Point,
    previous: Option<Sample>,
    current: Option<Sample>,
}

impl AngularVelocityTracker {
    pub fn new(center: Point) -> Self {
        Self {
            center,
            previous: None,
            current: None,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn add_movement(&mut self, position: Point, timestamp: i64) {
        self.previous = self.current.take();
        self.current = Some(Sample {
            position,
            timestamp,
        });
    }

    /// Degrees per time unit between the last two samples.
    ///
    /// The divisor is `previous - current`, so a clockwise drag over increasing
    /// timestamps yields a negative value. Deltas of [`WRAP_GUARD_DEGREES`] or more are
    /// reported as zero instead of being unwrapped.
    pub fn angular_velocity(&self) -> f64 {
        let (Some(previous), Some(current)) = (self.previous, self.current) else {
            return 0.0;
        };
        if previous.timestamp == current.timestamp {
            return 0.0;
        }

        let delta = self.angle(current.position) - self.angle(previous.position);
        // crossing the seam jumps from ~180 to ~-180
        if delta.abs() >= WRAP_GUARD_DEGREES {
            return 0.0;
        }
        // i64 subtraction overflows for far-apart timestamps
        delta / (previous.timestamp as f64 - current.timestamp as f64)
    }

    pub fn clear(&mut self) {
        self.previous = None;
        self.current = None;
    }

    fn angle(&self, position: Point) -> f64 {
        (self.center.x - position.x)
            .atan2(self.center.y - position.y)
            .to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(samples: &[(f64, f64, i64)]) -> AngularVelocityTracker {
        let mut tracker = AngularVelocityTracker::new(Point::new(100.0, 100.0));
        for &(x, y, t) in samples {
            tracker.add_movement(Point::new(x, y), t);
        }
        tracker
    }

    #[test]
    fn test_same_angle_has_no_velocity() {
        // both on the ray pointing right of the center
        let tracker = tracker_with(&[(150.0, 100.0, 0), (200.0, 100.0, 5)]);
        assert_eq!(tracker.angular_velocity(), 0.0);

        let tracker = tracker_with(&[(150.0, 100.0, 0), (200.0, 100.0, 5000)]);
        assert_eq!(tracker.angular_velocity(), 0.0);
    }

    #[test]
    fn test_wrap_guard_suppresses_large_deltas() {
        // quarter turn in one step
        let tracker = tracker_with(&[(110.0, 100.0, 0), (100.0, 90.0, 10)]);
        assert_eq!(tracker.angular_velocity(), 0.0);

        // just either side of the seam below the center
        let tracker = tracker_with(&[(99.0, 150.0, 0), (101.0, 150.0, 10)]);
        assert_eq!(tracker.angular_velocity(), 0.0);
    }

    #[test]
    fn test_small_delta_uses_inverted_time() {
        // -90 deg -> -78.69 deg over 10 time units
        let tracker = tracker_with(&[(150.0, 100.0, 0), (150.0, 90.0, 10)]);
        let delta = (-50.0f64).atan2(10.0).to_degrees() - (-50.0f64).atan2(0.0).to_degrees();
        let expected = -1.130_993_247_402_021_3;

        assert!((delta / (0.0 - 10.0) - expected).abs() < 1e-12);
        assert!((tracker.angular_velocity() - expected).abs() < 1e-12);

        let reversed = tracker_with(&[(150.0, 90.0, 0), (150.0, 100.0, 10)]);
        assert!((reversed.angular_velocity() + expected).abs() < 1e-12);
    }

    #[test]
    fn test_equal_timestamps_have_no_velocity() {
        let tracker = tracker_with(&[(150.0, 100.0, 7), (150.0, 90.0, 7)]);
        assert_eq!(tracker.angular_velocity(), 0.0);
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let tracker = tracker_with(&[(150.0, 100.0, i64::MIN), (150.0, 90.0, i64::MAX)]);
        let velocity = tracker.angular_velocity();

        assert!(velocity.is_finite());
        assert!(velocity < 0.0);
        assert!(velocity.abs() < 1e-15);
    }

    #[test]
    fn test_single_sample_after_clear() {
        let mut tracker = tracker_with(&[(150.0, 100.0, 0), (150.0, 90.0, 10)]);
        tracker.clear();
        assert_eq!(tracker.angular_velocity(), 0.0);

        tracker.add_movement(Point::new(150.0, 95.0), 20);
        assert_eq!(tracker.angular_velocity(), 0.0);

        tracker.add_movement(Point::new(150.0, 90.0), 30);
        assert!(tracker.angular_velocity() != 0.0);
    }
}
