use ringctl::geom::Point;
use strum::Display as StrumDisplay;

/// Hit-test classification of a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Zone {
    Inner,
    Ring,
    Outside,
}

/// Bounds reported by the host. Center and radii are always derived from the
/// current size, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn diameter(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn outer_radius(&self) -> f64 {
        self.diameter() / 2.0
    }

    pub fn inner_radius(&self, ring_width_factor: f64) -> f64 {
        self.outer_radius() * (1.0 - ring_width_factor)
    }

    pub fn zone(&self, position: Point, ring_width_factor: f64) -> Zone {
        classify_zone(
            position,
            self.center(),
            self.outer_radius(),
            self.inner_radius(ring_width_factor),
            ring_width_factor,
        )
    }
}

/// Display angle of `position` around `center`, in degrees within [0, 360).
///
/// This is the negation of the tracker's angle, folded into a single turn.
pub fn angle_of(position: Point, center: Point) -> f64 {
    let raw = (center.x - position.x).atan2(center.y - position.y);
    normalize_degrees(-raw.to_degrees())
}

fn normalize_degrees(deg: f64) -> f64 {
    let folded = deg.rem_euclid(360.0);
    if folded >= 360.0 { 0.0 } else { folded }
}

/// Ring wins on its inner edge; the tap disk uses `outer - outer * factor` rather
/// than the drag inner radius.
pub fn classify_zone(
    position: Point,
    center: Point,
    outer_radius: f64,
    inner_radius: f64,
    ring_width_factor: f64,
) -> Zone {
    if outer_radius <= 0.0 {
        return Zone::Outside;
    }

    let distance = position.distance_to(center);
    if distance >= inner_radius && distance < outer_radius {
        Zone::Ring
    } else if distance <= outer_radius - outer_radius * ring_width_factor {
        Zone::Inner
    } else {
        Zone::Outside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_scenarios() {
        let center = Point::new(100.0, 100.0);
        let cases = vec![
            (Point::new(100.0, 130.0), Zone::Ring),
            (Point::new(100.0, 105.0), Zone::Inner),
            (Point::new(100.0, 200.0), Zone::Outside),
            (Point::new(100.0, 125.0), Zone::Ring),
            (Point::new(150.0, 100.0), Zone::Outside),
            (center, Zone::Inner),
        ];

        for (position, expected) in cases {
            assert_eq!(
                classify_zone(position, center, 50.0, 25.0, 0.5),
                expected,
                "{position:?}"
            );
        }
    }

    #[test]
    fn test_zones_partition_the_plane() {
        let center = Point::new(0.0, 0.0);
        for factor in [0.0, 0.25, 0.5, 1.0] {
            let geometry = Geometry::new(100.0, 100.0);
            let outer = geometry.outer_radius();
            let inner = geometry.inner_radius(factor);

            for step in 0..=240 {
                let distance = step as f64 * 0.5;
                let position = Point::new(distance, 0.0);
                let zone = classify_zone(position, center, outer, inner, factor);

                let ring = distance >= inner && distance < outer;
                let tap = distance <= outer - outer * factor;
                let expected = match (ring, tap) {
                    (true, _) => Zone::Ring,
                    (false, true) => Zone::Inner,
                    (false, false) => Zone::Outside,
                };
                assert_eq!(zone, expected, "factor {factor}, distance {distance}");
            }
        }
    }

    #[test]
    fn test_degenerate_geometry_is_outside() {
        let geometry = Geometry::new(0.0, 120.0);
        assert_eq!(geometry.outer_radius(), 0.0);
        assert_eq!(geometry.zone(geometry.center(), 0.5), Zone::Outside);
        assert_eq!(geometry.zone(Point::new(3.0, 4.0), 0.5), Zone::Outside);
    }

    #[test]
    fn test_geometry_derivation() {
        let geometry = Geometry::new(300.0, 200.0);
        assert_eq!(geometry.center(), Point::new(150.0, 100.0));
        assert_eq!(geometry.outer_radius(), 100.0);
        assert_eq!(geometry.inner_radius(0.25), 75.0);
        assert_eq!(geometry.zone(Point::new(150.0, 20.0), 0.25), Zone::Ring);
    }

    #[test]
    fn test_display_angle() {
        let center = Point::new(100.0, 100.0);
        let cases = vec![
            (Point::new(100.0, 50.0), 0.0),
            (Point::new(150.0, 100.0), 90.0),
            (Point::new(50.0, 100.0), 270.0),
        ];
        for (position, expected) in cases {
            let angle = angle_of(position, center);
            assert!((angle - expected).abs() < 1e-9, "{position:?} -> {angle}");
        }

        let below = angle_of(Point::new(100.0, 150.0), center);
        assert!((below - 180.0).abs() < 1e-9);

        for step in 0..72 {
            let theta = (step as f64 * 5.0).to_radians();
            let position = Point::new(100.0 + 40.0 * theta.cos(), 100.0 + 40.0 * theta.sin());
            let angle = angle_of(position, center);
            assert!((0.0..360.0).contains(&angle), "{angle}");
        }
    }
}
