#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::new(100.0, 100.0);
        let b = Point::new(130.0, 140.0);
        assert_eq!(a.distance_to(b), 50.0);
        assert_eq!(b.distance_to(a), 50.0);
        assert_eq!(a.distance_to(a), 0.0);
    }
}
