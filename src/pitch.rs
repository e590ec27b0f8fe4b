use serde::{Deserialize, Serialize};

pub const PITCH_LENGTH_M: f64 = 105.0;
pub const PITCH_WIDTH_M: f64 = 68.0;

/// Normalized pitch position, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

pub fn to_meters(point: Point) -> (f64, f64) {
    (point.x * PITCH_LENGTH_M, point.y * PITCH_WIDTH_M)
}

pub fn distance_m(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x) * PITCH_LENGTH_M;
    let dy = (a.y - b.y) * PITCH_WIDTH_M;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::{Point, distance_m, to_meters};

    #[test]
    fn scales_each_axis_by_its_own_dimension() {
        let (x, y) = to_meters(Point::new(1.0, 1.0));
        assert_eq!(x, 105.0);
        assert_eq!(y, 68.0);
    }

    #[test]
    fn distance_matches_closed_form() {
        let a = Point::new(0.52, 0.31);
        let b = Point::new(0.49, 0.36);
        let expected = ((0.03_f64 * 105.0).powi(2) + (-0.05_f64 * 68.0).powi(2)).sqrt();
        assert!((distance_m(a, b) - expected).abs() < 1e-9);
        assert!((distance_m(b, a) - expected).abs() < 1e-9);
    }

    #[test]
    fn full_length_is_pitch_length() {
        let d = distance_m(Point::new(0.0, 0.5), Point::new(1.0, 0.5));
        assert!((d - 105.0).abs() < 1e-9);
    }
}
