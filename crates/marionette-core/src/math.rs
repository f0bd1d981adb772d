use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Linear interpolation between two points.
    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Rotate this point about the origin by `angle` radians.
    ///
    /// Uses the standard 2D rotation: `x' = x·cos − y·sin`, `y' = x·sin + y·cos`.
    pub fn rotate(&self, angle: f64) -> Point2D {
        let (sin, cos) = angle.sin_cos();
        Point2D {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(&self, other: &Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2D {
    fn add_assign(&mut self, rhs: Point2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point2D {
    fn sub_assign(&mut self, rhs: Point2D) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point2D {
    type Output = Point2D;
    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Signed difference `to - from` folded into `(-π, π]`.
///
/// Adding the result to `from` reaches an angle equivalent to `to` along the
/// shorter rotational direction.
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(TAU);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: Point2D, b: Point2D) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_point_lerp() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(10.0, 20.0);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.x - 5.0).abs() < 0.001);
        assert!((mid.y - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let p = Point2D::new(3.5, -7.25);
        assert_eq!(p.rotate(0.0), p);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = Point2D::new(10.0, 0.0);
        assert!(close(p.rotate(FRAC_PI_2), Point2D::new(0.0, 10.0)));
        assert!(close(p.rotate(PI), Point2D::new(-10.0, 0.0)));
    }

    #[test]
    fn test_point_ops() {
        let mut p = Point2D::new(1.0, 2.0) + Point2D::new(3.0, 4.0);
        assert_eq!(p, Point2D::new(4.0, 6.0));
        p -= Point2D::new(1.0, 1.0);
        assert_eq!(p, Point2D::new(3.0, 5.0));
        assert_eq!(-p, Point2D::new(-3.0, -5.0));
        assert!((Point2D::new(3.0, 4.0).length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_shortest_arc() {
        assert!((shortest_arc(0.0, FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
        // 350 degrees to 10 degrees goes forward by 20 degrees.
        let from = 350f64.to_radians();
        let to = 10f64.to_radians();
        assert!((shortest_arc(from, to) - 20f64.to_radians()).abs() < 1e-9);
        assert!((shortest_arc(to, from) + 20f64.to_radians()).abs() < 1e-9);
    }
}
