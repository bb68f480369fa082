//! Vec2 / AngleDeg: 2D geometry used by the world model
//!
//! ## 좌표 규약
//! - 원점 = 센터 서클 중심, x = 상대 골 방향 (canonical frame, 항상 +x 공격)
//! - 각도 = degree, (-180, 180] 로 정규화
//! - 길이 0 벡터의 방향은 0° (NaN 금지)

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// 2D vector in pitch units.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Shorthand constructor.
#[inline]
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// Bearing of `v` in degrees. A zero-length vector yields 0°.
#[inline]
pub fn dir_deg(v: &Vec2) -> AngleDeg {
    if v.x == 0.0 && v.y == 0.0 {
        return AngleDeg::ZERO;
    }
    AngleDeg::new(v.y.atan2(v.x).to_degrees())
}

/// Vector of length `r` pointing at `dir`.
#[inline]
pub fn polar(r: f64, dir: AngleDeg) -> Vec2 {
    let rad = dir.radians();
    vec2(r * rad.cos(), r * rad.sin())
}

/// Distance from `point` to the infinite line through `origin` heading `dir`.
pub fn line_distance(origin: &Vec2, dir: AngleDeg, point: &Vec2) -> f64 {
    let rad = dir.radians();
    let rel = point - origin;
    // |rel × unit(dir)|
    (rel.x * rad.sin() - rel.y * rad.cos()).abs()
}

// ============================================================================
// AngleDeg
// ============================================================================

/// Angle in degrees, always normalized to (-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct AngleDeg(f64);

impl AngleDeg {
    pub const ZERO: Self = Self(0.0);

    pub fn new(degree: f64) -> Self {
        Self(normalize_deg(degree))
    }

    #[inline]
    pub fn degree(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    #[inline]
    pub fn abs(self) -> f64 {
        self.0.abs()
    }

    /// Opposite direction (used by the side mirror).
    #[inline]
    pub fn reversed(self) -> Self {
        Self::new(self.0 + 180.0)
    }

    /// `self` lies within `tolerance` degrees of `other`.
    #[inline]
    pub fn is_within(self, other: Self, tolerance: f64) -> bool {
        self.diff(other) <= tolerance
    }

    /// Absolute angular difference in [0, 180].
    #[inline]
    pub fn diff(self, other: Self) -> f64 {
        (self - other).abs()
    }

    /// `asin` in degrees with the argument clamped to [-1, 1].
    pub fn asin_deg(x: f64) -> f64 {
        x.clamp(-1.0, 1.0).asin().to_degrees()
    }
}

fn normalize_deg(degree: f64) -> f64 {
    if !degree.is_finite() {
        return 0.0;
    }
    let mut d = degree % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

impl From<f64> for AngleDeg {
    fn from(degree: f64) -> Self {
        Self::new(degree)
    }
}

impl From<AngleDeg> for f64 {
    fn from(angle: AngleDeg) -> Self {
        angle.0
    }
}

impl Add for AngleDeg {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl Sub for AngleDeg {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 - rhs.0)
    }
}

impl Neg for AngleDeg {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.0)
    }
}

// ============================================================================
// Rect2
// ============================================================================

/// Axis-aligned rectangle. Edges count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect2 {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect2 {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x: min_x.min(max_x), min_y: min_y.min(max_y), max_x: max_x.max(min_x), max_y: max_y.max(min_y) }
    }

    /// Rectangle centered on the origin.
    pub fn centered(half_length: f64, half_width: f64) -> Self {
        Self::new(-half_length, -half_width, half_length, half_width)
    }

    #[inline]
    pub fn contains(&self, p: &Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(self.min_x - margin, self.min_y - margin, self.max_x + margin, self.max_y + margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_normalization() {
        assert_eq!(AngleDeg::new(190.0).degree(), -170.0);
        assert_eq!(AngleDeg::new(-180.0).degree(), 180.0);
        assert_eq!(AngleDeg::new(540.0).degree(), 180.0);
        assert_eq!(AngleDeg::new(f64::NAN).degree(), 0.0);
    }

    #[test]
    fn test_angle_diff_wraps() {
        let a = AngleDeg::new(170.0);
        let b = AngleDeg::new(-170.0);
        assert!((a.diff(b) - 20.0).abs() < 1e-9);
        assert!((a.reversed().degree() + 10.0).abs() < 1e-9);
        assert!(a.is_within(b, 20.0 + 1e-9));
        assert!(!a.is_within(AngleDeg::ZERO, 90.0));
    }

    #[test]
    fn test_dir_of_zero_vector_is_zero() {
        assert_eq!(dir_deg(&Vec2::zeros()), AngleDeg::ZERO);
        assert!((dir_deg(&vec2(0.0, 2.0)).degree() - 90.0).abs() < 1e-9);
        assert!((dir_deg(&vec2(-1.0, 0.0)).degree() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_polar_roundtrip_direction() {
        let v = polar(2.0, AngleDeg::new(-45.0));
        assert!((v.norm() - 2.0).abs() < 1e-9);
        assert!((dir_deg(&v).degree() + 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_distance() {
        let d = line_distance(&vec2(0.0, 0.0), AngleDeg::ZERO, &vec2(5.0, -3.0));
        assert!((d - 3.0).abs() < 1e-9);
        let d = line_distance(&vec2(1.0, 1.0), AngleDeg::new(90.0), &vec2(4.0, 10.0));
        assert!((d - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect2::centered(52.5, 34.0);
        assert!(r.contains(&vec2(52.5, 34.0)));
        assert!(!r.contains(&vec2(52.6, 0.0)));
        assert!(r.expanded(1.0).contains(&vec2(53.4, -34.9)));
    }
}
