//! Coordinate perspective (simulator frame ↔ canonical frame)
//!
//! ## 좌표계
//! **External / simulator frame**: Left 팀이 +x 로 공격
//! **Canonical frame**: 항상 "우리 팀이 +x 로 공격"
//!
//! 우리 팀이 Right 이면 위치/속도의 x, y 를 모두 뒤집고 각도에 180° 를 더한다.
//! 빌더 내부 계산은 전부 canonical frame 에서 하고, 외부로 내보낼 때만 되돌린다.

use serde::{Deserialize, Serialize};

use crate::engine::types::{AngleDeg, Side, Vec2};

/// Which side "we" play on, and therefore whether to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    our_side: Side,
}

impl Default for Perspective {
    fn default() -> Self {
        Self::for_side(Side::Left)
    }
}

impl Perspective {
    /// Neutral is treated like Left (no mirroring).
    pub fn for_side(our_side: Side) -> Self {
        Self { our_side }
    }

    #[inline]
    pub fn our_side(&self) -> Side {
        self.our_side
    }

    #[inline]
    pub fn their_side(&self) -> Side {
        self.our_side.opposite()
    }

    #[inline]
    pub fn is_mirrored(&self) -> bool {
        self.our_side == Side::Right
    }

    // ===========================================
    // External → canonical
    // ===========================================

    #[inline]
    pub fn to_canonical_point(&self, p: Vec2) -> Vec2 {
        if self.is_mirrored() {
            -p
        } else {
            p
        }
    }

    #[inline]
    pub fn to_canonical_vector(&self, v: Vec2) -> Vec2 {
        self.to_canonical_point(v)
    }

    #[inline]
    pub fn to_canonical_angle(&self, a: AngleDeg) -> AngleDeg {
        if self.is_mirrored() {
            a.reversed()
        } else {
            a
        }
    }

    // ===========================================
    // Canonical → external (the mirror is an involution)
    // ===========================================

    #[inline]
    pub fn to_external_point(&self, p: Vec2) -> Vec2 {
        self.to_canonical_point(p)
    }

    #[inline]
    pub fn to_external_vector(&self, v: Vec2) -> Vec2 {
        self.to_canonical_vector(v)
    }

    #[inline]
    pub fn to_external_angle(&self, a: AngleDeg) -> AngleDeg {
        self.to_canonical_angle(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::vec2;

    #[test]
    fn test_left_is_identity() {
        let p = Perspective::for_side(Side::Left);
        assert!(!p.is_mirrored());
        assert_eq!(p.to_canonical_point(vec2(10.0, -3.0)), vec2(10.0, -3.0));
        assert_eq!(p.to_canonical_angle(AngleDeg::new(30.0)), AngleDeg::new(30.0));
    }

    #[test]
    fn test_right_mirrors_everything() {
        let p = Perspective::for_side(Side::Right);
        assert_eq!(p.their_side(), Side::Left);
        assert_eq!(p.to_canonical_point(vec2(10.0, -3.0)), vec2(-10.0, 3.0));
        assert_eq!(p.to_canonical_vector(vec2(0.5, 0.0)), vec2(-0.5, 0.0));
        assert!((p.to_canonical_angle(AngleDeg::new(30.0)).degree() + 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_external_undoes_canonical() {
        let p = Perspective::for_side(Side::Right);
        let pos = vec2(-40.0, 12.5);
        let angle = AngleDeg::new(-120.0);
        assert_eq!(p.to_external_point(p.to_canonical_point(pos)), pos);
        assert!(p.to_external_angle(p.to_canonical_angle(angle)).diff(angle) < 1e-9);
    }
}
