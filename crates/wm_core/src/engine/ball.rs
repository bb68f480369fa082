//! Ball entity snapshot

use serde::{Deserialize, Serialize};

use crate::engine::observation::BallObservation;
use crate::engine::types::Vec2;

/// Ball state owned by one world snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Cycles since the position was last observed (0 = this cycle)
    pub pos_age: u32,
    /// Cycles since the velocity was last observed
    pub vel_age: u32,
}

impl Default for Ball {
    fn default() -> Self {
        Self { position: Vec2::zeros(), velocity: Vec2::zeros(), pos_age: 0, vel_age: 0 }
    }
}

impl Ball {
    pub fn observed(obs: &BallObservation) -> Self {
        Self { position: obs.position, velocity: obs.velocity, pos_age: 0, vel_age: 0 }
    }

    /// One cycle of ballistic motion from `self`.
    pub fn propagated(&self, decay: f64) -> Self {
        Self {
            position: self.position + self.velocity,
            velocity: self.velocity * decay,
            pos_age: self.pos_age.saturating_add(1),
            vel_age: self.vel_age.saturating_add(1),
        }
    }

    /// Ball that has never been seen: origin, at rest, maximally stale.
    pub fn unknown() -> Self {
        Self { pos_age: u32::MAX, vel_age: u32::MAX, ..Self::default() }
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::vec2;

    #[test]
    fn test_propagation_ages_ball() {
        let ball = Ball::observed(&BallObservation { position: vec2(1.0, 2.0), velocity: vec2(2.0, 0.0) });
        let next = ball.propagated(0.94);
        assert_eq!(next.position, vec2(3.0, 2.0));
        assert!((next.velocity.x - 1.88).abs() < 1e-9);
        assert_eq!(next.pos_age, 1);
        assert_eq!(Ball::unknown().propagated(0.94).pos_age, u32::MAX);
    }
}
