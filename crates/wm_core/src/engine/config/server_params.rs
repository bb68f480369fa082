//! Simulator-wide parameters
//!
//! One instance per match. Everything the builder and the predictor need to
//! know about the pitch, the ball and the rules, independent of player type.

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::{ball, command, pitch, tackle};
use crate::engine::types::Rect2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerParams {
    pub pitch_half_length: f64,
    pub pitch_half_width: f64,
    pub penalty_area_length: f64,
    pub penalty_area_half_width: f64,
    /// Per-cycle ball velocity retention
    pub ball_decay: f64,
    pub ball_speed_max: f64,
    pub max_moment: f64,
    pub max_dash_power: f64,
    pub tackle_dist: f64,
    pub tackle_width: f64,
    /// Lockout after a tackle (cycles)
    pub tackle_cycles: u32,
    /// Lockout after a foul charge (cycles)
    pub foul_cycles: u32,
}

impl Default for ServerParams {
    fn default() -> Self {
        Self {
            pitch_half_length: pitch::HALF_LENGTH,
            pitch_half_width: pitch::HALF_WIDTH,
            penalty_area_length: pitch::PENALTY_AREA_LENGTH,
            penalty_area_half_width: pitch::PENALTY_AREA_HALF_WIDTH,
            ball_decay: ball::DECAY,
            ball_speed_max: ball::SPEED_MAX,
            max_moment: command::MAX_MOMENT,
            max_dash_power: command::MAX_DASH_POWER,
            tackle_dist: tackle::DIST,
            tackle_width: tackle::WIDTH,
            tackle_cycles: tackle::CYCLES,
            foul_cycles: tackle::FOUL_CYCLES,
        }
    }
}

impl ServerParams {
    /// Pitch rectangle (touchlines and goal lines inclusive).
    pub fn pitch_rect(&self) -> Rect2 {
        Rect2::centered(self.pitch_half_length, self.pitch_half_width)
    }

    /// Penalty area in front of the goal at `-x` (our goal in the canonical frame).
    pub fn our_penalty_area(&self) -> Rect2 {
        Rect2::new(
            -self.pitch_half_length,
            -self.penalty_area_half_width,
            -self.pitch_half_length + self.penalty_area_length,
            self.penalty_area_half_width,
        )
    }

    /// Penalty area in front of the goal at `+x`.
    pub fn their_penalty_area(&self) -> Rect2 {
        Rect2::new(
            self.pitch_half_length - self.penalty_area_length,
            -self.penalty_area_half_width,
            self.pitch_half_length,
            self.penalty_area_half_width,
        )
    }

    /// Distance at which a tackle can still touch the ball.
    pub fn tacklable_radius(&self, epsilon: f64) -> f64 {
        self.tackle_dist.hypot(self.tackle_width) + epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::vec2;

    #[test]
    fn test_penalty_areas_are_mirrored() {
        let sp = ServerParams::default();
        let ours = sp.our_penalty_area();
        let theirs = sp.their_penalty_area();
        assert!((ours.min_x + theirs.max_x).abs() < 1e-9);
        assert!(ours.contains(&vec2(-50.0, 10.0)));
        assert!(!ours.contains(&vec2(-30.0, 0.0)));
        assert!(theirs.contains(&vec2(40.0, -20.0)));
    }

    #[test]
    fn test_tacklable_radius() {
        let sp = ServerParams::default();
        let r = sp.tacklable_radius(1.0e-5);
        assert!((r - (2.0_f64.powi(2) + 1.25_f64.powi(2)).sqrt() - 1.0e-5).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let sp: ServerParams = serde_json::from_str(r#"{ "ball_decay": 0.9 }"#).unwrap();
        assert!((sp.ball_decay - 0.9).abs() < 1e-12);
        assert_eq!(sp.tackle_cycles, 10);
    }
}
