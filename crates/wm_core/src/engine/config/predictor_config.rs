//! Interception predictor and trajectory cache tuning

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::{intercept, trajectory};
use crate::engine::types::Rect2;

/// How the builder walks the player list when predicting reach steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// One player after another; honours a deadline between players.
    #[default]
    Sequential,
    /// All players at once on the rayon pool; the deadline is checked per player.
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Slack added to the reachable radius before the cheap rejection
    pub reach_margin: f64,
    /// Control radius reduction for our own players (bias toward the opponent)
    pub teammate_control_shrink: f64,
    /// Minimum facing tolerance in degrees
    pub min_turn_tolerance_deg: f64,
    /// Within this distance a >90° heading error is folded into a back dash
    pub back_dash_dist: f64,
    /// Bonus granted to a player observed this very cycle
    pub max_bonus_step: u32,
    /// Inertia horizon for the resting-point fallback
    pub fallback_steps: u32,
    pub max_turn_iterations: u32,
    pub evaluation: EvaluationMode,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            reach_margin: intercept::REACH_MARGIN,
            teammate_control_shrink: intercept::TEAMMATE_CONTROL_SHRINK,
            min_turn_tolerance_deg: intercept::MIN_TURN_TOLERANCE_DEG,
            back_dash_dist: intercept::BACK_DASH_DIST,
            max_bonus_step: intercept::MAX_BONUS_STEP,
            fallback_steps: intercept::FALLBACK_STEPS,
            max_turn_iterations: intercept::MAX_TURN_ITERATIONS,
            evaluation: EvaluationMode::Sequential,
        }
    }
}

impl PredictorConfig {
    /// Bonus step for a position last refreshed `pos_age` cycles ago.
    ///
    /// Fresh observation => larger bonus (0..=max_bonus_step).
    pub fn bonus_step_for_age(&self, pos_age: u32) -> u32 {
        self.max_bonus_step.saturating_sub(pos_age)
    }
}

/// Region outside of which the trajectory cache stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TrajectoryBounds {
    /// Pitch rectangle expanded by `margin`
    Pitch { margin: f64 },
    /// Fixed keep-away training area centered on the origin
    KeepAway { half_length: f64, half_width: f64 },
}

impl Default for TrajectoryBounds {
    fn default() -> Self {
        TrajectoryBounds::Pitch { margin: trajectory::PITCH_MARGIN }
    }
}

impl TrajectoryBounds {
    pub fn keepaway() -> Self {
        TrajectoryBounds::KeepAway {
            half_length: trajectory::KEEPAWAY_HALF_LENGTH,
            half_width: trajectory::KEEPAWAY_HALF_WIDTH,
        }
    }

    /// Resolve to a rectangle given the pitch rectangle.
    pub fn rect(&self, pitch: &Rect2) -> Rect2 {
        match *self {
            TrajectoryBounds::Pitch { margin } => pitch.expanded(margin),
            TrajectoryBounds::KeepAway { half_length, half_width } => {
                Rect2::centered(half_length, half_width)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Hard upper bound on cached steps (step 0 = current position)
    pub max_steps: usize,
    /// Cache at least this many steps before a slow ball may stop it
    pub min_steps: usize,
    pub stop_speed: f64,
    pub bounds: TrajectoryBounds,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            max_steps: trajectory::MAX_STEPS,
            min_steps: trajectory::MIN_STEPS,
            stop_speed: trajectory::STOP_SPEED,
            bounds: TrajectoryBounds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_step_decreases_with_age() {
        let cfg = PredictorConfig::default();
        assert_eq!(cfg.bonus_step_for_age(0), 3);
        assert_eq!(cfg.bonus_step_for_age(2), 1);
        assert_eq!(cfg.bonus_step_for_age(9), 0);
    }

    #[test]
    fn test_bounds_resolution() {
        let pitch = Rect2::centered(52.5, 34.0);
        let r = TrajectoryBounds::default().rect(&pitch);
        assert!((r.max_x - 57.5).abs() < 1e-9);
        let k = TrajectoryBounds::keepaway().rect(&pitch);
        assert!((k.max_y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_yaml() {
        let b: TrajectoryBounds =
            serde_yaml::from_str("kind: keep_away\nhalf_length: 12.0\nhalf_width: 8.0\n").unwrap();
        assert_eq!(b, TrajectoryBounds::KeepAway { half_length: 12.0, half_width: 8.0 });
    }
}
