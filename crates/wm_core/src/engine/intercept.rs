//! Interception Predictor
//!
//! Minimum number of cycles before a player can legally control the ball,
//! given a cached ball trajectory and the player's kinematic state.
//!
//! ## Pipeline (per player)
//! 1. control radius: catchable (goalie) / kickable, shrunk for our own players
//! 2. lower bound from the distance to the ball's line of travel
//! 3. for each cached step from the lower bound:
//!    - goalie: ball must be inside the defended penalty area
//!    - cheap rejection: unreachable even at top speed
//!    - turn cycles toward the ball (from the inertia point)
//!    - dash cycles for the remaining distance
//! 4. no step succeeds => estimate against the resting point of the ball
//!
//! The result is always finite, so players can be ordered by it.
//!
//! Which position / velocity / confidence to feed in (seen vs. heard vs.
//! full state) is the caller's choice, expressed through `PlayerKinematics`.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::engine::ball_prediction::BallTrajectory;
use crate::engine::config::{PredictorConfig, ServerParams};
use crate::engine::player::Player;
use crate::engine::player_type::{PlayerTypeParams, PlayerTypeRegistry};
use crate::engine::types::{dir_deg, line_distance, AngleDeg, Rect2, Side, Vec2};

/// Kinematic input of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerKinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    pub body: AngleDeg,
    /// Unknown / unresolved => default type
    pub type_id: Option<i32>,
    /// Confidence credit (fresher observation => larger)
    pub bonus_step: u32,
    /// Remaining lockout cycles (tackle / foul)
    pub penalty_step: u32,
    /// Our own player: defends the `-x` goal, control radius is shrunk
    pub is_teammate: bool,
}

impl PlayerKinematics {
    /// Player standing still at `position`, facing `body`, no bonus or penalty.
    pub fn at_rest(position: Vec2, body: AngleDeg, is_teammate: bool) -> Self {
        Self {
            position,
            velocity: Vec2::zeros(),
            body,
            type_id: None,
            bonus_step: 0,
            penalty_step: 0,
            is_teammate,
        }
    }

    /// Kinematics of a snapshot player, seen from `our_side`.
    pub fn from_player(
        player: &Player,
        our_side: Side,
        server: &ServerParams,
        config: &PredictorConfig,
    ) -> Self {
        Self {
            position: player.position,
            velocity: player.velocity,
            body: player.body,
            type_id: player.type_id,
            bonus_step: config.bonus_step_for_age(player.ages.pos),
            penalty_step: player.lockout_remaining(server.tackle_cycles, server.foul_cycles),
            is_teammate: player.side == our_side,
        }
    }
}

/// Stateless predictor bound to one match's parameters.
#[derive(Debug, Clone, Copy)]
pub struct InterceptPredictor<'a> {
    server: &'a ServerParams,
    types: &'a PlayerTypeRegistry,
    config: &'a PredictorConfig,
}

impl<'a> InterceptPredictor<'a> {
    pub fn new(
        server: &'a ServerParams,
        types: &'a PlayerTypeRegistry,
        config: &'a PredictorConfig,
    ) -> Self {
        Self { server, types, config }
    }

    /// Predicted reach step of `kin` against `cache`.
    ///
    /// `is_goalie` switches to the catchable radius and restricts success to
    /// ball positions inside the player's own penalty area.
    pub fn predict(&self, kin: &PlayerKinematics, cache: &BallTrajectory, is_goalie: bool) -> u32 {
        let params = self.types.get(kin.type_id);
        let raw_control = params.control_radius(is_goalie);
        let control = if kin.is_teammate {
            (raw_control - self.config.teammate_control_shrink).max(0.0)
        } else {
            raw_control
        };
        let area = self.defended_penalty_area(kin.is_teammate);
        let bonus = i64::from(kin.bonus_step);
        let penalty = i64::from(kin.penalty_step);

        // ball already under control: an observation, not a prediction
        let origin = cache.origin();
        if kin.penalty_step == 0
            && (!is_goalie || area.contains(&origin))
            && (origin - kin.position).norm() <= raw_control
        {
            return 0;
        }

        let speed_max = params.speed_max();
        let first = self.lower_bound(kin, cache, control, speed_max);

        for (step, ball_pos) in cache.positions().iter().enumerate().skip(first) {
            if is_goalie && !area.contains(ball_pos) {
                continue;
            }

            let move_steps = step as i64 + bonus - penalty;
            let reach = (control + speed_max * move_steps as f64 + self.config.reach_margin).max(0.0);
            if reach * reach < (ball_pos - kin.position).norm_squared() {
                continue;
            }

            if self.can_reach_after_turn_dash(kin, params, control, ball_pos, step as u32) {
                trace!(step, is_goalie, "intercept step found");
                return step as u32;
            }
        }

        self.final_point_estimate(kin, params, cache, is_goalie, control, &area)
    }

    /// Steps below this are skipped without simulation.
    fn lower_bound(
        &self,
        kin: &PlayerKinematics,
        cache: &BallTrajectory,
        control: f64,
        speed_max: f64,
    ) -> usize {
        let perpendicular = line_distance(&cache.origin(), cache.direction(), &kin.position);
        let base = ((perpendicular - control).max(0.0) / speed_max.max(1.0e-6)).floor() as i64;
        let bound = base - i64::from(kin.bonus_step) + i64::from(kin.penalty_step);
        bound.max(0) as usize
    }

    fn can_reach_after_turn_dash(
        &self,
        kin: &PlayerKinematics,
        params: &PlayerTypeParams,
        control: f64,
        ball_pos: &Vec2,
        step: u32,
    ) -> bool {
        let inertia = params.inertia_point(&kin.position, &kin.velocity, step);
        let to_ball = ball_pos - inertia;
        let dist = to_ball.norm();

        let n_turn = self.predict_turn_cycles(kin, params, control, &to_ball, dist);
        let available = i64::from(step) - i64::from(n_turn) - i64::from(kin.penalty_step);
        if available < 0 {
            return false;
        }

        let remaining = dist - control;
        if remaining <= 0.0 {
            return true;
        }

        let n_dash = i64::from(params.cycles_to_reach_distance(remaining));
        let credit = (i64::from(kin.bonus_step) - i64::from(n_turn)).max(0);
        n_dash - credit <= available
    }

    /// Turns needed before the body points at the ball (within tolerance).
    fn predict_turn_cycles(
        &self,
        kin: &PlayerKinematics,
        params: &PlayerTypeParams,
        control: f64,
        to_ball: &Vec2,
        dist: f64,
    ) -> u32 {
        if dist <= control {
            // already inside the control radius: any heading will do
            return 0;
        }

        let tolerance = AngleDeg::asin_deg(control / dist).max(self.config.min_turn_tolerance_deg);
        let mut angle_error = dir_deg(to_ball).diff(kin.body);
        if dist < self.config.back_dash_dist && angle_error > 90.0 {
            angle_error = 180.0 - angle_error;
        }

        let mut speed = kin.velocity.norm();
        let mut n_turn = 0;
        while angle_error > tolerance && n_turn < self.config.max_turn_iterations {
            angle_error -= params.effective_turn(self.server.max_moment, speed);
            speed *= params.decay();
            n_turn += 1;
        }
        n_turn
    }

    /// Estimate against the last cached position, treated as where the ball comes to rest.
    fn final_point_estimate(
        &self,
        kin: &PlayerKinematics,
        params: &PlayerTypeParams,
        cache: &BallTrajectory,
        is_goalie: bool,
        control: f64,
        area: &Rect2,
    ) -> u32 {
        let ball_pos = cache.last();
        // a goalie gets no catch credit outside the box
        let control = if is_goalie && !area.contains(&ball_pos) {
            let kickable = params.control_radius(false);
            if kin.is_teammate {
                (kickable - self.config.teammate_control_shrink).max(0.0)
            } else {
                kickable
            }
        } else {
            control
        };

        let inertia = params.inertia_point(&kin.position, &kin.velocity, self.config.fallback_steps);
        let to_ball = ball_pos - inertia;
        let dist = to_ball.norm();

        let n_turn = self.predict_turn_cycles(kin, params, control, &to_ball, dist);
        let remaining = dist - control;
        let n_dash = if remaining > 0.0 { params.cycles_to_reach_distance(remaining) } else { 0 };

        let estimate = i64::from(n_turn) + i64::from(n_dash) - i64::from(kin.bonus_step)
            + i64::from(kin.penalty_step);
        let window_end = cache.len().saturating_sub(1) as i64;
        let step = estimate.max(window_end);
        trace!(step, n_turn, n_dash, "intercept fallback to resting point");
        u32::try_from(step).unwrap_or(u32::MAX)
    }

    fn defended_penalty_area(&self, is_teammate: bool) -> Rect2 {
        if is_teammate {
            self.server.our_penalty_area()
        } else {
            self.server.their_penalty_area()
        }
    }
}
