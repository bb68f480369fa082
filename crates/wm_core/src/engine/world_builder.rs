//! World Snapshot Builder
//!
//! Turns one cycle's observation (plus the previous snapshot, if any) into a
//! new immutable `WorldSnapshot`.
//!
//! ## Pipeline
//! 1. ball: observed, or propagated ballistically from the previous snapshot
//! 2. players: identity resolution (clone + overwrite / fresh), malformed
//!    identities dropped with a diagnostic, unseen players carried forward
//! 3. ball trajectory cache (once per cycle)
//! 4. reach step per player (goalies: min of field / goalie mode)
//! 5. stable sort by reach step, unum slots, fastest-intercept refs
//! 6. offside lines
//! 7. kicker attribution (on the final player order)
//!
//! Everything runs in the canonical frame (we attack toward +x).

use std::collections::HashSet;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::engine::ball::Ball;
use crate::engine::ball_prediction::BallTrajectory;
use crate::engine::config::{EvaluationMode, WorldModelConfig};
use crate::engine::coordinates::Perspective;
use crate::engine::intercept::{InterceptPredictor, PlayerKinematics};
use crate::engine::kicker::KickerHeuristic;
use crate::engine::observation::{BallObservation, CycleObservation, PlayerObservation};
use crate::engine::offside::{offside_line_for_attack_toward_negative, offside_line_for_attack_toward_positive};
use crate::engine::player::Player;
use crate::engine::player_type::PlayerTypeRegistry;
use crate::engine::sort_keys::reach_key;
use crate::engine::types::{PlayerRef, Side, Unum};
use crate::engine::world_snapshot::{TeamSlots, WorldSnapshot};
use crate::error::ObservationError;

/// Builds snapshots for one agent (fixed side, fixed match parameters).
#[derive(Debug, Clone)]
pub struct WorldBuilder {
    config: WorldModelConfig,
    types: PlayerTypeRegistry,
    perspective: Perspective,
    self_unum: Option<Unum>,
}

impl WorldBuilder {
    pub fn new(our_side: Side, config: WorldModelConfig) -> Self {
        let types = config.player_type_registry();
        Self { config, types, perspective: Perspective::for_side(our_side), self_unum: None }
    }

    /// Uniform number of the agent itself; out-of-range values are ignored.
    pub fn with_self_unum(mut self, unum: u8) -> Self {
        self.self_unum = Unum::new(unum);
        self
    }

    #[inline]
    pub fn config(&self) -> &WorldModelConfig {
        &self.config
    }

    #[inline]
    pub fn player_types(&self) -> &PlayerTypeRegistry {
        &self.types
    }

    #[inline]
    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    /// Predictor bound to this builder's parameters (for "what if" queries).
    pub fn predictor(&self) -> InterceptPredictor<'_> {
        InterceptPredictor::new(&self.config.server, &self.types, &self.config.predictor)
    }

    pub fn build(&self, observation: &CycleObservation, previous: Option<&WorldSnapshot>) -> WorldSnapshot {
        self.build_inner(observation, previous, None)
    }

    /// Like [`build`](Self::build), but stops predicting once `deadline` passes.
    ///
    /// Players skipped this way keep `predicted_reach_step = None` and sort last.
    pub fn build_with_deadline(
        &self,
        observation: &CycleObservation,
        previous: Option<&WorldSnapshot>,
        deadline: Instant,
    ) -> WorldSnapshot {
        self.build_inner(observation, previous, Some(deadline))
    }

    fn build_inner(
        &self,
        observation: &CycleObservation,
        previous: Option<&WorldSnapshot>,
        deadline: Option<Instant>,
    ) -> WorldSnapshot {
        let ball = self.resolve_ball(observation, previous);
        let (mut players, diagnostics) = self.resolve_players(observation, previous);

        let trajectory =
            BallTrajectory::compute(ball.position, ball.velocity, &self.config.server, &self.config.trajectory);

        self.predict_reach_steps(&mut players, &trajectory, deadline);

        // stable: equal reach steps keep enumeration order
        players.sort_by_key(|p| reach_key(p.predicted_reach_step));

        let our_side = self.perspective.our_side();
        let mut teammate_slots: TeamSlots = [None; 11];
        let mut opponent_slots: TeamSlots = [None; 11];
        let mut teammates_by_reach = Vec::new();
        let mut opponents_by_reach = Vec::new();
        for (idx, player) in players.iter().enumerate() {
            let Some(unum) = player.unum else { continue };
            if player.side == our_side {
                teammate_slots[unum.index()] = Some(PlayerRef(idx));
                teammates_by_reach.push(PlayerRef(idx));
            } else {
                opponent_slots[unum.index()] = Some(PlayerRef(idx));
                opponents_by_reach.push(PlayerRef(idx));
            }
        }

        let evaluated = |r: &&PlayerRef| players[r.0].predicted_reach_step.is_some();
        let fastest_intercept_player =
            players.first().filter(|p| p.predicted_reach_step.is_some()).map(|_| PlayerRef(0));
        let fastest_intercept_teammate = teammates_by_reach.iter().find(evaluated).copied();
        let fastest_intercept_opponent = opponents_by_reach.iter().find(evaluated).copied();

        let our_offside_line_x = offside_line_for_attack_toward_negative(
            players.iter().filter(|p| p.side == our_side).map(|p| p.position.x),
        );
        let their_offside_line_x = offside_line_for_attack_toward_positive(
            players.iter().filter(|p| p.side != our_side).map(|p| p.position.x),
        );

        let attribution = KickerHeuristic::new(&self.config.server, &self.types, &self.config.kicker).attribute(
            &players,
            &ball,
            &observation.play_mode,
            previous,
        );

        debug!(
            cycle = observation.cycle,
            players = players.len(),
            dropped = diagnostics.len(),
            trajectory_len = trajectory.len(),
            "world snapshot built"
        );

        WorldSnapshot {
            cycle: observation.cycle,
            perspective: self.perspective,
            self_unum: self.self_unum,
            play_mode: observation.play_mode,
            ball,
            ball_trajectory: trajectory,
            players,
            teammate_slots,
            opponent_slots,
            teammates_by_reach,
            opponents_by_reach,
            our_offside_line_x,
            their_offside_line_x,
            kicker: attribution.kicker,
            kicker_side: attribution.kicker_side,
            kicker_candidates: attribution.candidates,
            fastest_intercept_player,
            fastest_intercept_teammate,
            fastest_intercept_opponent,
            diagnostics,
        }
    }

    // ===========================================
    // Ball
    // ===========================================

    fn resolve_ball(&self, observation: &CycleObservation, previous: Option<&WorldSnapshot>) -> Ball {
        match (&observation.ball, previous) {
            (Some(obs), _) => Ball::observed(&BallObservation {
                position: self.perspective.to_canonical_point(obs.position),
                velocity: self.perspective.to_canonical_vector(obs.velocity),
            }),
            (None, Some(prev)) => prev.ball().propagated(self.config.server.ball_decay),
            (None, None) => Ball::unknown(),
        }
    }

    // ===========================================
    // Players
    // ===========================================

    fn resolve_players(
        &self,
        observation: &CycleObservation,
        previous: Option<&WorldSnapshot>,
    ) -> (Vec<Player>, Vec<ObservationError>) {
        let mut players = Vec::with_capacity(observation.players.len());
        let mut diagnostics = Vec::new();
        let mut seen: HashSet<(Side, Unum)> = HashSet::new();

        for raw in &observation.players {
            if !raw.side.is_assigned() {
                self.drop_entity(&mut diagnostics, ObservationError::UnassignedSide { unum: raw.unum });
                continue;
            }

            let unum = match raw.unum {
                None => None,
                Some(n) => match Unum::new(n) {
                    Some(unum) => Some(unum),
                    None => {
                        self.drop_entity(&mut diagnostics, ObservationError::UnumOutOfRange { side: raw.side, unum: n });
                        continue;
                    }
                },
            };

            let obs = self.to_canonical(raw);
            let player = match unum {
                Some(unum) => {
                    if !seen.insert((obs.side, unum)) {
                        self.drop_entity(
                            &mut diagnostics,
                            ObservationError::DuplicateIdentity { side: obs.side, unum: unum.get() },
                        );
                        continue;
                    }
                    match previous.and_then(|prev| prev.find_player(obs.side, unum)) {
                        Some(prev_player) => {
                            let mut player = prev_player.clone();
                            player.apply_observation(&obs);
                            player
                        }
                        None => Player::fresh(Some(unum), &obs),
                    }
                }
                None => Player::fresh(None, &obs),
            };
            players.push(player);
        }

        if let Some(prev) = previous {
            self.carry_forward_unseen(prev, &seen, &mut players);
        }

        (players, diagnostics)
    }

    /// Previous players missing from this observation, moved by inertia.
    fn carry_forward_unseen(&self, previous: &WorldSnapshot, seen: &HashSet<(Side, Unum)>, players: &mut Vec<Player>) {
        for prev_player in previous.players() {
            let Some(identity) = prev_player.identity() else { continue };
            if seen.contains(&identity) {
                continue;
            }
            if prev_player.ages.seen.saturating_add(1) > self.config.max_unseen_cycles {
                debug!(side = ?identity.0, unum = identity.1.get(), "forgetting unseen player");
                continue;
            }
            let mut player = prev_player.clone();
            player.carry_forward(self.types.get(player.type_id));
            players.push(player);
        }
    }

    fn to_canonical(&self, raw: &PlayerObservation) -> PlayerObservation {
        if !self.perspective.is_mirrored() {
            return raw.clone();
        }
        let p = &self.perspective;
        PlayerObservation {
            position: p.to_canonical_point(raw.position),
            velocity: raw.velocity.map(|v| p.to_canonical_vector(v)),
            body_angle: raw.body_angle.map(|a| p.to_canonical_angle(a)),
            face_angle: raw.face_angle.map(|a| p.to_canonical_angle(a)),
            pointing: raw.pointing.map(|a| p.to_canonical_angle(a)),
            ..raw.clone()
        }
    }

    fn drop_entity(&self, diagnostics: &mut Vec<ObservationError>, err: ObservationError) {
        let (side, unum) = err.identity();
        warn!(?side, ?unum, %err, "dropping player observation");
        diagnostics.push(err);
    }

    // ===========================================
    // Reach steps
    // ===========================================

    fn predict_reach_steps(&self, players: &mut [Player], trajectory: &BallTrajectory, deadline: Option<Instant>) {
        let predictor = self.predictor();
        let our_side = self.perspective.our_side();
        let server = &self.config.server;
        let config = &self.config.predictor;

        let evaluate = |player: &mut Player| {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return false;
            }
            let kin = PlayerKinematics::from_player(player, our_side, server, config);
            let mut step = predictor.predict(&kin, trajectory, false);
            if player.is_goalie {
                step = step.min(predictor.predict(&kin, trajectory, true));
            }
            trace!(side = ?player.side, unum = ?player.unum.map(Unum::get), step, "reach step");
            player.predicted_reach_step = Some(step);
            true
        };

        let evaluated = match config.evaluation {
            EvaluationMode::Sequential => {
                let mut count = 0;
                for player in players.iter_mut() {
                    if !evaluate(player) {
                        break;
                    }
                    count += 1;
                }
                count
            }
            EvaluationMode::Parallel => players.par_iter_mut().map(evaluate).filter(|done| *done).count(),
        };

        if evaluated < players.len() {
            debug!(evaluated, skipped = players.len() - evaluated, "deadline reached during reach prediction");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{vec2, AngleDeg, Card, Vec2};

    fn builder(side: Side) -> WorldBuilder {
        WorldBuilder::new(side, WorldModelConfig::default())
    }

    fn left(unum: u8, x: f64, y: f64) -> PlayerObservation {
        PlayerObservation::new(Side::Left, Some(unum), vec2(x, y)).with_velocity(Vec2::zeros()).with_body(AngleDeg::ZERO)
    }

    fn right(unum: u8, x: f64, y: f64) -> PlayerObservation {
        PlayerObservation::new(Side::Right, Some(unum), vec2(x, y)).with_velocity(Vec2::zeros()).with_body(AngleDeg::ZERO)
    }

    #[test]
    fn test_incoming_ball_fixture_end_to_end() {
        // fresh observation => full bonus step
        let obs = CycleObservation::new(1).with_ball(vec2(0.0, 0.0), vec2(1.0, 0.0)).with_player(left(5, 5.0, 0.0));
        let snap = builder(Side::Left).build(&obs, None);
        let unum = Unum::new(5).unwrap();
        assert_eq!(snap.teammate(unum).unwrap().predicted_reach_step, Some(2));
        assert_eq!(snap.fastest_intercept_teammate(), Some(PlayerRef(0)));
        assert_eq!(snap.fastest_intercept_opponent(), None);
    }

    #[test]
    fn test_right_side_is_mirrored_into_canonical_frame() {
        let obs = CycleObservation::new(1).with_ball(vec2(0.0, 0.0), vec2(-1.0, 0.0)).with_player(
            PlayerObservation::new(Side::Right, Some(5), vec2(-5.0, 0.0))
                .with_velocity(Vec2::zeros())
                .with_body(AngleDeg::new(180.0)),
        );
        let snap = builder(Side::Right).build(&obs, None);
        let me = snap.teammate(Unum::new(5).unwrap()).unwrap();
        assert_eq!(me.position, vec2(5.0, 0.0));
        assert!(me.body.diff(AngleDeg::ZERO) < 1e-9);
        assert_eq!(snap.ball().velocity, vec2(1.0, 0.0));
        assert_eq!(me.predicted_reach_step, Some(2));
        assert_eq!(snap.external_position(me), vec2(-5.0, 0.0));
    }

    #[test]
    fn test_cloning_continuity() {
        let b = builder(Side::Left);
        let mut first = left(7, 10.0, 0.0);
        first.card = Some(Card::Yellow);
        first.type_id = Some(3);
        let s1 = b.build(&CycleObservation::new(1).with_ball(Vec2::zeros(), Vec2::zeros()).with_player(first), None);

        let degraded = PlayerObservation::new(Side::Left, Some(7), vec2(10.5, 0.0));
        let s2 = b.build(&CycleObservation::new(2).with_ball(Vec2::zeros(), Vec2::zeros()).with_player(degraded), Some(&s1));

        let unum = Unum::new(7).unwrap();
        let p1 = s1.teammate(unum).unwrap();
        let p2 = s2.teammate(unum).unwrap();
        assert!(!std::ptr::eq(p1, p2));
        assert_eq!(p2.card, Card::Yellow);
        assert_eq!(p2.type_id, Some(3));
        assert_eq!(p2.position, vec2(10.5, 0.0));
        assert_eq!(p2.ages.body, 1);
        // previous snapshot untouched
        assert_eq!(p1.position, vec2(10.0, 0.0));
    }

    #[test]
    fn test_malformed_identities_are_dropped() {
        let obs = CycleObservation::new(1)
            .with_ball(Vec2::zeros(), Vec2::zeros())
            .with_player(left(14, 1.0, 1.0))
            .with_player(PlayerObservation::new(Side::Neutral, Some(3), vec2(2.0, 2.0)))
            .with_player(left(4, 3.0, 3.0))
            .with_player(left(4, 3.5, 3.0))
            .with_player(PlayerObservation::new(Side::Right, None, vec2(-4.0, 0.0)));
        let snap = builder(Side::Left).build(&obs, None);

        assert_eq!(snap.players().len(), 2);
        assert_eq!(snap.diagnostics().len(), 3);
        assert!(snap.diagnostics().contains(&ObservationError::UnumOutOfRange { side: Side::Left, unum: 14 }));
        assert!(snap.diagnostics().contains(&ObservationError::UnassignedSide { unum: Some(3) }));
        assert!(snap.diagnostics().contains(&ObservationError::DuplicateIdentity { side: Side::Left, unum: 4 }));
        // first record of a duplicate wins
        assert_eq!(snap.teammate(Unum::new(4).unwrap()).unwrap().position, vec2(3.0, 3.0));
        // unknown unum: kept, not slotted
        assert_eq!(snap.opponents().count(), 0);
        assert!(snap.players().iter().any(|p| p.unum.is_none()));
    }

    #[test]
    fn test_missing_ball_is_propagated() {
        let b = builder(Side::Left);
        let first = b.build(&CycleObservation::new(0), None);
        assert_eq!(first.ball().pos_age, u32::MAX);

        let s1 = b.build(&CycleObservation::new(1).with_ball(vec2(1.0, 2.0), vec2(2.0, 0.0)), None);
        let s2 = b.build(&CycleObservation::new(2), Some(&s1));
        assert_eq!(s2.ball().position, vec2(3.0, 2.0));
        assert!((s2.ball().velocity.x - 1.88).abs() < 1e-9);
        assert_eq!(s2.ball().pos_age, 1);
    }

    #[test]
    fn test_unseen_players_carried_then_forgotten() {
        let mut cfg = WorldModelConfig::default();
        cfg.max_unseen_cycles = 2;
        let b = WorldBuilder::new(Side::Left, cfg);
        let ball = |c: u32| CycleObservation::new(c).with_ball(Vec2::zeros(), Vec2::zeros());
        let unum = Unum::new(9).unwrap();

        let s1 = b.build(&ball(1).with_player(left(9, 1.0, 2.0).with_velocity(vec2(0.5, 0.0))), None);
        let s2 = b.build(&ball(2), Some(&s1));
        let carried = s2.teammate(unum).unwrap();
        assert!((carried.position.x - 1.5).abs() < 1e-9);
        assert_eq!(carried.ages.seen, 1);

        let s3 = b.build(&ball(3), Some(&s2));
        assert_eq!(s3.teammate(unum).unwrap().ages.seen, 2);
        let s4 = b.build(&ball(4), Some(&s3));
        assert!(s4.teammate(unum).is_none());
    }

    #[test]
    fn test_players_sorted_by_reach_step() {
        let obs = CycleObservation::new(1)
            .with_ball(vec2(0.0, 0.0), Vec2::zeros())
            .with_player(left(2, -20.0, 0.0))
            .with_player(right(6, 8.0, 0.0))
            .with_player(left(3, 2.0, 0.0))
            .with_player(right(9, 30.0, 5.0));
        let snap = builder(Side::Left).build(&obs, None);

        let steps: Vec<u32> = snap.players().iter().filter_map(|p| p.predicted_reach_step).collect();
        assert_eq!(steps.len(), 4);
        assert!(steps.windows(2).all(|w| w[0] <= w[1]));

        let fastest = snap.player(snap.fastest_intercept_player().unwrap()).unwrap();
        assert_eq!(fastest.unum, Unum::new(3));
        let fastest_opp = snap.player(snap.fastest_intercept_opponent().unwrap()).unwrap();
        assert_eq!(fastest_opp.unum, Unum::new(6));
        let opp_order: Vec<u8> = snap.opponents().filter_map(|p| p.unum.map(Unum::get)).collect();
        assert_eq!(opp_order, vec![6, 9]);
    }

    #[test]
    fn test_equal_reach_steps_keep_observation_order() {
        // mirrored positions around the ball => identical reach steps
        let obs = CycleObservation::new(1)
            .with_ball(vec2(0.0, 0.0), Vec2::zeros())
            .with_player(right(8, 0.0, 10.0).with_body(AngleDeg::new(-90.0)))
            .with_player(right(4, 0.0, -10.0).with_body(AngleDeg::new(90.0)));
        let snap = builder(Side::Left).build(&obs, None);
        let order: Vec<u8> = snap.opponents().filter_map(|p| p.unum.map(Unum::get)).collect();
        assert_eq!(order, vec![8, 4]);
        assert_eq!(snap.players()[0].predicted_reach_step, snap.players()[1].predicted_reach_step);
    }

    #[test]
    fn test_offside_lines() {
        let obs = CycleObservation::new(1)
            .with_ball(Vec2::zeros(), Vec2::zeros())
            .with_player(right(1, 10.0, 0.0))
            .with_player(right(2, 30.0, 0.0))
            .with_player(right(3, 5.0, 0.0))
            .with_player(left(1, -50.0, 0.0))
            .with_player(left(2, -20.0, 0.0))
            .with_player(left(3, -35.0, 3.0));
        let snap = builder(Side::Left).build(&obs, None);
        assert_eq!(snap.their_offside_line_x(), 10.0);
        assert_eq!(snap.our_offside_line_x(), -35.0);

        let lone = CycleObservation::new(1).with_ball(Vec2::zeros(), Vec2::zeros()).with_player(right(1, 10.0, 0.0));
        assert_eq!(builder(Side::Left).build(&lone, None).their_offside_line_x(), 0.0);
    }

    #[test]
    fn test_deadline_skips_remaining_players() {
        let obs = CycleObservation::new(1)
            .with_ball(Vec2::zeros(), Vec2::zeros())
            .with_player(left(2, 5.0, 0.0))
            .with_player(right(2, -5.0, 0.0));
        let b = builder(Side::Left);
        let snap = b.build_with_deadline(&obs, None, Instant::now());
        assert!(snap.players().iter().all(|p| p.predicted_reach_step.is_none()));
        assert_eq!(snap.fastest_intercept_player(), None);
        assert_eq!(snap.players().len(), 2);
        // everything else is still built
        assert_eq!(snap.teammates().count(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut obs = CycleObservation::new(1).with_ball(vec2(3.0, -2.0), vec2(0.8, 0.6));
        for unum in 1..=11u8 {
            let f = f64::from(unum);
            obs = obs.with_player(left(unum, -40.0 + 7.0 * f, -25.0 + 4.5 * f));
            obs = obs.with_player(right(unum, 45.0 - 8.0 * f, 20.0 - 3.5 * f));
        }
        let sequential = builder(Side::Left).build(&obs, None);
        let parallel = WorldBuilder::new(Side::Left, WorldModelConfig::parallel()).build(&obs, None);

        let steps = |s: &WorldSnapshot| -> Vec<(Side, Option<Unum>, Option<u32>)> {
            s.players().iter().map(|p| (p.side, p.unum, p.predicted_reach_step)).collect()
        };
        assert_eq!(steps(&sequential), steps(&parallel));
        assert_eq!(sequential.teammates().count(), 11);
        assert_eq!(sequential.opponents().count(), 11);
    }

    #[test]
    fn test_goalie_takes_better_of_both_modes() {
        // ball inside their box, within catchable range of their goalie
        let obs = CycleObservation::new(1)
            .with_ball(vec2(48.0, 0.0), Vec2::zeros())
            .with_player(right(5, 40.0, 10.0))
            .with_player(right(1, 49.0, 0.0).goalie());
        let snap = builder(Side::Left).build(&obs, None);
        let goalie = snap.opponent(Unum::new(1).unwrap()).unwrap();
        assert_eq!(goalie.predicted_reach_step, Some(0));
        assert_eq!(snap.fastest_intercept_opponent().and_then(|r| snap.player(r)).and_then(|p| p.unum), Unum::new(1));
    }

    #[test]
    fn test_self_player() {
        let obs = CycleObservation::new(1).with_ball(Vec2::zeros(), Vec2::zeros()).with_player(left(10, 1.0, 1.0));
        let snap = builder(Side::Left).with_self_unum(10).build(&obs, None);
        assert_eq!(snap.self_player().map(|p| p.position), Some(vec2(1.0, 1.0)));
    }
}
