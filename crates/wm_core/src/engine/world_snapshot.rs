//! World Snapshot
//!
//! One immutable world state per decision cycle.
//!
//! ## Design Principles
//! 1. **Exclusive ownership**: the snapshot owns every `Player` / `Ball` it holds
//! 2. **No back-references**: the previous snapshot is only borrowed by the
//!    builder while this one is constructed
//! 3. **Immutable**: fields are crate-private; the builder is the only writer
//!
//! ## Player order
//! `players` is sorted by predicted reach step (stable, unevaluated last).
//! `PlayerRef` values index into that order and are only meaningful together
//! with the snapshot that produced them.

use serde::{Deserialize, Serialize};

use crate::engine::ball::Ball;
use crate::engine::ball_prediction::BallTrajectory;
use crate::engine::coordinates::Perspective;
use crate::engine::kicker::KickCandidate;
use crate::engine::player::Player;
use crate::engine::types::{PlayMode, PlayerRef, Side, Unum, Vec2};
use crate::error::ObservationError;

/// Unum-indexed view of one team (slot `unum - 1`).
pub type TeamSlots = [Option<PlayerRef>; 11];

/// 읽기전용 월드 상태 스냅샷 (canonical frame: 우리 팀이 +x 로 공격)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub(crate) cycle: u32,
    pub(crate) perspective: Perspective,
    pub(crate) self_unum: Option<Unum>,
    pub(crate) play_mode: PlayMode,

    pub(crate) ball: Ball,
    pub(crate) ball_trajectory: BallTrajectory,

    /// Every player, in reach order
    pub(crate) players: Vec<Player>,
    pub(crate) teammate_slots: TeamSlots,
    pub(crate) opponent_slots: TeamSlots,
    pub(crate) teammates_by_reach: Vec<PlayerRef>,
    pub(crate) opponents_by_reach: Vec<PlayerRef>,

    /// Second-last defender of ours (limits their attack toward -x)
    pub(crate) our_offside_line_x: f64,
    /// Second-last defender of theirs (limits our attack toward +x)
    pub(crate) their_offside_line_x: f64,

    pub(crate) kicker: Option<PlayerRef>,
    pub(crate) kicker_side: Option<Side>,
    pub(crate) kicker_candidates: Vec<KickCandidate>,

    pub(crate) fastest_intercept_player: Option<PlayerRef>,
    pub(crate) fastest_intercept_teammate: Option<PlayerRef>,
    pub(crate) fastest_intercept_opponent: Option<PlayerRef>,

    /// Entities dropped while building this snapshot
    pub(crate) diagnostics: Vec<ObservationError>,
}

impl WorldSnapshot {
    // ===========================================
    // Cycle
    // ===========================================

    #[inline]
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    #[inline]
    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    #[inline]
    pub fn our_side(&self) -> Side {
        self.perspective.our_side()
    }

    #[inline]
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    // ===========================================
    // Ball
    // ===========================================

    #[inline]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Trajectory cache every reach step of this snapshot was computed against.
    #[inline]
    pub fn ball_trajectory(&self) -> &BallTrajectory {
        &self.ball_trajectory
    }

    // ===========================================
    // Players
    // ===========================================

    /// All players, fastest to the ball first.
    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[inline]
    pub fn player(&self, player_ref: PlayerRef) -> Option<&Player> {
        self.players.get(player_ref.0)
    }

    pub fn teammate(&self, unum: Unum) -> Option<&Player> {
        self.teammate_slots[unum.index()].and_then(|r| self.player(r))
    }

    pub fn opponent(&self, unum: Unum) -> Option<&Player> {
        self.opponent_slots[unum.index()].and_then(|r| self.player(r))
    }

    /// Unum-indexed teammate view (slots may be empty).
    #[inline]
    pub fn teammate_slots(&self) -> &TeamSlots {
        &self.teammate_slots
    }

    #[inline]
    pub fn opponent_slots(&self) -> &TeamSlots {
        &self.opponent_slots
    }

    /// Teammates in reach order. Players with an unknown unum are only in `players()`.
    pub fn teammates(&self) -> impl Iterator<Item = &Player> + '_ {
        self.teammates_by_reach.iter().filter_map(|&r| self.player(r))
    }

    /// Opponents in reach order.
    pub fn opponents(&self) -> impl Iterator<Item = &Player> + '_ {
        self.opponents_by_reach.iter().filter_map(|&r| self.player(r))
    }

    #[inline]
    pub fn teammate_refs(&self) -> &[PlayerRef] {
        &self.teammates_by_reach
    }

    #[inline]
    pub fn opponent_refs(&self) -> &[PlayerRef] {
        &self.opponents_by_reach
    }

    /// Lookup by absolute identity (side as assigned by the simulator).
    pub fn find_player(&self, side: Side, unum: Unum) -> Option<&Player> {
        if side == self.our_side() {
            self.teammate(unum)
        } else if side == self.perspective.their_side() {
            self.opponent(unum)
        } else {
            None
        }
    }

    pub fn self_unum(&self) -> Option<Unum> {
        self.self_unum
    }

    pub fn self_player(&self) -> Option<&Player> {
        self.self_unum.and_then(|unum| self.teammate(unum))
    }

    // ===========================================
    // Derived
    // ===========================================

    #[inline]
    pub fn our_offside_line_x(&self) -> f64 {
        self.our_offside_line_x
    }

    #[inline]
    pub fn their_offside_line_x(&self) -> f64 {
        self.their_offside_line_x
    }

    #[inline]
    pub fn kicker(&self) -> Option<PlayerRef> {
        self.kicker
    }

    /// Side credited with the last touch (restart side, or the kicker's side).
    #[inline]
    pub fn kicker_side(&self) -> Option<Side> {
        self.kicker_side
    }

    #[inline]
    pub fn kicker_candidates(&self) -> &[KickCandidate] {
        &self.kicker_candidates
    }

    /// Plausible touches from both teams, so no kicker was named.
    pub fn kicker_is_ambiguous(&self) -> bool {
        self.kicker.is_none()
            && self.kicker_candidates.iter().any(|c| c.side == Side::Left)
            && self.kicker_candidates.iter().any(|c| c.side == Side::Right)
    }

    #[inline]
    pub fn fastest_intercept_player(&self) -> Option<PlayerRef> {
        self.fastest_intercept_player
    }

    #[inline]
    pub fn fastest_intercept_teammate(&self) -> Option<PlayerRef> {
        self.fastest_intercept_teammate
    }

    #[inline]
    pub fn fastest_intercept_opponent(&self) -> Option<PlayerRef> {
        self.fastest_intercept_opponent
    }

    #[inline]
    pub fn diagnostics(&self) -> &[ObservationError] {
        &self.diagnostics
    }

    // ===========================================
    // External boundary
    // ===========================================

    /// Player position in the simulator's frame.
    pub fn external_position(&self, player: &Player) -> Vec2 {
        self.perspective.to_external_point(player.position)
    }

    /// Ball position in the simulator's frame.
    pub fn external_ball_position(&self) -> Vec2 {
        self.perspective.to_external_point(self.ball.position)
    }
}
