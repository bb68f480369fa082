//! Kicker attribution
//!
//! Who last touched the ball, inferred from kick / tackle flags and the
//! distances to the ball in the previous and the current cycle.
//!
//! ## 판정 규칙
//! - 후보: 이번 cycle 에 kicking 이거나 tackle 을 막 시작했고 (`tackle_cycles == 1`),
//!   이전 snapshot 에 같은 identity 의 선수가 있었던 선수
//! - kick: `prev_dist < kickable` && `curr_dist < kickable + ball_speed_max`
//! - tackle: `prev_dist <= tacklable` && `curr_dist <= tacklable + ball_speed_max`
//! - kicking 과 tackle 시작이 겹치면 kick 판정 먼저, 실패 시 tackle 판정
//! - 그럴듯한 후보 중 `prev_dist` 최소가 kicker
//! - 양 팀 모두 후보가 있으면 kicker 는 None (후보 목록은 진단용으로 유지)
//! - 세트피스 재시작은 휴리스틱을 건너뛰고 재시작 팀의 최근접 선수로 귀속

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ball::Ball;
use crate::engine::config::{KickerConfig, ServerParams};
use crate::engine::player::Player;
use crate::engine::player_type::PlayerTypeRegistry;
use crate::engine::types::{PlayMode, PlayerRef, Side, Unum};
use crate::engine::world_snapshot::WorldSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchKind {
    Kick,
    Tackle,
}

/// A plausible last toucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickCandidate {
    pub player: PlayerRef,
    pub side: Side,
    pub unum: Unum,
    pub kind: TouchKind,
    /// Player-to-ball distance in the previous cycle
    pub prev_dist: f64,
    /// Player-to-ball distance in this cycle
    pub curr_dist: f64,
}

/// Result of one attribution pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KickerAttribution {
    /// `None` when unknown or ambiguous
    pub kicker: Option<PlayerRef>,
    /// Side credited with the touch; set by restarts even without a known player
    pub kicker_side: Option<Side>,
    /// Plausible candidates ordered by `prev_dist`
    pub candidates: Vec<KickCandidate>,
}

pub struct KickerHeuristic<'a> {
    server: &'a ServerParams,
    types: &'a PlayerTypeRegistry,
    config: &'a KickerConfig,
}

impl<'a> KickerHeuristic<'a> {
    pub fn new(server: &'a ServerParams, types: &'a PlayerTypeRegistry, config: &'a KickerConfig) -> Self {
        Self { server, types, config }
    }

    /// Attribute the last touch for the snapshot being built.
    ///
    /// `players` must already be in their final order: candidates refer to
    /// them by index.
    pub fn attribute(
        &self,
        players: &[Player],
        ball: &Ball,
        play_mode: &PlayMode,
        previous: Option<&WorldSnapshot>,
    ) -> KickerAttribution {
        if let Some(side) = play_mode.restart_side() {
            return self.attribute_restart(players, ball, side);
        }

        let Some(previous) = previous else {
            return KickerAttribution::default();
        };

        let mut candidates: Vec<KickCandidate> = players
            .iter()
            .enumerate()
            .filter_map(|(idx, player)| self.candidate(PlayerRef(idx), player, ball, previous))
            .collect();
        candidates.sort_by(|a, b| a.prev_dist.total_cmp(&b.prev_dist));

        let has_left = candidates.iter().any(|c| c.side == Side::Left);
        let has_right = candidates.iter().any(|c| c.side == Side::Right);
        if has_left && has_right {
            debug!(candidates = candidates.len(), "kicker ambiguous: candidates on both sides");
            return KickerAttribution { kicker: None, kicker_side: None, candidates };
        }

        let (kicker, kicker_side) = match candidates.first() {
            Some(best) => {
                debug!(side = ?best.side, unum = best.unum.get(), kind = ?best.kind, "kicker attributed");
                (Some(best.player), Some(best.side))
            }
            None => (None, None),
        };
        KickerAttribution { kicker, kicker_side, candidates }
    }

    fn candidate(
        &self,
        player_ref: PlayerRef,
        player: &Player,
        ball: &Ball,
        previous: &WorldSnapshot,
    ) -> Option<KickCandidate> {
        let tackling = player.tackle_started();
        if !player.kicking && !tackling {
            return None;
        }
        // carried-forward players were not observed this cycle
        if player.ages.seen > 0 {
            return None;
        }

        let unum = player.unum?;
        let prev_player = previous.find_player(player.side, unum)?;
        let prev_dist = (prev_player.position - previous.ball().position).norm();
        let curr_dist = (player.position - ball.position).norm();

        let speed_max = self.server.ball_speed_max;
        let kick_ok = || {
            let kickable = self.types.get(player.type_id).kickable_radius();
            prev_dist < kickable && curr_dist < kickable + speed_max
        };
        let tackle_ok = || {
            let tacklable = self.server.tacklable_radius(self.config.tackle_epsilon);
            prev_dist <= tacklable && curr_dist <= tacklable + speed_max
        };

        // a kick flag is tried first; a tackle started in the same cycle is the fallback
        let kind = if player.kicking && kick_ok() {
            TouchKind::Kick
        } else if tackling && tackle_ok() {
            TouchKind::Tackle
        } else {
            return None;
        };

        Some(KickCandidate {
            player: player_ref,
            side: player.side,
            unum,
            kind,
            prev_dist,
            curr_dist,
        })
    }

    fn attribute_restart(&self, players: &[Player], ball: &Ball, side: Side) -> KickerAttribution {
        let nearest = players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.side == side && p.unum.is_some())
            .map(|(idx, p)| (idx, (p.position - ball.position).norm_squared()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| PlayerRef(idx));

        debug!(?side, kicker = ?nearest, "restart kicker");
        KickerAttribution { kicker: nearest, kicker_side: Some(side), candidates: Vec::new() }
    }
}
