//! Player entity snapshot
//!
//! A `Player` is owned by exactly one `WorldSnapshot`. Across cycles the
//! builder never shares a `Player`: it clones last cycle's record and
//! overwrites whatever this cycle's observation refreshes, so fields that a
//! degraded observation omits (type, card, face angle, ...) carry forward
//! with their age counters increased.

use serde::{Deserialize, Serialize};

use crate::engine::observation::PlayerObservation;
use crate::engine::player_type::PlayerTypeParams;
use crate::engine::types::{AngleDeg, Card, Side, Unum, Vec2};

/// Cycles since each field was last refreshed (0 = this cycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObservationAges {
    pub pos: u32,
    pub vel: u32,
    pub body: u32,
    pub face: u32,
    /// Cycles since the player appeared in any observation
    pub seen: u32,
}

impl ObservationAges {
    fn all_stale(&self) -> Self {
        Self {
            pos: self.pos.saturating_add(1),
            vel: self.vel.saturating_add(1),
            body: self.body.saturating_add(1),
            face: self.face.saturating_add(1),
            seen: self.seen.saturating_add(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub side: Side,
    pub unum: Option<Unum>,
    pub is_goalie: bool,
    /// `None` until the heterogeneous type is known
    pub type_id: Option<i32>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub body: AngleDeg,
    pub face: AngleDeg,
    pub point_dir: Option<AngleDeg>,
    pub pointing_cycles: u32,
    pub kicking: bool,
    /// Consecutive cycles the tackle flag has been up (1 = tackle just started)
    pub tackle_cycles: u32,
    /// Consecutive cycles the foul-charged flag has been up
    pub charged_cycles: u32,
    pub card: Card,
    pub ages: ObservationAges,
    /// Cycles until this player can control the ball; `None` if not evaluated
    pub predicted_reach_step: Option<u32>,
}

impl Player {
    /// New player from a first observation. Unobserved fields take rest values.
    pub fn fresh(unum: Option<Unum>, obs: &PlayerObservation) -> Self {
        let mut player = Self {
            side: obs.side,
            unum,
            is_goalie: obs.is_goalie,
            type_id: None,
            position: obs.position,
            velocity: Vec2::zeros(),
            body: AngleDeg::ZERO,
            face: AngleDeg::ZERO,
            point_dir: None,
            pointing_cycles: 0,
            kicking: false,
            tackle_cycles: 0,
            charged_cycles: 0,
            card: Card::None,
            ages: ObservationAges::default(),
            predicted_reach_step: None,
        };
        player.apply_observation(obs);
        player
    }

    /// Overwrite every field this observation supplies; age the rest.
    ///
    /// `self` is expected to be a clone of last cycle's record.
    pub fn apply_observation(&mut self, obs: &PlayerObservation) {
        let mut ages = self.ages.all_stale();
        ages.seen = 0;

        self.position = obs.position;
        ages.pos = 0;

        if let Some(vel) = obs.velocity {
            self.velocity = vel;
            ages.vel = 0;
        }
        if let Some(body) = obs.body_angle {
            self.body = body;
            ages.body = 0;
        }
        if let Some(face) = obs.face_angle {
            self.face = face;
            ages.face = 0;
        }

        // goalie status does not change during a match
        self.is_goalie |= obs.is_goalie;

        if let Some(type_id) = obs.type_id {
            self.type_id = Some(type_id);
        }
        if let Some(card) = obs.card {
            self.card = card;
        }

        match obs.pointing {
            Some(dir) => {
                self.point_dir = Some(dir);
                self.pointing_cycles = self.pointing_cycles.saturating_add(1);
            }
            None => {
                self.point_dir = None;
                self.pointing_cycles = 0;
            }
        }

        self.kicking = obs.kicking;
        self.tackle_cycles = if obs.tackling { self.tackle_cycles.saturating_add(1) } else { 0 };
        self.charged_cycles = if obs.charged { self.charged_cycles.saturating_add(1) } else { 0 };

        self.ages = ages;
        self.predicted_reach_step = None;
    }

    /// Carry an unobserved player forward by one cycle of inertia.
    pub fn carry_forward(&mut self, params: &PlayerTypeParams) {
        self.position = params.inertia_point(&self.position, &self.velocity, 1);
        self.velocity *= params.decay();
        self.kicking = false;
        if self.tackle_cycles > 0 {
            self.tackle_cycles = self.tackle_cycles.saturating_add(1);
        }
        if self.charged_cycles > 0 {
            self.charged_cycles = self.charged_cycles.saturating_add(1);
        }
        self.ages = self.ages.all_stale();
        self.predicted_reach_step = None;
    }

    /// `(side, unum)` when the uniform number is known.
    pub fn identity(&self) -> Option<(Side, Unum)> {
        self.unum.map(|unum| (self.side, unum))
    }

    /// Tackle started this cycle.
    #[inline]
    pub fn tackle_started(&self) -> bool {
        self.tackle_cycles == 1
    }

    /// Cycles this player still cannot move (tackle or foul lockout).
    pub fn lockout_remaining(&self, tackle_cycles: u32, foul_cycles: u32) -> u32 {
        let tackle = if self.tackle_cycles > 0 {
            tackle_cycles.saturating_sub(self.tackle_cycles)
        } else {
            0
        };
        let foul = if self.charged_cycles > 0 {
            foul_cycles.saturating_sub(self.charged_cycles)
        } else {
            0
        };
        tackle.max(foul)
    }
}
