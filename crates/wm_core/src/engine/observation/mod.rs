//! Observation records
//!
//! Already-parsed sensor data for one simulation cycle. The text protocol
//! that produces these lives outside this crate; everything here is plain
//! typed data in the simulator's absolute frame (left side attacks +x).
//!
//! Optional fields model degraded observations: `None` means "not observed
//! this cycle" and the builder keeps the previous (aged) value.

use serde::{Deserialize, Serialize};

use crate::engine::types::{AngleDeg, Card, PlayMode, Side, Vec2};

/// Ball position and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallObservation {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// One player as seen this cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerObservation {
    pub side: Side,
    /// Raw uniform number; `None` when it could not be read.
    #[serde(default)]
    pub unum: Option<u8>,
    #[serde(default)]
    pub is_goalie: bool,
    /// Heterogeneous type id, when the sensor reports it.
    #[serde(default)]
    pub type_id: Option<i32>,
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Option<Vec2>,
    #[serde(default)]
    pub body_angle: Option<AngleDeg>,
    #[serde(default)]
    pub face_angle: Option<AngleDeg>,
    /// Pointing direction, present only while the arm is raised.
    #[serde(default)]
    pub pointing: Option<AngleDeg>,
    #[serde(default)]
    pub kicking: bool,
    #[serde(default)]
    pub tackling: bool,
    /// Frozen after being charged with a foul.
    #[serde(default)]
    pub charged: bool,
    #[serde(default)]
    pub card: Option<Card>,
}

impl PlayerObservation {
    /// Minimal observation: identity and position only.
    pub fn new(side: Side, unum: Option<u8>, position: Vec2) -> Self {
        Self {
            side,
            unum,
            is_goalie: false,
            type_id: None,
            position,
            velocity: None,
            body_angle: None,
            face_angle: None,
            pointing: None,
            kicking: false,
            tackling: false,
            charged: false,
            card: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_body(mut self, body: AngleDeg) -> Self {
        self.body_angle = Some(body);
        self
    }

    pub fn goalie(mut self) -> Self {
        self.is_goalie = true;
        self
    }

    pub fn kicking(mut self) -> Self {
        self.kicking = true;
        self
    }

    pub fn tackling(mut self) -> Self {
        self.tackling = true;
        self
    }
}

/// Everything the sensor layer delivers for one cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CycleObservation {
    pub cycle: u32,
    #[serde(default)]
    pub play_mode: PlayMode,
    #[serde(default)]
    pub ball: Option<BallObservation>,
    #[serde(default)]
    pub players: Vec<PlayerObservation>,
}

impl CycleObservation {
    pub fn new(cycle: u32) -> Self {
        Self { cycle, ..Self::default() }
    }

    pub fn with_ball(mut self, position: Vec2, velocity: Vec2) -> Self {
        self.ball = Some(BallObservation { position, velocity });
        self
    }

    pub fn with_player(mut self, player: PlayerObservation) -> Self {
        self.players.push(player);
        self
    }

    pub fn with_play_mode(mut self, play_mode: PlayMode) -> Self {
        self.play_mode = play_mode;
        self
    }
}
