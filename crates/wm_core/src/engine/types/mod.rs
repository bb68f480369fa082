//! Engine Types
//!
//! Identity and status enums shared by the observation records, the entity
//! snapshots and the builder.

use serde::{Deserialize, Serialize};

pub mod vec2;
pub use vec2::{dir_deg, line_distance, polar, vec2, AngleDeg, Rect2, Vec2};

// ===========================================
// Identity
// ===========================================

/// Team side as assigned by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    /// Not (yet) assigned. Players on this side are dropped by the builder.
    Neutral,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Neutral => Side::Neutral,
        }
    }

    pub fn is_assigned(self) -> bool {
        !matches!(self, Side::Neutral)
    }
}

/// Uniform number, guaranteed to be in 1..=11.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Unum(u8);

impl Unum {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 11;

    pub fn new(n: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&n).then_some(Self(n))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Slot index in an 11-player table.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for Unum {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Unum::new(n).ok_or_else(|| format!("uniform number {} out of range 1..=11", n))
    }
}

impl From<Unum> for u8 {
    fn from(unum: Unum) -> Self {
        unum.0
    }
}

/// Index of a player inside the snapshot that owns it.
///
/// Only meaningful together with that snapshot; never stored across cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRef(pub usize);

// ===========================================
// Status
// ===========================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Card {
    #[default]
    None,
    Yellow,
    Red,
}

/// Set-play restarts that hand the ball to one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartKind {
    KickOff,
    KickIn,
    FreeKick,
    IndirectFreeKick,
    CornerKick,
    GoalKick,
    GoalieCatch,
    PenaltyKick,
}

/// Referee play mode relevant to the world model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum PlayMode {
    #[default]
    PlayOn,
    BeforeKickOff,
    TimeOver,
    Restart { kind: RestartKind, side: Side },
}

impl PlayMode {
    /// Side executing a restart, if this is one.
    pub fn restart_side(&self) -> Option<Side> {
        match self {
            PlayMode::Restart { side, .. } if side.is_assigned() => Some(*side),
            _ => None,
        }
    }

    pub fn is_play_on(&self) -> bool {
        matches!(self, PlayMode::PlayOn)
    }
}
