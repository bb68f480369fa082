//! # wm_core - Per-cycle World Model for a Simulated Soccer Agent
//!
//! Turns one cycle of raw (possibly partial) observations into an immutable
//! [`WorldSnapshot`](engine::WorldSnapshot): tracked player identities, a
//! cached ball trajectory, predicted interception steps for every player,
//! offside lines and last-kicker attribution.
//!
//! ## Features
//! - Canonical frame: our team always attacks toward +x
//! - Reach-step prediction per player type (turn, dash, inertia)
//! - Sequential or rayon-parallel evaluation with a per-cycle deadline
//! - JSON/YAML scenario replay for regression tests

// Game physics helpers often take many scalar parameters
#![allow(clippy::too_many_arguments)]
// Preset builders tweak a default config field by field
#![allow(clippy::field_reassign_with_default)]

pub mod engine;
pub mod error;

pub use engine::{
    Ball, BallTrajectory, CycleObservation, InterceptPredictor, Player, PlayerObservation, Scenario,
    WorldBuilder, WorldModel, WorldModelConfig, WorldSnapshot,
};
pub use error::{ConfigError, ObservationError, Result, ScenarioError};
