//! Player Type → Kinematic Params SSOT
//!
//! The single place that turns a heterogeneous player type record into the
//! locomotion model used by the interception predictor.
//!
//! Notes:
//! - `PlayerTypeSpec` is the raw, serde-facing record supplied by the
//!   external type registry.
//! - `PlayerTypeParams` adds derived data (full-power dash table, reachable
//!   top speed) and is immutable for the whole match.
//! - Unknown type ids resolve to the default type; prediction never fails
//!   for lack of parameters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::config::ServerParams;
use crate::engine::physics_constants::player;
use crate::engine::types::Vec2;

/// Type id reserved for the homogeneous default player.
pub const DEFAULT_TYPE_ID: i32 = 0;

/// Raw per-type record as delivered by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTypeSpec {
    pub id: i32,
    pub speed_max: f64,
    /// Per-cycle velocity retention
    pub decay: f64,
    pub inertia_moment: f64,
    pub dash_power_rate: f64,
    pub effort_max: f64,
    pub kickable_radius: f64,
    pub catchable_radius: f64,
}

impl Default for PlayerTypeSpec {
    fn default() -> Self {
        Self {
            id: DEFAULT_TYPE_ID,
            speed_max: player::SPEED_MAX,
            decay: player::DECAY,
            inertia_moment: player::INERTIA_MOMENT,
            dash_power_rate: player::DASH_POWER_RATE,
            effort_max: player::EFFORT_MAX,
            kickable_radius: player::KICKABLE_RADIUS,
            catchable_radius: player::CATCHABLE_RADIUS,
        }
    }
}

/// Kinematic parameters of one player type (derived, read-only).
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTypeParams {
    spec: PlayerTypeSpec,
    /// Top speed actually reachable by repeated full-power dashes
    real_speed_max: f64,
    /// `dash_distances[i]` = distance covered after `i + 1` full-power dashes from rest
    dash_distances: Vec<f64>,
}

impl Default for PlayerTypeParams {
    fn default() -> Self {
        Self::new(PlayerTypeSpec::default(), &ServerParams::default())
    }
}

impl PlayerTypeParams {
    pub fn new(spec: PlayerTypeSpec, server: &ServerParams) -> Self {
        let accel_max = server.max_dash_power * spec.dash_power_rate * spec.effort_max;
        let real_speed_max = if spec.decay < 1.0 {
            spec.speed_max.min(accel_max / (1.0 - spec.decay))
        } else {
            spec.speed_max
        };

        let mut dash_distances = Vec::with_capacity(player::DASH_TABLE_LEN);
        let mut speed = 0.0;
        let mut dist = 0.0;
        for _ in 0..player::DASH_TABLE_LEN {
            speed = (speed + accel_max).min(spec.speed_max);
            dist += speed;
            dash_distances.push(dist);
            speed *= spec.decay;
        }

        Self { spec, real_speed_max, dash_distances }
    }

    #[inline]
    pub fn id(&self) -> i32 {
        self.spec.id
    }

    #[inline]
    pub fn spec(&self) -> &PlayerTypeSpec {
        &self.spec
    }

    /// Speed cap enforced by the simulator.
    #[inline]
    pub fn speed_max(&self) -> f64 {
        self.spec.speed_max
    }

    #[inline]
    pub fn real_speed_max(&self) -> f64 {
        self.real_speed_max
    }

    #[inline]
    pub fn decay(&self) -> f64 {
        self.spec.decay
    }

    #[inline]
    pub fn kickable_radius(&self) -> f64 {
        self.spec.kickable_radius
    }

    #[inline]
    pub fn catchable_radius(&self) -> f64 {
        self.spec.catchable_radius
    }

    /// Catchable radius for goalies, kickable radius otherwise.
    #[inline]
    pub fn control_radius(&self, goalie: bool) -> f64 {
        if goalie {
            self.spec.catchable_radius
        } else {
            self.spec.kickable_radius
        }
    }

    /// Actual body rotation (degrees) produced by a turn of `moment` at `speed`.
    #[inline]
    pub fn effective_turn(&self, moment: f64, speed: f64) -> f64 {
        moment / (1.0 + self.spec.inertia_moment * speed)
    }

    /// Displacement after `n_step` cycles of passive decay.
    pub fn inertia_travel(&self, vel: &Vec2, n_step: u32) -> Vec2 {
        if n_step == 0 {
            return Vec2::zeros();
        }
        let decay = self.spec.decay;
        if (1.0 - decay).abs() < f64::EPSILON {
            return vel * f64::from(n_step);
        }
        let exp = i32::try_from(n_step).unwrap_or(i32::MAX);
        vel * ((1.0 - decay.powi(exp)) / (1.0 - decay))
    }

    /// Position after `n_step` cycles with no further acceleration.
    #[inline]
    pub fn inertia_point(&self, pos: &Vec2, vel: &Vec2, n_step: u32) -> Vec2 {
        pos + self.inertia_travel(vel, n_step)
    }

    /// Full-power dash cycles needed to cover `dist` starting from rest.
    pub fn cycles_to_reach_distance(&self, dist: f64) -> u32 {
        if dist <= 0.0 {
            return 0;
        }
        let idx = self.dash_distances.partition_point(|&d| d < dist - 1.0e-9);
        if idx < self.dash_distances.len() {
            return idx as u32 + 1;
        }
        let last = self.dash_distances.last().copied().unwrap_or(0.0);
        let rest = ((dist - last) / self.real_speed_max.max(1.0e-6)).ceil();
        self.dash_distances.len() as u32 + rest as u32
    }
}

/// Type id → parameters, with a default fallback.
#[derive(Debug, Clone)]
pub struct PlayerTypeRegistry {
    default_params: PlayerTypeParams,
    types: HashMap<i32, PlayerTypeParams>,
}

impl Default for PlayerTypeRegistry {
    fn default() -> Self {
        Self::homogeneous(&ServerParams::default())
    }
}

impl PlayerTypeRegistry {
    /// Registry holding only the default type.
    pub fn homogeneous(server: &ServerParams) -> Self {
        Self { default_params: PlayerTypeParams::new(PlayerTypeSpec::default(), server), types: HashMap::new() }
    }

    pub fn from_specs(server: &ServerParams, specs: &[PlayerTypeSpec]) -> Self {
        let mut registry = Self::homogeneous(server);
        for spec in specs {
            registry.insert(PlayerTypeParams::new(spec.clone(), server));
        }
        registry
    }

    /// Register a type. Registering `DEFAULT_TYPE_ID` replaces the fallback.
    pub fn insert(&mut self, params: PlayerTypeParams) {
        if params.id() == DEFAULT_TYPE_ID {
            self.default_params = params;
        } else {
            self.types.insert(params.id(), params);
        }
    }

    pub fn default_params(&self) -> &PlayerTypeParams {
        &self.default_params
    }

    /// Look up `type_id`; unknown or unresolved ids return the default type.
    pub fn get(&self, type_id: Option<i32>) -> &PlayerTypeParams {
        match type_id {
            None | Some(DEFAULT_TYPE_ID) => &self.default_params,
            Some(id) => self.types.get(&id).unwrap_or_else(|| {
                debug!(type_id = id, "unknown player type, using default parameters");
                &self.default_params
            }),
        }
    }
}
