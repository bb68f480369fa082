//! # World Model Configuration
//!
//! 모든 튜닝 상수를 한 곳에서 관리하는 설정 시스템.
//!
//! ## 사용법
//! ```rust
//! use wm_core::engine::config::WorldModelConfig;
//!
//! let config = WorldModelConfig::default();
//! let keepaway = WorldModelConfig::keepaway();
//! assert!(keepaway.trajectory.max_steps <= config.trajectory.max_steps);
//! ```
//!
//! ## Environment Variables
//!
//! - `WM_CONFIG_PROFILE`: preset name (standard, keepaway, parallel)

mod predictor_config;
mod server_params;

pub use predictor_config::{EvaluationMode, PredictorConfig, TrajectoryBounds, TrajectoryConfig};
pub use server_params::ServerParams;

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::physics_constants::tackle;
use crate::engine::player_type::{PlayerTypeRegistry, PlayerTypeSpec};
use crate::error::{ConfigError, Result};

/// Environment variable selecting a preset.
pub const PROFILE_ENV: &str = "WM_CONFIG_PROFILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickerConfig {
    /// Slack added to the tacklable radius
    pub tackle_epsilon: f64,
}

impl Default for KickerConfig {
    fn default() -> Self {
        Self { tackle_epsilon: tackle::EPSILON }
    }
}

/// Full world model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldModelConfig {
    pub server: ServerParams,
    /// Heterogeneous player types. Empty => homogeneous match.
    pub player_types: Vec<PlayerTypeSpec>,
    pub predictor: PredictorConfig,
    pub trajectory: TrajectoryConfig,
    pub kicker: KickerConfig,
    /// Unseen players are carried forward for this many cycles
    pub max_unseen_cycles: u32,
}

impl Default for WorldModelConfig {
    fn default() -> Self {
        Self {
            server: ServerParams::default(),
            player_types: Vec::new(),
            predictor: PredictorConfig::default(),
            trajectory: TrajectoryConfig::default(),
            kicker: KickerConfig::default(),
            max_unseen_cycles: 30,
        }
    }
}

impl WorldModelConfig {
    /// 표준 경기 (기본)
    pub fn standard() -> Self {
        Self::default()
    }

    /// Keep-away 훈련: 좁은 영역, 짧은 예측 윈도우
    pub fn keepaway() -> Self {
        let mut cfg = Self::default();
        cfg.trajectory.bounds = TrajectoryBounds::keepaway();
        cfg.trajectory.max_steps = 50;
        cfg
    }

    /// 선수별 예측을 rayon 으로 병렬 실행
    pub fn parallel() -> Self {
        let mut cfg = Self::default();
        cfg.predictor.evaluation = EvaluationMode::Parallel;
        cfg
    }

    pub fn from_profile(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "standard" | "default" => Ok(Self::standard()),
            "keepaway" | "keep_away" => Ok(Self::keepaway()),
            "parallel" => Ok(Self::parallel()),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }

    /// Load the preset named by `WM_CONFIG_PROFILE`, falling back to the default.
    pub fn from_env_or_default() -> Self {
        let name = env::var(PROFILE_ENV).unwrap_or_default();
        Self::from_profile(&name).unwrap_or_else(|err| {
            warn!(%err, "falling back to the standard world model config");
            Self::default()
        })
    }

    /// Load from a `.json`, `.yaml` or `.yml` file. Missing fields take defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let cfg: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&raw)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat { path: path.display().to_string() })
            }
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let ball_decay = self.server.ball_decay;
        if !(0.0..1.0).contains(&ball_decay) {
            return Err(ConfigError::InvalidParameter {
                name: "server.ball_decay",
                reason: format!("{} not in [0, 1)", ball_decay),
            });
        }
        if self.trajectory.max_steps == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "trajectory.max_steps",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.trajectory.min_steps > self.trajectory.max_steps {
            return Err(ConfigError::InvalidParameter {
                name: "trajectory.min_steps",
                reason: format!(
                    "{} exceeds max_steps {}",
                    self.trajectory.min_steps, self.trajectory.max_steps
                ),
            });
        }
        for spec in &self.player_types {
            if !(0.0..1.0).contains(&spec.decay) {
                return Err(ConfigError::InvalidParameter {
                    name: "player_types.decay",
                    reason: format!("type {}: {} not in [0, 1)", spec.id, spec.decay),
                });
            }
        }
        Ok(())
    }

    /// Build the type registry for this match.
    pub fn player_type_registry(&self) -> PlayerTypeRegistry {
        PlayerTypeRegistry::from_specs(&self.server, &self.player_types)
    }
}

// ========== Tests ==========
