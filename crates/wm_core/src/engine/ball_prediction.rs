//! Ball Prediction System
//!
//! 공의 미래 위치를 cycle 단위로 미리 계산해 두는 캐시.
//! 한 cycle 에 한 번 계산되고, 같은 공을 상대로 평가되는 모든 선수가 공유한다.
//!
//! - `positions[0]` = 현재 위치, `positions[n]` = n cycle 후 위치
//! - 최대 `max_steps` 개
//! - 속도가 `stop_speed` 미만이 되면 (최소 `min_steps` 이후) 중단
//! - 경계 밖으로 나가면 첫 번째 경계 밖 샘플까지 포함하고 중단

use serde::{Deserialize, Serialize};

use crate::engine::config::{ServerParams, TrajectoryConfig};
use crate::engine::types::{dir_deg, AngleDeg, Vec2};

/// Why the cache stopped growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryEnd {
    /// Ball slowed below the stop threshold
    Stopped,
    /// Last sample lies outside the bounds
    OutOfBounds,
    /// Hit the step limit while still moving
    StepLimit,
}

/// Cached future ball positions under ballistic decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallTrajectory {
    positions: Vec<Vec2>,
    initial_velocity: Vec2,
    end: TrajectoryEnd,
}

impl BallTrajectory {
    /// 예측 계산
    ///
    /// # Arguments
    /// - `position`: 현재 공 위치
    /// - `velocity`: 현재 공 속도 (per cycle)
    /// - `server`: decay / 필드 크기
    /// - `config`: step 수, 정지 속도, 경계
    pub fn compute(
        position: Vec2,
        velocity: Vec2,
        server: &ServerParams,
        config: &TrajectoryConfig,
    ) -> Self {
        let bounds = config.bounds.rect(&server.pitch_rect());
        let max_steps = config.max_steps.max(1);
        let min_steps = config.min_steps.min(max_steps);

        let mut positions = Vec::with_capacity(max_steps);
        let mut pos = position;
        let mut vel = velocity;
        positions.push(pos);

        let end = loop {
            if !bounds.contains(&pos) {
                break TrajectoryEnd::OutOfBounds;
            }
            if vel.norm() < config.stop_speed && positions.len() >= min_steps {
                break TrajectoryEnd::Stopped;
            }
            if positions.len() >= max_steps {
                break TrajectoryEnd::StepLimit;
            }
            pos += vel;
            vel *= server.ball_decay;
            positions.push(pos);
        };

        Self { positions, initial_velocity: velocity, end }
    }

    /// 캐시된 위치 슬라이스 (step 0 = 현재)
    #[inline]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Step 0 is always present, so this is always false; kept alongside
    /// `len` for clippy's `len_without_is_empty`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn position_at(&self, step: usize) -> Option<&Vec2> {
        self.positions.get(step)
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.positions.first().copied().unwrap_or_else(Vec2::zeros)
    }

    /// 마지막 캐시 위치 (정지 예상 위치로 취급)
    #[inline]
    pub fn last(&self) -> Vec2 {
        self.positions.last().copied().unwrap_or_else(Vec2::zeros)
    }

    /// Direction of travel; 0° for a ball at rest.
    #[inline]
    pub fn direction(&self) -> AngleDeg {
        dir_deg(&self.initial_velocity)
    }

    #[inline]
    pub fn end(&self) -> TrajectoryEnd {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::TrajectoryBounds;
    use crate::engine::types::vec2;

    fn compute(pos: Vec2, vel: Vec2) -> BallTrajectory {
        BallTrajectory::compute(pos, vel, &ServerParams::default(), &TrajectoryConfig::default())
    }

    #[test]
    fn test_stationary_ball_keeps_min_steps() {
        let cfg = TrajectoryConfig::default();
        let traj = compute(vec2(3.0, 4.0), vec2(0.001, 0.0));
        assert_eq!(traj.len(), cfg.min_steps);
        assert!(traj.len() <= cfg.max_steps);
        assert_eq!(traj.end(), TrajectoryEnd::Stopped);
        for p in traj.positions() {
            assert!((p - vec2(3.0, 4.0)).norm() < 0.02);
        }
    }

    #[test]
    fn test_moving_ball_decays() {
        let traj = compute(vec2(0.0, 0.0), vec2(1.0, 0.0));
        assert_eq!(traj.positions()[0], vec2(0.0, 0.0));
        assert_eq!(traj.positions()[1], vec2(1.0, 0.0));
        assert!((traj.positions()[2].x - 1.94).abs() < 1e-9);
        // converges toward 1 / (1 - 0.94)
        assert!(traj.last().x < 1.0 / 0.06);
        assert_eq!(traj.end(), TrajectoryEnd::Stopped);
    }

    #[test]
    fn test_out_of_bounds_truncates_inclusive() {
        let traj = compute(vec2(50.0, 0.0), vec2(3.0, 0.0));
        // 50 -> 53 -> 55.82 -> 58.47 (outside 57.5)
        assert_eq!(traj.end(), TrajectoryEnd::OutOfBounds);
        assert_eq!(traj.len(), 4);
        assert!(traj.last().x > 57.5);
        let inside = &traj.positions()[..traj.len() - 1];
        assert!(inside.iter().all(|p| p.x <= 57.5));
    }

    #[test]
    fn test_step_limit() {
        let cfg = TrajectoryConfig {
            max_steps: 5,
            bounds: TrajectoryBounds::Pitch { margin: 1000.0 },
            ..TrajectoryConfig::default()
        };
        let traj =
            BallTrajectory::compute(Vec2::zeros(), vec2(2.0, 0.0), &ServerParams::default(), &cfg);
        assert_eq!(traj.len(), 5);
        assert_eq!(traj.end(), TrajectoryEnd::StepLimit);
    }

    #[test]
    fn test_keepaway_bounds() {
        let cfg = TrajectoryConfig { bounds: TrajectoryBounds::keepaway(), ..TrajectoryConfig::default() };
        let traj =
            BallTrajectory::compute(vec2(8.0, 0.0), vec2(1.5, 0.0), &ServerParams::default(), &cfg);
        assert_eq!(traj.end(), TrajectoryEnd::OutOfBounds);
        assert_eq!(traj.len(), 3);
    }

    #[test]
    fn test_direction_of_resting_ball() {
        let traj = compute(vec2(1.0, 1.0), Vec2::zeros());
        assert_eq!(traj.direction(), AngleDeg::ZERO);
        assert_eq!(traj.origin(), vec2(1.0, 1.0));
    }
}
