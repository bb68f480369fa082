//! World model: the published snapshot plus the builder that supersedes it
//!
//! Each cycle builds a new snapshot with the current one as "previous",
//! then swaps the `Arc`. Readers holding an older `Arc` keep a consistent,
//! fully constructed snapshot; nothing is ever mutated after publication.

use std::sync::Arc;
use std::time::Instant;

use crate::engine::observation::CycleObservation;
use crate::engine::world_builder::WorldBuilder;
use crate::engine::world_snapshot::WorldSnapshot;

#[derive(Debug, Clone)]
pub struct WorldModel {
    builder: WorldBuilder,
    current: Option<Arc<WorldSnapshot>>,
}

impl WorldModel {
    pub fn new(builder: WorldBuilder) -> Self {
        Self { builder, current: None }
    }

    #[inline]
    pub fn builder(&self) -> &WorldBuilder {
        &self.builder
    }

    /// Latest published snapshot, if any cycle has been processed.
    pub fn current(&self) -> Option<Arc<WorldSnapshot>> {
        self.current.clone()
    }

    /// Build and publish the snapshot for `observation`.
    pub fn update(&mut self, observation: &CycleObservation) -> Arc<WorldSnapshot> {
        let next = self.builder.build(observation, self.current.as_deref());
        self.publish(next)
    }

    /// [`update`](Self::update) with a prediction deadline.
    pub fn update_with_deadline(&mut self, observation: &CycleObservation, deadline: Instant) -> Arc<WorldSnapshot> {
        let next = self.builder.build_with_deadline(observation, self.current.as_deref(), deadline);
        self.publish(next)
    }

    /// Forget history (e.g. after a reconnect); the next cycle is a first cycle.
    pub fn reset(&mut self) {
        self.current = None;
    }

    fn publish(&mut self, snapshot: WorldSnapshot) -> Arc<WorldSnapshot> {
        let published = Arc::new(snapshot);
        self.current = Some(Arc::clone(&published));
        published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::WorldModelConfig;
    use crate::engine::observation::PlayerObservation;
    use crate::engine::types::{vec2, Side, Unum, Vec2};

    #[test]
    fn test_update_publishes_and_keeps_old_snapshot_alive() {
        let mut model = WorldModel::new(WorldBuilder::new(Side::Left, WorldModelConfig::default()));
        assert!(model.current().is_none());

        let obs1 = CycleObservation::new(1)
            .with_ball(Vec2::zeros(), Vec2::zeros())
            .with_player(PlayerObservation::new(Side::Left, Some(7), vec2(3.0, 0.0)));
        let s1 = model.update(&obs1);

        let obs2 = CycleObservation::new(2)
            .with_ball(Vec2::zeros(), Vec2::zeros())
            .with_player(PlayerObservation::new(Side::Left, Some(7), vec2(4.0, 0.0)));
        let s2 = model.update(&obs2);

        assert_eq!(model.current().map(|s| s.cycle()), Some(2));
        assert_eq!(s1.cycle(), 1);
        let unum = Unum::new(7).unwrap();
        assert_eq!(s1.teammate(unum).unwrap().position, vec2(3.0, 0.0));
        assert_eq!(s2.teammate(unum).unwrap().position, vec2(4.0, 0.0));
    }

    #[test]
    fn test_reset_starts_from_first_cycle() {
        let mut model = WorldModel::new(WorldBuilder::new(Side::Left, WorldModelConfig::default()));
        model.update(&CycleObservation::new(1).with_ball(vec2(1.0, 0.0), vec2(1.0, 0.0)));
        model.reset();
        let snap = model.update(&CycleObservation::new(2));
        assert_eq!(snap.ball().pos_age, u32::MAX);
    }
}
