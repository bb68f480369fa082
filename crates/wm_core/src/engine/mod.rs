pub mod ball;
pub mod ball_prediction; // Ball trajectory cache (velocity-decay propagation)
pub mod config;
pub mod coordinates; // Side mirroring at the external boundary
pub mod intercept; // Interception reach-step predictor
pub mod kicker; // Last-touch attribution
pub mod observation;
pub mod offside;
pub mod physics_constants;
pub mod player;
pub mod player_type;
pub mod scenario_loader; // Scenario replay harness
pub mod sort_keys; // Stable reach-order tie-breakers
pub mod types;
pub mod world_builder;
pub mod world_model;
pub mod world_snapshot;

pub use ball::Ball;
pub use ball_prediction::{BallTrajectory, TrajectoryEnd};
pub use config::{KickerConfig, PredictorConfig, ServerParams, WorldModelConfig};
pub use coordinates::Perspective;
pub use intercept::{InterceptPredictor, PlayerKinematics};
pub use kicker::{KickCandidate, TouchKind};
pub use observation::{BallObservation, CycleObservation, PlayerObservation};
pub use player::{ObservationAges, Player};
pub use player_type::{PlayerTypeParams, PlayerTypeRegistry, PlayerTypeSpec};
pub use scenario_loader::{CycleReport, Scenario, ScenarioReport};
pub use types::{AngleDeg, Card, PlayMode, PlayerRef, RestartKind, Side, Unum, Vec2};
pub use world_builder::WorldBuilder;
pub use world_model::WorldModel;
pub use world_snapshot::WorldSnapshot;
