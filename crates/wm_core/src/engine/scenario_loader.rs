//! Scenario replay
//!
//! A scenario is a recorded sequence of cycle observations plus the agent's
//! side. Replaying it through a `WorldModel` yields one `CycleReport` per
//! cycle; optional assertions pin expected kickers, reach steps and offside
//! lines.
//!
//! ```json
//! {
//!   "id": "incoming_ball",
//!   "our_side": "left",
//!   "cycles": [
//!     { "cycle": 1, "ball": { "position": [0, 0], "velocity": [1, 0] },
//!       "players": [ { "side": "left", "unum": 5, "position": [5, 0] } ] }
//!   ],
//!   "assertions": [ { "cycle": 1, "fastest_teammate": { "side": "left", "unum": 5 } } ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::config::WorldModelConfig;
use crate::engine::observation::CycleObservation;
use crate::engine::player::Player;
use crate::engine::types::{PlayerRef, Side, Vec2};
use crate::engine::world_builder::WorldBuilder;
use crate::engine::world_model::WorldModel;
use crate::engine::world_snapshot::WorldSnapshot;
use crate::error::ScenarioError;

/// Absolute player identity as written in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPlayerRef {
    pub side: Side,
    pub unum: u8,
}

impl ScenarioPlayerRef {
    fn of(player: &Player) -> Option<Self> {
        player.unum.map(|unum| Self { side: player.side, unum: unum.get() })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReachStep {
    pub player: ScenarioPlayerRef,
    pub step: u32,
}

/// Expected facts about one cycle. Absent fields are not checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioAssertion {
    pub cycle: u32,
    /// `null` asserts that no kicker was attributed
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub kicker: Option<Option<ScenarioPlayerRef>>,
    #[serde(default)]
    pub fastest_player: Option<ScenarioPlayerRef>,
    #[serde(default)]
    pub fastest_teammate: Option<ScenarioPlayerRef>,
    #[serde(default)]
    pub fastest_opponent: Option<ScenarioPlayerRef>,
    #[serde(default)]
    pub reach_steps: Vec<ScenarioReachStep>,
    #[serde(default)]
    pub our_offside_line_x: Option<f64>,
    #[serde(default)]
    pub their_offside_line_x: Option<f64>,
}

/// Present-but-null => `Some(None)`; absent => `None` (via `default`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub our_side: Side,
    #[serde(default)]
    pub self_unum: Option<u8>,
    /// Preset name (standard, keepaway, parallel)
    #[serde(default)]
    pub profile: Option<String>,
    /// Inline configuration; takes precedence over `profile`
    #[serde(default)]
    pub config: Option<WorldModelConfig>,
    pub cycles: Vec<CycleObservation>,
    #[serde(default)]
    pub assertions: Vec<ScenarioAssertion>,
}

// ===========================================
// Reports
// ===========================================

/// One row of the reach-step table (simulator frame).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachEntry {
    pub side: Side,
    pub unum: Option<u8>,
    pub is_goalie: bool,
    pub position: Vec2,
    pub reach_step: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: u32,
    pub ball_position: Vec2,
    /// Every player, fastest first
    pub reach_table: Vec<ReachEntry>,
    pub fastest_player: Option<ScenarioPlayerRef>,
    pub fastest_teammate: Option<ScenarioPlayerRef>,
    pub fastest_opponent: Option<ScenarioPlayerRef>,
    pub kicker: Option<ScenarioPlayerRef>,
    pub kicker_side: Option<Side>,
    pub kicker_ambiguous: bool,
    pub kicker_candidates: usize,
    /// Canonical frame (we attack toward +x)
    pub our_offside_line_x: f64,
    pub their_offside_line_x: f64,
    pub dropped: Vec<String>,
}

impl CycleReport {
    pub fn from_snapshot(snapshot: &WorldSnapshot) -> Self {
        let tag = |r: Option<PlayerRef>| r.and_then(|r| snapshot.player(r)).and_then(ScenarioPlayerRef::of);

        let reach_table = snapshot
            .players()
            .iter()
            .map(|p| ReachEntry {
                side: p.side,
                unum: p.unum.map(|u| u.get()),
                is_goalie: p.is_goalie,
                position: snapshot.external_position(p),
                reach_step: p.predicted_reach_step,
            })
            .collect();

        Self {
            cycle: snapshot.cycle(),
            ball_position: snapshot.external_ball_position(),
            reach_table,
            fastest_player: tag(snapshot.fastest_intercept_player()),
            fastest_teammate: tag(snapshot.fastest_intercept_teammate()),
            fastest_opponent: tag(snapshot.fastest_intercept_opponent()),
            kicker: tag(snapshot.kicker()),
            kicker_side: snapshot.kicker_side(),
            kicker_ambiguous: snapshot.kicker_is_ambiguous(),
            kicker_candidates: snapshot.kicker_candidates().len(),
            our_offside_line_x: snapshot.our_offside_line_x(),
            their_offside_line_x: snapshot.their_offside_line_x(),
            dropped: snapshot.diagnostics().iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub id: String,
    pub cycles: Vec<CycleReport>,
    pub assertion_failures: Vec<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.assertion_failures.is_empty()
    }
}

// ===========================================
// Loading / running
// ===========================================

impl Scenario {
    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ScenarioError::Io { path: display.clone(), source })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&raw)
                .map_err(|err| ScenarioError::Parse { path: display, reason: err.to_string() }),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
                .map_err(|err| ScenarioError::Parse { path: display, reason: err.to_string() }),
            _ => Err(ScenarioError::UnsupportedFormat { path: display }),
        }
    }

    /// Effective configuration: inline config, else the named profile, else standard.
    pub fn resolve_config(&self) -> Result<WorldModelConfig, ScenarioError> {
        let config = match (&self.config, &self.profile) {
            (Some(inline), _) => inline.clone(),
            (None, Some(name)) => WorldModelConfig::from_profile(name)?,
            (None, None) => WorldModelConfig::standard(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn world_model(&self) -> Result<WorldModel, ScenarioError> {
        let mut builder = WorldBuilder::new(self.our_side, self.resolve_config()?);
        if let Some(unum) = self.self_unum {
            builder = builder.with_self_unum(unum);
        }
        Ok(WorldModel::new(builder))
    }

    /// Replay every cycle and check the assertions.
    pub fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        let mut model = self.world_model()?;
        let mut cycles = Vec::with_capacity(self.cycles.len());
        let mut assertion_failures = Vec::new();

        for observation in &self.cycles {
            let snapshot = model.update(observation);
            let report = CycleReport::from_snapshot(&snapshot);
            for assertion in self.assertions.iter().filter(|a| a.cycle == observation.cycle) {
                check_assertion(assertion, &report, &mut assertion_failures);
            }
            cycles.push(report);
        }

        for assertion in &self.assertions {
            if !self.cycles.iter().any(|c| c.cycle == assertion.cycle) {
                assertion_failures.push(format!("assertion for cycle {} matches no observation", assertion.cycle));
            }
        }

        Ok(ScenarioReport { id: self.id.clone(), cycles, assertion_failures })
    }
}

fn check_assertion(assertion: &ScenarioAssertion, report: &CycleReport, failures: &mut Vec<String>) {
    const LINE_TOLERANCE: f64 = 1.0e-6;
    let cycle = report.cycle;

    let mut check_ref = |name: &str, expected: Option<ScenarioPlayerRef>, actual: Option<ScenarioPlayerRef>| {
        if expected != actual {
            failures.push(format!("cycle {}: {} expected {:?}, got {:?}", cycle, name, expected, actual));
        }
    };

    if let Some(expected) = assertion.kicker {
        check_ref("kicker", expected, report.kicker);
    }
    if let Some(expected) = assertion.fastest_player {
        check_ref("fastest_player", Some(expected), report.fastest_player);
    }
    if let Some(expected) = assertion.fastest_teammate {
        check_ref("fastest_teammate", Some(expected), report.fastest_teammate);
    }
    if let Some(expected) = assertion.fastest_opponent {
        check_ref("fastest_opponent", Some(expected), report.fastest_opponent);
    }

    for expected in &assertion.reach_steps {
        let actual = report
            .reach_table
            .iter()
            .find(|e| e.side == expected.player.side && e.unum == Some(expected.player.unum))
            .and_then(|e| e.reach_step);
        if actual != Some(expected.step) {
            failures.push(format!(
                "cycle {}: reach step of {:?} #{} expected {}, got {:?}",
                cycle, expected.player.side, expected.player.unum, expected.step, actual
            ));
        }
    }

    let lines = [
        ("our_offside_line_x", assertion.our_offside_line_x, report.our_offside_line_x),
        ("their_offside_line_x", assertion.their_offside_line_x, report.their_offside_line_x),
    ];
    for (name, expected, actual) in lines {
        if let Some(expected) = expected {
            if (expected - actual).abs() > LINE_TOLERANCE {
                failures.push(format!("cycle {}: {} expected {}, got {}", cycle, name, expected, actual));
            }
        }
    }
}
