//! Physics constants for the simulated pitch
//!
//! Default values of the soccer simulator. Runtime code reads them through
//! `ServerParams` / `PlayerTypeParams` so a match can override any of them;
//! these modules only seed the defaults.

/// Pitch geometry (canonical frame, origin at the center spot)
pub mod pitch {
    /// Half of the goal-line-to-goal-line length
    pub const HALF_LENGTH: f64 = 52.5;
    /// Half of the touchline-to-touchline width
    pub const HALF_WIDTH: f64 = 34.0;
    /// Penalty area depth from the goal line
    pub const PENALTY_AREA_LENGTH: f64 = 16.5;
    /// Penalty area half width (20.16 = 40.32 / 2)
    pub const PENALTY_AREA_HALF_WIDTH: f64 = 20.16;
}

/// Ball physics
pub mod ball {
    /// Per-cycle velocity retention
    pub const DECAY: f64 = 0.94;
    /// Maximum ball speed per cycle
    pub const SPEED_MAX: f64 = 3.0;
}

/// Command limits
pub mod command {
    /// Maximum turn moment (degrees)
    pub const MAX_MOMENT: f64 = 180.0;
    /// Maximum dash power
    pub const MAX_DASH_POWER: f64 = 100.0;
}

/// Tackle / foul geometry and lockouts
pub mod tackle {
    /// Forward reach of a tackle
    pub const DIST: f64 = 2.0;
    /// Half width of the tackle area
    pub const WIDTH: f64 = 1.25;
    /// Cycles a player is frozen after a tackle
    pub const CYCLES: u32 = 10;
    /// Cycles a player is frozen after being charged with a foul
    pub const FOUL_CYCLES: u32 = 5;
    /// Slack added to the tacklable radius
    pub const EPSILON: f64 = 1.0e-5;
}

/// Default (homogeneous) player type
pub mod player {
    pub const SPEED_MAX: f64 = 1.05;
    pub const DECAY: f64 = 0.4;
    pub const INERTIA_MOMENT: f64 = 5.0;
    pub const DASH_POWER_RATE: f64 = 0.006;
    pub const EFFORT_MAX: f64 = 1.0;
    pub const KICKABLE_RADIUS: f64 = 0.7;
    pub const CATCHABLE_RADIUS: f64 = 1.3;
    /// Length of the precomputed full-power dash distance table
    pub const DASH_TABLE_LEN: usize = 50;
}

/// Ball trajectory cache bounds
pub mod trajectory {
    pub const MAX_STEPS: usize = 100;
    pub const MIN_STEPS: usize = 10;
    /// Speed under which the ball counts as stopped
    pub const STOP_SPEED: f64 = 0.01;
    /// Margin added around the pitch before the cache truncates
    pub const PITCH_MARGIN: f64 = 5.0;
    /// Keep-away training area (half extents)
    pub const KEEPAWAY_HALF_LENGTH: f64 = 10.0;
    pub const KEEPAWAY_HALF_WIDTH: f64 = 10.0;
}

/// Interception search tuning
pub mod intercept {
    /// Slack added to the reachable radius in the cheap rejection test
    pub const REACH_MARGIN: f64 = 0.5;
    /// Control radius reduction applied to our own players
    pub const TEAMMATE_CONTROL_SHRINK: f64 = 0.1;
    /// Minimum facing tolerance (degrees)
    pub const MIN_TURN_TOLERANCE_DEG: f64 = 15.0;
    /// Inside this distance a back dash replaces a >90° turn
    pub const BACK_DASH_DIST: f64 = 10.0;
    pub const MAX_BONUS_STEP: u32 = 3;
    /// Inertia horizon used for the resting-point fallback
    pub const FALLBACK_STEPS: u32 = 100;
    /// Cap on the turn simulation loop
    pub const MAX_TURN_ITERATIONS: u32 = 16;
}
