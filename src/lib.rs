//! Galton Board - bean machine trajectory and statistics engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lattice, ball trajectories, histogram, models)
//! - `settings`: Startup configuration read from query-parameter-style strings

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, SimulationConfig};

/// Simulation configuration constants
pub mod consts {
    /// Normalized board width; peg spacing is this divided by (rows + 1)
    pub const BOARD_WIDTH: f64 = 1.0;
    /// Vertical peg placement fraction (pegs sit this far below the hopper)
    pub const PEG_OFFSET: f64 = 0.7;
    /// Ball radius as a fraction of peg separation
    pub const BALL_SIZE_FRACTION: f64 = 0.2;

    /// Largest frame dt applied to ball advancement (seconds)
    pub const MAX_STEP_DT: f64 = 0.090;
    /// Rows traversed per second of (clamped) frame time
    pub const FALL_SPEED: f64 = 5.0;
    /// Fall speed after the last peg row, in peg separations per unit ratio
    pub const EXIT_SPEED_FACTOR: f64 = 2.0;

    /// Seconds between new balls when every ball is animated
    pub const ANIMATED_CREATION_INTERVAL: f64 = 0.1;
    /// Seconds between new balls when balls land instantly
    pub const INSTANT_CREATION_INTERVAL: f64 = 0.01;

    /// Row-count range
    pub const MIN_ROWS: usize = 1;
    pub const MAX_ROWS: usize = 26;
    pub const DEFAULT_ROWS: usize = 12;
    pub const DEFAULT_PROBABILITY: f64 = 0.5;

    /// Total balls per Intro session
    pub const MAX_BALLS_INTRO: usize = 100;
    /// Balls per bin in the Lab
    pub const MAX_BALLS_LAB: u32 = 9999;

    /// Depth of an Intro cylinder below the last row, in peg separations
    pub const CYLINDER_DEPTH: f64 = 6.0;
    /// Vertical stacking distance between Intro balls, in ball diameters
    pub const STACK_PACKING: f64 = 0.87;
    /// Horizontal zigzag of stacked Intro balls, in ball radii
    pub const STACK_ZIGZAG: f64 = 0.5;
    /// Depth of a Lab bin floor below the last row, in peg separations
    pub const LAB_BIN_DEPTH: f64 = 1.0;
}
