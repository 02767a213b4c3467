//! Startup configuration
//!
//! Read once, either from a query-parameter-style string
//! (`maxBallsIntro=50&rows=8&probability=0.3`) or from JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown parameter: {0}")]
    UnknownKey(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("unknown {kind} mode: {value:?}")]
    UnknownMode { kind: &'static str, value: String },

    #[error("invalid row range {min}..={max}")]
    RowRange { min: usize, max: usize },

    #[error("rows {rows} outside {min}..={max}")]
    RowsOutOfRange { rows: usize, min: usize, max: usize },

    #[error("probability {0} outside [0, 1]")]
    Probability(f64),

    #[error("{0} must be at least 1")]
    ZeroCap(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// How balls travel through the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HopperMode {
    /// Every ball is animated peg by peg
    #[default]
    Ball,
    /// Balls land instantly; the latest ball's path stays on screen
    Path,
    /// Balls land instantly with nothing drawn on the board
    None,
}

impl HopperMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HopperMode::Ball => "ball",
            HopperMode::Path => "path",
            HopperMode::None => "none",
        }
    }

    /// Whether balls animate through the pegs
    pub fn is_animated(&self) -> bool {
        matches!(self, HopperMode::Ball)
    }

    /// Seconds between new balls in this mode
    pub fn creation_interval(&self) -> f64 {
        if self.is_animated() {
            ANIMATED_CREATION_INTERVAL
        } else {
            INSTANT_CREATION_INTERVAL
        }
    }
}

impl FromStr for HopperMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ball" => Ok(HopperMode::Ball),
            "path" => Ok(HopperMode::Path),
            "none" => Ok(HopperMode::None),
            _ => Err(ConfigError::UnknownMode {
                kind: "hopper",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for HopperMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the histogram is presented. Never affects the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistogramMode {
    #[default]
    Counter,
    Cylinder,
    Fraction,
}

impl HistogramMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistogramMode::Counter => "counter",
            HistogramMode::Cylinder => "cylinder",
            HistogramMode::Fraction => "fraction",
        }
    }
}

impl FromStr for HistogramMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "counter" => Ok(HistogramMode::Counter),
            "cylinder" => Ok(HistogramMode::Cylinder),
            "fraction" => Ok(HistogramMode::Fraction),
            _ => Err(ConfigError::UnknownMode {
                kind: "histogram",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for HistogramMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    /// Total balls per Intro session
    pub max_balls_intro: usize,
    /// Balls per bin in the Lab
    pub max_balls_lab: u32,
    pub min_rows: usize,
    pub max_rows: usize,
    /// Initial row count
    pub rows: usize,
    /// Initial chance of deflecting right
    pub probability: f64,
    pub hopper_mode: HopperMode,
    pub histogram_mode: HistogramMode,
    /// Fixed RNG seed; fresh entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_balls_intro: MAX_BALLS_INTRO,
            max_balls_lab: MAX_BALLS_LAB,
            min_rows: MIN_ROWS,
            max_rows: MAX_ROWS,
            rows: DEFAULT_ROWS,
            probability: DEFAULT_PROBABILITY,
            hopper_mode: HopperMode::default(),
            histogram_mode: HistogramMode::default(),
            seed: None,
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl SimulationConfig {
    /// Parse `key=value` pairs separated by `&`, starting from the defaults
    pub fn from_query(query: &str) -> Result<Self> {
        let mut config = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
                key: pair.to_string(),
                value: String::new(),
            })?;

            match key {
                "maxBallsIntro" => config.max_balls_intro = parse_value(key, value)?,
                "maxBallsLab" => config.max_balls_lab = parse_value(key, value)?,
                "minRows" => config.min_rows = parse_value(key, value)?,
                "maxRows" => config.max_rows = parse_value(key, value)?,
                "rows" => config.rows = parse_value(key, value)?,
                "probability" => config.probability = parse_value(key, value)?,
                "hopperMode" => config.hopper_mode = value.parse()?,
                "histogramMode" => config.histogram_mode = value.parse()?,
                "seed" => config.seed = Some(parse_value(key, value)?),
                _ => return Err(ConfigError::UnknownKey(key.to_string())),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON object with the same (camelCase) keys
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_rows == 0 || self.min_rows > self.max_rows || self.max_rows > MAX_ROWS {
            return Err(ConfigError::RowRange {
                min: self.min_rows,
                max: self.max_rows,
            });
        }
        if !(self.min_rows..=self.max_rows).contains(&self.rows) {
            return Err(ConfigError::RowsOutOfRange {
                rows: self.rows,
                min: self.min_rows,
                max: self.max_rows,
            });
        }
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(ConfigError::Probability(self.probability));
        }
        if self.max_balls_intro == 0 {
            return Err(ConfigError::ZeroCap("maxBallsIntro"));
        }
        if self.max_balls_lab == 0 {
            return Err(ConfigError::ZeroCap("maxBallsLab"));
        }
        Ok(())
    }
}
