//! Intro screen: queued bursts of balls stacking in cylinders
//!
//! The user queues 1, 10 or "as many as allowed" balls; one leaves the hopper
//! per creation interval. A session launches at most `max_balls_intro` balls
//! until it is erased.

use std::fmt;
use std::str::FromStr;

use super::ball::Ball;
use super::histogram::Histogram;
use super::lattice::GaltonBoard;
use super::model::{SimEvent, SimulationCore, clamp_dt};
use super::placement::StackedPlacement;
use crate::settings::{ConfigError, HistogramMode, HopperMode, SimulationConfig};

/// How many balls one press of the drop button queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BallDrop {
    #[default]
    One,
    Ten,
    /// Everything left under the session cap
    Max,
}

impl BallDrop {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallDrop::One => "oneBall",
            BallDrop::Ten => "tenBalls",
            BallDrop::Max => "maxBalls",
        }
    }
}

impl FromStr for BallDrop {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s {
            "oneBall" => Ok(BallDrop::One),
            "tenBalls" => Ok(BallDrop::Ten),
            "maxBalls" => Ok(BallDrop::Max),
            _ => Err(ConfigError::UnknownMode {
                kind: "ball drop",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BallDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct IntroModel {
    core: SimulationCore<StackedPlacement>,
    max_balls: usize,
    /// Queued but not yet launched
    balls_to_create_number: usize,
    /// Launched this session
    launched_balls_number: usize,
    is_ball_cap_reached: bool,
}

impl IntroModel {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            core: SimulationCore::new(config, StackedPlacement),
            max_balls: config.max_balls_intro,
            balls_to_create_number: 0,
            launched_balls_number: 0,
            is_ball_cap_reached: false,
        }
    }

    pub fn core(&self) -> &SimulationCore<StackedPlacement> {
        &self.core
    }

    pub fn balls(&self) -> &[Ball] {
        self.core.balls()
    }

    pub fn histogram(&self) -> &Histogram {
        self.core.histogram()
    }

    pub fn board(&self) -> &GaltonBoard {
        self.core.board()
    }

    pub fn max_balls(&self) -> usize {
        self.max_balls
    }

    pub fn balls_to_create_number(&self) -> usize {
        self.balls_to_create_number
    }

    pub fn launched_balls_number(&self) -> usize {
        self.launched_balls_number
    }

    /// True once launched plus queued balls reach the session cap
    pub fn is_ball_cap_reached(&self) -> bool {
        self.is_ball_cap_reached
    }

    fn remaining_capacity(&self) -> usize {
        self.max_balls
            .saturating_sub(self.launched_balls_number + self.balls_to_create_number)
    }

    /// Queue balls for launch. Returns how many were actually queued.
    pub fn queue_balls(&mut self, drop: BallDrop, events: &mut Vec<SimEvent>) -> usize {
        let remaining = self.remaining_capacity();
        let requested = match drop {
            BallDrop::One => 1,
            BallDrop::Ten => 10,
            BallDrop::Max => remaining,
        };
        let queued = requested.min(remaining);
        self.balls_to_create_number += queued;
        self.update_cap(events);
        queued
    }

    fn update_cap(&mut self, events: &mut Vec<SimEvent>) {
        let reached = self.remaining_capacity() == 0;
        if reached && !self.is_ball_cap_reached {
            log::info!("Intro ball cap of {} reached", self.max_balls);
            events.push(SimEvent::BallCapReached);
        }
        self.is_ball_cap_reached = reached;
    }

    /// Advance one frame: launch at most one queued ball, then move every ball
    pub fn step(&mut self, dt: f64) -> Vec<SimEvent> {
        let dt = clamp_dt(dt);
        let mut events = Vec::new();

        self.core.ball_creation_time_elapsed += dt;
        let interval = self.core.hopper_mode().creation_interval();
        if self.balls_to_create_number > 0 && self.core.ball_creation_time_elapsed >= interval {
            self.core.launch_ball(&mut events);
            self.balls_to_create_number -= 1;
            self.launched_balls_number += 1;
            self.core.ball_creation_time_elapsed = 0.0;
        }

        self.core.advance_balls(dt, &mut events);
        events
    }

    /// Erase the session: balls, counts, queue and cap. Reports the histogram
    /// reset as `HistogramUpdated`.
    pub fn erase(&mut self) -> Vec<SimEvent> {
        self.core.clear();
        self.balls_to_create_number = 0;
        self.launched_balls_number = 0;
        self.is_ball_cap_reached = false;
        vec![SimEvent::HistogramUpdated]
    }

    /// A new value erases everything, same as [`Self::erase`]
    pub fn set_probability(&mut self, probability: f64) -> Vec<SimEvent> {
        if self.core.set_probability(probability) {
            self.erase()
        } else {
            Vec::new()
        }
    }

    pub fn set_number_of_rows(&mut self, number_of_rows: usize) -> Vec<SimEvent> {
        if self.core.set_number_of_rows(number_of_rows) {
            self.erase()
        } else {
            Vec::new()
        }
    }

    pub fn set_hopper_mode(&mut self, mode: HopperMode) {
        self.core.set_hopper_mode(mode);
    }

    pub fn set_histogram_mode(&mut self, mode: HistogramMode) {
        self.core.set_histogram_mode(mode);
    }
}
