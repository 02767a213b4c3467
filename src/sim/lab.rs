//! Lab screen: continuous drip of balls while playing
//!
//! The cap here is per bin: play stops once any bin has `max_balls_lab`
//! balls booked, so the total can grow far past any single-bin limit.
//! Landed balls are dropped as soon as a newer one lands, keeping the live
//! collection small during indefinite play.

use super::ball::Ball;
use super::histogram::Histogram;
use super::lattice::GaltonBoard;
use super::model::{SimEvent, SimulationCore, clamp_dt};
use super::placement::FloorPlacement;
use crate::settings::{HistogramMode, HopperMode, SimulationConfig};

#[derive(Debug, Clone)]
pub struct LabModel {
    core: SimulationCore<FloorPlacement>,
    max_balls_per_bin: u32,
    is_playing: bool,
    is_ball_cap_reached: bool,
    /// Most recently collected ball, kept until its successor lands
    last_collected: Option<u32>,
}

impl LabModel {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            core: SimulationCore::new(config, FloorPlacement),
            max_balls_per_bin: config.max_balls_lab,
            is_playing: false,
            is_ball_cap_reached: false,
            last_collected: None,
        }
    }

    pub fn core(&self) -> &SimulationCore<FloorPlacement> {
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

    pub fn max_balls_per_bin(&self) -> u32 {
        self.max_balls_per_bin
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_ball_cap_reached(&self) -> bool {
        self.is_ball_cap_reached
    }

    /// Start or stop the drip. Starting is refused once the cap is reached.
    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing && !self.is_ball_cap_reached;
    }

    pub fn toggle_playing(&mut self) {
        self.set_playing(!self.is_playing);
    }

    /// Stop play if any bin is full. Returns true if the cap is reached.
    fn check_cap(&mut self, events: &mut Vec<SimEvent>) -> bool {
        if self.core.histogram().maximum_actual_bin_count() < self.max_balls_per_bin {
            return false;
        }
        if !self.is_ball_cap_reached {
            log::info!(
                "Lab bin cap of {} reached after {} balls",
                self.max_balls_per_bin,
                self.core.histogram().landed_balls_number()
            );
            events.push(SimEvent::BallCapReached);
        }
        self.is_ball_cap_reached = true;
        self.is_playing = false;
        true
    }

    /// Advance one frame: launch every ball due while playing, move every
    /// ball, then drop superseded landed balls
    pub fn step(&mut self, dt: f64) -> Vec<SimEvent> {
        let dt = clamp_dt(dt);
        let mut events = Vec::new();

        if self.is_playing {
            self.core.ball_creation_time_elapsed += dt;
            let interval = self.core.hopper_mode().creation_interval();
            while self.core.ball_creation_time_elapsed >= interval {
                if self.check_cap(&mut events) {
                    break;
                }
                self.core.launch_ball(&mut events);
                self.core.ball_creation_time_elapsed -= interval;
            }
            self.check_cap(&mut events);
        }

        self.core.advance_balls(dt, &mut events);

        if let Some(ball_id) = events.iter().rev().find_map(|e| match e {
            SimEvent::BallCollected { ball_id } => Some(*ball_id),
            _ => None,
        }) {
            self.last_collected = Some(ball_id);
        }
        self.core.retain_collected(self.last_collected);

        events
    }

    /// Clear balls and counts; the cap is lifted. Reports the histogram reset
    /// as `HistogramUpdated`.
    pub fn erase(&mut self) -> Vec<SimEvent> {
        self.core.clear();
        self.is_ball_cap_reached = false;
        self.last_collected = None;
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
