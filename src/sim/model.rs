//! State shared by the Intro and Lab models
//!
//! Owns the board, the histogram, the live balls and the RNG. Everything is
//! mutated from a single `step` per frame or from direct user actions, so
//! there is no locking anywhere.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ball::{Ball, BallEvent, BallPhase, Direction};
use super::histogram::Histogram;
use super::lattice::GaltonBoard;
use super::placement::{BallFactory, RestingPlacement};
use crate::consts::{FALL_SPEED, MAX_STEP_DT};
use crate::settings::{HistogramMode, HopperMode, SimulationConfig};

/// Notifications produced by a model step or user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// A ball left the hopper; its bin is already booked
    BallCreated { ball_id: u32, bin_index: usize },
    /// A ball bounced off a peg
    PegHit { ball_id: u32, direction: Direction },
    /// A ball passed the last row and was counted
    BallExited { ball_id: u32, bin_index: usize },
    /// A ball came to rest
    BallCollected { ball_id: u32 },
    /// Histogram contents changed
    HistogramUpdated,
    /// The ball cap was just reached
    BallCapReached,
}

/// Clamp frame time so a slow frame never teleports balls across rows.
/// A non-finite frame time counts as no time at all.
#[inline]
pub fn clamp_dt(dt: f64) -> f64 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_STEP_DT)
}

/// Translate one ball's step events, counting it when it exits
fn apply_ball_events(
    ball: &Ball,
    ball_events: &[BallEvent],
    histogram: &mut Histogram,
    events: &mut Vec<SimEvent>,
) {
    for event in ball_events {
        match *event {
            BallEvent::PegHit(direction) => events.push(SimEvent::PegHit {
                ball_id: ball.id,
                direction,
            }),
            BallEvent::Exited => {
                histogram.add_ball_to_histogram(ball);
                events.push(SimEvent::BallExited {
                    ball_id: ball.id,
                    bin_index: ball.bin_index(),
                });
                events.push(SimEvent::HistogramUpdated);
            }
            BallEvent::Collected => {
                log::debug!("Ball {} collected in bin {}", ball.id, ball.bin_index());
                events.push(SimEvent::BallCollected { ball_id: ball.id });
            }
        }
    }
}

/// Board, histogram and live balls for one screen
#[derive(Debug, Clone)]
pub struct SimulationCore<P> {
    probability: f64,
    min_rows: usize,
    max_rows: usize,
    board: GaltonBoard,
    histogram: Histogram,
    /// Live balls (sorted by id)
    balls: Vec<Ball>,
    factory: BallFactory<P>,
    seed: u64,
    rng: Pcg32,
    hopper_mode: HopperMode,
    histogram_mode: HistogramMode,
    /// Seconds since the last ball was created
    pub(crate) ball_creation_time_elapsed: f64,
    next_id: u32,
}

impl<P: RestingPlacement> SimulationCore<P> {
    pub fn new(config: &SimulationConfig, placement: P) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!(
            "Simulation starting: rows={} probability={} seed={}",
            config.rows,
            config.probability,
            seed
        );

        Self {
            probability: config.probability,
            min_rows: config.min_rows,
            max_rows: config.max_rows,
            board: GaltonBoard::new(config.rows, config.max_rows),
            histogram: Histogram::new(config.rows, config.max_rows),
            balls: Vec::new(),
            factory: BallFactory::new(placement),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            hopper_mode: config.hopper_mode,
            histogram_mode: config.histogram_mode,
            ball_creation_time_elapsed: 0.0,
            next_id: 1,
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn number_of_rows(&self) -> usize {
        self.board.row_count()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> &GaltonBoard {
        &self.board
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn hopper_mode(&self) -> HopperMode {
        self.hopper_mode
    }

    pub fn histogram_mode(&self) -> HistogramMode {
        self.histogram_mode
    }

    pub fn set_hopper_mode(&mut self, mode: HopperMode) {
        self.hopper_mode = mode;
    }

    pub fn set_histogram_mode(&mut self, mode: HistogramMode) {
        self.histogram_mode = mode;
    }

    /// Change the chance of deflecting right. Returns true if it changed,
    /// in which case every ball and count is cleared.
    pub fn set_probability(&mut self, probability: f64) -> bool {
        assert!(
            (0.0..=1.0).contains(&probability),
            "probability {} outside [0, 1]",
            probability
        );
        if probability == self.probability {
            return false;
        }
        log::info!("Probability {} -> {}", self.probability, probability);
        self.probability = probability;
        self.clear();
        true
    }

    /// Change the row count. Returns true if it changed, in which case every
    /// ball and count is cleared.
    pub fn set_number_of_rows(&mut self, number_of_rows: usize) -> bool {
        assert!(
            (self.min_rows..=self.max_rows).contains(&number_of_rows),
            "rows {} outside {}..={}",
            number_of_rows,
            self.min_rows,
            self.max_rows
        );
        if number_of_rows == self.board.row_count() {
            return false;
        }
        log::info!("Rows {} -> {}", self.board.row_count(), number_of_rows);
        self.board.set_row_count(number_of_rows);
        self.balls.clear();
        self.histogram.set_number_of_rows(number_of_rows);
        self.ball_creation_time_elapsed = 0.0;
        true
    }

    /// Remove every ball and zero the histogram
    pub fn clear(&mut self) {
        self.balls.clear();
        self.histogram.reset();
        self.ball_creation_time_elapsed = 0.0;
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a ball, book its bin, and land it at once if balls are not
    /// animated in the current hopper mode
    pub fn launch_ball(&mut self, events: &mut Vec<SimEvent>) {
        let id = self.next_entity_id();
        let mut ball = self.factory.create(
            id,
            self.probability,
            self.board.row_count(),
            &self.histogram,
            &mut self.rng,
        );
        self.histogram.update_bin_count_and_orientation(&ball);
        log::debug!("Ball {} created, bound for bin {}", id, ball.bin_index());
        events.push(SimEvent::BallCreated {
            ball_id: id,
            bin_index: ball.bin_index(),
        });
        events.push(SimEvent::HistogramUpdated);

        if !self.hopper_mode.is_animated() {
            let landed = ball.update_statistics_and_land();
            apply_ball_events(&ball, &landed, &mut self.histogram, events);
        }
        self.balls.push(ball);
    }

    /// Advance every live ball by an already clamped `dt`
    pub fn advance_balls(&mut self, dt: f64, events: &mut Vec<SimEvent>) {
        let df = dt * FALL_SPEED;
        for ball in &mut self.balls {
            let step = ball.step(df);
            apply_ball_events(ball, &step.events, &mut self.histogram, events);
        }
    }

    /// Drop collected balls except `keep`
    pub fn retain_collected(&mut self, keep: Option<u32>) {
        self.balls
            .retain(|b| b.phase() != BallPhase::Collected || Some(b.id) == keep);
    }

    /// Balls not yet resting
    pub fn balls_in_flight(&self) -> usize {
        self.balls
            .iter()
            .filter(|b| b.phase() != BallPhase::Collected)
            .count()
    }
}
