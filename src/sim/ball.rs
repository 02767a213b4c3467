//! Ball trajectory state machine
//!
//! A ball's whole path through the pegs is drawn once, when it is created.
//! Stepping only animates that fixed path, so the final bin is known
//! immediately and the histogram can book it before the ball lands.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::histogram::Orientation;
use super::lattice::{peg_position, peg_spacing};
use crate::consts::{BALL_SIZE_FRACTION, EXIT_SPEED_FACTOR, PEG_OFFSET};

/// Deflection taken at a peg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Horizontal shift (in peg separations) toward the next row
    #[inline]
    pub fn shift(self) -> f64 {
        match self {
            Direction::Left => -0.5,
            Direction::Right => 0.5,
        }
    }
}

/// Stage of a ball's fall. Phases only ever advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BallPhase {
    /// Dropping from the hopper onto the first peg
    Initial,
    /// Bouncing between peg rows
    Falling,
    /// Past the last row, dropping into the bin
    Exited,
    /// Resting in the bin
    Collected,
}

/// One row of a ball's pre-computed path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PegVisit {
    pub row_number: usize,
    pub column_number: usize,
    pub position: DVec2,
    pub direction: Direction,
}

/// Phase-transition notifications produced by [`Ball::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallEvent {
    /// Ball reached a peg and deflected
    PegHit(Direction),
    /// Ball left the last peg row; its bin is final
    Exited,
    /// Ball came to rest in its bin
    Collected,
}

/// Result of a single [`Ball::step`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BallStep {
    /// False once the ball is collected (nothing to redraw)
    pub moved: bool,
    pub events: Vec<BallEvent>,
}

/// Where inside its bin a ball comes to rest
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RestingOffset {
    /// Offset from the bin center
    pub horizontal: f64,
    /// Resting height in board coordinates (before the peg offset bias)
    pub vertical: f64,
    pub orientation: Orientation,
}

/// Draw a ball's path through `number_of_rows` rows.
///
/// Returns `number_of_rows + 1` entries: one per peg row plus the virtual
/// row the bins sit on. Every entry draws a direction, but only the first
/// `number_of_rows` move the ball to a new column, so the last entry's
/// column is the bin index. `probability` is the chance of going right.
pub fn generate_path<R: Rng + ?Sized>(
    probability: f64,
    number_of_rows: usize,
    rng: &mut R,
) -> Vec<PegVisit> {
    assert!(
        (0.0..=1.0).contains(&probability),
        "probability {} outside [0, 1]",
        probability
    );

    let mut path = Vec::with_capacity(number_of_rows + 1);
    let mut column_number = 0;
    for row_number in 0..=number_of_rows {
        let direction = if rng.random_bool(probability) {
            Direction::Right
        } else {
            Direction::Left
        };
        path.push(PegVisit {
            row_number,
            column_number,
            position: peg_position(row_number, column_number, number_of_rows),
            direction,
        });
        if row_number < number_of_rows && direction == Direction::Right {
            column_number += 1;
        }
    }
    path
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    probability: f64,
    /// Row count when the ball was created; later changes never affect it
    number_of_rows: usize,
    peg_separation: f64,
    radius: f64,
    path: Vec<PegVisit>,
    /// Index into `path` of the next peg to reach
    next_peg: usize,
    bin_index: usize,
    phase: BallPhase,
    /// Progress through the current row (0..1); distance fallen once exited
    fallen_ratio: f64,
    resting: RestingOffset,
    position: DVec2,
}

impl Ball {
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        probability: f64,
        number_of_rows: usize,
        rng: &mut R,
    ) -> Self {
        let path = generate_path(probability, number_of_rows, rng);
        Self::from_path(id, probability, path)
    }

    /// Build a ball that follows an already drawn path
    pub fn from_path(id: u32, probability: f64, path: Vec<PegVisit>) -> Self {
        assert!(!path.is_empty(), "a ball path needs at least the bin row");
        let number_of_rows = path.len() - 1;
        let peg_separation = peg_spacing(number_of_rows);
        let bin_index = path[number_of_rows].column_number;

        let mut ball = Self {
            id,
            probability,
            number_of_rows,
            peg_separation,
            radius: peg_separation * BALL_SIZE_FRACTION,
            path,
            next_peg: 0,
            bin_index,
            phase: BallPhase::Initial,
            fallen_ratio: 0.0,
            resting: RestingOffset::default(),
            position: DVec2::ZERO,
        };
        ball.update_position();
        ball
    }

    /// Attach the in-bin resting spot computed by the owning screen
    pub fn with_resting_offset(mut self, resting: RestingOffset) -> Self {
        self.resting = resting;
        self.update_position();
        self
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn number_of_rows(&self) -> usize {
        self.number_of_rows
    }

    pub fn peg_separation(&self) -> f64 {
        self.peg_separation
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn bin_index(&self) -> usize {
        self.bin_index
    }

    pub fn phase(&self) -> BallPhase {
        self.phase
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn resting_offset(&self) -> RestingOffset {
        self.resting
    }

    /// Full pre-computed path, including pegs already passed
    pub fn path(&self) -> &[PegVisit] {
        &self.path
    }

    /// Pegs not yet reached
    pub fn remaining_pegs(&self) -> &[PegVisit] {
        &self.path[self.next_peg..]
    }

    /// Last peg reached (the first peg while still in the hopper)
    pub fn current_peg(&self) -> &PegVisit {
        &self.path[self.next_peg.saturating_sub(1)]
    }

    /// Advance the ball by `df` rows' worth of progress.
    ///
    /// At most one phase transition happens per call; leftover progress at a
    /// transition is dropped.
    pub fn step(&mut self, df: f64) -> BallStep {
        let mut events = Vec::new();

        match self.phase {
            BallPhase::Initial | BallPhase::Falling => {
                if self.fallen_ratio + df < 1.0 {
                    self.fallen_ratio += df;
                } else {
                    self.fallen_ratio = 0.0;
                    let peg = self.path[self.next_peg];
                    self.next_peg += 1;

                    if self.next_peg == self.path.len() {
                        self.phase = BallPhase::Exited;
                        events.push(BallEvent::Exited);
                    } else {
                        self.phase = BallPhase::Falling;
                        events.push(BallEvent::PegHit(peg.direction));
                    }
                }
            }
            BallPhase::Exited => {
                // Drops into the bin faster than it bounces
                self.fallen_ratio += EXIT_SPEED_FACTOR * self.peg_separation * df;
                if self.current_peg().position.y - self.fallen_ratio <= self.resting.vertical {
                    self.phase = BallPhase::Collected;
                    events.push(BallEvent::Collected);
                }
            }
            BallPhase::Collected => {
                return BallStep {
                    moved: false,
                    events,
                };
            }
        }

        self.update_position();
        BallStep {
            moved: true,
            events,
        }
    }

    /// Skip the animation: jump straight to the bin.
    ///
    /// Only acts on a ball still in the hopper; returns the exit and collect
    /// events so statistics update exactly as for an animated ball.
    pub fn update_statistics_and_land(&mut self) -> Vec<BallEvent> {
        if self.phase != BallPhase::Initial {
            return Vec::new();
        }
        self.next_peg = self.path.len();
        self.fallen_ratio = 0.0;
        self.phase = BallPhase::Collected;
        self.update_position();
        vec![BallEvent::Exited, BallEvent::Collected]
    }

    fn update_position(&mut self) {
        let sep = self.peg_separation;
        let ratio = self.fallen_ratio;
        let bias = DVec2::new(0.0, sep * PEG_OFFSET);

        self.position = match self.phase {
            BallPhase::Initial => DVec2::new(0.0, 1.0 - ratio) * sep + self.path[0].position + bias,
            BallPhase::Falling => {
                let peg = self.current_peg();
                let mut offset = DVec2::new(peg.direction.shift() * ratio, -ratio * ratio) * sep;
                // Curve into the final bin column during the last row
                if self.remaining_pegs().len() == 1 {
                    offset.x += self.resting.horizontal * ratio;
                }
                offset + peg.position + bias
            }
            BallPhase::Exited => {
                DVec2::new(self.resting.horizontal, -ratio) + self.current_peg().position + bias
            }
            BallPhase::Collected => {
                DVec2::new(
                    self.resting.horizontal + self.current_peg().position.x,
                    self.resting.vertical,
                ) + bias
            }
        };
    }
}
