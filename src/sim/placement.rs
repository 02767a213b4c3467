//! Where a ball comes to rest inside its bin
//!
//! The trajectory is the same everywhere; only the final resting spot
//! differs between screens:
//! - Intro: balls stack up in a cylinder, zigzagging left and right
//! - Lab: balls all rest on the bin floor (the histogram shows the counts)

use rand::Rng;

use super::ball::{Ball, RestingOffset};
use super::histogram::{Bin, Histogram, Orientation};
use super::lattice::peg_position_y;
use crate::consts::{CYLINDER_DEPTH, LAB_BIN_DEPTH, STACK_PACKING, STACK_ZIGZAG};

/// Resting-spot strategy
pub trait RestingPlacement {
    /// `bin` is the ball's bin before this ball is booked into it
    fn resting_offset(&self, ball: &Ball, bin: &Bin) -> RestingOffset;
}

/// Height of the row the bins hang from
fn bin_row_y(ball: &Ball) -> f64 {
    let rows = ball.number_of_rows();
    peg_position_y(rows, rows)
}

/// Intro screen: balls pile up in cylinders
#[derive(Debug, Clone, Copy, Default)]
pub struct StackedPlacement;

impl RestingPlacement for StackedPlacement {
    fn resting_offset(&self, ball: &Ball, bin: &Bin) -> RestingOffset {
        let radius = ball.radius();
        let top = bin_row_y(ball);
        let floor = top - CYLINDER_DEPTH * ball.peg_separation();
        let level = bin.bin_count as f64;

        let orientation = if bin.bin_count == 0 {
            Orientation::Center
        } else {
            bin.orientation.next_in_stack()
        };

        // An overfull cylinder keeps its extra balls at the rim
        let vertical = (floor + radius + level * 2.0 * radius * STACK_PACKING).min(top);

        RestingOffset {
            horizontal: orientation.sign() * STACK_ZIGZAG * radius,
            vertical,
            orientation,
        }
    }
}

/// Lab screen: every ball rests on the floor of its bin
#[derive(Debug, Clone, Copy, Default)]
pub struct FloorPlacement;

impl RestingPlacement for FloorPlacement {
    fn resting_offset(&self, ball: &Ball, _bin: &Bin) -> RestingOffset {
        RestingOffset {
            horizontal: 0.0,
            vertical: bin_row_y(ball) - LAB_BIN_DEPTH * ball.peg_separation() + ball.radius(),
            orientation: Orientation::Center,
        }
    }
}

/// Builds balls with a screen-specific resting spot
#[derive(Debug, Clone, Default)]
pub struct BallFactory<P> {
    placement: P,
}

pub type IntroBallFactory = BallFactory<StackedPlacement>;
pub type LabBallFactory = BallFactory<FloorPlacement>;

impl<P: RestingPlacement> BallFactory<P> {
    pub fn new(placement: P) -> Self {
        Self { placement }
    }

    /// Draw a new ball's path and place it against the bin's current occupancy.
    ///
    /// The caller books the returned ball into the histogram.
    pub fn create<R: Rng + ?Sized>(
        &self,
        id: u32,
        probability: f64,
        number_of_rows: usize,
        histogram: &Histogram,
        rng: &mut R,
    ) -> Ball {
        let ball = Ball::new(id, probability, number_of_rows, rng);
        let resting = self
            .placement
            .resting_offset(&ball, histogram.bin(ball.bin_index()));
        ball.with_resting_offset(resting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_stacked_balls_zigzag_upward() {
        let factory = IntroBallFactory::default();
        let mut histogram = Histogram::new(6, 26);
        let mut rng = Pcg32::seed_from_u64(1);

        let mut previous: Option<RestingOffset> = None;
        for id in 0..4 {
            // probability 1: every ball lands in bin 6
            let ball = factory.create(id, 1.0, 6, &histogram, &mut rng);
            let resting = ball.resting_offset();
            match previous {
                None => assert_eq!(resting.orientation, Orientation::Center),
                Some(prev) => {
                    assert!(resting.vertical > prev.vertical);
                    assert_ne!(resting.orientation, prev.orientation);
                    assert_ne!(resting.orientation, Orientation::Center);
                }
            }
            histogram.update_bin_count_and_orientation(&ball);
            previous = Some(resting);
        }
        assert_eq!(histogram.bin_count(6), 4);
    }

    #[test]
    fn test_overfull_cylinder_clamps_to_rim() {
        let factory = IntroBallFactory::default();
        let mut histogram = Histogram::new(2, 26);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            histogram.book_bin(0, Orientation::Left);
        }
        let ball = factory.create(1, 0.0, 2, &histogram, &mut rng);
        assert!(ball.resting_offset().vertical <= peg_position_y(2, 2));
    }

    #[test]
    fn test_floor_placement_is_a_single_row() {
        let factory = LabBallFactory::default();
        let mut histogram = Histogram::new(8, 26);
        let mut rng = Pcg32::seed_from_u64(2);

        let first = factory.create(1, 0.0, 8, &histogram, &mut rng);
        histogram.update_bin_count_and_orientation(&first);
        let second = factory.create(2, 0.0, 8, &histogram, &mut rng);

        assert_eq!(first.resting_offset(), second.resting_offset());
        assert_eq!(first.resting_offset().horizontal, 0.0);
        assert!(first.resting_offset().vertical < peg_position_y(8, 8));
    }
}
