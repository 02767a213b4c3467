//! Bin counts and running sample statistics
//!
//! Each bin tracks two counts:
//! - `bin_count`: balls whose bin is decided (booked when the ball is created)
//! - `visible_bin_count`: balls that have actually arrived
//!
//! Sample statistics follow the visible counts and are updated incrementally
//! as each ball arrives.

use serde::{Deserialize, Serialize};

use super::ball::Ball;

/// Side of the bin the most recent stacked ball leans toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    Left,
    #[default]
    Center,
    Right,
}

impl Orientation {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Orientation::Left => -1.0,
            Orientation::Center => 0.0,
            Orientation::Right => 1.0,
        }
    }

    /// Orientation of the next ball stacked on top of this one (zigzag)
    pub fn next_in_stack(self) -> Self {
        match self {
            Orientation::Left => Orientation::Right,
            Orientation::Center | Orientation::Right => Orientation::Left,
        }
    }
}

/// A single bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bin {
    pub bin_count: u32,
    pub visible_bin_count: u32,
    pub orientation: Orientation,
}

/// Sample statistics of the landed balls
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleStatistics {
    pub landed_balls_number: u32,
    pub average: f64,
    pub sum_of_squares: f64,
    /// Unbiased (N - 1) sample variance; 0 for fewer than two balls
    pub variance: f64,
    pub standard_deviation: f64,
    pub standard_deviation_of_mean: f64,
}

/// Histogram of bin counts plus running statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    /// Sized for the largest board; only `number_of_rows + 1` are active
    bins: Vec<Bin>,
    number_of_rows: usize,
    statistics: SampleStatistics,
    /// Bumped on every change so renderers know when to redraw
    revision: u64,
}

impl Histogram {
    pub fn new(number_of_rows: usize, max_rows: usize) -> Self {
        assert!(number_of_rows <= max_rows);
        Self {
            bins: vec![Bin::default(); max_rows + 1],
            number_of_rows,
            statistics: SampleStatistics::default(),
            revision: 0,
        }
    }

    pub fn number_of_rows(&self) -> usize {
        self.number_of_rows
    }

    pub fn number_of_bins(&self) -> usize {
        self.number_of_rows + 1
    }

    /// Switch to a new row count. Every booked ball is invalidated.
    pub fn set_number_of_rows(&mut self, number_of_rows: usize) {
        assert!(
            number_of_rows < self.bins.len(),
            "row count {} exceeds histogram capacity {}",
            number_of_rows,
            self.bins.len() - 1
        );
        self.number_of_rows = number_of_rows;
        self.reset();
    }

    /// Zero every bin and statistic
    pub fn reset(&mut self) {
        self.bins.fill(Bin::default());
        self.statistics = SampleStatistics::default();
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Active bins
    pub fn bins(&self) -> &[Bin] {
        &self.bins[..self.number_of_bins()]
    }

    pub fn bin(&self, bin_index: usize) -> &Bin {
        self.assert_active(bin_index);
        &self.bins[bin_index]
    }

    pub fn bin_count(&self, bin_index: usize) -> u32 {
        self.bin(bin_index).bin_count
    }

    pub fn visible_bin_count(&self, bin_index: usize) -> u32 {
        self.bin(bin_index).visible_bin_count
    }

    /// Book a ball into its bin as soon as its path is known
    pub fn update_bin_count_and_orientation(&mut self, ball: &Ball) {
        self.book_bin(ball.bin_index(), ball.resting_offset().orientation);
    }

    pub fn book_bin(&mut self, bin_index: usize, orientation: Orientation) {
        self.assert_active(bin_index);
        let bin = &mut self.bins[bin_index];
        bin.bin_count += 1;
        bin.orientation = orientation;
        self.revision += 1;
    }

    /// Count a ball that has arrived in its bin
    pub fn add_ball_to_histogram(&mut self, ball: &Ball) {
        self.add_landed_bin(ball.bin_index());
    }

    pub fn add_landed_bin(&mut self, bin_index: usize) {
        self.assert_active(bin_index);
        self.bins[bin_index].visible_bin_count += 1;
        self.update_statistics(bin_index);
        self.revision += 1;
    }

    fn update_statistics(&mut self, bin_index: usize) {
        let stats = &mut self.statistics;
        let k = bin_index as f64;

        stats.landed_balls_number += 1;
        let n = stats.landed_balls_number as f64;
        stats.average = ((n - 1.0) * stats.average + k) / n;
        stats.sum_of_squares += k * k;

        if stats.landed_balls_number > 1 {
            // Rounding can leave a hair below zero when every sample is equal
            stats.variance = ((stats.sum_of_squares - n * stats.average * stats.average)
                / (n - 1.0))
                .max(0.0);
            stats.standard_deviation = stats.variance.sqrt();
            stats.standard_deviation_of_mean = stats.standard_deviation / n.sqrt();
        } else {
            stats.variance = 0.0;
            stats.standard_deviation = 0.0;
            stats.standard_deviation_of_mean = 0.0;
        }
    }

    /// Recompute the statistics from the visible bin counts in one go
    pub fn initialize_statistics(&mut self) {
        let bins = &self.bins[..self.number_of_rows + 1];
        let landed: u32 = bins.iter().map(|b| b.visible_bin_count).sum();

        let mut stats = SampleStatistics {
            landed_balls_number: landed,
            ..SampleStatistics::default()
        };

        if landed > 0 {
            let n = landed as f64;
            let weighted = |f: &dyn Fn(f64) -> f64| -> f64 {
                bins.iter()
                    .enumerate()
                    .map(|(k, b)| b.visible_bin_count as f64 * f(k as f64))
                    .sum()
            };

            stats.average = weighted(&|k| k) / n;
            stats.sum_of_squares = weighted(&|k| k * k);

            if landed > 1 {
                let average = stats.average;
                stats.variance = weighted(&|k| (k - average) * (k - average)) / (n - 1.0);
                stats.standard_deviation = stats.variance.sqrt();
                stats.standard_deviation_of_mean = stats.standard_deviation / n.sqrt();
            }
        }

        self.statistics = stats;
        self.revision += 1;
    }

    /// Snapshot of the running statistics
    pub fn sample_statistics(&self) -> SampleStatistics {
        self.statistics
    }

    pub fn landed_balls_number(&self) -> u32 {
        self.statistics.landed_balls_number
    }

    pub fn average(&self) -> f64 {
        self.statistics.average
    }

    pub fn variance(&self) -> f64 {
        self.statistics.variance
    }

    pub fn standard_deviation(&self) -> f64 {
        self.statistics.standard_deviation
    }

    pub fn standard_deviation_of_mean(&self) -> f64 {
        self.statistics.standard_deviation_of_mean
    }

    /// Share of landed balls in a bin, 0 before any ball lands
    pub fn fractional_bin_count(&self, bin_index: usize) -> f64 {
        let landed = self.statistics.landed_balls_number;
        if landed == 0 {
            0.0
        } else {
            self.visible_bin_count(bin_index) as f64 / landed as f64
        }
    }

    /// Fractional counts of every active bin
    pub fn fractional_distribution(&self) -> Vec<f64> {
        (0..self.number_of_bins())
            .map(|i| self.fractional_bin_count(i))
            .collect()
    }

    /// Visible counts scaled so the tallest bar is 1 (all zero when empty)
    pub fn normalized_sample_distribution(&self) -> Vec<f64> {
        let max = self.maximum_bin_count().max(1) as f64;
        self.bins()
            .iter()
            .map(|b| b.visible_bin_count as f64 / max)
            .collect()
    }

    /// Largest booked count, including balls still falling
    pub fn maximum_actual_bin_count(&self) -> u32 {
        self.bins().iter().map(|b| b.bin_count).max().unwrap_or(0)
    }

    /// Largest visible count
    pub fn maximum_bin_count(&self) -> u32 {
        self.bins()
            .iter()
            .map(|b| b.visible_bin_count)
            .max()
            .unwrap_or(0)
    }

    fn assert_active(&self, bin_index: usize) {
        assert!(
            bin_index < self.number_of_bins(),
            "bin index {} out of range for {} bins",
            bin_index,
            self.number_of_bins()
        );
    }
}
