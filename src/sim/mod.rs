//! Deterministic simulation module
//!
//! All board logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, injected into path generation
//! - A ball's path is fixed when it is created
//! - Stable iteration order (by ball ID)
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod binomial;
pub mod histogram;
pub mod intro;
pub mod lab;
pub mod lattice;
pub mod model;
pub mod placement;

pub use ball::{Ball, BallEvent, BallPhase, BallStep, Direction, PegVisit, RestingOffset, generate_path};
pub use binomial::{
    binomial_coefficient, binomial_distribution, binomial_probability,
    normalized_binomial_distribution, theoretical_average, theoretical_standard_deviation,
    theoretical_standard_error,
};
pub use histogram::{Bin, Histogram, Orientation, SampleStatistics};
pub use intro::{BallDrop, IntroModel};
pub use lab::LabModel;
pub use lattice::{GaltonBoard, Peg, bin_center_x, peg_position, peg_spacing};
pub use model::{SimEvent, SimulationCore, clamp_dt};
pub use placement::{
    BallFactory, FloorPlacement, IntroBallFactory, LabBallFactory, RestingPlacement,
    StackedPlacement,
};
