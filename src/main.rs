//! Galton Board headless runner
//!
//! Plays the Lab screen for a fixed number of frames and prints the sample
//! histogram next to the binomial prediction as JSON.
//!
//! Usage: `galton-board [query] [frames]`, e.g.
//! `galton-board "rows=10&probability=0.3&hopperMode=none&seed=7" 2000`

use serde::Serialize;

use galton_board::SimulationConfig;
use galton_board::sim::{
    LabModel, SimEvent, binomial_distribution, theoretical_average,
    theoretical_standard_deviation, theoretical_standard_error,
};

/// Frame time of the simulated host loop (60 Hz)
const FRAME_DT: f64 = 1.0 / 60.0;
const DEFAULT_FRAMES: usize = 3600;

#[derive(Debug, Serialize)]
struct StatisticsSummary {
    average: f64,
    standard_deviation: f64,
    standard_error: f64,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    rows: usize,
    probability: f64,
    frames: usize,
    landed_balls: u32,
    peg_hits: usize,
    cap_reached: bool,
    sample: StatisticsSummary,
    theoretical: StatisticsSummary,
    bin_counts: Vec<u32>,
    sample_fractions: Vec<f64>,
    theoretical_fractions: Vec<f64>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Galton Board (headless) starting...");

    let mut args = std::env::args().skip(1);
    let query = args.next().unwrap_or_default();
    let config = match SimulationConfig::from_query(&query) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Bad configuration: {}", e);
            std::process::exit(2);
        }
    };
    let frames = match args.next().map(|f| f.parse::<usize>()) {
        None => DEFAULT_FRAMES,
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::error!("Bad frame count: {}", e);
            std::process::exit(2);
        }
    };

    let summary = run(&config, frames);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive the models directly
}

fn run(config: &SimulationConfig, frames: usize) -> RunSummary {
    let mut model = LabModel::new(config);
    model.set_playing(true);

    let mut peg_hits = 0;
    for _ in 0..frames {
        for event in model.step(FRAME_DT) {
            if matches!(event, SimEvent::PegHit { .. }) {
                peg_hits += 1;
            }
        }
        if !model.is_playing() {
            break;
        }
    }

    let histogram = model.histogram();
    let rows = histogram.number_of_rows();
    let probability = model.core().probability();
    let landed = histogram.landed_balls_number();
    log::info!("Run finished: {} balls landed", landed);

    RunSummary {
        seed: model.core().seed(),
        rows,
        probability,
        frames,
        landed_balls: landed,
        peg_hits,
        cap_reached: model.is_ball_cap_reached(),
        sample: StatisticsSummary {
            average: histogram.average(),
            standard_deviation: histogram.standard_deviation(),
            standard_error: histogram.standard_deviation_of_mean(),
        },
        theoretical: StatisticsSummary {
            average: theoretical_average(rows, probability),
            standard_deviation: theoretical_standard_deviation(rows, probability),
            standard_error: theoretical_standard_error(rows, probability, landed),
        },
        bin_counts: histogram.bins().iter().map(|b| b.visible_bin_count).collect(),
        sample_fractions: histogram.fractional_distribution(),
        theoretical_fractions: binomial_distribution(rows, probability),
    }
}
