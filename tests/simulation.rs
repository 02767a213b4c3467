//! End-to-end runs of both screens with fixed seeds

use approx::{assert_abs_diff_eq, assert_relative_eq};

use galton_board::SimulationConfig;
use galton_board::consts::MAX_STEP_DT;
use galton_board::settings::HopperMode;
use galton_board::sim::{
    BallDrop, BallPhase, IntroModel, LabModel, SimEvent, bin_center_x, binomial_distribution,
    theoretical_average, theoretical_standard_deviation,
};

fn config(query: &str) -> SimulationConfig {
    SimulationConfig::from_query(query).unwrap()
}

/// Play the Lab until at least `balls` have landed
fn lab_with_landed(query: &str, balls: u32) -> LabModel {
    let mut model = LabModel::new(&config(query));
    model.set_playing(true);
    for _ in 0..100_000 {
        model.step(MAX_STEP_DT);
        if model.histogram().landed_balls_number() >= balls {
            break;
        }
    }
    model
}

#[test]
fn test_lab_sample_converges_to_binomial() {
    let model = lab_with_landed("rows=12&probability=0.5&hopperMode=none&seed=42", 5000);
    let histogram = model.histogram();
    let landed = histogram.landed_balls_number();
    assert!(landed >= 5000);

    // Standard error is about 0.025 here
    assert_abs_diff_eq!(histogram.average(), theoretical_average(12, 0.5), epsilon = 0.15);
    assert_abs_diff_eq!(
        histogram.standard_deviation(),
        theoretical_standard_deviation(12, 0.5),
        epsilon = 0.1
    );

    let sample = histogram.fractional_distribution();
    let expected = binomial_distribution(12, 0.5);
    assert_relative_eq!(sample.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    for (s, e) in sample.iter().zip(&expected) {
        assert_abs_diff_eq!(*s, *e, epsilon = 0.03);
    }
}

#[test]
fn test_lab_skewed_probability() {
    let model = lab_with_landed("rows=20&probability=0.2&hopperMode=path&seed=5", 3000);
    let histogram = model.histogram();
    assert_abs_diff_eq!(histogram.average(), 4.0, epsilon = 0.2);
    assert!(histogram.visible_bin_count(4) > histogram.visible_bin_count(10));
}

#[test]
fn test_certain_probabilities_fill_one_edge_bin() {
    let right = lab_with_landed("rows=9&probability=1&hopperMode=none&seed=1", 200);
    let histogram = right.histogram();
    assert_eq!(histogram.visible_bin_count(9), histogram.landed_balls_number());
    assert_relative_eq!(histogram.average(), 9.0);
    assert_relative_eq!(histogram.variance(), 0.0);

    let left = lab_with_landed("rows=9&probability=0&hopperMode=none&seed=1", 200);
    let histogram = left.histogram();
    assert_eq!(histogram.visible_bin_count(0), histogram.landed_balls_number());
    assert_relative_eq!(histogram.average(), 0.0);
}

#[test]
fn test_lab_counts_are_conserved_in_ball_mode() {
    let mut model = LabModel::new(&config("rows=6&seed=77"));
    model.set_playing(true);

    let mut created = 0u32;
    let mut exited = 0u32;
    for _ in 0..3000 {
        for event in model.step(MAX_STEP_DT) {
            match event {
                SimEvent::BallCreated { .. } => created += 1,
                SimEvent::BallExited { .. } => exited += 1,
                _ => {}
            }
        }
        let histogram = model.histogram();
        let booked: u32 = histogram.bins().iter().map(|b| b.bin_count).sum();
        let visible: u32 = histogram.bins().iter().map(|b| b.visible_bin_count).sum();
        assert_eq!(booked, created);
        assert_eq!(visible, exited);
        assert_eq!(visible, histogram.landed_balls_number());
        assert!(visible <= booked);
    }
    assert!(exited > 100);
}

#[test]
fn test_same_seed_replays_identically() {
    let a = lab_with_landed("rows=15&probability=0.35&hopperMode=none&seed=2024", 1000);
    let b = lab_with_landed("rows=15&probability=0.35&hopperMode=none&seed=2024", 1000);
    assert_eq!(a.histogram().bins(), b.histogram().bins());
    assert_eq!(a.histogram().sample_statistics(), b.histogram().sample_statistics());
}

#[test]
fn test_intro_session_fills_and_rests() {
    let mut model = IntroModel::new(&config("rows=10&probability=0.5&seed=3"));
    let mut events = Vec::new();
    assert_eq!(model.queue_balls(BallDrop::Max, &mut events), 100);
    assert!(model.is_ball_cap_reached());
    assert_eq!(events, vec![SimEvent::BallCapReached]);

    let mut peg_hits = 0;
    for _ in 0..20_000 {
        peg_hits += model
            .step(MAX_STEP_DT)
            .iter()
            .filter(|e| matches!(e, SimEvent::PegHit { .. }))
            .count();
        if model.histogram().landed_balls_number() == 100
            && model.balls().iter().all(|b| b.phase() == BallPhase::Collected)
        {
            break;
        }
    }

    let histogram = model.histogram();
    assert_eq!(histogram.landed_balls_number(), 100);
    assert_eq!(model.balls().len(), 100);
    // One bounce per row for every ball
    assert_eq!(peg_hits, 100 * 10);

    for ball in model.balls() {
        assert!(ball.bin_index() <= 10);
        assert_abs_diff_eq!(
            ball.position().x,
            bin_center_x(ball.bin_index(), 10),
            epsilon = ball.peg_separation()
        );
    }

    let mut offline = histogram.clone();
    offline.initialize_statistics();
    assert_relative_eq!(histogram.average(), offline.average(), epsilon = 1e-9);
    assert_relative_eq!(histogram.variance(), offline.variance(), epsilon = 1e-7);
}

#[test]
fn test_intro_instant_mode_respects_creation_interval() {
    let mut model = IntroModel::new(&config("rows=4&hopperMode=none&seed=11"));
    let mut events = Vec::new();
    model.queue_balls(BallDrop::Ten, &mut events);

    // One launch per frame even though 0.09s covers nine instant intervals
    for frame in 1..=10 {
        model.step(MAX_STEP_DT);
        assert_eq!(model.launched_balls_number(), frame);
        assert_eq!(model.histogram().landed_balls_number() as usize, frame);
    }
    assert_eq!(model.balls_to_create_number(), 0);
    assert!(!model.is_ball_cap_reached());
}

#[test]
fn test_config_from_json_drives_lab() {
    let config = SimulationConfig::from_json(
        r#"{"rows": 5, "probability": 0.75, "maxBallsLab": 10, "hopperMode": "none", "seed": 9}"#,
    )
    .unwrap();
    assert_eq!(config.hopper_mode, HopperMode::None);

    let mut model = LabModel::new(&config);
    assert_eq!(model.histogram().number_of_bins(), 6);
    model.set_playing(true);
    for _ in 0..1000 {
        model.step(MAX_STEP_DT);
    }
    assert!(model.is_ball_cap_reached());
    assert_eq!(model.histogram().maximum_actual_bin_count(), 10);
}
