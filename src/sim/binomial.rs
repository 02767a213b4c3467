//! Theoretical binomial distribution for comparison overlays

/// Expected bin index: n·p
#[inline]
pub fn theoretical_average(number_of_rows: usize, probability: f64) -> f64 {
    number_of_rows as f64 * probability
}

/// √(n·p·(1 − p))
#[inline]
pub fn theoretical_standard_deviation(number_of_rows: usize, probability: f64) -> f64 {
    (number_of_rows as f64 * probability * (1.0 - probability)).sqrt()
}

/// Expected spread of the sample mean after `number_of_balls` balls
pub fn theoretical_standard_error(
    number_of_rows: usize,
    probability: f64,
    number_of_balls: u32,
) -> f64 {
    if number_of_balls == 0 {
        return 0.0;
    }
    theoretical_standard_deviation(number_of_rows, probability) / (number_of_balls as f64).sqrt()
}

/// n choose k, by alternating multiply/divide so intermediate values stay small
pub fn binomial_coefficient(n: usize, k: usize) -> f64 {
    assert!(k <= n, "k = {} exceeds n = {}", k, n);
    // C(n, k) == C(n, n - k); fewer factors with the smaller one
    let k = k.min(n - k);
    let mut coefficient = 1.0;
    for i in 1..=k {
        coefficient = coefficient * (n - k + i) as f64 / i as f64;
    }
    coefficient
}

/// P(X = k) for X ~ Binomial(n, p)
pub fn binomial_probability(n: usize, k: usize, probability: f64) -> f64 {
    binomial_coefficient(n, k)
        * probability.powi(k as i32)
        * (1.0 - probability).powi((n - k) as i32)
}

/// P(X = k) for every k in 0..=n
pub fn binomial_distribution(number_of_rows: usize, probability: f64) -> Vec<f64> {
    (0..=number_of_rows)
        .map(|k| binomial_probability(number_of_rows, k, probability))
        .collect()
}

/// Distribution scaled so its tallest bar is 1, matching the sample histogram
pub fn normalized_binomial_distribution(number_of_rows: usize, probability: f64) -> Vec<f64> {
    let distribution = binomial_distribution(number_of_rows, probability);
    let max = distribution.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return distribution;
    }
    distribution.into_iter().map(|p| p / max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_binomial_coefficients() {
        assert_eq!(binomial_coefficient(5, 0), 1.0);
        assert_eq!(binomial_coefficient(5, 5), 1.0);
        assert_relative_eq!(binomial_coefficient(5, 2), 10.0);
        assert_relative_eq!(binomial_coefficient(26, 13), 10_400_600.0, max_relative = 1e-12);
        // Pascal's rule
        for n in 1..20 {
            for k in 1..n {
                assert_relative_eq!(
                    binomial_coefficient(n, k),
                    binomial_coefficient(n - 1, k - 1) + binomial_coefficient(n - 1, k),
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_k_above_n_panics() {
        binomial_coefficient(3, 4);
    }

    #[test]
    fn test_theoretical_average_at_one_half() {
        for n in 1..=26 {
            assert_eq!(theoretical_average(n, 0.5), n as f64 / 2.0);
        }
    }

    #[test]
    fn test_theoretical_standard_deviation() {
        assert_relative_eq!(theoretical_standard_deviation(16, 0.5), 2.0);
        assert_eq!(theoretical_standard_deviation(10, 1.0), 0.0);
        assert_relative_eq!(theoretical_standard_error(16, 0.5, 4), 1.0);
        assert_eq!(theoretical_standard_error(16, 0.5, 0), 0.0);
    }

    #[test]
    fn test_degenerate_probabilities() {
        assert_eq!(binomial_distribution(4, 0.0), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(binomial_distribution(4, 1.0), vec![0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_normalized_distribution_peaks_at_one() {
        let normalized = normalized_binomial_distribution(12, 0.5);
        assert_eq!(normalized.len(), 13);
        assert_relative_eq!(normalized[6], 1.0);
        assert!(normalized.iter().all(|&p| p <= 1.0));
        assert_relative_eq!(normalized[0], normalized[12], max_relative = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_distribution_sums_to_one(n in 1usize..=26, p in 0.001f64..0.999) {
            let total: f64 = binomial_distribution(n, p).iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9, "sum = {}", total);
        }

        #[test]
        fn prop_distribution_mean_matches_theory(n in 1usize..=26, p in 0.0f64..=1.0) {
            let mean: f64 = binomial_distribution(n, p)
                .iter()
                .enumerate()
                .map(|(k, q)| k as f64 * q)
                .sum();
            prop_assert!((mean - theoretical_average(n, p)).abs() < 1e-9);
        }
    }
}
