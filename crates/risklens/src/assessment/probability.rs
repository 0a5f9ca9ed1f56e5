use serde::{Deserialize, Serialize};

/// Repayment outlook derived from a clamped risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityEstimate {
    pub prob_default: f64,
    pub prob_repayment: f64,
}

impl ProbabilityEstimate {
    /// Piecewise mapping from score to default probability.
    ///
    /// Below 30 the probability climbs 1pt per score point from 0.40; above 80
    /// it is a flat 0.01; in between it falls linearly from 0.40 to 0.05. The
    /// curve is continuous at 30 but steps from 0.05 to 0.01 between 80 and 81.
    pub fn from_score(score: u8) -> Self {
        let score = f64::from(score);
        let prob_default = if score < 30.0 {
            0.40 + (30.0 - score) / 100.0
        } else if score > 80.0 {
            0.01
        } else {
            0.05 + (80.0 - score) * 0.007
        };

        let prob_default = round3(prob_default);
        Self {
            prob_default,
            prob_repayment: round3(1.0 - prob_default),
        }
    }
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_at(score: u8) -> f64 {
        ProbabilityEstimate::from_score(score).prob_default
    }

    #[test]
    fn low_scores_map_into_the_high_risk_band() {
        assert_eq!(default_at(0), 0.7);
        assert_eq!(default_at(10), 0.6);
        assert_eq!(default_at(29), 0.41);
    }

    #[test]
    fn seam_at_thirty_is_continuous() {
        assert_eq!(default_at(30), 0.4);
        assert_eq!(default_at(29), 0.41);
        assert_eq!(default_at(31), 0.393);
    }

    #[test]
    fn seam_at_eighty_steps_down() {
        assert_eq!(default_at(80), 0.05);
        assert_eq!(default_at(81), 0.01);
        assert_eq!(default_at(100), 0.01);
    }

    #[test]
    fn probabilities_are_complementary_and_bounded() {
        for score in 0..=100u8 {
            let estimate = ProbabilityEstimate::from_score(score);
            assert!((0.0..=1.0).contains(&estimate.prob_default));
            assert!((0.0..=1.0).contains(&estimate.prob_repayment));
            assert!(
                (estimate.prob_default + estimate.prob_repayment - 1.0).abs() < 1e-9,
                "score {score}"
            );
        }
    }

    #[test]
    fn default_probability_never_increases_with_score() {
        let curve: Vec<f64> = (0..=100u8).map(default_at).collect();
        assert!(curve.windows(2).all(|pair| pair[1] <= pair[0]));
    }
}
