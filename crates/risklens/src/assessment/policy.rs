use serde::{Deserialize, Serialize};

/// Thresholds and weights consumed by the scoring rules.
///
/// Penalties are stored as negative impacts so every rule simply reports the
/// weight it matched. The standard policy is a process-wide constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub baseline_score: i64,
    pub score_floor: i64,
    pub score_ceiling: i64,

    pub resident_bonus: i64,
    pub high_geo_risk_impact: i64,

    pub high_income_threshold: i64,
    pub high_income_bonus: i64,
    pub upper_middle_income_threshold: i64,
    pub upper_middle_income_bonus: i64,
    pub middle_income_threshold: i64,
    pub middle_income_bonus: i64,
    pub low_income_threshold: i64,
    pub low_income_impact: i64,

    pub verified_income_bonus: i64,
    pub declared_income_impact: i64,

    pub high_lti_threshold: f64,
    pub high_lti_impact: i64,
    pub low_lti_threshold: f64,
    pub low_lti_bonus: i64,

    pub public_sector_bonus: i64,
    pub unemployed_impact: i64,

    /// Inclusive lower bound of the excellent bureau band.
    pub excellent_cibil_threshold: i64,
    pub excellent_cibil_bonus: i64,
    /// Exclusive upper bound of the poor bureau band.
    pub poor_cibil_threshold: i64,
    pub poor_cibil_impact: i64,

    pub impact_per_emi_bounce: i64,
    pub previous_npa_impact: i64,
}

impl ScoringPolicy {
    pub const STANDARD: ScoringPolicy = ScoringPolicy {
        baseline_score: 50,
        score_floor: 0,
        score_ceiling: 100,

        resident_bonus: 5,
        high_geo_risk_impact: -10,

        high_income_threshold: 1_500_000,
        high_income_bonus: 15,
        upper_middle_income_threshold: 1_000_000,
        upper_middle_income_bonus: 10,
        middle_income_threshold: 500_000,
        middle_income_bonus: 5,
        low_income_threshold: 300_000,
        low_income_impact: -10,

        verified_income_bonus: 10,
        declared_income_impact: -5,

        high_lti_threshold: 0.6,
        high_lti_impact: -15,
        low_lti_threshold: 0.3,
        low_lti_bonus: 10,

        public_sector_bonus: 10,
        unemployed_impact: -20,

        excellent_cibil_threshold: 750,
        excellent_cibil_bonus: 20,
        poor_cibil_threshold: 650,
        poor_cibil_impact: -20,

        impact_per_emi_bounce: -5,
        previous_npa_impact: -50,
    };

    /// An inverted range (floor above ceiling) resolves to the ceiling.
    pub fn clamp_score(&self, raw: i64) -> i64 {
        raw.max(self.score_floor).min(self.score_ceiling)
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Render an income threshold in lakhs, e.g. `1_500_000` as `15L`.
pub(crate) fn lakhs(amount: i64) -> String {
    if amount % 100_000 == 0 {
        format!("{}L", amount / 100_000)
    } else {
        format!("{:.1}L", amount as f64 / 100_000.0)
    }
}

/// Render a ratio as a whole percentage, e.g. `0.6` as `60%`.
pub(crate) fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
