use serde::{Deserialize, Serialize};

use crate::assessment::{AssessmentResult, RiskFactor};

/// Coarse risk segment used by dashboards and console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub const fn from_score(score: u8) -> Self {
        if score >= 70 {
            RiskBand::Low
        } else if score >= 40 {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk",
            RiskBand::Medium => "Medium Risk",
            RiskBand::High => "High Risk",
        }
    }
}

/// One bar of the score waterfall: the driver and the running total after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterfallStep {
    pub factor: RiskFactor,
    pub impact: i64,
    pub desc: String,
    pub running_score: i64,
}

/// Presentation payload wrapping an assessment with derived display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentView {
    #[serde(flatten)]
    pub result: AssessmentResult,
    pub risk_band: RiskBand,
    pub baseline_score: i64,
    /// Score before clamping; differs from `risk_score` when the clamp bites.
    pub raw_score: i64,
    pub waterfall: Vec<WaterfallStep>,
    pub summary: String,
}

impl AssessmentView {
    pub fn new(result: AssessmentResult, baseline_score: i64) -> Self {
        let mut running_score = baseline_score;
        let waterfall = result
            .drivers
            .iter()
            .map(|driver| {
                running_score = running_score.saturating_add(driver.impact);
                WaterfallStep {
                    factor: driver.factor,
                    impact: driver.impact,
                    desc: driver.desc.clone(),
                    running_score,
                }
            })
            .collect();

        let risk_band = RiskBand::from_score(result.risk_score);
        let summary = summarize(&result, risk_band);

        Self {
            raw_score: running_score,
            result,
            risk_band,
            baseline_score,
            waterfall,
            summary,
        }
    }

    pub fn is_clamped(&self) -> bool {
        self.raw_score != i64::from(self.result.risk_score)
    }

    pub fn strongest_positive(&self) -> Option<&WaterfallStep> {
        self.waterfall
            .iter()
            .filter(|step| step.impact > 0)
            .max_by_key(|step| step.impact)
    }

    pub fn strongest_negative(&self) -> Option<&WaterfallStep> {
        self.waterfall
            .iter()
            .filter(|step| step.impact < 0)
            .min_by_key(|step| step.impact)
    }
}

fn summarize(result: &AssessmentResult, band: RiskBand) -> String {
    let limit = if result.rec_limit == 0 {
        "no credit limit recommended".to_string()
    } else {
        format!(
            "recommended limit {} (range {} to {})",
            result.rec_limit, result.min_limit, result.max_limit
        )
    };

    format!(
        "{}: score {}/100, {:.1}% probability of default, {}",
        band.label(),
        result.risk_score,
        result.prob_default * 100.0,
        limit
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::Driver;

    fn result(score: u8, drivers: Vec<Driver>) -> AssessmentResult {
        AssessmentResult {
            risk_score: score,
            prob_default: 0.05,
            prob_repayment: 0.95,
            rec_limit: 560_000,
            min_limit: 70_000,
            max_limit: 840_000,
            drivers,
        }
    }

    fn driver(factor: RiskFactor, impact: i64) -> Driver {
        Driver {
            factor,
            impact,
            desc: factor.label().to_string(),
        }
    }

    #[test]
    fn bands_follow_score_cutoffs() {
        assert_eq!(RiskBand::from_score(100), RiskBand::Low);
        assert_eq!(RiskBand::from_score(70), RiskBand::Low);
        assert_eq!(RiskBand::from_score(69), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(40), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(39), RiskBand::High);
        assert_eq!(RiskBand::from_score(0), RiskBand::High);
    }

    #[test]
    fn waterfall_accumulates_from_baseline() {
        let view = AssessmentView::new(
            result(
                80,
                vec![
                    driver(RiskFactor::ResidentialStatus, 5),
                    driver(RiskFactor::IncomeVerification, -5),
                    driver(RiskFactor::CibilScore, 20),
                ],
            ),
            50,
        );

        let running: Vec<i64> = view.waterfall.iter().map(|step| step.running_score).collect();
        assert_eq!(running, vec![55, 50, 70]);
        assert_eq!(view.raw_score, 70);
        assert_eq!(
            view.strongest_positive().map(|step| step.factor),
            Some(RiskFactor::CibilScore)
        );
        assert_eq!(
            view.strongest_negative().map(|step| step.factor),
            Some(RiskFactor::IncomeVerification)
        );
    }

    #[test]
    fn clamped_scores_are_flagged() {
        let view = AssessmentView::new(
            result(
                0,
                vec![
                    driver(RiskFactor::CriticalFlag, -50),
                    driver(RiskFactor::CibilScore, -20),
                ],
            ),
            50,
        );

        assert_eq!(view.raw_score, -20);
        assert!(view.is_clamped());
        assert_eq!(view.risk_band, RiskBand::High);
    }

    #[test]
    fn empty_driver_lists_render() {
        let view = AssessmentView::new(result(50, Vec::new()), 50);

        assert!(view.waterfall.is_empty());
        assert!(!view.is_clamped());
        assert!(view.strongest_positive().is_none());
        assert!(view.summary.starts_with("Medium Risk: score 50/100"));
    }

    #[test]
    fn summary_notes_missing_limits() {
        let mut declined = result(20, Vec::new());
        declined.rec_limit = 0;
        declined.min_limit = 0;
        declined.max_limit = 0;

        let view = AssessmentView::new(declined, 50);

        assert!(view.summary.ends_with("no credit limit recommended"));
    }

    #[test]
    fn view_serializes_result_fields_inline() {
        let view = AssessmentView::new(result(72, Vec::new()), 50);

        let value = serde_json::to_value(&view).expect("serializes");

        assert_eq!(value["risk_score"], 72);
        assert_eq!(value["risk_band"], "low");
        assert!(value["drivers"].as_array().is_some());
        assert!(value.get("result").is_none());
    }
}
