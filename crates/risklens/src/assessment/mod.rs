//! Rule-based creditworthiness assessment.
//!
//! [`RiskEngine::evaluate`] folds an ordered rule list over a profile, clamps
//! the score, then derives the default probability and a credit-limit range.
//! Evaluation is pure: no I/O, no shared mutable state, and no failure modes.

mod limits;
mod policy;
mod probability;
pub mod router;
mod rules;

#[cfg(test)]
mod tests;

pub use limits::CreditLimits;
pub use policy::ScoringPolicy;
pub use probability::ProbabilityEstimate;
pub use router::{assessment_router, AssessmentState};
pub use rules::{Rule, STANDARD_RULES};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profile::ProfileRecord;

/// Stateless evaluator that applies a scoring policy to a profile.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    policy: ScoringPolicy,
}

impl RiskEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn evaluate(&self, profile: &ProfileRecord) -> AssessmentResult {
        let drivers: Vec<Driver> = STANDARD_RULES
            .iter()
            .filter_map(|rule| rule.evaluate(profile, &self.policy))
            .collect();

        let raw_score = drivers
            .iter()
            .fold(self.policy.baseline_score, |score, driver| {
                score.saturating_add(driver.impact)
            });
        // A custom policy may widen its range; the result contract stays 0..=100.
        let risk_score = self.policy.clamp_score(raw_score).clamp(0, 100) as u8;

        let probability = ProbabilityEstimate::from_score(risk_score);
        let limits = CreditLimits::recommend(
            profile.declared_income(),
            profile.existing_emi(),
            risk_score,
        );

        debug!(raw_score, risk_score, drivers = drivers.len(), "profile evaluated");

        AssessmentResult {
            risk_score,
            prob_default: probability.prob_default,
            prob_repayment: probability.prob_repayment,
            rec_limit: limits.rec_limit,
            min_limit: limits.min_limit,
            max_limit: limits.max_limit,
            drivers,
        }
    }

    pub fn evaluate_all<'a, I>(&self, profiles: I) -> Vec<AssessmentResult>
    where
        I: IntoIterator<Item = &'a ProfileRecord>,
    {
        profiles
            .into_iter()
            .map(|profile| self.evaluate(profile))
            .collect()
    }
}

/// Factors that can contribute a driver to an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "Residential Status")]
    ResidentialStatus,
    #[serde(rename = "Geo Risk")]
    GeoRisk,
    #[serde(rename = "Income Level")]
    IncomeLevel,
    #[serde(rename = "Income Verification")]
    IncomeVerification,
    #[serde(rename = "Loan-to-Income")]
    LoanToIncome,
    #[serde(rename = "Employment")]
    Employment,
    #[serde(rename = "CIBIL Score")]
    CibilScore,
    #[serde(rename = "Payment History")]
    PaymentHistory,
    #[serde(rename = "Critical Flag")]
    CriticalFlag,
}

impl RiskFactor {
    pub const fn label(self) -> &'static str {
        match self {
            RiskFactor::ResidentialStatus => "Residential Status",
            RiskFactor::GeoRisk => "Geo Risk",
            RiskFactor::IncomeLevel => "Income Level",
            RiskFactor::IncomeVerification => "Income Verification",
            RiskFactor::LoanToIncome => "Loan-to-Income",
            RiskFactor::Employment => "Employment",
            RiskFactor::CibilScore => "CIBIL Score",
            RiskFactor::PaymentHistory => "Payment History",
            RiskFactor::CriticalFlag => "Critical Flag",
        }
    }
}

/// Signed contribution to the score. `impact` is the pre-clamp adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub factor: RiskFactor,
    pub impact: i64,
    pub desc: String,
}

/// Assessment output: score, repayment outlook, limits, and the driver trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub risk_score: u8,
    pub prob_default: f64,
    pub prob_repayment: f64,
    pub rec_limit: u64,
    pub min_limit: u64,
    pub max_limit: u64,
    pub drivers: Vec<Driver>,
}

impl AssessmentResult {
    pub fn limits(&self) -> CreditLimits {
        CreditLimits {
            rec_limit: self.rec_limit,
            min_limit: self.min_limit,
            max_limit: self.max_limit,
        }
    }

    /// Sum of driver impacts before clamping.
    pub fn net_impact(&self) -> i64 {
        self.drivers.iter().map(|driver| driver.impact).sum()
    }

    pub fn driver(&self, factor: RiskFactor) -> Option<&Driver> {
        self.drivers.iter().find(|driver| driver.factor == factor)
    }
}
