use crate::profile::{EmployerType, GeoRiskTier, ProfileRecord, ResidentStatus};

use super::policy::{lakhs, percent, ScoringPolicy};
use super::{Driver, RiskFactor};

type Check = fn(&ProfileRecord, &ScoringPolicy) -> Option<(i64, String)>;

/// A single scoring rule: inspects the profile and reports at most one
/// signed adjustment.
pub struct Rule {
    factor: RiskFactor,
    check: Check,
}

impl Rule {
    pub const fn new(factor: RiskFactor, check: Check) -> Self {
        Self { factor, check }
    }

    pub fn factor(&self) -> RiskFactor {
        self.factor
    }

    pub fn evaluate(&self, profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<Driver> {
        (self.check)(profile, policy).map(|(impact, desc)| Driver {
            factor: self.factor,
            impact,
            desc,
        })
    }
}

/// Rules in evaluation order. Driver order in a result follows this slice.
pub const STANDARD_RULES: &[Rule] = &[
    Rule::new(RiskFactor::ResidentialStatus, residential_status),
    Rule::new(RiskFactor::GeoRisk, geo_risk),
    Rule::new(RiskFactor::IncomeLevel, income_level),
    Rule::new(RiskFactor::IncomeVerification, income_verification),
    Rule::new(RiskFactor::LoanToIncome, loan_to_income),
    Rule::new(RiskFactor::Employment, employment),
    Rule::new(RiskFactor::CibilScore, cibil_score),
    Rule::new(RiskFactor::PaymentHistory, payment_history),
    Rule::new(RiskFactor::CriticalFlag, critical_flag),
];

fn residential_status(profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<(i64, String)> {
    match profile.resident_status() {
        Some(ResidentStatus::Indian) => {
            Some((policy.resident_bonus, "Resident Indian".to_string()))
        }
        _ => None,
    }
}

fn geo_risk(profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<(i64, String)> {
    match profile.geo_risk() {
        Some(GeoRiskTier::High) => Some((
            policy.high_geo_risk_impact,
            "High Risk Location".to_string(),
        )),
        _ => None,
    }
}

// First matching band wins; 3L..=5L carries no adjustment.
fn income_level(profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<(i64, String)> {
    let income = profile.declared_income();

    if income > policy.high_income_threshold {
        Some((
            policy.high_income_bonus,
            format!("High Income (>{})", lakhs(policy.high_income_threshold)),
        ))
    } else if income > policy.upper_middle_income_threshold {
        Some((
            policy.upper_middle_income_bonus,
            format!(
                "Mid-High Income (>{})",
                lakhs(policy.upper_middle_income_threshold)
            ),
        ))
    } else if income > policy.middle_income_threshold {
        Some((
            policy.middle_income_bonus,
            format!("Middle Income (>{})", lakhs(policy.middle_income_threshold)),
        ))
    } else if income < policy.low_income_threshold {
        Some((
            policy.low_income_impact,
            format!("Low Income (<{})", lakhs(policy.low_income_threshold)),
        ))
    } else {
        None
    }
}

fn income_verification(profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<(i64, String)> {
    if profile.income_verified() {
        Some((policy.verified_income_bonus, "Documented Income".to_string()))
    } else {
        Some((policy.declared_income_impact, "Declared Only".to_string()))
    }
}

fn loan_to_income(profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<(i64, String)> {
    let lti = profile.lti_ratio();

    if lti > policy.high_lti_threshold {
        Some((
            policy.high_lti_impact,
            format!("High Debt Burden (>{})", percent(policy.high_lti_threshold)),
        ))
    } else if lti < policy.low_lti_threshold {
        Some((
            policy.low_lti_bonus,
            format!("Low Debt Burden (<{})", percent(policy.low_lti_threshold)),
        ))
    } else {
        None
    }
}

fn employment(profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<(i64, String)> {
    let employer = profile.employer_type()?;

    if employer.is_public_sector() {
        Some((policy.public_sector_bonus, "Govt/PSU Employer".to_string()))
    } else if employer == EmployerType::Unemployed {
        Some((policy.unemployed_impact, "Unemployed".to_string()))
    } else {
        None
    }
}

fn cibil_score(profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<(i64, String)> {
    let cibil = profile.cibil_score();

    if cibil >= policy.excellent_cibil_threshold {
        Some((
            policy.excellent_cibil_bonus,
            "Excellent Credit Score".to_string(),
        ))
    } else if cibil < policy.poor_cibil_threshold {
        Some((policy.poor_cibil_impact, "Poor Credit Score".to_string()))
    } else {
        None
    }
}

// Unbounded: many bounces can push the raw score far below the floor.
fn payment_history(profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<(i64, String)> {
    let bounces = profile.emi_bounces();
    if bounces <= 0 {
        return None;
    }

    Some((
        policy.impact_per_emi_bounce.saturating_mul(bounces),
        format!("{bounces} EMI Bounces"),
    ))
}

fn critical_flag(profile: &ProfileRecord, policy: &ScoringPolicy) -> Option<(i64, String)> {
    if profile.previous_npa() {
        Some((policy.previous_npa_impact, "Previous NPA".to_string()))
    } else {
        None
    }
}
