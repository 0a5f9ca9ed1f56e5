use serde::{Deserialize, Serialize};

/// Recommended credit-limit range in the income currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreditLimits {
    pub rec_limit: u64,
    pub min_limit: u64,
    pub max_limit: u64,
}

impl CreditLimits {
    /// Derive limits from monthly disposable income scaled by `score / 10`.
    ///
    /// Applicants whose installments exceed monthly income get no limit. The
    /// floor of one month's disposable income is capped at the recommended
    /// limit, so `min <= rec <= max` holds even for scores under 10.
    pub fn recommend(annual_income: i64, monthly_emi: i64, score: u8) -> Self {
        let disposable = annual_income as f64 / 12.0 - monthly_emi as f64;
        if disposable < 0.0 {
            return Self::default();
        }

        let multiplier = f64::from(score) / 10.0;
        let rec_limit = disposable * multiplier;
        let max_limit = disposable * (multiplier * 1.5);
        let min_limit = disposable.min(rec_limit);

        Self {
            rec_limit: rec_limit as u64,
            min_limit: min_limit as u64,
            max_limit: max_limit as u64,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.min_limit <= self.rec_limit && self.rec_limit <= self.max_limit
    }
}
