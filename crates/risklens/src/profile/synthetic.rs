use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp1, Poisson, StandardNormal};

use super::record::{fields, ProfileRecord};
use super::source::{ProfileSource, SourceKind};
use super::ProfileImportError;

const MIN_AGE: i64 = 21;
const MAX_AGE: i64 = 65;
const PAN_LETTERS: &[u8] = b"ABCDE";
const DIGITS: &[u8] = b"0123456789";

#[derive(Debug, thiserror::Error)]
pub enum SyntheticProfileError {
    #[error("reference date {reference_date} is too early to derive applicant birth dates")]
    ReferenceDateOutOfRange { reference_date: NaiveDate },
}

/// Seeded generator of demo applicant profiles.
///
/// The generator owns its random state, so two generators built from the same
/// seed and reference date emit identical profile sequences.
pub struct SyntheticProfileGenerator {
    rng: StdRng,
    reference_date: NaiveDate,
}

impl SyntheticProfileGenerator {
    /// Fails when the oldest applicant's birth date would fall before the
    /// earliest representable date.
    pub fn new(seed: u64, reference_date: NaiveDate) -> Result<Self, SyntheticProfileError> {
        birth_date(reference_date, MAX_AGE)
            .ok_or(SyntheticProfileError::ReferenceDateOutOfRange { reference_date })?;

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            reference_date,
        })
    }

    pub fn generate_profile(&mut self) -> ProfileRecord {
        let age = self.rng.gen_range(MIN_AGE..=MAX_AGE);
        // `new` checked the oldest age, so every younger one fits too.
        let dob = birth_date(self.reference_date, age).unwrap_or(NaiveDate::MIN);

        let declared_income = self.log_normal(13.0, 0.5) as i64;
        let existing_emi = self.exponential(5000.0) as i64;
        let lti_ratio = (existing_emi * 12) as f64 / (declared_income + 1) as f64;
        let cibil = self.normal(750.0, 50.0).clamp(300.0, 900.0) as i64;
        let collateral = if self.rng.gen::<f64>() > 0.7 {
            self.exponential(500_000.0) as i64
        } else {
            0
        };

        let pan = self.pan();
        let aadhaar = format!("XXXX-XXXX-{}", self.code(DIGITS, 4));

        ProfileRecord::new()
            // identity anchors
            .with("id_pan", pan)
            .with("id_aadhaar", aadhaar)
            .with("id_dob", dob.format("%Y-%m-%d").to_string())
            .with("id_age", age)
            .with(
                fields::RESIDENT_STATUS,
                if self.rng.gen_bool(0.95) { "Indian" } else { "NRI" },
            )
            // financial capacity
            .with(fields::DECLARED_INCOME, declared_income)
            .with(fields::INCOME_VERIFIED, self.rng.gen_ratio(2, 3))
            .with("fin_avg_monthly_balance", self.log_normal(10.0, 1.0) as i64)
            .with(
                "fin_income_stability",
                self.pick(&["Stable", "Variable", "Seasonal"]),
            )
            .with(fields::EXISTING_EMI, existing_emi)
            .with("fin_dependents", self.rng.gen_range(0_i64..=4))
            .with(fields::LTI_RATIO, lti_ratio)
            // employment
            .with(
                "emp_occupation",
                self.pick(&["Salaried", "Self-Employed", "Business", "Professional"]),
            )
            .with(
                fields::EMPLOYER_TYPE,
                self.pick(&["Govt", "PSU", "MNC", "Private", "SME", "Unemployed"]),
            )
            .with("emp_tenure_years", self.rng.gen_range(0_i64..=20))
            // banking behaviour
            .with(fields::EMI_BOUNCES, self.poisson(0.2))
            .with("beh_overdraft_instances", self.poisson(0.1))
            .with("beh_avg_credit_utilization", self.rng.gen::<f64>())
            .with("beh_cash_withdrawal_ratio", self.rng.gen::<f64>())
            .with("beh_spending_shock", self.rng.gen_ratio(1, 4))
            // bureau
            .with(fields::CIBIL_SCORE, cibil)
            .with("ext_open_credit_accounts", self.rng.gen_range(0_i64..=10))
            .with(
                "ext_total_sanctioned_limit",
                self.exponential(100_000.0) as i64,
            )
            .with("ext_credit_history_years", self.rng.gen_range(1_i64..=15))
            .with("ext_inquiries_last_6m", self.poisson(0.5))
            .with(fields::PREVIOUS_NPA, self.rng.gen_bool(0.02))
            // assets
            .with("asset_collateral_value", collateral)
            .with(
                "asset_residence_type",
                self.pick(&["Owned", "Rented", "Parental"]),
            )
            // profile flags
            .with("prof_address_changes_last_3y", self.poisson(0.3))
            .with(fields::GEO_RISK, self.pick(&["Low", "Medium", "High"]))
            // account metadata
            .with("ops_tenure_months", self.rng.gen_range(1_i64..=120))
            .with("ops_active_products", self.rng.gen_range(1_i64..=5))
            .with("ops_savings_consistency", self.rng.gen::<f64>())
    }

    pub fn generate_batch(&mut self, count: usize) -> Vec<ProfileRecord> {
        (0..count).map(|_| self.generate_profile()).collect()
    }

    /// Wrap the generator as a [`ProfileSource`] yielding `count` profiles.
    pub fn into_source(self, count: usize) -> SyntheticSource {
        SyntheticSource {
            generator: self,
            count,
        }
    }

    fn pick(&mut self, options: &[&'static str]) -> &'static str {
        options[self.rng.gen_range(0..options.len())]
    }

    fn code(&mut self, alphabet: &[u8], len: usize) -> String {
        (0..len)
            .map(|_| alphabet[self.rng.gen_range(0..alphabet.len())] as char)
            .collect()
    }

    fn pan(&mut self) -> String {
        let mut pan = self.code(PAN_LETTERS, 5);
        pan.push_str(&self.code(DIGITS, 4));
        pan.push_str(&self.code(PAN_LETTERS, 1));
        pan
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = StandardNormal.sample(&mut self.rng);
        mean + std_dev * z
    }

    fn log_normal(&mut self, mu: f64, sigma: f64) -> f64 {
        self.normal(mu, sigma).exp()
    }

    fn exponential(&mut self, mean: f64) -> f64 {
        let unit: f64 = Exp1.sample(&mut self.rng);
        mean * unit
    }

    fn poisson(&mut self, lambda: f64) -> i64 {
        Poisson::new(lambda)
            .map(|distribution| {
                let draws: f64 = distribution.sample(&mut self.rng);
                draws as i64
            })
            .unwrap_or(0)
    }
}

fn birth_date(reference_date: NaiveDate, age: i64) -> Option<NaiveDate> {
    reference_date.checked_sub_signed(Duration::days(age * 365))
}

/// Finite batch of synthetic profiles exposed through [`ProfileSource`].
pub struct SyntheticSource {
    generator: SyntheticProfileGenerator,
    count: usize,
}

impl ProfileSource for SyntheticSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Synthetic
    }

    fn read_profiles(&mut self) -> Result<Vec<ProfileRecord>, ProfileImportError> {
        Ok(self.generator.generate_batch(self.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn generator(seed: u64) -> SyntheticProfileGenerator {
        SyntheticProfileGenerator::new(seed, reference_date()).expect("reference date fits")
    }

    #[test]
    fn same_seed_yields_identical_profiles() {
        let mut first = generator(42);
        let mut second = generator(42);

        assert_eq!(first.generate_batch(5), second.generate_batch(5));
    }

    #[test]
    fn different_seeds_diverge() {
        let mut first = generator(1);
        let mut second = generator(2);

        assert_ne!(first.generate_batch(3), second.generate_batch(3));
    }

    #[test]
    fn generated_fields_stay_within_semantic_ranges() {
        let mut generator = generator(7);

        for profile in generator.generate_batch(200) {
            let cibil = profile.cibil_score();
            assert!((300..=900).contains(&cibil), "cibil {cibil} out of range");
            assert!(profile.declared_income() >= 0);
            assert!(profile.existing_emi() >= 0);
            assert!(profile.emi_bounces() >= 0);
            assert!(profile.resident_status().is_some());
            assert!(profile.geo_risk().is_some());
            assert!(profile.employer_type().is_some());

            let age = profile.integer("id_age");
            assert!((21..=65).contains(&age));
            assert_eq!(profile.text("id_pan").len(), 10);
            assert!(profile.text("id_aadhaar").starts_with("XXXX-XXXX-"));
        }
    }

    #[test]
    fn lti_ratio_is_derived_from_emi_and_income() {
        let mut generator = generator(11);
        let profile = generator.generate_profile();

        let expected =
            (profile.existing_emi() * 12) as f64 / (profile.declared_income() + 1) as f64;
        assert!((profile.lti_ratio() - expected).abs() < 1e-12);
    }

    #[test]
    fn date_of_birth_tracks_reference_date() {
        let mut generator = generator(3);
        let profile = generator.generate_profile();

        let age = profile.integer("id_age");
        let dob =
            NaiveDate::parse_from_str(profile.text("id_dob"), "%Y-%m-%d").expect("iso date");
        assert_eq!(
            reference_date().signed_duration_since(dob),
            Duration::days(age * 365)
        );
    }

    #[test]
    fn reference_dates_without_room_for_birth_dates_are_rejected() {
        let too_early = NaiveDate::MIN + Duration::days(MAX_AGE * 365 - 1);

        let result = SyntheticProfileGenerator::new(9, too_early);

        match result {
            Err(SyntheticProfileError::ReferenceDateOutOfRange { reference_date }) => {
                assert_eq!(reference_date, too_early)
            }
            Ok(_) => panic!("expected the reference date to be rejected"),
        }
    }

    #[test]
    fn oldest_applicant_at_the_earliest_reference_date_is_generated() {
        let earliest = NaiveDate::MIN + Duration::days(MAX_AGE * 365);
        let mut generator =
            SyntheticProfileGenerator::new(9, earliest).expect("earliest date fits");

        assert_eq!(generator.generate_batch(20).len(), 20);
    }

    #[test]
    fn synthetic_source_yields_requested_count() {
        let mut source = generator(5).into_source(4);

        let profiles = source.read_profiles().expect("synthetic profiles");

        assert_eq!(source.kind(), SourceKind::Synthetic);
        assert_eq!(profiles.len(), 4);
    }
}
