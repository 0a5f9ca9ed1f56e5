use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Args};
use risklens::assessment::RiskEngine;
use risklens::config::AppConfig;
use risklens::error::AppError;
use risklens::profile::{
    fields, CsvProfileImporter, ProfileRecord, ProfileSource, SyntheticProfileGenerator,
};
use risklens::report::{AssessmentView, RiskBand};
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file holding one profile. Field flags are ignored when set.
    #[arg(long)]
    pub(crate) profile: Option<PathBuf>,
    /// Residential status: Indian or NRI
    #[arg(long, default_value = "Indian")]
    pub(crate) resident_status: String,
    /// Location risk tier: Low, Medium or High
    #[arg(long, default_value = "Low")]
    pub(crate) geo_risk: String,
    /// Declared annual income
    #[arg(long, default_value_t = 1_200_000)]
    pub(crate) income: i64,
    /// Existing monthly installments across all loans
    #[arg(long, default_value_t = 30_000)]
    pub(crate) emi: i64,
    /// Income is backed by documents
    #[arg(long)]
    pub(crate) verified: bool,
    /// Employer category: Govt, PSU, MNC, Private, SME or Unemployed
    #[arg(long, default_value = "Private")]
    pub(crate) employer_type: String,
    /// EMI bounces on record
    #[arg(long, default_value_t = 0)]
    pub(crate) bounces: i64,
    /// Bureau score (300-900)
    #[arg(long, default_value_t = 750)]
    pub(crate) cibil: i64,
    /// Applicant has a previous non-performing loan
    #[arg(long)]
    pub(crate) previous_npa: bool,
    /// Print the assessment as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

impl AssessArgs {
    fn to_profile(&self) -> ProfileRecord {
        let lti_ratio = self.emi.saturating_mul(12) as f64 / self.income.saturating_add(1) as f64;

        ProfileRecord::new()
            .with(fields::RESIDENT_STATUS, self.resident_status.as_str())
            .with(fields::GEO_RISK, self.geo_risk.as_str())
            .with(fields::DECLARED_INCOME, self.income)
            .with(fields::INCOME_VERIFIED, self.verified)
            .with(fields::EXISTING_EMI, self.emi)
            .with(fields::LTI_RATIO, lti_ratio)
            .with(fields::EMPLOYER_TYPE, self.employer_type.as_str())
            .with(fields::EMI_BOUNCES, self.bounces)
            .with(fields::CIBIL_SCORE, self.cibil)
            .with(fields::PREVIOUS_NPA, self.previous_npa)
    }
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["csv", "synthetic"])))]
pub(crate) struct BatchArgs {
    /// CSV export with one profile per row
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Number of synthetic profiles to generate instead of reading a CSV
    #[arg(long)]
    pub(crate) synthetic: Option<usize>,
    /// Generator seed (defaults to RISKLENS_DEFAULT_SEED)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Reference date for synthetic birth dates (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the assessments as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Generator seed (defaults to RISKLENS_DEFAULT_SEED)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Number of demo applicants to assess
    #[arg(long, default_value_t = 3)]
    pub(crate) count: usize,
    /// Reference date for synthetic birth dates (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let profile = match &args.profile {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str::<ProfileRecord>(&raw)?
        }
        None => args.to_profile(),
    };

    let engine = RiskEngine::default();
    let view = assess(&engine, &profile);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        render_assessment("Applicant assessment", &view);
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        csv,
        synthetic,
        seed,
        today,
        json,
    } = args;

    let mut source: Box<dyn ProfileSource> = match (csv, synthetic) {
        (Some(path), _) => Box::new(CsvProfileImporter::source(File::open(path)?)),
        (None, Some(count)) => {
            let seed = resolve_seed(seed)?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            Box::new(synthetic_generator(seed, today)?.into_source(count))
        }
        (None, None) => {
            return Err(AppError::InvalidRequest(
                "batch needs --csv or --synthetic".to_string(),
            ))
        }
    };

    let profiles = source.read_profiles()?;
    let engine = RiskEngine::default();
    let views: Vec<AssessmentView> = profiles
        .iter()
        .map(|profile| assess(&engine, profile))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    println!(
        "Batch assessment ({}, {} profiles)",
        source.kind().label(),
        views.len()
    );
    for (index, view) in views.iter().enumerate() {
        println!(
            "- #{:<3} score {:>3} | {:<11} | PD {:>5.1}% | limit {}",
            index + 1,
            view.result.risk_score,
            view.risk_band.label(),
            view.result.prob_default * 100.0,
            view.result.rec_limit
        );
    }
    render_portfolio(&views);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { seed, count, today } = args;

    let seed = resolve_seed(seed)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let engine = RiskEngine::default();
    let mut generator = synthetic_generator(seed, today)?;

    println!("RiskLens demo (seed {}, reference date {})", seed, today);
    let mut views = Vec::with_capacity(count);
    for index in 0..count {
        let profile = generator.generate_profile();
        let view = assess(&engine, &profile);

        println!();
        render_applicant(index + 1, &profile);
        render_assessment("Assessment", &view);
        views.push(view);
    }

    if count > 1 {
        println!();
        render_portfolio(&views);
    }

    Ok(())
}

fn resolve_seed(seed: Option<u64>) -> Result<u64, AppError> {
    match seed {
        Some(seed) => Ok(seed),
        None => Ok(AppConfig::load()?.synthetic.default_seed),
    }
}

fn synthetic_generator(
    seed: u64,
    today: NaiveDate,
) -> Result<SyntheticProfileGenerator, AppError> {
    SyntheticProfileGenerator::new(seed, today)
        .map_err(|err| AppError::InvalidRequest(err.to_string()))
}

fn assess(engine: &RiskEngine, profile: &ProfileRecord) -> AssessmentView {
    AssessmentView::new(engine.evaluate(profile), engine.policy().baseline_score)
}

fn render_applicant(index: usize, profile: &ProfileRecord) {
    println!(
        "Applicant {} ({})",
        index,
        profile
            .get("id_pan")
            .and_then(|value| value.as_str())
            .unwrap_or("unidentified")
    );
    println!(
        "- {} | {} location risk | employer {}",
        profile
            .resident_status()
            .map_or("Unknown residency", |status| status.label()),
        profile.geo_risk().map_or("Unknown", |tier| tier.label()),
        profile
            .employer_type()
            .map_or("unknown", |employer| employer.label())
    );
    println!(
        "- Income {} ({}) | EMI {} | LTI {:.0}% | CIBIL {}",
        profile.declared_income(),
        if profile.income_verified() {
            "documented"
        } else {
            "declared"
        },
        profile.existing_emi(),
        profile.lti_ratio() * 100.0,
        profile.cibil_score()
    );
}

fn render_assessment(title: &str, view: &AssessmentView) {
    let result = &view.result;

    println!("{}", title);
    println!(
        "- Risk score: {}/100 ({})",
        result.risk_score,
        view.risk_band.label()
    );
    if view.is_clamped() {
        println!(
            "  Raw score {} clamped to {}",
            view.raw_score, result.risk_score
        );
    }
    println!(
        "- Probability of default {:.1}% | repayment {:.1}%",
        result.prob_default * 100.0,
        result.prob_repayment * 100.0
    );
    if result.rec_limit == 0 {
        println!("- Credit limit: none recommended");
    } else {
        println!(
            "- Credit limit: {} recommended (range {} to {})",
            result.rec_limit, result.min_limit, result.max_limit
        );
    }

    println!("Score waterfall (baseline {})", view.baseline_score);
    if view.waterfall.is_empty() {
        println!("  no adjustments");
    }
    for step in &view.waterfall {
        println!(
            "  {:>+4}  {}: {} -> {}",
            step.impact,
            step.factor.label(),
            step.desc,
            step.running_score
        );
    }

    if let Some(step) = view.strongest_positive() {
        println!("Strongest positive: {} ({:+})", step.desc, step.impact);
    }
    if let Some(step) = view.strongest_negative() {
        println!("Strongest negative: {} ({:+})", step.desc, step.impact);
    }
    println!("Summary: {}", view.summary);
}

fn render_portfolio(views: &[AssessmentView]) {
    if views.is_empty() {
        println!("Portfolio: no profiles assessed");
        return;
    }

    let band_count = |band: RiskBand| views.iter().filter(|view| view.risk_band == band).count();
    let average_score = views
        .iter()
        .map(|view| f64::from(view.result.risk_score))
        .sum::<f64>()
        / views.len() as f64;
    let total_limit: u64 = views.iter().map(|view| view.result.rec_limit).sum();

    println!("Portfolio");
    println!(
        "- {} low / {} medium / {} high risk",
        band_count(RiskBand::Low),
        band_count(RiskBand::Medium),
        band_count(RiskBand::High)
    );
    println!(
        "- Average score {:.1} | total recommended exposure {}",
        average_score, total_limit
    );
}
