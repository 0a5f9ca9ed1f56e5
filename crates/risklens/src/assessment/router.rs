use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{RiskEngine, RiskFactor, ScoringPolicy, STANDARD_RULES};
use crate::error::AppError;
use crate::profile::{
    CsvProfileImporter, ManualSource, ProfileRecord, ProfileSource, SourceKind,
    SyntheticProfileGenerator,
};
use crate::report::AssessmentView;

/// Default number of synthetic profiles returned when `count` is omitted.
pub const DEFAULT_SYNTHETIC_PROFILES: usize = 10;
/// Upper bound on synthetic profiles per request.
pub const MAX_SYNTHETIC_PROFILES: usize = 500;

/// Shared state for the assessment endpoints.
#[derive(Debug, Clone)]
pub struct AssessmentState {
    pub engine: Arc<RiskEngine>,
    pub default_seed: u64,
}

impl AssessmentState {
    pub fn new(engine: RiskEngine, default_seed: u64) -> Self {
        Self {
            engine: Arc::new(engine),
            default_seed,
        }
    }

    fn assess(&self, profile: &ProfileRecord) -> AssessmentView {
        let result = self.engine.evaluate(profile);
        AssessmentView::new(result, self.engine.policy().baseline_score)
    }
}

/// Router builder exposing scoring, batch import, and demo-profile endpoints.
pub fn assessment_router(state: AssessmentState) -> Router {
    Router::new()
        .route("/api/v1/assessments", post(assess_handler))
        .route("/api/v1/assessments/batch", post(batch_handler))
        .route("/api/v1/profiles/synthetic", get(synthetic_handler))
        .route("/api/v1/policy", get(policy_handler))
        .with_state(state)
}

/// Batch payload: either inline profiles or a CSV export, never both.
#[derive(Debug, Default, Deserialize)]
pub struct BatchAssessmentRequest {
    #[serde(default)]
    pub profiles: Vec<ProfileRecord>,
    #[serde(default)]
    pub csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchAssessmentResponse {
    pub data_source: SourceKind,
    pub count: usize,
    pub assessments: Vec<AssessmentView>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SyntheticQuery {
    pub seed: Option<u64>,
    pub count: Option<usize>,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SyntheticEntry {
    pub profile: ProfileRecord,
    pub assessment: AssessmentView,
}

#[derive(Debug, Serialize)]
pub struct SyntheticResponse {
    pub seed: u64,
    pub reference_date: NaiveDate,
    pub entries: Vec<SyntheticEntry>,
}

#[derive(Debug, Serialize)]
pub struct PolicyResponse {
    pub policy: ScoringPolicy,
    pub rule_order: Vec<RiskFactor>,
}

pub(crate) async fn assess_handler(
    State(state): State<AssessmentState>,
    Json(profile): Json<ProfileRecord>,
) -> Json<AssessmentView> {
    let view = state.assess(&profile);
    debug!(
        risk_score = view.result.risk_score,
        fields = profile.len(),
        "single profile assessed"
    );
    Json(view)
}

pub(crate) async fn batch_handler(
    State(state): State<AssessmentState>,
    Json(payload): Json<BatchAssessmentRequest>,
) -> Result<Json<BatchAssessmentResponse>, AppError> {
    let BatchAssessmentRequest { profiles, csv } = payload;

    let mut source: Box<dyn ProfileSource> = match csv {
        Some(_) if !profiles.is_empty() => {
            return Err(AppError::InvalidRequest(
                "supply either profiles or csv, not both".to_string(),
            ));
        }
        Some(csv) => Box::new(CsvProfileImporter::source(Cursor::new(csv.into_bytes()))),
        None => Box::new(ManualSource::new(profiles)),
    };

    let data_source = source.kind();
    let records = source.read_profiles()?;
    let assessments: Vec<AssessmentView> =
        records.iter().map(|profile| state.assess(profile)).collect();

    info!(
        source = data_source.label(),
        count = assessments.len(),
        "batch assessed"
    );

    Ok(Json(BatchAssessmentResponse {
        data_source,
        count: assessments.len(),
        assessments,
    }))
}

pub(crate) async fn synthetic_handler(
    State(state): State<AssessmentState>,
    Query(query): Query<SyntheticQuery>,
) -> Result<Json<SyntheticResponse>, AppError> {
    let seed = query.seed.unwrap_or(state.default_seed);
    let count = query
        .count
        .unwrap_or(DEFAULT_SYNTHETIC_PROFILES)
        .min(MAX_SYNTHETIC_PROFILES);
    let reference_date = query.today.unwrap_or_else(|| Local::now().date_naive());

    let mut generator = SyntheticProfileGenerator::new(seed, reference_date)
        .map_err(|err| AppError::InvalidRequest(err.to_string()))?;
    let entries = generator
        .generate_batch(count)
        .into_iter()
        .map(|profile| SyntheticEntry {
            assessment: state.assess(&profile),
            profile,
        })
        .collect();

    debug!(seed, count, %reference_date, "synthetic profiles generated");

    Ok(Json(SyntheticResponse {
        seed,
        reference_date,
        entries,
    }))
}

pub(crate) async fn policy_handler(State(state): State<AssessmentState>) -> Json<PolicyResponse> {
    Json(PolicyResponse {
        policy: state.engine.policy().clone(),
        rule_order: STANDARD_RULES.iter().map(|rule| rule.factor()).collect(),
    })
}
