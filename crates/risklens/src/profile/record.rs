use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wire keys for the attributes the scoring rules read.
pub mod fields {
    pub const RESIDENT_STATUS: &str = "id_res_status";
    pub const GEO_RISK: &str = "prof_geo_risk_score";
    pub const DECLARED_INCOME: &str = "fin_declared_income";
    pub const EXISTING_EMI: &str = "fin_existing_emi";
    pub const LTI_RATIO: &str = "fin_lti_ratio";
    pub const INCOME_VERIFIED: &str = "fin_documented_income_verified";
    pub const EMPLOYER_TYPE: &str = "emp_employer_type";
    pub const EMI_BOUNCES: &str = "beh_past_emi_bounces";
    pub const CIBIL_SCORE: &str = "ext_cibil_score";
    pub const PREVIOUS_NPA: &str = "ext_previous_npa";
}

/// Scalar attribute value carried by a profile record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Flat applicant profile keyed by attribute name.
///
/// Every attribute is optional. Readers fall back to the attribute's neutral
/// value (`0`, `false`, or an empty string) when a key is missing or holds a
/// value of the wrong kind, so a partial record can always be scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, serde_json::Value>",
    into = "BTreeMap<String, FieldValue>"
)]
pub struct ProfileRecord {
    values: BTreeMap<String, FieldValue>,
}

impl ProfileRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn integer(&self, key: &str) -> i64 {
        self.get(key).and_then(FieldValue::as_i64).unwrap_or(0)
    }

    pub fn float(&self, key: &str) -> f64 {
        self.get(key).and_then(FieldValue::as_f64).unwrap_or(0.0)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(FieldValue::as_bool).unwrap_or(false)
    }

    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(FieldValue::as_str).unwrap_or("")
    }

    pub fn resident_status(&self) -> Option<ResidentStatus> {
        ResidentStatus::parse(self.text(fields::RESIDENT_STATUS))
    }

    pub fn geo_risk(&self) -> Option<GeoRiskTier> {
        GeoRiskTier::parse(self.text(fields::GEO_RISK))
    }

    pub fn employer_type(&self) -> Option<EmployerType> {
        EmployerType::parse(self.text(fields::EMPLOYER_TYPE))
    }

    pub fn declared_income(&self) -> i64 {
        self.integer(fields::DECLARED_INCOME)
    }

    pub fn existing_emi(&self) -> i64 {
        self.integer(fields::EXISTING_EMI)
    }

    pub fn lti_ratio(&self) -> f64 {
        self.float(fields::LTI_RATIO)
    }

    pub fn income_verified(&self) -> bool {
        self.flag(fields::INCOME_VERIFIED)
    }

    pub fn emi_bounces(&self) -> i64 {
        self.integer(fields::EMI_BOUNCES)
    }

    pub fn cibil_score(&self) -> i64 {
        self.integer(fields::CIBIL_SCORE)
    }

    pub fn previous_npa(&self) -> bool {
        self.flag(fields::PREVIOUS_NPA)
    }
}

impl FromIterator<(String, FieldValue)> for ProfileRecord {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, serde_json::Value>> for ProfileRecord {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        raw.into_iter()
            .filter_map(|(key, value)| json_scalar(value).map(|value| (key, value)))
            .collect()
    }
}

impl From<ProfileRecord> for BTreeMap<String, FieldValue> {
    fn from(record: ProfileRecord) -> Self {
        record.values
    }
}

// Nulls, arrays and nested objects carry nothing the rules can read.
fn json_scalar(value: serde_json::Value) -> Option<FieldValue> {
    match value {
        serde_json::Value::Bool(flag) => Some(FieldValue::Boolean(flag)),
        serde_json::Value::Number(number) => number
            .as_i64()
            .map(FieldValue::Integer)
            .or_else(|| number.as_f64().map(FieldValue::Float)),
        serde_json::Value::String(text) => Some(FieldValue::Text(text)),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidentStatus {
    Indian,
    #[serde(rename = "NRI")]
    NonResident,
}

impl ResidentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Indian" => Some(Self::Indian),
            "NRI" => Some(Self::NonResident),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Indian => "Indian",
            Self::NonResident => "NRI",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoRiskTier {
    Low,
    Medium,
    High,
}

impl GeoRiskTier {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Employer categories recognised by the employment rule. Coarser labels such
/// as "Salaried" parse to `None` and score as neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployerType {
    Govt,
    #[serde(rename = "PSU")]
    Psu,
    #[serde(rename = "MNC")]
    Mnc,
    Private,
    #[serde(rename = "SME")]
    Sme,
    Unemployed,
}

impl EmployerType {
    pub const fn all() -> [Self; 6] {
        [
            Self::Govt,
            Self::Psu,
            Self::Mnc,
            Self::Private,
            Self::Sme,
            Self::Unemployed,
        ]
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::all()
            .into_iter()
            .find(|candidate| candidate.label() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Govt => "Govt",
            Self::Psu => "PSU",
            Self::Mnc => "MNC",
            Self::Private => "Private",
            Self::Sme => "SME",
            Self::Unemployed => "Unemployed",
        }
    }

    pub const fn is_public_sector(self) -> bool {
        matches!(self, Self::Govt | Self::Psu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_read_as_neutral_values() {
        let record = ProfileRecord::new();

        assert_eq!(record.declared_income(), 0);
        assert_eq!(record.lti_ratio(), 0.0);
        assert!(!record.income_verified());
        assert_eq!(record.text(fields::RESIDENT_STATUS), "");
        assert!(record.employer_type().is_none());
    }

    #[test]
    fn numeric_readers_coerce_between_integer_and_float() {
        let record = ProfileRecord::new()
            .with(fields::DECLARED_INCOME, 650_000.9)
            .with(fields::LTI_RATIO, 1_i64);

        assert_eq!(record.declared_income(), 650_000);
        assert_eq!(record.lti_ratio(), 1.0);
    }

    #[test]
    fn mistyped_values_are_treated_as_absent() {
        let record = ProfileRecord::new()
            .with(fields::CIBIL_SCORE, "780")
            .with(fields::PREVIOUS_NPA, 1_i64);

        assert_eq!(record.cibil_score(), 0);
        assert!(!record.previous_npa());
    }

    #[test]
    fn deserializes_json_objects_and_drops_nulls() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "id_res_status": "Indian",
            "fin_declared_income": 1200000,
            "fin_lti_ratio": 0.3,
            "fin_documented_income_verified": true,
            "ext_cibil_score": null,
            "tags": ["a", "b"],
        }))
        .expect("profile parses");

        assert_eq!(record.len(), 4);
        assert_eq!(record.resident_status(), Some(ResidentStatus::Indian));
        assert_eq!(record.declared_income(), 1_200_000);
        assert!(record.get(fields::CIBIL_SCORE).is_none());
    }

    #[test]
    fn serializes_back_to_a_flat_object() {
        let record = ProfileRecord::new()
            .with(fields::EMPLOYER_TYPE, "PSU")
            .with(fields::EMI_BOUNCES, 2_i64);

        let value = serde_json::to_value(&record).expect("serializes");

        assert_eq!(
            value,
            json!({ "emp_employer_type": "PSU", "beh_past_emi_bounces": 2 })
        );
    }

    #[test]
    fn labels_tolerate_surrounding_whitespace() {
        let record = ProfileRecord::new()
            .with(fields::RESIDENT_STATUS, " Indian")
            .with(fields::GEO_RISK, "High ")
            .with(fields::EMPLOYER_TYPE, " Govt ");

        assert_eq!(record.resident_status(), Some(ResidentStatus::Indian));
        assert_eq!(record.geo_risk(), Some(GeoRiskTier::High));
        assert_eq!(record.employer_type(), Some(EmployerType::Govt));
        assert_eq!(ResidentStatus::parse("indian"), None);
    }

    #[test]
    fn employer_parsing_ignores_coarse_categories() {
        assert_eq!(EmployerType::parse("PSU"), Some(EmployerType::Psu));
        assert_eq!(EmployerType::parse("Salaried"), None);
        assert!(EmployerType::Govt.is_public_sector());
        assert!(!EmployerType::Mnc.is_public_sector());
    }
}
