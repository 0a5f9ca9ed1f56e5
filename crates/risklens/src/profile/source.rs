use serde::Serialize;

use super::record::ProfileRecord;
use super::ProfileImportError;

/// Origin of a batch of profile records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Synthetic,
    Csv,
    Manual,
}

impl SourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            SourceKind::Synthetic => "Synthetic generator",
            SourceKind::Csv => "CSV import",
            SourceKind::Manual => "Manual entry",
        }
    }
}

/// Anything that can hand the engine a batch of profile records.
///
/// Sources are interchangeable as long as they emit the documented field
/// names; the engine never inspects where a record came from.
pub trait ProfileSource {
    fn kind(&self) -> SourceKind;
    fn read_profiles(&mut self) -> Result<Vec<ProfileRecord>, ProfileImportError>;
}

/// Profiles supplied directly by a caller, e.g. a JSON request body.
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    profiles: Vec<ProfileRecord>,
}

impl ManualSource {
    pub fn new(profiles: Vec<ProfileRecord>) -> Self {
        Self { profiles }
    }
}

impl ProfileSource for ManualSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Manual
    }

    fn read_profiles(&mut self) -> Result<Vec<ProfileRecord>, ProfileImportError> {
        Ok(std::mem::take(&mut self.profiles))
    }
}
