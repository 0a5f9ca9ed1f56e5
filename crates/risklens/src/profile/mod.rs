//! Applicant profile records and the sources that produce them.
//!
//! A [`ProfileRecord`] is the engine's only input. Sources (seeded synthetic
//! generation, CSV bulk import, manual entry) all emit the same flat record,
//! so the engine stays independent of where data originates.

mod import;
mod record;
mod source;
mod synthetic;

pub use import::{CsvProfileImporter, CsvSource, ProfileImportError};
pub use record::{fields, EmployerType, FieldValue, GeoRiskTier, ProfileRecord, ResidentStatus};
pub use source::{ManualSource, ProfileSource, SourceKind};
pub use synthetic::{SyntheticProfileError, SyntheticProfileGenerator, SyntheticSource};
