use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::record::{FieldValue, ProfileRecord};
use super::source::{ProfileSource, SourceKind};

#[derive(Debug, thiserror::Error)]
pub enum ProfileImportError {
    #[error("failed to read profile export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid profile CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Bulk importer turning a headed CSV export into profile records.
///
/// Column headers are used verbatim as attribute names. Cells are typed by
/// inspection: `true`/`false` (any case) become booleans, then integers, then
/// finite floats, and anything else is kept as text. Empty cells are omitted
/// so the engine treats them as absent.
pub struct CsvProfileImporter;

impl CsvProfileImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ProfileRecord>, ProfileImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ProfileRecord>, ProfileImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut profiles = Vec::new();

        for record in csv_reader.records() {
            let row = record?;
            let profile = headers
                .iter()
                .zip(row.iter())
                .filter_map(|(header, cell)| {
                    infer_value(cell).map(|value| (normalize_header(header), value))
                })
                .filter(|(header, _)| !header.is_empty())
                .collect::<ProfileRecord>();
            profiles.push(profile);
        }

        debug!(rows = profiles.len(), "imported profile CSV");
        Ok(profiles)
    }

    /// Wrap a reader as a [`ProfileSource`].
    pub fn source<R: Read>(reader: R) -> CsvSource<R> {
        CsvSource {
            reader: Some(reader),
        }
    }
}

/// One-shot CSV [`ProfileSource`]; a second read yields no profiles.
pub struct CsvSource<R> {
    reader: Option<R>,
}

impl<R: Read> ProfileSource for CsvSource<R> {
    fn kind(&self) -> SourceKind {
        SourceKind::Csv
    }

    fn read_profiles(&mut self) -> Result<Vec<ProfileRecord>, ProfileImportError> {
        match self.reader.take() {
            Some(reader) => CsvProfileImporter::from_reader(reader),
            None => Ok(Vec::new()),
        }
    }
}

fn normalize_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

fn infer_value(cell: &str) -> Option<FieldValue> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Some(FieldValue::Boolean(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(FieldValue::Boolean(false));
    }

    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(FieldValue::Integer(integer));
    }

    match trimmed.parse::<f64>() {
        Ok(float) if float.is_finite() => Some(FieldValue::Float(float)),
        _ => Some(FieldValue::Text(trimmed.to_string())),
    }
}
