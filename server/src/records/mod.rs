//! In-memory records store backing the chat pipeline.
//!
//! DESIGN
//! ======
//! Records are flat JSON objects loaded once at startup, either from a JSON
//! Lines file or straight from the source CSV export. CSV columns whose
//! non-empty cells all parse as numbers become JSON numbers so range filters
//! work on them; empty cells become `null`. Queries use a MongoDB-style filter document (see [`filter`]) because
//! that is the shape the query-generation prompt asks the model to produce.

pub mod filter;

use std::path::Path;

use csv::StringRecord;

use serde_json::{Map, Value};

pub const DEFAULT_RESULT_LIMIT: usize = 20;

pub type Record = Map<String, Value>;

/// Errors from loading or querying records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("invalid regex: {0}")]
    InvalidRegex(String),
}

/// Outcome of parsing a JSON Lines document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Build a store, cleaning every field name.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        let records = records
            .into_iter()
            .map(|record| {
                record
                    .into_iter()
                    .map(|(k, v)| (clean_field_name(&k), v))
                    .collect()
            })
            .collect();
        Self { records }
    }

    /// Parse JSON Lines text. Blank lines are ignored; lines that are not
    /// JSON objects are skipped and counted.
    #[must_use]
    pub fn parse_jsonl(text: &str) -> (Self, LoadReport) {
        let mut records = Vec::new();
        let mut skipped = 0_usize;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(Value::Object(record)) => records.push(record),
                Ok(_) | Err(_) => skipped = skipped.saturating_add(1),
            }
        }

        let report = LoadReport { loaded: records.len(), skipped };
        (Self::new(records), report)
    }

    /// Parse CSV text with a header row. Rows whose field count differs
    /// from the header are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidCsv`] if the header row cannot be read.
    pub fn parse_csv(text: &str) -> Result<(Self, LoadReport), RecordError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader
            .headers()
            .map_err(|e| RecordError::InvalidCsv(e.to_string()))?
            .clone();

        let mut rows: Vec<StringRecord> = Vec::new();
        let mut skipped = 0_usize;
        for row in reader.records() {
            match row {
                Ok(row) => rows.push(row),
                Err(_) => skipped = skipped.saturating_add(1),
            }
        }

        let kinds: Vec<ColumnKind> = (0..headers.len())
            .map(|i| ColumnKind::infer(rows.iter().filter_map(|row| row.get(i))))
            .collect();
        let records = rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .zip(&kinds)
                    .zip(row.iter())
                    .map(|((name, kind), cell)| (name.to_string(), kind.cell(cell)))
                    .collect()
            })
            .collect();

        let report = LoadReport { loaded: rows.len(), skipped };
        Ok((Self::new(records), report))
    }

    /// Read and parse a records file: `.csv` as CSV, anything else as JSON
    /// Lines.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Io`] if the file cannot be read and
    /// [`RecordError::InvalidCsv`] for an unreadable CSV header.
    pub async fn load(path: &Path) -> Result<(Self, LoadReport), RecordError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RecordError::Io { path: path.display().to_string(), message: e.to_string() })?;
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv { Self::parse_csv(&text) } else { Ok(Self::parse_jsonl(&text)) }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Field-to-type map of the first record, as pretty JSON, for prompting.
    #[must_use]
    pub fn schema_info(&self) -> String {
        let Some(sample) = self.records.first() else {
            return "No documents in collection to infer schema from.".to_string();
        };
        let schema: Map<String, Value> = sample
            .iter()
            .filter(|(field, _)| field.as_str() != "_id")
            .map(|(field, value)| (field.clone(), Value::String(type_name(value).to_string())))
            .collect();
        serde_json::to_string_pretty(&Value::Object(schema)).unwrap_or_else(|_| "{}".to_string())
    }

    /// Records matching `filter`, in load order, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter is malformed or uses an unsupported
    /// operator.
    pub fn find(&self, filter: &Value, limit: usize) -> Result<Vec<Value>, RecordError> {
        let compiled = filter::Filter::compile(filter)?;
        Ok(self
            .records
            .iter()
            .filter(|record| compiled.matches(record))
            .take(limit)
            .map(|record| Value::Object(record.clone()))
            .collect())
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
#[must_use]
pub fn clean_field_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Type inferred for one CSV column from all of its non-empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = Self::Integer;
        for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
            if kind == Self::Integer && cell.parse::<i64>().is_err() {
                kind = Self::Float;
            }
            if kind == Self::Float && cell.parse::<f64>().is_err() {
                return Self::Text;
            }
        }
        kind
    }

    fn cell(self, raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        match self {
            Self::Integer => trimmed.parse::<i64>().map_or(Value::Null, Value::from),
            Self::Float => trimmed
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map_or(Value::Null, Value::Number),
            Self::Text => Value::String(raw.to_string()),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
