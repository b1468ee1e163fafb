use crate::ir::{MISSING_KEY, Record};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset is not valid JSON: {0}")]
    Syntax(String),
    #[error("dataset must be a JSON array of records, found {0}")]
    NotAnArray(&'static str),
}

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub records: Vec<Record>,
    /// Elements that were not objects and could not be read as records.
    pub skipped: usize,
    /// Records whose class or title was missing and fell back to the
    /// `undefined` grouping key.
    pub incomplete: usize,
}

pub fn load_records(path: &Path) -> Result<ParseOutput, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&contents)
}

/// Parses a dataset of `{ class, title, subtitle? }` objects.
///
/// Strict JSON is tried first; hand-edited files and spreadsheet exports
/// (comments, trailing commas, `NaN` cells) go through the JSON5 reader.
/// Record shape is never rejected: missing fields degrade to grouping keys.
pub fn parse_records(input: &str) -> Result<ParseOutput, LoadError> {
    let value = match serde_json::from_str::<Value>(input) {
        Ok(value) => value,
        Err(strict_err) => json5::from_str::<Value>(input)
            .map_err(|_| LoadError::Syntax(strict_err.to_string()))?,
    };

    let items = match value {
        Value::Array(items) => items,
        other => return Err(LoadError::NotAnArray(value_kind(&other))),
    };

    let mut output = ParseOutput::default();
    for (idx, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            log::warn!("skipping dataset entry {idx}: expected object, found {}", value_kind(item));
            output.skipped += 1;
            continue;
        };
        let class = fields.get("class").and_then(scalar_text);
        let title = fields.get("title").and_then(scalar_text);
        if class.is_none() || title.is_none() {
            output.incomplete += 1;
        }
        // Falsy cells (0, false, null, "") mean no subtitle.
        let subtitle = fields
            .get("subtitle")
            .filter(|value| !is_zero(value))
            .and_then(scalar_text)
            .filter(|s| !s.is_empty());
        output.records.push(Record {
            class: class.unwrap_or_else(|| MISSING_KEY.to_string()),
            title: title.unwrap_or_else(|| MISSING_KEY.to_string()),
            subtitle,
        });
    }

    if output.incomplete > 0 {
        log::warn!(
            "{} record(s) missing class or title, grouped under \"{MISSING_KEY}\"",
            output.incomplete
        );
    }

    Ok(output)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn is_zero(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.as_f64() == Some(0.0))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
