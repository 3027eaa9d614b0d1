//! Tool output → editor diagnostics.
//!
//! The analysis tool reports `{"files": {<file>: {"errors": [...]}}}`. Each
//! finding is mapped field by field with defaults, so a sparse finding still
//! yields a usable marker. Spans are widened to an exclusive end column.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{LintError, LintResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Anything other than `"error"` collapses to a warning.
    fn from_label(label: &str) -> Self {
        if label == "error" {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}

/// One finding, shaped for the editor's marker API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub start_line_number: u64,
    pub start_column: u64,
    pub end_line_number: u64,
    pub end_column: u64,
    pub message: String,
}

/// Parse raw tool output into diagnostics, in document order.
///
/// Fails only when the document itself is unusable. Individual findings that
/// can't be mapped are skipped with a warning.
pub fn parse_diagnostics(raw: &str) -> LintResult<Vec<Diagnostic>> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| LintError::MalformedOutput(format!("not JSON: {e}")))?;

    let files = match doc.get("files") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(files)) => files,
        Some(other) => {
            return Err(LintError::MalformedOutput(format!(
                "expected object for 'files', got: {other}"
            )))
        }
    };

    let mut diagnostics = Vec::new();
    for (file, record) in files {
        let Some(findings) = record.get("errors").and_then(Value::as_array) else {
            continue;
        };
        for (index, finding) in findings.iter().enumerate() {
            match map_finding(finding) {
                Ok(diag) => diagnostics.push(diag),
                Err(reason) => {
                    tracing::warn!("skipping finding {index} in {file}: {reason}");
                }
            }
        }
    }
    Ok(diagnostics)
}

fn map_finding(finding: &Value) -> Result<Diagnostic, String> {
    let Value::Object(fields) = finding else {
        return Err(format!("expected object, got: {finding}"));
    };

    // Absent means error; null, numbers and other labels are warnings.
    let severity = match fields.get("severity") {
        None => Severity::Error,
        Some(Value::String(label)) => Severity::from_label(label),
        Some(_) => Severity::Warning,
    };

    let start_line = position(fields, "line")?.unwrap_or(1).max(1);
    let start_column = position(fields, "column")?.unwrap_or(1).max(1);
    let end_line = position(fields, "endLine")?
        .map(|l| l.max(1))
        .unwrap_or(start_line);
    let end_column = position(fields, "endColumn")?
        .unwrap_or(start_column)
        .saturating_add(1);

    let message = match fields.get("message") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(m)) => m.clone(),
        Some(other) => other.to_string(),
    };

    Ok(Diagnostic {
        severity,
        start_line_number: start_line,
        start_column,
        end_line_number: end_line,
        end_column,
        message,
    })
}

/// Read an optional non-negative integer field.
fn position(fields: &Map<String, Value>, key: &str) -> Result<Option<u64>, String> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| format!("{key} is not a non-negative integer: {value}")),
    }
}
