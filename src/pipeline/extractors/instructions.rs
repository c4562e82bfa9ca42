use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::relaxed_json::parse_relaxed_array;
use super::types::{InstructionExtraction, InstructionRecord, InstructionRisk};
use super::ExtractionError;
use crate::pipeline::locator::{value_to_text, Envelope};

/// Envelope key and in-text marker for instruction records.
pub const INSTRUCTION_FIELD: &str = "instruction_analysis";

/// Section heading some reports use for the same data.
const INSTRUCTION_HEADING: &str = "INSTRUCTION-LEVEL ANALYSIS";

static JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)```json[ \t]*\n?(.+?)```").expect("Invalid json block regex")
});

/// `instruction_analysis: [`, `"instruction_analysis" = [`, ... up to the
/// opening bracket.
static LABELED_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?instruction_analysis["']?\s*[:=]\s*\["#)
        .expect("Invalid labeled array regex")
});

const INSTRUCTION_KEYS: &[&str] = &["instruction", "code", "line"];
const INSIGHT_KEYS: &[&str] = &["insight", "analysis", "description", "explanation"];
const RISK_KEYS: &[&str] = &["risk_level", "riskLevel", "risk"];
const NESTED_RISK_KEYS: &[&str] = &["risk_level", "level", "value"];

/// Instruction-level records for a report.
///
/// Order of attempts: the envelope's `instruction_analysis` (array, or a
/// string holding one), then arrays embedded in the report text. Never
/// fails; when nothing parses the records are empty. `supported` is set when
/// the envelope has the field or the text mentions it at all.
pub fn extract_instructions(envelope: &Envelope, report_text: Option<&str>) -> InstructionExtraction {
    let field = envelope.lookup(INSTRUCTION_FIELD);
    let text = report_text.unwrap_or("");
    let mentioned = text.contains(INSTRUCTION_FIELD) || text.contains(INSTRUCTION_HEADING);
    let supported = field.is_some() || mentioned;

    let from_field = field.and_then(values_from_field).filter(|v| !v.is_empty());
    let values = match from_field {
        Some(values) => {
            tracing::debug!(records = values.len(), "Instruction records from envelope field");
            values
        }
        None if text.contains(INSTRUCTION_FIELD) => embedded_array(text).unwrap_or_default(),
        None => Vec::new(),
    };

    InstructionExtraction {
        supported,
        records: records_from_values(&values),
    }
}

/// Value of the envelope field as an array of raw records.
fn values_from_field(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) => match parse_array_text(s) {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::debug!(reason = %e, "instruction_analysis string is not an array");
                None
            }
        },
        _ => None,
    }
}

/// Search the report text for an embedded array. Fenced ```json blocks are
/// tried first, then a labeled `instruction_analysis: [...]` anywhere.
fn embedded_array(text: &str) -> Option<Vec<Value>> {
    for caps in JSON_BLOCK.captures_iter(text) {
        let block = caps[1].trim();
        if let Some(items) = array_from_block(block) {
            tracing::debug!(records = items.len(), "Instruction records from fenced block");
            return Some(items);
        }
    }

    let items = labeled_array(text)?;
    tracing::debug!(records = items.len(), "Instruction records from labeled array");
    Some(items)
}

fn array_from_block(block: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(block) {
        Ok(Value::Array(items)) if !items.is_empty() => return Some(items),
        Ok(Value::Object(obj)) => {
            if let Some(Value::Array(items)) = obj.get(INSTRUCTION_FIELD) {
                if !items.is_empty() {
                    return Some(items.clone());
                }
            }
        }
        _ => {}
    }

    if let Some(items) = labeled_array(block) {
        return Some(items);
    }

    // Only recover bare arrays that look like instruction records.
    if block.starts_with('[') && block.contains("instruction") {
        match parse_relaxed_array(block) {
            Ok(items) if !items.is_empty() => return Some(items),
            Ok(_) => {}
            Err(e) => tracing::debug!(reason = %e, "Fenced block not recoverable"),
        }
    }
    None
}

fn labeled_array(text: &str) -> Option<Vec<Value>> {
    LABELED_ARRAY.find_iter(text).find_map(|m| {
        let open = m.end() - 1;
        let slice = balanced_brackets(text, open)?;
        match parse_array_text(slice) {
            Ok(items) if !items.is_empty() => Some(items),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(reason = %e, "Labeled instruction array not recoverable");
                None
            }
        }
    })
}

/// Strict JSON first, relaxed recovery second.
fn parse_array_text(text: &str) -> Result<Vec<Value>, ExtractionError> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(ExtractionError::NotAnArray),
        Err(strict) => parse_relaxed_array(text.trim()).map_err(|relaxed| {
            ExtractionError::JsonParsing(format!("strict: {strict}; relaxed: {relaxed}"))
        }),
    }
}

/// Slice from the `[` at `open` through its matching `]`, skipping
/// brackets inside quoted strings. `None` when unbalanced.
pub fn balanced_brackets(text: &str, open: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'[') {
        return None;
    }
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Convert raw JSON records. Non-object entries are skipped.
pub fn records_from_values(values: &[Value]) -> Vec<InstructionRecord> {
    let records: Vec<InstructionRecord> = values
        .iter()
        .filter_map(Value::as_object)
        .map(record_from_object)
        .collect();
    if records.len() != values.len() {
        tracing::debug!(
            skipped = values.len() - records.len(),
            "Non-object instruction entries skipped"
        );
    }
    records
}

fn record_from_object(obj: &Map<String, Value>) -> InstructionRecord {
    let first_text = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| obj.get(*k))
            .map(value_to_text)
            .unwrap_or_default()
    };

    let risk_label = RISK_KEYS
        .iter()
        .find_map(|k| obj.get(*k))
        .map(risk_text)
        .unwrap_or_default();

    InstructionRecord {
        instruction: first_text(INSTRUCTION_KEYS),
        insight: first_text(INSIGHT_KEYS),
        risk_level: InstructionRisk::normalize(&risk_label),
        risk_label,
    }
}

/// Risk value as text; objects are unwrapped through their level field.
fn risk_text(value: &Value) -> String {
    match value {
        Value::Object(inner) => NESTED_RISK_KEYS
            .iter()
            .find_map(|k| inner.get(*k))
            .map(risk_text)
            .unwrap_or_else(|| value.to_string()),
        other => value_to_text(other),
    }
}
