use serde_json::{Map, Value};

use super::envelope::{decode_json_object, Envelope};
use super::types::{LocatedReport, RejectReason, ReportSource};
use super::LocatorError;
use crate::engine_config::EngineConfig;

/// Priority field names, in precedence order.
pub const PRIMARY_FIELDS: &[&str] = &["llm_results", "llm_result"];

/// Alternate field names used by other providers and upload formats.
pub const ALTERNATE_FIELDS: &[&str] = &[
    "analysis_result",
    "result",
    "response",
    "content",
    "output",
    "analysis",
    "report",
    "findings",
    "assessment",
    "review",
    "llm_response",
    "ai_analysis",
    "security_analysis",
    "plc_analysis",
];

/// Vocabulary that marks an unlabeled string as a probable report.
pub const REPORT_KEYWORDS: &[&str] = &[
    "EXECUTIVE SUMMARY",
    "CODE STRUCTURE & QUALITY REVIEW",
    "CYBER SECURITY KEY FINDINGS",
    "SUMMARY",
    "ANALYSIS",
    "FINDINGS",
    "RECOMMENDATIONS",
    "VULNERABILITY",
    "SECURITY",
    "PLC",
];

/// Fields that normally hold a path but sometimes carry a whole JSON upload.
const PATH_FIELDS: &[&str] = &["filePath", "file_path", "path"];

/// Model refusal templates. Matched case-insensitively, apostrophes folded.
const REFUSAL_TEMPLATES: &[&str] = &[
    "i'm sorry, but i can't assist",
    "i'm sorry, but i cannot assist",
    "i cannot provide assistance",
    "i can't help with that",
];

/// Locate the report text inside an arbitrary envelope.
///
/// Attempts, first match wins: priority fields, alternate fields, heuristic
/// scan (container first, then top level), then a path-like field holding
/// an embedded JSON document. Every candidate passes the rejection filter;
/// a rejected candidate does not stop the search.
pub fn locate_report(raw: &Value, config: &EngineConfig) -> Option<LocatedReport> {
    let envelope = Envelope::decode(raw, config.max_json_decode_depth);
    locate_in_envelope(&envelope, config)
}

/// Convenience wrapper returning only the text, with default configuration.
pub fn locate_report_text(raw: &Value) -> Option<String> {
    locate_report(raw, &EngineConfig::default()).map(|r| r.text)
}

/// Same as [`locate_report`] on an already-decoded envelope.
pub fn locate_in_envelope(envelope: &Envelope, config: &EngineConfig) -> Option<LocatedReport> {
    if let Value::String(bare) = envelope.root() {
        return accept(bare, config).ok().map(|text| LocatedReport {
            text,
            source: ReportSource::BareText,
        });
    }

    let root = envelope.root_object()?;
    let nested = envelope.nested_object();

    let found = find_named(nested, root, PRIMARY_FIELDS, config, |field, nested| {
        ReportSource::PrimaryField { field, nested }
    })
    .or_else(|| {
        find_named(nested, root, ALTERNATE_FIELDS, config, |field, nested| {
            ReportSource::AlternateField { field, nested }
        })
    })
    .or_else(|| nested.and_then(|obj| heuristic_scan(obj, true, config)))
    .or_else(|| heuristic_scan(root, false, config))
    .or_else(|| embedded_document(root, config));

    match &found {
        Some(report) => tracing::debug!(
            source = ?report.source,
            chars = report.text.chars().count(),
            "Report text located"
        ),
        None => tracing::debug!(
            top_level_keys = root.len(),
            has_container = nested.is_some(),
            "No report text in envelope"
        ),
    }
    found
}

/// Apply the rejection filter to a candidate.
pub fn accept(candidate: &str, config: &EngineConfig) -> Result<String, LocatorError> {
    if is_refusal(candidate) {
        return Err(LocatorError::Rejected(RejectReason::RefusalTemplate));
    }
    if candidate.trim().chars().count() < config.min_report_chars {
        return Err(LocatorError::Rejected(RejectReason::TooShort));
    }
    Ok(candidate.to_string())
}

/// True when the text is a model refusal rather than a report.
pub fn is_refusal(text: &str) -> bool {
    let folded = text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
    REFUSAL_TEMPLATES.iter().any(|t| folded.contains(t))
}

/// Check each field name in order, container before top level.
fn find_named(
    nested: Option<&Map<String, Value>>,
    root: &Map<String, Value>,
    fields: &[&str],
    config: &EngineConfig,
    source: impl Fn(String, bool) -> ReportSource,
) -> Option<LocatedReport> {
    for field in fields {
        let locations = [(nested, true), (Some(root), false)];
        for (obj, is_nested) in locations {
            let Some(candidate) = obj.and_then(|o| o.get(*field)).and_then(Value::as_str) else {
                continue;
            };
            match accept(candidate, config) {
                Ok(text) => {
                    return Some(LocatedReport {
                        text,
                        source: source((*field).to_string(), is_nested),
                    })
                }
                Err(e) => tracing::debug!(field = *field, nested = is_nested, reason = %e, "Candidate skipped"),
            }
        }
    }
    None
}

/// Any sufficiently long string field that mentions report vocabulary.
/// Path fields are left to `embedded_document`.
fn heuristic_scan(
    obj: &Map<String, Value>,
    nested: bool,
    config: &EngineConfig,
) -> Option<LocatedReport> {
    obj.iter().find_map(|(key, value)| {
        if PATH_FIELDS.contains(&key.as_str()) {
            return None;
        }
        let s = value.as_str()?;
        if s.chars().count() <= config.heuristic_min_chars {
            return None;
        }
        if !REPORT_KEYWORDS.iter().any(|k| s.contains(k)) {
            return None;
        }
        let text = accept(s, config).ok()?;
        Some(LocatedReport {
            text,
            source: ReportSource::HeuristicScan {
                field: key.clone(),
                nested,
            },
        })
    })
}

/// Last resort: a path field whose value is a JSON upload; retry the
/// priority fields inside it.
fn embedded_document(root: &Map<String, Value>, config: &EngineConfig) -> Option<LocatedReport> {
    PATH_FIELDS.iter().find_map(|path_field| {
        let raw = root.get(*path_field)?.as_str()?;
        let doc = match decode_json_object(raw) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!(field = *path_field, reason = %e, "Path field is not an embedded document");
                return None;
            }
        };
        PRIMARY_FIELDS.iter().find_map(|field| {
            let text = accept(doc.get(*field)?.as_str()?, config).ok()?;
            Some(LocatedReport {
                text,
                source: ReportSource::EmbeddedDocument {
                    path_field: (*path_field).to_string(),
                    field: (*field).to_string(),
                },
            })
        })
    })
}
