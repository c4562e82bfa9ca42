use serde_json::{Map, Value};

use super::types::ProviderHint;
use super::LocatorError;

/// Sub-object names that wrap the provider payload.
pub const NESTED_CONTAINERS: &[&str] = &["analysis_json", "analysisJson", "analysis_data"];

/// Provider name fields, checked at top level then inside the container.
const PROVIDER_FIELDS: &[&str] = &["provider", "llm_provider"];

/// A decoded report envelope: the top-level value and, when present, the
/// `analysis_json` (or equivalent) sub-object, both with JSON-in-string
/// layers peeled.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    root: Value,
    nested: Option<Value>,
}

impl Envelope {
    /// Decode an arbitrary parsed value. Strings are JSON-decoded up to
    /// `max_depth` times; decoding stops silently at the first failure.
    pub fn decode(raw: &Value, max_depth: usize) -> Self {
        let root = decode_layers(raw.clone(), max_depth);

        let nested = root.as_object().and_then(|obj| {
            NESTED_CONTAINERS
                .iter()
                .find_map(|key| obj.get(*key))
                .map(|v| decode_layers(v.clone(), max_depth))
                .filter(Value::is_object)
        });

        Self { root, nested }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_object(&self) -> Option<&Map<String, Value>> {
        self.root.as_object()
    }

    pub fn nested_object(&self) -> Option<&Map<String, Value>> {
        self.nested.as_ref().and_then(Value::as_object)
    }

    /// Look a key up inside the container first, then at top level.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.nested_object()
            .and_then(|o| o.get(key))
            .or_else(|| self.root_object().and_then(|o| o.get(key)))
    }

    /// Provider hint from `provider` / `llm_provider` / container `provider`.
    pub fn provider(&self) -> ProviderHint {
        let top = self.root_object().and_then(|o| {
            PROVIDER_FIELDS
                .iter()
                .find_map(|k| o.get(*k).and_then(Value::as_str))
                .filter(|s| !s.trim().is_empty())
        });
        let inner = || {
            self.nested_object()
                .and_then(|o| o.get("provider"))
                .and_then(Value::as_str)
        };
        top.or_else(inner)
            .map(ProviderHint::parse)
            .unwrap_or_default()
    }

    /// Error message the provider attached instead of (or next to) a report.
    ///
    /// Checks `{llm_results: {error: ...}}` shapes first, then a plain
    /// `error` string.
    pub fn error_message(&self) -> Option<String> {
        let from_result_object = super::locate::PRIMARY_FIELDS.iter().find_map(|field| {
            self.lookup(field)
                .and_then(Value::as_object)
                .and_then(|o| o.get("error"))
                .map(value_to_text)
        });

        from_result_object
            .or_else(|| self.lookup("error").map(value_to_text))
            .filter(|msg| !msg.trim().is_empty())
    }
}

/// Peel JSON-in-string layers off `value`, at most `max_depth` times.
pub fn decode_layers(mut value: Value, max_depth: usize) -> Value {
    let mut remaining = max_depth;
    while remaining > 0 {
        let Value::String(s) = &value else {
            break;
        };
        match decode_json_str(s) {
            Ok(inner) => {
                value = inner;
                remaining -= 1;
            }
            Err(_) => break,
        }
    }
    value
}

/// Strictly decode a JSON document held in a string field.
pub fn decode_json_str(s: &str) -> Result<Value, LocatorError> {
    let trimmed = s.trim();
    // Cheap reject for prose: only objects, arrays and quoted strings are
    // worth handing to the parser.
    if !matches!(trimmed.as_bytes().first(), Some(b'{' | b'[' | b'"')) {
        return Err(LocatorError::InvalidJson("not a JSON document".into()));
    }
    serde_json::from_str(trimmed).map_err(|e| LocatorError::InvalidJson(e.to_string()))
}

/// Decode a string that must hold a JSON object.
pub fn decode_json_object(s: &str) -> Result<Map<String, Value>, LocatorError> {
    match decode_json_str(s)? {
        Value::Object(map) => Ok(map),
        _ => Err(LocatorError::NotAnObject),
    }
}

/// Render a scalar or structure as display text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
