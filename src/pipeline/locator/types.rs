use std::fmt;

use serde::{Deserialize, Serialize};

/// Report text resolved from an envelope, with where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedReport {
    pub text: String,
    pub source: ReportSource,
}

/// Where in the envelope the report text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportSource {
    /// One of the priority field names (`llm_results`, `llm_result`).
    PrimaryField { field: String, nested: bool },
    /// One of the alternate field names (`result`, `report`, ...).
    AlternateField { field: String, nested: bool },
    /// An unlabeled long string that mentions report vocabulary.
    HeuristicScan { field: String, nested: bool },
    /// A path-like field whose value was itself a JSON document.
    EmbeddedDocument { path_field: String, field: String },
    /// The envelope was a bare (non-JSON) string.
    BareText,
}

impl ReportSource {
    /// Field name the text was read from, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::PrimaryField { field, .. }
            | Self::AlternateField { field, .. }
            | Self::HeuristicScan { field, .. }
            | Self::EmbeddedDocument { field, .. } => Some(field),
            Self::BareText => None,
        }
    }
}

/// Why a candidate string was not accepted as report text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Matches a known model refusal template.
    RefusalTemplate,
    /// Shorter than the configured minimum.
    TooShort,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RefusalTemplate => write!(f, "refusal template"),
            Self::TooShort => write!(f, "too short"),
        }
    }
}

/// Overall state of the provider's answer, as shown next to the report title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportStatus {
    /// Report text was located.
    Success,
    /// No report text, and the envelope carries an `error` message.
    Failed { error: String },
    /// No report text and no error.
    Missing,
}

/// Which model provider produced the report, when the envelope says so.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderHint {
    Ollama,
    OpenAi,
    Other(String),
    #[default]
    Unknown,
}

impl ProviderHint {
    /// Parse a provider name, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "" => Self::Unknown,
            "ollama" => Self::Ollama,
            "openai" | "open_ai" | "open-ai" => Self::OpenAi,
            _ => Self::Other(lower),
        }
    }
}

impl fmt::Display for ProviderHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAi => write!(f, "openai"),
            Self::Other(name) => write!(f, "{name}"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
