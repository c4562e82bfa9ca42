use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════
// Tri-state artifact
// ═══════════════════════════════════════════════════════════

/// Outcome of one extraction step.
///
/// `Unsupported` hides the UI element, `Empty` shows a "no data" message,
/// `Populated` carries the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Artifact<T> {
    Unsupported,
    Empty,
    Populated(T),
}

impl<T> Artifact<T> {
    pub fn is_populated(&self) -> bool {
        matches!(self, Self::Populated(_))
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Self::Populated(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> Artifact<Vec<T>> {
    /// `None` → unsupported, empty list → empty, otherwise populated.
    pub fn from_list(items: Option<Vec<T>>) -> Self {
        match items {
            None => Self::Unsupported,
            Some(v) if v.is_empty() => Self::Empty,
            Some(v) => Self::Populated(v),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Risk vocabulary
// ═══════════════════════════════════════════════════════════

/// Canonical risk token used in tables, findings and badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Most severe first.
    pub const ALL: [RiskLevel; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    /// Case-insensitive exact token match; surrounding emphasis and
    /// whitespace are ignored.
    pub fn parse(token: &str) -> Option<Self> {
        let t = token.trim().trim_matches(|c| c == '*' || c == '_').trim();
        match t.to_ascii_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════
// Findings
// ═══════════════════════════════════════════════════════════

/// One `- **Title**: …` block from the findings section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Finding {
    pub title: Option<String>,
    pub location: Option<String>,
    pub breakdown: Option<String>,
    pub risk_level: Option<String>,
    pub impact: Option<String>,
    pub mitigation: Option<String>,
    /// Risk level reads critical or high.
    pub is_elevated: bool,
    /// Block text as written, for fallback display.
    pub raw: String,
}

// ═══════════════════════════════════════════════════════════
// Implications table
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    pub text: String,
    /// Component risk tokens when the column is risk-like and the cell
    /// parses, in written order. `Medium-High` gives `[Medium, High]`.
    pub risk: Vec<RiskLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplicationRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplicationsTable {
    pub headers: Vec<String>,
    /// At least one row.
    pub rows: Vec<ImplicationRow>,
}

// ═══════════════════════════════════════════════════════════
// Instruction-level analysis
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionRisk {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl InstructionRisk {
    /// Case-insensitive; anything unrecognized is `Unknown`.
    pub fn normalize(raw: &str) -> Self {
        RiskLevel::parse(raw).map_or(Self::Unknown, Self::from)
    }

    pub fn as_risk_level(&self) -> Option<RiskLevel> {
        match self {
            Self::Critical => Some(RiskLevel::Critical),
            Self::High => Some(RiskLevel::High),
            Self::Medium => Some(RiskLevel::Medium),
            Self::Low => Some(RiskLevel::Low),
            Self::Unknown => None,
        }
    }
}

impl From<RiskLevel> for InstructionRisk {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Critical => Self::Critical,
            RiskLevel::High => Self::High,
            RiskLevel::Medium => Self::Medium,
            RiskLevel::Low => Self::Low,
        }
    }
}

impl fmt::Display for InstructionRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRecord {
    pub instruction: String,
    pub insight: String,
    pub risk_level: InstructionRisk,
    /// Risk text as written before normalization.
    pub risk_label: String,
}

/// Instruction records plus whether the analysis carries the feature at all.
///
/// An empty `records` with `supported == true` means "analysed, nothing to
/// show"; with `supported == false` the table should be hidden.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstructionExtraction {
    pub supported: bool,
    pub records: Vec<InstructionRecord>,
}

impl InstructionExtraction {
    pub fn artifact(&self) -> Artifact<Vec<InstructionRecord>> {
        if !self.supported {
            Artifact::Unsupported
        } else {
            Artifact::from_list(Some(self.records.clone()))
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Label/value lists
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelValueItem {
    Entry { label: String, value: String },
    Break,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_from_list_states() {
        assert_eq!(Artifact::<Vec<u8>>::from_list(None), Artifact::Unsupported);
        assert_eq!(Artifact::<Vec<u8>>::from_list(Some(vec![])), Artifact::Empty);
        assert!(Artifact::from_list(Some(vec![1])).is_populated());
    }

    #[test]
    fn artifact_serializes_tagged() {
        let v = serde_json::to_value(Artifact::Populated(vec![1])).unwrap();
        assert_eq!(v, serde_json::json!({"state": "populated", "data": [1]}));
        let v = serde_json::to_value(Artifact::<Vec<u8>>::Empty).unwrap();
        assert_eq!(v, serde_json::json!({"state": "empty"}));
    }

    #[test]
    fn risk_level_parse() {
        assert_eq!(RiskLevel::parse(" HIGH "), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("**Critical**"), Some(RiskLevel::Critical));
        assert_eq!(RiskLevel::parse("severe"), None);
        assert!(RiskLevel::Critical < RiskLevel::Low);
    }

    #[test]
    fn instruction_risk_normalizes_case() {
        assert_eq!(InstructionRisk::normalize("Low"), InstructionRisk::Low);
        assert_eq!(InstructionRisk::normalize("MEDIUM"), InstructionRisk::Medium);
        assert_eq!(InstructionRisk::normalize("n/a"), InstructionRisk::Unknown);
        assert_eq!(InstructionRisk::Unknown.to_string(), "unknown");
    }

    #[test]
    fn unsupported_instruction_extraction() {
        let ex = InstructionExtraction::default();
        assert_eq!(ex.artifact(), Artifact::Unsupported);
        let ex = InstructionExtraction { supported: true, records: vec![] };
        assert_eq!(ex.artifact(), Artifact::Empty);
    }
}
