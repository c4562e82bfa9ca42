use serde::Serialize;

use crate::pipeline::extractors::{
    Artifact, Finding, ImplicationsTable, InstructionRecord, LabelValueItem, RiskLevel,
};
use crate::pipeline::locator::{ProviderHint, ReportSource, ReportStatus};
use crate::pipeline::sections::SectionMap;
use crate::pipeline::severity::{SeverityScore, Verdict};

/// How the report text is laid out for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionLayout {
    /// Headings were recognized.
    Structured {
        strategy: &'static str,
        /// Sections as split, including instruction-level sections.
        sections: SectionMap,
        /// Sections prepared for display.
        display_sections: SectionMap,
    },
    /// Show the whole text as one block.
    Unlabeled {
        text: String,
        reason: UnlabeledReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlabeledReason {
    /// No strategy recognized a heading.
    NoHeadings,
    /// Text exceeded the input size cap and was not scanned.
    Oversized,
}

impl SectionLayout {
    pub fn sections(&self) -> Option<&SectionMap> {
        match self {
            Self::Structured { sections, .. } => Some(sections),
            Self::Unlabeled { .. } => None,
        }
    }

    pub fn display_sections(&self) -> Option<&SectionMap> {
        match self {
            Self::Structured { display_sections, .. } => Some(display_sections),
            Self::Unlabeled { .. } => None,
        }
    }
}

/// Everything the presentation layer needs for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedReport {
    pub status: ReportStatus,
    pub provider: ProviderHint,
    /// Where the text was found; `None` when no report text was located.
    pub source: Option<ReportSource>,
    pub report_text: Option<String>,
    pub layout: Option<SectionLayout>,
    pub findings: Artifact<Vec<Finding>>,
    pub implications: Artifact<ImplicationsTable>,
    pub structure_observations: Artifact<Vec<LabelValueItem>>,
    pub next_steps: Artifact<Vec<String>>,
    pub instructions: Artifact<Vec<InstructionRecord>>,
    pub severity: SeverityScore,
    pub verdict: Verdict,
    /// Highest explicit risk level, for list badges.
    pub badge: Option<RiskLevel>,
    /// Critical/high vulnerability banner.
    pub banner: Option<RiskLevel>,
}

/// Severity summary for list views (baselines, comparisons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingSeverity {
    pub verdict: Verdict,
    pub badge: Option<RiskLevel>,
}
