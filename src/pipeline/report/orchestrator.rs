use serde_json::Value;

use super::types::{ListingSeverity, RenderedReport, SectionLayout, UnlabeledReason};
use crate::engine_config::EngineConfig;
use crate::pipeline::extractors::{
    extract_findings, extract_implications_table, extract_instructions, extract_label_values,
    extract_next_steps, Artifact, ImplicationsTable,
};
use crate::pipeline::locator::{locate_in_envelope, Envelope, ProviderHint, ReportStatus};
use crate::pipeline::sections::{clean_for_display, CanonicalSection, HybridSelector};
use crate::pipeline::severity::{highest_severity, score_severity, vulnerability_banner};

/// Turns raw provider envelopes into render-ready reports:
/// decode → locate → size guard → split → extract → classify.
///
/// Stateless apart from configuration; one renderer can serve any number
/// of threads.
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    config: EngineConfig,
}

impl ReportRenderer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render one envelope. Never fails: missing pieces come back as
    /// `Artifact::Unsupported`, `None`, or `Verdict::NotApplicable`.
    pub fn render(&self, raw: &Value) -> RenderedReport {
        let span = tracing::info_span!(
            "render_report",
            provider = tracing::field::Empty,
            chars = tracing::field::Empty
        );
        let _guard = span.enter();

        let envelope = Envelope::decode(raw, self.config.max_json_decode_depth);
        let provider = envelope.provider();
        span.record("provider", tracing::field::display(&provider));

        let located = locate_in_envelope(&envelope, &self.config);
        let text = located.as_ref().map(|r| r.text.as_str());
        if let Some(t) = text {
            span.record("chars", t.chars().count());
        }

        let status = match (&located, envelope.error_message()) {
            (Some(_), _) => ReportStatus::Success,
            (None, Some(error)) => ReportStatus::Failed { error },
            (None, None) => ReportStatus::Missing,
        };

        let oversized = text.is_some_and(|t| self.config.is_oversized(t));
        if oversized {
            tracing::warn!(
                bytes = text.map_or(0, str::len),
                limit = self.config.max_input_bytes,
                "Report text over size cap, rendered as a single block"
            );
        }

        let layout = text.map(|t| self.layout(t, &provider, oversized));
        let sections = layout.as_ref().and_then(SectionLayout::sections);
        let section = |kind: CanonicalSection| sections.and_then(|s| s.canonical(kind));

        let findings = list_artifact(
            section(CanonicalSection::CyberSecurityKeyFindings),
            extract_findings,
        );
        let implications = table_artifact(section(CanonicalSection::ImplicationsAndRecommendations));
        let structure_observations = list_artifact(
            section(CanonicalSection::GeneralStructureObservations),
            extract_label_values,
        );
        let next_steps = list_artifact(section(CanonicalSection::NextSteps), extract_next_steps);

        // Oversized text is not searched for embedded arrays.
        let scan_text = if oversized { None } else { text };
        let instructions = extract_instructions(&envelope, scan_text).artifact();

        let severity = text.map(score_severity).unwrap_or_default();
        let verdict = severity.verdict();
        let badge = highest_severity(&envelope, scan_text);
        let banner = vulnerability_banner(&envelope);

        tracing::info!(
            status = ?status,
            sections = sections.map_or(0, |s| s.len()),
            findings = findings.is_populated(),
            instructions = instructions.is_populated(),
            verdict = %verdict,
            "Report rendered"
        );

        RenderedReport {
            status,
            provider,
            source: located.as_ref().map(|r| r.source.clone()),
            report_text: text.map(str::to_string),
            layout,
            findings,
            implications,
            structure_observations,
            next_steps,
            instructions,
            severity,
            verdict,
            badge,
            banner,
        }
    }

    /// Verdict and badge only, for list views.
    pub fn listing_severity(&self, raw: &Value) -> ListingSeverity {
        let envelope = Envelope::decode(raw, self.config.max_json_decode_depth);
        let located = locate_in_envelope(&envelope, &self.config);
        let text = located.as_ref().map(|r| r.text.as_str());
        ListingSeverity {
            verdict: text.map(score_severity).unwrap_or_default().verdict(),
            badge: highest_severity(&envelope, text),
        }
    }

    fn layout(&self, text: &str, provider: &ProviderHint, oversized: bool) -> SectionLayout {
        if oversized {
            return SectionLayout::Unlabeled {
                text: text.to_string(),
                reason: UnlabeledReason::Oversized,
            };
        }
        match HybridSelector::for_provider(provider).select(text) {
            Some(selection) => SectionLayout::Structured {
                strategy: selection.strategy,
                display_sections: clean_for_display(&selection.sections),
                sections: selection.sections,
            },
            None => SectionLayout::Unlabeled {
                text: text.to_string(),
                reason: UnlabeledReason::NoHeadings,
            },
        }
    }
}

/// Render with the given configuration.
pub fn render_report(raw: &Value, config: &EngineConfig) -> RenderedReport {
    ReportRenderer::new(config.clone()).render(raw)
}

/// Verdict and badge for list views.
pub fn listing_severity(raw: &Value, config: &EngineConfig) -> ListingSeverity {
    ReportRenderer::new(config.clone()).listing_severity(raw)
}

/// Absent section → unsupported, blank section → empty, otherwise the
/// extractor decides; an extractor that finds no structure leaves the
/// section to be shown as prose.
fn list_artifact<T>(
    section: Option<&str>,
    extract: impl FnOnce(&str) -> Option<Vec<T>>,
) -> Artifact<Vec<T>> {
    match section {
        None => Artifact::Unsupported,
        Some(body) if body.trim().is_empty() => Artifact::Empty,
        Some(body) => extract(body).map_or(Artifact::Unsupported, |v| Artifact::from_list(Some(v))),
    }
}

fn table_artifact(section: Option<&str>) -> Artifact<ImplicationsTable> {
    match section {
        None => Artifact::Unsupported,
        Some(body) if body.trim().is_empty() => Artifact::Empty,
        Some(body) => extract_implications_table(body).map_or(Artifact::Unsupported, Artifact::Populated),
    }
}
