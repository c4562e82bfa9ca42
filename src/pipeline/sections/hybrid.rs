use serde::Serialize;

use super::{FlexibleStrategy, MarkdownBoldStrategy, SectionMap, SectionStrategy};
use crate::pipeline::locator::ProviderHint;

/// Result of a hybrid split: which strategy won and its sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSelection {
    pub strategy: &'static str,
    pub sections: SectionMap,
}

/// Runs a list of strategies and keeps the richest result.
///
/// Richest = most sections. Ties go to the strategy listed first, so the
/// order of the list is the tie-break policy.
pub struct HybridSelector {
    strategies: Vec<Box<dyn SectionStrategy>>,
}

impl Default for HybridSelector {
    fn default() -> Self {
        Self::new(vec![Box::new(FlexibleStrategy), Box::new(MarkdownBoldStrategy)])
    }
}

impl HybridSelector {
    pub fn new(strategies: Vec<Box<dyn SectionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Ollama output is written in markdown/bold style, so that strategy
    /// is listed first and wins ties.
    pub fn for_provider(provider: &ProviderHint) -> Self {
        match provider {
            ProviderHint::Ollama => {
                Self::new(vec![Box::new(MarkdownBoldStrategy), Box::new(FlexibleStrategy)])
            }
            _ => Self::default(),
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Split with every strategy, keep the one with the most sections.
    /// `None` when no strategy recognized a heading.
    pub fn select(&self, text: &str) -> Option<SplitSelection> {
        let mut best: Option<SplitSelection> = None;

        for strategy in &self.strategies {
            let Some(sections) = strategy.split(text) else {
                tracing::debug!(strategy = strategy.name(), "Strategy found no headings");
                continue;
            };
            tracing::debug!(strategy = strategy.name(), sections = sections.len(), "Strategy result");

            let richer = best
                .as_ref()
                .map_or(true, |b| sections.len() > b.sections.len());
            if richer {
                best = Some(SplitSelection {
                    strategy: strategy.name(),
                    sections,
                });
            }
        }

        match &best {
            Some(sel) => tracing::debug!(
                strategy = sel.strategy,
                sections = sel.sections.len(),
                "Section strategy selected"
            ),
            None => tracing::debug!("No strategy produced sections"),
        }
        best
    }

    /// Sections only.
    pub fn split(&self, text: &str) -> Option<SectionMap> {
        self.select(text).map(|s| s.sections)
    }
}

/// Split with the default selector.
pub fn split_sections(text: &str) -> Option<SectionMap> {
    HybridSelector::default().split(text)
}
