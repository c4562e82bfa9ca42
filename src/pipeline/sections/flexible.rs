use std::sync::LazyLock;

use regex::Regex;

use super::{
    assemble, fenced_spans, inside_any, normalize_heading, normalize_newlines, HeadingHit,
    SectionMap, SectionStrategy,
};

/// Numbered, ATX or bold heading in a single pass. The numbered form only
/// accepts upper-case titles so ordinary numbered list items stay in bodies.
static FLEXIBLE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:\d+\.[ \t]*([A-Z][A-Z0-9 &\-()_]*)|(?:#{2,}|\*\*)[ \t]*(?:\d+\.?[ \t]*)?((?i:[A-Z0-9][A-Z0-9 &\-()_]*?))[ \t]*:?[ \t]*(?:\*\*)?[ \t]*:?)[ \t]*$",
    )
    .expect("Invalid flexible heading regex")
});

/// Tolerant single-regex strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexibleStrategy;

impl SectionStrategy for FlexibleStrategy {
    fn name(&self) -> &'static str {
        "flexible"
    }

    fn split(&self, text: &str) -> Option<SectionMap> {
        let text = normalize_newlines(text);
        let fences = fenced_spans(&text);

        let hits: Vec<HeadingHit> = FLEXIBLE_HEADING
            .captures_iter(&text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if inside_any(&fences, whole.start()) {
                    return None;
                }
                let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
                let name = normalize_heading(raw);
                if name.is_empty() {
                    return None;
                }
                Some(HeadingHit {
                    start: whole.start(),
                    end: whole.end(),
                    name,
                })
            })
            .collect();

        assemble(&text, &hits, self.name())
    }
}
