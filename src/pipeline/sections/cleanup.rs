// Prepare a SectionMap for display: drop sections rendered elsewhere, strip
// embedded JSON payloads, tidy blank lines.

use std::sync::LazyLock;

use regex::Regex;

use super::SectionMap;

/// Sections whose name contains this are shown through the instruction table.
const INSTRUCTION_SECTION_MARKER: &str = "INSTRUCTION-LEVEL ANALYSIS";

static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```json[ \t]*\n.*?```").expect("Invalid json fence regex")
});

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid newline run regex"));

/// Display copy of `sections`. The input map is left untouched.
pub fn clean_for_display(sections: &SectionMap) -> SectionMap {
    let mut cleaned = sections.clone();
    let before = cleaned.len();
    cleaned.retain(|s| !s.name.contains(INSTRUCTION_SECTION_MARKER));
    let shown = cleaned.len();
    if shown != before {
        tracing::debug!(removed = before - shown, "Instruction-level sections hidden from display");
    }
    cleaned.map_bodies(clean_body);
    cleaned
}

/// Strip ```json blocks and collapse runs of three or more newlines.
pub fn clean_body(body: &str) -> String {
    let without_json = JSON_FENCE.replace_all(body, "");
    EXCESS_NEWLINES
        .replace_all(&without_json, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_sections_are_hidden() {
        let mut map = SectionMap::new();
        map.insert("SUMMARY", "ok");
        map.insert("INSTRUCTION-LEVEL ANALYSIS (REQUIRED)", "```json\n[]\n```");
        let cleaned = clean_for_display(&map);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.get("SUMMARY"), Some("ok"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn json_blocks_are_stripped() {
        let body = "Intro.\n```json\n{\"a\": 1}\n```\n\n\n\nOutro.";
        assert_eq!(clean_body(body), "Intro.\n\nOutro.");
    }

    #[test]
    fn other_fences_are_kept() {
        let body = "```st\nA := B;\n```";
        assert_eq!(clean_body(body), body);
    }
}
