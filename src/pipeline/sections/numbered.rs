use std::sync::LazyLock;

use regex::Regex;

use super::{assemble, fenced_spans, inside_any, normalize_newlines, HeadingHit, SectionMap, SectionStrategy};

/// `1. EXECUTIVE SUMMARY` on a line of its own; title is upper-case words,
/// spaces, hyphens and ampersands.
static NUMBERED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\d+\.[ \t]+([A-Z][A-Z &\-]*)[ \t]*$")
        .expect("Invalid numbered heading regex")
});

/// Plain numbered headers, the layout hosted models use most often.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedStrategy;

impl SectionStrategy for NumberedStrategy {
    fn name(&self) -> &'static str {
        "numbered"
    }

    fn split(&self, text: &str) -> Option<SectionMap> {
        let text = normalize_newlines(text);
        let fences = fenced_spans(&text);

        let hits: Vec<HeadingHit> = NUMBERED_HEADING
            .captures_iter(&text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if inside_any(&fences, whole.start()) {
                    return None;
                }
                let name = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_round_trip() {
        let text = "1. EXECUTIVE SUMMARY\nFoo bar.\n\n2. NEXT STEPS\nDo X.";
        let map = NumberedStrategy.split(text).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("EXECUTIVE SUMMARY"), Some("Foo bar."));
        assert_eq!(map.get("NEXT STEPS"), Some("Do X."));
    }

    #[test]
    fn ampersand_heading_is_recognized() {
        let text = "3. CODE STRUCTURE & QUALITY REVIEW\nWell organised.";
        let map = NumberedStrategy.split(text).unwrap();
        assert_eq!(map.get("CODE STRUCTURE & QUALITY REVIEW"), Some("Well organised."));
    }

    #[test]
    fn mixed_case_list_items_are_not_headings() {
        let text = "1. EXECUTIVE SUMMARY\n1. Review the alarm logic\n2. Restrict access";
        let map = NumberedStrategy.split(text).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.get("EXECUTIVE SUMMARY").unwrap().contains("Restrict access"));
    }

    #[test]
    fn empty_body_is_kept() {
        let text = "1. SUMMARY\n2. NEXT STEPS\nDo X.";
        let map = NumberedStrategy.split(text).unwrap();
        assert_eq!(map.get("SUMMARY"), Some(""));
    }

    #[test]
    fn crlf_input() {
        let text = "1. EXECUTIVE SUMMARY\r\nFoo.\r\n2. NEXT STEPS\r\nBar.";
        let map = NumberedStrategy.split(text).unwrap();
        assert_eq!(map.get("EXECUTIVE SUMMARY"), Some("Foo."));
    }

    #[test]
    fn no_headings_is_none() {
        assert!(NumberedStrategy.split("Just a paragraph.").is_none());
        assert!(NumberedStrategy.split("").is_none());
    }

    #[test]
    fn headings_inside_code_fence_are_ignored() {
        let text = "1. SUMMARY\nok\n```\n2. NOT A HEADING\n```\n3. NEXT STEPS\ngo";
        let map = NumberedStrategy.split(text).unwrap();
        assert!(!map.contains("NOT A HEADING"));
        assert_eq!(map.get("NEXT STEPS"), Some("go"));
    }
}
