use std::sync::LazyLock;

use regex::Regex;

use super::{
    fenced_spans, inside_any, normalize_newlines, SectionMap, SectionStrategy, PREAMBLE_SECTION,
};

/// ATX heading (`##` to `######`) or a bold line, optionally numbered:
/// `## Executive Summary`, `**1. EXECUTIVE SUMMARY**`, `**Next Steps:**`.
static MARKDOWN_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(?:#{2,6}[ \t]*([^\n#]+?)[ \t#]*|\*\*[ \t]*(?:\d+\.?[ \t]*)?([A-Za-z0-9 &()\-_/]+?)[ \t]*:?[ \t]*\*\*[ \t]*:?)[ \t]*$",
    )
    .expect("Invalid markdown heading regex")
});

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\s*").expect("Invalid leading number regex"));

/// Name for fenced code blocks that sit outside every detected section.
pub const CODE_BLOCK_SECTION: &str = "CODE BLOCK";

/// Markdown ATX and bold-emphasis headers, the layout local models favour.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownBoldStrategy;

/// A located piece of output, ordered by where it starts in the text.
struct Placed {
    offset: usize,
    name: String,
    body: String,
}

impl SectionStrategy for MarkdownBoldStrategy {
    fn name(&self) -> &'static str {
        "markdown_bold"
    }

    fn split(&self, text: &str) -> Option<SectionMap> {
        let text = normalize_newlines(text);
        let fences = fenced_spans(&text);

        let hits: Vec<(usize, usize, String)> = MARKDOWN_HEADING
            .captures_iter(&text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if inside_any(&fences, whole.start()) {
                    return None;
                }
                let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
                let name = clean_title(raw);
                if name.is_empty() {
                    return None;
                }
                Some((whole.start(), whole.end(), name))
            })
            .collect();

        // Fenced code alone is not structure; the caller shows raw text.
        let first_heading = hits.first()?.0;
        let mut placed: Vec<Placed> = Vec::new();

        for (i, (start, end, name)) in hits.iter().enumerate() {
            let body_end = hits.get(i + 1).map_or(text.len(), |next| next.0);
            placed.push(Placed {
                offset: *start,
                name: name.clone(),
                body: text[*end..body_end].trim().to_string(),
            });
        }

        // Everything before the first heading is outside every section:
        // harvest its code blocks, keep the remaining prose as the preamble.
        let mut preamble = String::new();
        let mut cursor = 0;
        let mut code_blocks = 0usize;
        for span in fences.iter().filter(|r| r.end <= first_heading) {
            preamble.push_str(&text[cursor..span.start]);
            cursor = span.end;
            code_blocks += 1;
            let name = if code_blocks == 1 {
                CODE_BLOCK_SECTION.to_string()
            } else {
                format!("{CODE_BLOCK_SECTION} {code_blocks}")
            };
            placed.push(Placed {
                offset: span.start,
                name,
                body: text[span.clone()].to_string(),
            });
        }
        preamble.push_str(&text[cursor.min(first_heading)..first_heading]);
        let preamble = preamble.trim();
        if !preamble.is_empty() {
            placed.push(Placed {
                offset: 0,
                name: PREAMBLE_SECTION.to_string(),
                body: preamble.to_string(),
            });
        }

        placed.sort_by_key(|p| p.offset);
        let mut map = SectionMap::new();
        for p in placed {
            if map.insert(p.name.clone(), p.body) {
                tracing::debug!(strategy = self.name(), section = %p.name, "duplicate_section: later body replaces earlier");
            }
        }

        Some(map)
    }
}

/// Strip emphasis, numbering and trailing colons; upper-case.
fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('*').trim();
    let unnumbered = LEADING_NUMBER.replace(trimmed, "");
    unnumbered
        .trim()
        .trim_end_matches(':')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_headers_without_leakage() {
        let text = "## Executive Summary\nText1\n## Cyber Security Key Findings\nText2";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        assert_eq!(map.get("EXECUTIVE SUMMARY"), Some("Text1"));
        assert_eq!(map.get("CYBER SECURITY KEY FINDINGS"), Some("Text2"));
        for s in map.iter() {
            assert!(!s.body.contains("##"));
        }
    }

    #[test]
    fn bold_numbered_headers() {
        let text = "**1. EXECUTIVE SUMMARY**\nAll good.\n**2. NEXT STEPS**\n- Patch";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        assert_eq!(map.get("EXECUTIVE SUMMARY"), Some("All good."));
        assert_eq!(map.get("NEXT STEPS"), Some("- Patch"));
    }

    #[test]
    fn bold_label_with_value_is_not_heading() {
        let text = "## Findings\n**Risk Level**: High\nmore";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.get("FINDINGS").unwrap().contains("**Risk Level**: High"));
    }

    #[test]
    fn ampersand_and_parentheses_survive() {
        let text = "### Code Structure & Quality Review\nok\n#### INSTRUCTION-LEVEL ANALYSIS (REQUIRED)\n[]";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        assert!(map.contains("CODE STRUCTURE & QUALITY REVIEW"));
        assert!(map.contains("INSTRUCTION-LEVEL ANALYSIS (REQUIRED)"));
    }

    #[test]
    fn empty_sections_are_kept() {
        let text = "## Summary\n\n## Next Steps\nDo X.";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        assert_eq!(map.get("SUMMARY"), Some(""));
        assert_eq!(map.get("NEXT STEPS"), Some("Do X."));
    }

    #[test]
    fn leading_code_block_is_harvested_in_order() {
        let text = "```st\nA := B;\n```\n## Summary\nBody";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec![CODE_BLOCK_SECTION, "SUMMARY"]);
        assert!(map.get(CODE_BLOCK_SECTION).unwrap().starts_with("```st"));
    }

    #[test]
    fn code_block_inside_section_stays_in_body() {
        let text = "## Summary\nBody\n```\n## not a heading\n```";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.get("SUMMARY").unwrap().contains("## not a heading"));
    }

    #[test]
    fn several_loose_code_blocks_are_numbered() {
        let text = "```\na\n```\n```\nb\n```\n## Summary\nBody";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        assert_eq!(map.get(CODE_BLOCK_SECTION), Some("```\na\n```"));
        assert_eq!(map.get("CODE BLOCK 2"), Some("```\nb\n```"));
    }

    #[test]
    fn code_without_headings_is_none() {
        let text = "The PLC program OB35 was analysed in full.\n```st\nA := B;\n```\nNo further security issues were found.";
        assert!(MarkdownBoldStrategy.split(text).is_none());
        assert!(MarkdownBoldStrategy.split("```\na\n```").is_none());
    }

    #[test]
    fn prose_between_leading_code_blocks_is_preamble() {
        let text = "Intro.\n```\na\n```\nMiddle.\n## Summary\nBody";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        assert_eq!(map.get(PREAMBLE_SECTION), Some("Intro.\n\nMiddle."));
        assert_eq!(map.names().collect::<Vec<_>>(), vec![PREAMBLE_SECTION, CODE_BLOCK_SECTION, "SUMMARY"]);
    }

    #[test]
    fn single_hash_is_not_a_heading() {
        assert!(MarkdownBoldStrategy.split("# Title\nbody").is_none());
    }

    #[test]
    fn preamble_before_first_heading() {
        let text = "Here is my analysis.\n## Summary\nBody";
        let map = MarkdownBoldStrategy.split(text).unwrap();
        assert_eq!(map.get(PREAMBLE_SECTION), Some("Here is my analysis."));
    }
}
