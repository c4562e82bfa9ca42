use std::sync::LazyLock;

use regex::Regex;

use super::types::LabelValueItem;

/// `- **Label**: value` or `**Label:** value`.
static LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-*][ \t]+)?\*\*[ \t]*([^*\n]+?)[ \t]*:?[ \t]*\*\*[ \t]*:?[ \t]*(.*)$")
        .expect("Invalid label line regex")
});

/// Bullet or numbered list item.
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-*+\x{2022}]|\d+[.)])[ \t]+(.+)$").expect("Invalid list item regex")
});

/// Label/value bullets of a prose section. Blank lines and `---` rules
/// between groups become `Break` items. `None` when no bullet has a label.
pub fn extract_label_values(section: &str) -> Option<Vec<LabelValueItem>> {
    let mut items: Vec<LabelValueItem> = Vec::new();

    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_rule(trimmed) {
            if matches!(items.last(), Some(LabelValueItem::Entry { .. })) {
                items.push(LabelValueItem::Break);
            }
            continue;
        }

        if let Some(caps) = LABEL_LINE.captures(line) {
            items.push(LabelValueItem::Entry {
                label: caps[1].trim().to_string(),
                value: caps[2].trim().to_string(),
            });
            continue;
        }

        if let Some(LabelValueItem::Entry { value, .. }) = items.last_mut() {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(strip_bullet(trimmed));
        }
    }

    while matches!(items.last(), Some(LabelValueItem::Break)) {
        items.pop();
    }

    if items.iter().any(|i| matches!(i, LabelValueItem::Entry { .. })) {
        Some(items)
    } else {
        None
    }
}

/// Ordered action items of a NEXT STEPS body, list markers removed.
/// Indented or wrapped lines continue the previous item. `None` when the
/// body has no list item.
pub fn extract_next_steps(section: &str) -> Option<Vec<String>> {
    let mut steps: Vec<String> = Vec::new();
    let mut open = false;

    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            open = false;
            continue;
        }
        if let Some(caps) = LIST_ITEM.captures(line) {
            steps.push(caps[1].trim().to_string());
            open = true;
        } else if open {
            if let Some(last) = steps.last_mut() {
                last.push(' ');
                last.push_str(trimmed);
            }
        }
    }

    if steps.is_empty() {
        None
    } else {
        Some(steps)
    }
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(['-', '*']).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, value: &str) -> LabelValueItem {
        LabelValueItem::Entry {
            label: label.into(),
            value: value.into(),
        }
    }

    #[test]
    fn label_values_with_groups() {
        let body = "- **Program Type**: Ladder logic\n- **Blocks**: OB1, FB10\n  and FC3\n\n---\n- **Tags**: 42";
        let items = extract_label_values(body).unwrap();
        assert_eq!(
            items,
            vec![
                entry("Program Type", "Ladder logic"),
                entry("Blocks", "OB1, FB10 and FC3"),
                LabelValueItem::Break,
                entry("Tags", "42"),
            ]
        );
    }

    #[test]
    fn bold_colon_inside() {
        let items = extract_label_values("**Scan time:** 10 ms").unwrap();
        assert_eq!(items, vec![entry("Scan time", "10 ms")]);
    }

    #[test]
    fn plain_prose_is_none() {
        assert!(extract_label_values("The program is well structured.\n\nNo issues.").is_none());
    }

    #[test]
    fn trailing_breaks_removed() {
        let items = extract_label_values("- **A**: 1\n\n\n---\n").unwrap();
        assert_eq!(items, vec![entry("A", "1")]);
    }

    #[test]
    fn next_steps_markers_stripped() {
        let body = "Recommended:\n1. Review OB35 timer logic\n2) Restrict HMI writes\n   to operators only\n- Update firmware";
        let steps = extract_next_steps(body).unwrap();
        assert_eq!(
            steps,
            vec![
                "Review OB35 timer logic",
                "Restrict HMI writes to operators only",
                "Update firmware",
            ]
        );
    }

    #[test]
    fn next_steps_without_list_is_none() {
        assert!(extract_next_steps("Nothing further is required.").is_none());
    }
}
