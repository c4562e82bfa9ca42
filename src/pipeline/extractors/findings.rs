use std::sync::LazyLock;

use regex::Regex;

use super::types::{Finding, RiskLevel};

/// Start of a finding block: `- **Title**:` (bullet `-` or `*`).
static TITLE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*[-*][ \t]+\*\*[ \t]*Title[ \t]*:?[ \t]*\*\*[ \t]*:?")
        .expect("Invalid finding title regex")
});

/// `- **Label**: value` inside a block.
static FIELD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-*][ \t]+)?\*\*[ \t]*([^*\n]+?)[ \t]*:?[ \t]*\*\*[ \t]*:?[ \t]*(.*)$")
        .expect("Invalid finding field regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Location,
    Breakdown,
    RiskLevel,
    Impact,
    Mitigation,
}

impl Field {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "location" => Some(Self::Location),
            "breakdown" | "description" => Some(Self::Breakdown),
            "risk level" | "risk" | "risk_level" | "severity" => Some(Self::RiskLevel),
            "impact" => Some(Self::Impact),
            "mitigation" | "recommendation" => Some(Self::Mitigation),
            _ => None,
        }
    }
}

/// Split a findings section into `Finding`s.
///
/// Blocks start at each `- **Title**:` bullet; text before the first one is
/// discarded. `None` when the section has no such bullet, so the caller can
/// show the section as prose.
pub fn extract_findings(section: &str) -> Option<Vec<Finding>> {
    let starts: Vec<usize> = TITLE_MARKER.find_iter(section).map(|m| m.start()).collect();
    if starts.is_empty() {
        return None;
    }

    let findings: Vec<Finding> = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(section.len());
            parse_block(section[start..end].trim())
        })
        .collect();

    tracing::debug!(
        findings = findings.len(),
        elevated = findings.iter().filter(|f| f.is_elevated).count(),
        "Findings extracted"
    );
    Some(findings)
}

fn parse_block(block: &str) -> Finding {
    let mut finding = Finding {
        raw: block.to_string(),
        ..Finding::default()
    };
    let mut current: Option<Field> = None;

    for line in block.lines() {
        if let Some(caps) = FIELD_LINE.captures(line) {
            current = Field::from_label(&caps[1]);
            if let Some(field) = current {
                *slot(&mut finding, field) = Some(caps[2].trim().to_string());
            }
            continue;
        }
        let extra = line.trim();
        if extra.is_empty() {
            continue;
        }
        // Continuation of the previous field.
        if let Some(field) = current {
            let value = slot(&mut finding, field).get_or_insert_with(String::new);
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(extra);
        }
    }

    finding.is_elevated = finding
        .risk_level
        .as_deref()
        .and_then(first_word)
        .and_then(RiskLevel::parse)
        .is_some_and(|r| r.is_elevated());
    finding
}

fn slot(finding: &mut Finding, field: Field) -> &mut Option<String> {
    match field {
        Field::Title => &mut finding.title,
        Field::Location => &mut finding.location,
        Field::Breakdown => &mut finding.breakdown,
        Field::RiskLevel => &mut finding.risk_level,
        Field::Impact => &mut finding.impact,
        Field::Mitigation => &mut finding.mitigation,
    }
}

fn first_word(text: &str) -> Option<&str> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .find(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION: &str = "Two findings follow.\n\
        - **Title**: Hidden timer bypass\n\
        - **Location**: OB35, network 4\n\
        - **Breakdown**: A timer resets the\n  safety interlock every cycle.\n\
        - **Risk Level**: High\n\
        - **Impact**: Interlock never trips.\n\
        - **Mitigation**: Remove the timer.\n\
        \n\
        - **Title**: Unused tag\n\
        - **Risk Level**: Low\n";

    #[test]
    fn splits_blocks_and_fields() {
        let findings = extract_findings(SECTION).unwrap();
        assert_eq!(findings.len(), 2);
        let first = &findings[0];
        assert_eq!(first.title.as_deref(), Some("Hidden timer bypass"));
        assert_eq!(first.location.as_deref(), Some("OB35, network 4"));
        assert_eq!(
            first.breakdown.as_deref(),
            Some("A timer resets the safety interlock every cycle.")
        );
        assert_eq!(first.mitigation.as_deref(), Some("Remove the timer."));
        assert!(first.is_elevated);
        assert!(!findings[1].is_elevated);
        assert_eq!(findings[1].location, None);
    }

    #[test]
    fn preamble_is_discarded() {
        let findings = extract_findings(SECTION).unwrap();
        assert!(!findings[0].raw.contains("Two findings follow"));
    }

    #[test]
    fn no_title_marker_is_none() {
        assert!(extract_findings("Everything looks fine.\n- minor naming issues").is_none());
        assert!(extract_findings("").is_none());
    }

    #[test]
    fn critical_with_explanation_is_elevated() {
        let f = extract_findings("- **Title**: X\n- **Risk Level**: Critical (remote write)").unwrap();
        assert!(f[0].is_elevated);
    }

    #[test]
    fn medium_is_not_elevated() {
        let f = extract_findings("* **Title:** X\n* **Risk Level:** Medium").unwrap();
        assert_eq!(f[0].risk_level.as_deref(), Some("Medium"));
        assert!(!f[0].is_elevated);
    }

    #[test]
    fn unknown_labels_do_not_swallow_continuations() {
        let f = extract_findings("- **Title**: X\n- **Owner**: ops\n  extra line").unwrap();
        assert_eq!(f[0].title.as_deref(), Some("X"));
    }
}
