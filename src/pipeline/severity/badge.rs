use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::pipeline::extractors::{records_from_values, RiskLevel, INSTRUCTION_FIELD};
use crate::pipeline::locator::Envelope;

/// `Risk Level: Medium`, `**Risk Level**: Low`, `risk_level": "High"`.
static RISK_LEVEL_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)risk[_ ]?level[":*\- ]+([a-z]+)"#).expect("Invalid risk level mention regex")
});

const VULNERABILITIES_FIELD: &str = "vulnerabilities";

/// Highest risk level a stored analysis mentions, for list badges.
///
/// Sources in order, first one that yields a level wins: instruction
/// records in the envelope, the `vulnerabilities` list, then
/// `risk level: X` mentions in the report text. `None` renders as "None".
pub fn highest_severity(envelope: &Envelope, report_text: Option<&str>) -> Option<RiskLevel> {
    instruction_level(envelope)
        .or_else(|| vulnerability_level(listed_vulnerabilities(envelope)?))
        .or_else(|| report_text.and_then(mentioned_level))
}

/// Banner level when the analysis lists critical or high vulnerabilities.
/// Reads `report.category.vulnerabilities`, then `vulnerabilities`, from
/// the container object.
pub fn vulnerability_banner(envelope: &Envelope) -> Option<RiskLevel> {
    let nested = envelope.nested_object()?;
    let from_report = nested
        .get("report")
        .and_then(|r| r.get("category"))
        .and_then(|c| c.get(VULNERABILITIES_FIELD))
        .and_then(Value::as_array);
    let list = from_report.or_else(|| nested.get(VULNERABILITIES_FIELD).and_then(Value::as_array))?;

    let level = [RiskLevel::Critical, RiskLevel::High]
        .into_iter()
        .find(|level| list.iter().any(|v| mentions(v, *level)))?;
    tracing::debug!(level = %level, "Vulnerability banner raised");
    Some(level)
}

fn instruction_level(envelope: &Envelope) -> Option<RiskLevel> {
    let items = envelope.lookup(INSTRUCTION_FIELD)?.as_array()?;
    let records = records_from_values(items);
    RiskLevel::ALL.into_iter().find(|level| {
        records
            .iter()
            .any(|r| r.risk_level.as_risk_level() == Some(*level))
    })
}

fn listed_vulnerabilities(envelope: &Envelope) -> Option<&[Value]> {
    envelope
        .lookup(VULNERABILITIES_FIELD)?
        .as_array()
        .map(Vec::as_slice)
}

fn vulnerability_level(list: &[Value]) -> Option<RiskLevel> {
    RiskLevel::ALL
        .into_iter()
        .find(|level| list.iter().any(|v| mentions(v, *level)))
}

/// Case-insensitive substring test on a string item or a serialized object.
fn mentions(value: &Value, level: RiskLevel) -> bool {
    let text = match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    };
    text.contains(&level.label().to_lowercase())
}

fn mentioned_level(text: &str) -> Option<RiskLevel> {
    let found: Vec<RiskLevel> = RISK_LEVEL_MENTION
        .captures_iter(text)
        .filter_map(|caps| RiskLevel::parse(&caps[1]))
        .collect();
    RiskLevel::ALL.into_iter().find(|level| found.contains(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(v: Value) -> Envelope {
        Envelope::decode(&v, 2)
    }

    #[test]
    fn instruction_records_take_precedence() {
        let e = env(json!({
            "analysis_json": {
                "instruction_analysis": [
                    {"instruction": "A", "risk_level": "low"},
                    {"instruction": "B", "risk_level": "Medium"}
                ],
                "vulnerabilities": ["critical: remote stop"]
            }
        }));
        assert_eq!(highest_severity(&e, None), Some(RiskLevel::Medium));
    }

    #[test]
    fn vulnerabilities_as_strings_or_objects() {
        let e = env(json!({"analysis_json": {"vulnerabilities": [{"severity": "High", "id": 1}]}}));
        assert_eq!(highest_severity(&e, None), Some(RiskLevel::High));
    }

    #[test]
    fn text_mentions_are_last_resort() {
        let e = env(json!({}));
        let text = "- **Risk Level**: Low\n- risk_level\": \"Critical\"";
        assert_eq!(highest_severity(&e, Some(text)), Some(RiskLevel::Critical));
        assert_eq!(highest_severity(&e, Some("Risk Level: Medium")), Some(RiskLevel::Medium));
    }

    #[test]
    fn nothing_found_is_none() {
        assert_eq!(highest_severity(&env(json!({})), Some("No levels here.")), None);
    }

    #[test]
    fn banner_from_report_category() {
        let e = env(json!({
            "analysis_json": {"report": {"category": {"vulnerabilities": ["High: weak password"]}}}
        }));
        assert_eq!(vulnerability_banner(&e), Some(RiskLevel::High));
    }

    #[test]
    fn banner_prefers_critical() {
        let e = env(json!({
            "analysis_json": {"vulnerabilities": ["high risk", {"severity": "CRITICAL"}]}
        }));
        assert_eq!(vulnerability_banner(&e), Some(RiskLevel::Critical));
    }

    #[test]
    fn no_banner_for_medium_only() {
        let e = env(json!({"analysis_json": {"vulnerabilities": ["medium"]}}));
        assert_eq!(vulnerability_banner(&e), None);
        assert_eq!(vulnerability_banner(&env(json!({}))), None);
    }
}
