use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::extractors::{records_from_values, InstructionRecord, INSTRUCTION_FIELD};
use crate::pipeline::locator::Envelope;

/// Severity counts across many analyses, for dashboard summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityDistribution {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub info: u32,
}

impl SeverityDistribution {
    /// Count instruction records by their written risk label.
    pub fn from_records(records: &[InstructionRecord]) -> Self {
        let mut dist = Self::default();
        for r in records {
            dist.record_label(&r.risk_label);
        }
        dist
    }

    /// Count one stored analysis: `vulnerabilities[*].severity` plus the
    /// risk level of every instruction record.
    pub fn from_envelope(envelope: &Envelope) -> Self {
        let mut dist = Self::default();

        if let Some(vulns) = envelope.lookup("vulnerabilities").and_then(Value::as_array) {
            for severity in vulns.iter().filter_map(|v| v.get("severity")?.as_str()) {
                dist.record_label(severity);
            }
        }

        if let Some(items) = envelope.lookup(INSTRUCTION_FIELD).and_then(Value::as_array) {
            dist.accumulate(&Self::from_records(&records_from_values(items)));
        }
        dist
    }

    /// Add one label; unrecognized labels are ignored.
    pub fn record_label(&mut self, label: &str) {
        let slot = match label.trim().to_ascii_lowercase().as_str() {
            "critical" => &mut self.critical,
            "high" => &mut self.high,
            "medium" => &mut self.medium,
            "low" => &mut self.low,
            "info" => &mut self.info,
            _ => return,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn accumulate(&mut self, other: &Self) {
        self.critical = self.critical.saturating_add(other.critical);
        self.high = self.high.saturating_add(other.high);
        self.medium = self.medium.saturating_add(other.medium);
        self.low = self.low.saturating_add(other.low);
        self.info = self.info.saturating_add(other.info);
    }

    /// Findings with an actual risk level (info excluded).
    pub fn vulnerabilities_found(&self) -> u32 {
        self.critical
            .saturating_add(self.high)
            .saturating_add(self.medium)
            .saturating_add(self.low)
    }
}

impl<'a> FromIterator<&'a Envelope> for SeverityDistribution {
    fn from_iter<I: IntoIterator<Item = &'a Envelope>>(iter: I) -> Self {
        let mut total = Self::default();
        for envelope in iter {
            total.accumulate(&Self::from_envelope(envelope));
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_vulnerabilities_and_instructions() {
        let env = Envelope::decode(
            &json!({
                "analysis_json": {
                    "vulnerabilities": [{"severity": "High"}, {"severity": "info"}, "untyped"],
                    "instruction_analysis": [
                        {"instruction": "A", "risk_level": "low"},
                        {"instruction": "B", "riskLevel": "CRITICAL"},
                        {"instruction": "C", "risk_level": "Info"}
                    ]
                }
            }),
            2,
        );
        let dist = SeverityDistribution::from_envelope(&env);
        assert_eq!(
            dist,
            SeverityDistribution { critical: 1, high: 1, medium: 0, low: 1, info: 2 }
        );
        assert_eq!(dist.vulnerabilities_found(), 3);
    }

    #[test]
    fn accumulates_across_reports() {
        let a = Envelope::decode(&json!({"vulnerabilities": [{"severity": "medium"}]}), 2);
        let b = Envelope::decode(&json!({"vulnerabilities": [{"severity": "Medium"}]}), 2);
        let total: SeverityDistribution = [&a, &b].into_iter().collect();
        assert_eq!(total.medium, 2);
    }

    #[test]
    fn unknown_labels_ignored() {
        let mut dist = SeverityDistribution::default();
        dist.record_label("severe");
        assert_eq!(dist, SeverityDistribution::default());
    }
}
