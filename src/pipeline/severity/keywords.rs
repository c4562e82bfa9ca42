use std::sync::LazyLock;

use regex::Regex;

use super::types::{SeverityScore, SeverityTier};

/// A compiled pattern and the tier it counts toward.
pub struct SeverityPattern {
    regex: Regex,
    pub tier: SeverityTier,
    pub description: &'static str,
}

impl SeverityPattern {
    /// Non-overlapping matches in `text`.
    pub fn count(&self, text: &str) -> u32 {
        u32::try_from(self.regex.find_iter(text).count()).unwrap_or(u32::MAX)
    }
}

static CRITICAL_PATTERNS: LazyLock<Vec<SeverityPattern>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i)\bcritical\b", SeverityTier::Critical, "critical"),
        pattern(r"(?i)\bsevere\b", SeverityTier::Critical, "severe"),
        pattern(r"(?i)\bimmediate threat\b", SeverityTier::Critical, "immediate threat"),
        pattern(r"(?i)\bsystem compromise\b", SeverityTier::Critical, "system compromise"),
        pattern(r"(?i)\bcatastrophic\b", SeverityTier::Critical, "catastrophic"),
        pattern(r"(?i)\bemergency\b", SeverityTier::Critical, "emergency"),
        pattern(r"(?i)\bexploit\b", SeverityTier::Critical, "exploit"),
        pattern(r"(?i)\battacker\b", SeverityTier::Critical, "attacker"),
        pattern(r"(?i)\bcompromise\b", SeverityTier::Critical, "compromise"),
        pattern(r"(?i)\bbackdoor\b", SeverityTier::Critical, "backdoor"),
    ]
});

static HIGH_PATTERNS: LazyLock<Vec<SeverityPattern>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i)\bhigh\b", SeverityTier::High, "high"),
        pattern(r"(?i)\bsignificant\b", SeverityTier::High, "significant"),
        pattern(r"(?i)\bmajor threat\b", SeverityTier::High, "major threat"),
        pattern(r"(?i)\bvulnerabilit(?:y|ies)\b", SeverityTier::High, "vulnerability"),
        pattern(r"(?i)\bdata tampering\b", SeverityTier::High, "data tampering"),
        pattern(r"(?i)\bunauthorized access\b", SeverityTier::High, "unauthorized access"),
        pattern(r"(?i)\bsecurity breach\b", SeverityTier::High, "security breach"),
        pattern(r"(?i)\bmalicious\b", SeverityTier::High, "malicious"),
        pattern(r"(?i)\bsecurity risk\b", SeverityTier::High, "security risk"),
        pattern(r"(?i)\bsignificant.*risk\b", SeverityTier::High, "significant ... risk"),
        pattern(r"(?i)\bsignificant.*security\b", SeverityTier::High, "significant ... security"),
        pattern(r"(?i)\bpotential.*exploit\b", SeverityTier::High, "potential ... exploit"),
        pattern(r"(?i)\bsuppress.*alarm\b", SeverityTier::High, "suppress ... alarm"),
        pattern(r"(?i)\bhide.*malicious\b", SeverityTier::High, "hide ... malicious"),
    ]
});

static MEDIUM_PATTERNS: LazyLock<Vec<SeverityPattern>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i)\bmedium\b", SeverityTier::Medium, "medium"),
        pattern(r"(?i)\bmoderate\b", SeverityTier::Medium, "moderate"),
        pattern(r"(?i)\bpotential threat\b", SeverityTier::Medium, "potential threat"),
        pattern(r"(?i)\bsuspicious\b", SeverityTier::Medium, "suspicious"),
        pattern(r"(?i)\bwarning\b", SeverityTier::Medium, "warning"),
        pattern(r"(?i)\bconcern\b", SeverityTier::Medium, "concern"),
        pattern(r"(?i)\breview\b", SeverityTier::Medium, "review"),
        pattern(r"(?i)\bmonitoring\b", SeverityTier::Medium, "monitoring"),
    ]
});

static LOW_PATTERNS: LazyLock<Vec<SeverityPattern>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i)\blow\b", SeverityTier::Low, "low"),
        pattern(r"(?i)\bminor\b", SeverityTier::Low, "minor"),
        pattern(r"(?i)\blow risk\b", SeverityTier::Low, "low risk"),
        pattern(r"(?i)\bno significant threat\b", SeverityTier::Low, "no significant threat"),
        pattern(r"(?i)\bminimal impact\b", SeverityTier::Low, "minimal impact"),
    ]
});

fn pattern(regex_str: &str, tier: SeverityTier, description: &'static str) -> SeverityPattern {
    SeverityPattern {
        regex: Regex::new(regex_str).expect("Invalid severity regex pattern"),
        tier,
        description,
    }
}

/// Every tier pattern, critical first.
pub fn all_patterns() -> impl Iterator<Item = &'static SeverityPattern> {
    [&*CRITICAL_PATTERNS, &*HIGH_PATTERNS, &*MEDIUM_PATTERNS, &*LOW_PATTERNS]
        .into_iter()
        .flatten()
}

/// Base counters: each pattern adds its match count to its tier.
pub fn count_keywords(text: &str) -> SeverityScore {
    let mut score = SeverityScore::default();
    for sp in all_patterns() {
        let hits = sp.count(text);
        if hits > 0 {
            score.add(sp.tier, hits);
        }
    }
    score
}
