use std::sync::LazyLock;

use regex::Regex;

use super::keywords::count_keywords;
use super::types::{SeverityScore, SeverityTier, Verdict};

static RISK_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\brisk\b").expect("Invalid risk word regex"));

static SECURITY_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsecurity\b").expect("Invalid security word regex"));

static GENERIC_VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)security|risk|threat|vulnerab|attack").expect("Invalid generic vocabulary regex")
});

/// Verbs that, anywhere alongside "risk", mark a stated risk.
const RISK_VERBS: &[&str] = &["introduces", "poses"];

/// Structured risk-analysis headings.
const RISK_SECTION_PHRASES: &[&str] = &["security and risk analysis", "key risks"];

/// Risk mentions needed for the co-occurrence boost.
const RISK_MENTIONS_STRONG: usize = 3;
const SECURITY_MENTIONS_STRONG: usize = 2;
const RISK_MENTIONS_WEAK: usize = 2;

/// Overall verdict for a report text. Deterministic, no I/O.
pub fn detect_severity(text: &str) -> Verdict {
    score_severity(text).verdict()
}

/// Keyword counters plus contextual boosts.
pub fn score_severity(text: &str) -> SeverityScore {
    if text.trim().is_empty() {
        return SeverityScore::default();
    }

    let mut score = count_keywords(text);
    let lower = text.to_lowercase();

    if RISK_SECTION_PHRASES.iter().any(|p| lower.contains(p)) {
        score.add(SeverityTier::High, 2);
    }

    let risk_mentions = RISK_WORD.find_iter(text).count();
    let security_mentions = SECURITY_WORD.find_iter(text).count();
    if risk_mentions >= RISK_MENTIONS_STRONG && security_mentions >= SECURITY_MENTIONS_STRONG {
        score.add(SeverityTier::High, 2);
    } else if risk_mentions >= RISK_MENTIONS_WEAK {
        score.add(SeverityTier::Medium, 1);
    }

    if lower.contains("risk") {
        let verbs = RISK_VERBS.iter().filter(|v| lower.contains(**v)).count();
        score.add(SeverityTier::High, u32::try_from(verbs).unwrap_or(u32::MAX));
    }
    if lower.contains("exploited") || lower.contains("exploitation") {
        score.add(SeverityTier::Critical, 1);
    }
    if lower.contains("recommendations") || lower.contains("mitigate") {
        score.add(SeverityTier::High, 1);
    }

    if score.is_zero() && GENERIC_VOCABULARY.is_match(text) {
        score.add(SeverityTier::Medium, 1);
    }

    tracing::debug!(
        critical = score.critical,
        high = score.high,
        medium = score.medium,
        low = score.low,
        risk_mentions,
        security_mentions,
        "Severity scored"
    );
    score
}
