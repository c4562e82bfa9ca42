//! Engine configuration.
//!
//! Bounds and thresholds shared by every stage of the report pipeline: the
//! input size guard, the rejection-filter length, the heuristic-scan minimum
//! and how many JSON-in-string layers the locator is willing to peel.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Tunables for one engine instance. Every field has a default, so hosts can
/// deserialize a partial document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Report texts above this size (bytes) skip section splitting and
    /// sub-extraction and are shown as one unlabeled block.
    pub max_input_bytes: usize,
    /// Candidates shorter than this (characters, trimmed) are never accepted
    /// as report text.
    pub min_report_chars: usize,
    /// Heuristic scan only considers string fields longer than this.
    pub heuristic_min_chars: usize,
    /// Maximum JSON decode passes applied to a string envelope or a string
    /// `analysis_json` field.
    pub max_json_decode_depth: usize,
}

pub const DEFAULT_MAX_INPUT_BYTES: usize = 512 * 1024;
pub const DEFAULT_MIN_REPORT_CHARS: usize = 20;
pub const DEFAULT_HEURISTIC_MIN_CHARS: usize = 50;
pub const DEFAULT_MAX_JSON_DECODE_DEPTH: usize = 2;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            min_report_chars: DEFAULT_MIN_REPORT_CHARS,
            heuristic_min_chars: DEFAULT_HEURISTIC_MIN_CHARS,
            max_json_decode_depth: DEFAULT_MAX_JSON_DECODE_DEPTH,
        }
    }
}

impl EngineConfig {
    /// True when `text` exceeds the size guard.
    pub fn is_oversized(&self, text: &str) -> bool {
        text.len() > self.max_input_bytes
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_input_bytes, 512 * 1024);
        assert_eq!(cfg.min_report_chars, 20);
        assert_eq!(cfg.heuristic_min_chars, 50);
        assert_eq!(cfg.max_json_decode_depth, 2);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"max_input_bytes": 1024}"#).unwrap();
        assert_eq!(cfg.max_input_bytes, 1024);
        assert_eq!(cfg.min_report_chars, DEFAULT_MIN_REPORT_CHARS);
        assert_eq!(cfg.max_json_decode_depth, DEFAULT_MAX_JSON_DECODE_DEPTH);
    }

    #[test]
    fn oversized_uses_byte_length() {
        let cfg = EngineConfig {
            max_input_bytes: 4,
            ..Default::default()
        };
        assert!(!cfg.is_oversized("abcd"));
        assert!(cfg.is_oversized("abcde"));
    }
}
