use serde::{Deserialize, Serialize};

/// One named span of report text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Canonical upper-cased heading.
    pub name: String,
    /// Body text with the heading line removed, trimmed.
    pub body: String,
}

/// Ordered mapping of section name to body.
///
/// Duplicate headings: the last body wins, the position of the first
/// occurrence is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionMap {
    sections: Vec<Section>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns true when an earlier section with the same
    /// name was overwritten.
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) -> bool {
        let name = name.into();
        let body = body.into();
        if let Some(existing) = self.sections.iter_mut().find(|s| s.name == name) {
            existing.body = body;
            return true;
        }
        self.sections.push(Section { name, body });
        false
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.body.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Keep only sections for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Section) -> bool) {
        self.sections.retain(keep);
    }

    /// Rewrite every body in place.
    pub fn map_bodies(&mut self, mut f: impl FnMut(&str) -> String) {
        for s in &mut self.sections {
            s.body = f(&s.body);
        }
    }

    /// Body of the section that plays `kind`'s role, by primary heading
    /// first and then by alias, in alias order.
    pub fn canonical(&self, kind: CanonicalSection) -> Option<&str> {
        kind.headings().iter().find_map(|h| self.get(h))
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}

impl FromIterator<(String, String)> for SectionMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = SectionMap::new();
        for (name, body) in iter {
            map.insert(name, body);
        }
        map
    }
}

/// Core section vocabulary of a PLC security report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalSection {
    ExecutiveSummary,
    CyberSecurityKeyFindings,
    GeneralStructureObservations,
    CodeStructureQualityReview,
    ImplicationsAndRecommendations,
    NextSteps,
}

impl CanonicalSection {
    pub const ALL: [CanonicalSection; 6] = [
        Self::ExecutiveSummary,
        Self::CyberSecurityKeyFindings,
        Self::GeneralStructureObservations,
        Self::CodeStructureQualityReview,
        Self::ImplicationsAndRecommendations,
        Self::NextSteps,
    ];

    /// Primary heading followed by accepted aliases.
    pub fn headings(&self) -> &'static [&'static str] {
        match self {
            Self::ExecutiveSummary => &["EXECUTIVE SUMMARY", "SUMMARY", "OVERVIEW"],
            Self::CyberSecurityKeyFindings => &[
                "CYBER SECURITY KEY FINDINGS",
                "CYBERSECURITY KEY FINDINGS",
                "CYBER SECURITY FINDINGS",
                "KEY FINDINGS",
                "FINDINGS",
            ],
            Self::GeneralStructureObservations => &[
                "GENERAL STRUCTURE OBSERVATIONS",
                "STRUCTURE OBSERVATIONS",
            ],
            Self::CodeStructureQualityReview => &[
                "CODE STRUCTURE & QUALITY REVIEW",
                "CODE STRUCTURE AND QUALITY REVIEW",
                "CODE QUALITY",
            ],
            Self::ImplicationsAndRecommendations => &[
                "IMPLICATIONS AND RECOMMENDATIONS",
                "IMPLICATIONS & RECOMMENDATIONS",
                "KEY RISKS AND RECOMMENDATIONS",
                "RECOMMENDATIONS",
            ],
            Self::NextSteps => &["NEXT STEPS"],
        }
    }

    /// Display title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ExecutiveSummary => "Executive Summary",
            Self::CyberSecurityKeyFindings => "Cyber Security Key Findings",
            Self::GeneralStructureObservations => "General Structure Observations",
            Self::CodeStructureQualityReview => "Code Structure & Quality Review",
            Self::ImplicationsAndRecommendations => "Implications and Recommendations",
            Self::NextSteps => "Next Steps",
        }
    }

    /// Classify a canonical-uppercased heading.
    pub fn from_heading(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.headings().contains(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_heading_last_wins_first_position_kept() {
        let mut map = SectionMap::new();
        assert!(!map.insert("SUMMARY", "first"));
        map.insert("NEXT STEPS", "steps");
        assert!(map.insert("SUMMARY", "second"));
        assert_eq!(map.get("SUMMARY"), Some("second"));
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["SUMMARY", "NEXT STEPS"]);
    }

    #[test]
    fn canonical_prefers_primary_heading() {
        let mut map = SectionMap::new();
        map.insert("SUMMARY", "alias body");
        map.insert("EXECUTIVE SUMMARY", "primary body");
        assert_eq!(
            map.canonical(CanonicalSection::ExecutiveSummary),
            Some("primary body")
        );
    }

    #[test]
    fn canonical_falls_back_to_alias() {
        let mut map = SectionMap::new();
        map.insert("FINDINGS", "f");
        assert_eq!(map.canonical(CanonicalSection::CyberSecurityKeyFindings), Some("f"));
        assert_eq!(map.canonical(CanonicalSection::NextSteps), None);
    }

    #[test]
    fn from_heading_classifies_aliases() {
        assert_eq!(
            CanonicalSection::from_heading("CODE STRUCTURE & QUALITY REVIEW"),
            Some(CanonicalSection::CodeStructureQualityReview)
        );
        assert_eq!(
            CanonicalSection::from_heading("KEY RISKS AND RECOMMENDATIONS"),
            Some(CanonicalSection::ImplicationsAndRecommendations)
        );
        assert_eq!(CanonicalSection::from_heading("LOGIC DIFFERENCES"), None);
    }

    #[test]
    fn serializes_as_ordered_list() {
        let map: SectionMap = vec![("A".to_string(), "1".to_string())].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            serde_json::json!([{"name": "A", "body": "1"}])
        );
    }
}
