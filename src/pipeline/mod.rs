pub mod locator;
pub mod sections;
pub mod extractors; // Findings, risk table, instruction records, label/value lists
pub mod severity;
pub mod report; // Render orchestrator: decode → locate → split → extract → classify
