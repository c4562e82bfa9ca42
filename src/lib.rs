pub mod config;
pub mod engine_config;
pub mod pipeline;

pub use engine_config::EngineConfig;
pub use pipeline::locator::{locate_report_text, ProviderHint, ReportSource, ReportStatus};
pub use pipeline::report::{
    listing_severity, render_report, ListingSeverity, RenderedReport, ReportRenderer,
    SectionLayout,
};
pub use pipeline::sections::{split_sections, SectionMap};
pub use pipeline::severity::{detect_severity, score_severity, SeverityScore, Verdict};
