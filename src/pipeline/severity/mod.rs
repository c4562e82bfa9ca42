//! Severity Classifier.
//!
//! Scores raw report text into a single verdict with weighted keyword
//! patterns and contextual boosts. Independent of the section splitter:
//! list views call it on stored reports without rendering them.

pub mod types;
pub mod keywords;
pub mod classifier;
pub mod badge;
pub mod distribution;

pub use types::*;
pub use keywords::*;
pub use classifier::*;
pub use badge::*;
pub use distribution::*;
