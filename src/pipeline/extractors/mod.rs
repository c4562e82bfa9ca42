pub mod types;
pub mod findings;
pub mod table;
pub mod instructions;
pub mod relaxed_json;
pub mod labels;

pub use types::*;
pub use findings::*;
pub use table::*;
pub use instructions::*;
pub use relaxed_json::*;
pub use labels::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Expected a JSON array")]
    NotAnArray,

    #[error("Relaxed JSON rejected at byte {offset}: {reason}")]
    RelaxedJson { offset: usize, reason: String },
}
