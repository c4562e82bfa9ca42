pub mod types;
pub mod envelope;
pub mod locate;

pub use types::*;
pub use envelope::*;
pub use locate::*;

use thiserror::Error;

/// Locator failures. `locate_report` and friends turn these into "keep
/// searching" or `None`; only the low-level helpers return them.
#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Embedded JSON could not be decoded: {0}")]
    InvalidJson(String),

    #[error("Embedded JSON decoded to a non-object value")]
    NotAnObject,

    #[error("Candidate rejected: {0}")]
    Rejected(RejectReason),
}
