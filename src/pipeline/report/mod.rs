pub mod types;
pub mod orchestrator;


pub use types::*;
pub use orchestrator::*;
