//! Session state modules.

mod processing;

pub use processing::ProcessingState;
