//! Resource record definitions
//!
//! Each record is a plain serde struct describing one declared resource.
//! Records carry no behavior beyond constructors and accessors; wiring
//! validation lives in the synthesizer.

mod build;
mod deploy;
mod function;
mod network;
mod pipeline;
mod repository;

// Re-exports
pub use build::*;
pub use deploy::*;
pub use function::*;
pub use network::*;
pub use pipeline::*;
pub use repository::*;
