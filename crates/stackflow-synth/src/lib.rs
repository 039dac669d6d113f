//! Stackflow template synthesis
//!
//! Turns a declared [`stackflow_core::App`] into one deployment template per
//! stack. Synthesis is a pure function of the topology: the same app always
//! produces byte-identical output (sorted maps, no timestamps).
//!
//! The synthesizer also owns wiring validation, since without the original
//! provisioning SDK nothing else checks it: artifact producer/consumer
//! ordering inside pipelines, by-name references between resources, and the
//! one-alias-per-deployment-group rule.

pub mod error;
pub mod synthesizer;
pub mod template;

mod wiring;

// Re-exports
pub use error::{Result, SynthError};
pub use synthesizer::{Assembly, synthesize};
pub use template::{Template, TemplateOutput, TemplateResource, logical_id};
