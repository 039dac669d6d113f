//! Topology declaration error types

use thiserror::Error;

/// Errors raised while declaring a topology
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Duplicate stack: {0}")]
    DuplicateStack(String),

    #[error("Duplicate resource in stack '{stack}': {kind} '{name}'")]
    DuplicateResource {
        stack: String,
        kind: &'static str,
        name: String,
    },

    #[error("Duplicate stage in pipeline '{pipeline}': {stage}")]
    DuplicateStage { pipeline: String, stage: String },

    #[error("Stage '{stage}' in pipeline '{pipeline}' has no actions")]
    EmptyStage { pipeline: String, stage: String },

    #[error("Pipeline not found: {0}")]
    PipelineNotFound(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
