//! Synthesis error types

use thiserror::Error;

/// Errors raised while validating or synthesizing a topology
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Duplicate logical id in stack '{stack}': {logical_id}")]
    DuplicateLogicalId { stack: String, logical_id: String },

    #[error("Unresolved {kind} reference in stack '{stack}': {name}")]
    UnresolvedReference {
        stack: String,
        kind: &'static str,
        name: String,
    },

    #[error("Artifact '{artifact}' consumed by action '{action}' in pipeline '{pipeline}' is never produced")]
    ArtifactNeverProduced {
        pipeline: String,
        artifact: String,
        action: String,
    },

    #[error("Artifact '{artifact}' in pipeline '{pipeline}' has more than one producer")]
    ArtifactProducedTwice { pipeline: String, artifact: String },

    #[error("Artifact '{artifact}' consumed in stage '{stage}' of pipeline '{pipeline}' is not produced by an earlier stage")]
    ArtifactNotFromEarlierStage {
        pipeline: String,
        artifact: String,
        stage: String,
    },

    #[error("Deployment group '{group}' and '{other}' both bind alias '{alias}'")]
    AliasBoundTwice {
        group: String,
        other: String,
        alias: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SynthError>;
