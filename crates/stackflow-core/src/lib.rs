//! Stackflow deployment topology model
//!
//! This crate defines the configuration records that make up a deployment
//! topology: an [`App`] holds named [`Stack`]s, and each stack holds an
//! ordered list of resource declarations (network, function, pipeline,
//! repository, build and deploy records).
//!
//! Records are built once during a single synchronous declaration pass and
//! never mutated afterwards. Turning a finished topology into deployment
//! templates is the job of the `stackflow-synth` crate.

pub mod app;
pub mod error;
pub mod model;

// Re-exports
pub use app::{App, Resource, Stack};
pub use error::{CoreError, Result};
pub use model::{
    Artifact, BuildPhase, BuildProject, BuildSpec, CommitTrigger, DeploymentApplication,
    DeploymentGroup, FunctionAlias, FunctionCode, FunctionDefinition, FunctionVersion,
    NetworkHandle, Pipeline, PipelineAction, PipelineStage, Runtime, SourceRepository, Vpc,
};
