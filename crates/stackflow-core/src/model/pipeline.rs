//! Pipeline, stage and action records

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Named handle to data passed between pipeline stages.
///
/// An artifact must be produced by exactly one action before any other
/// action consumes it; the synthesizer enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single action inside a pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineAction {
    /// Pull a branch of a source repository into an artifact
    Source {
        action_name: String,
        repository: String,
        branch: String,
        output: Artifact,
    },
    /// Run a build project against an input artifact
    Build {
        action_name: String,
        project: String,
        input: Artifact,
        outputs: Vec<Artifact>,
    },
    /// Deploy an artifact to a deployment group
    Deploy {
        action_name: String,
        deployment_group: String,
        input: Artifact,
    },
}

impl PipelineAction {
    pub fn action_name(&self) -> &str {
        match self {
            PipelineAction::Source { action_name, .. }
            | PipelineAction::Build { action_name, .. }
            | PipelineAction::Deploy { action_name, .. } => action_name,
        }
    }

    /// Artifacts this action consumes
    pub fn inputs(&self) -> Vec<&Artifact> {
        match self {
            PipelineAction::Source { .. } => vec![],
            PipelineAction::Build { input, .. } | PipelineAction::Deploy { input, .. } => {
                vec![input]
            }
        }
    }

    /// Artifacts this action produces
    pub fn outputs(&self) -> Vec<&Artifact> {
        match self {
            PipelineAction::Source { output, .. } => vec![output],
            PipelineAction::Build { outputs, .. } => outputs.iter().collect(),
            PipelineAction::Deploy { .. } => vec![],
        }
    }
}

/// An ordered phase of a pipeline containing one or more actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStage {
    pub stage_name: String,
    pub actions: Vec<PipelineAction>,
}

impl PipelineStage {
    pub fn new(stage_name: impl Into<String>, actions: Vec<PipelineAction>) -> Self {
        Self {
            stage_name: stage_name.into(),
            actions,
        }
    }
}

/// An ordered sequence of named stages.
///
/// Stages execute strictly in declared order; there is no branching and no
/// parallelism between stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub pipeline_name: String,
    /// Whether the pipeline provisions a cross-account encryption key
    pub cross_account_keys: bool,
    pub stages: Vec<PipelineStage>,
}

impl Pipeline {
    /// New empty pipeline without cross-account key sharing
    pub fn new(pipeline_name: impl Into<String>) -> Self {
        Self {
            pipeline_name: pipeline_name.into(),
            cross_account_keys: false,
            stages: Vec::new(),
        }
    }

    /// Append a stage; stage names must be unique and stages non-empty
    pub fn add_stage(&mut self, stage: PipelineStage) -> Result<()> {
        if stage.actions.is_empty() {
            return Err(CoreError::EmptyStage {
                pipeline: self.pipeline_name.clone(),
                stage: stage.stage_name,
            });
        }
        if self.stages.iter().any(|s| s.stage_name == stage.stage_name) {
            return Err(CoreError::DuplicateStage {
                pipeline: self.pipeline_name.clone(),
                stage: stage.stage_name,
            });
        }
        self.stages.push(stage);
        Ok(())
    }

    pub fn stage(&self, name: &str) -> Option<&PipelineStage> {
        self.stages.iter().find(|s| s.stage_name == name)
    }
}
