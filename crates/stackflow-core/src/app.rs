//! App and stack containers
//!
//! A [`Stack`] is a named, independently deployable unit of declared
//! resources; an [`App`] is the ordered set of stacks built by one
//! declaration pass. Declaration order is preserved so synthesis is
//! deterministic.

use crate::error::{CoreError, Result};
use crate::model::{
    BuildProject, CommitTrigger, DeploymentApplication, DeploymentGroup, FunctionAlias,
    FunctionDefinition, Pipeline, SourceRepository, Vpc,
};
use serde::{Deserialize, Serialize};

/// One declared resource inside a stack
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    Vpc(Vpc),
    Function(FunctionDefinition),
    FunctionAlias(FunctionAlias),
    Pipeline(Pipeline),
    Repository(SourceRepository),
    CommitTrigger(CommitTrigger),
    BuildProject(BuildProject),
    DeploymentApplication(DeploymentApplication),
    DeploymentGroup(DeploymentGroup),
}

impl Resource {
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::Vpc(_) => "vpc",
            Resource::Function(_) => "function",
            Resource::FunctionAlias(_) => "function-alias",
            Resource::Pipeline(_) => "pipeline",
            Resource::Repository(_) => "repository",
            Resource::CommitTrigger(_) => "commit-trigger",
            Resource::BuildProject(_) => "build-project",
            Resource::DeploymentApplication(_) => "deployment-application",
            Resource::DeploymentGroup(_) => "deployment-group",
        }
    }

    /// Declared name, used for duplicate detection within a stack
    pub fn name(&self) -> &str {
        match self {
            Resource::Vpc(v) => &v.name,
            Resource::Function(f) => &f.function_name,
            Resource::FunctionAlias(a) => &a.alias_name,
            Resource::Pipeline(p) => &p.pipeline_name,
            Resource::Repository(r) => &r.repository_name,
            Resource::CommitTrigger(t) => &t.rule_name,
            Resource::BuildProject(b) => &b.project_name,
            Resource::DeploymentApplication(a) => &a.application_name,
            Resource::DeploymentGroup(g) => &g.group_name,
        }
    }
}

/// A named, independently deployable unit of declared resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stack {
    pub stack_name: String,
    resources: Vec<Resource>,
}

impl Stack {
    pub fn new(stack_name: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            resources: Vec::new(),
        }
    }

    /// Append a resource; (kind, name) pairs must be unique within a stack
    pub fn add(&mut self, resource: Resource) -> Result<()> {
        if self
            .resources
            .iter()
            .any(|r| r.kind() == resource.kind() && r.name() == resource.name())
        {
            return Err(CoreError::DuplicateResource {
                stack: self.stack_name.clone(),
                kind: resource.kind(),
                name: resource.name().to_string(),
            });
        }
        tracing::debug!(
            stack = %self.stack_name,
            kind = resource.kind(),
            name = resource.name(),
            "declared resource"
        );
        self.resources.push(resource);
        Ok(())
    }

    /// Resources in declaration order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Mutable access to a declared pipeline, so stages can be attached
    /// after the (empty) pipeline itself has been declared
    pub fn pipeline_mut(&mut self, name: &str) -> Result<&mut Pipeline> {
        self.resources
            .iter_mut()
            .find_map(|r| match r {
                Resource::Pipeline(p) if p.pipeline_name == name => Some(p),
                _ => None,
            })
            .ok_or_else(|| CoreError::PipelineNotFound(name.to_string()))
    }

    pub fn pipelines(&self) -> impl Iterator<Item = &Pipeline> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Pipeline(p) => Some(p),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.resources.iter().filter_map(|r| match r {
            Resource::Function(f) => Some(f),
            _ => None,
        })
    }

    pub fn aliases(&self) -> impl Iterator<Item = &FunctionAlias> {
        self.resources.iter().filter_map(|r| match r {
            Resource::FunctionAlias(a) => Some(a),
            _ => None,
        })
    }

    pub fn deployment_groups(&self) -> impl Iterator<Item = &DeploymentGroup> {
        self.resources.iter().filter_map(|r| match r {
            Resource::DeploymentGroup(g) => Some(g),
            _ => None,
        })
    }
}

/// The ordered set of stacks built by one declaration pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct App {
    stacks: Vec<Stack>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stack; stack names must be unique
    pub fn add_stack(&mut self, stack: Stack) -> Result<()> {
        if self.stacks.iter().any(|s| s.stack_name == stack.stack_name) {
            return Err(CoreError::DuplicateStack(stack.stack_name));
        }
        self.stacks.push(stack);
        Ok(())
    }

    /// Stacks in declaration order
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.stack_name == name)
    }
}
