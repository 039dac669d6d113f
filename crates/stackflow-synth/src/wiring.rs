//! Wiring validation
//!
//! Checks run before any template is emitted:
//! - by-name references resolve within the stack (alias -> function,
//!   deployment group -> application/alias, trigger -> repository/pipeline,
//!   pipeline actions -> repository/project/group);
//! - each artifact has exactly one producer, and consumers only see
//!   artifacts produced in a strictly earlier stage;
//! - no two deployment groups bind the same alias.

use crate::error::{Result, SynthError};
use stackflow_core::{Pipeline, PipelineAction, Resource, Stack};
use std::collections::{HashMap, HashSet};

pub(crate) fn validate_stack(stack: &Stack) -> Result<()> {
    let mut functions = HashSet::new();
    let mut aliases = HashSet::new();
    let mut repositories = HashSet::new();
    let mut projects = HashSet::new();
    let mut applications = HashSet::new();
    let mut groups = HashSet::new();
    let mut pipelines = HashSet::new();

    for resource in stack.resources() {
        match resource {
            Resource::Function(f) => {
                functions.insert(f.function_name.as_str());
            }
            Resource::FunctionAlias(a) => {
                aliases.insert(a.alias_name.as_str());
            }
            Resource::Repository(r) => {
                repositories.insert(r.repository_name.as_str());
            }
            Resource::BuildProject(b) => {
                projects.insert(b.project_name.as_str());
            }
            Resource::DeploymentApplication(a) => {
                applications.insert(a.application_name.as_str());
            }
            Resource::DeploymentGroup(g) => {
                groups.insert(g.group_name.as_str());
            }
            Resource::Pipeline(p) => {
                pipelines.insert(p.pipeline_name.as_str());
            }
            Resource::Vpc(_) | Resource::CommitTrigger(_) => {}
        }
    }

    let unresolved = |kind: &'static str, name: &str| SynthError::UnresolvedReference {
        stack: stack.stack_name.clone(),
        kind,
        name: name.to_string(),
    };

    let mut bound_aliases: HashMap<&str, &str> = HashMap::new();

    for resource in stack.resources() {
        match resource {
            Resource::FunctionAlias(a) => {
                if !functions.contains(a.function_name.as_str()) {
                    return Err(unresolved("function", &a.function_name));
                }
            }
            Resource::DeploymentGroup(g) => {
                if !applications.contains(g.application.as_str()) {
                    return Err(unresolved("deployment-application", &g.application));
                }
                if !aliases.contains(g.alias.as_str()) {
                    return Err(unresolved("function-alias", &g.alias));
                }
                if let Some(other) = bound_aliases.insert(g.alias.as_str(), g.group_name.as_str()) {
                    return Err(SynthError::AliasBoundTwice {
                        group: g.group_name.clone(),
                        other: other.to_string(),
                        alias: g.alias.clone(),
                    });
                }
            }
            Resource::CommitTrigger(t) => {
                if !repositories.contains(t.repository.as_str()) {
                    return Err(unresolved("repository", &t.repository));
                }
                if !pipelines.contains(t.pipeline.as_str()) {
                    return Err(unresolved("pipeline", &t.pipeline));
                }
            }
            Resource::Pipeline(p) => {
                validate_pipeline(stack, p, &repositories, &projects, &groups)?;
            }
            _ => {}
        }
    }

    Ok(())
}

fn validate_pipeline(
    stack: &Stack,
    pipeline: &Pipeline,
    repositories: &HashSet<&str>,
    projects: &HashSet<&str>,
    groups: &HashSet<&str>,
) -> Result<()> {
    // artifact name -> index of the stage that produced it
    let mut produced: HashMap<&str, usize> = HashMap::new();

    for (stage_index, stage) in pipeline.stages.iter().enumerate() {
        for action in &stage.actions {
            match action {
                PipelineAction::Source { repository, .. } => {
                    if !repositories.contains(repository.as_str()) {
                        return Err(SynthError::UnresolvedReference {
                            stack: stack.stack_name.clone(),
                            kind: "repository",
                            name: repository.clone(),
                        });
                    }
                }
                PipelineAction::Build { project, .. } => {
                    if !projects.contains(project.as_str()) {
                        return Err(SynthError::UnresolvedReference {
                            stack: stack.stack_name.clone(),
                            kind: "build-project",
                            name: project.clone(),
                        });
                    }
                }
                PipelineAction::Deploy {
                    deployment_group, ..
                } => {
                    if !groups.contains(deployment_group.as_str()) {
                        return Err(SynthError::UnresolvedReference {
                            stack: stack.stack_name.clone(),
                            kind: "deployment-group",
                            name: deployment_group.clone(),
                        });
                    }
                }
            }

            for input in action.inputs() {
                match produced.get(input.name.as_str()) {
                    None => {
                        return Err(SynthError::ArtifactNeverProduced {
                            pipeline: pipeline.pipeline_name.clone(),
                            artifact: input.name.clone(),
                            action: action.action_name().to_string(),
                        });
                    }
                    Some(&producer_stage) if producer_stage >= stage_index => {
                        return Err(SynthError::ArtifactNotFromEarlierStage {
                            pipeline: pipeline.pipeline_name.clone(),
                            artifact: input.name.clone(),
                            stage: stage.stage_name.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }

            for output in action.outputs() {
                if produced.insert(output.name.as_str(), stage_index).is_some() {
                    return Err(SynthError::ArtifactProducedTwice {
                        pipeline: pipeline.pipeline_name.clone(),
                        artifact: output.name.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}
