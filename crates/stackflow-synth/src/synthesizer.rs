//! Template emission
//!
//! One template per stack, resources emitted from the declaration order of
//! the stack and stored under sorted logical ids. Logical ids are derived
//! from declared names so re-synthesizing the same topology always yields
//! the same assembly.

use crate::error::Result;
use crate::template::{
    Template, TemplateOutput, TemplateResource, get_att, import_value, logical_id, r#ref,
};
use crate::wiring;
use serde_json::{Value, json};
use stackflow_core::{
    App, BuildProject, CommitTrigger, DeploymentApplication, DeploymentGroup, FunctionAlias,
    FunctionCode, FunctionDefinition, FunctionVersion, Pipeline, PipelineAction, Resource,
    SourceRepository, Stack, Vpc,
};
use std::collections::BTreeMap;

const DEFAULT_CIDR_BLOCK: &str = "10.0.0.0/16";

/// The synthesized output: one template per stack
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub templates: BTreeMap<String, Template>,
}

impl Assembly {
    pub fn template(&self, stack_name: &str) -> Option<&Template> {
        self.templates.get(stack_name)
    }
}

/// Validate the app's wiring and emit one template per stack
pub fn synthesize(app: &App) -> Result<Assembly> {
    let mut templates = BTreeMap::new();
    for stack in app.stacks() {
        wiring::validate_stack(stack)?;
        let template = synth_stack(stack)?;
        tracing::debug!(
            stack = %stack.stack_name,
            resources = template.resources.len(),
            "synthesized stack"
        );
        templates.insert(stack.stack_name.clone(), template);
    }
    Ok(Assembly { templates })
}

fn synth_stack(stack: &Stack) -> Result<Template> {
    let mut template = Template::new();
    let name = stack.stack_name.as_str();

    for resource in stack.resources() {
        match resource {
            Resource::Vpc(vpc) => emit_vpc(&mut template, name, vpc)?,
            Resource::Function(function) => emit_function(&mut template, stack, function)?,
            Resource::FunctionAlias(alias) => emit_alias(&mut template, name, alias)?,
            Resource::Pipeline(pipeline) => emit_pipeline(&mut template, stack, pipeline)?,
            Resource::Repository(repository) => emit_repository(&mut template, name, repository)?,
            Resource::CommitTrigger(trigger) => emit_trigger(&mut template, name, trigger)?,
            Resource::BuildProject(project) => emit_build_project(&mut template, name, project)?,
            Resource::DeploymentApplication(application) => {
                emit_application(&mut template, name, application)?
            }
            Resource::DeploymentGroup(group) => emit_deployment_group(&mut template, name, group)?,
        }
    }

    Ok(template)
}

// Logical id scheme: declared names sanitized, with a kind suffix where the
// same name routinely backs several resources (function/version/repository).

fn function_id(function_name: &str) -> String {
    format!("{}Lambda", logical_id(function_name))
}

fn version_id(function_name: &str) -> String {
    format!("{}Version", logical_id(function_name))
}

fn repository_id(repository_name: &str) -> String {
    format!("{}Repository", logical_id(repository_name))
}

fn emit_vpc(template: &mut Template, stack: &str, vpc: &Vpc) -> Result<()> {
    let id = logical_id(&vpc.name);
    let cidr = vpc.cidr_block.as_deref().unwrap_or(DEFAULT_CIDR_BLOCK);
    template.add_resource(
        stack,
        id.clone(),
        TemplateResource::new("AWS::EC2::VPC", json!({ "CidrBlock": cidr })),
    )?;

    // Exported so a NetworkHandle can be imported from other stacks
    template.outputs.insert(
        id.clone(),
        TemplateOutput::exported(r#ref(&id), format!("{stack}:{id}")),
    );
    Ok(())
}

fn emit_function(
    template: &mut Template,
    stack: &Stack,
    function: &FunctionDefinition,
) -> Result<()> {
    let FunctionCode::Inline(source) = &function.code;

    let mut properties = json!({
        "Code": { "ZipFile": source },
        "FunctionName": function.function_name,
        "Handler": function.handler,
        "Runtime": function.runtime.identifier(),
    });

    if let Some(network) = &function.network {
        let vpc_ref = if network.stack == stack.stack_name {
            r#ref(&network.logical_id)
        } else {
            import_value(&network.export_name())
        };
        properties["VpcConfig"] = json!({ "Vpc": vpc_ref });
    }

    template.add_resource(
        &stack.stack_name,
        function_id(&function.function_name),
        TemplateResource::new("AWS::Lambda::Function", properties),
    )
}

fn emit_alias(template: &mut Template, stack: &str, alias: &FunctionAlias) -> Result<()> {
    let fn_id = function_id(&alias.function_name);

    let function_version = match &alias.version {
        FunctionVersion::Current => {
            // Publishing against the current definition materializes a
            // version resource the alias can point at.
            let version = version_id(&alias.function_name);
            template.add_resource(
                stack,
                version.clone(),
                TemplateResource::new(
                    "AWS::Lambda::Version",
                    json!({ "FunctionName": r#ref(&fn_id) }),
                ),
            )?;
            get_att(&version, "Version")
        }
        FunctionVersion::Pinned(version) => Value::String(version.clone()),
    };

    template.add_resource(
        stack,
        logical_id(&alias.alias_name),
        TemplateResource::new(
            "AWS::Lambda::Alias",
            json!({
                "FunctionName": r#ref(&fn_id),
                "FunctionVersion": function_version,
                "Name": alias.alias_name,
            }),
        ),
    )
}

fn emit_pipeline(template: &mut Template, stack: &Stack, pipeline: &Pipeline) -> Result<()> {
    let stages: Vec<Value> = pipeline
        .stages
        .iter()
        .map(|stage| {
            let actions: Vec<Value> = stage
                .actions
                .iter()
                .map(|action| action_value(stack, action))
                .collect();
            json!({ "Name": stage.stage_name, "Actions": actions })
        })
        .collect();

    template.add_resource(
        &stack.stack_name,
        logical_id(&pipeline.pipeline_name),
        TemplateResource::new(
            "AWS::CodePipeline::Pipeline",
            json!({
                "CrossAccountKeys": pipeline.cross_account_keys,
                "Name": pipeline.pipeline_name,
                "Stages": stages,
            }),
        ),
    )
}

fn action_value(stack: &Stack, action: &PipelineAction) -> Value {
    match action {
        PipelineAction::Source {
            action_name,
            repository,
            branch,
            output,
        } => json!({
            "Name": action_name,
            "ActionTypeId": {
                "Category": "Source",
                "Owner": "AWS",
                "Provider": "CodeCommit",
                "Version": "1",
            },
            "Configuration": {
                "RepositoryName": repository,
                "BranchName": branch,
            },
            "OutputArtifacts": [{ "Name": output.name }],
        }),
        PipelineAction::Build {
            action_name,
            project,
            input,
            outputs,
        } => {
            let outputs: Vec<Value> = outputs.iter().map(|a| json!({ "Name": a.name })).collect();
            json!({
                "Name": action_name,
                "ActionTypeId": {
                    "Category": "Build",
                    "Owner": "AWS",
                    "Provider": "CodeBuild",
                    "Version": "1",
                },
                "Configuration": { "ProjectName": project },
                "InputArtifacts": [{ "Name": input.name }],
                "OutputArtifacts": outputs,
            })
        }
        PipelineAction::Deploy {
            action_name,
            deployment_group,
            input,
        } => {
            // Validation guarantees the group resolves within the stack.
            let application = stack
                .deployment_groups()
                .find(|g| g.group_name == *deployment_group)
                .map(|g| g.application.clone())
                .unwrap_or_default();
            json!({
                "Name": action_name,
                "ActionTypeId": {
                    "Category": "Deploy",
                    "Owner": "AWS",
                    "Provider": "CodeDeploy",
                    "Version": "1",
                },
                "Configuration": {
                    "ApplicationName": application,
                    "DeploymentGroupName": deployment_group,
                },
                "InputArtifacts": [{ "Name": input.name }],
            })
        }
    }
}

fn emit_repository(
    template: &mut Template,
    stack: &str,
    repository: &SourceRepository,
) -> Result<()> {
    template.add_resource(
        stack,
        repository_id(&repository.repository_name),
        TemplateResource::new(
            "AWS::CodeCommit::Repository",
            json!({ "RepositoryName": repository.repository_name }),
        ),
    )
}

fn emit_trigger(template: &mut Template, stack: &str, trigger: &CommitTrigger) -> Result<()> {
    let rule_id = logical_id(&trigger.rule_name);
    template.add_resource(
        stack,
        rule_id.clone(),
        TemplateResource::new(
            "AWS::Events::Rule",
            json!({
                "Name": trigger.rule_name,
                "EventPattern": {
                    "detail-type": ["CodeCommit Repository State Change"],
                    "resources": [get_att(&repository_id(&trigger.repository), "Arn")],
                    "source": ["aws.codecommit"],
                },
                "Targets": [{
                    "Arn": r#ref(&logical_id(&trigger.pipeline)),
                    "Id": rule_id,
                }],
            }),
        ),
    )
}

fn emit_build_project(template: &mut Template, stack: &str, project: &BuildProject) -> Result<()> {
    let build_spec = serde_json::to_value(&project.build_spec)?;
    template.add_resource(
        stack,
        logical_id(&project.project_name),
        TemplateResource::new(
            "AWS::CodeBuild::Project",
            json!({
                "Name": project.project_name,
                "Source": {
                    "Type": "CODEPIPELINE",
                    "BuildSpec": build_spec,
                },
            }),
        ),
    )
}

fn emit_application(
    template: &mut Template,
    stack: &str,
    application: &DeploymentApplication,
) -> Result<()> {
    template.add_resource(
        stack,
        logical_id(&application.application_name),
        TemplateResource::new(
            "AWS::CodeDeploy::Application",
            json!({
                "ApplicationName": application.application_name,
                "ComputePlatform": "Lambda",
            }),
        ),
    )
}

fn emit_deployment_group(
    template: &mut Template,
    stack: &str,
    group: &DeploymentGroup,
) -> Result<()> {
    template.add_resource(
        stack,
        logical_id(&group.group_name),
        TemplateResource::new(
            "AWS::CodeDeploy::DeploymentGroup",
            json!({
                "ApplicationName": r#ref(&logical_id(&group.application)),
                "DeploymentGroupName": group.group_name,
                "Alias": r#ref(&logical_id(&group.alias)),
            }),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;
    use stackflow_core::{
        Artifact, BuildSpec, FunctionAlias, NetworkHandle, PipelineStage, Runtime,
    };

    fn network_stack() -> (Stack, NetworkHandle) {
        let mut stack = Stack::new("NetworkStack");
        stack.add(Resource::Vpc(Vpc::new("Vpc"))).unwrap();
        (stack, NetworkHandle::new("NetworkStack", "Vpc"))
    }

    fn backend_stack(network: NetworkHandle) -> Stack {
        let mut stack = Stack::new("BackendStack");

        stack
            .add(Resource::Function(FunctionDefinition {
                function_name: "Backend".to_string(),
                code: FunctionCode::inline("exports.handler = async () => 'Hello world';"),
                runtime: Runtime::NodeJs16,
                handler: "index.handler".to_string(),
                network: Some(network),
            }))
            .unwrap();
        stack
            .add(Resource::FunctionAlias(FunctionAlias::new(
                "BackendAlias",
                "Backend",
            )))
            .unwrap();

        let source = Artifact::new("source-artifact");
        let build = Artifact::new("build-artifact");

        let mut pipeline = Pipeline::new("BackendPipeline");
        pipeline
            .add_stage(PipelineStage::new(
                "Source",
                vec![PipelineAction::Source {
                    action_name: "SourceAction".to_string(),
                    repository: "backend-repo".to_string(),
                    branch: "main".to_string(),
                    output: source.clone(),
                }],
            ))
            .unwrap();
        pipeline
            .add_stage(PipelineStage::new(
                "Build",
                vec![PipelineAction::Build {
                    action_name: "Build".to_string(),
                    project: "BackendBuildProject".to_string(),
                    input: source,
                    outputs: vec![build.clone()],
                }],
            ))
            .unwrap();
        pipeline
            .add_stage(PipelineStage::new(
                "Deploy",
                vec![PipelineAction::Deploy {
                    action_name: "Deploy".to_string(),
                    deployment_group: "BackendDeploymentGroup".to_string(),
                    input: build,
                }],
            ))
            .unwrap();

        stack.add(Resource::Pipeline(pipeline)).unwrap();
        stack
            .add(Resource::Repository(SourceRepository::new("backend-repo")))
            .unwrap();
        stack
            .add(Resource::CommitTrigger(CommitTrigger {
                rule_name: "trigger-build".to_string(),
                repository: "backend-repo".to_string(),
                pipeline: "BackendPipeline".to_string(),
            }))
            .unwrap();
        stack
            .add(Resource::BuildProject(BuildProject::new(
                "BackendBuildProject",
                BuildSpec::with_build_commands(vec!["npm install".to_string()]),
            )))
            .unwrap();
        stack
            .add(Resource::DeploymentApplication(DeploymentApplication::new(
                "BackendCodeDeploy",
            )))
            .unwrap();
        stack
            .add(Resource::DeploymentGroup(DeploymentGroup {
                group_name: "BackendDeploymentGroup".to_string(),
                application: "BackendCodeDeploy".to_string(),
                alias: "BackendAlias".to_string(),
            }))
            .unwrap();

        stack
    }

    fn sample_app() -> App {
        let (network, handle) = network_stack();
        let mut app = App::new();
        app.add_stack(network).unwrap();
        app.add_stack(backend_stack(handle)).unwrap();
        app
    }

    #[test]
    fn test_pipeline_stage_order_in_template() {
        let assembly = synthesize(&sample_app()).unwrap();
        let template = assembly.template("BackendStack").unwrap();

        let pipeline = template.resource("BackendPipeline").unwrap();
        let stages = pipeline.properties["Stages"].as_array().unwrap();
        let names: Vec<_> = stages.iter().map(|s| s["Name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Source", "Build", "Deploy"]);
        assert_eq!(pipeline.properties["CrossAccountKeys"], false);
    }

    #[test]
    fn test_artifact_flow_source_to_build_to_deploy() {
        let assembly = synthesize(&sample_app()).unwrap();
        let pipeline = assembly
            .template("BackendStack")
            .unwrap()
            .resource("BackendPipeline")
            .unwrap();
        let stages = pipeline.properties["Stages"].as_array().unwrap();

        let source_out = &stages[0]["Actions"][0]["OutputArtifacts"][0]["Name"];
        let build_in = &stages[1]["Actions"][0]["InputArtifacts"][0]["Name"];
        let build_out = &stages[1]["Actions"][0]["OutputArtifacts"][0]["Name"];
        let deploy_in = &stages[2]["Actions"][0]["InputArtifacts"][0]["Name"];

        assert_eq!(source_out, "source-artifact");
        assert_eq!(build_in, "source-artifact");
        assert_eq!(build_out, "build-artifact");
        assert_eq!(deploy_in, "build-artifact");

        assert_eq!(
            stages[0]["Actions"][0]["Configuration"]["BranchName"],
            "main"
        );
        assert_eq!(
            stages[0]["Actions"][0]["Configuration"]["RepositoryName"],
            "backend-repo"
        );
    }

    #[test]
    fn test_deploy_action_targets_bound_group() {
        let assembly = synthesize(&sample_app()).unwrap();
        let template = assembly.template("BackendStack").unwrap();

        let pipeline = template.resource("BackendPipeline").unwrap();
        let deploy = &pipeline.properties["Stages"][2]["Actions"][0];
        assert_eq!(
            deploy["Configuration"]["DeploymentGroupName"],
            "BackendDeploymentGroup"
        );
        assert_eq!(deploy["Configuration"]["ApplicationName"], "BackendCodeDeploy");

        let group = template.resource("BackendDeploymentGroup").unwrap();
        assert_eq!(group.properties["Alias"]["Ref"], "BackendAlias");
    }

    #[test]
    fn test_alias_points_at_published_version() {
        let assembly = synthesize(&sample_app()).unwrap();
        let template = assembly.template("BackendStack").unwrap();

        let version = template.resource("BackendVersion").unwrap();
        assert_eq!(version.resource_type, "AWS::Lambda::Version");

        let alias = template.resource("BackendAlias").unwrap();
        assert_eq!(
            alias.properties["FunctionVersion"]["Fn::GetAtt"][0],
            "BackendVersion"
        );
    }

    #[test]
    fn test_network_handle_becomes_import() {
        let assembly = synthesize(&sample_app()).unwrap();

        let network = assembly.template("NetworkStack").unwrap();
        let export = network.outputs.get("Vpc").unwrap();
        assert_eq!(
            export.export.as_ref().unwrap().name,
            "NetworkStack:Vpc"
        );

        let function = assembly
            .template("BackendStack")
            .unwrap()
            .resource("BackendLambda")
            .unwrap();
        assert_eq!(
            function.properties["VpcConfig"]["Vpc"]["Fn::ImportValue"],
            "NetworkStack:Vpc"
        );
        assert_eq!(function.properties["Runtime"], "nodejs16.x");
        assert_eq!(function.properties["Handler"], "index.handler");
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let first = synthesize(&sample_app()).unwrap();
        let second = synthesize(&sample_app()).unwrap();

        assert_eq!(first, second);
        for (name, template) in &first.templates {
            assert_eq!(
                template.to_json_string().unwrap(),
                second.templates[name].to_json_string().unwrap()
            );
        }
    }

    #[test]
    fn test_unproduced_artifact_rejected() {
        let mut stack = Stack::new("BrokenStack");
        let mut pipeline = Pipeline::new("BrokenPipeline");
        pipeline
            .add_stage(PipelineStage::new(
                "Deploy",
                vec![PipelineAction::Deploy {
                    action_name: "Deploy".to_string(),
                    deployment_group: "Group".to_string(),
                    input: Artifact::new("missing"),
                }],
            ))
            .unwrap();
        stack.add(Resource::Pipeline(pipeline)).unwrap();
        stack
            .add(Resource::Function(FunctionDefinition {
                function_name: "Fn".to_string(),
                code: FunctionCode::inline(""),
                runtime: Runtime::NodeJs16,
                handler: "index.handler".to_string(),
                network: None,
            }))
            .unwrap();
        stack
            .add(Resource::FunctionAlias(FunctionAlias::new("FnAlias", "Fn")))
            .unwrap();
        stack
            .add(Resource::DeploymentApplication(DeploymentApplication::new(
                "App",
            )))
            .unwrap();
        stack
            .add(Resource::DeploymentGroup(DeploymentGroup {
                group_name: "Group".to_string(),
                application: "App".to_string(),
                alias: "FnAlias".to_string(),
            }))
            .unwrap();

        let mut app = App::new();
        app.add_stack(stack).unwrap();

        let err = synthesize(&app).unwrap_err();
        assert!(matches!(err, SynthError::ArtifactNeverProduced { .. }));
    }

    #[test]
    fn test_same_stage_consumption_rejected() {
        let mut stack = Stack::new("BrokenStack");
        let source = Artifact::new("source-artifact");

        let mut pipeline = Pipeline::new("BrokenPipeline");
        pipeline
            .add_stage(PipelineStage::new(
                "Source",
                vec![
                    PipelineAction::Source {
                        action_name: "SourceAction".to_string(),
                        repository: "repo".to_string(),
                        branch: "main".to_string(),
                        output: source.clone(),
                    },
                    PipelineAction::Build {
                        action_name: "Build".to_string(),
                        project: "Project".to_string(),
                        input: source,
                        outputs: vec![Artifact::new("build-artifact")],
                    },
                ],
            ))
            .unwrap();
        stack.add(Resource::Pipeline(pipeline)).unwrap();
        stack
            .add(Resource::Repository(SourceRepository::new("repo")))
            .unwrap();
        stack
            .add(Resource::BuildProject(BuildProject::new(
                "Project",
                BuildSpec::with_build_commands(vec!["npm install".to_string()]),
            )))
            .unwrap();

        let mut app = App::new();
        app.add_stack(stack).unwrap();

        let err = synthesize(&app).unwrap_err();
        assert!(matches!(err, SynthError::ArtifactNotFromEarlierStage { .. }));
    }

    #[test]
    fn test_second_producer_of_artifact_rejected() {
        let mut stack = Stack::new("BrokenStack");
        let source = Artifact::new("source-artifact");

        let mut pipeline = Pipeline::new("BrokenPipeline");
        pipeline
            .add_stage(PipelineStage::new(
                "Source",
                vec![PipelineAction::Source {
                    action_name: "SourceAction".to_string(),
                    repository: "repo".to_string(),
                    branch: "main".to_string(),
                    output: source.clone(),
                }],
            ))
            .unwrap();
        // Build stage re-emits the source artifact as its own output
        pipeline
            .add_stage(PipelineStage::new(
                "Build",
                vec![PipelineAction::Build {
                    action_name: "Build".to_string(),
                    project: "Project".to_string(),
                    input: source.clone(),
                    outputs: vec![source],
                }],
            ))
            .unwrap();
        stack.add(Resource::Pipeline(pipeline)).unwrap();
        stack
            .add(Resource::Repository(SourceRepository::new("repo")))
            .unwrap();
        stack
            .add(Resource::BuildProject(BuildProject::new(
                "Project",
                BuildSpec::with_build_commands(vec!["npm install".to_string()]),
            )))
            .unwrap();

        let mut app = App::new();
        app.add_stack(stack).unwrap();

        let err = synthesize(&app).unwrap_err();
        assert!(matches!(err, SynthError::ArtifactProducedTwice { .. }));
    }

    #[test]
    fn test_unresolved_repository_rejected() {
        let mut stack = Stack::new("BrokenStack");
        let mut pipeline = Pipeline::new("BrokenPipeline");
        pipeline
            .add_stage(PipelineStage::new(
                "Source",
                vec![PipelineAction::Source {
                    action_name: "SourceAction".to_string(),
                    repository: "no-such-repo".to_string(),
                    branch: "main".to_string(),
                    output: Artifact::new("source-artifact"),
                }],
            ))
            .unwrap();
        stack.add(Resource::Pipeline(pipeline)).unwrap();

        let mut app = App::new();
        app.add_stack(stack).unwrap();

        let err = synthesize(&app).unwrap_err();
        assert!(matches!(
            err,
            SynthError::UnresolvedReference {
                kind: "repository",
                ..
            }
        ));
    }

    #[test]
    fn test_alias_bound_by_two_groups_rejected() {
        let mut stack = Stack::new("BrokenStack");
        stack
            .add(Resource::Function(FunctionDefinition {
                function_name: "Fn".to_string(),
                code: FunctionCode::inline(""),
                runtime: Runtime::NodeJs16,
                handler: "index.handler".to_string(),
                network: None,
            }))
            .unwrap();
        stack
            .add(Resource::FunctionAlias(FunctionAlias::new("FnAlias", "Fn")))
            .unwrap();
        stack
            .add(Resource::DeploymentApplication(DeploymentApplication::new(
                "App",
            )))
            .unwrap();
        for group_name in ["GroupA", "GroupB"] {
            stack
                .add(Resource::DeploymentGroup(DeploymentGroup {
                    group_name: group_name.to_string(),
                    application: "App".to_string(),
                    alias: "FnAlias".to_string(),
                }))
                .unwrap();
        }

        let mut app = App::new();
        app.add_stack(stack).unwrap();

        let err = synthesize(&app).unwrap_err();
        assert!(matches!(err, SynthError::AliasBoundTwice { .. }));
    }
}
