//! The declared topology: a network stack and a backend stack.
//!
//! The network stack exposes a single network handle; the backend stack
//! consumes it and declares the function, its alias, and the three-stage
//! pipeline that builds and deploys commits to that alias.

use stackflow_core::{
    App, Artifact, BuildProject, BuildSpec, CommitTrigger, DeploymentApplication,
    DeploymentGroup, FunctionAlias, FunctionCode, FunctionDefinition, NetworkHandle, Pipeline,
    PipelineAction, PipelineStage, Resource, Runtime, SourceRepository, Stack, Vpc,
};

pub const VPC_STACK_NAME: &str = "LambdaAPIGatewayVPCStack";
pub const BACKEND_STACK_NAME: &str = "LambdaAPIGatewayBackendStack";
pub const BACKEND_NAME: &str = "LambdaAPIGatewayBackend";
pub const BACKEND_REPO_NAME: &str = "lambda-api-gateway-backend";

const SOURCE_BRANCH: &str = "main";
const PLACEHOLDER_HANDLER: &str =
    "export const handler = async (event, context) => { return 'Hello world'; };";

/// Inputs of the backend topology unit
pub struct BackendStackProps {
    /// Display name; resource names are derived from it
    pub name: String,
    /// Source repository name
    pub repo_name: String,
    /// Network the function attaches to
    pub vpc: NetworkHandle,
}

/// Declare the network stack and return its handle
pub fn vpc_stack() -> stackflow_core::Result<(Stack, NetworkHandle)> {
    let mut stack = Stack::new(VPC_STACK_NAME);
    let vpc = Vpc::new("Vpc");
    let handle = NetworkHandle::new(VPC_STACK_NAME, &vpc.name);
    stack.add(Resource::Vpc(vpc))?;
    Ok((stack, handle))
}

/// Declare the backend stack: function, alias, pipeline, repository with
/// commit trigger, build project, deployment application and group, and the
/// Source -> Build -> Deploy stages, in that order.
pub fn backend_stack(props: BackendStackProps) -> stackflow_core::Result<Stack> {
    let mut stack = Stack::new(BACKEND_STACK_NAME);
    let name = &props.name;

    stack.add(Resource::Function(FunctionDefinition {
        function_name: name.clone(),
        code: FunctionCode::inline(PLACEHOLDER_HANDLER),
        runtime: Runtime::NodeJs16,
        handler: "index.handler".to_string(),
        network: Some(props.vpc),
    }))?;

    let alias_name = format!("{name}Alias");
    stack.add(Resource::FunctionAlias(FunctionAlias::new(
        &alias_name,
        name,
    )))?;

    let pipeline_name = format!("{name}Pipeline");
    stack.add(Resource::Pipeline(Pipeline::new(&pipeline_name)))?;

    stack.add(Resource::Repository(SourceRepository::new(
        &props.repo_name,
    )))?;
    stack.add(Resource::CommitTrigger(CommitTrigger {
        rule_name: "trigger-build".to_string(),
        repository: props.repo_name.clone(),
        pipeline: pipeline_name.clone(),
    }))?;

    let source_artifact = Artifact::new("source-artifact");
    let build_artifact = Artifact::new("build-artifact");

    stack.pipeline_mut(&pipeline_name)?.add_stage(PipelineStage::new(
        "Source",
        vec![PipelineAction::Source {
            action_name: "SourceAction".to_string(),
            repository: props.repo_name.clone(),
            branch: SOURCE_BRANCH.to_string(),
            output: source_artifact.clone(),
        }],
    ))?;

    let project_name = format!("{name}BuildProject");
    stack.add(Resource::BuildProject(BuildProject::new(
        &project_name,
        BuildSpec::with_build_commands(vec!["npm install".to_string()]),
    )))?;

    stack.pipeline_mut(&pipeline_name)?.add_stage(PipelineStage::new(
        "Build",
        vec![PipelineAction::Build {
            action_name: "Build".to_string(),
            project: project_name,
            input: source_artifact,
            outputs: vec![build_artifact.clone()],
        }],
    ))?;

    let application_name = format!("{name}CodeDeploy");
    stack.add(Resource::DeploymentApplication(DeploymentApplication::new(
        &application_name,
    )))?;

    let group_name = format!("{name}DeploymentGroup");
    stack.add(Resource::DeploymentGroup(DeploymentGroup {
        group_name: group_name.clone(),
        application: application_name,
        alias: alias_name,
    }))?;

    stack.pipeline_mut(&pipeline_name)?.add_stage(PipelineStage::new(
        "Deploy",
        vec![PipelineAction::Deploy {
            action_name: "Deploy".to_string(),
            deployment_group: group_name,
            input: build_artifact,
        }],
    ))?;

    Ok(stack)
}

/// Entry point: network stack first, then the backend stack consuming its
/// handle. No further orchestration.
pub fn build_app() -> stackflow_core::Result<App> {
    let mut app = App::new();

    let (network, handle) = vpc_stack()?;
    app.add_stack(network)?;

    let backend = backend_stack(BackendStackProps {
        name: BACKEND_NAME.to_string(),
        repo_name: BACKEND_REPO_NAME.to_string(),
        vpc: handle,
    })?;
    app.add_stack(backend)?;

    Ok(app)
}
