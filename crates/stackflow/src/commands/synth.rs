use crate::topology;
use anyhow::Context;
use colored::Colorize;
use std::fs;
use std::path::Path;

pub fn handle(out: &Path, only: Option<&str>) -> anyhow::Result<()> {
    let app = topology::build_app()?;
    let assembly = stackflow_synth::synthesize(&app)?;
    tracing::debug!(stacks = assembly.templates.len(), "synthesized assembly");

    if let Some(stack) = only
        && assembly.template(stack).is_none()
    {
        anyhow::bail!("unknown stack: {stack}");
    }

    fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory {}", out.display()))?;

    for (stack_name, template) in &assembly.templates {
        if let Some(stack) = only
            && stack != stack_name
        {
            continue;
        }

        let path = out.join(format!("{stack_name}.template.json"));
        fs::write(&path, template.to_json_string()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!(
            "{} {} ({} resources)",
            "synthesized".green(),
            stack_name.cyan(),
            template.resources.len()
        );
    }

    Ok(())
}
