use crate::topology;
use colored::Colorize;

pub fn handle() -> anyhow::Result<()> {
    let app = topology::build_app()?;

    match stackflow_synth::synthesize(&app) {
        Ok(assembly) => {
            println!("{}", "✓ topology is valid".green().bold());
            for (stack_name, template) in &assembly.templates {
                println!("  {} ({} resources)", stack_name.cyan(), template.resources.len());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", "✗ topology error".red().bold());
            eprintln!("  {e}");
            std::process::exit(1);
        }
    }
}
