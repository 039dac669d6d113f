mod commands;
mod topology;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stack")]
#[command(about = "Declare and synthesize the deployment topology", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize deployment templates
    Synth {
        /// Output directory for the templates
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
        /// Synthesize only the named stack
        #[arg(short, long)]
        stack: Option<String>,
    },
    /// Validate the topology without writing templates
    Validate,
    /// List declared stacks
    Ls,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Synth { out, stack } => commands::synth::handle(&out, stack.as_deref()),
        Commands::Validate => commands::validate::handle(),
        Commands::Ls => commands::ls::handle(),
        Commands::Version => {
            println!("stackflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
