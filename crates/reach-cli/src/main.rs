#![doc = include_str!("../README.md")]

mod cli;
mod commands;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::helpers::parse_output_format;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = parse_output_format(&cli.format)?;
    let dir = reach_proof::ProofDir::new(&cli.proof_dir);

    match cli.command {
        Commands::List => commands::inspect::run_list_command(&dir, format)?,
        Commands::Show { id } => commands::inspect::run_show_command(&dir, &id, format)?,
        Commands::Status { id } => commands::inspect::run_status_command(&dir, &id, format)?,
        Commands::Leaves { id } => commands::inspect::run_leaves_command(&dir, &id, format)?,
        Commands::Admit { id } => commands::admin::run_admit_command(&dir, &id, true)?,
        Commands::Unadmit { id } => commands::admin::run_admit_command(&dir, &id, false)?,
        Commands::RemoveTerminal { id, node } => {
            commands::admin::run_remove_terminal_command(&dir, &id, &node)?
        }
        Commands::RemoveBounded { id, node } => {
            commands::admin::run_remove_bounded_command(&dir, &id, &node)?
        }
        Commands::Refute { id, node } => {
            commands::admin::run_refute_command(&dir, &id, &node, format)?
        }
        Commands::Unrefute { id, node } => {
            commands::admin::run_unrefute_command(&dir, &id, &node)?
        }
    }

    Ok(())
}
