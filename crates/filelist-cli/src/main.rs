//! File List Manager CLI
//!
//! One-shot subcommands plus an interactive loop, both thin wrappers
//! around the filelist-core engine.

mod cli;
mod commands;
mod context;
mod error;
mod repl;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let mut ctx = Context::load(&cli.settings_file)?;

    match cli.command {
        Some(cmd) => execute_command(&mut ctx, cmd),
        None => {
            // No command provided - show help hint
            println!("{} File List Manager CLI", "filelist".green().bold());
            println!();
            println!(
                "Run {} for available commands or {} for the interactive loop.",
                "filelist --help".cyan(),
                "filelist repl".cyan()
            );
            Ok(())
        }
    }
}

fn execute_command(ctx: &mut Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Copy {
            lists,
            validate,
            source,
            destination,
        } => commands::run_copy_lists(ctx, &lists, validate, source, destination),
        Commands::CopyAll {
            source,
            destination,
        } => commands::run_copy_all(ctx, source, destination),
        Commands::List {
            source,
            destination,
            name,
        } => commands::run_list(ctx, source, destination, &name),
        Commands::Validate { list } => commands::run_validate_list(ctx, &list),
        Commands::ValidateAll {
            source,
            destination,
        } => commands::run_validate_all(ctx, source, destination),
        Commands::Extra { list, destination } => commands::run_extra(ctx, &list, destination),
        Commands::Set { field, path } => commands::run_set(ctx, &field, &path),
        Commands::Settings => commands::run_settings(ctx),
        Commands::Repl => repl::run(ctx),
    }
}
