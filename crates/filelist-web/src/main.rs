//! File List Manager web form
//!
//! Serves the copy/validate/generate form over HTTP, backed by the
//! filelist-core engine and history store.

mod error;
mod render;
mod server;

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use error::Result;
use server::Server;

/// File List Manager web form server
#[derive(Parser, Debug)]
#[command(name = "filelist-web")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// History file location
    #[arg(long, default_value = "history.json")]
    history_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    Server::new(cli.history_file).run(&cli.bind)
}
