use std::path::PathBuf;
use std::process::ExitCode;

use board_host_lib::{run, RunOptions};
use clap::Parser;

/// Drive an applicant board with JSON commands on stdin
#[derive(Debug, Parser)]
#[command(name = "board-host", version)]
struct Cli {
    /// JSON config file
    config: Option<PathBuf>,

    /// SQLite database, overrides the configured store
    #[arg(long)]
    db: Option<PathBuf>,

    /// Directory for rotated log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let options = RunOptions {
        config: cli.config,
        db: cli.db,
        log_dir: cli.log_dir,
    };
    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("board-host: {}", e);
            ExitCode::FAILURE
        }
    }
}
