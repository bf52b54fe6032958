//! Groundwork CLI - declarative schema migrations for DuckDB

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{init, migrate, new, rollback, status};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Init(args) => init::execute(args).await,
        cli::Commands::New(args) => new::execute(args, &cli.global).await,
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        cli::Commands::Rollback(args) => rollback::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
    };

    if let Err(err) = result {
        match err.downcast_ref::<ExitCode>() {
            Some(code) => std::process::exit(code.0),
            None => {
                eprintln!("Error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}
