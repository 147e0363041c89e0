use clap::Parser;

use crossedge::adapter::inbound::cli::command::{CheckCommand, Cli, Commands};
use crossedge::adapter::inbound::cli::output::{self, OutputConfig};
use crossedge::adapter::inbound::cli::{check, run, status};
use crossedge::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = dispatch(cli.command).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Status(args) => status::execute(&args.status_file),
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config),
    }
}
