//! rolecall - list the app-role assignments granted to an app
//! registration's service principal, enriched with role names resolved
//! from each resource's role catalog.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use error::CliResult;

/// App-role assignment listing for Entra app registrations
#[derive(Parser)]
#[command(name = "rolecall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List enriched app-role assignments for an app registration
    List(commands::list::ListArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "rolecall=debug,rolecall_graph=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::List(args) => commands::list::execute(args).await,
    }
}
