mod auth;
mod bindings;
mod cache;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod output;
mod page;
mod route;
mod services;
mod state;
#[cfg(test)]
mod testing;
mod types;
mod view;

use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, CycleCommands};
use config::Config;
use error::Result;
use std::error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = std::error::Error::source(cause);
            }
        }

        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "plane=info" } else { "plane=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    output::set_json_output(cli.json);
    output::set_quiet(cli.quiet);

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "plane", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        Commands::Cycle { action } => {
            let config = Config::load()?;

            match action {
                CycleCommands::View(args) => {
                    commands::cycles::view(&config, args).await?;
                }
                CycleCommands::List { page } => {
                    commands::cycles::list(&config, &page).await?;
                }
                CycleCommands::Available { page } => {
                    commands::cycles::available(&config, &page).await?;
                }
                CycleCommands::Add(args) => {
                    commands::cycles::add(&config, args).await?;
                }
                CycleCommands::Create(args) => {
                    commands::cycles::create(&config, args).await?;
                }
                CycleCommands::Edit(args) => {
                    commands::cycles::edit(&config, args).await?;
                }
            }
        }
    }

    Ok(())
}
