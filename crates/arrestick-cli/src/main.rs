mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use arrestick::engine::cancel::cancellation;
use arrestick::engine::error::PredictError;
use clap::Parser;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("arreSTick CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let (cancel_handle, cancel_signal) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling the running request.");
            cancel_handle.cancel();
        }
    });

    let result = match cli.command {
        Commands::Predict(args) => {
            info!("Dispatching to 'predict' command.");
            commands::predict::run(args, cancel_signal, !cli.quiet).await
        }
        Commands::Resolve(args) => {
            info!("Dispatching to 'resolve' command.");
            commands::resolve::run(args)
        }
    };

    match &result {
        Ok(()) => info!("Command completed successfully."),
        Err(CliError::Prediction(PredictError::Retrieval(e))) => {
            error!("No structural confidence for {}: {}", e.accession(), e)
        }
        Err(CliError::Prediction(e)) if e.is_user_input() => {
            warn!("Query rejected: {}", e)
        }
        Err(e) => error!("Command failed: {}", e),
    }
    result
}
