use clap::Parser;
use tracing_subscriber::EnvFilter;

use vigil::cli;
use vigil::errors::VigilError;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        cli::Commands::Serve(args) => cli::serve::handle_serve(args).await,
        cli::Commands::Poll(args) => cli::poll::handle_poll(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            VigilError::Config(_) => 2,
            VigilError::AgentNotFound(_) => 4,
            VigilError::BatchInFlight => 5,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
