use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vigil", version, about = "Cloud provider status aggregation service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Run one batch (or a single agent) and print the report
    Poll(PollArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Bind port
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,
}

#[derive(Args, Clone)]
pub struct PollArgs {
    /// Poll a single agent instead of the whole fleet
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Compact JSON output instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}
