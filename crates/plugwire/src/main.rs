mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Commands;

/// Plugwire: plugin registries wired from a file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Route `log` records through `tracing` and print them to stderr.
/// Verbosity comes from `RUST_LOG` and defaults to `warn`.
fn init_logging() {
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to bridge log records: {}", e);
    }
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // Handle simple ping command
    if args.ping {
        println!("pong");
        return;
    }

    init_logging();

    let Some(command) = args.command else {
        println!("No command specified. Run with --help to see the available commands.");
        return;
    };

    if let Err(e) = cli::execute(command).await {
        log::error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
