use clap::{command, Parser};
use omikuji::{
    config::BotConfig,
    system::System,
    transport::{self, ConsoleTransport},
    Error,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

async fn run(cli: &Cli) -> Result<(), Error> {
    let config = if cli.config.exists() {
        BotConfig::from_file(&cli.config)?
    } else {
        BotConfig::default()
    };

    info!("config loaded.");
    debug!("config: {:?}", config);

    let system = System::new(&config);
    system.start();

    println!("Welcome to Omikuji! Type /help for usage, Ctrl+C or end of input to quit.");

    tokio::select! {
        result = transport::run(&system, ConsoleTransport::new()) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|e| Error::internal(format!("Failed to wait for Ctrl+C: {}", e)))?;
            println!("Shutdown signal received, performing clean shutdown...");
        }
    }

    system.shutdown()?;

    println!("Shutdown completed.");

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
