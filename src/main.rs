use anyhow::Result;
use clap::Parser;
use toaster::cli::{Cli, CliHandler};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set log level based on debug flag
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if cli.debug {
        tracing::info!("🐛 Debug mode enabled - verbose logging active");
    }

    let cli_handler = CliHandler::new(cli.config, cli.json).await?;
    cli_handler.handle_command(cli.command).await
}
