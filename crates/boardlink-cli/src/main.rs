mod cli;
mod commands;
mod completions;
mod error;
mod output;

use anyhow::Result;
use boardlink_core::paths;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging: always write to file (stdout belongs to the MCP
    // stdio transport)
    let log_dir = paths::logs_dir()?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "boardlink.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    let format = cli.format;
    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Completions { shell } => {
            completions::generate_completions(shell);
            Ok(())
        }
        Commands::Serve => commands::serve::run().await,
        Commands::Ports => commands::ports::run(format),
        Commands::Detect { port } => commands::detect::run(&port, format).await,
        Commands::Compile { sketch, fqbn, port } => {
            commands::compile::run(&sketch, fqbn, port).await
        }
        Commands::Upload { sketch, port, fqbn } => {
            commands::upload::run(&sketch, &port, fqbn).await
        }
        Commands::Send {
            port,
            message,
            baud,
            timeout,
        } => commands::send::run(&port, &message, baud, timeout).await,
    };

    if let Err(err) = result {
        error::handle_error(err);
    }
    Ok(())
}
