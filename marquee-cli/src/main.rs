//! Marquee CLI - Command-line interface
//!
//! Lists movies now playing, searches, and browses page by page.

mod commands;
mod render;

use std::process::ExitCode;

use clap::Parser;
use marquee_core::{MarqueeConfig, MarqueeError};
use marquee_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Browse movies playing in theaters")]
struct Cli {
    /// Use the offline demo catalog instead of the TMDB API
    #[arg(long, global = true)]
    demo: bool,

    /// Console log level (full trace always goes to logs/marquee-last-run.log)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.log_level.as_tracing_level(), None) {
        eprintln!("warning: {e}");
    }

    let config = MarqueeConfig::from_env();
    match commands::handle_command(cli.command, &config, cli.demo).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<MarqueeError>() {
                Some(marquee_error) if marquee_error.is_user_error() => {
                    eprintln!("error: {}", marquee_error.user_message());
                    eprintln!("hint: check the MARQUEE_TMDB_* environment variables or pass --demo");
                }
                _ => eprintln!("error: {error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
