//! Reelsmith CLI binary.
//!
//! This binary provides command-line access to the video pipeline:
//! - Create and run jobs from a script, a script file or a topic
//! - Resume interrupted jobs
//! - Inspect and clear checkpointed fields

use clap::Parser;
use reelsmith::{LoggingConfig, ReelsmithConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, clear_field, run_job, show_status};

    // API keys may live in a .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(
        &LoggingConfig::new()
            .with_verbose(cli.verbose)
            .with_json_logs(cli.json_logs),
    )?;

    let config = match &cli.config {
        Some(path) => ReelsmithConfig::from_file(path)?,
        None => ReelsmithConfig::load()?,
    };

    match cli.command {
        Commands::Run(args) => {
            run_job(&config, args).await?;
        }

        Commands::Status { job } => {
            show_status(&config, &job).await?;
        }

        Commands::Clear { job, field } => {
            clear_field(&config, &job, &field).await?;
        }
    }

    Ok(())
}
