//! CLI command definitions.

use clap::{Parser, Subcommand};
use reelsmith::Language;
use std::path::PathBuf;

/// Reelsmith - narrated short videos from a script or a topic
#[derive(Parser, Debug)]
#[command(name = "reelsmith")]
#[command(about = "Narrated short videos from a script or a topic", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file overlaid on the bundled defaults
    #[arg(long, global = true, env = "REELSMITH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a job and run it, or resume an existing one
    Run(RunArgs),

    /// Show a job's populated fields and next step
    Status {
        /// Job id
        job: String,
    },

    /// Clear one field so the step producing it runs again
    Clear {
        /// Job id
        job: String,

        /// Field to clear
        field: String,
    },
}

/// Arguments for `reelsmith run`
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Finished script text
    #[arg(long, conflicts_with_all = ["script_file", "prompt"])]
    pub script: Option<String>,

    /// File holding the finished script
    #[arg(long, conflicts_with = "prompt")]
    pub script_file: Option<PathBuf>,

    /// Topic to generate a script from
    #[arg(long)]
    pub prompt: Option<String>,

    /// Render 1080x1920 instead of 1920x1080
    #[arg(long)]
    pub vertical: bool,

    /// Narration language (e.g. english, spanish)
    #[arg(long, default_value = "english")]
    pub language: Language,

    /// Background music track name
    #[arg(long)]
    pub music: Option<String>,

    /// Job id to create or resume
    #[arg(long)]
    pub job: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_arguments() {
        let cli = Cli::parse_from([
            "reelsmith",
            "run",
            "--prompt",
            "owls",
            "--vertical",
            "--language",
            "spanish",
            "-v",
        ]);
        assert!(cli.verbose);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.prompt.as_deref(), Some("owls"));
        assert!(args.vertical);
        assert_eq!(args.language, Language::Spanish);
    }

    #[test]
    fn test_script_conflicts_with_prompt() {
        let result = Cli::try_parse_from(["reelsmith", "run", "--script", "a", "--prompt", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_clear_arguments() {
        let cli = Cli::parse_from(["reelsmith", "clear", "job-1", "image_urls"]);
        assert!(matches!(
            cli.command,
            Commands::Clear { ref job, ref field } if job == "job-1" && field == "image_urls"
        ));
    }
}
