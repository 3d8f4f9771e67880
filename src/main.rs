mod config;
mod event;
mod pipeline;
mod pr;
mod report;
mod suggest;

use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// PR Suggest — CI step that asks a chat-completion model to review a
/// labelled Pull Request and posts the answer back as a comment.
///
/// Every option falls back to the environment variable the CI runner sets,
/// so the binary normally runs without any flags.
#[derive(Parser, Debug)]
#[command(name = "pr-suggest", version, about)]
pub struct Cli {
    /// Path to the JSON payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// Repository full name (owner/name)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Token used for every GitHub API call
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// GitHub REST API base URL
    #[arg(long, env = "INPUT_GITHUB-API-BASE-URL", default_value = "https://api.github.com")]
    pub github_api_base_url: String,

    /// OpenAI API key
    #[arg(long, env = "INPUT_OPENAI-API-KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Chat model: gpt-3.5-turbo, gpt-4 or gpt-4-32k
    #[arg(long, env = "INPUT_OPENAI-MODEL", default_value = "gpt-3.5-turbo")]
    pub openai_model: String,

    /// OpenAI API base URL
    #[arg(long, env = "INPUT_OPENAI-API-BASE-URL", default_value = "https://api.openai.com")]
    pub openai_api_base_url: String,

    /// Label that must be present on the PR; overrides the config file
    #[arg(long, env = "INPUT_LABEL")]
    pub label: Option<String>,

    /// Optional TOML file with label and prompt settings
    #[arg(long, env = "INPUT_CONFIG-FILE", default_value = ".pr-suggest.toml")]
    pub config: PathBuf,

    /// Print the suggestion instead of commenting on the PR
    #[arg(long, env = "INPUT_DRY-RUN")]
    pub dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pr_suggest=info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            report::error(&err.to_string());
            return ExitCode::FAILURE;
        }
    };
    debug!(repository = %cli.repository, event_path = %cli.event_path.display(), "parsed arguments");

    let result = pipeline::execute(&cli).await;
    report::announce(&result);
    ExitCode::from(pipeline::exit_status(&result))
}
