use std::fmt;
use thiserror::Error;
use tracing::{info, info_span, instrument, warn, Instrument};

use crate::config::{Config, ConfigError, FileConfig};
use crate::event;
use crate::pr::{diff, has_label, GitHubClient, GitHubError, PullRequestRef, SourceHost};
use crate::suggest::{ChatModel, OpenAiClient, OpenAiError};
use crate::Cli;

/// Status GitHub answers a created comment with.
pub const CREATED: u16 = 201;

/// The steps that talk to a remote service, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LabelGate,
    DiffFetch,
    SuggestionRequest,
    CommentPublish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LabelGate => "Fetching pull request labels",
            Stage::DiffFetch => "Fetching pull request changes",
            Stage::SuggestionRequest => "Fetching AI suggestions",
            Stage::CommentPublish => "Posting comment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    OpenAi(#[from] OpenAiError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Configuration(#[from] ConfigError),

    #[error("{stage} failed for PR {number}: {source}")]
    Upstream {
        stage: Stage,
        number: u64,
        source: UpstreamError,
    },
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The trigger label is not on the PR; nothing else was called.
    LabelAbsent { number: u64 },
    /// The comment request went through; `status` is what GitHub answered.
    Commented { number: u64, status: u16 },
    /// Dry run: the suggestion was produced but not posted.
    DryRun { number: u64, suggestion: String },
}

fn upstream<E: Into<UpstreamError>>(stage: Stage, number: u64) -> impl FnOnce(E) -> PipelineError {
    move |source| PipelineError::Upstream {
        stage,
        number,
        source: source.into(),
    }
}

/// Build everything from the command line and run the review once.
///
/// Configuration, including the model allow-list, and the event file are
/// both checked before the first network call.
pub async fn execute(cli: &Cli) -> Result<Outcome, PipelineError> {
    let file = FileConfig::load(&cli.config)?;
    let config = Config::resolve(cli, file)?;
    info!(repo = %config.repo, model = %config.model, label = %config.label, "configuration loaded");

    let number = event::read_pull_request_number(&config.event_path)?;
    let pr = PullRequestRef {
        repo: config.repo.clone(),
        number,
    };

    let host = GitHubClient::new(&config.github_api_base_url, &config.github_token);
    let model = OpenAiClient::new(&config.openai_api_base_url, &config.openai_api_key, config.model);
    run(&config, &pr, &host, &model).await
}

/// Label gate, diff fetch, suggestion request, comment publish. Each step
/// waits for the previous one and the first error ends the run.
#[instrument(skip_all, fields(repo = %pr.repo, pr = pr.number))]
pub async fn run(
    config: &Config,
    pr: &PullRequestRef,
    host: &dyn SourceHost,
    model: &dyn ChatModel,
) -> Result<Outcome, PipelineError> {
    let labels = host
        .labels(pr)
        .instrument(info_span!("label_gate"))
        .await
        .map_err(upstream(Stage::LabelGate, pr.number))?;
    if !has_label(&labels, &config.label) {
        info!(label = %config.label, labels = labels.len(), "label not present, skipping review");
        return Ok(Outcome::LabelAbsent { number: pr.number });
    }

    let files = host
        .changed_files(pr)
        .instrument(info_span!("diff_fetch"))
        .await
        .map_err(upstream(Stage::DiffFetch, pr.number))?;
    let blob = diff::render_diff_blob(&files);
    info!(files = files.len(), diff_bytes = blob.len(), "collected pull request changes");

    let prompt = config.prompt.render(&blob);
    let suggestion = model
        .complete(&prompt)
        .instrument(info_span!("suggestion_request", model = %config.model))
        .await
        .map_err(upstream(Stage::SuggestionRequest, pr.number))?;
    info!(suggestion_bytes = suggestion.len(), "received suggestion");

    if config.dry_run {
        return Ok(Outcome::DryRun {
            number: pr.number,
            suggestion,
        });
    }

    let status = host
        .create_comment(pr, &suggestion)
        .instrument(info_span!("comment_publish"))
        .await
        .map_err(upstream(Stage::CommentPublish, pr.number))?;
    if status == CREATED {
        info!(status, "comment posted");
    } else {
        warn!(status, "comment request returned an unexpected status");
    }

    Ok(Outcome::Commented {
        number: pr.number,
        status,
    })
}

/// Process exit status for a finished run: 0 for any outcome, 1 for any error.
pub fn exit_status(result: &Result<Outcome, PipelineError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
