use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::pr::RepoName;
use crate::suggest::prompt::{PromptTemplate, DIFF_PLACEHOLDER};
use crate::Cli;

/// Label used when neither the command line nor the config file names one.
pub const DEFAULT_LABEL: &str = "ai";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse event data: {0}")]
    EventParse(#[from] serde_json::Error),

    #[error("Pull request number not found in event data.")]
    MissingPullRequestNumber,

    #[error("Invalid model '{0}' specified. Please use either 'gpt-3.5-turbo', 'gpt-4' or 'gpt-4-32k'.")]
    UnsupportedModel(String),

    #[error("Invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),

    #[error("Required input '{0}' is empty")]
    MissingInput(&'static str),

    #[error("Custom prompt template must contain the {{diff}} placeholder")]
    TemplateWithoutDiff,
}

/// Chat models the review step accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Model {
    #[default]
    Gpt35Turbo,
    Gpt4,
    Gpt4Context32k,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Gpt35Turbo, Model::Gpt4, Model::Gpt4Context32k];

    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::Gpt4 => "gpt-4",
            Model::Gpt4Context32k => "gpt-4-32k",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = ConfigError;

    /// Exact, case-sensitive match against the allow-list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| ConfigError::UnsupportedModel(s.to_string()))
    }
}

/// Optional settings read from the TOML config file.
/// All fields are optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub review: ReviewSection,

    #[serde(default)]
    pub prompt: PromptSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewSection {
    /// Label that triggers a review
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptSection {
    /// Built-in template to use
    pub template: Option<TemplateKind>,
    /// Custom template text with a `{diff}` placeholder; wins over `template`
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Rubric,
    Freeform,
}

impl FileConfig {
    /// Load the config file at `path`, or defaults when it doesn't exist.
    pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(FileConfig::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Fully resolved settings for one run. Built once at start-up and only
/// borrowed afterwards.
#[derive(Debug)]
pub struct Config {
    pub event_path: PathBuf,
    pub repo: RepoName,
    pub github_api_base_url: String,
    pub github_token: SecretString,
    pub openai_api_base_url: String,
    pub openai_api_key: SecretString,
    pub model: Model,
    pub label: String,
    pub prompt: PromptTemplate,
    pub dry_run: bool,
}

impl Config {
    /// Merge command-line/environment inputs with the config file and
    /// validate everything that can be checked without a network call.
    ///
    /// Precedence for the label is flag/env, then file, then [`DEFAULT_LABEL`].
    /// An input that is set but blank counts as unset.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Config, ConfigError> {
        let repo = parse_repository(&cli.repository)?;
        let model = match cli.openai_model.trim() {
            "" => Model::default(),
            name => name.parse::<Model>()?,
        };
        let github_token = require_secret("github-token", &cli.github_token)?;
        let openai_api_key = require_secret("openai-api-key", &cli.openai_api_key)?;

        let label = non_blank(cli.label.clone())
            .or(non_blank(file.review.label))
            .unwrap_or_else(|| DEFAULT_LABEL.to_string());

        let prompt = match (file.prompt.text, file.prompt.template) {
            (Some(text), _) => {
                if !text.contains(DIFF_PLACEHOLDER) {
                    return Err(ConfigError::TemplateWithoutDiff);
                }
                PromptTemplate::Custom(text)
            }
            (None, Some(TemplateKind::Freeform)) => PromptTemplate::Freeform,
            (None, Some(TemplateKind::Rubric)) | (None, None) => PromptTemplate::Rubric,
        };

        Ok(Config {
            event_path: cli.event_path.clone(),
            repo,
            github_api_base_url: cli.github_api_base_url.clone(),
            github_token,
            openai_api_base_url: cli.openai_api_base_url.clone(),
            openai_api_key,
            model,
            label,
            prompt,
            dry_run: cli.dry_run,
        })
    }
}

/// Split `owner/name` into its parts. Both must be non-empty and the name
/// may not contain another slash.
pub fn parse_repository(full_name: &str) -> Result<RepoName, ConfigError> {
    let invalid = || ConfigError::InvalidRepository(full_name.to_string());
    let (owner, name) = full_name.trim().split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return Err(invalid());
    }
    Ok(RepoName {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require_secret(input: &'static str, value: &str) -> Result<SecretString, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingInput(input));
    }
    Ok(SecretString::from(value.to_string()))
}
