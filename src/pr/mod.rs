pub mod diff;
pub mod types;

pub use types::{ChangedFile, Label, PullRequestRef, RepoName};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use types::PullRequestPayload;

const GITHUB_JSON: &str = "application/vnd.github.v3+json";
const CLIENT_NAME: &str = "pr-suggest";

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        source: reqwest::Error,
    },
}

/// The three source-control calls the pipeline makes.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Labels currently attached to the pull request.
    async fn labels(&self, pr: &PullRequestRef) -> Result<Vec<Label>, GitHubError>;

    /// Changed files with their patches, in the order the host lists them.
    async fn changed_files(&self, pr: &PullRequestRef) -> Result<Vec<ChangedFile>, GitHubError>;

    /// Create an issue comment and return the HTTP status the host answered with.
    async fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<u16, GitHubError>;
}

/// True when `target` is attached to the PR. Exact, case-sensitive match.
pub fn has_label(labels: &[Label], target: &str) -> bool {
    if labels.is_empty() {
        return false;
    }
    labels.iter().any(|label| label.name == target)
}

/// GitHub REST client for one repository host.
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: &SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: SecretString::from(token.expose_secret().to_string()),
        }
    }

    /// `{base}/repos/{owner}/{repo}/{path}`
    fn endpoint(&self, pr: &PullRequestRef, path: &str) -> String {
        format!("{}/repos/{}/{}", self.base_url, pr.repo, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(USER_AGENT, CLIENT_NAME)
            .header(ACCEPT, GITHUB_JSON)
            .bearer_auth(self.token.expose_secret())
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, GitHubError> {
        let fail = |source: reqwest::Error| GitHubError::Request {
            endpoint: endpoint.to_string(),
            source,
        };
        self.request(Method::GET, endpoint)
            .send()
            .await
            .map_err(fail)?
            .error_for_status()
            .map_err(fail)?
            .json::<T>()
            .await
            .map_err(fail)
    }
}

#[async_trait]
impl SourceHost for GitHubClient {
    #[instrument(skip(self, pr), fields(repo = %pr.repo, pr = pr.number))]
    async fn labels(&self, pr: &PullRequestRef) -> Result<Vec<Label>, GitHubError> {
        let endpoint = self.endpoint(pr, &format!("pulls/{}", pr.number));
        debug!("fetching PR labels from GitHub API");
        let payload: PullRequestPayload = self.get_json(&endpoint).await?;
        let labels = payload.labels.unwrap_or_default();
        debug!(labels = labels.len(), "received PR labels");
        Ok(labels)
    }

    #[instrument(skip(self, pr), fields(repo = %pr.repo, pr = pr.number))]
    async fn changed_files(&self, pr: &PullRequestRef) -> Result<Vec<ChangedFile>, GitHubError> {
        let endpoint = self.endpoint(pr, &format!("pulls/{}/files", pr.number));
        debug!("fetching changed files from GitHub API");
        let files: Vec<ChangedFile> = self.get_json(&endpoint).await?;
        debug!(files = files.len(), "received changed files");
        Ok(files)
    }

    #[instrument(skip(self, pr, body), fields(repo = %pr.repo, pr = pr.number, body_bytes = body.len()))]
    async fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<u16, GitHubError> {
        let endpoint = self.endpoint(pr, &format!("issues/{}/comments", pr.number));
        let fail = |source: reqwest::Error| GitHubError::Request {
            endpoint: endpoint.clone(),
            source,
        };
        debug!("posting comment to GitHub API");
        let response = self
            .request(Method::POST, &endpoint)
            .json(&CommentBody { body })
            .send()
            .await
            .map_err(fail)?
            .error_for_status()
            .map_err(fail)?;
        let status = response.status().as_u16();
        debug!(status, "comment request finished");
        Ok(status)
    }
}
