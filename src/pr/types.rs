use serde::Deserialize;
use std::fmt;

/// Owner and name of a GitHub repository, parsed from `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The pull request a run is about. Built once from the event payload.
#[derive(Debug, Clone)]
pub struct PullRequestRef {
    pub repo: RepoName,
    /// PR number (e.g., 42)
    pub number: u64,
}

/// A label attached to a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
}

/// One entry of the "files changed" listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangedFile {
    /// File path (e.g., "src/auth/config.rs")
    pub filename: String,
    /// Unified diff fragment; GitHub omits it for binary and some renamed files
    #[serde(default)]
    pub patch: Option<String>,
}

/// The subset of the pull request resource the label gate reads.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PullRequestPayload {
    #[serde(default)]
    pub labels: Option<Vec<Label>>,
}
