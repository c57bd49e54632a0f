//! Capability contract over the Gitea/Forgejo API plus the normalized records
//! it returns. Handlers depend on [`ClientInterface`] only and never learn which
//! forge flavor they are talking to.
//!
//! Inputs arriving at this layer are already validated by the handler layer;
//! backends trust their caller and repeat no checks.

pub mod detect;
pub mod factory;
pub mod forgejo;
pub mod gitea;
pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// A forge API call that failed. Every variant names the attempted operation so
/// the handler layer can surface a causal chain without re-wrapping.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to {operation}: not found")]
    NotFound { operation: &'static str },
    #[error("failed to {operation}: remote returned {status}: {message}")]
    Api {
        operation: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("failed to {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Issue {
    pub id: i64,
    pub number: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PullRequest {
    pub id: i64,
    pub number: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
    pub merged: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IssueComment {
    pub id: i64,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PullRequestComment {
    pub id: i64,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for an issue; only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub state: Option<String>,
}

/// Partial update for a pull request; only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub state: Option<String>,
    pub base_branch: Option<String>,
}

/// State filter for pull request listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        }
    }

    /// Parse an already-validated state string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(StateFilter::Open),
            "closed" => Some(StateFilter::Closed),
            "all" => Some(StateFilter::All),
            _ => None,
        }
    }
}

/// The capability contract both backends satisfy. One method per forge
/// operation; `repo` is `"owner/repo"`, pagination is a 0-based offset with a
/// page size already clamped to [1, 100] upstream.
#[async_trait]
pub trait ClientInterface: Send + Sync + std::fmt::Debug {
    async fn list_issues(&self, repo: &str, limit: u32, offset: u32)
        -> Result<Vec<Issue>, RemoteError>;

    async fn get_issue(&self, repo: &str, number: i64) -> Result<Issue, RemoteError>;

    async fn create_issue(
        &self,
        repo: &str,
        title: &str,
        body: Option<&str>,
    ) -> Result<Issue, RemoteError>;

    async fn edit_issue(
        &self,
        repo: &str,
        number: i64,
        patch: &IssuePatch,
    ) -> Result<Issue, RemoteError>;

    async fn create_issue_comment(
        &self,
        repo: &str,
        issue_number: i64,
        body: &str,
    ) -> Result<IssueComment, RemoteError>;

    async fn list_issue_comments(
        &self,
        repo: &str,
        issue_number: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<IssueComment>, RemoteError>;

    async fn edit_issue_comment(
        &self,
        repo: &str,
        comment_id: i64,
        body: &str,
    ) -> Result<IssueComment, RemoteError>;

    async fn list_pull_requests(
        &self,
        repo: &str,
        limit: u32,
        offset: u32,
        state: StateFilter,
    ) -> Result<Vec<PullRequest>, RemoteError>;

    async fn get_pull_request(&self, repo: &str, number: i64)
        -> Result<PullRequest, RemoteError>;

    async fn create_pull_request_comment(
        &self,
        repo: &str,
        pr_number: i64,
        body: &str,
    ) -> Result<PullRequestComment, RemoteError>;

    async fn list_pull_request_comments(
        &self,
        repo: &str,
        pr_number: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PullRequestComment>, RemoteError>;

    async fn edit_pull_request_comment(
        &self,
        repo: &str,
        comment_id: i64,
        body: &str,
    ) -> Result<PullRequestComment, RemoteError>;

    async fn edit_pull_request(
        &self,
        repo: &str,
        number: i64,
        patch: &PullRequestPatch,
    ) -> Result<PullRequest, RemoteError>;
}

/// Split an already-validated `"owner/repo"` path into its segments.
pub(crate) fn split_repo(repo: &str) -> (&str, &str) {
    // The repository rule guarantees exactly one '/' by the time we get here.
    match repo.split_once('/') {
        Some((owner, name)) => (owner, name),
        None => (repo, ""),
    }
}

/// Translate a 0-based offset into the forge's 1-based page number.
pub(crate) fn page_for(limit: u32, offset: u32) -> u32 {
    offset / limit.max(1) + 1
}
