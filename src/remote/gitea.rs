//! Gitea backend: REST calls against `/api/v1`, mapping Gitea wire shapes
//! into the normalized records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::remote::http::{encode_segment, InitError, RestClient};
use crate::remote::{
    page_for, split_repo, ClientInterface, Issue, IssueComment, IssuePatch, PullRequest,
    PullRequestComment, PullRequestPatch, RemoteError, StateFilter,
};

#[derive(Debug, Clone)]
pub struct GiteaClient {
    rest: RestClient,
}

impl GiteaClient {
    pub fn new(cfg: &Config) -> Result<Self, InitError> {
        Ok(Self {
            rest: RestClient::new(cfg)?,
        })
    }

    fn repo_path(repo: &str) -> String {
        let (owner, name) = split_repo(repo);
        format!("/repos/{}/{}", encode_segment(owner), encode_segment(name))
    }
}

#[derive(Debug, Deserialize)]
struct GiteaUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GiteaIssue {
    id: i64,
    number: i64,
    title: String,
    body: Option<String>,
    state: String,
    user: Option<GiteaUser>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GiteaIssue> for Issue {
    fn from(w: GiteaIssue) -> Self {
        Issue {
            id: w.id,
            number: w.number,
            title: w.title,
            body: w.body.filter(|b| !b.is_empty()),
            state: w.state,
            author: w.user.map(|u| u.login),
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GiteaComment {
    id: i64,
    #[serde(default)]
    body: String,
    user: Option<GiteaUser>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GiteaComment> for IssueComment {
    fn from(w: GiteaComment) -> Self {
        IssueComment {
            id: w.id,
            body: w.body,
            author: w.user.map(|u| u.login),
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

impl From<GiteaComment> for PullRequestComment {
    fn from(w: GiteaComment) -> Self {
        PullRequestComment {
            id: w.id,
            body: w.body,
            author: w.user.map(|u| u.login),
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GiteaBranchRef {
    #[serde(rename = "ref")]
    ref_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GiteaPull {
    id: i64,
    number: i64,
    title: String,
    body: Option<String>,
    state: String,
    user: Option<GiteaUser>,
    base: Option<GiteaBranchRef>,
    #[serde(default)]
    merged: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GiteaPull> for PullRequest {
    fn from(w: GiteaPull) -> Self {
        PullRequest {
            id: w.id,
            number: w.number,
            title: w.title,
            body: w.body.filter(|b| !b.is_empty()),
            state: w.state,
            author: w.user.map(|u| u.login),
            base_branch: w.base.and_then(|b| b.ref_name),
            merged: w.merged,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

fn issue_patch_body(patch: &IssuePatch) -> Value {
    let mut body = Map::new();
    if let Some(title) = &patch.title {
        body.insert("title".into(), Value::String(title.clone()));
    }
    if let Some(text) = &patch.body {
        body.insert("body".into(), Value::String(text.clone()));
    }
    if let Some(state) = &patch.state {
        body.insert("state".into(), Value::String(state.clone()));
    }
    Value::Object(body)
}

fn pull_patch_body(patch: &PullRequestPatch) -> Value {
    let mut body = Map::new();
    if let Some(title) = &patch.title {
        body.insert("title".into(), Value::String(title.clone()));
    }
    if let Some(text) = &patch.body {
        body.insert("body".into(), Value::String(text.clone()));
    }
    if let Some(state) = &patch.state {
        body.insert("state".into(), Value::String(state.clone()));
    }
    if let Some(base) = &patch.base_branch {
        body.insert("base".into(), Value::String(base.clone()));
    }
    Value::Object(body)
}

#[async_trait]
impl ClientInterface for GiteaClient {
    async fn list_issues(
        &self,
        repo: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Issue>, RemoteError> {
        // type=issues keeps pull requests out of the issue listing.
        let query = [
            ("type", "issues".to_string()),
            ("limit", limit.to_string()),
            ("page", page_for(limit, offset).to_string()),
        ];
        let wire: Vec<GiteaIssue> = self
            .rest
            .get_json("list issues", &format!("{}/issues", Self::repo_path(repo)), &query)
            .await?;
        Ok(wire.into_iter().map(Issue::from).collect())
    }

    async fn get_issue(&self, repo: &str, number: i64) -> Result<Issue, RemoteError> {
        let wire: GiteaIssue = self
            .rest
            .get_json(
                "get issue",
                &format!("{}/issues/{}", Self::repo_path(repo), number),
                &[],
            )
            .await?;
        Ok(wire.into())
    }

    async fn create_issue(
        &self,
        repo: &str,
        title: &str,
        body: Option<&str>,
    ) -> Result<Issue, RemoteError> {
        let payload = serde_json::json!({ "title": title, "body": body.unwrap_or_default() });
        let wire: GiteaIssue = self
            .rest
            .post_json(
                "create issue",
                &format!("{}/issues", Self::repo_path(repo)),
                &payload,
            )
            .await?;
        Ok(wire.into())
    }

    async fn edit_issue(
        &self,
        repo: &str,
        number: i64,
        patch: &IssuePatch,
    ) -> Result<Issue, RemoteError> {
        let wire: GiteaIssue = self
            .rest
            .patch_json(
                "edit issue",
                &format!("{}/issues/{}", Self::repo_path(repo), number),
                &issue_patch_body(patch),
            )
            .await?;
        Ok(wire.into())
    }

    async fn create_issue_comment(
        &self,
        repo: &str,
        issue_number: i64,
        body: &str,
    ) -> Result<IssueComment, RemoteError> {
        let payload = serde_json::json!({ "body": body });
        let wire: GiteaComment = self
            .rest
            .post_json(
                "create issue comment",
                &format!("{}/issues/{}/comments", Self::repo_path(repo), issue_number),
                &payload,
            )
            .await?;
        Ok(wire.into())
    }

    async fn list_issue_comments(
        &self,
        repo: &str,
        issue_number: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<IssueComment>, RemoteError> {
        let query = [
            ("limit", limit.to_string()),
            ("page", page_for(limit, offset).to_string()),
        ];
        let wire: Vec<GiteaComment> = self
            .rest
            .get_json(
                "list issue comments",
                &format!("{}/issues/{}/comments", Self::repo_path(repo), issue_number),
                &query,
            )
            .await?;
        Ok(wire.into_iter().map(IssueComment::from).collect())
    }

    async fn edit_issue_comment(
        &self,
        repo: &str,
        comment_id: i64,
        body: &str,
    ) -> Result<IssueComment, RemoteError> {
        let payload = serde_json::json!({ "body": body });
        let wire: GiteaComment = self
            .rest
            .patch_json(
                "edit issue comment",
                &format!("{}/issues/comments/{}", Self::repo_path(repo), comment_id),
                &payload,
            )
            .await?;
        Ok(wire.into())
    }

    async fn list_pull_requests(
        &self,
        repo: &str,
        limit: u32,
        offset: u32,
        state: StateFilter,
    ) -> Result<Vec<PullRequest>, RemoteError> {
        let query = [
            ("state", state.as_str().to_string()),
            ("limit", limit.to_string()),
            ("page", page_for(limit, offset).to_string()),
        ];
        let wire: Vec<GiteaPull> = self
            .rest
            .get_json(
                "list pull requests",
                &format!("{}/pulls", Self::repo_path(repo)),
                &query,
            )
            .await?;
        Ok(wire.into_iter().map(PullRequest::from).collect())
    }

    async fn get_pull_request(
        &self,
        repo: &str,
        number: i64,
    ) -> Result<PullRequest, RemoteError> {
        let wire: GiteaPull = self
            .rest
            .get_json(
                "get pull request",
                &format!("{}/pulls/{}", Self::repo_path(repo), number),
                &[],
            )
            .await?;
        Ok(wire.into())
    }

    async fn create_pull_request_comment(
        &self,
        repo: &str,
        pr_number: i64,
        body: &str,
    ) -> Result<PullRequestComment, RemoteError> {
        // Discussion comments on a PR live on the issues comments endpoint.
        let payload = serde_json::json!({ "body": body });
        let wire: GiteaComment = self
            .rest
            .post_json(
                "create pull request comment",
                &format!("{}/issues/{}/comments", Self::repo_path(repo), pr_number),
                &payload,
            )
            .await?;
        Ok(wire.into())
    }

    async fn list_pull_request_comments(
        &self,
        repo: &str,
        pr_number: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PullRequestComment>, RemoteError> {
        let query = [
            ("limit", limit.to_string()),
            ("page", page_for(limit, offset).to_string()),
        ];
        let wire: Vec<GiteaComment> = self
            .rest
            .get_json(
                "list pull request comments",
                &format!("{}/issues/{}/comments", Self::repo_path(repo), pr_number),
                &query,
            )
            .await?;
        Ok(wire.into_iter().map(PullRequestComment::from).collect())
    }

    async fn edit_pull_request_comment(
        &self,
        repo: &str,
        comment_id: i64,
        body: &str,
    ) -> Result<PullRequestComment, RemoteError> {
        let payload = serde_json::json!({ "body": body });
        let wire: GiteaComment = self
            .rest
            .patch_json(
                "edit pull request comment",
                &format!("{}/issues/comments/{}", Self::repo_path(repo), comment_id),
                &payload,
            )
            .await?;
        Ok(wire.into())
    }

    async fn edit_pull_request(
        &self,
        repo: &str,
        number: i64,
        patch: &PullRequestPatch,
    ) -> Result<PullRequest, RemoteError> {
        let wire: GiteaPull = self
            .rest
            .patch_json(
                "edit pull request",
                &format!("{}/pulls/{}", Self::repo_path(repo), number),
                &pull_patch_body(patch),
            )
            .await?;
        Ok(wire.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_bodies_carry_only_supplied_fields() {
        let p = PullRequestPatch {
            title: Some("t".into()),
            base_branch: Some("develop".into()),
            ..Default::default()
        };
        let v = pull_patch_body(&p);
        assert_eq!(v["title"], "t");
        assert_eq!(v["base"], "develop");
        assert!(v.get("body").is_none());
        assert!(v.get("state").is_none());

        let ip = IssuePatch {
            state: Some("closed".into()),
            ..Default::default()
        };
        let v = issue_patch_body(&ip);
        assert_eq!(v["state"], "closed");
        assert!(v.get("title").is_none());
    }
}
