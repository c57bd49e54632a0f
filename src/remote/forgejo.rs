//! Forgejo backend. Forgejo keeps API compatibility with Gitea under
//! `/api/v1`, so the call shapes mirror the Gitea adapter, but the wire types
//! are owned here: Forgejo payloads are allowed to drift (they already carry
//! `username` alongside `login` on user objects).

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
pub struct ForgejoClient {
    rest: RestClient,
}

impl ForgejoClient {
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

fn page_query(limit: u32, offset: u32) -> [(&'static str, String); 2] {
    [
        ("limit", limit.to_string()),
        ("page", page_for(limit, offset).to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct WireUser {
    login: Option<String>,
    username: Option<String>,
}

impl WireUser {
    fn name(self) -> Option<String> {
        self.login.or(self.username)
    }
}

#[derive(Debug, Deserialize)]
struct WireIssue {
    id: i64,
    number: i64,
    title: String,
    body: Option<String>,
    state: String,
    user: Option<WireUser>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn map_issue(w: WireIssue) -> Issue {
    Issue {
        id: w.id,
        number: w.number,
        title: w.title,
        body: w.body.filter(|b| !b.is_empty()),
        state: w.state,
        author: w.user.and_then(WireUser::name),
        created_at: w.created_at,
        updated_at: w.updated_at,
    }
}

#[derive(Debug, Deserialize)]
struct WireComment {
    id: i64,
    #[serde(default)]
    body: String,
    user: Option<WireUser>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn map_issue_comment(w: WireComment) -> IssueComment {
    IssueComment {
        id: w.id,
        body: w.body,
        author: w.user.and_then(WireUser::name),
        created_at: w.created_at,
        updated_at: w.updated_at,
    }
}

fn map_pull_comment(w: WireComment) -> PullRequestComment {
    PullRequestComment {
        id: w.id,
        body: w.body,
        author: w.user.and_then(WireUser::name),
        created_at: w.created_at,
        updated_at: w.updated_at,
    }
}

#[derive(Debug, Deserialize)]
struct WireBranchRef {
    #[serde(rename = "ref")]
    ref_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WirePull {
    id: i64,
    number: i64,
    title: String,
    body: Option<String>,
    state: String,
    user: Option<WireUser>,
    base: Option<WireBranchRef>,
    #[serde(default)]
    merged: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn map_pull(w: WirePull) -> PullRequest {
    PullRequest {
        id: w.id,
        number: w.number,
        title: w.title,
        body: w.body.filter(|b| !b.is_empty()),
        state: w.state,
        author: w.user.and_then(WireUser::name),
        base_branch: w.base.and_then(|b| b.ref_name),
        merged: w.merged,
        created_at: w.created_at,
        updated_at: w.updated_at,
    }
}

fn sparse_body(fields: &[(&str, &Option<String>)]) -> Value {
    let mut body = Map::new();
    for (key, value) in fields {
        if let Some(value) = value {
            body.insert((*key).to_string(), Value::String(value.clone()));
        }
    }
    Value::Object(body)
}

#[async_trait]
impl ClientInterface for ForgejoClient {
    async fn list_issues(
        &self,
        repo: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Issue>, RemoteError> {
        let [l, p] = page_query(limit, offset);
        // type=issues keeps pull requests out of the issue listing.
        let query = [("type", "issues".to_string()), l, p];
        let wire: Vec<WireIssue> = self
            .rest
            .get_json("list issues", &format!("{}/issues", Self::repo_path(repo)), &query)
            .await?;
        Ok(wire.into_iter().map(map_issue).collect())
    }

    async fn get_issue(&self, repo: &str, number: i64) -> Result<Issue, RemoteError> {
        let wire: WireIssue = self
            .rest
            .get_json(
                "get issue",
                &format!("{}/issues/{}", Self::repo_path(repo), number),
                &[],
            )
            .await?;
        Ok(map_issue(wire))
    }

    async fn create_issue(
        &self,
        repo: &str,
        title: &str,
        body: Option<&str>,
    ) -> Result<Issue, RemoteError> {
        let payload = serde_json::json!({ "title": title, "body": body.unwrap_or_default() });
        let wire: WireIssue = self
            .rest
            .post_json(
                "create issue",
                &format!("{}/issues", Self::repo_path(repo)),
                &payload,
            )
            .await?;
        Ok(map_issue(wire))
    }

    async fn edit_issue(
        &self,
        repo: &str,
        number: i64,
        patch: &IssuePatch,
    ) -> Result<Issue, RemoteError> {
        let payload = sparse_body(&[
            ("title", &patch.title),
            ("body", &patch.body),
            ("state", &patch.state),
        ]);
        let wire: WireIssue = self
            .rest
            .patch_json(
                "edit issue",
                &format!("{}/issues/{}", Self::repo_path(repo), number),
                &payload,
            )
            .await?;
        Ok(map_issue(wire))
    }

    async fn create_issue_comment(
        &self,
        repo: &str,
        issue_number: i64,
        body: &str,
    ) -> Result<IssueComment, RemoteError> {
        let payload = serde_json::json!({ "body": body });
        let wire: WireComment = self
            .rest
            .post_json(
                "create issue comment",
                &format!("{}/issues/{}/comments", Self::repo_path(repo), issue_number),
                &payload,
            )
            .await?;
        Ok(map_issue_comment(wire))
    }

    async fn list_issue_comments(
        &self,
        repo: &str,
        issue_number: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<IssueComment>, RemoteError> {
        let wire: Vec<WireComment> = self
            .rest
            .get_json(
                "list issue comments",
                &format!("{}/issues/{}/comments", Self::repo_path(repo), issue_number),
                &page_query(limit, offset),
            )
            .await?;
        Ok(wire.into_iter().map(map_issue_comment).collect())
    }

    async fn edit_issue_comment(
        &self,
        repo: &str,
        comment_id: i64,
        body: &str,
    ) -> Result<IssueComment, RemoteError> {
        let payload = serde_json::json!({ "body": body });
        let wire: WireComment = self
            .rest
            .patch_json(
                "edit issue comment",
                &format!("{}/issues/comments/{}", Self::repo_path(repo), comment_id),
                &payload,
            )
            .await?;
        Ok(map_issue_comment(wire))
    }

    async fn list_pull_requests(
        &self,
        repo: &str,
        limit: u32,
        offset: u32,
        state: StateFilter,
    ) -> Result<Vec<PullRequest>, RemoteError> {
        let [l, p] = page_query(limit, offset);
        let query = [("state", state.as_str().to_string()), l, p];
        let wire: Vec<WirePull> = self
            .rest
            .get_json(
                "list pull requests",
                &format!("{}/pulls", Self::repo_path(repo)),
                &query,
            )
            .await?;
        Ok(wire.into_iter().map(map_pull).collect())
    }

    async fn get_pull_request(
        &self,
        repo: &str,
        number: i64,
    ) -> Result<PullRequest, RemoteError> {
        let wire: WirePull = self
            .rest
            .get_json(
                "get pull request",
                &format!("{}/pulls/{}", Self::repo_path(repo), number),
                &[],
            )
            .await?;
        Ok(map_pull(wire))
    }

    async fn create_pull_request_comment(
        &self,
        repo: &str,
        pr_number: i64,
        body: &str,
    ) -> Result<PullRequestComment, RemoteError> {
        // Discussion comments on a PR live on the issues comments endpoint.
        let payload = serde_json::json!({ "body": body });
        let wire: WireComment = self
            .rest
            .post_json(
                "create pull request comment",
                &format!("{}/issues/{}/comments", Self::repo_path(repo), pr_number),
                &payload,
            )
            .await?;
        Ok(map_pull_comment(wire))
    }

    async fn list_pull_request_comments(
        &self,
        repo: &str,
        pr_number: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PullRequestComment>, RemoteError> {
        let wire: Vec<WireComment> = self
            .rest
            .get_json(
                "list pull request comments",
                &format!("{}/issues/{}/comments", Self::repo_path(repo), pr_number),
                &page_query(limit, offset),
            )
            .await?;
        Ok(wire.into_iter().map(map_pull_comment).collect())
    }

    async fn edit_pull_request_comment(
        &self,
        repo: &str,
        comment_id: i64,
        body: &str,
    ) -> Result<PullRequestComment, RemoteError> {
        let payload = serde_json::json!({ "body": body });
        let wire: WireComment = self
            .rest
            .patch_json(
                "edit pull request comment",
                &format!("{}/issues/comments/{}", Self::repo_path(repo), comment_id),
                &payload,
            )
            .await?;
        Ok(map_pull_comment(wire))
    }

    async fn edit_pull_request(
        &self,
        repo: &str,
        number: i64,
        patch: &PullRequestPatch,
    ) -> Result<PullRequest, RemoteError> {
        let payload = sparse_body(&[
            ("title", &patch.title),
            ("body", &patch.body),
            ("state", &patch.state),
            ("base", &patch.base_branch),
        ]);
        let wire: WirePull = self
            .rest
            .patch_json(
                "edit pull request",
                &format!("{}/pulls/{}", Self::repo_path(repo), number),
                &payload,
            )
            .await?;
        Ok(map_pull(wire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_body_skips_missing_fields() {
        let v = sparse_body(&[
            ("title", &Some("t".to_string())),
            ("body", &None),
            ("base", &Some("main".to_string())),
        ]);
        assert_eq!(v["title"], "t");
        assert_eq!(v["base"], "main");
        assert!(v.get("body").is_none());
    }

    #[test]
    fn wire_user_prefers_login() {
        let u = WireUser {
            login: Some("alice".into()),
            username: Some("alice-legacy".into()),
        };
        assert_eq!(u.name().as_deref(), Some("alice"));
        let u = WireUser {
            login: None,
            username: Some("bob".into()),
        };
        assert_eq!(u.name().as_deref(), Some("bob"));
    }
}
