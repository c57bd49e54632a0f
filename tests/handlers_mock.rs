//! Handler-level tests against a recording mock client: valid input produces
//! exactly one client call carrying the input values verbatim; invalid input
//! never reaches the client at all.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::sync::Mutex;

use forgejo_mcp::handlers::{issues, pulls};
use forgejo_mcp::remote::{
    ClientInterface, Issue, IssueComment, IssuePatch, PullRequest, PullRequestComment,
    PullRequestPatch, RemoteError, StateFilter,
};

fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn sample_issue(number: i64) -> Issue {
    Issue {
        id: number * 100,
        number,
        title: format!("issue {}", number),
        body: None,
        state: "open".into(),
        author: Some("alice".into()),
        created_at: ts(),
        updated_at: ts(),
    }
}

fn sample_pull(number: i64) -> PullRequest {
    PullRequest {
        id: number * 100,
        number,
        title: format!("pr {}", number),
        body: None,
        state: "open".into(),
        author: Some("alice".into()),
        base_branch: Some("main".into()),
        merged: false,
        created_at: ts(),
        updated_at: ts(),
    }
}

fn sample_issue_comment(id: i64, body: &str) -> IssueComment {
    IssueComment {
        id,
        body: body.into(),
        author: Some("bob".into()),
        created_at: ts(),
        updated_at: ts(),
    }
}

fn sample_pull_comment(id: i64, body: &str) -> PullRequestComment {
    PullRequestComment {
        id,
        body: body.into(),
        author: Some("bob".into()),
        created_at: ts(),
        updated_at: ts(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    ListIssues(String, u32, u32),
    GetIssue(String, i64),
    CreateIssue(String, String, Option<String>),
    EditIssue(String, i64, IssuePatch),
    CreateIssueComment(String, i64, String),
    ListIssueComments(String, i64, u32, u32),
    EditIssueComment(String, i64, String),
    ListPullRequests(String, u32, u32, &'static str),
    GetPullRequest(String, i64),
    CreatePullRequestComment(String, i64, String),
    ListPullRequestComments(String, i64, u32, u32),
    EditPullRequestComment(String, i64, String),
    EditPullRequest(String, i64, PullRequestPatch),
}

/// Records every call; optionally fails each one with a not-found error.
#[derive(Debug, Default)]
struct MockClient {
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl MockClient {
    fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn fail_check(&self, operation: &'static str) -> Result<(), RemoteError> {
        if self.fail {
            Err(RemoteError::NotFound { operation })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ClientInterface for MockClient {
    async fn list_issues(
        &self,
        repo: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Issue>, RemoteError> {
        self.record(Call::ListIssues(repo.into(), limit, offset));
        self.fail_check("list issues")?;
        Ok(vec![sample_issue(1), sample_issue(2)])
    }

    async fn get_issue(&self, repo: &str, number: i64) -> Result<Issue, RemoteError> {
        self.record(Call::GetIssue(repo.into(), number));
        self.fail_check("get issue")?;
        Ok(sample_issue(number))
    }

    async fn create_issue(
        &self,
        repo: &str,
        title: &str,
        body: Option<&str>,
    ) -> Result<Issue, RemoteError> {
        self.record(Call::CreateIssue(
            repo.into(),
            title.into(),
            body.map(Into::into),
        ));
        self.fail_check("create issue")?;
        Ok(sample_issue(7))
    }

    async fn edit_issue(
        &self,
        repo: &str,
        number: i64,
        patch: &IssuePatch,
    ) -> Result<Issue, RemoteError> {
        self.record(Call::EditIssue(repo.into(), number, patch.clone()));
        self.fail_check("edit issue")?;
        Ok(sample_issue(number))
    }

    async fn create_issue_comment(
        &self,
        repo: &str,
        issue_number: i64,
        body: &str,
    ) -> Result<IssueComment, RemoteError> {
        self.record(Call::CreateIssueComment(
            repo.into(),
            issue_number,
            body.into(),
        ));
        self.fail_check("create issue comment")?;
        Ok(sample_issue_comment(41, body))
    }

    async fn list_issue_comments(
        &self,
        repo: &str,
        issue_number: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<IssueComment>, RemoteError> {
        self.record(Call::ListIssueComments(
            repo.into(),
            issue_number,
            limit,
            offset,
        ));
        self.fail_check("list issue comments")?;
        Ok(vec![sample_issue_comment(1, "hi")])
    }

    async fn edit_issue_comment(
        &self,
        repo: &str,
        comment_id: i64,
        body: &str,
    ) -> Result<IssueComment, RemoteError> {
        self.record(Call::EditIssueComment(repo.into(), comment_id, body.into()));
        self.fail_check("edit issue comment")?;
        Ok(sample_issue_comment(comment_id, body))
    }

    async fn list_pull_requests(
        &self,
        repo: &str,
        limit: u32,
        offset: u32,
        state: StateFilter,
    ) -> Result<Vec<PullRequest>, RemoteError> {
        self.record(Call::ListPullRequests(
            repo.into(),
            limit,
            offset,
            state.as_str(),
        ));
        self.fail_check("list pull requests")?;
        Ok(vec![sample_pull(3)])
    }

    async fn get_pull_request(
        &self,
        repo: &str,
        number: i64,
    ) -> Result<PullRequest, RemoteError> {
        self.record(Call::GetPullRequest(repo.into(), number));
        self.fail_check("get pull request")?;
        Ok(sample_pull(number))
    }

    async fn create_pull_request_comment(
        &self,
        repo: &str,
        pr_number: i64,
        body: &str,
    ) -> Result<PullRequestComment, RemoteError> {
        self.record(Call::CreatePullRequestComment(
            repo.into(),
            pr_number,
            body.into(),
        ));
        self.fail_check("create pull request comment")?;
        Ok(sample_pull_comment(51, body))
    }

    async fn list_pull_request_comments(
        &self,
        repo: &str,
        pr_number: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PullRequestComment>, RemoteError> {
        self.record(Call::ListPullRequestComments(
            repo.into(),
            pr_number,
            limit,
            offset,
        ));
        self.fail_check("list pull request comments")?;
        Ok(vec![sample_pull_comment(1, "hi")])
    }

    async fn edit_pull_request_comment(
        &self,
        repo: &str,
        comment_id: i64,
        body: &str,
    ) -> Result<PullRequestComment, RemoteError> {
        self.record(Call::EditPullRequestComment(
            repo.into(),
            comment_id,
            body.into(),
        ));
        self.fail_check("edit pull request comment")?;
        Ok(sample_pull_comment(comment_id, body))
    }

    async fn edit_pull_request(
        &self,
        repo: &str,
        number: i64,
        patch: &PullRequestPatch,
    ) -> Result<PullRequest, RemoteError> {
        self.record(Call::EditPullRequest(repo.into(), number, patch.clone()));
        self.fail_check("edit pull request")?;
        Ok(sample_pull(number))
    }
}

#[tokio::test]
async fn issue_comment_create_passes_values_through_verbatim() {
    let mock = MockClient::default();
    let out = issues::issue_comment_create(
        &mock,
        json!({"repository": "acme/widgets", "issue_number": 5, "comment": "looks good"}),
    )
    .await;
    assert_eq!(out["isError"], false);
    assert_eq!(out["structuredContent"]["id"], 41);
    assert_eq!(
        mock.calls(),
        vec![Call::CreateIssueComment(
            "acme/widgets".into(),
            5,
            "looks good".into()
        )]
    );
}

#[tokio::test]
async fn issue_comment_create_rejects_bad_repository_before_io() {
    let mock = MockClient::default();
    let out = issues::issue_comment_create(
        &mock,
        json!({"repository": "acme-widgets", "issue_number": 5, "comment": "x"}),
    )
    .await;
    assert_eq!(out["isError"], true);
    let text = out["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("owner/repo"), "{text}");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn pr_list_rejects_zero_limit_before_io() {
    let mock = MockClient::default();
    let out = pulls::pr_list(
        &mock,
        json!({"repository": "a/b", "limit": 0, "offset": 0}),
    )
    .await;
    assert_eq!(out["isError"], true);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn issue_comment_edit_rejects_blank_content_before_io() {
    let mock = MockClient::default();
    let out = issues::issue_comment_edit(
        &mock,
        json!({"repository": "a/b", "comment_id": 9, "new_content": "   "}),
    )
    .await;
    assert_eq!(out["isError"], true);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn pr_list_defaults_limit_and_state() {
    let mock = MockClient::default();
    let out = pulls::pr_list(&mock, json!({"repository": "a/b"})).await;
    assert_eq!(out["isError"], false);
    assert_eq!(
        mock.calls(),
        vec![Call::ListPullRequests("a/b".into(), 15, 0, "open")]
    );
}

#[tokio::test]
async fn pr_list_translates_state_filter() {
    let mock = MockClient::default();
    let out = pulls::pr_list(
        &mock,
        json!({"repository": "a/b", "limit": 30, "offset": 60, "state": "all"}),
    )
    .await;
    assert_eq!(out["isError"], false);
    assert_eq!(
        mock.calls(),
        vec![Call::ListPullRequests("a/b".into(), 30, 60, "all")]
    );
}

#[tokio::test]
async fn pr_edit_requires_at_least_one_field() {
    let mock = MockClient::default();
    let out = pulls::pr_edit(&mock, json!({"repository": "a/b", "pr_number": 2})).await;
    assert_eq!(out["isError"], true);
    let text = out["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("at least one"), "{text}");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn pr_edit_builds_partial_patch() {
    let mock = MockClient::default();
    let out = pulls::pr_edit(
        &mock,
        json!({"repository": "a/b", "pr_number": 2, "title": "new title", "base": "develop"}),
    )
    .await;
    assert_eq!(out["isError"], false);
    assert_eq!(
        mock.calls(),
        vec![Call::EditPullRequest(
            "a/b".into(),
            2,
            PullRequestPatch {
                title: Some("new title".into()),
                body: None,
                state: None,
                base_branch: Some("develop".into()),
            }
        )]
    );
}

#[tokio::test]
async fn multiple_violations_are_reported_together() {
    let mock = MockClient::default();
    let out = issues::issue_comment_create(
        &mock,
        json!({"repository": "bad", "issue_number": 0, "comment": " "}),
    )
    .await;
    assert_eq!(out["isError"], true);
    let text = out["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("repository:"), "{text}");
    assert!(text.contains("issue_number:"), "{text}");
    assert!(text.contains("comment:"), "{text}");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn remote_error_names_the_operation() {
    let mock = MockClient::failing();
    let out = issues::issue_get(&mock, json!({"repository": "a/b", "issue_number": 3})).await;
    assert_eq!(out["isError"], true);
    let text = out["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("failed to get issue"), "{text}");
    assert!(text.contains("not found"), "{text}");
    assert!(out.get("structuredContent").is_none());
    // The failed call still counts as exactly one attempt, never retried.
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn undecodable_arguments_produce_error_envelope() {
    let mock = MockClient::default();
    let out = issues::issue_list(&mock, json!({"repository": 7})).await;
    assert_eq!(out["isError"], true);
    assert!(mock.calls().is_empty());
}
