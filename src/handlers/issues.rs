use serde_json::{json, Value};

use super::{decode, page_args};
use crate::mcp;
use crate::remote::{ClientInterface, IssuePatch};
use crate::tools::{
    IssueCommentCreateArgs, IssueCommentEditArgs, IssueCommentListArgs, IssueCreateArgs,
    IssueEditArgs, IssueGetArgs, IssueListArgs,
};
use crate::validate;

pub async fn issue_list(client: &dyn ClientInterface, args: Value) -> Value {
    let input: IssueListArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    let (limit, offset) = page_args(input.limit, input.offset);
    match client.list_issues(&input.repository, limit, offset).await {
        Ok(issues) => mcp::tool_success(
            format!("found {} issues in {}", issues.len(), input.repository),
            json!({ "items": issues }),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn issue_get(client: &dyn ClientInterface, args: Value) -> Value {
    let input: IssueGetArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    match client.get_issue(&input.repository, input.issue_number).await {
        Ok(issue) => mcp::tool_success(
            format!(
                "issue #{} in {}: {}",
                issue.number, input.repository, issue.title
            ),
            json!(issue),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn issue_create(client: &dyn ClientInterface, args: Value) -> Value {
    let input: IssueCreateArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    match client
        .create_issue(&input.repository, &input.title, input.body.as_deref())
        .await
    {
        Ok(issue) => mcp::tool_success(
            format!("created issue #{} in {}", issue.number, input.repository),
            json!(issue),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn issue_edit(client: &dyn ClientInterface, args: Value) -> Value {
    let input: IssueEditArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    let patch = IssuePatch {
        title: input.title.clone(),
        body: input.body.clone(),
        state: input.state.clone(),
    };
    match client
        .edit_issue(&input.repository, input.issue_number, &patch)
        .await
    {
        Ok(issue) => mcp::tool_success(
            format!("updated issue #{} in {}", issue.number, input.repository),
            json!(issue),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn issue_comment_create(client: &dyn ClientInterface, args: Value) -> Value {
    let input: IssueCommentCreateArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    match client
        .create_issue_comment(&input.repository, input.issue_number, &input.comment)
        .await
    {
        Ok(comment) => mcp::tool_success(
            format!(
                "created comment {} on issue #{} in {} at {}",
                comment.id,
                input.issue_number,
                input.repository,
                comment.created_at.to_rfc3339()
            ),
            json!(comment),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn issue_comment_list(client: &dyn ClientInterface, args: Value) -> Value {
    let input: IssueCommentListArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    let (limit, offset) = page_args(input.limit, input.offset);
    match client
        .list_issue_comments(&input.repository, input.issue_number, limit, offset)
        .await
    {
        Ok(comments) => mcp::tool_success(
            format!(
                "found {} comments on issue #{} in {}",
                comments.len(),
                input.issue_number,
                input.repository
            ),
            json!({ "items": comments }),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn issue_comment_edit(client: &dyn ClientInterface, args: Value) -> Value {
    let input: IssueCommentEditArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    match client
        .edit_issue_comment(&input.repository, input.comment_id, &input.new_content)
        .await
    {
        Ok(comment) => mcp::tool_success(
            format!(
                "updated comment {} in {} at {}",
                comment.id,
                input.repository,
                comment.updated_at.to_rfc3339()
            ),
            json!(comment),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}
