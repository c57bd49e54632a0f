use serde_json::{json, Value};

use super::{decode, page_args};
use crate::mcp;
use crate::remote::{ClientInterface, PullRequestPatch, StateFilter};
use crate::tools::{
    PrCommentCreateArgs, PrCommentEditArgs, PrCommentListArgs, PrEditArgs, PrGetArgs, PrListArgs,
};
use crate::validate;

pub async fn pr_list(client: &dyn ClientInterface, args: Value) -> Value {
    let input: PrListArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    let state = input
        .state
        .as_deref()
        .and_then(StateFilter::parse)
        .unwrap_or(StateFilter::Open);
    let (limit, offset) = page_args(input.limit, input.offset);
    match client
        .list_pull_requests(&input.repository, limit, offset, state)
        .await
    {
        Ok(pulls) => mcp::tool_success(
            format!(
                "found {} {} pull requests in {}",
                pulls.len(),
                state.as_str(),
                input.repository
            ),
            json!({ "items": pulls }),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn pr_get(client: &dyn ClientInterface, args: Value) -> Value {
    let input: PrGetArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    match client
        .get_pull_request(&input.repository, input.pr_number)
        .await
    {
        Ok(pull) => mcp::tool_success(
            format!(
                "pull request #{} in {}: {}",
                pull.number, input.repository, pull.title
            ),
            json!(pull),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn pr_comment_create(client: &dyn ClientInterface, args: Value) -> Value {
    let input: PrCommentCreateArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    match client
        .create_pull_request_comment(&input.repository, input.pr_number, &input.comment)
        .await
    {
        Ok(comment) => mcp::tool_success(
            format!(
                "created comment {} on pull request #{} in {} at {}",
                comment.id,
                input.pr_number,
                input.repository,
                comment.created_at.to_rfc3339()
            ),
            json!(comment),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn pr_comment_list(client: &dyn ClientInterface, args: Value) -> Value {
    let input: PrCommentListArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    let (limit, offset) = page_args(input.limit, input.offset);
    match client
        .list_pull_request_comments(&input.repository, input.pr_number, limit, offset)
        .await
    {
        Ok(comments) => mcp::tool_success(
            format!(
                "found {} comments on pull request #{} in {}",
                comments.len(),
                input.pr_number,
                input.repository
            ),
            json!({ "items": comments }),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}

pub async fn pr_comment_edit(client: &dyn ClientInterface, args: Value) -> Value {
    let input: PrCommentEditArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    match client
        .edit_pull_request_comment(&input.repository, input.comment_id, &input.new_content)
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

pub async fn pr_edit(client: &dyn ClientInterface, args: Value) -> Value {
    let input: PrEditArgs = match decode(args) {
        Ok(v) => v,
        Err(e) => return e,
    };
    if let Err(violations) = input.validate() {
        return mcp::tool_error(validate::describe(&violations));
    }
    let patch = PullRequestPatch {
        title: input.title.clone(),
        body: input.body.clone(),
        state: input.state.clone(),
        base_branch: input.base.clone(),
    };
    match client
        .edit_pull_request(&input.repository, input.pr_number, &patch)
        .await
    {
        Ok(pull) => mcp::tool_success(
            format!(
                "updated pull request #{} in {}",
                pull.number, input.repository
            ),
            json!(pull),
        ),
        Err(e) => mcp::tool_error(e.to_string()),
    }
}
