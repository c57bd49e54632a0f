//! Tool catalogue: descriptors advertised on tools/list and the typed
//! argument struct each handler decodes into. Every struct owns its
//! validation: the ordered per-field rule lists from `validate`, collected
//! across fields so one response names every bad argument.

use serde::{Deserialize, Serialize};

use crate::validate::{self, Violation, DEFAULT_LIMIT};

pub const PR_LIST_STATES: [&str; 3] = ["open", "closed", "all"];
pub const EDIT_STATES: [&str; 2] = ["open", "closed"];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

// ---------------------------------------------------------------------------
// Issues

#[derive(Debug, Deserialize)]
pub struct IssueListArgs {
    pub repository: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl IssueListArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::limit(&mut v, "limit", self.limit);
        validate::offset(&mut v, "offset", self.offset);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueGetArgs {
    pub repository: String,
    pub issue_number: i64,
}

impl IssueGetArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "issue_number", self.issue_number);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueCreateArgs {
    pub repository: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl IssueCreateArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::non_blank(&mut v, "title", &self.title);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueEditArgs {
    pub repository: String,
    pub issue_number: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl IssueEditArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "issue_number", self.issue_number);
        if self.title.is_none() && self.body.is_none() && self.state.is_none() {
            v.push(Violation {
                field: "fields",
                message: "at least one of title, body, state must be provided".to_string(),
            });
        }
        if let Some(title) = &self.title {
            validate::non_blank(&mut v, "title", title);
        }
        if let Some(state) = &self.state {
            validate::one_of(&mut v, "state", state, &EDIT_STATES);
        }
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueCommentCreateArgs {
    pub repository: String,
    pub issue_number: i64,
    pub comment: String,
}

impl IssueCommentCreateArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "issue_number", self.issue_number);
        validate::non_blank(&mut v, "comment", &self.comment);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueCommentListArgs {
    pub repository: String,
    pub issue_number: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl IssueCommentListArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "issue_number", self.issue_number);
        validate::limit(&mut v, "limit", self.limit);
        validate::offset(&mut v, "offset", self.offset);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueCommentEditArgs {
    pub repository: String,
    pub comment_id: i64,
    pub new_content: String,
}

impl IssueCommentEditArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "comment_id", self.comment_id);
        validate::non_blank(&mut v, "new_content", &self.new_content);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

// ---------------------------------------------------------------------------
// Pull requests

#[derive(Debug, Deserialize)]
pub struct PrListArgs {
    pub repository: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub state: Option<String>,
}

impl PrListArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::limit(&mut v, "limit", self.limit);
        validate::offset(&mut v, "offset", self.offset);
        if let Some(state) = &self.state {
            validate::one_of(&mut v, "state", state, &PR_LIST_STATES);
        }
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrGetArgs {
    pub repository: String,
    pub pr_number: i64,
}

impl PrGetArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "pr_number", self.pr_number);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrCommentCreateArgs {
    pub repository: String,
    pub pr_number: i64,
    pub comment: String,
}

impl PrCommentCreateArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "pr_number", self.pr_number);
        validate::non_blank(&mut v, "comment", &self.comment);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrCommentListArgs {
    pub repository: String,
    pub pr_number: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl PrCommentListArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "pr_number", self.pr_number);
        validate::limit(&mut v, "limit", self.limit);
        validate::offset(&mut v, "offset", self.offset);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrCommentEditArgs {
    pub repository: String,
    pub comment_id: i64,
    pub new_content: String,
}

impl PrCommentEditArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "comment_id", self.comment_id);
        validate::non_blank(&mut v, "new_content", &self.new_content);
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrEditArgs {
    pub repository: String,
    pub pr_number: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub base: Option<String>,
}

impl PrEditArgs {
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut v = Vec::new();
        validate::repository(&mut v, "repository", &self.repository);
        validate::positive(&mut v, "pr_number", self.pr_number);
        if self.title.is_none()
            && self.body.is_none()
            && self.state.is_none()
            && self.base.is_none()
        {
            v.push(Violation {
                field: "fields",
                message: "at least one of title, body, state, base must be provided".to_string(),
            });
        }
        if let Some(title) = &self.title {
            validate::non_blank(&mut v, "title", title);
        }
        if let Some(state) = &self.state {
            validate::one_of(&mut v, "state", state, &EDIT_STATES);
        }
        if let Some(base) = &self.base {
            validate::non_blank(&mut v, "base", base);
        }
        if v.is_empty() {
            Ok(())
        } else {
            Err(v)
        }
    }
}

// ---------------------------------------------------------------------------
// Descriptors

pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    let repository = serde_json::json!({
        "type": "string",
        "description": "Repository path in owner/repo format"
    });
    let limit = serde_json::json!({
        "type": "integer",
        "description": "Page size, 1-100 (default 15)"
    });
    let offset = serde_json::json!({"type": "integer", "description": "0-based result offset"});

    let issue_list = ToolDescriptor {
        name: "issue_list".into(),
        description: "List issues in a repository".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "limit": limit.clone(),
                "offset": offset.clone()
            },
            "required": ["repository"]
        }),
    };

    let issue_get = ToolDescriptor {
        name: "issue_get".into(),
        description: "Get a single issue by number".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "issue_number": {"type": "integer"}
            },
            "required": ["repository", "issue_number"]
        }),
    };

    let issue_create = ToolDescriptor {
        name: "issue_create".into(),
        description: "Create an issue".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "title": {"type": "string"},
                "body": {"type": "string"}
            },
            "required": ["repository", "title"]
        }),
    };

    let issue_edit = ToolDescriptor {
        name: "issue_edit".into(),
        description: "Edit an issue's title, body, or state".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "issue_number": {"type": "integer"},
                "title": {"type": "string"},
                "body": {"type": "string"},
                "state": {"type": "string", "enum": EDIT_STATES}
            },
            "required": ["repository", "issue_number"]
        }),
    };

    let issue_comment_create = ToolDescriptor {
        name: "issue_comment_create".into(),
        description: "Add a comment to an issue".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "issue_number": {"type": "integer"},
                "comment": {"type": "string"}
            },
            "required": ["repository", "issue_number", "comment"]
        }),
    };

    let issue_comment_list = ToolDescriptor {
        name: "issue_comment_list".into(),
        description: "List comments on an issue".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "issue_number": {"type": "integer"},
                "limit": limit.clone(),
                "offset": offset.clone()
            },
            "required": ["repository", "issue_number"]
        }),
    };

    let issue_comment_edit = ToolDescriptor {
        name: "issue_comment_edit".into(),
        description: "Replace the body of an issue comment".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "comment_id": {"type": "integer"},
                "new_content": {"type": "string"}
            },
            "required": ["repository", "comment_id", "new_content"]
        }),
    };

    let pr_list = ToolDescriptor {
        name: "pr_list".into(),
        description: "List pull requests".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "limit": limit.clone(),
                "offset": offset.clone(),
                "state": {"type": "string", "enum": PR_LIST_STATES}
            },
            "required": ["repository"]
        }),
    };

    let pr_get = ToolDescriptor {
        name: "pr_get".into(),
        description: "Get a single pull request by number".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "pr_number": {"type": "integer"}
            },
            "required": ["repository", "pr_number"]
        }),
    };

    let pr_comment_create = ToolDescriptor {
        name: "pr_comment_create".into(),
        description: "Add a comment to a pull request".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "pr_number": {"type": "integer"},
                "comment": {"type": "string"}
            },
            "required": ["repository", "pr_number", "comment"]
        }),
    };

    let pr_comment_list = ToolDescriptor {
        name: "pr_comment_list".into(),
        description: "List comments on a pull request".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "pr_number": {"type": "integer"},
                "limit": limit.clone(),
                "offset": offset.clone()
            },
            "required": ["repository", "pr_number"]
        }),
    };

    let pr_comment_edit = ToolDescriptor {
        name: "pr_comment_edit".into(),
        description: "Replace the body of a pull request comment".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "comment_id": {"type": "integer"},
                "new_content": {"type": "string"}
            },
            "required": ["repository", "comment_id", "new_content"]
        }),
    };

    let pr_edit = ToolDescriptor {
        name: "pr_edit".into(),
        description: "Edit a pull request's title, body, state, or base branch".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "repository": repository.clone(),
                "pr_number": {"type": "integer"},
                "title": {"type": "string"},
                "body": {"type": "string"},
                "state": {"type": "string", "enum": EDIT_STATES},
                "base": {"type": "string"}
            },
            "required": ["repository", "pr_number"]
        }),
    };

    vec![
        issue_list,
        issue_get,
        issue_create,
        issue_edit,
        issue_comment_create,
        issue_comment_list,
        issue_comment_edit,
        pr_list,
        pr_get,
        pr_comment_create,
        pr_comment_list,
        pr_comment_edit,
        pr_edit,
    ]
}
