use crate::handlers::{issues, pulls};
use crate::mcp::PROTOCOL_VERSION;
use crate::remote::ClientInterface;
use crate::tools::tool_descriptors;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

// Minimal JSON-RPC 2.0 types
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Id {
    Str(String),
    Num(i64),
    Null,
}

#[derive(Debug, Serialize, Deserialize)]
struct Request {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    id: Option<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Response {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: Option<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

fn rpc_error(id: Option<Id>, code: i64, message: &str, data: Option<Value>) -> Response {
    Response {
        jsonrpc: "2.0".into(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.into(),
            data,
        }),
        id,
    }
}

fn rpc_ok(id: Option<Id>, result: Value) -> Response {
    Response {
        jsonrpc: "2.0".into(),
        result: Some(result),
        error: None,
        id,
    }
}

/// Serve newline-delimited JSON-RPC requests from stdin until EOF. The shared
/// client is the one instance the factory built at startup.
pub async fn run_stdio_server(client: Arc<dyn ClientInterface>) -> anyhow::Result<()> {
    info!(
        "Starting forgejo-mcp stdio server; protocol={}",
        PROTOCOL_VERSION
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let req: Request = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                let resp = rpc_error(None, -32700, &format!("Parse error: {}", e), None);
                write_response(&mut stdout, &resp).await?;
                continue;
            }
        };
        debug!("Received method={}", req.method);
        // Requests without an id are notifications; handle them but stay silent.
        let is_notification = req.id.is_none();
        let resp = dispatch(client.as_ref(), req).await;
        if !is_notification {
            write_response(&mut stdout, &resp).await?;
        }
    }
    Ok(())
}

async fn write_response(
    stdout: &mut tokio::io::Stdout,
    resp: &Response,
) -> anyhow::Result<()> {
    let mut payload = serde_json::to_string(resp)?;
    payload.push('\n');
    stdout.write_all(payload.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

async fn dispatch(client: &dyn ClientInterface, req: Request) -> Response {
    match req.method.as_str() {
        "initialize" => handle_initialize(req.id),
        "notifications/initialized" => rpc_ok(req.id, Value::Null),
        "tools/list" => handle_tools_list(req.id),
        "tools/call" => handle_tools_call(client, req.id, req.params).await,
        "ping" => rpc_ok(req.id, serde_json::json!({})),
        other => rpc_error(req.id, -32601, &format!("Method not found: {}", other), None),
    }
}

fn handle_initialize(id: Option<Id>) -> Response {
    rpc_ok(
        id,
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": "forgejo-mcp",
                "version": env!("CARGO_PKG_VERSION"),
            }
        }),
    )
}

fn handle_tools_list(id: Option<Id>) -> Response {
    let tools = tool_descriptors();
    rpc_ok(id, serde_json::json!({ "tools": tools }))
}

#[derive(Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

async fn handle_tools_call(client: &dyn ClientInterface, id: Option<Id>, params: Value) -> Response {
    let parsed: Result<ToolCallParams, _> = serde_json::from_value(params);
    let Ok(call) = parsed else {
        return rpc_error(id, -32602, "Invalid params", None);
    };
    // Absent arguments decode as an empty map so required-field errors are
    // reported per field instead of as a type mismatch.
    let args = if call.arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        call.arguments
    };
    let result = match call.name.as_str() {
        "issue_list" => issues::issue_list(client, args).await,
        "issue_get" => issues::issue_get(client, args).await,
        "issue_create" => issues::issue_create(client, args).await,
        "issue_edit" => issues::issue_edit(client, args).await,
        "issue_comment_create" => issues::issue_comment_create(client, args).await,
        "issue_comment_list" => issues::issue_comment_list(client, args).await,
        "issue_comment_edit" => issues::issue_comment_edit(client, args).await,
        "pr_list" => pulls::pr_list(client, args).await,
        "pr_get" => pulls::pr_get(client, args).await,
        "pr_comment_create" => pulls::pr_comment_create(client, args).await,
        "pr_comment_list" => pulls::pr_comment_list(client, args).await,
        "pr_comment_edit" => pulls::pr_comment_edit(client, args).await,
        "pr_edit" => pulls::pr_edit(client, args).await,
        _ => return rpc_error(id, -32601, &format!("Tool not found: {}", call.name), None),
    };
    rpc_ok(id, result)
}
