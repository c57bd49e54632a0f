use assert_cmd::Command;
use httpmock::{Method::GET, MockServer};
use predicates::prelude::*;
use predicates::str::contains;
use std::io::Write;

fn cmd_with_env(envs: &[(&str, String)]) -> Command {
    let mut cmd = Command::cargo_bin("forgejo-mcp").unwrap();
    for (k, v) in envs {
        cmd.env(k, v);
    }
    cmd.arg("--log-level").arg("warn");
    cmd
}

fn stdin_line(req: &serde_json::Value) -> Vec<u8> {
    let mut b = Vec::new();
    writeln!(b, "{}", serde_json::to_string(req).unwrap()).unwrap();
    b
}

#[test]
fn auto_mode_selects_forgejo_and_serves_calls() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m_version = server.mock(|when, then| {
        when.method(GET).path("/api/v1/version");
        then.status(200)
            .json_body(serde_json::json!({"version": "12.0.1-120-abfc8432+gitea-1.22.0"}));
    });
    let m_issues = server.mock(|when, then| {
        when.method(GET).path("/api/v1/repos/o/r/issues");
        then.status(200).json_body(serde_json::json!([]));
    });

    let req = serde_json::json!({
        "jsonrpc": "2.0", "method": "tools/call", "id": 1,
        "params": {"name": "issue_list", "arguments": {"repository": "o/r"}}
    });
    let assert = cmd_with_env(&[
        ("FORGEJO_REMOTE_URL", server.base_url()),
        ("FORGEJO_AUTH_TOKEN", "t".into()),
        ("FORGEJO_CLIENT_TYPE", "auto".into()),
    ])
    .write_stdin(stdin_line(&req))
    .assert()
    .success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(out.contains("\"isError\":false"));
    m_version.assert();
    m_issues.assert();
    Ok(())
}

#[test]
fn auto_mode_fails_hard_when_probe_errors() -> anyhow::Result<()> {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/api/v1/version");
        then.status(500).body("maintenance");
    });
    cmd_with_env(&[
        ("FORGEJO_REMOTE_URL", server.base_url()),
        ("FORGEJO_AUTH_TOKEN", "t".into()),
        ("FORGEJO_CLIENT_TYPE", "auto".into()),
    ])
    .write_stdin("")
    .assert()
    .failure()
    .stderr(contains("remote type detection failed"));
    Ok(())
}

#[test]
fn auto_mode_fails_hard_on_malformed_version_json() -> anyhow::Result<()> {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/api/v1/version");
        then.status(200).body("<html>not json</html>");
    });
    cmd_with_env(&[
        ("FORGEJO_REMOTE_URL", server.base_url()),
        ("FORGEJO_AUTH_TOKEN", "t".into()),
        ("FORGEJO_CLIENT_TYPE", "auto".into()),
    ])
    .write_stdin("")
    .assert()
    .failure()
    .stderr(contains("malformed"));
    Ok(())
}

#[test]
fn unsupported_client_type_fails_without_network() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m_any = server.mock(|when, then| {
        when.path_contains("/api/v1");
        then.status(200).json_body(serde_json::json!({}));
    });
    cmd_with_env(&[
        ("FORGEJO_REMOTE_URL", server.base_url()),
        ("FORGEJO_AUTH_TOKEN", "t".into()),
        ("FORGEJO_CLIENT_TYPE", "bogus".into()),
    ])
    .write_stdin("")
    .assert()
    .failure()
    .stderr(contains("unsupported client type").and(contains("bogus")));
    assert_eq!(m_any.hits(), 0);
    Ok(())
}

#[test]
fn explicit_type_skips_the_probe() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m_version = server.mock(|when, then| {
        when.method(GET).path("/api/v1/version");
        then.status(200).json_body(serde_json::json!({"version": "1.22.0"}));
    });
    let req = serde_json::json!({"jsonrpc": "2.0", "method": "initialize", "id": 1});
    cmd_with_env(&[
        ("FORGEJO_REMOTE_URL", server.base_url()),
        ("FORGEJO_AUTH_TOKEN", "t".into()),
        ("FORGEJO_CLIENT_TYPE", "forgejo".into()),
    ])
    .write_stdin(stdin_line(&req))
    .assert()
    .success();
    assert_eq!(m_version.hits(), 0);
    Ok(())
}
