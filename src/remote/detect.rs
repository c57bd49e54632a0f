//! Remote flavor auto-detection: probe `/api/v1/version` (both forge families
//! expose it) and classify the version string. The classification is an ordered
//! heuristic over release-lineage markers, not a guarantee; only an ambiguous
//! but successfully retrieved string falls back to Gitea, while probe failures
//! surface as hard errors so "auto" mode never guesses on infrastructure
//! problems.

use log::debug;
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFlavor {
    Gitea,
    Forgejo,
}

impl RemoteFlavor {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteFlavor::Gitea => "gitea",
            RemoteFlavor::Forgejo => "forgejo",
        }
    }
}

impl fmt::Display for RemoteFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The version probe could not complete; fatal at startup in "auto" mode.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("version probe request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("version probe returned status {0}")]
    Status(StatusCode),
    #[error("version probe returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

fn forgejo_anchor() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^12\.\d+\.\d+").expect("forgejo anchor compiles"))
}

fn gitea_anchor() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^1\.\d+\.\d+").expect("gitea anchor compiles"))
}

/// Classify a forge version string. Pure and total: same input, same answer.
///
/// Ordered, first match wins. The Forgejo release lineage (major version 12)
/// is checked before the `gitea` substring because Forgejo builds embed the
/// Gitea compatibility version in their suffix (e.g.
/// `12.0.1-120-abfc8432+gitea-1.22.0`).
pub fn analyze_version_string(version: &str) -> RemoteFlavor {
    let v = version.trim().to_ascii_lowercase();
    if v.is_empty() {
        return RemoteFlavor::Gitea;
    }
    if v.contains("forgejo") {
        return RemoteFlavor::Forgejo;
    }
    if v.contains("12.") {
        return RemoteFlavor::Forgejo;
    }
    if v.contains("gitea") {
        return RemoteFlavor::Gitea;
    }
    if v.contains("1.") {
        return RemoteFlavor::Gitea;
    }
    if forgejo_anchor().is_match(&v) {
        return RemoteFlavor::Forgejo;
    }
    if gitea_anchor().is_match(&v) {
        return RemoteFlavor::Gitea;
    }
    RemoteFlavor::Gitea
}

#[derive(Debug, Deserialize)]
struct VersionPayload {
    #[serde(default)]
    version: String,
}

/// Probe `GET {remote_url}/api/v1/version` and classify the reported version.
pub async fn detect_remote_type(
    http: &reqwest::Client,
    remote_url: &str,
    auth_token: &str,
) -> Result<RemoteFlavor, DetectionError> {
    let url = format!("{}/api/v1/version", remote_url.trim_end_matches('/'));
    let res = http
        .get(&url)
        .header("Authorization", format!("token {}", auth_token))
        .send()
        .await?;
    let status = res.status();
    if !status.is_success() {
        return Err(DetectionError::Status(status));
    }
    let body = res.text().await?;
    let payload: VersionPayload = serde_json::from_str(&body)?;
    let flavor = analyze_version_string(&payload.version);
    debug!("version probe: {:?} -> {}", payload.version, flavor);
    Ok(flavor)
}
