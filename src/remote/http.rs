//! Shared REST plumbing for the forge backends: one reqwest client per
//! process, per-request token auth, and uniform status-to-error mapping.
//! There is no retry policy; a failed call is reported once.

use crate::config::Config;
use crate::remote::RemoteError;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Backend construction failure; fatal at startup.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid remote URL {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("remote URL {0:?} must use http or https")]
    Scheme(String),
    #[error("auth token is not a valid header value")]
    Token,
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Percent-encode one path segment (owner or repo name).
pub fn encode_segment(s: &str) -> Cow<'_, str> {
    urlencoding::encode(s)
}

/// Thin wrapper over reqwest pointed at one forge's `/api/v1` root.
/// Safe for concurrent use; every call opens its own request.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    api_root: String,
    auth: HeaderValue,
}

impl RestClient {
    pub fn new(cfg: &Config) -> Result<Self, InitError> {
        let parsed = Url::parse(&cfg.remote_url).map_err(|source| InitError::Url {
            url: cfg.remote_url.clone(),
            source,
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(InitError::Scheme(cfg.remote_url.clone()));
        }
        let api_root = format!("{}/api/v1", cfg.remote_url.trim_end_matches('/'));

        let auth = HeaderValue::from_str(&format!("token {}", cfg.auth_token))
            .map_err(|_| InitError::Token)?;

        let mut default_headers = HeaderMap::new();
        if let Ok(ua) = HeaderValue::from_str(&cfg.user_agent) {
            default_headers.insert(USER_AGENT, ua);
        }
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .use_rustls_tls()
            .build()?;

        Ok(Self {
            http,
            api_root,
            auth,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let req = self
            .http
            .request(Method::GET, format!("{}{}", self.api_root, path))
            .query(query);
        self.execute(operation, req).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let req = self
            .http
            .request(Method::POST, format!("{}{}", self.api_root, path))
            .json(body);
        self.execute(operation, req).await
    }

    pub async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let req = self
            .http
            .request(Method::PATCH, format!("{}{}", self.api_root, path))
            .json(body);
        self.execute(operation, req).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        req: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        let res = req
            .header(AUTHORIZATION, self.auth.clone())
            .send()
            .await
            .map_err(|source| RemoteError::Transport { operation, source })?;

        let status = res.status();
        debug!("{} -> {}", operation, status);
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound { operation });
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                operation,
                status,
                message: forge_error_message(&body),
            });
        }
        res.json::<T>()
            .await
            .map_err(|source| RemoteError::Transport { operation, source })
    }
}

/// Both forges report errors as `{"message": "..."}`; fall back to the raw body.
fn forge_error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }
    body.to_string()
}
