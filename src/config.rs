use std::env;

/// Runtime configuration for the forge API client.
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub remote_url: String,
    pub auth_token: String,
    pub client_type: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - FORGEJO_REMOTE_URL (or GITEA_REMOTE_URL) [required]
    /// - FORGEJO_AUTH_TOKEN (or GITEA_AUTH_TOKEN) [required]
    /// - FORGEJO_CLIENT_TYPE (gitea | forgejo | auto; default: auto)
    /// - FORGEJO_HTTP_TIMEOUT_SECS (default: 30)
    /// - FORGEJO_USER_AGENT (default: forgejo-mcp/<version>)
    pub fn from_env() -> Result<Self, String> {
        let remote_url = env::var("FORGEJO_REMOTE_URL")
            .or_else(|_| env::var("GITEA_REMOTE_URL"))
            .map_err(|_| "Missing FORGEJO_REMOTE_URL or GITEA_REMOTE_URL".to_string())?;
        let auth_token = env::var("FORGEJO_AUTH_TOKEN")
            .or_else(|_| env::var("GITEA_AUTH_TOKEN"))
            .map_err(|_| "Missing FORGEJO_AUTH_TOKEN or GITEA_AUTH_TOKEN".to_string())?;

        let client_type = env::var("FORGEJO_CLIENT_TYPE").unwrap_or_else(|_| "auto".to_string());
        let timeout_secs = env::var("FORGEJO_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        let default_ua = format!("forgejo-mcp/{}", env!("CARGO_PKG_VERSION"));
        let user_agent = env::var("FORGEJO_USER_AGENT").unwrap_or(default_ua);

        Ok(Self {
            remote_url,
            auth_token,
            client_type,
            user_agent,
            timeout_secs,
        })
    }
}
