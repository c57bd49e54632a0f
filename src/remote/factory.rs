//! Client factory: turns configuration into exactly one live backend,
//! auto-detecting the remote flavor when the operator did not pin one.

use std::sync::Arc;
use std::time::Duration;

use log::info;
use thiserror::Error;

use crate::config::Config;
use crate::remote::detect::{detect_remote_type, DetectionError, RemoteFlavor};
use crate::remote::forgejo::ForgejoClient;
use crate::remote::gitea::GiteaClient;
use crate::remote::http::InitError;
use crate::remote::ClientInterface;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unsupported client type {0:?} (expected \"gitea\", \"forgejo\" or \"auto\")")]
    UnsupportedType(String),
    #[error("remote type detection failed: {0}")]
    Detection(#[from] DetectionError),
    #[error("client initialization failed: {0}")]
    Init(#[from] InitError),
}

/// Build the one `ClientInterface` instance the server shares for its lifetime.
///
/// `client_type` empty or `"auto"` probes the remote's version endpoint; a
/// probe failure is fatal rather than a silent fallback. Unknown types are
/// rejected before any network traffic.
pub async fn build_client(cfg: &Config) -> Result<Arc<dyn ClientInterface>, ClientError> {
    let flavor = match cfg.client_type.as_str() {
        "" | "auto" => {
            let probe = reqwest::Client::builder()
                .timeout(Duration::from_secs(cfg.timeout_secs))
                .use_rustls_tls()
                .build()
                .map_err(InitError::Http)?;
            let detected = detect_remote_type(&probe, &cfg.remote_url, &cfg.auth_token).await?;
            info!("auto-detected remote type: {}", detected);
            detected
        }
        "gitea" => RemoteFlavor::Gitea,
        "forgejo" => RemoteFlavor::Forgejo,
        other => return Err(ClientError::UnsupportedType(other.to_string())),
    };

    let client: Arc<dyn ClientInterface> = match flavor {
        RemoteFlavor::Gitea => Arc::new(GiteaClient::new(cfg)?),
        RemoteFlavor::Forgejo => Arc::new(ForgejoClient::new(cfg)?),
    };
    Ok(client)
}
