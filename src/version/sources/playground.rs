//! Go Playground version endpoint

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_SECONDARY_URL, USER_AGENT};
use crate::version::context::Context;
use crate::version::error::SourceError;
use crate::version::source::Source;
use crate::version::sources::{read_text, send_get};
use crate::version::types::{LatestVersion, Origin};

/// Response from the Playground `/version` endpoint
#[derive(Debug, Deserialize)]
struct VersionResponse {
    #[serde(rename = "Version")]
    version: String,
}

/// Source implementation for the Go Playground
#[derive(Debug, Clone)]
pub struct PlaygroundSource {
    client: reqwest::Client,
    base_url: String,
}

impl PlaygroundSource {
    /// Creates a new PlaygroundSource with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_client(
            base_url,
            reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
        )
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

impl Default for PlaygroundSource {
    fn default() -> Self {
        Self::new(DEFAULT_SECONDARY_URL)
    }
}

#[async_trait::async_trait]
impl Source for PlaygroundSource {
    fn origin(&self) -> Origin {
        Origin::Secondary
    }

    async fn fetch(&self, ctx: &Context) -> Result<LatestVersion, SourceError> {
        let url = format!("{}/version", self.base_url.trim_end_matches('/'));

        let response = send_get(&self.client, &url, ctx).await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Playground returned status {}: {}", status, url);
            return Err(SourceError::Status { status });
        }

        let body = read_text(response, ctx).await?;
        let payload: VersionResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse Playground response: {}", e);
            SourceError::Decode(e)
        })?;

        let version = payload.version.trim();
        if version.is_empty() {
            return Err(SourceError::InvalidVersion(payload.version));
        }

        debug!("Playground reports {}", version);
        Ok(LatestVersion::secondary(version.to_string()))
    }
}
