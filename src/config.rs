use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// =============================================================================
// Upstream endpoints
// =============================================================================

/// Canonical plain-text feed of the latest Go release
pub const DEFAULT_PRIMARY_URL: &str = "https://go.dev/VERSION?m=text";

/// Base URL of the Go Playground, whose `/version` endpoint is the fallback
pub const DEFAULT_SECONDARY_URL: &str = "https://play.golang.org";

/// User agent sent with every request
pub const USER_AGENT: &str = "golatest";

// =============================================================================
// Time-related constants
// =============================================================================

/// Maximum age of the go.dev timestamp before falling back (30 days)
pub const DEFAULT_STALENESS_THRESHOLD_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Default deadline the CLI applies to a whole resolve (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Resolver configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    pub primary_url: String,
    pub secondary_url: String,
    /// Staleness threshold in milliseconds
    pub staleness_threshold: i64,
    /// Consult the Playground when go.dev is stale
    pub fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            secondary_url: DEFAULT_SECONDARY_URL.to_string(),
            staleness_threshold: DEFAULT_STALENESS_THRESHOLD_MS,
            fallback: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ResolverConfig {
    /// Loads a JSON configuration file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
