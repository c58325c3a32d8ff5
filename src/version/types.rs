use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Upstream that produced a [`LatestVersion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// go.dev/VERSION text feed
    Primary,
    /// Go Playground version endpoint
    Secondary,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Primary => "primary",
            Origin::Secondary => "secondary",
        }
    }

    /// Human readable name of the upstream endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            Origin::Primary => "go.dev/VERSION?m=text",
            Origin::Secondary => "play.golang.org/version",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The latest released Go version as reported by one upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestVersion {
    /// Toolchain identifier, e.g. `go1.24.2`
    pub version: String,
    /// When the upstream recorded this version. Only go.dev reports it.
    pub observed_at: Option<DateTime<Utc>>,
    pub origin: Origin,
}

impl LatestVersion {
    pub fn primary(version: String, observed_at: DateTime<Utc>) -> Self {
        Self {
            version,
            observed_at: Some(observed_at),
            origin: Origin::Primary,
        }
    }

    pub fn secondary(version: String) -> Self {
        Self {
            version,
            observed_at: None,
            origin: Origin::Secondary,
        }
    }
}
