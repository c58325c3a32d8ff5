use thiserror::Error;

use crate::version::context::ContextError;
use crate::version::types::Origin;

/// Failure of a single upstream fetch
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to create request to {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status {status}")]
    Status { status: reqwest::StatusCode },

    #[error("failed to read body: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("malformed body: expected at least 2 lines, got {lines}")]
    MalformedBody { lines: usize },

    #[error("failed to parse time ({value:?}): {reason}")]
    InvalidTime { value: String, reason: String },

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid go version ({0:?})")]
    InvalidVersion(String),

    #[error(transparent)]
    Cancelled(#[from] ContextError),
}

/// Step of a fetch that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Request,
    Transport,
    Status,
    BodyRead,
    Parse,
    Validation,
    Cancelled,
}

impl SourceError {
    pub fn stage(&self) -> Stage {
        match self {
            SourceError::InvalidUrl { .. } => Stage::Request,
            SourceError::Transport(_) => Stage::Transport,
            SourceError::Status { .. } => Stage::Status,
            SourceError::BodyRead(_) => Stage::BodyRead,
            SourceError::MalformedBody { .. }
            | SourceError::InvalidTime { .. }
            | SourceError::Decode(_) => Stage::Parse,
            SourceError::InvalidVersion(_) => Stage::Validation,
            SourceError::Cancelled(_) => Stage::Cancelled,
        }
    }
}

/// Failure of [`Resolver::resolve_latest`](crate::version::Resolver::resolve_latest),
/// tagged with the upstream responsible for it
#[derive(Debug, Error)]
#[error("failed to get latest version via {}: {source}", .origin.endpoint())]
pub struct ResolveError {
    pub origin: Origin,
    #[source]
    pub source: SourceError,
}

impl ResolveError {
    pub fn new(origin: Origin, source: SourceError) -> Self {
        Self { origin, source }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn stage(&self) -> Stage {
        self.source.stage()
    }

    /// HTTP status for [`Stage::Status`] failures
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match &self.source {
            SourceError::Status { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.source, SourceError::Cancelled(_))
    }
}
