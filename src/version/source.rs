//! Source trait for fetching the latest Go version from an upstream

#[cfg(test)]
use mockall::automock;

use crate::version::context::Context;
use crate::version::error::SourceError;
use crate::version::types::{LatestVersion, Origin};

/// Trait for fetching the latest Go version from one upstream feed
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// Returns which upstream this implementation queries
    fn origin(&self) -> Origin;

    /// Fetches the version the upstream currently reports as latest
    ///
    /// # Arguments
    /// * `ctx` - Cancellation and deadline applied to every network await
    ///
    /// # Returns
    /// * `Ok(LatestVersion)` - Tagged with [`Source::origin`]
    /// * `Err(SourceError)` - If the request, response, or payload is rejected
    async fn fetch(&self, ctx: &Context) -> Result<LatestVersion, SourceError>;
}
