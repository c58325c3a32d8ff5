//! Primary-then-fallback resolution of the latest Go version
//!
//! go.dev is always asked first. Its answer is trusted while the reported
//! release time is younger than the staleness threshold; otherwise the
//! Playground is asked once. A go.dev failure is returned as-is, the
//! Playground is only a remedy for stale data.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{ResolverConfig, USER_AGENT};
use crate::version::clock::{Clock, SystemClock};
use crate::version::context::Context;
use crate::version::error::ResolveError;
use crate::version::source::Source;
use crate::version::sources::{GoDevSource, PlaygroundSource};
use crate::version::types::LatestVersion;

/// Resolves the latest Go version from go.dev with a Playground fallback
///
/// Setters take `&mut self`, so configuration cannot change while a
/// resolve borrowing the same `Resolver` is in flight.
pub struct Resolver {
    primary_url: String,
    secondary_url: String,
    client: reqwest::Client,
    clock: Arc<dyn Clock>,
    staleness_threshold_ms: i64,
    fallback: bool,
}

impl Resolver {
    pub fn new() -> Self {
        Self::from_config(ResolverConfig::default())
    }

    pub fn from_config(config: ResolverConfig) -> Self {
        Self {
            primary_url: config.primary_url,
            secondary_url: config.secondary_url,
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            clock: Arc::new(SystemClock),
            staleness_threshold_ms: config.staleness_threshold,
            fallback: config.fallback,
        }
    }

    pub fn set_primary_url(&mut self, url: &str) {
        self.primary_url = url.to_string();
    }

    pub fn set_secondary_url(&mut self, base_url: &str) {
        self.secondary_url = base_url.to_string();
    }

    pub fn set_http_client(&mut self, client: reqwest::Client) {
        self.client = client;
    }

    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    /// Maximum age in milliseconds of the go.dev release time
    pub fn set_staleness_threshold(&mut self, threshold_ms: i64) {
        self.staleness_threshold_ms = threshold_ms;
    }

    /// When disabled, a stale go.dev answer is returned instead of asking the Playground
    pub fn set_fallback_enabled(&mut self, enabled: bool) {
        self.fallback = enabled;
    }

    /// Resolves the latest Go version
    ///
    /// # Returns
    /// * `Ok(LatestVersion)` - From go.dev when fresh, otherwise from the Playground
    /// * `Err(ResolveError)` - Tagged with the source that failed; cancellation of
    ///   `ctx` surfaces as [`ResolveError::is_cancelled`]
    pub async fn resolve_latest(&self, ctx: &Context) -> Result<LatestVersion, ResolveError> {
        let primary = GoDevSource::with_client(&self.primary_url, self.client.clone());
        let secondary = PlaygroundSource::with_client(&self.secondary_url, self.client.clone());
        self.resolve_from(&primary, &secondary, ctx).await
    }

    async fn resolve_from(
        &self,
        primary: &dyn Source,
        secondary: &dyn Source,
        ctx: &Context,
    ) -> Result<LatestVersion, ResolveError> {
        let latest = primary
            .fetch(ctx)
            .await
            .map_err(|e| ResolveError::new(primary.origin(), e))?;

        if self.is_fresh(&latest) {
            return Ok(latest);
        }

        if !self.fallback {
            warn!(
                "{} is older than the staleness threshold but fallback is disabled",
                latest.version
            );
            return Ok(latest);
        }

        info!(
            "{} reported by {} is stale, falling back to {}",
            latest.version,
            primary.origin().endpoint(),
            secondary.origin().endpoint()
        );

        secondary
            .fetch(ctx)
            .await
            .map_err(|e| ResolveError::new(secondary.origin(), e))
    }

    fn is_fresh(&self, latest: &LatestVersion) -> bool {
        let Some(observed_at) = latest.observed_at else {
            return false;
        };
        let age = self.clock.now() - observed_at;
        debug!(
            "{} is {} ms old (threshold {} ms)",
            latest.version,
            age.num_milliseconds(),
            self.staleness_threshold_ms
        );
        age.num_milliseconds() < self.staleness_threshold_ms
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once with a default [`Resolver`]
pub async fn fetch_latest(ctx: &Context) -> Result<LatestVersion, ResolveError> {
    Resolver::new().resolve_latest(ctx).await
}
