//! Upstream source implementations for the latest Go version

pub mod go_dev;
pub mod playground;

pub use go_dev::GoDevSource;
pub use playground::PlaygroundSource;

use crate::version::context::Context;
use crate::version::error::SourceError;

/// Sends a GET request to `url`, aborting if `ctx` ends first
async fn send_get(
    client: &reqwest::Client,
    url: &str,
    ctx: &Context,
) -> Result<reqwest::Response, SourceError> {
    let parsed = reqwest::Url::parse(url).map_err(|source| SourceError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    ctx.run(client.get(parsed).send())
        .await?
        .map_err(SourceError::Transport)
}

/// Reads the whole response body as text, aborting if `ctx` ends first
async fn read_text(response: reqwest::Response, ctx: &Context) -> Result<String, SourceError> {
    ctx.run(response.text()).await?.map_err(SourceError::BodyRead)
}
