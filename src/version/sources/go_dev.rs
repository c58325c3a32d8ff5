//! go.dev/VERSION text feed
//!
//! The feed answers with two lines:
//!
//! ```text
//! go1.24.2
//! time 2025-03-26T19:09:39Z
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};

use crate::config::{DEFAULT_PRIMARY_URL, USER_AGENT};
use crate::version::context::Context;
use crate::version::error::SourceError;
use crate::version::grammar;
use crate::version::source::Source;
use crate::version::sources::{read_text, send_get};
use crate::version::types::{LatestVersion, Origin};

/// Literal label the feed puts in front of the release timestamp
const TIME_PREFIX: &str = "time ";

/// Timestamp layout after [`TIME_PREFIX`]; fractional seconds are optional
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Source implementation for the go.dev text feed
#[derive(Debug, Clone)]
pub struct GoDevSource {
    client: reqwest::Client,
    url: String,
}

impl GoDevSource {
    /// Creates a new GoDevSource for a custom URL
    pub fn new(url: &str) -> Self {
        Self::with_client(
            url,
            reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
        )
    }

    pub fn with_client(url: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

impl Default for GoDevSource {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_URL)
    }
}

#[async_trait::async_trait]
impl Source for GoDevSource {
    fn origin(&self) -> Origin {
        Origin::Primary
    }

    async fn fetch(&self, ctx: &Context) -> Result<LatestVersion, SourceError> {
        let response = send_get(&self.client, &self.url, ctx).await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!("go.dev returned status {}: {}", status, self.url);
            return Err(SourceError::Status { status });
        }

        let body = read_text(response, ctx).await?;
        let latest = parse_body(&body)?;
        debug!(
            "go.dev reports {} released at {:?}",
            latest.version, latest.observed_at
        );
        Ok(latest)
    }
}

/// Parses the two-line feed body, rejecting anything that deviates from it
pub fn parse_body(body: &str) -> Result<LatestVersion, SourceError> {
    let lines: Vec<&str> = body.lines().collect();
    if lines.len() < 2 {
        return Err(SourceError::MalformedBody { lines: lines.len() });
    }

    let version = lines[0].trim();
    if !grammar::is_valid(version) {
        return Err(SourceError::InvalidVersion(version.to_string()));
    }

    let observed_at = parse_time_line(lines[1].trim())?;

    Ok(LatestVersion::primary(version.to_string(), observed_at))
}

fn parse_time_line(line: &str) -> Result<DateTime<Utc>, SourceError> {
    let invalid = |reason: String| SourceError::InvalidTime {
        value: line.to_string(),
        reason,
    };

    let timestamp = line
        .strip_prefix(TIME_PREFIX)
        .ok_or_else(|| invalid(format!("missing {:?} prefix", TIME_PREFIX)))?;

    if !has_time_shape(timestamp) {
        return Err(invalid(
            "expected YYYY-MM-DDThh:mm:ssZ with optional fractional seconds".to_string(),
        ));
    }

    NaiveDateTime::parse_from_str(timestamp, TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| invalid(e.to_string()))
}

/// Checks the fixed-width `YYYY-MM-DDThh:mm:ss[.fff]Z` layout.
///
/// chrono accepts short fields, signed years and leading spaces, so the
/// shape is enforced before handing the string over.
fn has_time_shape(timestamp: &str) -> bool {
    let bytes = timestamp.as_bytes();
    if bytes.len() < 20 {
        return false;
    }

    let (fixed, rest) = bytes.split_at(19);
    let fixed_ok = fixed.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b'T',
        13 | 16 => *b == b':',
        _ => b.is_ascii_digit(),
    });
    if !fixed_ok {
        return false;
    }

    match rest {
        [b'Z'] => true,
        [b'.', fraction @ .., b'Z'] => {
            !fraction.is_empty() && fraction.iter().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Server;
    use rstest::rstest;

    #[tokio::test]
    async fn fetch_returns_version_and_time_from_feed() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/VERSION")
            .match_query(mockito::Matcher::UrlEncoded("m".into(), "text".into()))
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("go1.24.2\ntime 2025-03-26T19:09:39Z\n")
            .create_async()
            .await;

        let source = GoDevSource::new(&format!("{}/VERSION?m=text", server.url()));
        let result = source.fetch(&Context::background()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            LatestVersion {
                version: "go1.24.2".to_string(),
                observed_at: Some(Utc.with_ymd_and_hms(2025, 3, 26, 19, 9, 39).unwrap()),
                origin: Origin::Primary,
            }
        );
    }

    #[tokio::test]
    async fn fetch_returns_status_error_for_non_ok_status() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/VERSION")
            .with_status(500)
            .with_body("go1.24.2\ntime 2025-03-26T19:09:39Z\n")
            .create_async()
            .await;

        let source = GoDevSource::new(&format!("{}/VERSION", server.url()));
        let result = source.fetch(&Context::background()).await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(SourceError::Status { status }) if status.as_u16() == 500
        ));
    }

    #[tokio::test]
    async fn fetch_rejects_other_success_statuses() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/VERSION")
            .with_status(203)
            .with_body("go1.24.2\ntime 2025-03-26T19:09:39Z\n")
            .create_async()
            .await;

        let source = GoDevSource::new(&format!("{}/VERSION", server.url()));
        let result = source.fetch(&Context::background()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(SourceError::Status { .. })));
    }

    #[tokio::test]
    async fn fetch_returns_invalid_url_for_unparsable_url() {
        let source = GoDevSource::new("not a url");

        let result = source.fetch(&Context::background()).await;

        assert!(matches!(result, Err(SourceError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn fetch_returns_cancelled_without_sending_when_context_is_canceled() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/VERSION")
            .with_status(200)
            .with_body("go1.24.2\ntime 2025-03-26T19:09:39Z\n")
            .expect(0)
            .create_async()
            .await;

        let (ctx, handle) = Context::background().with_cancel();
        handle.cancel();

        let source = GoDevSource::new(&format!("{}/VERSION", server.url()));
        let result = source.fetch(&ctx).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(SourceError::Cancelled(_))));
    }

    #[test]
    fn parse_body_accepts_body_without_trailing_newline() {
        let result = parse_body("go1.24.2\ntime 2025-03-26T19:09:39Z").unwrap();

        assert_eq!(result.version, "go1.24.2");
    }

    #[test]
    fn parse_body_trims_surrounding_whitespace() {
        let result = parse_body("  go1.24.2 \r\n time 2025-03-26T19:09:39Z \r\n").unwrap();

        assert_eq!(result.version, "go1.24.2");
        assert_eq!(
            result.observed_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 26, 19, 9, 39).unwrap())
        );
    }

    #[test]
    fn parse_body_ignores_lines_after_time() {
        let result = parse_body("go1.24.2\ntime 2025-03-26T19:09:39Z\n\nextra\n").unwrap();

        assert_eq!(result.version, "go1.24.2");
    }

    #[test]
    fn parse_body_accepts_fractional_seconds() {
        let result = parse_body("go1.24.2\ntime 2025-03-26T19:09:39.123Z\n").unwrap();

        let observed_at = result.observed_at.unwrap();
        assert_eq!(observed_at.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn parse_body_rejects_empty_body() {
        let result = parse_body("");

        assert!(matches!(result, Err(SourceError::MalformedBody { lines: 0 })));
    }

    #[test]
    fn parse_body_rejects_single_line() {
        let result = parse_body("go1.24.2\n");

        assert!(matches!(result, Err(SourceError::MalformedBody { lines: 1 })));
    }

    #[test]
    fn parse_body_rejects_invalid_version() {
        let result = parse_body("<!DOCTYPE html>\n<html>\n");

        assert!(matches!(
            result,
            Err(SourceError::InvalidVersion(version)) if version == "<!DOCTYPE html>"
        ));
    }

    #[test]
    fn parse_body_rejects_time_without_prefix() {
        let result = parse_body("go1.24.2\n2025-03-26T19:09:39Z\n");

        assert!(matches!(
            result,
            Err(SourceError::InvalidTime { value, .. }) if value == "2025-03-26T19:09:39Z"
        ));
    }

    #[test]
    fn parse_body_rejects_time_with_offset() {
        let result = parse_body("go1.24.2\ntime 2025-03-26T19:09:39+09:00\n");

        assert!(matches!(result, Err(SourceError::InvalidTime { .. })));
    }

    #[test]
    fn parse_body_rejects_impossible_date() {
        let result = parse_body("go1.24.2\ntime 2025-02-30T19:09:39Z\n");

        assert!(matches!(result, Err(SourceError::InvalidTime { .. })));
    }

    #[rstest]
    #[case("time 2025-3-26T19:09:39Z")]
    #[case("time 2025-03-6T19:09:39Z")]
    #[case("time 2025-03-26T9:09:39Z")]
    #[case("time 2025-03-26T19:9:39Z")]
    #[case("time 2025-03-26T19:09:9Z")]
    #[case("time +2025-03-26T19:09:39Z")]
    #[case("time 25-03-26T19:09:39Z")]
    #[case("time 12025-03-26T19:09:39Z")]
    #[case("time  2025-03-26T19:09:39Z")]
    #[case("time 2025-03-26 19:09:39Z")]
    #[case("time 2025/03/26T19:09:39Z")]
    #[case("time 2025-03-26T19:09:39")]
    #[case("time 2025-03-26T19:09:39.Z")]
    #[case("time 2025-03-26T19:09:39.12aZ")]
    #[case("time 2025-03-26T19:09:39Zextra")]
    #[case("Time 2025-03-26T19:09:39Z")]
    #[case("time2025-03-26T19:09:39Z")]
    fn parse_time_line_rejects_deviating_layout(#[case] line: &str) {
        let result = parse_time_line(line);

        assert!(
            matches!(&result, Err(SourceError::InvalidTime { value, .. }) if value == line),
            "line: {line:?}, result: {result:?}"
        );
    }

    #[rstest]
    #[case("time 2025-03-26T19:09:39Z", 0)]
    #[case("time 2025-03-26T19:09:39.5Z", 500)]
    #[case("time 2025-03-26T19:09:39.123456789Z", 123)]
    fn parse_time_line_accepts_exact_layout(#[case] line: &str, #[case] millis: u32) {
        let result = parse_time_line(line).unwrap();

        assert_eq!(result.timestamp(), 1743016179);
        assert_eq!(result.timestamp_subsec_millis(), millis);
    }
}
