//! Test utilities shared by integration tests

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio::net::TcpListener;

use go_latest::version::Resolver;
use go_latest::version::clock::FixedClock;

pub const FEED_BODY: &str = "go1.24.2\ntime 2025-03-26T19:09:39Z\n";

pub const PLAYGROUND_BODY: &str = r#"{"Version":"go1.24.2","Release":"go1.24","Name":"Go 1.24"}"#;

/// Release time reported by [`FEED_BODY`]
pub fn released_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 26, 19, 9, 39).unwrap()
}

/// Create a resolver pointing at test servers with a fixed clock
pub fn create_test_resolver(
    primary_url: &str,
    secondary_url: &str,
    now: DateTime<Utc>,
) -> Resolver {
    let mut resolver = Resolver::new();
    resolver.set_primary_url(primary_url);
    resolver.set_secondary_url(secondary_url);
    resolver.set_clock(Arc::new(FixedClock(now)));
    resolver
}

/// Start a server that accepts connections but never answers
pub async fn start_hanging_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut connections = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            connections.push(stream);
        }
    });

    format!("http://{}", addr)
}

/// Return a URL on which nothing is listening
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
