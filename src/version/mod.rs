//! Latest Go version resolution
//!
//! This module asks go.dev for the latest released Go toolchain and falls back
//! to the Go Playground when go.dev reports a release that is too old to trust.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  fetch   ┌──────────────┐
//! │  Resolver   │─────────▶│  GoDevSource │  (text, primary)
//! │ (staleness) │          └──────────────┘
//! │             │  stale   ┌──────────────────┐
//! │             │─────────▶│ PlaygroundSource │  (JSON, secondary)
//! └─────────────┘          └──────────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │    Clock    │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`resolver`]: Primary-then-fallback orchestration
//! - [`source`]: Source trait shared by both upstreams
//! - [`sources`]: Concrete go.dev and Playground sources
//! - [`context`]: Cancellation and deadlines for in-flight requests
//! - [`clock`]: Injectable time source
//! - [`grammar`]: Go toolchain version syntax
//! - [`error`]: Error types for sources and resolution
//! - [`types`]: The `LatestVersion` result

pub mod clock;
pub mod context;
pub mod error;
pub mod grammar;
pub mod resolver;
pub mod source;
pub mod sources;
pub mod types;

pub use resolver::{Resolver, fetch_latest};
