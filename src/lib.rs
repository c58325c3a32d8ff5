pub mod config;
pub mod version;

pub use version::fetch_latest;
