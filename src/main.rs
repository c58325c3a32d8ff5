use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use go_latest::config::{FETCH_TIMEOUT_MS, ResolverConfig};
use go_latest::version::Resolver;
use go_latest::version::context::Context;
use tracing::debug;

mod logging;

#[derive(Parser)]
#[command(name = "golatest")]
#[command(version, about = "Print the latest released Go version")]
struct Cli {
    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Deadline for the whole lookup in milliseconds
    #[arg(long, value_name = "MS", default_value_t = FETCH_TIMEOUT_MS)]
    timeout: u64,

    /// Write JSON logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.log_file.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ResolverConfig::load(path)?,
        None => ResolverConfig::default(),
    };
    debug!("Resolving with {:?}", config);
    let resolver = Resolver::from_config(config);

    let (ctx, cancel) = Context::background()
        .with_timeout(Duration::from_millis(cli.timeout))
        .with_cancel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let latest = resolver
        .resolve_latest(&ctx)
        .await
        .context("failed to fetch latest Go's version")?;

    if cli.json {
        println!("{}", serde_json::to_string(&latest)?);
    } else {
        println!("{}", latest.version);
    }
    Ok(())
}
