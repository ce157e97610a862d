//! Print a competitive-programming dashboard as JSON.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use cp_stats::{ClientConfig, Dashboard, InMemoryProfileStore, PlatformHandles, Resource, StatsClient};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CLI_USER: &str = "cli";

#[derive(Parser, Debug)]
#[command(
    name = "cp-stats",
    version,
    about = "Fetch competitive programming stats from Codeforces, CodeChef, LeetCode and GeeksForGeeks"
)]
struct Cli {
    /// TOML client configuration; defaults apply when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "")]
    codeforces: String,

    #[arg(long, default_value = "")]
    codechef: String,

    #[arg(long, default_value = "")]
    leetcode: String,

    #[arg(long, default_value = "")]
    gfg: String,

    /// Abandon resources still pending after this many seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    json_logs: bool,

    /// Resources to fetch, e.g. `codeforces leetcodePOTD`; all when empty
    resources: Vec<Resource>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            cli.json_logs
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.json_logs)
                .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => ClientConfig::load_or_default(path),
        None => ClientConfig::default(),
    };
    let client = StatsClient::from_config(&config)?;

    let store = InMemoryProfileStore::new();
    store.insert(
        CLI_USER,
        PlatformHandles {
            codeforces: cli.codeforces,
            codechef: cli.codechef,
            leetcode: cli.leetcode,
            gfg: cli.gfg,
        },
    )?;

    let mut dashboard = Dashboard::new(client, store);
    if let Some(secs) = cli.deadline_secs {
        dashboard = dashboard.with_deadline(Duration::from_secs(secs));
    }

    let response = if cli.resources.is_empty() {
        dashboard.load(CLI_USER).await
    } else {
        dashboard.fetch_many(CLI_USER, &cli.resources).await
    };
    info!(
        resources = response.resources.len(),
        failed = response.resources.values().filter(|r| !r.is_success()).count(),
        "done"
    );

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
