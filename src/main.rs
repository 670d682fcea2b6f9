use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod config;
mod gsheets;
mod models;
mod normalize;
mod partition;
mod scheduler;
mod sheets;
mod store;

use scheduler::{Scheduler, Shutdown};

/// No flags gate behavior; the document URLs, team mapping, cutoff, and poll
/// interval are fixed deployment constants. The CLI exists for help/version.
#[derive(Parser)]
#[command(name = "ministry-signup-sorter")]
#[command(version)]
#[command(
    about = "Sorts volunteer ministry sign-ups into per-team sheets on a schedule",
    long_about = None
)]
struct Cli {}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ministry_signup_sorter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();
    init_tracing();

    let config = config::AppConfig::default();
    let provider = gsheets::SheetsConnector::from_default_location()?;

    let mut scheduler = Scheduler::new(config, provider);
    match scheduler.run().await? {
        Shutdown::DeadlineReached => Ok(()),
        Shutdown::RetriesExhausted => {
            anyhow::bail!("exceeded the maximum number of retries")
        }
    }
}
