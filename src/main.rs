//! Contest client - Application Entry Point
//!
//! This is the main entry point for the console contest client.

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contest_client::{config::CONFIG, console::Console, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so they never mix with console output
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| CONFIG.logging.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if CONFIG.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting contest client...");

    let state = AppState::from_config(CONFIG.clone())?;
    let input = BufReader::new(tokio::io::stdin());
    Console::new(state, std::io::stdout()).run(input).await?;

    tracing::info!("Contest client stopped");
    Ok(())
}
