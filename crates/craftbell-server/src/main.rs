use std::path::PathBuf;

use clap::Parser;

use craftbell_core::config::Config;
use craftbell_server::state::AppState;
use craftbell_server::store::RedbStore;

#[derive(Parser)]
#[command(
    name = "craftbell",
    about = "Webhook bot that boots the game server on demand and notifies subscribers",
    version
)]
struct Cli {
    /// Port to listen on
    #[arg(long, short = 'p', env = "CRAFTBELL_PORT", default_value_t = 3141)]
    port: u16,

    /// Config file (YAML); omit to read configuration from the environment
    #[arg(long, env = "CRAFTBELL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    let store = RedbStore::open(&config.subscriber_db)?;
    let app_state = AppState::new(config, store);
    craftbell_server::serve(app_state, cli.port).await
}
