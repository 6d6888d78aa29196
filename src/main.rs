use anyhow::Result;
use clap::Parser;
use log::info;

use openfx_cli::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env so OPENFX_URL and friends can live next to a project
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Cli::parse();
    info!("Starting openfx-cli");

    cli::run(args).await
}
