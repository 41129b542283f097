//! Cookstash - recipe box server
//!
//! Serves the local recipe collection and proxies the Spoonacular recipe
//! API with response caching, for the browser client to consume.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cookstash::cli::{Cli, Config};
use cookstash::server::{self, AppState};
use cookstash::store::{NewRecipe, RecipeStore};
use cookstash::upstream::SpoonacularClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    let store = RecipeStore::open(&config.data_file)?;
    if let Some(seed_path) = &config.seed_file {
        let raw = fs::read_to_string(seed_path)?;
        let seeds: Vec<NewRecipe> = serde_json::from_str(&raw)?;
        let seeded = store.seed_if_empty(seeds)?;
        if seeded > 0 {
            info!(count = seeded, "Seeded starter recipes");
        }
    }

    let state = AppState {
        store: Arc::new(store),
        upstream: Arc::new(SpoonacularClient::new(config.api_key.clone())),
    };

    info!(
        port = config.port,
        data_file = %config.data_file.display(),
        "Starting server"
    );
    server::serve(state, config.port).await?;

    Ok(())
}
