//! HTTP server command
//!
//! Runs the tierlist API server with all routes.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use tierlist_core::AppConfig;
use tierlist_images::ImagesClient;
use tierlist_server::db::create_pool_with_options;
use tierlist_server::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = AppConfig::load();

    let database_url = match args.database_url {
        Some(url) => url,
        None => config.database_url().context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.tierlist/.env",
        )?,
    };

    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .context("invalid host/port in config")?,
    };

    let images = ImagesClient::new(
        config.images_account_id().context("image CDN account id missing")?,
        config.images_api_token().context("image CDN api token missing")?,
        config.images_account_hash().context("image CDN account hash missing")?,
    );

    tracing::info!("Starting tierlist server on {}", bind_addr);

    let pool = create_pool_with_options(&database_url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    let state = AppState::new(pool, images, config.site.base_url.clone());

    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
    };

    // Blocks until shutdown
    run_server(state, server_config).await.context("Server error")?;

    Ok(())
}
