//! tierlist CLI - API server and operations tooling for the tier-list site
//!
//! Subcommands:
//! - `serve`: run the HTTP API server
//! - `config`: print the resolved configuration

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "tierlist",
    author,
    version,
    about = "API server for the tier-list community site"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Print the resolved configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env before anything reads the environment
    tierlist_core::config::load_dotenv();

    let cli = Cli::parse();
    tracing_setup::init_tracing(cli.debug)?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
        Commands::Config => {
            let config = tierlist_core::AppConfig::load();
            println!("server.host          = {}", config.server.host);
            println!("server.port          = {}", config.server.port);
            println!("server.cors_permissive = {}", config.server.cors_permissive);
            println!("database.max_connections = {}", config.database.max_connections);
            println!(
                "database.url         = {}",
                if config.database_url().is_ok() { "(set)" } else { "(missing)" }
            );
            println!(
                "images.account_id    = {}",
                if config.images_account_id().is_ok() { "(set)" } else { "(missing)" }
            );
            println!(
                "images.api_token     = {}",
                if config.images_api_token().is_ok() { "(set)" } else { "(missing)" }
            );
            println!("site.base_url        = {}", config.site.base_url);
            Ok(())
        }
    }
}
