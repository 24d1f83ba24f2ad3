use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};

/// Load environment variables from .env files in multiple locations
///
/// Priority order (highest to lowest):
/// 1. Current directory .env
/// 2. ~/.tierlist/.env
/// 3. Environment variables already set
///
/// This allows:
/// - Global installation: `cargo install --path tierlist-cli`
/// - Global config: ~/.tierlist/.env
/// - Local overrides: ./.env in any directory
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    // Check current directory first (highest priority)
    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(format!("current directory ({})", path.display()));
        debug!("Loaded .env from current directory: {}", path.display());
    }

    // Check ~/.tierlist/.env
    if let Some(dir) = config_dir() {
        let env_file = dir.join(".env");
        if env_file.exists() {
            // dotenvy doesn't overwrite existing vars, so this is safe
            match dotenvy::from_path(&env_file) {
                Ok(_) => {
                    loaded_from.push(format!("~/.tierlist/.env ({})", env_file.display()));
                }
                Err(e) => {
                    debug!("Failed to load ~/.tierlist/.env: {}", e);
                }
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.tierlist)");
    } else {
        info!("Loaded configuration from: {}", loaded_from.join(", "));
    }
}

/// Get the tierlist config directory path (~/.tierlist)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tierlist"))
}

/// Application configuration
///
/// Loaded from TOML files with env-var fallbacks for secrets:
/// 1. ./tierlist.toml (project-specific, overrides)
/// 2. ~/.tierlist/config.toml (user defaults)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub images: ImagesSection,

    #[serde(default)]
    pub site: SiteSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow permissive CORS (any origin). Off by default.
    #[serde(default)]
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// Postgres connection string. DATABASE_URL overrides.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Image CDN credentials. The token stays in env vars; only the public
/// account hash belongs in a config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImagesSection {
    #[serde(default)]
    pub account_id: Option<String>,

    #[serde(default)]
    pub account_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    /// Canonical site origin used in sitemap URLs.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_max_connections() -> u32 {
    10
}

fn default_base_url() -> String {
    "https://tier-lst.com".to_string()
}

impl AppConfig {
    /// Load config from TOML files, local overriding global.
    pub fn load() -> Self {
        let mut config = AppConfig::default();

        if let Some(global_path) = config_dir().map(|d| d.join("config.toml")) {
            if let Some(parsed) = Self::read_file(&global_path) {
                config = parsed;
            }
        }

        let local_path = PathBuf::from("tierlist.toml");
        if let Some(parsed) = Self::read_file(&local_path) {
            config = parsed;
        }

        config
    }

    fn read_file(path: &PathBuf) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(parsed) => {
                    debug!("Loaded config from {}", path.display());
                    Some(parsed)
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Resolve the database URL, preferring the DATABASE_URL env var.
    pub fn database_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return Ok(url);
        }
        self.database
            .url
            .clone()
            .ok_or_else(|| CoreError::missing_config("DATABASE_URL"))
    }

    /// Resolve the image CDN account id (CLOUDFLARE_ACCOUNT_ID overrides).
    pub fn images_account_id(&self) -> Result<String> {
        env_or(&self.images.account_id, "CLOUDFLARE_ACCOUNT_ID")
    }

    /// Resolve the public account hash used in delivery URLs.
    pub fn images_account_hash(&self) -> Result<String> {
        env_or(&self.images.account_hash, "CLOUDFLARE_ACCOUNT_HASH")
    }

    /// The API token is env-only; it never belongs in a config file.
    pub fn images_api_token(&self) -> Result<String> {
        std::env::var("CLOUDFLARE_API_TOKEN")
            .map_err(|_| CoreError::missing_config("CLOUDFLARE_API_TOKEN"))
    }
}

fn env_or(file_value: &Option<String>, var: &str) -> Result<String> {
    if let Ok(v) = std::env::var(var) {
        if !v.is_empty() {
            return Ok(v);
        }
    }
    file_value
        .clone()
        .ok_or_else(|| CoreError::missing_config(var))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_ends_with_tierlist() {
        if let Some(path) = config_dir() {
            assert!(path.ends_with(".tierlist"));
        }
    }

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3030);
        assert!(!config.server.cors_permissive);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.site.base_url, "https://tier-lst.com");
    }

    #[test]
    fn load_without_files_uses_defaults() {
        let config = AppConfig::load();
        assert_eq!(config.server.port, 3030);
    }

    #[test]
    fn toml_roundtrip() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            cors_permissive = true

            [database]
            max_connections = 25

            [site]
            base_url = "https://example.org"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.server.port, 8080);
        assert!(parsed.server.cors_permissive);
        assert_eq!(parsed.database.max_connections, 25);
        assert_eq!(parsed.site.base_url, "https://example.org");
    }

    #[test]
    fn load_dotenv_doesnt_panic() {
        load_dotenv();
    }
}
