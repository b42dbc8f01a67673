use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_TEMPLATE: &str = r#"# plex-track-matcher configuration
#
# URL of the Plex server, e.g. "https://192.168.1.50:32400"
plex_url = ""
# Plex access token, see https://support.plex.tv/articles/204059436
plex_token = ""
# Verify the server's TLS certificate. Local servers usually present one
# that does not match their LAN address.
verify_tls = false
"#;

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    plex_url: Option<String>,
    plex_token: Option<String>,
    verify_tls: Option<bool>,
}

/// Connection target for the Plex server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub url: String,
    pub token: String,
    pub verify_tls: bool,
}

/// Connection settings gathered before sign-in. Missing values are asked for interactively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub verify_tls: bool,
}

impl ConnectionSettings {
    /// Returns a complete config if both URL and token are known.
    pub fn server_config(&self) -> Option<ServerConfig> {
        Some(ServerConfig {
            url: self.url.clone()?,
            token: self.token.clone()?,
            verify_tls: self.verify_tls,
        })
    }
}

/// Values given on the command line. They take precedence over the environment and config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub token: Option<String>,
    pub verify_tls: bool,
}

pub fn load_settings(overrides: Overrides) -> Result<ConnectionSettings> {
    let config_path = get_config_path();
    if !config_path.exists() {
        if let Err(e) = write_config_template(&config_path) {
            warn!("Failed to create config template at {}: {e}", config_path.display());
        } else {
            println!("Created config file at {}", config_path.display());
        }
    }

    load_settings_from(&config_path, |name| env::var(name).ok(), overrides)
}

fn load_settings_from(
    config_path: &Path,
    lookup_env: impl Fn(&str) -> Option<String>,
    overrides: Overrides,
) -> Result<ConnectionSettings> {
    let file = if config_path.exists() {
        debug!("Reading config from {}", config_path.display());
        let config_content = fs::read_to_string(config_path)?;
        toml::from_str(&config_content)?
    } else {
        ConfigFile::default()
    };

    let url = non_empty(overrides.url)
        .or_else(|| non_empty(lookup_env("PLEX_URL")))
        .or_else(|| non_empty(file.plex_url));
    let token = non_empty(overrides.token)
        .or_else(|| non_empty(lookup_env("PLEX_TOKEN")))
        .or_else(|| non_empty(file.plex_token));

    Ok(ConnectionSettings {
        url,
        token,
        verify_tls: overrides.verify_tls || file.verify_tls.unwrap_or(false),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn write_config_template(config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_path, CONFIG_TEMPLATE)?;
    Ok(())
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("plex-track-matcher"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
