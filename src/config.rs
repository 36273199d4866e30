use crate::error::{Error, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const DEFAULT_CLIENT_SECRET_PATH: &str = "config/client_secret.json";
pub const DEFAULT_TOKEN_CACHE_PATH: &str = "config/token.json";

/// Settings read from the `youtube` section of the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub client_secret: PathBuf,
    pub token_cache: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            client_secret: PathBuf::from(DEFAULT_CLIENT_SECRET_PATH),
            token_cache: PathBuf::from(DEFAULT_TOKEN_CACHE_PATH),
        }
    }
}

impl Config {
    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        info!("Loading config from {}", path.display());
        Config::from_json(&fs::read_to_string(path)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let root = json::parse(text)?;
        let youtube = &root["youtube"];
        if !youtube.is_object() {
            return Err(Error::Config("missing \"youtube\" section".to_owned()));
        }

        let defaults = Config::default();
        let path_or = |key: &str, default: PathBuf| {
            youtube[key].as_str().map(PathBuf::from).unwrap_or(default)
        };
        Ok(Config {
            api_key: youtube["api_key"]
                .as_str()
                .filter(|key| !key.is_empty())
                .map(str::to_owned),
            client_secret: path_or("client_secret", defaults.client_secret),
            token_cache: path_or("token_cache", defaults.token_cache),
        })
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config("youtube.api_key is not set".to_owned()))
    }
}
