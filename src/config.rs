//! Configuration management for the workout playlist generator.
//!
//! Values come from environment variables, optionally loaded from a `.env`
//! file in the local data directory. Only the Spotify credentials are
//! required; everything else has a default.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, num::NonZeroUsize, path::PathBuf};

use crate::error::PlaylistError;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_EXPORT_PATH: &str = "matching_songs.csv";

/// Returns the platform data directory used for the `.env` file.
///
/// - Linux: `~/.local/share/workoutmix`
/// - macOS: `~/Library/Application Support/workoutmix`
/// - Windows: `%LOCALAPPDATA%/workoutmix`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("workoutmix");
    path
}

/// Loads environment variables from `workoutmix/.env` in the local data
/// directory.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error, since every value can also be provided by the environment itself.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file exists
/// but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let path = dir.join(".env");
    if !path.exists() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())
}

/// Runtime settings for one process.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub api_url: String,
    pub token_url: String,
    pub server_addr: String,
    pub export_path: PathBuf,
    /// Upper bound on pages per listing walk. `None` walks to the end.
    pub max_pages: Option<usize>,
    /// Token exchange attempts per refresh.
    pub refresh_attempts: u32,
}

impl Config {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            server_addr: DEFAULT_SERVER_ADDRESS.to_string(),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            max_pages: None,
            refresh_attempts: 1,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `SPOTIFY_API_AUTH_CLIENT_ID` | required |
    /// | `SPOTIFY_API_AUTH_CLIENT_SECRET` | required |
    /// | `SPOTIFY_API_REFRESH_TOKEN` | required |
    /// | `SPOTIFY_API_URL` | `https://api.spotify.com/v1` |
    /// | `SPOTIFY_API_TOKEN_URL` | `https://accounts.spotify.com/api/token` |
    /// | `SERVER_ADDRESS` | `127.0.0.1:8080` |
    /// | `EXPORT_PATH` | `matching_songs.csv` |
    /// | `SPOTIFY_MAX_PAGES` | unbounded |
    /// | `SPOTIFY_TOKEN_REFRESH_ATTEMPTS` | `1` |
    pub fn from_env() -> Result<Self, PlaylistError> {
        let mut config = Config::new(
            required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            required("SPOTIFY_API_REFRESH_TOKEN")?,
        );

        if let Some(url) = optional("SPOTIFY_API_URL") {
            config = config.with_api_url(url);
        }
        if let Some(url) = optional("SPOTIFY_API_TOKEN_URL") {
            config = config.with_token_url(url);
        }
        if let Some(addr) = optional("SERVER_ADDRESS") {
            config.server_addr = addr;
        }
        if let Some(path) = optional("EXPORT_PATH") {
            config.export_path = PathBuf::from(path);
        }
        if let Some(pages) = optional("SPOTIFY_MAX_PAGES") {
            config.max_pages = Some(parse_max_pages(&pages)?);
        }
        if let Some(attempts) = optional("SPOTIFY_TOKEN_REFRESH_ATTEMPTS") {
            config = config
                .with_refresh_attempts(parse_number("SPOTIFY_TOKEN_REFRESH_ATTEMPTS", &attempts)?);
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_refresh_attempts(mut self, attempts: u32) -> Self {
        self.refresh_attempts = attempts.max(1);
        self
    }
}

/// Parses a `SPOTIFY_MAX_PAGES` value. Zero is rejected, since a walk that
/// may not fetch any page cannot find anything.
pub fn parse_max_pages(value: &str) -> Result<usize, PlaylistError> {
    parse_number::<NonZeroUsize>("SPOTIFY_MAX_PAGES", value).map(NonZeroUsize::get)
}

fn required(name: &str) -> Result<String, PlaylistError> {
    optional(name).ok_or_else(|| PlaylistError::Config(format!("{} must be set", name)))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, PlaylistError> {
    value.trim().parse().map_err(|_| {
        PlaylistError::Config(format!("{} must be a positive number, got '{}'", name, value))
    })
}
