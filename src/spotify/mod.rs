//! # Spotify Integration Module
//!
//! HTTP access to the Spotify Web API for the import pipeline: the
//! refresh-token exchange, cursor pagination over listings, playlist
//! lookups and per-track audio features.
//!
//! ```text
//! Application Layer (CLI, Web form)
//!          ↓
//! Management Layer (TokenManager, PlaylistStore)
//!          ↓
//! Spotify Integration Layer
//!     ├── auth        POST /api/token (refresh_token grant)
//!     ├── pagination  cursor walk over `next`
//!     ├── playlists   GET /me/playlists, GET /playlists/{id}/tracks
//!     └── features    GET /audio-features/{id}
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! All requests except the token exchange carry `Authorization: Bearer`
//! with a token obtained from [`TokenManager::ensure_valid`]. There are no
//! built-in timeouts or retries; a page failure aborts the walk, while a
//! failed audio-features lookup only affects its own track.

pub mod auth;
pub mod features;
pub mod pagination;
pub mod playlists;

use std::sync::Arc;

use reqwest::Client;

use crate::{config::Config, management::TokenManager};

pub use features::TrackEnricher;
pub use pagination::Paginator;

/// Shared handle to the Spotify API: one HTTP client, one token manager.
///
/// Cloning is cheap; clones share the credential.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    tokens: Arc<TokenManager>,
    api_url: String,
    max_pages: Option<usize>,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Self {
        let http = Client::new();
        let tokens = Arc::new(TokenManager::new(http.clone(), config));
        Self {
            http,
            tokens,
            api_url: config.api_url.clone(),
            max_pages: config.max_pages,
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }

    pub fn enricher(&self) -> TrackEnricher {
        TrackEnricher::new(self.http.clone(), self.api_url.clone())
    }
}
