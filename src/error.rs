//! Error types for the import pipeline.
//!
//! Fatal failures (token exchange, page fetches, name resolution) are
//! [`PlaylistError`]s and end a run. A failed audio-features lookup for a
//! single track is an [`EnrichmentError`]; the import loop records it and
//! moves on to the next track.

use thiserror::Error;

/// Errors that terminate a pipeline run.
#[derive(Error, Debug)]
pub enum PlaylistError {
    /// The refresh-token exchange was rejected or returned an unusable body.
    #[error("Failed to refresh token. Status: {status}, Response: {body}")]
    Auth { status: u16, body: String },

    /// A page request returned a non-success status.
    #[error("Failed to fetch {url}. Status: {status}, Response: {body}")]
    Fetch {
        url: String,
        status: u16,
        body: String,
    },

    /// No candidate was available for a name lookup.
    #[error("No playlist found matching '{0}'.")]
    NotFound(String),

    /// The response body did not have the documented shape.
    #[error("Unexpected response from {url}: {reason}")]
    Parse { url: String, reason: String },

    /// Network or client level failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlaylistError {
    /// Whether the failure points at credentials rather than the playlist.
    pub fn is_auth(&self) -> bool {
        matches!(self, PlaylistError::Auth { .. })
    }
}

/// Why the audio features of one track could not be used.
#[derive(Error, Debug)]
pub enum EnrichmentFailure {
    #[error("audio features request failed. Status: {status}, Response: {body}")]
    Status { status: u16, body: String },

    #[error("malformed audio features: {0}")]
    Malformed(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A single track that was skipped during import.
#[derive(Error, Debug)]
#[error("Could not fetch audio features for track '{title}' (ID: {track_id}): {reason}")]
pub struct EnrichmentError {
    pub track_id: String,
    pub title: String,
    #[source]
    pub reason: EnrichmentFailure,
}
