//! # CLI Module
//!
//! Command implementations for the `workoutmix` binary. Each command builds
//! a [`SpotifyClient`](crate::spotify::SpotifyClient) from the loaded
//! configuration, runs its part of the pipeline and renders the result.
//!
//! - [`generate`] - resolve a playlist by name, import and classify its
//!   tracks, print those matching a workout type and mood, optionally export
//!   them as CSV
//! - [`list_playlists`] - list the user's playlists
//! - [`serve`] - run the web form
//!
//! Fatal errors end the process through [`error!`](crate::error) after
//! printing hints on what to check.
//!
//! ```bash
//! workoutmix generate --playlist "Morning Run" --workout cardio --mood energetic
//! workoutmix generate --playlist "Chill" --workout yoga --mood relaxed --export yoga.csv
//! workoutmix playlists --search run
//! workoutmix serve
//! ```

mod generate;
mod playlists;
mod serve;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{error::PlaylistError, info};

pub use generate::generate;
pub use playlists::list_playlists;
pub use serve::serve;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

fn print_guidance(e: &PlaylistError) {
    match e {
        PlaylistError::Config(_) => {
            info!("Check the .env file in {}", crate::config::data_dir().display());
        }
        PlaylistError::NotFound(_) => {
            info!("Ensure the playlist exists in your Spotify account and is accessible.");
        }
        _ if e.is_auth() => {
            info!("Verify that your Spotify API credentials are correct and up-to-date.");
        }
        _ => {
            info!("If the error persists, please check the following:");
            info!("1. Ensure the playlist exists in your Spotify account and is accessible.");
            info!("2. Verify that your Spotify API credentials are correct and up-to-date.");
            info!(
                "3. Check if you have the necessary permissions to access your playlists and their tracks."
            );
        }
    }
}
