use std::path::PathBuf;

use tabled::Table;

use crate::{
    config::Config,
    error::PlaylistError,
    info, management,
    spotify::SpotifyClient,
    success,
    types::{Mood, TrackTableRow, WorkoutType},
    utils, warning,
};

use super::{print_guidance, spinner};

/// Imports the named playlist and prints the tracks that fit the workout.
///
/// Tracks whose audio features cannot be fetched are skipped with a warning.
/// Token, listing and lookup failures end the command with guidance on what
/// to check.
pub async fn generate(
    config: &Config,
    playlist_name: String,
    workout_type: String,
    desired_mood: String,
    export: Option<PathBuf>,
) {
    let playlist_name = playlist_name.trim();
    let workout_type = workout_type.trim();
    let desired_mood = desired_mood.trim();

    if let WorkoutType::Other(other) = WorkoutType::parse(workout_type) {
        warning!(
            "Unknown workout type '{}', tracks will only be filtered by mood.",
            other
        );
    }
    if desired_mood.parse::<Mood>().is_err() {
        warning!(
            "Unknown mood '{}', expected one of Energetic, Relaxed, Focused, Neutral.",
            desired_mood
        );
    }

    let client = SpotifyClient::new(config);

    info!("Importing playlist...");
    let pb = spinner("Looking up playlist...");
    let result = management::import_playlist_by_name(&client, playlist_name, &pb).await;
    pb.finish_and_clear();

    let (store, report) = match result {
        Ok(result) => result,
        Err(e) => fail(e),
    };

    success!(
        "Imported {} songs from Spotify playlist ({} skipped).",
        report.imported,
        report.skipped.len()
    );

    let matches = store.query(workout_type, desired_mood);
    if matches.is_empty() {
        info!("No matching songs found for your workout preferences.");
        return;
    }

    info!("Matching songs for your workout:");
    let rows: Vec<TrackTableRow> = matches.iter().map(TrackTableRow::from).collect();
    println!("{}", Table::new(rows));

    if let Some(path) = export {
        match utils::export_csv(&path, &matches).await {
            Ok(()) => success!("Exported matching songs to {}", path.display()),
            Err(e) => warning!("Failed to export matching songs: {}", e),
        }
    }
}

fn fail(e: PlaylistError) -> ! {
    print_guidance(&e);
    crate::error!("An error occurred: {}", e);
}
