use indicatif::ProgressBar;

use crate::{
    error::{EnrichmentError, PlaylistError},
    spotify::{self, SpotifyClient, TrackEnricher},
    types::{Mood, Track, TrackStub, WorkoutType},
    warning,
};

/// Outcome of importing a batch of stubs.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<EnrichmentError>,
}

/// Splits per-track outcomes into enriched tracks and skipped ones, keeping
/// the input order on both sides.
pub fn partition_outcomes(
    outcomes: impl IntoIterator<Item = Result<Track, EnrichmentError>>,
) -> (Vec<Track>, Vec<EnrichmentError>) {
    outcomes.into_iter().fold(
        (Vec::new(), Vec::new()),
        |(mut tracks, mut failures), outcome| {
            match outcome {
                Ok(track) => tracks.push(track),
                Err(e) => failures.push(e),
            }
            (tracks, failures)
        },
    )
}

/// Enriched tracks of one run, in catalog order.
#[derive(Debug, Default)]
pub struct PlaylistStore {
    tracks: Vec<Track>,
}

impl PlaylistStore {
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    pub fn add_track(&mut self, track: Track) -> &mut Self {
        self.tracks.push(track);
        self
    }

    pub fn add_tracks(&mut self, tracks: Vec<Track>) -> &mut Self {
        self.tracks.extend(tracks);
        self
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Enriches `stubs` one after another and appends the successes.
    ///
    /// A track whose audio features cannot be fetched or parsed is reported
    /// with a warning and left out; the remaining tracks are still imported.
    /// A failed token refresh aborts the import.
    pub async fn import_batch(
        &mut self,
        stubs: Vec<TrackStub>,
        client: &SpotifyClient,
        enricher: &TrackEnricher,
        pb: &ProgressBar,
    ) -> Result<ImportReport, PlaylistError> {
        let mut outcomes = Vec::with_capacity(stubs.len());

        for stub in stubs {
            let token = client.tokens().ensure_valid().await?;
            pb.set_message(format!("Analyzing {}...", stub.title));

            let outcome = enricher.enrich(&token, stub).await;
            if let Err(e) = &outcome {
                pb.suspend(|| {
                    warning!(
                        "Could not fetch audio features for track '{}' (ID: {}). Skipping this song.",
                        e.title,
                        e.track_id
                    )
                });
            }
            outcomes.push(outcome);
            pb.inc(1);
        }

        let (tracks, skipped) = partition_outcomes(outcomes);
        let imported = tracks.len();
        self.add_tracks(tracks);

        Ok(ImportReport { imported, skipped })
    }

    /// Tracks whose mood equals `desired_mood` (ignoring case) and that suit
    /// `workout_type`, in import order.
    pub fn query(&self, workout_type: &str, desired_mood: &str) -> Vec<Track> {
        let workout = WorkoutType::parse(workout_type);
        self.tracks
            .iter()
            .filter(|t| t.mood.matches(desired_mood) && workout.accepts(t))
            .cloned()
            .collect()
    }

    pub fn count_by_mood(&self, mood: Mood) -> usize {
        self.tracks.iter().filter(|t| t.mood == mood).count()
    }
}

/// Resolves `playlist_name`, lists its tracks and imports them into a fresh
/// store.
pub async fn import_playlist_by_name(
    client: &SpotifyClient,
    playlist_name: &str,
    pb: &ProgressBar,
) -> Result<(PlaylistStore, ImportReport), PlaylistError> {
    let playlist_id = spotify::playlists::find_playlist_id_by_name(client, playlist_name).await?;
    let stubs = spotify::playlists::playlist_track_stubs(client, &playlist_id).await?;

    pb.set_length(stubs.len() as u64);
    let mut store = PlaylistStore::new();
    let report = store
        .import_batch(stubs, client, &client.enricher(), pb)
        .await?;

    Ok((store, report))
}
