use std::{path::PathBuf, sync::Arc};

use axum::{Extension, Form, response::Html};
use indicatif::ProgressBar;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    error::PlaylistError, management, spotify::SpotifyClient, success, types::Track, utils,
    warning,
};

/// Shared state of the web front-end. Each request builds its own store;
/// only the Spotify client, and with it the credential, is shared.
pub struct AppState {
    pub client: SpotifyClient,
    pub export_path: PathBuf,
    /// Held while the export file is written.
    pub export_lock: Mutex<()>,
}

impl AppState {
    pub fn new(client: SpotifyClient, export_path: PathBuf) -> Self {
        Self {
            client,
            export_path,
            export_lock: Mutex::new(()),
        }
    }

    /// Writes `tracks` to the shared export path, one request at a time.
    pub async fn export_matches(&self, tracks: &[Track]) -> Result<(), PlaylistError> {
        let _guard = self.export_lock.lock().await;
        utils::export_csv(&self.export_path, tracks).await
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutForm {
    #[serde(default)]
    pub playlist_name: String,
    #[serde(default)]
    pub workout_type: String,
    #[serde(default)]
    pub desired_mood: String,
}

pub enum PageOutcome<'a> {
    Empty,
    Matches(&'a [Track]),
    Failed(String),
}

pub async fn index() -> Html<String> {
    Html(render_page(&WorkoutForm::default(), PageOutcome::Empty))
}

pub async fn generate(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<WorkoutForm>,
) -> Html<String> {
    if form.playlist_name.trim().is_empty() {
        return Html(render_page(
            &form,
            PageOutcome::Failed("Playlist name is required.".to_string()),
        ));
    }

    let pb = ProgressBar::hidden();
    let (store, report) =
        match management::import_playlist_by_name(&state.client, form.playlist_name.trim(), &pb)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warning!("Request for '{}' failed: {}", form.playlist_name, e);
                return Html(render_page(
                    &form,
                    PageOutcome::Failed(format!("An error occurred: {}", e)),
                ));
            }
        };

    success!(
        "Imported {} songs from Spotify playlist ({} skipped).",
        report.imported,
        report.skipped.len()
    );

    let matches = store.query(form.workout_type.trim(), form.desired_mood.trim());
    if !matches.is_empty() {
        match state.export_matches(&matches).await {
            Ok(()) => success!(
                "Exported matching songs to {}",
                state.export_path.display()
            ),
            Err(e) => warning!("Failed to export matching songs: {}", e),
        }
    }

    Html(render_page(&form, PageOutcome::Matches(&matches)))
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(form: &WorkoutForm, outcome: PageOutcome<'_>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Smart Workout Playlist</title></head><body>\n<h2>Smart Workout Playlist Generator</h2>\n",
    );

    html.push_str(&format!(
        "<form method=\"post\" action=\"/playlist\">\n\
         <label>Playlist name <input name=\"playlist_name\" value=\"{}\"></label>\n\
         <label>Workout type <input name=\"workout_type\" value=\"{}\" placeholder=\"Cardio/Strength/Yoga\"></label>\n\
         <label>Mood <input name=\"desired_mood\" value=\"{}\" placeholder=\"Energetic/Relaxed/Focused/Neutral\"></label>\n\
         <button type=\"submit\">Generate</button>\n</form>\n",
        escape_html(&form.playlist_name),
        escape_html(&form.workout_type),
        escape_html(&form.desired_mood),
    ));

    match outcome {
        PageOutcome::Empty => {}
        PageOutcome::Failed(message) => {
            html.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(&message)));
        }
        PageOutcome::Matches([]) => {
            html.push_str("<p>No matching songs found for your workout preferences.</p>\n");
        }
        PageOutcome::Matches(tracks) => {
            html.push_str(
                "<table>\n<tr><th>Title</th><th>Artist</th><th>Mood</th><th>Tempo</th><th>Energy</th><th>Valence</th></tr>\n",
            );
            for t in tracks {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
                    escape_html(&t.title),
                    escape_html(&t.artist),
                    t.mood,
                    t.tempo,
                    t.energy,
                    t.valence
                ));
            }
            html.push_str("</table>\n");
        }
    }

    html.push_str("</body></html>\n");
    html
}
