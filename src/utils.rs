use std::path::Path;

use crate::{
    error::PlaylistError,
    types::{PlaylistSummary, Track},
};

pub const CSV_HEADER: &str = "Title,Artist,Mood,Tempo,Energy,Valence";

/// A scored candidate from a name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub id: String,
    pub distance: usize,
}

/// Case-sensitive Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Picks the candidate whose name is closest to `query`.
///
/// Ties go to the candidate listed first.
pub fn resolve_by_name(
    query: &str,
    candidates: &[PlaylistSummary],
) -> Result<Candidate, PlaylistError> {
    let mut best: Option<Candidate> = None;

    for candidate in candidates {
        let distance = edit_distance(query, &candidate.name);
        if best.as_ref().is_none_or(|b| distance < b.distance) {
            best = Some(Candidate {
                name: candidate.name.clone(),
                id: candidate.id.clone(),
                distance,
            });
        }
    }

    best.ok_or_else(|| PlaylistError::NotFound(query.to_string()))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn tracks_to_csv(tracks: &[Track]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for track in tracks {
        let row = [
            csv_field(&track.title),
            csv_field(&track.artist),
            track.mood.to_string(),
            track.tempo.to_string(),
            track.energy.to_string(),
            track.valence.to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Writes `tracks` as CSV to `path`, creating parent directories.
pub async fn export_csv(path: &Path, tracks: &[Track]) -> Result<(), PlaylistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        async_fs::create_dir_all(parent).await?;
    }

    async_fs::write(path, tracks_to_csv(tracks)).await?;
    Ok(())
}
