use crate::{
    error::PlaylistError,
    info,
    spotify::{SpotifyClient, pagination::fetch_all},
    types::{PlaylistSummary, PlaylistTrackItem, TrackStub},
    utils,
};

/// Retrieves every playlist of the current user, walking `/me/playlists`
/// fifty at a time.
pub async fn list_playlists(client: &SpotifyClient) -> Result<Vec<PlaylistSummary>, PlaylistError> {
    let url = format!("{uri}/me/playlists?limit=50", uri = client.api_url());
    fetch_all(client.http(), client.tokens(), &url, client.max_pages()).await
}

/// Resolves a free-text playlist name to the id of the closest playlist.
///
/// # Errors
///
/// [`PlaylistError::NotFound`] when the user has no playlists at all; any
/// fetch or token error from the listing walk is passed through.
pub async fn find_playlist_id_by_name(
    client: &SpotifyClient,
    playlist_name: &str,
) -> Result<String, PlaylistError> {
    let playlists = list_playlists(client).await?;
    let best = utils::resolve_by_name(playlist_name, &playlists)?;

    info!("Best matching playlist: {} (ID: {})", best.name, best.id);
    Ok(best.id)
}

/// Lists the tracks of a playlist as stubs, in playlist order.
///
/// Items without a track or without a track id (local files, removed
/// tracks) are left out.
pub async fn playlist_track_stubs(
    client: &SpotifyClient,
    playlist_id: &str,
) -> Result<Vec<TrackStub>, PlaylistError> {
    let url = format!(
        "{uri}/playlists/{id}/tracks?limit=100",
        uri = client.api_url(),
        id = playlist_id
    );

    let items: Vec<PlaylistTrackItem> =
        fetch_all(client.http(), client.tokens(), &url, client.max_pages()).await?;

    Ok(items.into_iter().filter_map(TrackStub::from_item).collect())
}
