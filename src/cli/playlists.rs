use tabled::Table;

use crate::{config::Config, spotify, types::PlaylistTableRow, warning};

use super::{print_guidance, spinner};

pub async fn list_playlists(config: &Config, search: Option<String>) {
    let client = spotify::SpotifyClient::new(config);

    let pb = spinner("Fetching playlists...");
    let result = spotify::playlists::list_playlists(&client).await;
    pb.finish_and_clear();

    let mut playlists = match result {
        Ok(playlists) => playlists,
        Err(e) => {
            print_guidance(&e);
            crate::error!("Failed to fetch playlists: {}", e);
        }
    };

    if let Some(search) = search {
        let search_term = search.to_lowercase();
        playlists.retain(|p| p.name.to_lowercase().contains(&search_term));
    }

    if playlists.is_empty() {
        warning!("No playlists found.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            id: p.id,
        })
        .collect();
    println!("{}", Table::new(rows));
}
