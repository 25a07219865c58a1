mod auth;
mod playlist;

pub use auth::TokenManager;
pub use playlist::ImportReport;
pub use playlist::PlaylistStore;
pub use playlist::import_playlist_by_name;
pub use playlist::partition_outcomes;
