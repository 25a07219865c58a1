use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    api::{self, AppState},
    config::Config,
    error::PlaylistError,
    info,
    spotify::SpotifyClient,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/playlist", post(api::generate))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

pub async fn start_api_server(config: &Config) -> Result<(), PlaylistError> {
    let state = Arc::new(AppState::new(
        SpotifyClient::new(config),
        config.export_path.clone(),
    ));

    let addr = SocketAddr::from_str(&config.server_addr).map_err(|e| {
        PlaylistError::Config(format!(
            "Failed to parse server address '{}': {}",
            config.server_addr, e
        ))
    })?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
