use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    error::PlaylistError,
    types::{Credential, TokenResponse},
};

/// Builds the `Basic` authorization value for the client credentials.
pub fn basic_auth_value(client_id: &str, client_secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", client_id, client_secret));
    format!("Basic {}", encoded)
}

/// Exchanges a refresh token for a new access token.
///
/// Sends `grant_type=refresh_token` to the token endpoint with the client id
/// and secret as HTTP Basic credentials. The returned [`Credential`] expires
/// one minute before the lifetime reported by Spotify.
///
/// # Errors
///
/// - [`PlaylistError::Auth`] when the endpoint answers with a non-success
///   status, or with a body lacking `access_token` / `expires_in`. The status
///   and raw body are kept for diagnostics.
/// - [`PlaylistError::Request`] for network failures.
pub async fn refresh_access_token(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<Credential, PlaylistError> {
    let res = client
        .post(token_url)
        .header(AUTHORIZATION, basic_auth_value(client_id, client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(PlaylistError::Auth {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: Option<TokenResponse> = serde_json::from_str(&body).ok();
    match parsed {
        Some(TokenResponse {
            access_token: Some(access_token),
            expires_in: Some(expires_in),
        }) if !access_token.is_empty() => {
            Credential::from_ttl(access_token, expires_in, Utc::now()).ok_or(PlaylistError::Auth {
                status: status.as_u16(),
                body,
            })
        }
        _ => Err(PlaylistError::Auth {
            status: status.as_u16(),
            body,
        }),
    }
}
