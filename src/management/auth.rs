use reqwest::Client;
use tokio::sync::Mutex;

use crate::{config::Config, error::PlaylistError, spotify, types::Credential, warning};

/// Owns the access credential for one process and refreshes it on demand.
///
/// The credential sits behind an async mutex that is held across the token
/// exchange, so concurrent callers wait for a single refresh instead of
/// issuing their own.
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_secret: String,
    refresh_attempts: u32,
    credential: Mutex<Option<Credential>>,
}

impl TokenManager {
    pub fn new(client: Client, config: &Config) -> Self {
        TokenManager {
            client,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_secret: config.refresh_token.clone(),
            refresh_attempts: config.refresh_attempts.max(1),
            credential: Mutex::new(None),
        }
    }

    /// Returns an access token that has not expired, refreshing first when
    /// there is none yet or the current one is past its expiry.
    pub async fn ensure_valid(&self) -> Result<String, PlaylistError> {
        let mut credential = self.credential.lock().await;

        if let Some(current) = credential.as_ref() {
            if !current.is_expired() {
                return Ok(current.access_token.clone());
            }
        }

        let fresh = self.exchange().await?;
        let token = fresh.access_token.clone();
        *credential = Some(fresh);
        Ok(token)
    }

    /// Replaces the credential unconditionally.
    pub async fn refresh(&self) -> Result<String, PlaylistError> {
        let mut credential = self.credential.lock().await;
        let fresh = self.exchange().await?;
        let token = fresh.access_token.clone();
        *credential = Some(fresh);
        Ok(token)
    }

    pub async fn current(&self) -> Option<Credential> {
        self.credential.lock().await.clone()
    }

    async fn exchange(&self) -> Result<Credential, PlaylistError> {
        let mut attempt = 1;
        loop {
            let result = spotify::auth::refresh_access_token(
                &self.client,
                &self.token_url,
                &self.client_id,
                &self.client_secret,
                &self.refresh_secret,
            )
            .await;

            match result {
                Err(e) if attempt < self.refresh_attempts => {
                    warning!(
                        "Token refresh attempt {}/{} failed: {}",
                        attempt,
                        self.refresh_attempts,
                        e
                    );
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
