use reqwest::Client;

use crate::{
    error::{EnrichmentError, EnrichmentFailure},
    types::{AudioFeatures, Track, TrackStub},
};

/// Turns playlist stubs into classified [`Track`]s using the audio-features
/// endpoint.
#[derive(Clone)]
pub struct TrackEnricher {
    client: Client,
    api_url: String,
}

impl TrackEnricher {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Fetches tempo, energy and valence for `stub` and classifies its mood.
    ///
    /// `token` must be a valid access token; the caller obtains it from the
    /// [`TokenManager`](crate::management::TokenManager) so that a failed
    /// refresh stays fatal while a failed lookup only skips this track.
    pub async fn enrich(&self, token: &str, stub: TrackStub) -> Result<Track, EnrichmentError> {
        match self.fetch_features(token, &stub.id).await {
            Ok(features) => Ok(Track::from_features(stub, &features)),
            Err(reason) => Err(EnrichmentError {
                track_id: stub.id,
                title: stub.title,
                reason,
            }),
        }
    }

    async fn fetch_features(
        &self,
        token: &str,
        track_id: &str,
    ) -> Result<AudioFeatures, EnrichmentFailure> {
        let url = format!(
            "{uri}/audio-features/{id}",
            uri = self.api_url,
            id = track_id
        );

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(EnrichmentFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_features(&body)
    }
}

/// Parses an audio-features body, rejecting `null` bodies and descriptors
/// outside their documented ranges.
pub fn parse_features(body: &str) -> Result<AudioFeatures, EnrichmentFailure> {
    let features: Option<AudioFeatures> =
        serde_json::from_str(body).map_err(|e| EnrichmentFailure::Malformed(e.to_string()))?;
    let features =
        features.ok_or_else(|| EnrichmentFailure::Malformed("empty response".to_string()))?;

    if !features.tempo.is_finite() || features.tempo < 0.0 {
        return Err(EnrichmentFailure::Malformed(format!(
            "tempo out of range: {}",
            features.tempo
        )));
    }
    for (name, value) in [("energy", features.energy), ("valence", features.valence)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(EnrichmentFailure::Malformed(format!(
                "{} out of range: {}",
                name, value
            )));
        }
    }

    Ok(features)
}
