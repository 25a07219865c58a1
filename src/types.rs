use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Seconds subtracted from a token's lifetime so it is replaced before the
/// API starts rejecting it.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Builds a credential obtained at `now` that lives for `ttl_secs`.
    ///
    /// Returns `None` when the expiry cannot be represented.
    pub fn from_ttl(access_token: String, ttl_secs: i64, now: DateTime<Utc>) -> Option<Self> {
        let lifetime = TimeDelta::try_seconds(ttl_secs.checked_sub(EXPIRY_MARGIN_SECS)?)?;
        Some(Self {
            access_token,
            expires_at: now.checked_add_signed(lifetime)?,
        })
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "ID")]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrackItem {
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrack {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

/// Track identity as listed in a playlist, before audio features are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackStub {
    pub id: String,
    pub title: String,
    pub artist: String,
}

impl TrackStub {
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Local files and removed tracks come back with a null track or id and
    /// are dropped here.
    pub fn from_item(item: PlaylistTrackItem) -> Option<Self> {
        let track = item.track?;
        let id = track.id.filter(|id| !id.is_empty())?;
        let artist = track
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default();

        Some(Self {
            id,
            title: track.name.unwrap_or_default(),
            artist,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeatures {
    pub tempo: f64,
    pub energy: f64,
    pub valence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Energetic,
    Relaxed,
    Focused,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Energetic, Mood::Relaxed, Mood::Focused, Mood::Neutral];

    /// First matching rule wins.
    pub fn classify(tempo: i64, energy: f64, valence: f64) -> Self {
        if energy > 0.7 && tempo > 120 {
            Mood::Energetic
        } else if energy < 0.4 && valence < 0.4 {
            Mood::Relaxed
        } else if energy > 0.5 && valence > 0.6 {
            Mood::Focused
        } else {
            Mood::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Energetic => "Energetic",
            Mood::Relaxed => "Relaxed",
            Mood::Focused => "Focused",
            Mood::Neutral => "Neutral",
        }
    }

    pub fn matches(&self, desired: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(desired)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.matches(s))
            .ok_or_else(|| format!("Unknown mood: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkoutType {
    Cardio,
    Strength,
    Yoga,
    Other(String),
}

impl WorkoutType {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "cardio" => WorkoutType::Cardio,
            "strength" => WorkoutType::Strength,
            "yoga" => WorkoutType::Yoga,
            _ => WorkoutType::Other(s.to_string()),
        }
    }

    pub fn accepts(&self, track: &Track) -> bool {
        match self {
            WorkoutType::Cardio => track.tempo > 120 && track.energy > 0.6,
            WorkoutType::Strength => track.tempo > 100 && track.tempo <= 120 && track.energy > 0.5,
            WorkoutType::Yoga => track.tempo < 100 && track.energy < 0.5,
            WorkoutType::Other(_) => true,
        }
    }
}

impl From<&str> for WorkoutType {
    fn from(s: &str) -> Self {
        WorkoutType::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub tempo: i64,
    pub energy: f64,
    pub valence: f64,
    pub mood: Mood,
}

impl Track {
    pub fn from_features(stub: TrackStub, features: &AudioFeatures) -> Self {
        let tempo = features.tempo.round_ties_even() as i64;
        Self {
            id: stub.id,
            title: stub.title,
            artist: stub.artist,
            tempo,
            energy: features.energy,
            valence: features.valence,
            mood: Mood::classify(tempo, features.energy, features.valence),
        }
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Artist")]
    pub artist: String,
    #[tabled(rename = "Mood")]
    pub mood: String,
    #[tabled(rename = "Tempo")]
    pub tempo: i64,
    #[tabled(rename = "Energy")]
    pub energy: String,
    #[tabled(rename = "Valence")]
    pub valence: String,
}

impl From<&Track> for TrackTableRow {
    fn from(track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            mood: track.mood.to_string(),
            tempo: track.tempo,
            energy: format!("{:.2}", track.energy),
            valence: format!("{:.2}", track.valence),
        }
    }
}
