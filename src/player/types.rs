use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Playback state as reported by the server (integer on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlaybackState {
    /// No track is loaded.
    #[default]
    Idle,
    Playing,
    Paused,
}

impl TryFrom<u8> for PlaybackState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Idle),
            1 => Ok(Self::Playing),
            2 => Ok(Self::Paused),
            other => Err(format!("unknown playback state {}", other)),
        }
    }
}

impl From<PlaybackState> for u8 {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Idle => 0,
            PlaybackState::Playing => 1,
            PlaybackState::Paused => 2,
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "Idle",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackDuration {
    pub seconds: u64,
    /// Precomputed display string, e.g. "3:07"
    #[serde(default)]
    pub formatted: String,
}

/// A track as sent by the server. Never mutated in place: a new value
/// always replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "youtube_id")]
    pub id: String,
    pub title: String,
    /// Ordered; the first entry is the primary artist.
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub duration: TrackDuration,
    #[serde(default)]
    pub cover: String,
}

impl Track {
    pub fn duration_ms(&self) -> u64 {
        self.duration.seconds.saturating_mul(1000)
    }

    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or_default()
    }

    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    /// Display string for the duration, falling back to our own formatting
    /// when the server left it empty.
    pub fn duration_label(&self) -> String {
        if self.duration.formatted.is_empty() {
            format_time(self.duration_ms())
        } else {
            self.duration.formatted.clone()
        }
    }
}

/// `m:ss` formatting used by the player card.
pub fn format_time(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Authoritative view of the queue. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct QueueSnapshot {
    #[serde(rename = "Current", default)]
    pub current: Option<Track>,
    /// Most recently played track is last.
    #[serde(rename = "Previous", default, deserialize_with = "null_as_empty")]
    pub previous: Vec<Track>,
    #[serde(rename = "Upcoming", default, deserialize_with = "null_as_empty")]
    pub upcoming: Vec<Track>,
}

/// The server encodes empty lists as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
