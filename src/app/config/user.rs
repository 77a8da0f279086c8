use crate::app::keys::KeyConfig;
use crate::lyrics::{DEFAULT_LYRICS_ENDPOINT, DEFAULT_LYRICS_SOURCES, GAP_THRESHOLD_MS};
use crate::player::DEFAULT_LATENCY_BUFFER_MS;
use crate::session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "ws://localhost:3000/API/Queue";

/// User-editable configuration stored in `config.toml`.
/// Every field has a default so partial files load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub queue_id: Option<String>,
    #[serde(default = "default_latency_buffer")]
    pub latency_buffer_ms: u64,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_gap_threshold")]
    pub gap_threshold_ms: u64,
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: u64,
    #[serde(default = "default_lyrics_endpoint")]
    pub lyrics_endpoint: String,
    #[serde(default = "default_lyrics_sources")]
    pub lyrics_sources: String,
    #[serde(default)]
    pub keys: KeyConfig,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_latency_buffer() -> u64 {
    DEFAULT_LATENCY_BUFFER_MS
}

fn default_tick_interval() -> u64 {
    50
}

fn default_gap_threshold() -> u64 {
    GAP_THRESHOLD_MS
}

fn default_seek_step() -> u64 {
    5
}

fn default_lyrics_endpoint() -> String {
    DEFAULT_LYRICS_ENDPOINT.to_string()
}

fn default_lyrics_sources() -> String {
    DEFAULT_LYRICS_SOURCES.to_string()
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            queue_id: None,
            latency_buffer_ms: default_latency_buffer(),
            tick_interval_ms: default_tick_interval(),
            gap_threshold_ms: default_gap_threshold(),
            seek_step_secs: default_seek_step(),
            lyrics_endpoint: default_lyrics_endpoint(),
            lyrics_sources: default_lyrics_sources(),
            keys: KeyConfig::default(),
        }
    }
}

impl UserConfig {
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            latency_buffer_ms: self.latency_buffer_ms,
            gap_threshold_ms: self.gap_threshold_ms,
        }
    }

    /// Zero would spin the tick task, so it is floored at 1ms.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn seek_step_ms(&self) -> i64 {
        (self.seek_step_secs as i64).saturating_mul(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: UserConfig = toml::from_str("queue_id = \"abc\"\nlatency_buffer_ms = 400\n").unwrap();
        assert_eq!(config.queue_id.as_deref(), Some("abc"));
        assert_eq!(config.latency_buffer_ms, 400);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.gap_threshold_ms, GAP_THRESHOLD_MS);
        assert_eq!(config.keys.quit, "q");
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&UserConfig::default()).unwrap();
        let back: UserConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.tick_interval(), Duration::from_millis(50));
        assert_eq!(back.seek_step_ms(), 5_000);
    }
}
