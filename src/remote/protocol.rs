//! JSON wire format spoken on the queue socket.
//!
//! Events arrive as `{"Event": "...", "Data": {...}}`, commands go out as
//! `{"Operation": "...", ...params}`.

use super::RemoteError;
use crate::player::{PlaybackState, QueueSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "Event", content = "Data")]
pub enum ServerEvent {
    #[serde(rename = "INITIAL_STATE")]
    Initial(InitialState),
    #[serde(rename = "STATE_CHANGED")]
    StateChanged(StateChange),
    #[serde(rename = "QUEUE_UPDATED")]
    QueueUpdated(QueueSnapshot),
    #[serde(rename = "PROGRESS_UPDATE")]
    Progress(ProgressUpdate),
    #[serde(rename = "ERROR")]
    Error(ServerError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitialState {
    #[serde(flatten)]
    pub queue: QueueSnapshot,
    #[serde(rename = "State", default)]
    pub state: PlaybackState,
    /// Milliseconds into the current track.
    #[serde(rename = "Progress", default)]
    pub progress_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StateChange {
    #[serde(rename = "State")]
    pub state: PlaybackState,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ProgressUpdate {
    #[serde(rename = "Progress")]
    pub progress_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerError {
    #[serde(rename = "Message", default)]
    pub message: String,
}

/// Requests sent to the server. None of them are acknowledged directly;
/// their effect shows up in later events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Operation")]
pub enum Command {
    Pause,
    Resume,
    Next,
    Last,
    /// Relative offset in whole seconds, signed.
    Seek {
        #[serde(rename = "Offset")]
        offset: i64,
    },
    /// 1-based position in the upcoming list.
    Jump {
        #[serde(rename = "Index")]
        index: usize,
    },
    /// 0-based position in the upcoming list.
    Remove {
        #[serde(rename = "Index")]
        index: usize,
    },
    Move {
        #[serde(rename = "FromIndex")]
        from: usize,
        #[serde(rename = "ToIndex")]
        to: usize,
    },
    /// Replay a previously played track (0-based into the previous list).
    Replay {
        #[serde(rename = "Index", skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::Next => "Next",
            Self::Last => "Last",
            Self::Seek { .. } => "Seek",
            Self::Jump { .. } => "Jump",
            Self::Remove { .. } => "Remove",
            Self::Move { .. } => "Move",
            Self::Replay { .. } => "Replay",
        }
    }
}

pub fn decode_event(text: &str) -> Result<ServerEvent, RemoteError> {
    serde_json::from_str(text).map_err(RemoteError::Decode)
}

pub fn encode_command(command: &Command) -> Result<String, RemoteError> {
    serde_json::to_string(command).map_err(RemoteError::Encode)
}
