pub mod client;
pub mod protocol;

pub use client::{queue_socket_url, spawn_connection};
pub use protocol::{decode_event, encode_command, Command, ServerEvent};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("socket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("malformed server message: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("could not encode command: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("connection closed")]
    Closed,
}
