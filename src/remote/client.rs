use super::protocol::{decode_event, encode_command, Command};
use super::RemoteError;
use crate::app::events::AppEvent;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// `ws://host/API/Queue` + queue id → full socket URL.
pub fn queue_socket_url(base: &str, queue_id: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{}{}ID={}", base, sep, queue_id)
}

/// Run the queue socket in the background.
///
/// Decoded events are forwarded in arrival order; commands are written as
/// they come out of `commands`. The task ends with a single
/// `AppEvent::Disconnected` and never reconnects.
pub fn spawn_connection(
    url: String,
    events: mpsc::Sender<AppEvent>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let reason = match pump(&url, &events, &mut commands).await {
            Ok(()) => return,
            Err(e) => e.to_string(),
        };
        tracing::warn!(%url, %reason, "queue socket ended");
        let _ = events.send(AppEvent::Disconnected(reason)).await;
    })
}

/// Returns Ok only when the app side hung up.
async fn pump(
    url: &str,
    events: &mpsc::Sender<AppEvent>,
    commands: &mut mpsc::UnboundedReceiver<Command>,
) -> Result<(), RemoteError> {
    let (socket, _) = connect_async(url)
        .await
        .map_err(|source| RemoteError::Connect {
            url: url.to_string(),
            source,
        })?;
    tracing::info!(%url, "connected to queue socket");

    if events.send(AppEvent::Connected).await.is_err() {
        return Ok(());
    }

    let (mut write, mut read) = socket.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => match decode_event(&text) {
                    Ok(event) => {
                        if events.send(AppEvent::Remote(event)).await.is_err() {
                            return Ok(());
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "skipping server frame"),
                },
                Some(Ok(Message::Close(_))) | None => return Err(RemoteError::Closed),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            command = commands.recv() => {
                let Some(command) = command else {
                    return Ok(());
                };
                let json = encode_command(&command)?;
                tracing::debug!(operation = command.name(), "sending command");
                write.send(Message::Text(json)).await?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_socket_url() {
        assert_eq!(
            queue_socket_url("ws://localhost:3000/API/Queue", "123"),
            "ws://localhost:3000/API/Queue?ID=123"
        );
        assert_eq!(
            queue_socket_url("ws://host/API/Queue?token=x", "9"),
            "ws://host/API/Queue?token=x&ID=9"
        );
    }
}
