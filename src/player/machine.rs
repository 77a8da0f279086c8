use super::types::PlaybackState;
use crate::app::events::AppEvent;
use crate::remote::Command;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Default clock cadence while playing.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Hands out tick leases. A real ticker spawns one interval task per lease;
/// a manual ticker hands out bare leases and lets the caller drive the
/// clock (headless use and tests).
pub struct Ticker {
    period: Duration,
    tx: Option<mpsc::Sender<AppEvent>>,
    next_id: u64,
}

impl Ticker {
    pub fn new(period: Duration, tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            period,
            tx: Some(tx),
            next_id: 1,
        }
    }

    pub fn manual() -> Self {
        Self {
            period: DEFAULT_TICK_INTERVAL,
            tx: None,
            next_id: 1,
        }
    }

    fn arm(&mut self) -> TickLease {
        let id = self.next_id;
        self.next_id += 1;

        let task = self.tx.clone().map(|tx| {
            let period = self.period;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // First tick completes immediately
                interval.tick().await;
                let mut last = Instant::now();
                loop {
                    interval.tick().await;
                    let now = Instant::now();
                    let delta_ms = now.duration_since(last).as_millis() as u64;
                    last = now;
                    if tx.send(AppEvent::ClockTick { lease: id, delta_ms }).await.is_err() {
                        break;
                    }
                }
            })
        });

        tracing::trace!(lease = id, "tick lease armed");
        TickLease { id, task }
    }
}

/// Ownership of the single clock timer. Dropping it stops the timer.
#[derive(Debug)]
pub struct TickLease {
    id: u64,
    task: Option<JoinHandle<()>>,
}

impl TickLease {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for TickLease {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        tracing::trace!(lease = self.id, "tick lease released");
    }
}

/// Idle / Playing / Paused, driven only by server events.
pub struct PlaybackMachine {
    state: PlaybackState,
    ticker: Ticker,
    lease: Option<TickLease>,
}

impl PlaybackMachine {
    pub fn new(ticker: Ticker) -> Self {
        Self {
            state: PlaybackState::Idle,
            ticker,
            lease: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Apply an authoritative state. Returns true if the state changed.
    pub fn transition(&mut self, next: PlaybackState) -> bool {
        let changed = self.state != next;
        self.state = next;

        if next == PlaybackState::Playing {
            if self.lease.is_none() {
                self.lease = Some(self.ticker.arm());
            }
        } else {
            // Old timer is gone before any new one can be armed
            self.lease = None;
        }

        if changed {
            tracing::debug!(state = %next, "playback state changed");
        }
        changed
    }

    /// Stop driving the clock without changing the reported state. The next
    /// transition to Playing arms a fresh lease.
    pub fn release_lease(&mut self) {
        self.lease = None;
    }

    /// Id of the live lease, if the clock is currently being driven.
    pub fn lease_id(&self) -> Option<u64> {
        self.lease.as_ref().map(TickLease::id)
    }

    /// Whether `command` makes sense in the current state. The server still
    /// has the final word on anything we let through.
    pub fn permits(&self, command: &Command) -> bool {
        match command {
            Command::Pause => self.state == PlaybackState::Playing,
            Command::Resume => self.state == PlaybackState::Paused,
            Command::Next | Command::Last | Command::Seek { .. } | Command::Jump { .. } => {
                self.state != PlaybackState::Idle
            }
            Command::Remove { .. } | Command::Move { .. } | Command::Replay { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_follows_playing_state() {
        let mut machine = PlaybackMachine::new(Ticker::manual());
        assert_eq!(machine.lease_id(), None);

        assert!(machine.transition(PlaybackState::Playing));
        let first = machine.lease_id().unwrap();

        // Repeated Playing keeps the same lease
        assert!(!machine.transition(PlaybackState::Playing));
        assert_eq!(machine.lease_id(), Some(first));

        machine.transition(PlaybackState::Paused);
        assert_eq!(machine.lease_id(), None);

        machine.transition(PlaybackState::Playing);
        let second = machine.lease_id().unwrap();
        assert_ne!(first, second);

        machine.transition(PlaybackState::Idle);
        assert_eq!(machine.lease_id(), None);
    }

    #[test]
    fn test_release_keeps_state() {
        let mut machine = PlaybackMachine::new(Ticker::manual());
        machine.transition(PlaybackState::Playing);
        let first = machine.lease_id().unwrap();

        machine.release_lease();
        assert_eq!(machine.lease_id(), None);
        assert_eq!(machine.state(), PlaybackState::Playing);

        machine.transition(PlaybackState::Playing);
        assert_ne!(machine.lease_id(), Some(first));
        assert!(machine.lease_id().is_some());
    }

    #[test]
    fn test_command_permissions() {
        let mut machine = PlaybackMachine::new(Ticker::manual());
        assert!(!machine.permits(&Command::Pause));
        assert!(!machine.permits(&Command::Resume));
        assert!(!machine.permits(&Command::Next));
        assert!(!machine.permits(&Command::Seek { offset: 5 }));
        assert!(machine.permits(&Command::Remove { index: 0 }));

        machine.transition(PlaybackState::Playing);
        assert!(machine.permits(&Command::Pause));
        assert!(!machine.permits(&Command::Resume));
        assert!(machine.permits(&Command::Last));

        machine.transition(PlaybackState::Paused);
        assert!(!machine.permits(&Command::Pause));
        assert!(machine.permits(&Command::Resume));
        assert!(machine.permits(&Command::Seek { offset: -5 }));
    }

    #[tokio::test]
    async fn test_ticker_emits_until_lease_dropped() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut machine = PlaybackMachine::new(Ticker::new(Duration::from_millis(5), tx));

        machine.transition(PlaybackState::Playing);
        let lease = machine.lease_id().unwrap();

        match tokio::time::timeout(Duration::from_secs(2), rx.recv()).await {
            Ok(Some(AppEvent::ClockTick { lease: got, .. })) => assert_eq!(got, lease),
            _ => panic!("expected a clock tick"),
        }

        machine.transition(PlaybackState::Paused);
        // Let the aborted task wind down, then drain whatever was in flight
        tokio::time::sleep(Duration::from_millis(30)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }
}
