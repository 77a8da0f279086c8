//! Client-side model of one queue: what is playing, where in the track we
//! are, and which lyric line that lands on.
//!
//! Every piece of state has exactly one writer. Server events replace the
//! queue, the playback state and the clock; the tick lease advances the
//! clock while playing; user input only ever makes optimistic edits that the
//! next server event is free to overwrite.

use crate::lyrics::{
    resolve_with_gap, FetchTicket, LyricsBuffer, LyricsError, LyricsStatus, LyricsTimeline,
    ResolvedLyric, GAP_THRESHOLD_MS,
};
use crate::player::{
    PlaybackClock, PlaybackMachine, PlaybackState, QueueSnapshot, QueueStore, SeekDrag, Ticker,
    Track, DEFAULT_LATENCY_BUFFER_MS,
};
use crate::remote::{Command, ServerEvent};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{command} is not available while {state}")]
    NotPermitted {
        command: &'static str,
        state: PlaybackState,
    },
    #[error("no queue entry at position {0}")]
    OutOfRange(usize),
    #[error("not connected to the queue server")]
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub latency_buffer_ms: u64,
    pub gap_threshold_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            latency_buffer_ms: DEFAULT_LATENCY_BUFFER_MS,
            gap_threshold_ms: GAP_THRESHOLD_MS,
        }
    }
}

/// Returned when the current track changed and its lyrics should be
/// fetched. The ticket must come back with the result.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsRequest {
    pub ticket: FetchTicket,
    pub track: Track,
}

pub struct Session {
    config: SessionConfig,
    queue: QueueStore,
    machine: PlaybackMachine,
    clock: PlaybackClock,
    lyrics: LyricsBuffer,
    drag: Option<SeekDrag>,
    commands: mpsc::UnboundedSender<Command>,
    last_server_error: Option<String>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        ticker: Ticker,
        commands: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self {
            config,
            queue: QueueStore::new(),
            machine: PlaybackMachine::new(ticker),
            clock: PlaybackClock::new(),
            lyrics: LyricsBuffer::new(),
            drag: None,
            commands,
            last_server_error: None,
        }
    }

    /// Apply one authoritative event, in arrival order.
    pub fn handle_event(&mut self, event: ServerEvent) -> Option<LyricsRequest> {
        match event {
            ServerEvent::Initial(initial) => {
                self.machine.transition(initial.state);
                self.replace_queue(initial.queue, initial.progress_ms)
            }
            ServerEvent::StateChanged(change) => {
                self.machine.transition(change.state);
                None
            }
            ServerEvent::QueueUpdated(snapshot) => self.replace_queue(snapshot, 0),
            ServerEvent::Progress(update) => {
                self.clock
                    .apply_correction(update.progress_ms, self.config.latency_buffer_ms);
                None
            }
            ServerEvent::Error(err) => {
                tracing::warn!(message = %err.message, "server rejected a request");
                // A rejected edit gets no QUEUE_UPDATED; go back to the server's list
                if self.queue.discard_pending() {
                    tracing::debug!("dropped local queue edits");
                }
                self.last_server_error = Some(err.message);
                None
            }
        }
    }

    /// New snapshot means new timing, even if the same track id repeats.
    fn replace_queue(&mut self, snapshot: QueueSnapshot, start_ms: i64) -> Option<LyricsRequest> {
        let duration = snapshot.current.as_ref().map_or(0, Track::duration_ms);
        self.queue.apply(snapshot);
        self.clock.reset(start_ms, Some(duration));
        self.drag = None;

        let current = self.queue.current().cloned();
        let ticket = self.lyrics.invalidate(current.as_ref());
        match (ticket, current) {
            (Some(ticket), Some(track)) => {
                tracing::info!(track_id = %track.id, title = %track.title, "now playing");
                Some(LyricsRequest { ticket, track })
            }
            _ => {
                tracing::info!("queue is empty");
                None
            }
        }
    }

    /// Clock tick from the lease. Ticks from a lease that is no longer live
    /// (already queued when playback paused) are ignored.
    pub fn on_clock_tick(&mut self, lease: u64, delta_ms: u64) -> bool {
        if self.machine.lease_id() != Some(lease) {
            return false;
        }
        self.clock.advance(delta_ms.min(i64::MAX as u64) as i64);
        true
    }

    /// The connection is gone for good. Stop the clock where it is; the
    /// last known state stays readable.
    pub fn on_disconnect(&mut self) {
        self.machine.release_lease();
        self.drag = None;
    }

    pub fn accept_lyrics(
        &mut self,
        ticket: &FetchTicket,
        result: Result<LyricsTimeline, LyricsError>,
    ) -> bool {
        self.lyrics.accept(ticket, result)
    }

    // -- user operations --------------------------------------------------

    /// Ask the server to flip play/pause. The displayed state only changes
    /// once the server confirms.
    pub fn toggle_play_pause(&mut self) -> Result<Command, SessionError> {
        let command = match self.machine.state() {
            PlaybackState::Playing => Command::Pause,
            _ => Command::Resume,
        };
        self.dispatch(command.clone())?;
        Ok(command)
    }

    pub fn next(&mut self) -> Result<(), SessionError> {
        self.dispatch(Command::Next)
    }

    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.dispatch(Command::Last)
    }

    /// Move the estimate by the whole-second offset the server will apply
    /// and send it. A target less than half a second away does neither.
    /// Returns the offset sent, in seconds.
    pub fn seek_to(&mut self, target_ms: u64) -> Result<i64, SessionError> {
        self.check(&Command::Seek { offset: 0 })?;
        self.drag = None;

        let offset = self.clock.seek_offset_secs(target_ms);
        if offset == 0 {
            return Ok(0);
        }

        let before = self.clock.position_ms() as i64;
        let landed = before.saturating_add(offset.saturating_mul(1000)).max(0);
        self.clock.apply_user_seek(landed as u64);
        tracing::debug!(target_ms, offset_secs = offset, "seek");
        self.dispatch(Command::Seek { offset })?;
        Ok(offset)
    }

    pub fn seek_by(&mut self, delta_ms: i64) -> Result<i64, SessionError> {
        let target = (self.clock.position_ms() as i64).saturating_add(delta_ms).max(0);
        self.seek_to(target as u64)
    }

    /// Play the upcoming entry at `index` (0-based, as displayed).
    pub fn jump(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.queue.upcoming_view().len() {
            return Err(SessionError::OutOfRange(index));
        }
        self.dispatch(Command::Jump { index: index + 1 })
    }

    pub fn remove_upcoming(&mut self, index: usize) -> Result<Track, SessionError> {
        let command = Command::Remove { index };
        self.check(&command)?;
        let removed = self
            .queue
            .optimistic_remove(index)
            .ok_or(SessionError::OutOfRange(index))?;
        self.dispatch(command)?;
        Ok(removed)
    }

    pub fn move_upcoming(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        let command = Command::Move { from, to };
        self.check(&command)?;
        if !self.queue.optimistic_move(from, to) {
            return Err(SessionError::OutOfRange(from.max(to)));
        }
        self.dispatch(command)
    }

    /// Replay a previous entry, or let the server pick when `index` is None.
    pub fn replay(&mut self, index: Option<usize>) -> Result<(), SessionError> {
        if let Some(i) = index {
            if i >= self.queue.previous().len() {
                return Err(SessionError::OutOfRange(i));
            }
        }
        self.dispatch(Command::Replay { index })
    }

    // -- drag seeking -----------------------------------------------------

    pub fn begin_seek_drag(&mut self, at_ms: u64) -> bool {
        let Some(track) = self.queue.current() else {
            return false;
        };
        self.drag = Some(SeekDrag::begin(at_ms, track.duration_ms()));
        true
    }

    pub fn update_seek_drag(&mut self, at_ms: u64) {
        if let Some(drag) = self.drag.as_mut() {
            drag.update(at_ms);
        }
    }

    /// Release: commit the preview as a seek. Ok(None) if no drag was active.
    pub fn end_seek_drag(&mut self) -> Result<Option<i64>, SessionError> {
        match self.drag.take() {
            Some(drag) => self.seek_to(drag.finish()).map(Some),
            None => Ok(None),
        }
    }

    pub fn cancel_seek_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // -- reads ------------------------------------------------------------

    /// Position to draw: the drag preview while dragging, else the clock.
    pub fn display_position_ms(&self) -> u64 {
        self.drag
            .as_ref()
            .map_or_else(|| self.clock.position_ms(), SeekDrag::preview_ms)
    }

    pub fn position_ms(&self) -> u64 {
        self.clock.position_ms()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.machine.state()
    }

    /// True while a tick lease is driving the clock.
    pub fn is_advancing(&self) -> bool {
        self.machine.lease_id().is_some()
    }

    /// Id of the live tick lease, if playing.
    pub fn tick_lease(&self) -> Option<u64> {
        self.machine.lease_id()
    }

    pub fn queue(&self) -> &QueueStore {
        &self.queue
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    pub fn timeline(&self) -> Option<&LyricsTimeline> {
        self.lyrics.timeline()
    }

    pub fn lyrics_status(&self) -> LyricsStatus {
        self.lyrics.status()
    }

    /// Lyric state at the clock's position (not the drag preview).
    pub fn resolved_lyrics(&self) -> ResolvedLyric {
        resolve_with_gap(
            self.lyrics.timeline(),
            self.clock.position_ms(),
            self.config.gap_threshold_ms,
        )
    }

    /// Time since the last progress report, None if there has been none
    /// for this track.
    pub fn since_sync(&self) -> Option<std::time::Duration> {
        self.clock.since_correction()
    }

    pub fn last_server_error(&self) -> Option<&str> {
        self.last_server_error.as_deref()
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    fn check(&self, command: &Command) -> Result<(), SessionError> {
        if self.machine.permits(command) {
            Ok(())
        } else {
            Err(SessionError::NotPermitted {
                command: command.name(),
                state: self.machine.state(),
            })
        }
    }

    fn dispatch(&self, command: Command) -> Result<(), SessionError> {
        self.check(&command)?;
        self.commands
            .send(command)
            .map_err(|_| SessionError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::TrackDuration;
    use crate::remote::protocol::{InitialState, ProgressUpdate, ServerError, StateChange};

    fn track(id: &str, seconds: u64) -> Track {
        Track {
            id: id.into(),
            title: format!("Title {}", id),
            artists: vec!["Artist".into()],
            album: String::new(),
            duration: TrackDuration {
                seconds,
                formatted: String::new(),
            },
            cover: String::new(),
        }
    }

    fn session() -> (Session, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Session::new(SessionConfig::default(), Ticker::manual(), tx), rx)
    }

    fn initial(state: PlaybackState, progress_ms: i64) -> ServerEvent {
        ServerEvent::Initial(InitialState {
            queue: QueueSnapshot {
                current: Some(track("a", 240)),
                previous: vec![track("p", 100)],
                upcoming: vec![track("b", 200), track("c", 180)],
            },
            state,
            progress_ms,
        })
    }

    #[test]
    fn test_initial_state_sets_everything() {
        let (mut s, _rx) = session();
        let request = s.handle_event(initial(PlaybackState::Paused, 42_000)).unwrap();

        assert_eq!(request.track.id, "a");
        assert_eq!(s.playback_state(), PlaybackState::Paused);
        assert_eq!(s.position_ms(), 42_000);
        assert_eq!(s.lyrics_status(), LyricsStatus::Pending);
        assert_eq!(s.resolved_lyrics(), ResolvedLyric::NoTimeline);
    }

    #[test]
    fn test_ticks_only_advance_live_lease() {
        let (mut s, _rx) = session();
        s.handle_event(initial(PlaybackState::Playing, 1_000));
        let lease = s.machine.lease_id().unwrap();

        assert!(s.on_clock_tick(lease, 50));
        assert_eq!(s.position_ms(), 1_050);

        s.handle_event(ServerEvent::StateChanged(StateChange {
            state: PlaybackState::Paused,
        }));
        assert!(!s.on_clock_tick(lease, 50));
        assert_eq!(s.position_ms(), 1_050);

        s.handle_event(ServerEvent::StateChanged(StateChange {
            state: PlaybackState::Playing,
        }));
        // The old lease's queued ticks still do nothing
        assert!(!s.on_clock_tick(lease, 50));
        assert_eq!(s.position_ms(), 1_050);
    }

    #[test]
    fn test_progress_update_is_latency_compensated() {
        let (mut s, _rx) = session();
        s.handle_event(initial(PlaybackState::Playing, 0));
        s.handle_event(ServerEvent::Progress(ProgressUpdate { progress_ms: 90_000 }));
        assert_eq!(s.position_ms(), 90_000 - DEFAULT_LATENCY_BUFFER_MS);
    }

    #[test]
    fn test_play_pause_sends_without_flipping_state() {
        let (mut s, mut rx) = session();
        assert!(matches!(
            s.toggle_play_pause(),
            Err(SessionError::NotPermitted { .. })
        ));

        s.handle_event(initial(PlaybackState::Playing, 0));
        assert_eq!(s.toggle_play_pause().unwrap(), Command::Pause);
        assert_eq!(rx.try_recv().unwrap(), Command::Pause);
        assert_eq!(s.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn test_drag_previews_then_commits() {
        let (mut s, mut rx) = session();
        s.handle_event(initial(PlaybackState::Playing, 10_000));

        assert!(s.begin_seek_drag(50_000));
        s.update_seek_drag(70_000);
        assert_eq!(s.display_position_ms(), 70_000);
        assert_eq!(s.position_ms(), 10_000);

        assert_eq!(s.end_seek_drag().unwrap(), Some(60));
        assert_eq!(s.position_ms(), 70_000);
        assert_eq!(rx.try_recv().unwrap(), Command::Seek { offset: 60 });
        assert!(!s.is_dragging());
    }

    #[test]
    fn test_cancelled_drag_sends_nothing() {
        let (mut s, mut rx) = session();
        s.handle_event(initial(PlaybackState::Paused, 10_000));
        s.begin_seek_drag(90_000);
        s.cancel_seek_drag();
        assert_eq!(s.display_position_ms(), 10_000);
        assert_eq!(s.end_seek_drag().unwrap(), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_queue_edits_are_optimistic() {
        let (mut s, mut rx) = session();
        s.handle_event(initial(PlaybackState::Playing, 0));

        s.move_upcoming(1, 0).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Command::Move { from: 1, to: 0 });
        let view: Vec<&str> = s.queue().upcoming_view().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(view, vec!["c", "b"]);

        let removed = s.remove_upcoming(0).unwrap();
        assert_eq!(removed.id, "c");
        assert_eq!(rx.try_recv().unwrap(), Command::Remove { index: 0 });

        assert!(matches!(s.remove_upcoming(5), Err(SessionError::OutOfRange(5))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_rejected_edit_falls_back_to_server_list() {
        let (mut s, mut rx) = session();
        s.handle_event(initial(PlaybackState::Playing, 0));

        s.remove_upcoming(0).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Command::Remove { index: 0 });
        assert!(s.queue().has_pending_edits());

        s.handle_event(ServerEvent::Error(ServerError {
            message: "Web controls are locked".into(),
        }));
        assert!(!s.queue().has_pending_edits());
        assert_eq!(s.last_server_error(), Some("Web controls are locked"));

        // Indices are computed from the server's list again
        s.jump(0).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Command::Jump { index: 1 });
        assert_eq!(s.queue().upcoming_view()[0].id, "b");
    }

    #[test]
    fn test_sub_second_seek_is_a_no_op() {
        let (mut s, mut rx) = session();
        s.handle_event(initial(PlaybackState::Paused, 10_000));

        assert_eq!(s.seek_to(10_400).unwrap(), 0);
        assert_eq!(s.position_ms(), 10_000);
        assert!(rx.try_recv().is_err());

        // Local estimate lands where the server will, on whole seconds
        assert_eq!(s.seek_to(12_600).unwrap(), 3);
        assert_eq!(s.position_ms(), 13_000);
        assert_eq!(rx.try_recv().unwrap(), Command::Seek { offset: 3 });
    }

    #[test]
    fn test_disconnect_freezes_clock() {
        let (mut s, _rx) = session();
        s.handle_event(initial(PlaybackState::Playing, 5_000));
        let lease = s.tick_lease().unwrap();
        s.begin_seek_drag(9_000);

        s.on_disconnect();
        assert!(!s.is_advancing());
        assert!(!s.is_dragging());
        assert!(!s.on_clock_tick(lease, 1_000));
        assert_eq!(s.position_ms(), 5_000);
        assert_eq!(s.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn test_jump_and_replay_indices() {
        let (mut s, mut rx) = session();
        s.handle_event(initial(PlaybackState::Playing, 0));

        s.jump(1).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Command::Jump { index: 2 });

        s.replay(Some(0)).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Command::Replay { index: Some(0) });
        assert!(s.replay(Some(3)).is_err());
    }

    #[test]
    fn test_closed_transport_reports_disconnect() {
        let (mut s, rx) = session();
        s.handle_event(initial(PlaybackState::Playing, 0));
        drop(rx);
        assert!(matches!(s.next(), Err(SessionError::Disconnected)));
    }
}
