use crate::lyrics::{FetchTicket, LyricsError, LyricsTimeline};
use crate::remote::ServerEvent;
use crossterm::event::Event;

/// Everything the main loop reacts to. Producers are the input reader, the
/// socket task, lyrics fetches and the two timers.
#[derive(Debug)]
pub enum AppEvent {
    Input(Event),
    Remote(ServerEvent),
    Connected,
    Disconnected(String),
    LyricsFetched(FetchTicket, Result<LyricsTimeline, LyricsError>),
    /// Clock advance from a tick lease; stale leases are ignored.
    ClockTick { lease: u64, delta_ms: u64 },
    /// Redraw/animation tick.
    Tick,
}
