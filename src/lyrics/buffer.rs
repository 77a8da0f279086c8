use super::fetcher::LyricsError;
use super::timeline::LyricsTimeline;
use crate::player::Track;

/// Identifies one lyrics fetch. A result is only applied if its ticket still
/// matches both the buffer's generation and the active track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub track_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsStatus {
    /// No current track, so nothing to fetch.
    Unavailable,
    Pending,
    Loaded,
    Failed,
}

/// The one timeline the lyrics view draws from.
#[derive(Debug, Default)]
pub struct LyricsBuffer {
    generation: u64,
    active: Option<FetchTicket>,
    timeline: Option<LyricsTimeline>,
    failed: bool,
}

impl LyricsBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track changed: forget the old timeline and hand out a ticket for the
    /// new one (none when nothing is playing).
    pub fn invalidate(&mut self, track: Option<&Track>) -> Option<FetchTicket> {
        self.generation += 1;
        self.timeline = None;
        self.failed = false;
        self.active = track.map(|t| FetchTicket {
            generation: self.generation,
            track_id: t.id.clone(),
        });
        self.active.clone()
    }

    /// Apply a finished fetch. Returns false when the ticket is stale.
    pub fn accept(
        &mut self,
        ticket: &FetchTicket,
        result: Result<LyricsTimeline, LyricsError>,
    ) -> bool {
        if self.active.as_ref() != Some(ticket) {
            tracing::debug!(
                track_id = %ticket.track_id,
                generation = ticket.generation,
                "dropping stale lyrics result"
            );
            return false;
        }

        match result {
            Ok(timeline) => {
                tracing::debug!(
                    track_id = %ticket.track_id,
                    lines = timeline.lines().len(),
                    "lyrics loaded"
                );
                self.timeline = Some(timeline);
                self.failed = false;
            }
            Err(e) => {
                tracing::info!(track_id = %ticket.track_id, error = %e, "no lyrics");
                self.timeline = None;
                self.failed = true;
            }
        }
        true
    }

    pub fn timeline(&self) -> Option<&LyricsTimeline> {
        self.timeline.as_ref()
    }

    pub fn status(&self) -> LyricsStatus {
        if self.active.is_none() {
            LyricsStatus::Unavailable
        } else if self.timeline.is_some() {
            LyricsStatus::Loaded
        } else if self.failed {
            LyricsStatus::Failed
        } else {
            LyricsStatus::Pending
        }
    }
}
