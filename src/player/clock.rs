use std::time::{Duration, Instant};

/// Subtracted from every authoritative progress update to make up for the
/// time the message spent in transit.
pub const DEFAULT_LATENCY_BUFFER_MS: u64 = 250;

/// Locally predicted playback position (ms since track start).
///
/// The server owns the truth; this clock only fills the gaps between its
/// sparse progress updates. Every write clamps to `[0, duration]`.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    estimate_ms: u64,
    /// None while no track is loaded (no upper bound).
    duration_ms: Option<u64>,
    last_correction: Option<Instant>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track changed: start over from `initial_ms`.
    pub fn reset(&mut self, initial_ms: i64, duration_ms: Option<u64>) {
        self.duration_ms = duration_ms;
        self.last_correction = None;
        self.estimate_ms = self.clamp(initial_ms);
    }

    /// Hard overwrite from the server. Last write wins.
    pub fn apply_correction(&mut self, server_ms: i64, latency_buffer_ms: u64) {
        let corrected = server_ms.saturating_sub(latency_buffer_ms.min(i64::MAX as u64) as i64);
        self.estimate_ms = self.clamp(corrected);
        self.last_correction = Some(Instant::now());
    }

    /// One scheduling tick worth of local advancement.
    pub fn advance(&mut self, delta_ms: i64) {
        let next = (self.estimate_ms as i64).saturating_add(delta_ms);
        self.estimate_ms = self.clamp(next);
    }

    /// Optimistically jump to `target_ms`. Returns the signed offset (ms)
    /// from the estimate before the seek to the clamped target.
    pub fn apply_user_seek(&mut self, target_ms: u64) -> i64 {
        let before = self.estimate_ms as i64;
        self.estimate_ms = self.clamp(target_ms.min(i64::MAX as u64) as i64);
        self.estimate_ms as i64 - before
    }

    /// Whole seconds from the estimate to the clamped `target_ms`, rounded
    /// to nearest. This is what the server will actually move by.
    pub fn seek_offset_secs(&self, target_ms: u64) -> i64 {
        let target = self.clamp(target_ms.min(i64::MAX as u64) as i64) as i64;
        let offset_ms = target - self.estimate_ms as i64;
        (offset_ms as f64 / 1000.0).round() as i64
    }

    pub fn position_ms(&self) -> u64 {
        self.estimate_ms
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    pub fn since_correction(&self) -> Option<Duration> {
        self.last_correction.map(|at| at.elapsed())
    }

    fn clamp(&self, ms: i64) -> u64 {
        let ms = ms.max(0) as u64;
        match self.duration_ms {
            Some(max) => ms.min(max),
            None => ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_with(duration: u64, at: i64) -> PlaybackClock {
        let mut clock = PlaybackClock::new();
        clock.reset(at, Some(duration));
        clock
    }

    #[test]
    fn test_advance_is_monotonic_and_bounded() {
        let mut clock = clock_with(1_000, 0);
        let mut last = clock.position_ms();
        for delta in [50, 50, 0, 300, 49, 1, 400, 50, 50, 9_999] {
            clock.advance(delta);
            assert!(clock.position_ms() >= last);
            assert!(clock.position_ms() <= 1_000);
            last = clock.position_ms();
        }
        assert_eq!(clock.position_ms(), 1_000);
    }

    #[test]
    fn test_correction_overwrites_local_estimate() {
        let mut clock = clock_with(300_000, 0);
        clock.advance(120_000);

        clock.apply_correction(60_000, 250);
        assert_eq!(clock.position_ms(), 59_750);

        clock.apply_correction(100, 250);
        assert_eq!(clock.position_ms(), 0);
        assert!(clock.since_correction().is_some());
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let mut clock = clock_with(10_000, -500);
        assert_eq!(clock.position_ms(), 0);

        clock.apply_correction(50_000, 100);
        assert_eq!(clock.position_ms(), 10_000);

        clock.advance(-20_000);
        assert_eq!(clock.position_ms(), 0);
    }

    #[test]
    fn test_zero_duration_pins_to_zero() {
        let mut clock = clock_with(0, 0);
        clock.advance(50);
        assert_eq!(clock.position_ms(), 0);
    }

    #[test]
    fn test_user_seek_returns_offset() {
        let mut clock = clock_with(200_000, 10_000);
        assert_eq!(clock.apply_user_seek(30_000), 20_000);
        assert_eq!(clock.position_ms(), 30_000);

        assert_eq!(clock.apply_user_seek(5_000), -25_000);

        // Past the end: clamps, offset measured to the clamped target
        assert_eq!(clock.apply_user_seek(900_000), 195_000);
        assert_eq!(clock.position_ms(), 200_000);
    }

    #[test]
    fn test_seek_offset_rounds_to_whole_seconds() {
        let clock = clock_with(200_000, 10_000);
        assert_eq!(clock.seek_offset_secs(12_600), 3);
        assert_eq!(clock.seek_offset_secs(10_400), 0);
        assert_eq!(clock.seek_offset_secs(4_400), -6);
        assert_eq!(clock.seek_offset_secs(900_000), 190);
        assert_eq!(clock.position_ms(), 10_000);
    }
}
