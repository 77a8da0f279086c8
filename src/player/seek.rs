/// A press-move-release seek gesture on the progress bar.
///
/// Only the preview moves while dragging; nothing is committed until
/// [`SeekDrag::finish`]. Dropping the session cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekDrag {
    preview_ms: u64,
    duration_ms: u64,
}

impl SeekDrag {
    pub fn begin(at_ms: u64, duration_ms: u64) -> Self {
        Self {
            preview_ms: at_ms.min(duration_ms),
            duration_ms,
        }
    }

    pub fn update(&mut self, at_ms: u64) {
        self.preview_ms = at_ms.min(self.duration_ms);
    }

    pub fn preview_ms(&self) -> u64 {
        self.preview_ms
    }

    /// Release: the position to seek to.
    pub fn finish(self) -> u64 {
        self.preview_ms
    }
}

/// Map a terminal column on a bar starting at `bar_x` and `bar_width`
/// columns wide to a track position.
pub fn position_at_column(column: u16, bar_x: u16, bar_width: u16, duration_ms: u64) -> u64 {
    if bar_width == 0 {
        return 0;
    }
    let offset = column.saturating_sub(bar_x) as f64;
    // Last cell means the very end
    let ratio = (offset / bar_width.saturating_sub(1).max(1) as f64).clamp(0.0, 1.0);
    (ratio * duration_ms as f64).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_mapping() {
        assert_eq!(position_at_column(10, 10, 101, 200_000), 0);
        assert_eq!(position_at_column(60, 10, 101, 200_000), 100_000);
        assert_eq!(position_at_column(110, 10, 101, 200_000), 200_000);
        // Outside the bar clamps
        assert_eq!(position_at_column(2, 10, 101, 200_000), 0);
        assert_eq!(position_at_column(500, 10, 101, 200_000), 200_000);
        assert_eq!(position_at_column(5, 0, 0, 200_000), 0);
    }

    #[test]
    fn test_drag_preview_is_clamped() {
        let mut drag = SeekDrag::begin(5_000, 60_000);
        assert_eq!(drag.preview_ms(), 5_000);
        drag.update(90_000);
        assert_eq!(drag.preview_ms(), 60_000);
        drag.update(12_345);
        assert_eq!(drag.finish(), 12_345);
    }
}
