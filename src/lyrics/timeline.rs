/// Granularity the lyrics provider gave us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LyricsKind {
    #[default]
    Line,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syllable {
    pub start_ms: u64,
    pub duration_ms: u64,
    /// A trailing space ends the word.
    pub text: String,
}

impl Syllable {
    pub fn ends_word(&self) -> bool {
        self.text.ends_with(' ')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LyricLine {
    pub start_ms: u64,
    pub duration_ms: u64,
    pub text: String,
    pub syllables: Vec<Syllable>,
    /// Song section ("Verse", "Chorus", ...) when the provider tags it.
    pub part: Option<String>,
}

impl LyricLine {
    pub fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }

    pub fn has_syllables(&self) -> bool {
        !self.syllables.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LyricsMetadata {
    pub source: String,
    pub language: Option<String>,
    pub writers: Vec<String>,
}

/// Lines ordered by start time. The order is established once in
/// [`LyricsTimeline::new`] and relied on by the sync index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LyricsTimeline {
    kind: LyricsKind,
    metadata: LyricsMetadata,
    lines: Vec<LyricLine>,
}

impl LyricsTimeline {
    pub fn new(kind: LyricsKind, metadata: LyricsMetadata, mut lines: Vec<LyricLine>) -> Self {
        // Stable: lines sharing a start keep provider order
        lines.sort_by_key(|l| l.start_ms);
        Self {
            kind,
            metadata,
            lines,
        }
    }

    pub fn kind(&self) -> LyricsKind {
        self.kind
    }

    pub fn metadata(&self) -> &LyricsMetadata {
        &self.metadata
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Section tag in effect at line `idx`: the closest tagged line at or
    /// before it.
    pub fn part(&self, idx: usize) -> Option<&str> {
        self.lines
            .get(..=idx.min(self.lines.len().saturating_sub(1)))?
            .iter()
            .rev()
            .find_map(|l| l.part.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(start: u64, text: &str) -> LyricLine {
        LyricLine {
            start_ms: start,
            duration_ms: 1_000,
            text: text.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_sorts_lines_stably() {
        let timeline = LyricsTimeline::new(
            LyricsKind::Line,
            LyricsMetadata::default(),
            vec![line(5_000, "c"), line(1_000, "a"), line(5_000, "d"), line(2_000, "b")],
        );
        let texts: Vec<&str> = timeline.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_part_carries_forward() {
        let mut verse = line(1_000, "a");
        verse.part = Some("Verse".into());
        let mut chorus = line(3_000, "c");
        chorus.part = Some("Chorus".into());
        let timeline = LyricsTimeline::new(
            LyricsKind::Line,
            LyricsMetadata::default(),
            vec![line(0, "intro"), verse, line(2_000, "b"), chorus],
        );

        assert_eq!(timeline.part(0), None);
        assert_eq!(timeline.part(1), Some("Verse"));
        assert_eq!(timeline.part(2), Some("Verse"));
        assert_eq!(timeline.part(3), Some("Chorus"));
        assert_eq!(timeline.part(99), Some("Chorus"));
    }

    #[test]
    fn test_line_end_saturates() {
        let mut l = line(u64::MAX - 10, "x");
        l.duration_ms = 100;
        assert_eq!(l.end_ms(), u64::MAX);
    }
}
