//! Maps a playback position onto a lyrics timeline.
//!
//! Everything here is a pure function of `(timeline, position)`; callers
//! re-run it on every clock tick instead of keeping derived state around.

use super::timeline::{LyricLine, LyricsTimeline, Syllable};

/// Silence between two lines longer than this shows as an instrumental
/// break instead of leaving the previous line on screen.
pub const GAP_THRESHOLD_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedLyric {
    /// Nothing loaded (fetch pending or failed).
    NoTimeline,
    BeforeFirstLine,
    ActiveLine(usize),
    InstrumentalGap,
}

impl ResolvedLyric {
    pub fn active_index(self) -> Option<usize> {
        match self {
            Self::ActiveLine(idx) => Some(idx),
            _ => None,
        }
    }
}

pub fn resolve(timeline: Option<&LyricsTimeline>, position_ms: u64) -> ResolvedLyric {
    resolve_with_gap(timeline, position_ms, GAP_THRESHOLD_MS)
}

pub fn resolve_with_gap(
    timeline: Option<&LyricsTimeline>,
    position_ms: u64,
    gap_threshold_ms: u64,
) -> ResolvedLyric {
    let Some(timeline) = timeline else {
        return ResolvedLyric::NoTimeline;
    };
    let lines = timeline.lines();

    // Lines are sorted by start, so this is the count of lines already begun
    let started = lines.partition_point(|l| l.start_ms <= position_ms);
    if started == 0 {
        return ResolvedLyric::BeforeFirstLine;
    }

    let idx = started - 1;
    let line_end = lines[idx].end_ms();
    if let Some(next) = lines.get(idx + 1) {
        let gap = next.start_ms.saturating_sub(line_end);
        if gap > gap_threshold_ms && position_ms > line_end {
            return ResolvedLyric::InstrumentalGap;
        }
    }

    ResolvedLyric::ActiveLine(idx)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LitSyllable<'a> {
    pub text: &'a str,
    pub lit: bool,
    pub duration_ms: u64,
}

/// How to draw the active line at `position_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineHighlight<'a> {
    /// No syllable timing: the whole line is lit at once.
    Atomic(&'a str),
    /// Words in order, each a run of syllables.
    Words(Vec<Vec<LitSyllable<'a>>>),
}

pub fn highlight(line: &LyricLine, position_ms: u64) -> LineHighlight<'_> {
    if !line.has_syllables() {
        return LineHighlight::Atomic(&line.text);
    }

    let words = group_words(&line.syllables)
        .into_iter()
        .map(|word| {
            word.iter()
                .map(|s| LitSyllable {
                    text: &s.text,
                    lit: position_ms >= s.start_ms,
                    duration_ms: s.duration_ms,
                })
                .collect::<Vec<_>>()
        })
        .collect();
    LineHighlight::Words(words)
}

/// Split syllables into words at trailing-space boundaries.
pub fn group_words(syllables: &[Syllable]) -> Vec<&[Syllable]> {
    let mut words = Vec::new();
    let mut start = 0;
    for (i, syllable) in syllables.iter().enumerate() {
        if syllable.ends_word() {
            words.push(&syllables[start..=i]);
            start = i + 1;
        }
    }
    if start < syllables.len() {
        words.push(&syllables[start..]);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::timeline::{LyricsKind, LyricsMetadata};

    fn line(start: u64, duration: u64, text: &str) -> LyricLine {
        LyricLine {
            start_ms: start,
            duration_ms: duration,
            text: text.into(),
            ..Default::default()
        }
    }

    fn timeline(lines: Vec<LyricLine>) -> LyricsTimeline {
        LyricsTimeline::new(LyricsKind::Line, LyricsMetadata::default(), lines)
    }

    fn syl(start: u64, text: &str) -> Syllable {
        Syllable {
            start_ms: start,
            duration_ms: 200,
            text: text.into(),
        }
    }

    #[test]
    fn test_no_timeline() {
        assert_eq!(resolve(None, 5_000), ResolvedLyric::NoTimeline);
    }

    #[test]
    fn test_picks_last_started_line() {
        let t = timeline(vec![
            line(1_000, 2_000, "one"),
            line(3_000, 2_000, "two"),
            line(5_000, 2_000, "three"),
        ]);
        assert_eq!(resolve(Some(&t), 0), ResolvedLyric::BeforeFirstLine);
        assert_eq!(resolve(Some(&t), 999), ResolvedLyric::BeforeFirstLine);
        assert_eq!(resolve(Some(&t), 1_000), ResolvedLyric::ActiveLine(0));
        assert_eq!(resolve(Some(&t), 3_500), ResolvedLyric::ActiveLine(1));
        assert_eq!(resolve(Some(&t), 5_000), ResolvedLyric::ActiveLine(2));
        // Last line stays active after it ends (no next line to gap against)
        assert_eq!(resolve(Some(&t), 60_000), ResolvedLyric::ActiveLine(2));
    }

    #[test]
    fn test_duplicate_starts_resolve_to_highest_index() {
        let t = timeline(vec![line(1_000, 500, "a"), line(1_000, 500, "b")]);
        assert_eq!(resolve(Some(&t), 1_200), ResolvedLyric::ActiveLine(1));
    }

    #[test]
    fn test_instrumental_gap() {
        // A ends at 10s, B starts at 25s: 15s of silence
        let t = timeline(vec![line(4_000, 6_000, "A"), line(25_000, 3_000, "B")]);
        assert_eq!(resolve(Some(&t), 9_000), ResolvedLyric::ActiveLine(0));
        assert_eq!(resolve(Some(&t), 10_000), ResolvedLyric::ActiveLine(0));
        assert_eq!(resolve(Some(&t), 15_000), ResolvedLyric::InstrumentalGap);
        assert_eq!(resolve(Some(&t), 25_000), ResolvedLyric::ActiveLine(1));
    }

    #[test]
    fn test_short_gap_keeps_line() {
        let t = timeline(vec![line(0, 2_000, "A"), line(12_000, 1_000, "B")]);
        // Gap is exactly 10s: not more than the threshold
        assert_eq!(resolve(Some(&t), 11_000), ResolvedLyric::ActiveLine(0));
        assert_eq!(
            resolve_with_gap(Some(&t), 11_000, 5_000),
            ResolvedLyric::InstrumentalGap
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let t = timeline(vec![line(0, 1_000, "A"), line(30_000, 1_000, "B")]);
        for pos in [0, 500, 1_500, 20_000, 30_000, 99_000] {
            assert_eq!(resolve(Some(&t), pos), resolve(Some(&t), pos));
        }
    }

    #[test]
    fn test_group_words() {
        let syllables = vec![syl(0, "Hel"), syl(100, "lo "), syl(200, "wor"), syl(300, "ld")];
        let words = group_words(&syllables);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].len(), 2);
        assert_eq!(words[1][1].text, "ld");
    }

    #[test]
    fn test_highlight_lights_started_syllables() {
        let mut l = line(0, 1_000, "Hello world");
        assert_eq!(highlight(&l, 0), LineHighlight::Atomic("Hello world"));

        l.syllables = vec![syl(0, "Hel"), syl(100, "lo "), syl(200, "world")];
        let LineHighlight::Words(words) = highlight(&l, 150) else {
            panic!("expected word highlight");
        };
        let lit: Vec<bool> = words.iter().flatten().map(|s| s.lit).collect();
        assert_eq!(lit, vec![true, true, false]);
    }
}
