pub mod buffer;
pub mod fetcher;
pub mod sync;
pub mod timeline;

pub use buffer::{FetchTicket, LyricsBuffer, LyricsStatus};
pub use fetcher::{
    fetch_for_track, strip_parentheticals, LyricsError, LyricsFetcher, LyricsQuery, LyricsSource,
    DEFAULT_LYRICS_ENDPOINT, DEFAULT_LYRICS_SOURCES,
};
pub use sync::{
    highlight, resolve, resolve_with_gap, LineHighlight, LitSyllable, ResolvedLyric, GAP_THRESHOLD_MS,
};
pub use timeline::{LyricLine, LyricsKind, LyricsMetadata, LyricsTimeline, Syllable};
