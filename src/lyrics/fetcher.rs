use super::timeline::{LyricLine, LyricsKind, LyricsMetadata, LyricsTimeline, Syllable};
use crate::player::Track;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;

pub const DEFAULT_LYRICS_ENDPOINT: &str = "https://lyricsplus.prjktla.workers.dev/v2/lyrics/get";
pub const DEFAULT_LYRICS_SOURCES: &str = "apple,lyricsplus,musixmatch,spotify,musixmatch-word";

#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("lyrics request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("lyrics service answered {0}")]
    Status(u16),
    #[error("no synced lyrics for this track")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsQuery {
    pub title: String,
    pub artist: String,
}

/// Anything that can turn a title/artist pair into a timeline.
pub trait LyricsSource {
    fn lookup(
        &self,
        query: &LyricsQuery,
    ) -> impl Future<Output = Result<LyricsTimeline, LyricsError>> + Send;
}

/// Look up lyrics for `track`: cleaned title first, then the title exactly
/// as the server sent it. Never more than two requests.
pub async fn fetch_for_track<S>(source: &S, track: &Track) -> Result<LyricsTimeline, LyricsError>
where
    S: LyricsSource + Sync,
{
    let artist = track.primary_artist().to_string();
    let cleaned = strip_parentheticals(&track.title);

    let first = source
        .lookup(&LyricsQuery {
            title: cleaned.clone(),
            artist: artist.clone(),
        })
        .await;

    match first {
        Err(e) if cleaned != track.title => {
            tracing::debug!(title = %track.title, error = %e, "retrying lyrics with full title");
            source
                .lookup(&LyricsQuery {
                    title: track.title.clone(),
                    artist,
                })
                .await
        }
        other => other,
    }
}

/// Drop every "(...)" group together with the whitespace before it:
/// `"Song (feat. X) (Live)"` → `"Song"`. Unclosed parentheses stay.
pub fn strip_parentheticals(title: &str) -> String {
    let mut clean = String::with_capacity(title.len());
    let mut rest = title;
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        clean.push_str(rest[..open].trim_end());
        rest = &rest[open + close + 1..];
    }
    clean.push_str(rest);
    clean.trim().to_string()
}

/// HTTP client for the lyrics service.
pub struct LyricsFetcher {
    client: Client,
    endpoint: String,
    sources: String,
}

impl LyricsFetcher {
    pub fn new(client: Client, endpoint: impl Into<String>, sources: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            sources: sources.into(),
        }
    }
}

impl LyricsSource for LyricsFetcher {
    async fn lookup(&self, query: &LyricsQuery) -> Result<LyricsTimeline, LyricsError> {
        let params = [
            ("title", query.title.as_str()),
            ("artist", query.artist.as_str()),
            ("source", self.sources.as_str()),
        ];

        let resp = self.client.get(&self.endpoint).query(&params).send().await?;
        if !resp.status().is_success() {
            return Err(LyricsError::Status(resp.status().as_u16()));
        }

        let data: LyricsResponse = resp.json().await?;
        let timeline = LyricsTimeline::from(data);
        if timeline.is_empty() {
            return Err(LyricsError::Empty);
        }
        Ok(timeline)
    }
}

#[derive(Debug, Deserialize)]
pub struct LyricsResponse {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: ResponseMetadata,
    #[serde(default)]
    pub lyrics: Vec<ResponseLine>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(rename = "songWriters", default)]
    pub song_writers: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseLine {
    pub time: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub syllabus: Option<Vec<ResponseSyllable>>,
    #[serde(default)]
    pub element: Option<ResponseElement>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseSyllable {
    pub time: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseElement {
    #[serde(rename = "songPart", default)]
    pub song_part: Option<String>,
}

fn to_ms(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

impl From<LyricsResponse> for LyricsTimeline {
    fn from(resp: LyricsResponse) -> Self {
        let kind = match resp.kind.as_deref() {
            Some("Word") => LyricsKind::Word,
            _ => LyricsKind::Line,
        };
        let metadata = LyricsMetadata {
            source: resp.metadata.source.unwrap_or_default(),
            language: resp.metadata.language,
            writers: resp.metadata.song_writers.unwrap_or_default(),
        };

        let lines = resp
            .lyrics
            .into_iter()
            .map(|raw| {
                let syllables: Vec<Syllable> = raw
                    .syllabus
                    .unwrap_or_default()
                    .into_iter()
                    .map(|s| Syllable {
                        start_ms: to_ms(s.time),
                        duration_ms: to_ms(s.duration),
                        text: s.text,
                    })
                    .collect();
                let text = if raw.text.is_empty() {
                    syllables.iter().map(|s| s.text.as_str()).collect::<String>()
                } else {
                    raw.text
                };
                let part = raw.element.and_then(|e| e.song_part);
                LyricLine {
                    start_ms: to_ms(raw.time),
                    duration_ms: to_ms(raw.duration),
                    text: text.trim_end().to_string(),
                    syllables,
                    part,
                }
            })
            .collect();

        LyricsTimeline::new(kind, metadata, lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::TrackDuration;
    use std::sync::Mutex;

    /// Answers only for titles it knows, remembering every query.
    struct ScriptedSource {
        known_title: &'static str,
        queries: Mutex<Vec<LyricsQuery>>,
    }

    impl ScriptedSource {
        fn new(known_title: &'static str) -> Self {
            Self {
                known_title,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn titles(&self) -> Vec<String> {
            self.queries
                .lock()
                .unwrap()
                .iter()
                .map(|q| q.title.clone())
                .collect()
        }
    }

    impl LyricsSource for ScriptedSource {
        async fn lookup(&self, query: &LyricsQuery) -> Result<LyricsTimeline, LyricsError> {
            self.queries.lock().unwrap().push(query.clone());
            if query.title != self.known_title {
                return Err(LyricsError::Status(404));
            }
            let metadata = LyricsMetadata {
                source: format!("scripted:{}", query.title),
                ..Default::default()
            };
            Ok(LyricsTimeline::new(
                LyricsKind::Line,
                metadata,
                vec![LyricLine {
                    text: "la".into(),
                    ..Default::default()
                }],
            ))
        }
    }

    fn track(title: &str) -> Track {
        Track {
            id: "t1".into(),
            title: title.into(),
            artists: vec!["Lead".into(), "Guest".into()],
            album: String::new(),
            duration: TrackDuration::default(),
            cover: String::new(),
        }
    }

    #[test]
    fn test_strip_parentheticals() {
        assert_eq!(strip_parentheticals("Song (Remix)"), "Song");
        assert_eq!(strip_parentheticals("Song (feat. X) (Live)"), "Song");
        assert_eq!(strip_parentheticals("A (x) B"), "A B");
        assert_eq!(strip_parentheticals("Broken (paren"), "Broken (paren");
        assert_eq!(strip_parentheticals("Plain"), "Plain");
    }

    #[tokio::test]
    async fn test_falls_back_to_original_title() {
        let source = ScriptedSource::new("Song (Remix)");
        let timeline = fetch_for_track(&source, &track("Song (Remix)")).await.unwrap();

        assert_eq!(source.titles(), vec!["Song", "Song (Remix)"]);
        assert_eq!(timeline.metadata().source, "scripted:Song (Remix)");
        let queries = source.queries.lock().unwrap();
        assert!(queries.iter().all(|q| q.artist == "Lead"));
    }

    #[tokio::test]
    async fn test_cleaned_title_hit_skips_fallback() {
        let source = ScriptedSource::new("Song");
        fetch_for_track(&source, &track("Song (Remix)")).await.unwrap();
        assert_eq!(source.titles(), vec!["Song"]);
    }

    #[tokio::test]
    async fn test_no_fallback_when_title_already_clean() {
        let source = ScriptedSource::new("Other");
        let result = fetch_for_track(&source, &track("Song")).await;
        assert!(matches!(result, Err(LyricsError::Status(404))));
        assert_eq!(source.titles(), vec!["Song"]);
    }

    #[test]
    fn test_response_into_timeline() {
        let json = r#"{
            "type": "Word",
            "metadata": {"source": "Apple", "songWriters": ["W1", "W2"], "language": "en"},
            "lyrics": [
                {"time": 5200, "duration": 1800, "text": "", "syllabus": [
                    {"time": 5200, "duration": 300, "text": "Hel"},
                    {"time": 5500, "duration": 300, "text": "lo "},
                    {"time": 5800, "duration": 600, "text": "there"}
                ], "element": {"songPart": "Verse"}},
                {"time": 1000, "duration": 900, "text": "Intro line", "element": {}}
            ]
        }"#;
        let resp: LyricsResponse = serde_json::from_str(json).unwrap();
        let timeline = LyricsTimeline::from(resp);

        assert_eq!(timeline.kind(), LyricsKind::Word);
        assert_eq!(timeline.metadata().writers, vec!["W1", "W2"]);
        assert_eq!(timeline.metadata().language.as_deref(), Some("en"));
        let lines = timeline.lines();
        assert_eq!(lines[0].text, "Intro line");
        assert!(!lines[0].has_syllables());
        assert_eq!(lines[1].text, "Hello there");
        assert_eq!(lines[1].syllables.len(), 3);
        assert_eq!(lines[1].part.as_deref(), Some("Verse"));
    }
}
