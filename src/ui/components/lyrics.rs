use crate::app::App;
use crate::lyrics::{
    highlight, LineHighlight, LyricsKind, LyricsStatus, LyricsTimeline, ResolvedLyric,
};
use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

/// One row of the scrolling lyric list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Line(usize),
    /// Placeholder dots before the first line or during a long break.
    Rest,
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let session = &app.session;

    let mut title_spans = vec![Span::styled(
        " Lyrics ",
        Style::default().fg(theme.magenta).add_modifier(Modifier::BOLD),
    )];
    if let Some(timeline) = session.timeline() {
        let tags = title_tags(timeline, session.resolved_lyrics());
        title_spans.push(Span::styled(
            format!("{} ", tags.join(" · ")),
            Style::default().fg(theme.overlay),
        ));
    }
    let title = Line::from(title_spans);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(theme.magenta))
        .style(Style::default().bg(Color::Reset));

    if let Some(credits) = session.timeline().and_then(credits_line) {
        block = block.title_bottom(
            Line::from(Span::styled(credits, Style::default().fg(theme.overlay)))
                .alignment(Alignment::Center),
        );
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let message = |text: &str, color: Color| {
        Paragraph::new(Text::styled(format!("\n{}", text), Style::default().fg(color)))
            .alignment(Alignment::Center)
    };

    match (session.lyrics_status(), session.timeline()) {
        (LyricsStatus::Loaded, Some(timeline)) => {
            let position = session.position_ms();
            let resolved = session.resolved_lyrics();
            let lines = build_lines(timeline, resolved, position, inner.height as usize, theme);
            let widget = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(widget, inner);
        }
        (LyricsStatus::Pending, _) => f.render_widget(message("Fetching Lyrics...", theme.yellow), inner),
        (LyricsStatus::Unavailable, _) => f.render_widget(message("♪ Nothing playing", theme.overlay), inner),
        _ => f.render_widget(message("No Lyrics Found", theme.overlay), inner),
    }
}

/// Granularity, language and the current song section.
fn title_tags(timeline: &LyricsTimeline, resolved: ResolvedLyric) -> Vec<String> {
    let mut tags = vec![match timeline.kind() {
        LyricsKind::Word => "synced words".to_string(),
        LyricsKind::Line => "synced lines".to_string(),
    }];
    if let Some(lang) = timeline.metadata().language.as_deref().filter(|l| !l.is_empty()) {
        tags.push(lang.to_string());
    }
    if let ResolvedLyric::ActiveLine(idx) = resolved {
        if let Some(part) = timeline.part(idx) {
            tags.push(part.to_string());
        }
    }
    tags
}

fn credits_line(timeline: &LyricsTimeline) -> Option<String> {
    let meta = timeline.metadata();
    let mut parts = Vec::new();
    if !meta.source.is_empty() {
        parts.push(format!("via {}", meta.source));
    }
    if !meta.writers.is_empty() {
        parts.push(format!("written by {}", meta.writers.join(", ")));
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!(" {} ", parts.join(" · ")))
    }
}

/// Rows in display order and the index of the row to centre on.
fn layout_rows(timeline: &LyricsTimeline, resolved: ResolvedLyric, position_ms: u64) -> (Vec<Row>, usize) {
    let count = timeline.lines().len();
    let mut rows: Vec<Row> = (0..count).map(Row::Line).collect();
    match resolved {
        ResolvedLyric::ActiveLine(idx) => (rows, idx),
        _ => {
            let started = timeline.lines().partition_point(|l| l.start_ms <= position_ms);
            rows.insert(started, Row::Rest);
            (rows, started)
        }
    }
}

fn build_lines<'a>(
    timeline: &'a LyricsTimeline,
    resolved: ResolvedLyric,
    position_ms: u64,
    height: usize,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let (rows, center) = layout_rows(timeline, resolved, position_ms);
    let half = height / 2;
    let mut out = Vec::with_capacity(height);

    for screen_row in 0..height {
        let distance = (screen_row as isize - half as isize).unsigned_abs();
        let target = center as isize - half as isize + screen_row as isize;
        if distance > 6 || target < 0 || target as usize >= rows.len() {
            out.push(Line::from(""));
            continue;
        }

        let row = rows[target as usize];
        let is_center = target as usize == center;
        out.push(match row {
            Row::Rest => rest_line(position_ms, theme),
            Row::Line(idx) if is_center => active_line(timeline, idx, position_ms, theme),
            Row::Line(idx) => {
                let style = match distance {
                    1..=2 => Style::default().fg(theme.text),
                    3..=4 => Style::default().fg(theme.text).add_modifier(Modifier::DIM),
                    _ => Style::default().fg(theme.overlay),
                };
                Line::from(Span::styled(timeline.lines()[idx].text.as_str(), style))
            }
        });
    }
    out
}

fn active_line<'a>(timeline: &'a LyricsTimeline, idx: usize, position_ms: u64, theme: &Theme) -> Line<'a> {
    let lit = Style::default().fg(theme.green).add_modifier(Modifier::BOLD);
    let unlit = Style::default().fg(theme.text).add_modifier(Modifier::DIM);

    let mut spans = vec![Span::styled("● ", Style::default().fg(theme.green))];
    match highlight(&timeline.lines()[idx], position_ms) {
        LineHighlight::Atomic(text) => spans.push(Span::styled(text, lit)),
        LineHighlight::Words(words) => {
            for syllable in words.into_iter().flatten() {
                let style = if syllable.lit { lit } else { unlit };
                spans.push(Span::styled(syllable.text, style));
            }
        }
    }
    Line::from(spans)
}

/// Three dots that fill in turn, one per half second.
fn rest_line(position_ms: u64, theme: &Theme) -> Line<'static> {
    let phase = ((position_ms / 500) % 4) as usize;
    let spans: Vec<Span> = (0..3)
        .flat_map(|i| {
            let color = if i < phase { theme.cyan } else { theme.surface };
            [
                Span::styled("●", Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(" "),
            ]
        })
        .collect();
    Line::from(spans)
}
