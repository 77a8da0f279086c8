use crate::app::{App, QueueSection};
use crate::player::Track;
use crate::ui::utils::truncate;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let queue = app.session.queue();

    let mut title_spans = vec![Span::styled(
        " Queue ",
        Style::default().fg(theme.magenta).add_modifier(Modifier::BOLD),
    )];
    if queue.has_pending_edits() {
        title_spans.push(Span::styled("syncing… ", Style::default().fg(theme.yellow)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Line::from(title_spans))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(theme.magenta))
        .style(Style::default().bg(Color::Reset));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let header = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_row = 0usize;

    if app.show_previous {
        lines.push(header("── History ──"));
        if queue.previous().is_empty() {
            lines.push(Line::from(Span::styled("  nothing yet", Style::default().fg(theme.overlay))));
        }
        for (i, track) in queue.previous().iter().enumerate() {
            let selected = app.queue_section == QueueSection::Previous && app.queue_selected == i;
            if selected {
                cursor_row = lines.len();
            }
            lines.push(track_line(track, "↺", selected, width, theme.overlay, theme));
        }
        lines.push(Line::from(""));
    }

    lines.push(header("── Now Playing ──"));
    match queue.current() {
        Some(track) => lines.push(track_line(track, "▶", false, width, theme.green, theme)),
        None => lines.push(Line::from(Span::styled("  nothing", Style::default().fg(theme.overlay)))),
    }
    lines.push(Line::from(""));

    lines.push(header("── Up Next ──"));
    let upcoming = queue.upcoming_view();
    if upcoming.is_empty() {
        lines.push(Line::from(Span::styled("  end of queue", Style::default().fg(theme.overlay))));
    }
    for (i, track) in upcoming.iter().enumerate() {
        let selected = app.queue_section == QueueSection::Upcoming && app.queue_selected == i;
        if selected {
            cursor_row = lines.len();
        }
        let marker = format!("{:>2}", i + 1);
        lines.push(track_line(track, &marker, selected, width, theme.text, theme));
    }

    // Keep the cursor roughly centred
    let height = inner.height as usize;
    let offset = cursor_row.saturating_sub(height / 2).min(lines.len().saturating_sub(height));
    f.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), inner);
}

fn track_line(
    track: &Track,
    marker: &str,
    selected: bool,
    width: usize,
    color: Color,
    theme: &crate::theme::Theme,
) -> Line<'static> {
    let duration = track.duration_label();
    // marker + spaces + duration eat the rest
    let room = width.saturating_sub(marker.chars().count() + duration.chars().count() + 6);
    let label = truncate(&format!("{} · {}", track.title, track.artist_line()), room);

    let (prefix, style) = if selected {
        ("› ", Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD))
    } else {
        ("  ", Style::default().fg(color))
    };
    Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(format!("{} ", marker), Style::default().fg(theme.overlay)),
        Span::styled(label, style),
        Span::styled(format!("  {}", duration), Style::default().fg(theme.overlay)),
    ])
}
