use crate::app::App;
use crate::player::{format_time, PlaybackState};
use crate::ui::utils::truncate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.clone();

    let music_title = Line::from(Span::styled(
        " Now Playing ",
        Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
    ));
    let music_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(music_title)
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(theme.blue))
        .style(Style::default().bg(Color::Reset));

    let inner = music_block.inner(area);
    f.render_widget(music_block, area);

    let Some(track) = app.session.current_track().cloned() else {
        app.progress_bar = Rect::default();
        let idle = Paragraph::new("\n♪ Queue is empty")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.overlay));
        f.render_widget(idle, inner);
        return;
    };

    // Info and controls win over spacing when cramped
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 0: top padding
            Constraint::Length(3), // 1: info
            Constraint::Length(1), // 2: spacer
            Constraint::Length(1), // 3: gauge
            Constraint::Length(1), // 4: time
            Constraint::Length(1), // 5: state
            Constraint::Min(0),    // 6: bottom padding
        ])
        .split(inner);

    // 1. Info
    let max_width = chunks[1].width.saturating_sub(4) as usize;
    let info_text = vec![
        Line::from(Span::styled(
            format!("🎵 {}", truncate(&track.title, max_width.saturating_sub(2))),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("🎤 "),
            Span::styled(
                truncate(&track.artist_line(), max_width.saturating_sub(2)),
                Style::default().fg(theme.magenta),
            ),
        ]),
        Line::from(vec![
            Span::raw("💿 "),
            Span::styled(
                truncate(&track.album, max_width.saturating_sub(2)),
                Style::default().fg(theme.cyan).add_modifier(Modifier::DIM),
            ),
        ]),
    ];
    f.render_widget(
        Paragraph::new(info_text).alignment(Alignment::Center),
        chunks[1],
    );

    // 2. Gauge
    let gauge_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .split(chunks[3])[1];
    app.progress_bar = gauge_area;

    let position = app.session.display_position_ms();
    let duration = track.duration_ms();
    let dragging = app.session.is_dragging();
    let fill = if dragging { theme.yellow } else { theme.magenta };
    f.render_widget(
        Paragraph::new(progress_line(position, duration, gauge_area.width as usize, fill, theme.surface)),
        gauge_area,
    );

    // 3. Time
    let time_str = format!("{} / {}", format_time(position), track.duration_label());
    let time_style = if dragging {
        Style::default().fg(theme.yellow)
    } else {
        Style::default().fg(theme.overlay)
    };
    f.render_widget(
        Paragraph::new(time_str).alignment(Alignment::Center).style(time_style),
        chunks[4],
    );

    // 4. State
    let (icon, color) = match app.session.playback_state() {
        PlaybackState::Playing => ("▶ Playing", theme.green),
        PlaybackState::Paused => ("⏸ Paused", theme.yellow),
        PlaybackState::Idle => ("■ Idle", theme.overlay),
    };
    f.render_widget(
        Paragraph::new(Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center),
        chunks[5],
    );
}

/// `━━━━●────` with the knob on the last filled cell.
pub fn progress_line(position_ms: u64, duration_ms: u64, width: usize, fill: Color, empty: Color) -> Line<'static> {
    let ratio = if duration_ms > 0 {
        (position_ms as f64 / duration_ms as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let occupied = (width as f64 * ratio) as usize;
    let fill_style = Style::default().fg(fill);
    let empty_style = Style::default().fg(empty);

    let spans: Vec<Span> = (0..width)
        .map(|i| {
            if i + 1 == occupied {
                Span::styled("●", fill_style)
            } else if i < occupied {
                Span::styled("━", fill_style)
            } else {
                Span::styled("─", empty_style)
            }
        })
        .collect();
    Line::from(spans)
}
