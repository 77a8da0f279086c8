use crate::app::{App, ViewMode};
use crate::ui::utils::display_width;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Instant;

pub fn render(f: &mut Frame, app: &App) {
    if app.toast.is_some() {
        render_toast(f, app);
    }

    if app.show_keyhints {
        render_keyhints(f, app);
    }
}

fn render_toast(f: &mut Frame, app: &App) {
    let Some(ref toast) = app.toast else {
        return;
    };
    let theme = &app.theme;
    let now = Instant::now();

    let message = &toast.message;
    let width = (display_width(message) as u16 + 6).min(f.area().width.saturating_sub(4));
    let height = 3;
    let mut x = f.area().width.saturating_sub(width + 1);

    let entrance_elapsed = now.duration_since(toast.start_time).as_millis();
    let time_remaining = toast.deadline.saturating_duration_since(now).as_millis();

    // Slide in over the first 300ms, out over the last 300ms
    if entrance_elapsed < 300 {
        let t = entrance_elapsed as f32 / 300.0;
        let ease = 1.0 - (1.0 - t).powi(3);
        x += (width as f32 * (1.0 - ease)) as u16;
    } else if time_remaining < 300 {
        let t = (300 - time_remaining) as f32 / 300.0;
        x += (width as f32 * t.powi(3)) as u16;
    }

    if x >= f.area().width {
        return;
    }
    let visible_area = Rect::new(x, 1, width, height).intersection(f.area());
    if visible_area.is_empty() {
        return;
    }

    f.render_widget(Clear, visible_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.blue))
        .style(Style::default().bg(Color::Reset));
    let style = Style::default().fg(theme.blue).add_modifier(Modifier::BOLD);
    let text = Paragraph::new(Line::from(Span::styled(message.as_str(), style)))
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(text, visible_area);
}

fn render_keyhints(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let k = &app.keys;
    let pair = |a: &str, b: &str| format!("{}/{}", k.display(a), k.display(b));

    let (title, keys): (&str, Vec<(String, &str, &str)>) = match app.view_mode {
        ViewMode::Queue => (
            "Queue",
            vec![
                (pair(&k.nav_down, &k.nav_up), "📋", "Navigate"),
                (k.display(&k.jump), "▶️", "Play / Replay"),
                (pair(&k.move_down, &k.move_up), "🔃", "Reorder"),
                (k.display(&k.remove), "🗑️", "Remove"),
                (k.display(&k.replay), "↺", "Replay previous"),
                (k.display(&k.toggle_previous), "🕘", "Show history"),
            ],
        ),
        ViewMode::Lyrics => ("Lyrics", vec![]),
    };

    let global_keys: Vec<(String, &str, &str)> = vec![
        (k.display(&k.play_pause), "▶️", "Play/Pause"),
        (k.display(&k.next_track), "⏭️", "Next track"),
        (k.display(&k.prev_track), "⏮️", "Previous track"),
        (pair(&k.seek_backward, &k.seek_forward), "⏩", "Seek"),
        (pair(&k.view_lyrics, &k.view_queue), "🖼️", "Lyrics / Queue"),
        (k.display(&k.quit), "🚪", "Quit"),
    ];

    let mut lines: Vec<Line> = Vec::new();
    let row = |key: &str, icon: &str, desc: &str, color: Color| {
        Line::from(vec![
            Span::styled(
                format!(" {:<7} ", key),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::raw(format!("{} ", icon)),
            Span::styled(desc.to_string(), Style::default().fg(theme.text)),
        ])
    };

    for (key, icon, desc) in &keys {
        lines.push(row(key, icon, desc, theme.yellow));
    }
    if !keys.is_empty() {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "────── Global ──────",
        Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    for (key, icon, desc) in &global_keys {
        lines.push(row(key, icon, desc, theme.green));
    }

    let content_width = keys
        .iter()
        .chain(global_keys.iter())
        .map(|(k, _, d)| 2 + display_width(k).max(7) + 3 + 3 + display_width(d))
        .max()
        .unwrap_or(20)
        .max(22);

    let max_height = f.area().height.saturating_sub(4);
    let popup_height = (lines.len() as u16 + 2).min(max_height);
    let popup_width = (content_width as u16 + 4).min(f.area().width.saturating_sub(2));

    // Bottom-right, above the footer
    let popup_x = f.area().width.saturating_sub(popup_width + 1);
    let popup_y = f.area().height.saturating_sub(popup_height + 2);
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let popup = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.blue))
            .title(format!(" {} ", title))
            .title_alignment(Alignment::Left)
            .style(Style::default().bg(Color::Reset)),
    );
    f.render_widget(popup, popup_area);
}
