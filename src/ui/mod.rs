pub mod components;
pub mod layout;
pub mod utils;

use crate::app::{App, ConnectionStatus, ViewMode};
use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const STALE_SYNC_SECS: u64 = 15;

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // 1. Layout
    let main_layout = layout::get_main_layout(area);
    let content_layout = layout::get_content_layout(main_layout.body_area);

    // 2. Player card (left / top)
    components::player_card::render(f, content_layout.left, app);

    // 3. Right panel
    if let Some(right_area) = content_layout.right {
        match app.view_mode {
            ViewMode::Lyrics => components::lyrics::render(f, right_area, app),
            ViewMode::Queue => components::queue::render(f, right_area, app),
        }
    }

    // 4. Footer: connection on the left, key hint on the right
    let theme = &app.theme;
    let (dot, status, color) = match &app.connection {
        ConnectionStatus::Connecting => ("○", "connecting…".to_string(), theme.yellow),
        ConnectionStatus::Connected => ("●", format!("queue {}", app.queue_id), theme.green),
        ConnectionStatus::Disconnected(reason) => ("✗", format!("offline: {}", reason), theme.red),
    };
    let mut left = Line::from(vec![
        Span::styled(format!(" {} ", dot), Style::default().fg(color)),
        Span::styled(status, Style::default().fg(theme.overlay)),
    ]);
    // Progress reports stopped while playing: the clock is running blind
    if let Some(age) = app.session.since_sync() {
        if app.session.is_advancing() && age.as_secs() >= STALE_SYNC_SECS {
            left.push_span(Span::styled(
                format!("  no sync {}s", age.as_secs()),
                Style::default().fg(theme.yellow),
            ));
        }
    }
    f.render_widget(Paragraph::new(left), main_layout.footer_area);

    if !app.show_keyhints {
        let hint = Line::from(vec![
            Span::styled(" ? ", Style::default().fg(theme.overlay).add_modifier(Modifier::BOLD)),
            Span::styled("keys ", Style::default().fg(theme.overlay)),
        ]);
        f.render_widget(
            Paragraph::new(hint).alignment(Alignment::Right),
            main_layout.footer_area,
        );
    }

    // 5. Overlays
    components::popups::render(f, app);
}
