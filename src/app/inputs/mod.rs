use crate::app::{self, App};
use crossterm::event::{Event, KeyEvent, KeyEventKind};

pub mod common;
pub mod mouse;
pub mod player;
pub mod queue;

pub fn handle_input(event: Event, app: &mut App) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(key, app),
        Event::Mouse(mouse) => mouse::handle_mouse(mouse, app),
        _ => {}
    }
}

pub fn handle_key(key: KeyEvent, app: &mut App) {
    // 1. Global keys (quit, help, cancel drag)
    if common::handle_common_events(key, app) {
        return;
    }

    // 2. View switchers
    let keys = app.keys.clone();
    if keys.matches(key, &keys.view_lyrics) {
        app.view_mode = app::ViewMode::Lyrics;
        return;
    }
    if keys.matches(key, &keys.view_queue) {
        app.view_mode = app::ViewMode::Queue;
        app.clamp_queue_cursor();
        return;
    }

    // 3. View specific; unconsumed keys fall through to player controls
    let consumed = match app.view_mode {
        app::ViewMode::Queue => queue::handle_queue_events(key, app),
        app::ViewMode::Lyrics => false,
    };
    if consumed {
        return;
    }

    player::handle_player_events(key, app);
}
