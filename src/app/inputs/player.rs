use crate::app::App;
use crate::player::format_time;
use crate::remote::Command;
use crossterm::event::KeyEvent;

pub fn handle_player_events(key: KeyEvent, app: &mut App) -> bool {
    let keys = app.keys.clone();

    if keys.matches(key, &keys.play_pause) {
        match app.session.toggle_play_pause() {
            Ok(Command::Pause) => app.show_toast("⏸ Pause"),
            Ok(_) => app.show_toast("▶ Play"),
            Err(e) => app.show_toast(&format!("✗ {}", e)),
        }
        return true;
    }

    if keys.matches(key, &keys.next_track) {
        let result = app.session.next();
        app.report(result, "⏭ Next Track");
        return true;
    }

    if keys.matches(key, &keys.prev_track) {
        let result = app.session.previous();
        app.report(result, "⏮ Previous Track");
        return true;
    }

    let step = app.seek_step_ms;
    if keys.matches(key, &keys.seek_forward) {
        seek_by(app, step);
        return true;
    }

    if keys.matches(key, &keys.seek_backward) {
        seek_by(app, -step);
        return true;
    }

    false
}

fn seek_by(app: &mut App, delta_ms: i64) {
    let result = app.session.seek_by(delta_ms);
    let label = format!("⏩ {}", format_time(app.session.position_ms()));
    app.report(result, &label);
}
