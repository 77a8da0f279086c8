use crate::app::App;
use crossterm::event::KeyEvent;

pub fn handle_common_events(key: KeyEvent, app: &mut App) -> bool {
    let keys = &app.keys;

    // Close popups first, then quit
    if keys.matches(key, &keys.quit) {
        if app.show_keyhints {
            app.show_keyhints = false;
        } else {
            app.is_running = false;
        }
        return true;
    }

    if keys.matches(key, &keys.toggle_keyhints) {
        app.show_keyhints = !app.show_keyhints;
        return true;
    }

    if keys.matches(key, &keys.back) {
        if app.session.is_dragging() {
            app.session.cancel_seek_drag();
            return true;
        }
        if app.show_keyhints {
            app.show_keyhints = false;
            return true;
        }
    }

    false
}
