use crate::app::{App, QueueSection};
use crossterm::event::KeyEvent;

/// Queue view keys. Indices are into the list as drawn.
pub fn handle_queue_events(key: KeyEvent, app: &mut App) -> bool {
    let keys = app.keys.clone();
    let len = app.section_len(app.queue_section);

    if keys.matches(key, &keys.nav_down) || keys.matches(key, &keys.nav_down_alt) {
        if app.queue_selected + 1 < len {
            app.queue_selected += 1;
        } else if app.queue_section == QueueSection::Previous {
            app.queue_section = QueueSection::Upcoming;
            app.queue_selected = 0;
        }
        return true;
    }

    if keys.matches(key, &keys.nav_up) || keys.matches(key, &keys.nav_up_alt) {
        if app.queue_selected > 0 {
            app.queue_selected -= 1;
        } else if app.queue_section == QueueSection::Upcoming && app.show_previous {
            app.queue_section = QueueSection::Previous;
            app.queue_selected = app.section_len(QueueSection::Previous).saturating_sub(1);
        }
        return true;
    }

    if keys.matches(key, &keys.toggle_previous) {
        app.show_previous = !app.show_previous;
        app.clamp_queue_cursor();
        return true;
    }

    if len == 0 {
        return false;
    }
    let idx = app.queue_selected;

    match app.queue_section {
        QueueSection::Upcoming => {
            if keys.matches(key, &keys.jump) {
                let result = app.session.jump(idx);
                app.report(result, "⏭ Jump");
                app.queue_selected = 0;
                return true;
            }

            // The server inserts before `to`, so a step down is the next
            // entry stepping up
            if keys.matches(key, &keys.move_down) {
                if idx + 1 < len {
                    let result = app.session.move_upcoming(idx + 1, idx);
                    if result.is_ok() {
                        app.queue_selected += 1;
                    }
                    app.report(result, "↓ Moved");
                }
                return true;
            }

            if keys.matches(key, &keys.move_up) {
                if idx > 0 {
                    let result = app.session.move_upcoming(idx, idx - 1);
                    if result.is_ok() {
                        app.queue_selected -= 1;
                    }
                    app.report(result, "↑ Moved");
                }
                return true;
            }

            if keys.matches(key, &keys.remove) {
                match app.session.remove_upcoming(idx) {
                    Ok(track) => app.show_toast(&format!("🗑 {}", track.title)),
                    Err(e) => app.show_toast(&format!("✗ {}", e)),
                }
                app.clamp_queue_cursor();
                return true;
            }
        }
        QueueSection::Previous => {
            if keys.matches(key, &keys.jump) || keys.matches(key, &keys.replay) {
                let result = app.session.replay(Some(idx));
                app.report(result, "↺ Replay");
                return true;
            }
        }
    }

    false
}
