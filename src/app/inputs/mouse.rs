use crate::app::App;
use crate::player::position_at_column;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Click or drag on the progress bar previews a position; release seeks.
pub fn handle_mouse(mouse: MouseEvent, app: &mut App) {
    let bar = app.progress_bar;
    let Some(duration_ms) = app.session.current_track().map(|t| t.duration_ms()) else {
        return;
    };
    let at = |column: u16| position_at_column(column, bar.x, bar.width, duration_ms);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let on_bar = bar.width > 0
                && mouse.row == bar.y
                && mouse.column >= bar.x
                && mouse.column < bar.x + bar.width;
            if on_bar {
                app.session.begin_seek_drag(at(mouse.column));
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if app.session.is_dragging() => {
            app.session.update_seek_drag(at(mouse.column));
        }
        MouseEventKind::Up(MouseButton::Left) if app.session.is_dragging() => {
            if let Err(e) = app.session.end_seek_drag() {
                app.show_toast(&format!("✗ {}", e));
            }
        }
        _ => {}
    }
}
