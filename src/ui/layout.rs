use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct MainLayout {
    pub body_area: Rect,
    pub footer_area: Rect,
}

pub fn get_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    MainLayout {
        body_area: chunks[0],
        footer_area: chunks[1],
    }
}

pub struct ContentLayout {
    pub left: Rect,
    pub right: Option<Rect>,
    pub is_horizontal: bool,
}

/// Player card plus the right panel. Wide terminals split side by side,
/// tall ones stack, anything smaller shows just the card.
pub fn get_content_layout(area: Rect) -> ContentLayout {
    if area.width >= 90 {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Min(30)])
            .split(area);
        ContentLayout {
            left: chunks[0],
            right: Some(chunks[1]),
            is_horizontal: true,
        }
    } else if area.height >= 24 {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(11), Constraint::Min(0)])
            .split(area);
        ContentLayout {
            left: chunks[0],
            right: Some(chunks[1]),
            is_horizontal: false,
        }
    } else {
        ContentLayout {
            left: area,
            right: None,
            is_horizontal: false,
        }
    }
}
