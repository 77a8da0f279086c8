use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    // Global
    pub quit: String,
    pub play_pause: String,
    pub next_track: String,
    pub prev_track: String,
    pub toggle_keyhints: String,

    // View Switching
    pub view_lyrics: String,
    pub view_queue: String,

    // Seek
    pub seek_forward: String,
    pub seek_backward: String,

    // Navigation
    pub nav_up: String,
    pub nav_up_alt: String,
    pub nav_down: String,
    pub nav_down_alt: String,

    // Queue
    pub jump: String,
    pub move_up: String,
    pub move_down: String,
    pub remove: String,
    pub replay: String,
    pub toggle_previous: String,
    pub back: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            play_pause: "Space".to_string(),
            next_track: "n".to_string(),
            prev_track: "p".to_string(),
            toggle_keyhints: "?".to_string(),

            view_lyrics: "1".to_string(),
            view_queue: "2".to_string(),

            seek_forward: "l".to_string(),
            seek_backward: "h".to_string(),

            nav_up: "k".to_string(),
            nav_up_alt: "Up".to_string(),
            nav_down: "j".to_string(),
            nav_down_alt: "Down".to_string(),

            jump: "Enter".to_string(),
            move_up: "K".to_string(),
            move_down: "J".to_string(),
            remove: "d".to_string(),
            replay: "r".to_string(),
            toggle_previous: "Tab".to_string(),
            back: "Esc".to_string(),
        }
    }
}

impl KeyConfig {
    pub fn matches(&self, event: KeyEvent, key_str: &str) -> bool {
        match key_str {
            "Space" => event.code == KeyCode::Char(' '),
            "Enter" => event.code == KeyCode::Enter,
            "Backspace" => event.code == KeyCode::Backspace,
            "Esc" => event.code == KeyCode::Esc,
            "Tab" => event.code == KeyCode::Tab,
            "BackTab" => event.code == KeyCode::BackTab,
            "Up" => event.code == KeyCode::Up,
            "Down" => event.code == KeyCode::Down,
            "Left" => event.code == KeyCode::Left,
            "Right" => event.code == KeyCode::Right,
            s if s.chars().count() == 1 => match s.chars().next() {
                // Uppercase binds also accept lowercase+Shift
                Some(ch) if ch.is_uppercase() => {
                    event.code == KeyCode::Char(ch)
                        || (event.code == KeyCode::Char(ch.to_ascii_lowercase())
                            && event.modifiers.contains(KeyModifiers::SHIFT))
                }
                Some(ch) => event.code == KeyCode::Char(ch),
                None => false,
            },
            _ => false,
        }
    }

    pub fn display(&self, key_str: &str) -> String {
        match key_str {
            "Up" => "↑".to_string(),
            "Down" => "↓".to_string(),
            "Left" => "←".to_string(),
            "Right" => "→".to_string(),
            "BackTab" => "S-Tab".to_string(),
            "Backspace" => "Bksp".to_string(),
            _ => key_str.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_named_and_char_keys() {
        let keys = KeyConfig::default();
        assert!(keys.matches(key(KeyCode::Char(' '), KeyModifiers::NONE), &keys.play_pause));
        assert!(keys.matches(key(KeyCode::Enter, KeyModifiers::NONE), &keys.jump));
        assert!(keys.matches(key(KeyCode::Char('q'), KeyModifiers::NONE), &keys.quit));
        assert!(!keys.matches(key(KeyCode::Char('Q'), KeyModifiers::NONE), &keys.quit));
    }

    #[test]
    fn test_uppercase_accepts_shift() {
        let keys = KeyConfig::default();
        assert!(keys.matches(key(KeyCode::Char('K'), KeyModifiers::SHIFT), &keys.move_up));
        assert!(keys.matches(key(KeyCode::Char('k'), KeyModifiers::SHIFT), &keys.move_up));
        assert!(!keys.matches(key(KeyCode::Char('k'), KeyModifiers::NONE), &keys.move_up));
    }

    #[test]
    fn test_display() {
        let keys = KeyConfig::default();
        assert_eq!(keys.display("Up"), "↑");
        assert_eq!(keys.display(&keys.play_pause), "Space");
    }
}
