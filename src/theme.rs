use crate::app::config::AppConfig;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Catppuccin Mocha unless `theme.toml` says otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub base: Color,
    pub surface: Color,
    pub overlay: Color,
    pub text: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
    pub magenta: Color,
    pub cyan: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),
            surface: Color::Rgb(49, 50, 68),
            overlay: Color::Rgb(108, 112, 134),
            text: Color::Rgb(205, 214, 244),
            red: Color::Rgb(243, 139, 168),
            green: Color::Rgb(166, 227, 161),
            yellow: Color::Rgb(249, 226, 175),
            blue: Color::Rgb(137, 180, 250),
            magenta: Color::Rgb(203, 166, 247),
            cyan: Color::Rgb(148, 226, 213),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

pub fn get_theme_path() -> PathBuf {
    AppConfig::get_config_dir().join("theme.toml")
}

/// Accepts both a `[theme]` table and a flat file. A missing file is
/// created with the defaults.
pub fn parse_theme(content: &str) -> Option<Theme> {
    if let Ok(wrapper) = toml::from_str::<ThemeFile>(content) {
        return Some(wrapper.theme);
    }
    toml::from_str::<Theme>(content).ok()
}

pub fn load_current_theme() -> Theme {
    let path = get_theme_path();

    if path.exists() {
        return fs::read_to_string(&path)
            .ok()
            .and_then(|content| parse_theme(&content))
            .unwrap_or_default();
    }

    let default_theme = Theme::default();
    let wrapper = ThemeFile {
        theme: default_theme.clone(),
    };
    if let Ok(toml_str) = toml::to_string_pretty(&wrapper) {
        let _ = fs::write(&path, toml_str);
    }
    default_theme
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_nested_and_flat() {
        let nested = toml::to_string_pretty(&ThemeFile {
            theme: Theme::default(),
        })
        .unwrap();
        assert_eq!(parse_theme(&nested), Some(Theme::default()));

        let flat = toml::to_string_pretty(&Theme::default()).unwrap();
        assert_eq!(parse_theme(&flat), Some(Theme::default()));

        assert_eq!(parse_theme("not = [valid"), None);
    }
}
