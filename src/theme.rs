use crate::error::AppError;
use chrono::{DateTime, Utc};
use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(AppError::Config(format!("unknown theme: {}", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTheme {
    theme: Theme,
    updated_at: DateTime<Utc>,
}

/// The single persisted preference: light or dark.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: PathBuf) -> Self {
        ThemeStore { path }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lol_dashboard")
            .join("theme.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored theme; a missing or unreadable file means dark.
    pub fn load(&self) -> Theme {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => {
                debug!(path = %self.path.display(), "no stored theme, using dark");
                return Theme::default();
            }
        };

        match serde_json::from_str::<StoredTheme>(&content) {
            Ok(stored) => stored.theme,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable theme file");
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        let stored = StoredTheme {
            theme,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| AppError::Json(format!("Failed to serialize theme: {}", e)))?;

        fs::write(&self.path, json).map_err(|e| {
            AppError::Io(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub muted: Color,
    pub positive: Color,
    pub negative: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        let gold = Color::TrueColor { r: 200, g: 155, b: 60 };
        let cyan = Color::TrueColor { r: 10, g: 200, b: 185 };
        match theme {
            Theme::Dark => Palette {
                primary: gold,
                secondary: cyan,
                muted: Color::TrueColor { r: 160, g: 155, b: 140 },
                positive: Color::Green,
                negative: Color::Red,
            },
            Theme::Light => Palette {
                primary: Color::TrueColor { r: 120, g: 90, b: 40 },
                secondary: Color::TrueColor { r: 0, g: 90, b: 130 },
                muted: Color::TrueColor { r: 120, g: 110, b: 100 },
                positive: Color::Green,
                negative: Color::Red,
            },
        }
    }
}

/// Rendering settings resolved once at start-up and handed to every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    pub theme: Theme,
    pub palette: Palette,
}

impl DisplayContext {
    pub fn new(theme: Theme) -> Self {
        DisplayContext {
            theme,
            palette: Palette::for_theme(theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_defaults_to_dark() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("theme.json"));
        assert_eq!(store.load(), Theme::Dark);
    }

    #[test]
    fn saved_theme_round_trips_through_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("nested").join("theme.json"));
        store.save(Theme::Light).unwrap();
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn garbage_file_falls_back_to_dark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        fs::write(&path, "{\"theme\": \"sepia\"}").unwrap();
        assert_eq!(ThemeStore::new(path).load(), Theme::Dark);
    }

    #[test]
    fn toggle_and_parse() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn palette_follows_theme() {
        assert_ne!(DisplayContext::new(Theme::Light).palette, DisplayContext::new(Theme::Dark).palette);
    }
}
