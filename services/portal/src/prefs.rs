//! Durable UI preferences.
//!
//! # Purpose
//! The portal keeps one persisted preference: the theme, stored under the
//! `tre-ui-theme` key in a small yaml map on disk. The value is read once at
//! startup and written on every toggle. A missing or corrupt state file
//! degrades to the default theme instead of failing startup.
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub const THEME_KEY: &str = "tre-ui-theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// File-backed store for UI state, keyed string-to-string.
#[derive(Debug, Clone)]
pub struct UiStateStore {
    path: PathBuf,
}

impl UiStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        UiStateStore { path: path.into() }
    }

    /// Reads the persisted theme. Missing file, unreadable yaml, or an
    /// unrecognized value all fall back to the default.
    pub fn load_theme(&self) -> Theme {
        self.read_state()
            .get(THEME_KEY)
            .and_then(|value| Theme::parse(value))
            .unwrap_or_default()
    }

    /// Persists the theme, keeping any other keys in the state file intact.
    pub fn store_theme(&self, theme: Theme) -> Result<()> {
        let mut state = self.read_state();
        state.insert(THEME_KEY.to_string(), theme.as_str().to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create ui state dir: {}", parent.display()))?;
            }
        }
        let contents = serde_yaml::to_string(&state).context("encode ui state")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("write ui state: {}", self.path.display()))
    }

    fn read_state(&self) -> BTreeMap<String, String> {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_yaml::from_str(&contents).unwrap_or_default()
    }
}
