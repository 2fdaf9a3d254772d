//! Persisted colour theme with change notifications
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Autumn,
    Winter,
    Spring,
    Summer,
}

pub const THEMES: [Theme; 4] = [Theme::Autumn, Theme::Winter, Theme::Spring, Theme::Summer];

impl Theme {
    /// Returns the icon and label for the theme
    pub fn display_info(&self) -> (&'static str, &'static str) {
        match self {
            Theme::Autumn => ("🍂", "Autumn"),
            Theme::Winter => ("❄️", "Winter"),
            Theme::Spring => ("🌸", "Spring"),
            Theme::Summer => ("☀️", "Summer"),
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_info().1.to_lowercase())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "autumn" => Ok(Theme::Autumn),
            "winter" => Ok(Theme::Winter),
            "spring" => Ok(Theme::Spring),
            "summer" => Ok(Theme::Summer),
            _ => Err(anyhow::anyhow!("Invalid theme: {}", s)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct ThemeFile {
    theme: Theme,
}

/// Holds the active theme. Every change is written to disk before it is
/// published to subscribers.
pub struct ThemeStore {
    path: PathBuf,
    sender: watch::Sender<Theme>,
}

impl ThemeStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let theme = Self::read(&path).unwrap_or_else(|e| {
            warn!("Could not read theme from {}: {:#}", path.display(), e);
            Theme::default()
        });
        debug!("Theme store opened with {}", theme);
        let (sender, _) = watch::channel(theme);
        Self { path, sender }
    }

    fn read(path: &Path) -> Result<Theme> {
        if !path.exists() {
            return Ok(Theme::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file: {}", path.display()))?;
        let file: ThemeFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse theme file: {}", path.display()))?;
        Ok(file.theme)
    }

    pub fn current(&self) -> Theme {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.sender.subscribe()
    }

    pub fn set(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(&ThemeFile { theme })?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write theme file: {}", self.path.display()))?;

        self.sender.send_replace(theme);
        debug!("Theme changed to {}", theme);
        Ok(())
    }
}
