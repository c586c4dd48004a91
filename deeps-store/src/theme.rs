//! Light/dark theme preference persisted in the store.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::StoreError;
use crate::StoreHandle;
use crate::SyncedEntry;

/// Store key holding the theme preference.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The theme matching an OS-level dark-mode flag.
    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's theme, shared by every view opened on the same store.
///
/// Falls back to the system preference until a theme has been stored.
#[derive(Debug)]
pub struct ThemePreference {
    entry: SyncedEntry<Theme>,
}

impl ThemePreference {
    /// Open the preference; `system_prefers_dark` is the fallback.
    pub async fn open(handle: StoreHandle, system_prefers_dark: bool) -> Self {
        let entry = SyncedEntry::open(handle, THEME_KEY, Theme::from_system(system_prefers_dark)).await;
        Self { entry }
    }

    pub fn theme(&self) -> Theme {
        *self.entry.value()
    }

    pub async fn set(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.entry.set(theme).await
    }

    /// Switch to the other theme and return it.
    pub async fn toggle(&mut self) -> Result<Theme, StoreError> {
        let next = self.theme().toggled();
        self.set(next).await?;
        Ok(next)
    }

    /// An OS-level theme change overrides the stored preference.
    pub async fn system_changed(&mut self, prefers_dark: bool) -> Result<(), StoreError> {
        self.set(Theme::from_system(prefers_dark)).await
    }

    /// Wait for another view to change the theme.
    pub async fn changed(&mut self) -> Result<Theme, StoreError> {
        self.entry.changed().await
    }
}
