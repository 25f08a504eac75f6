//! Light/dark theme selection, persisted separately from the timer state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeRecord {
    pub theme: ThemeMode,
    /// Once the user picks a theme by hand we stop following any
    /// system-derived default.
    pub manually_set: bool,
}

impl ThemeRecord {
    pub fn toggle(&mut self) {
        self.theme = match self.theme {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
        self.manually_set = true;
    }

    pub fn set(&mut self, theme: ThemeMode, manual: bool) {
        self.theme = theme;
        self.manually_set = manual;
    }
}
