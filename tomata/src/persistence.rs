//! Durable state: the versioned timer/task record and the theme record.
//!
//! Two independent JSON files in the platform data directory. The timer
//! record travels in a versioned envelope; loading applies a pure,
//! additive migration before deserializing, so state written by older
//! releases keeps working. Corrupt or missing files fall back to
//! defaults with a logged warning instead of failing the launch.

use crate::store::Store;
use crate::theme::ThemeRecord;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const STATE_VERSION: u32 = 2;

#[derive(Serialize, Deserialize)]
struct Envelope {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    state: Value,
}

/// Pure migration `(old state, old version) -> current-shape state`.
/// Total over every version at or below [`STATE_VERSION`]; unknown
/// fields pass through untouched.
pub fn migrate(mut state: Value, version: u32) -> Value {
    if let Some(fields) = state.as_object_mut() {
        if version == 0 {
            // 0 -> 1 introduced the sound settings.
            fields
                .entry("soundEnabled".to_string())
                .or_insert(json!(true));
            fields
                .entry("endSoundType".to_string())
                .or_insert(json!("jingle"));
            fields
                .entry("clickSoundType".to_string())
                .or_insert(json!("click"));
            fields.insert("quotesEnabled".to_string(), json!(true));
        }
        if version == 1 {
            // 1 -> 2 introduced the quotes flag.
            fields
                .entry("quotesEnabled".to_string())
                .or_insert(json!(true));
        }
    }
    state
}

pub struct Persistence {
    dir: PathBuf,
}

impl Persistence {
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "tomata", "tomata")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Use an explicit directory; tests point this at a tempdir.
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join("state.json")
    }

    fn theme_path(&self) -> PathBuf {
        self.dir.join("theme.json")
    }

    pub fn save_store(&self, store: &Store) -> Result<()> {
        let envelope = Envelope {
            version: STATE_VERSION,
            state: serde_json::to_value(store)?,
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        fs::write(self.state_path(), json)?;
        Ok(())
    }

    /// Never fails: anything unreadable comes back as the default store.
    pub fn load_store(&self) -> Store {
        match self.try_load_store() {
            Ok(Some(store)) => store,
            Ok(None) => Store::default(),
            Err(e) => {
                warn!("discarding unreadable timer state: {e:#}");
                Store::default()
            }
        }
    }

    fn try_load_store(&self) -> Result<Option<Store>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        let envelope: Envelope = serde_json::from_str(&json)?;
        let state = migrate(envelope.state, envelope.version);
        let store: Store = serde_json::from_value(state)?;
        Ok(Some(store))
    }

    pub fn save_theme(&self, theme: &ThemeRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(theme)?;
        fs::write(self.theme_path(), json)?;
        Ok(())
    }

    pub fn load_theme(&self) -> ThemeRecord {
        let path = self.theme_path();
        if !path.exists() {
            return ThemeRecord::default();
        }
        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|json| Ok(serde_json::from_str(&json)?))
        {
            Ok(theme) => theme,
            Err(e) => {
                warn!("discarding unreadable theme record: {e:#}");
                ThemeRecord::default()
            }
        }
    }
}
