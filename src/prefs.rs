use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::session::SessionConfig;
use crate::timer::Volumes;

pub const KEY_PALETTE_INDEX: &str = "paletteIndex";
pub const KEY_WORK_TIME: &str = "workTime";
pub const KEY_SHORT_BREAK_TIME: &str = "shortBreakTime";
pub const KEY_LONG_BREAK_TIME: &str = "longBreakTime";
pub const KEY_THEME: &str = "theme";
pub const KEY_ALARM_VOLUME: &str = "alarmVolume";
pub const KEY_SFX_VOLUME: &str = "sfxVolume";

/// How long a written preference stays valid
pub fn default_ttl() -> Duration {
    Duration::days(365 * 100)
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat string key-value store with per-entry expiry
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn live_value(&self, now: DateTime<Utc>) -> Option<&str> {
        (self.expires_at > now).then_some(self.value.as_str())
    }
}

type Entries = BTreeMap<String, Entry>;

/// JSON-file backed store under the platform config directory
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "swell") {
            pd.config_dir().join("prefs.json")
        } else {
            PathBuf::from("swell_prefs.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Entries {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), "ignoring corrupt preferences: {e}");
                Entries::new()
            }),
            Err(_) => Entries::new(),
        }
    }
}

impl Default for FilePreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries()
            .get(key)
            .and_then(|e| e.live_value(Utc::now()))
            .map(str::to_owned)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut entries = self.read_entries();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&entries)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-process store, nothing touches disk
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: RefCell<Entries>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .borrow()
            .get(key)
            .and_then(|e| e.live_value(Utc::now()))
            .map(str::to_owned)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Theme {
    #[default]
    #[strum(to_string = "dark")]
    Dark,
    #[strum(to_string = "light")]
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

/// Every persisted setting, with defaults for anything absent or malformed
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub palette_index: usize,
    pub durations: SessionConfig,
    pub theme: Theme,
    pub volumes: Volumes,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            palette_index: 0,
            durations: SessionConfig::default(),
            theme: Theme::Dark,
            volumes: Volumes::default(),
        }
    }
}

fn parsed<T: FromStr>(store: &dyn PreferenceStore, key: &str) -> Option<T> {
    store.get(key).and_then(|v| v.trim().parse().ok())
}

fn clamp_volume(v: f64) -> Option<f64> {
    v.is_finite().then(|| v.clamp(0.0, 1.0))
}

impl Preferences {
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let defaults = Self::default();
        Self {
            palette_index: parsed(store, KEY_PALETTE_INDEX).unwrap_or(defaults.palette_index),
            durations: SessionConfig {
                work_secs: parsed(store, KEY_WORK_TIME).unwrap_or(defaults.durations.work_secs),
                short_break_secs: parsed(store, KEY_SHORT_BREAK_TIME)
                    .unwrap_or(defaults.durations.short_break_secs),
                long_break_secs: parsed(store, KEY_LONG_BREAK_TIME)
                    .unwrap_or(defaults.durations.long_break_secs),
            },
            theme: parsed(store, KEY_THEME).unwrap_or(defaults.theme),
            volumes: Volumes {
                alarm: parsed(store, KEY_ALARM_VOLUME)
                    .and_then(clamp_volume)
                    .unwrap_or(defaults.volumes.alarm),
                sfx: parsed(store, KEY_SFX_VOLUME)
                    .and_then(clamp_volume)
                    .unwrap_or(defaults.volumes.sfx),
            },
        }
    }

    pub fn save(&self, store: &dyn PreferenceStore) -> Result<(), StoreError> {
        self.save_palette(store)?;
        self.save_durations(store)?;
        self.save_theme(store)?;
        self.save_volumes(store)
    }

    pub fn save_palette(&self, store: &dyn PreferenceStore) -> Result<(), StoreError> {
        store.set(
            KEY_PALETTE_INDEX,
            &self.palette_index.to_string(),
            default_ttl(),
        )
    }

    pub fn save_durations(&self, store: &dyn PreferenceStore) -> Result<(), StoreError> {
        let d = &self.durations;
        store.set(KEY_WORK_TIME, &d.work_secs.to_string(), default_ttl())?;
        store.set(
            KEY_SHORT_BREAK_TIME,
            &d.short_break_secs.to_string(),
            default_ttl(),
        )?;
        store.set(
            KEY_LONG_BREAK_TIME,
            &d.long_break_secs.to_string(),
            default_ttl(),
        )
    }

    pub fn save_theme(&self, store: &dyn PreferenceStore) -> Result<(), StoreError> {
        store.set(KEY_THEME, &self.theme.to_string(), default_ttl())
    }

    pub fn save_volumes(&self, store: &dyn PreferenceStore) -> Result<(), StoreError> {
        store.set(
            KEY_ALARM_VOLUME,
            &self.volumes.alarm.to_string(),
            default_ttl(),
        )?;
        store.set(KEY_SFX_VOLUME, &self.volumes.sfx.to_string(), default_ttl())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_empty_store_gives_defaults() {
        let store = MemoryPreferenceStore::new();
        let prefs = Preferences::load(&store);
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.durations, SessionConfig::new(1500, 300, 900));
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.volumes.alarm, 0.5);
        assert_eq!(prefs.volumes.sfx, 1.0);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let store = MemoryPreferenceStore::new();
        let ttl = default_ttl();
        store.set(KEY_WORK_TIME, "soon", ttl).unwrap();
        store.set(KEY_SHORT_BREAK_TIME, "-5", ttl).unwrap();
        store.set(KEY_PALETTE_INDEX, "two", ttl).unwrap();
        store.set(KEY_THEME, "neon", ttl).unwrap();
        store.set(KEY_ALARM_VOLUME, "NaN", ttl).unwrap();
        store.set(KEY_SFX_VOLUME, "7", ttl).unwrap();

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.durations.work_secs, 1500);
        assert_eq!(prefs.durations.short_break_secs, 300);
        assert_eq!(prefs.palette_index, 0);
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.volumes.alarm, 0.5);
        assert_eq!(prefs.volumes.sfx, 1.0);
    }

    #[test]
    fn test_expired_entries_read_as_absent() {
        let store = MemoryPreferenceStore::new();
        store
            .set(KEY_WORK_TIME, "60", Duration::seconds(-1))
            .unwrap();
        assert_eq!(store.get(KEY_WORK_TIME), None);
        assert_eq!(Preferences::load(&store).durations.work_secs, 1500);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FilePreferenceStore::with_path(dir.path().join("nested").join("prefs.json"));
        let prefs = Preferences {
            palette_index: 3,
            durations: SessionConfig::new(3000, 600, 1200),
            theme: Theme::Light,
            volumes: Volumes {
                alarm: 0.25,
                sfx: 0.0,
            },
        };
        prefs.save(&store).unwrap();

        let reopened = FilePreferenceStore::with_path(store.path());
        assert_eq!(Preferences::load(&reopened), prefs);
        assert_eq!(reopened.get(KEY_THEME).as_deref(), Some("light"));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = FilePreferenceStore::with_path(&path);
        assert_eq!(store.get(KEY_WORK_TIME), None);
        store.set(KEY_WORK_TIME, "900", default_ttl()).unwrap();
        assert_eq!(store.get(KEY_WORK_TIME).as_deref(), Some("900"));
    }

    #[test]
    fn test_unwritable_path_reports_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();
        let store = FilePreferenceStore::with_path(blocker.join("prefs.json"));
        assert_matches!(
            store.set(KEY_THEME, "dark", default_ttl()),
            Err(StoreError::Io(_))
        );
    }

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!("Light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!(" dark ".parse::<Theme>(), Ok(Theme::Dark));
        assert!("neon".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.to_string(), "light");
    }
}
