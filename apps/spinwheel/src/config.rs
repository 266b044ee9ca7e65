use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use storage::{StorageKeys, DEFAULT_DATA_PREFIX, DEFAULT_MODE_KEY, DEFAULT_UNDO_PREFIX};
use tracing::warn;
use wheel_core::WheelSettings;

pub const DEFAULT_CONFIG_FILE: &str = "spinwheel.toml";
pub const DEFAULT_STORE_PATH: &str = "./data/spinwheel.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store_path: PathBuf,
    pub frame_interval_ms: u64,
    /// Fixed seed for reproducible draws. Entropy when unset.
    pub seed: Option<u64>,
    pub data_prefix: String,
    pub undo_prefix: String,
    pub mode_key: String,
    pub wheel: WheelSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: DEFAULT_STORE_PATH.into(),
            frame_interval_ms: 16,
            seed: None,
            data_prefix: DEFAULT_DATA_PREFIX.into(),
            undo_prefix: DEFAULT_UNDO_PREFIX.into(),
            mode_key: DEFAULT_MODE_KEY.into(),
            wheel: WheelSettings::default(),
        }
    }
}

impl Settings {
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys {
            data_prefix: self.data_prefix.clone(),
            undo_prefix: self.undo_prefix.clone(),
            mode_key: self.mode_key.clone(),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

/// Defaults, then the config file, then environment overrides.
///
/// A missing `spinwheel.toml` in the working directory is fine; a missing file
/// named explicitly with `--config` is not.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
            Settings::default()
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str::<Settings>(raw)?)
}

pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SPINWHEEL_STORE") {
        settings.store_path = v.into();
    }
    if let Some(v) = lookup("APP__STORE_PATH") {
        settings.store_path = v.into();
    }

    if let Some(v) = parsed(&lookup, "APP__FRAME_INTERVAL_MS") {
        settings.frame_interval_ms = v;
    }
    if let Some(v) = parsed(&lookup, "APP__SEED") {
        settings.seed = Some(v);
    }

    if let Some(v) = lookup("APP__DATA_PREFIX") {
        settings.data_prefix = v;
    }
    if let Some(v) = lookup("APP__UNDO_PREFIX") {
        settings.undo_prefix = v;
    }
    if let Some(v) = lookup("APP__MODE_KEY") {
        settings.mode_key = v;
    }

    let wheel = &mut settings.wheel;
    if let Some(v) = finite(&lookup, "APP__POINTER_DEGREES") {
        wheel.pointer_degrees = v;
    }
    if let Some(v) = finite(&lookup, "APP__MIN_DURATION_MS") {
        wheel.min_duration_ms = v;
    }
    if let Some(v) = finite(&lookup, "APP__DURATION_SPREAD_MS") {
        wheel.duration_spread_ms = v;
    }
    if let Some(v) = finite(&lookup, "APP__MIN_TURNS") {
        wheel.min_turns = v;
    }
    if let Some(v) = finite(&lookup, "APP__TURN_SPREAD") {
        wheel.turn_spread = v;
    }
    if let Some(v) = finite(&lookup, "APP__TICK_CUE_UNTIL") {
        wheel.tick_cue_until = v;
    }
    if let Some(v) = finite(&lookup, "APP__SLOWDOWN_CUE_UNTIL") {
        wheel.slowdown_cue_until = v;
    }
    if let Some(v) = parsed(&lookup, "APP__LABEL_MAX_CHARS") {
        wheel.label_max_chars = v;
    }
    if let Some(v) = parsed(&lookup, "APP__PALETTE_SIZE") {
        wheel.palette_size = v;
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

fn finite(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<f64> {
    let value: f64 = parsed(lookup, key)?;
    if value.is_finite() {
        Some(value)
    } else {
        warn!(key, value, "ignoring non-finite environment override");
        None
    }
}

pub fn prepare_store_path(raw: &Path) -> anyhow::Result<PathBuf> {
    let path = if raw.as_os_str().is_empty() {
        PathBuf::from(DEFAULT_STORE_PATH)
    } else {
        raw.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create parent directory '{}' for store '{}'",
                parent.display(),
                path.display()
            )
        })?;
    }

    Ok(path)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
