//! User settings for the billing calculations and their on-disk persistence.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::billing::{
    SummaryPeriod, DEFAULT_DUE_SOON_DAYS, DEFAULT_EXPANSION_CAP, DEFAULT_UPCOMING_WINDOW_DAYS,
};
use crate::currency::{CurrencyCode, LocaleConfig, LocaleFormatter};

/// Overrides the directory holding `settings.json`.
pub const CONFIG_DIR_ENV: &str = "SUBTRACK_CONFIG_DIR";
const SETTINGS_FILE: &str = "settings.json";
const TMP_SUFFIX: &str = "tmp";
/// Upper bound for day-count settings (one hundred years).
pub const MAX_SETTING_DAYS: i64 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Stores user-configurable preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "Settings::default_locale")]
    pub locale: String,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default = "Settings::default_due_soon_days")]
    pub due_soon_threshold_days: i64,
    #[serde(default = "Settings::default_window_days")]
    pub upcoming_window_days: i64,
    #[serde(default = "Settings::default_expansion_cap")]
    pub expansion_cap: usize,
    #[serde(default)]
    pub summary_period: SummaryPeriod,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: CurrencyCode::default(),
            due_soon_threshold_days: Self::default_due_soon_days(),
            upcoming_window_days: Self::default_window_days(),
            expansion_cap: Self::default_expansion_cap(),
            summary_period: SummaryPeriod::default(),
        }
    }
}

impl Settings {
    fn default_locale() -> String {
        "en-US".into()
    }

    fn default_due_soon_days() -> i64 {
        DEFAULT_DUE_SOON_DAYS
    }

    fn default_window_days() -> i64 {
        DEFAULT_UPCOMING_WINDOW_DAYS
    }

    fn default_expansion_cap() -> usize {
        DEFAULT_EXPANSION_CAP
    }

    /// Rejects values that would make the calculations meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_SETTING_DAYS).contains(&self.due_soon_threshold_days) {
            return Err(ConfigError::Invalid(format!(
                "dueSoonThresholdDays must be between 0 and {MAX_SETTING_DAYS}"
            )));
        }
        if !(0..=MAX_SETTING_DAYS).contains(&self.upcoming_window_days) {
            return Err(ConfigError::Invalid(format!(
                "upcomingWindowDays must be between 0 and {MAX_SETTING_DAYS}"
            )));
        }
        if self.expansion_cap == 0 {
            return Err(ConfigError::Invalid("expansionCap must be at least 1".into()));
        }
        Ok(())
    }

    pub fn formatter(&self) -> LocaleFormatter {
        LocaleFormatter::new(LocaleConfig::for_tag(&self.locale))
    }
}

/// Handles persistence for [`Settings`].
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    pub fn new(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// Uses `$SUBTRACK_CONFIG_DIR`, else the platform config directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("subtrack"),
        };
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(SETTINGS_FILE)))
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Loads settings, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        if !self.settings_path.exists() {
            debug!(path = %self.settings_path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let data = fs::read_to_string(&self.settings_path)?;
        let settings: Settings =
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        settings.validate()?;
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.settings_path);
        write_synced(&tmp, &json)?;
        fs::rename(&tmp, &self.settings_path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_synced(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
