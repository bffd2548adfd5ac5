use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::LanguageCode;
use crate::storage::SYSTEM_LANGUAGE_KEY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read page config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse page config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 頁面行為設定；缺少的欄位使用預設值。 / Page behaviour knobs; absent fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_language_key")]
    pub language_key: String,
    #[serde(default)]
    pub default_language: LanguageCode,
    #[serde(default)]
    pub force_default_language: bool,
    #[serde(default = "default_toast_ms")]
    pub toast_duration_ms: u64,
    #[serde(default = "default_notification_ms")]
    pub notification_duration_ms: u64,
    #[serde(default = "default_notification_hide_ms")]
    pub notification_hide_ms: u64,
    #[serde(default = "default_notification_slide_in_ms")]
    pub notification_slide_in_ms: u64,
    #[serde(default = "default_clock_interval_ms")]
    pub clock_interval_ms: u64,
    #[serde(default = "default_battery_interval_ms")]
    pub battery_interval_ms: u64,
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint_px: u32,
}

fn default_language_key() -> String {
    SYSTEM_LANGUAGE_KEY.to_string()
}

fn default_toast_ms() -> u64 {
    2_000
}

fn default_notification_ms() -> u64 {
    3_000
}

fn default_notification_hide_ms() -> u64 {
    300
}

fn default_notification_slide_in_ms() -> u64 {
    100
}

fn default_clock_interval_ms() -> u64 {
    60_000
}

fn default_battery_interval_ms() -> u64 {
    300_000
}

fn default_mobile_breakpoint() -> u32 {
    640
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            language_key: default_language_key(),
            default_language: LanguageCode::default(),
            force_default_language: false,
            toast_duration_ms: default_toast_ms(),
            notification_duration_ms: default_notification_ms(),
            notification_hide_ms: default_notification_hide_ms(),
            notification_slide_in_ms: default_notification_slide_in_ms(),
            clock_interval_ms: default_clock_interval_ms(),
            battery_interval_ms: default_battery_interval_ms(),
            mobile_breakpoint_px: default_mobile_breakpoint(),
        }
    }
}

impl PageConfig {
    /// 讀取設定檔；不存在時回傳預設值。 / Loads the config file, returning defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut config: PageConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        config.sanitize();
        Ok(config)
    }

    /// Zero timers fall back to defaults (a zero notification duration is kept: it means "sticky").
    pub fn sanitize(&mut self) {
        if self.language_key.trim().is_empty() {
            self.language_key = default_language_key();
        }
        if self.toast_duration_ms == 0 {
            self.toast_duration_ms = default_toast_ms();
        }
        if self.notification_hide_ms == 0 {
            self.notification_hide_ms = default_notification_hide_ms();
        }
        if self.notification_slide_in_ms == 0 {
            self.notification_slide_in_ms = default_notification_slide_in_ms();
        }
        if self.clock_interval_ms == 0 {
            self.clock_interval_ms = default_clock_interval_ms();
        }
        if self.battery_interval_ms == 0 {
            self.battery_interval_ms = default_battery_interval_ms();
        }
        if self.mobile_breakpoint_px == 0 {
            self.mobile_breakpoint_px = default_mobile_breakpoint();
        }
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }

    pub fn notification_hide(&self) -> Duration {
        Duration::from_millis(self.notification_hide_ms)
    }

    pub fn notification_slide_in(&self) -> Duration {
        Duration::from_millis(self.notification_slide_in_ms)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms)
    }

    pub fn battery_interval(&self) -> Duration {
        Duration::from_millis(self.battery_interval_ms)
    }
}
