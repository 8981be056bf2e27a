use crate::api::{DEFAULT_ARTWORK_QUALITY, DEFAULT_STREAM_QUALITY, DEFAULT_THUMBNAIL_QUALITY};
use crate::pagination::ScrollOptions;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

pub const DEFAULT_API_BASE_URL: &str = "https://jiosaavn-api-privatecvc2.vercel.app";

#[cfg(target_arch = "wasm32")]
const SETTINGS_KEY: &str = "saavnplay.settings";

/// Error type for settings load/save
#[derive(Debug)]
pub struct SettingsError(String);

impl SettingsError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "settings: {}", self.0)
    }
}

impl std::error::Error for SettingsError {}

/// User-facing configuration. Every field has a default so older files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_stream_quality")]
    pub stream_quality: String,
    #[serde(default = "default_artwork_quality")]
    pub artwork_quality: String,
    #[serde(default = "default_thumbnail_quality")]
    pub thumbnail_quality: String,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    #[serde(default = "default_cache_size_mb")]
    pub cache_size_mb: u32,
    #[serde(default = "default_cache_expiry_minutes")]
    pub cache_expiry_minutes: u32,
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f64,
    #[serde(default = "default_scroll_root_margin")]
    pub scroll_root_margin: String,
    #[serde(default = "default_true")]
    pub cast_enabled: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_stream_quality() -> String {
    DEFAULT_STREAM_QUALITY.to_string()
}

fn default_artwork_quality() -> String {
    DEFAULT_ARTWORK_QUALITY.to_string()
}

fn default_thumbnail_quality() -> String {
    DEFAULT_THUMBNAIL_QUALITY.to_string()
}

fn default_volume() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_cache_size_mb() -> u32 {
    16
}

fn default_cache_expiry_minutes() -> u32 {
    30
}

fn default_scroll_threshold() -> f64 {
    0.1
}

fn default_scroll_root_margin() -> String {
    "100px".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            stream_quality: default_stream_quality(),
            artwork_quality: default_artwork_quality(),
            thumbnail_quality: default_thumbnail_quality(),
            volume: default_volume(),
            cache_enabled: true,
            cache_size_mb: default_cache_size_mb(),
            cache_expiry_minutes: default_cache_expiry_minutes(),
            scroll_threshold: default_scroll_threshold(),
            scroll_root_margin: default_scroll_root_margin(),
            cast_enabled: true,
        }
    }
}

impl AppSettings {
    /// Repairs values a hand-edited file or an older build may have left out of range.
    pub fn normalized(mut self) -> Self {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = if trimmed.is_empty() {
            default_api_base_url()
        } else {
            trimmed.to_string()
        };

        self.volume = normalize_volume(self.volume);

        if !self.scroll_threshold.is_finite() {
            self.scroll_threshold = default_scroll_threshold();
        }
        self.scroll_threshold = self.scroll_threshold.clamp(0.0, 1.0);

        if self.scroll_root_margin.trim().is_empty() {
            self.scroll_root_margin = default_scroll_root_margin();
        }
        if self.stream_quality.trim().is_empty() {
            self.stream_quality = default_stream_quality();
        }
        if self.artwork_quality.trim().is_empty() {
            self.artwork_quality = default_artwork_quality();
        }
        if self.thumbnail_quality.trim().is_empty() {
            self.thumbnail_quality = default_thumbnail_quality();
        }
        self.cache_size_mb = self.cache_size_mb.clamp(1, 256);
        self.cache_expiry_minutes = self.cache_expiry_minutes.clamp(1, 24 * 60);
        self
    }

    pub fn scroll_options(&self) -> ScrollOptions {
        ScrollOptions {
            threshold: self.scroll_threshold,
            root_margin: self.scroll_root_margin.clone(),
        }
    }
}

/// Older builds stored volume as a percentage.
fn normalize_volume(mut value: f64) -> f64 {
    if !value.is_finite() {
        return default_volume();
    }
    let mut passes = 0;
    while value > 1.0 && passes < 4 {
        value /= 100.0;
        passes += 1;
    }
    value.clamp(0.0, 1.0)
}

pub fn parse_settings(raw: &str) -> Result<AppSettings, SettingsError> {
    serde_json::from_str::<AppSettings>(raw)
        .map(AppSettings::normalized)
        .map_err(|e| SettingsError::new(e.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
fn settings_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("saavnplay").join("settings.json"))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_settings() -> Result<AppSettings, SettingsError> {
    let Some(path) = settings_path() else {
        return Ok(AppSettings::default());
    };
    match std::fs::read_to_string(&path) {
        Ok(raw) => parse_settings(&raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppSettings::default()),
        Err(e) => Err(SettingsError::new(format!("{}: {e}", path.display()))),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_settings(settings: &AppSettings) -> Result<(), SettingsError> {
    let path = settings_path().ok_or_else(|| SettingsError::new("no config directory"))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SettingsError::new(e.to_string()))?;
    }
    let raw =
        serde_json::to_string_pretty(settings).map_err(|e| SettingsError::new(e.to_string()))?;
    std::fs::write(&path, raw).map_err(|e| SettingsError::new(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
pub fn load_settings() -> Result<AppSettings, SettingsError> {
    match LocalStorage::get::<AppSettings>(SETTINGS_KEY) {
        Ok(settings) => Ok(settings.normalized()),
        Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(AppSettings::default()),
        Err(e) => Err(SettingsError::new(e.to_string())),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn save_settings(settings: &AppSettings) -> Result<(), SettingsError> {
    LocalStorage::set(SETTINGS_KEY, settings).map_err(|e| SettingsError::new(e.to_string()))
}

/// Loads settings, falling back to defaults when storage is unreadable.
pub fn load_settings_or_default() -> AppSettings {
    match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("using default settings: {e}");
            AppSettings::default()
        }
    }
}
