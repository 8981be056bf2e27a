use crate::cache::{CacheEntry, SimpleCache};
use crate::settings::AppSettings;
use chrono::Duration;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy)]
struct RuntimeCacheConfig {
    enabled: bool,
    expiry_minutes: u32,
}

impl Default for RuntimeCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expiry_minutes: 30,
        }
    }
}

static CACHE: Lazy<Mutex<SimpleCache>> = Lazy::new(|| Mutex::new(SimpleCache::new(16)));
static CACHE_CONFIG: Lazy<Mutex<RuntimeCacheConfig>> =
    Lazy::new(|| Mutex::new(RuntimeCacheConfig::default()));

fn effective_expiry_minutes(override_minutes: Option<u32>) -> u32 {
    let config = CACHE_CONFIG.lock().unwrap_or_else(|e| e.into_inner());
    override_minutes
        .unwrap_or(config.expiry_minutes)
        .clamp(1, 24 * 60)
}

pub fn is_enabled() -> bool {
    let config = CACHE_CONFIG.lock().unwrap_or_else(|e| e.into_inner());
    config.enabled
}

pub fn apply_settings(settings: &AppSettings) {
    {
        let mut config = CACHE_CONFIG.lock().unwrap_or_else(|e| e.into_inner());
        config.enabled = settings.cache_enabled;
        config.expiry_minutes = settings.cache_expiry_minutes.clamp(1, 24 * 60);
    }

    let mut cache = CACHE.lock().unwrap_or_else(|e| e.into_inner());
    cache.resize_max_size_mb(settings.cache_size_mb.clamp(1, 256));
    if !settings.cache_enabled {
        cache.clear();
    }
}

pub fn get_json<T>(key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    if !is_enabled() {
        return None;
    }

    let cache = CACHE.lock().unwrap_or_else(|e| e.into_inner());
    let bytes = cache.get(key)?.data.clone();
    drop(cache);
    serde_json::from_slice::<T>(&bytes).ok()
}

pub fn put_json<T>(key: impl Into<String>, value: &T, expiry_minutes: Option<u32>) -> bool
where
    T: Serialize,
{
    if !is_enabled() {
        return false;
    }

    let Ok(bytes) = serde_json::to_vec(value) else {
        return false;
    };
    let expiry = Duration::minutes(effective_expiry_minutes(expiry_minutes) as i64);

    let mut cache = CACHE.lock().unwrap_or_else(|e| e.into_inner());
    cache.put(key.into(), CacheEntry::new(bytes, expiry));
    true
}

pub fn remove_by_prefix(prefix: &str) -> usize {
    let mut cache = CACHE.lock().unwrap_or_else(|e| e.into_inner());
    cache.remove_by_prefix(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Song;

    #[test]
    fn json_values_round_trip_through_the_session_cache() {
        let key = "test:cache_service:song";
        let song = Song {
            id: "cached".into(),
            name: "Cached Song".into(),
            duration: 200,
            ..Default::default()
        };
        assert!(put_json(key, &song, Some(5)));
        let restored: Option<Song> = get_json(key);
        assert_eq!(restored, Some(song));
        assert_eq!(remove_by_prefix("test:cache_service:"), 1);
        assert_eq!(get_json::<Song>(key), None);
    }
}
