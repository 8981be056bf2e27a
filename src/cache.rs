//! Session cache for catalog responses.
//! Entries live in memory only and are gone on reload.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Cache entry with expiration
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Vec<u8>,
    pub stored_at: DateTime<Utc>,
    pub expiry: Duration,
}

impl CacheEntry {
    pub fn new(data: Vec<u8>, expiry: Duration) -> Self {
        Self::stored_at(data, expiry, Utc::now())
    }

    pub fn stored_at(data: Vec<u8>, expiry: Duration, stored_at: DateTime<Utc>) -> Self {
        Self {
            data,
            stored_at,
            expiry,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.stored_at > self.expiry
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len() + std::mem::size_of::<DateTime<Utc>>() + std::mem::size_of::<Duration>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_size_bytes: usize,
    pub max_size_bytes: usize,
}

/// Size-bounded cache; evicts the oldest entries first.
#[derive(Debug, Clone, Default)]
pub struct SimpleCache {
    entries: HashMap<String, CacheEntry>,
    max_size_bytes: usize,
    current_size_bytes: usize,
}

impl SimpleCache {
    pub fn new(max_size_mb: u32) -> Self {
        Self::with_max_bytes((max_size_mb as usize) * 1024 * 1024)
    }

    pub fn with_max_bytes(max_size_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_size_bytes,
            current_size_bytes: 0,
        }
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }

    pub fn put(&mut self, key: String, entry: CacheEntry) {
        self.clean_expired();
        // The previous value goes even when the new one is too large to keep.
        self.remove(&key);

        let entry_size = entry.size_bytes();
        if entry_size > self.max_size_bytes {
            return;
        }

        while self.current_size_bytes + entry_size > self.max_size_bytes {
            let Some(oldest_key) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            self.remove(&oldest_key);
        }

        self.entries.insert(key, entry);
        self.current_size_bytes += entry_size;
    }

    pub fn remove(&mut self, key: &str) -> bool {
        if let Some(entry) = self.entries.remove(key) {
            self.current_size_bytes = self.current_size_bytes.saturating_sub(entry.size_bytes());
            true
        } else {
            false
        }
    }

    pub fn remove_by_prefix(&mut self, prefix: &str) -> usize {
        let keys: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        keys.iter().filter(|key| self.remove(key)).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_size_bytes = 0;
    }

    pub fn clean_expired(&mut self) {
        let now = Utc::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in expired_keys {
            self.remove(&key);
        }
    }

    pub fn resize_max_size_mb(&mut self, max_size_mb: u32) {
        self.max_size_bytes = (max_size_mb as usize) * 1024 * 1024;
        while self.current_size_bytes > self.max_size_bytes {
            let Some(oldest_key) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            self.remove(&oldest_key);
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.entries.len(),
            total_size_bytes: self.current_size_bytes,
            max_size_bytes: self.max_size_bytes,
        }
    }
}
