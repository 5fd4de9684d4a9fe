//! Read cache keyed by request, invalidated by tag.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::operation::Tag;

struct Entry {
    tags: Vec<Tag>,
    value: Value,
}

#[derive(Default)]
pub struct TagCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // Entries are plain data; a panic mid-insert leaves nothing half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries().get(key).map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: String, tags: Vec<Tag>, value: Value) {
        self.entries().insert(key, Entry { tags, value });
    }

    /// Drop every entry carrying any of `tags`. Returns how many were dropped.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|tag| tags.contains(tag)));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
