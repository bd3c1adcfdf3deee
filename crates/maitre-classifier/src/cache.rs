// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local classification cache.
//!
//! Entries are keyed by a content-derived fingerprint and never mutated
//! after insertion, so concurrent callers need no coordination beyond the
//! sharded map. Two callers racing on the same key both write; last wins.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::types::{ClassificationResult, ConversationContext, normalize_text};

/// Cache key over the normalized query and the trailing context window.
pub fn fingerprint(query_text: &str, context: Option<&ConversationContext>, window: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_text(query_text).as_bytes());
    hasher.update([0u8]);
    if let Some(context) = context {
        hasher.update(context.signature(window).as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// A cached result and when it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: ClassificationResult,
    pub inserted_at: Instant,
}

/// Fingerprint-keyed result cache with optional TTL expiry.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Option<Duration>,
}

impl ClassificationCache {
    /// Creates an empty cache. `None` disables expiry.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Returns the stored result, dropping it first if it has expired.
    pub fn get(&self, key: &str) -> Option<ClassificationResult> {
        let expired = match self.entries.get(key) {
            None => return None,
            Some(entry) if self.is_expired(&entry) => true,
            Some(entry) => return Some(entry.result.clone()),
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: String, result: ClassificationResult) {
        self.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Evicts every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.inserted_at.elapsed() > ttl)
    }
}
