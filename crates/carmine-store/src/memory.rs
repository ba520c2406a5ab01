//! In-memory store backend for tests and embedding.
//!
//! [`InMemoryStore`] keeps all entries in a `HashMap` behind a
//! `tokio::sync::RwLock`. Lease expiry is lazy: expired tokens are treated
//! as absent on every read path and pruned when a write path touches them.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::StoreCommands;

/// One stored value: a record hash, a TTL-bound lease token, or a counter.
#[derive(Clone, Debug)]
enum Entry {
    Hash(BTreeMap<String, String>),
    Token {
        value: String,
        expires_at: Instant,
    },
    Counter(i64),
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        match self {
            Entry::Token { expires_at, .. } => *expires_at <= now,
            _ => false,
        }
    }
}

/// An in-memory implementation of [`StoreCommands`].
///
/// All data lives in a `HashMap` behind an async `RwLock`; each trait method
/// holds the lock for its full duration, which gives every command the
/// single-command atomicity the contract requires and makes
/// `delete_matching` a genuine scan-then-delete batch.
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live (non-expired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired(now)).count()
    }

    /// Returns `true` if the store holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove all entries. The in-memory stand-in for `flushall`.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Trailing-glob match: `"<prefix>*"` matches by prefix, anything else
/// matches exactly.
fn key_matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[async_trait]
impl StoreCommands for InMemoryStore {
    async fn key_exists(&self, key: &str) -> StoreResult<bool> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries.get(key).is_some_and(|e| !e.is_expired(now)))
    }

    async fn hash_set_all(
        &self,
        key: &str,
        fields: BTreeMap<String, String>,
    ) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry::Hash(fields));
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<BTreeMap<String, String>> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(e) if e.is_expired(now) => Ok(BTreeMap::new()),
            Some(Entry::Hash(fields)) => Ok(fields.clone()),
            Some(_) => Err(StoreError::WrongKind {
                key: key.to_string(),
                expected: "hash",
            }),
            None => Ok(BTreeMap::new()),
        }
    }

    async fn delete_key(&self, key: &str) -> StoreResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.remove(key) {
            Some(e) => Ok(!e.is_expired(now)),
            None => Ok(false),
        }
    }

    async fn keys_matching(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(k, e)| !e.is_expired(now) && key_matches(pattern, k))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn set_if_absent(
        &self,
        key: &str,
        token: &str,
        ttl: Duration,
    ) -> StoreResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| !e.is_expired(now)) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry::Token {
                value: token.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    async fn delete_if_token_matches(&self, key: &str, token: &str) -> StoreResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let owned = matches!(
            entries.get(key),
            Some(Entry::Token { value, expires_at }) if *expires_at > now && value.as_str() == token
        );
        if owned {
            entries.remove(key);
        }
        Ok(owned)
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        // An expired token at the key is pruned; the counter starts fresh.
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        let next = match entries.get(key) {
            Some(Entry::Counter(n)) => n + 1,
            Some(_) => {
                return Err(StoreError::WrongKind {
                    key: key.to_string(),
                    expected: "counter",
                })
            }
            None => 1,
        };
        entries.insert(key.to_string(), Entry::Counter(next));
        Ok(next)
    }

    async fn delete_matching(&self, pattern: &str) -> StoreResult<u64> {
        let now = Instant::now();
        // One write-lock critical section: the scan and the deletes are a
        // single batch, never interleaved with other commands.
        let mut entries = self.entries.write().await;
        let matched: Vec<String> = entries
            .iter()
            .filter(|(k, e)| !e.is_expired(now) && key_matches(pattern, k))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &matched {
            entries.remove(key);
        }
        Ok(matched.len() as u64)
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore").finish_non_exhaustive()
    }
}
