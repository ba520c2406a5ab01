use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreResult;

/// The abstract command set the record layer consumes from a store.
///
/// All implementations must satisfy these invariants:
/// - Commands are individually atomic; there is no multi-command
///   transaction except `delete_matching`, which scans and deletes within
///   one batch.
/// - `hash_get_all` cannot distinguish a missing key from an empty hash;
///   callers that need the distinction check `key_exists` first.
/// - `set_if_absent` and `delete_if_token_matches` together form the lease
///   primitive: acquisition is a single set-if-absent-with-expiry, release
///   only succeeds for the owning token.
/// - Patterns are trailing-glob only (`"<prefix>*"`); no other glob shapes
///   are supported.
#[async_trait]
pub trait StoreCommands: Send + Sync {
    /// Returns `true` iff the key is present, regardless of contents.
    async fn key_exists(&self, key: &str) -> StoreResult<bool>;

    /// Overwrite the full hash at `key`. Not a partial patch: fields absent
    /// from `fields` are gone after this call.
    async fn hash_set_all(&self, key: &str, fields: BTreeMap<String, String>)
        -> StoreResult<()>;

    /// Read the full hash at `key`. An absent key reads as an empty map.
    async fn hash_get_all(&self, key: &str) -> StoreResult<BTreeMap<String, String>>;

    /// Delete a key unconditionally. Returns `true` iff a key was removed.
    async fn delete_key(&self, key: &str) -> StoreResult<bool>;

    /// List all keys matching a trailing-glob pattern.
    async fn keys_matching(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Atomically set `key` to `token` with a time-to-live, only if the key
    /// is absent. Returns `true` on acquisition, `false` when the key is
    /// already held.
    async fn set_if_absent(&self, key: &str, token: &str, ttl: Duration)
        -> StoreResult<bool>;

    /// Delete `key` only if it currently holds `token`. Returns `true` on
    /// deletion, `false` on ownership mismatch or absence.
    async fn delete_if_token_matches(&self, key: &str, token: &str) -> StoreResult<bool>;

    /// Increment the integer counter at `key`, creating it at zero first if
    /// absent. Returns the post-increment value.
    async fn increment(&self, key: &str) -> StoreResult<i64>;

    /// Delete every key matching a trailing-glob pattern within one atomic
    /// batch. Returns the number of keys removed; an empty match set issues
    /// no delete and returns 0.
    async fn delete_matching(&self, pattern: &str) -> StoreResult<u64>;
}
