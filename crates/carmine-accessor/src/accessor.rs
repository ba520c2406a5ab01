use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use carmine_codec as codec;
use carmine_lock::{Lease, LockError, LockManager, LockResult, DEFAULT_TTL};
use carmine_store::StoreCommands;
use carmine_types::{
    id_from_key, id_sequence_key, lock_key, namespace_pattern, record_key, validate_id,
    IdStrategy, ModelSchema, Record,
};

use crate::error::{AccessError, AccessResult};
use crate::query::IdQuery;

/// Per-model accessor over a shared store handle.
///
/// Holds the model's schema, the lease manager for the create path, and the
/// id assignment strategy. Cheap to construct; connectors build one per
/// model on demand.
pub struct Accessor {
    store: Arc<dyn StoreCommands>,
    locks: LockManager,
    schema: ModelSchema,
    lock_ttl: Duration,
    id_strategy: IdStrategy,
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("schema", &self.schema)
            .field("lock_ttl", &self.lock_ttl)
            .field("id_strategy", &self.id_strategy)
            .finish_non_exhaustive()
    }
}

impl Accessor {
    /// Create an accessor with the default lock TTL and id strategy.
    pub fn new(store: Arc<dyn StoreCommands>, schema: ModelSchema) -> Self {
        Self {
            locks: LockManager::new(Arc::clone(&store)),
            store,
            schema,
            lock_ttl: DEFAULT_TTL,
            id_strategy: IdStrategy::default(),
        }
    }

    /// Override the create-path lease TTL.
    pub fn with_lock_ttl(mut self, ttl: Duration) -> Self {
        self.lock_ttl = ttl;
        self
    }

    /// Override the id assignment strategy for creates without an id.
    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// The model this accessor serves.
    pub fn model(&self) -> &str {
        self.schema.name()
    }

    /// Returns `true` iff the record key is present, regardless of contents.
    pub async fn exists_by_id(&self, id: &str) -> AccessResult<bool> {
        validate_id(id)?;
        let key = record_key(self.model(), id);
        Ok(self.store.key_exists(&key).await?)
    }

    /// Acquire the create-path lease for an id directly.
    ///
    /// For callers that need the lease outside `create_with_id`; contention
    /// surfaces as [`LockError::Contended`] rather than a conflict.
    pub async fn lock_by_id(&self, id: &str, ttl: Option<Duration>) -> LockResult<Lease> {
        let resource = lock_key(self.model(), id);
        self.locks.acquire(&resource, ttl.unwrap_or(self.lock_ttl)).await
    }

    /// Create a record at an explicit id.
    ///
    /// Fails with [`AccessError::Conflict`] when a record already exists or
    /// a concurrent creator holds the lease — contention and duplication
    /// are reported identically. On success returns the record as stored.
    pub async fn create_with_id(&self, id: &str, record: &Record) -> AccessResult<Record> {
        validate_id(id)?;
        let key = record_key(self.model(), id);
        if self.store.key_exists(&key).await? {
            return Err(self.conflict(id));
        }
        let lease = match self.lock_by_id(id, None).await {
            Ok(lease) => lease,
            // A concurrent creator is presumed in progress.
            Err(LockError::Contended { .. }) => return Err(self.conflict(id)),
            Err(LockError::Store(e)) => return Err(e.into()),
        };
        let outcome = self.write_if_still_absent(&key, id, record).await;
        // Release on every exit path; the TTL covers a crashed holder.
        lease.release().await;
        let stored = outcome?;
        debug!(model = self.model(), id, "record created");
        Ok(codec::decode(&self.schema, &stored)?)
    }

    /// The critical section of the create path: re-check existence under
    /// the lease, then write. The pre-lock check raced ahead of the lease,
    /// so only this check is authoritative.
    async fn write_if_still_absent(
        &self,
        key: &str,
        id: &str,
        record: &Record,
    ) -> AccessResult<std::collections::BTreeMap<String, String>> {
        if self.store.key_exists(key).await? {
            return Err(self.conflict(id));
        }
        let encoded = codec::encode(&self.schema, record);
        self.store.hash_set_all(key, encoded.clone()).await?;
        Ok(encoded)
    }

    /// Create a record with a generated id, per the configured strategy.
    ///
    /// Returns the assigned id alongside the record as stored.
    pub async fn create(&self, record: &Record) -> AccessResult<(String, Record)> {
        let id = match self.id_strategy {
            IdStrategy::Random => uuid::Uuid::now_v7().to_string(),
            IdStrategy::Sequence => {
                let seq = self.store.increment(&id_sequence_key(self.model())).await?;
                seq.to_string()
            }
        };
        let stored = self.create_with_id(&id, record).await?;
        Ok((id, stored))
    }

    /// Unconditional full overwrite. No existence check, no lease —
    /// last writer wins. Returns the record as stored.
    pub async fn put(&self, id: &str, record: &Record) -> AccessResult<Record> {
        validate_id(id)?;
        let key = record_key(self.model(), id);
        let encoded = codec::encode(&self.schema, record);
        self.store.hash_set_all(&key, encoded.clone()).await?;
        debug!(model = self.model(), id, "record written");
        Ok(codec::decode(&self.schema, &encoded)?)
    }

    /// Read a record by id, failing with [`AccessError::NotFound`] when
    /// absent.
    ///
    /// Existence is checked before the hash read: the store cannot
    /// distinguish a missing key from an empty hash in a single read.
    pub async fn find_by_id(&self, id: &str) -> AccessResult<Record> {
        validate_id(id)?;
        let key = record_key(self.model(), id);
        if !self.store.key_exists(&key).await? {
            return Err(AccessError::NotFound {
                model: self.model().to_string(),
                id: id.to_string(),
            });
        }
        let data = self.store.hash_get_all(&key).await?;
        Ok(codec::decode(&self.schema, &data)?)
    }

    /// Read a set of records by id. Missing and unusable members are
    /// skipped, not errors; store failures still propagate.
    pub async fn find_by_ids(&self, ids: &[String]) -> AccessResult<Vec<(String, Record)>> {
        let mut found = Vec::new();
        for id in ids {
            match self.find_by_id(id).await {
                Ok(record) => found.push((id.clone(), record)),
                Err(AccessError::NotFound { .. }) | Err(AccessError::InvalidId(_)) => {
                    debug!(model = self.model(), id = %id, "skipping missing id in membership read");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(found)
    }

    /// List every record of the model.
    ///
    /// A best-effort snapshot, not a consistent view: the namespace is
    /// scanned once, then each key is read individually, and a member that
    /// fails in between (deleted mid-scan, or unreadable) is skipped.
    pub async fn find_all(&self) -> AccessResult<Vec<(String, Record)>> {
        let keys = self
            .store
            .keys_matching(&namespace_pattern(self.model()))
            .await?;
        let mut found = Vec::new();
        for key in keys {
            let Some(id) = id_from_key(self.model(), &key) else {
                continue;
            };
            match self.find_by_id(id).await {
                Ok(record) => found.push((id.to_string(), record)),
                Err(e) => {
                    debug!(model = self.model(), key = %key, error = %e, "skipping record in scan");
                }
            }
        }
        Ok(found)
    }

    /// Read the records a predicate restricts to. Unsupported predicate
    /// shapes resolve to an empty result.
    pub async fn find_by_where(
        &self,
        where_clause: Option<&Value>,
    ) -> AccessResult<Vec<(String, Record)>> {
        match IdQuery::from_where(where_clause) {
            IdQuery::All => self.find_all().await,
            IdQuery::One(id) => match self.find_by_id(&id).await {
                Ok(record) => Ok(vec![(id, record)]),
                Err(AccessError::NotFound { .. }) | Err(AccessError::InvalidId(_)) => {
                    Ok(Vec::new())
                }
                Err(e) => Err(e),
            },
            IdQuery::Many(ids) => self.find_by_ids(&ids).await,
            IdQuery::Unsupported => {
                debug!(model = self.model(), "unsupported predicate shape; empty result");
                Ok(Vec::new())
            }
        }
    }

    /// Delete a record by id. Idempotent: an absent key is not an error
    /// and reports zero affected.
    pub async fn destroy_by_id(&self, id: &str) -> AccessResult<u64> {
        validate_id(id)?;
        let key = record_key(self.model(), id);
        let removed = self.store.delete_key(&key).await?;
        if removed {
            debug!(model = self.model(), id, "record destroyed");
        }
        Ok(u64::from(removed))
    }

    /// Delete the records a predicate restricts to, returning the number
    /// actually removed.
    ///
    /// Id-restricted predicates destroy individually, counting successes
    /// only. The empty predicate bulk-deletes the whole namespace in one
    /// atomic scan-then-delete batch. Unsupported shapes destroy nothing.
    pub async fn destroy_by_where(&self, where_clause: Option<&Value>) -> AccessResult<u64> {
        match IdQuery::from_where(where_clause) {
            IdQuery::All => {
                let count = self
                    .store
                    .delete_matching(&namespace_pattern(self.model()))
                    .await?;
                debug!(model = self.model(), count, "namespace destroyed");
                Ok(count)
            }
            IdQuery::One(id) => Ok(self.destroy_counted(&id).await),
            IdQuery::Many(ids) => {
                let mut count = 0;
                for id in &ids {
                    count += self.destroy_counted(id).await;
                }
                Ok(count)
            }
            IdQuery::Unsupported => {
                debug!(model = self.model(), "unsupported predicate shape; nothing destroyed");
                Ok(0)
            }
        }
    }

    /// One member of a bulk destroy: failures are excluded from the count,
    /// not surfaced.
    async fn destroy_counted(&self, id: &str) -> u64 {
        match self.destroy_by_id(id).await {
            Ok(n) => n,
            Err(e) => {
                debug!(model = self.model(), id, error = %e, "skipping failed destroy");
                0
            }
        }
    }

    fn conflict(&self, id: &str) -> AccessError {
        AccessError::Conflict {
            model: self.model().to_string(),
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carmine_store::InMemoryStore;
    use carmine_types::{FieldType, FieldValue};
    use serde_json::json;

    fn person_schema() -> ModelSchema {
        ModelSchema::new("person")
            .unwrap()
            .with_field("name", FieldType::String)
            .with_field("age", FieldType::Number)
    }

    fn accessor_for(store: &Arc<InMemoryStore>, schema: ModelSchema) -> Accessor {
        let handle: Arc<dyn StoreCommands> = store.clone();
        Accessor::new(handle, schema)
    }

    fn setup() -> (Arc<InMemoryStore>, Accessor) {
        let store = Arc::new(InMemoryStore::new());
        let accessor = accessor_for(&store, person_schema());
        (store, accessor)
    }

    fn person(name: &str, age: f64) -> Record {
        Record::from([
            ("name".to_string(), FieldValue::from(name)),
            ("age".to_string(), FieldValue::from(age)),
        ])
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn create_and_read_back() {
        let (_store, accessor) = setup();

        let created = accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        assert_eq!(created.get("name"), Some(&FieldValue::from("Charlie")));
        assert_eq!(created.get("age"), Some(&FieldValue::from(24.0)));

        let found = accessor.find_by_id("0").await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn duplicate_create_conflicts_and_preserves_original() {
        let (_store, accessor) = setup();

        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        let err = accessor
            .create_with_id("0", &person("Mary", 34.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Conflict { .. }));

        let stored = accessor.find_by_id("0").await.unwrap();
        assert_eq!(stored.get("name"), Some(&FieldValue::from("Charlie")));
    }

    #[tokio::test]
    async fn create_leaves_no_lease_behind() {
        let (store, accessor) = setup();

        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        assert!(!store.key_exists("locks:person:0").await.unwrap());
    }

    #[tokio::test]
    async fn create_without_id_assigns_random_ids() {
        let (_store, accessor) = setup();

        let (id1, _) = accessor.create(&person("Charlie", 24.0)).await.unwrap();
        let (id2, _) = accessor.create(&person("Mary", 34.0)).await.unwrap();

        assert!(!id1.is_empty());
        assert_ne!(id1, id2);
        assert!(accessor.exists_by_id(&id1).await.unwrap());
    }

    #[tokio::test]
    async fn sequence_strategy_counts_up() {
        let store = Arc::new(InMemoryStore::new());
        let accessor =
            accessor_for(&store, person_schema()).with_id_strategy(IdStrategy::Sequence);

        let (id1, _) = accessor.create(&person("Charlie", 24.0)).await.unwrap();
        let (id2, _) = accessor.create(&person("Mary", 34.0)).await.unwrap();
        let (id3, _) = accessor.create(&person("David", 44.0)).await.unwrap();

        assert_eq!((id1.as_str(), id2.as_str(), id3.as_str()), ("1", "2", "3"));
    }

    #[tokio::test]
    async fn create_rejects_empty_id() {
        let (_store, accessor) = setup();
        let err = accessor
            .create_with_id("", &person("Charlie", 24.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidId(_)));
    }

    // -----------------------------------------------------------------------
    // Lock mutual exclusion on the create path
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn held_lease_turns_create_into_conflict() {
        let (_store, accessor) = setup();

        let lease = accessor.lock_by_id("0", None).await.unwrap();

        let err = accessor
            .create_with_id("0", &person("Charlie", 24.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Conflict { .. }));
        assert!(!accessor.exists_by_id("0").await.unwrap());

        lease.release().await;

        // With the lease gone and the id still absent, create succeeds.
        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
    }

    #[tokio::test]
    async fn expired_lease_no_longer_blocks_create() {
        let (_store, accessor) = setup();

        let stale = accessor
            .lock_by_id("0", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        stale.release().await;
    }

    #[tokio::test]
    async fn lock_by_id_surfaces_contention_directly() {
        let (_store, accessor) = setup();

        let lease = accessor.lock_by_id("0", None).await.unwrap();
        let err = accessor.lock_by_id("0", None).await.unwrap_err();
        assert!(matches!(err, LockError::Contended { .. }));
        lease.release().await;
    }

    // -----------------------------------------------------------------------
    // Put (save / update-or-create)
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn put_creates_when_absent() {
        let (_store, accessor) = setup();

        accessor.put("0", &person("Charlie", 24.0)).await.unwrap();
        let found = accessor.find_by_id("0").await.unwrap();
        assert_eq!(found.get("name"), Some(&FieldValue::from("Charlie")));
    }

    #[tokio::test]
    async fn put_is_a_full_overwrite() {
        let (_store, accessor) = setup();

        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();

        let update = Record::from([("name".to_string(), FieldValue::from("CharlieLi"))]);
        accessor.put("0", &update).await.unwrap();

        let found = accessor.find_by_id("0").await.unwrap();
        assert_eq!(found.get("name"), Some(&FieldValue::from("CharlieLi")));
        // Not a partial patch: the age field is gone.
        assert_eq!(found.get("age"), None);
    }

    // -----------------------------------------------------------------------
    // Find
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn find_missing_id_is_not_found() {
        let (_store, accessor) = setup();
        let err = accessor.find_by_id("1234").await.unwrap_err();
        assert!(matches!(err, AccessError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_by_ids_skips_missing_members() {
        let (_store, accessor) = setup();

        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        accessor.create_with_id("1", &person("Mary", 34.0)).await.unwrap();

        let found = accessor
            .find_by_ids(&["0".to_string(), "lorem".to_string(), "1".to_string()])
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1"]);
    }

    #[tokio::test]
    async fn find_by_ids_with_empty_input_is_empty() {
        let (_store, accessor) = setup();
        assert!(accessor.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_all_is_scoped_to_the_model() {
        let store = Arc::new(InMemoryStore::new());
        let people = accessor_for(&store, person_schema());
        let orders = accessor_for(&store, ModelSchema::new("order").unwrap());

        people.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        people.create_with_id("1", &person("Mary", 34.0)).await.unwrap();
        orders
            .create_with_id("0", &Record::from([("total".to_string(), FieldValue::from(9.5))]))
            .await
            .unwrap();

        let found = people.find_all().await.unwrap();
        assert_eq!(found.len(), 2);
        let ids: Vec<&str> = found.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1"]);
    }

    #[tokio::test]
    async fn find_all_skips_unreadable_members() {
        let (store, accessor) = setup();

        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        // A counter squatting in the namespace reads as the wrong kind;
        // the scan must degrade gracefully around it.
        store.increment("person:broken").await.unwrap();

        let found = accessor.find_all().await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "0");
    }

    #[tokio::test]
    async fn find_by_where_shapes() {
        let (_store, accessor) = setup();

        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        accessor.create_with_id("1", &person("Mary", 34.0)).await.unwrap();

        let one = json!({"id": "0"});
        assert_eq!(accessor.find_by_where(Some(&one)).await.unwrap().len(), 1);

        let members = json!({"id": {"inq": ["0", "1", "lorem"]}});
        assert_eq!(accessor.find_by_where(Some(&members)).await.unwrap().len(), 2);

        let everything = json!({});
        assert_eq!(accessor.find_by_where(Some(&everything)).await.unwrap().len(), 2);
        assert_eq!(accessor.find_by_where(None).await.unwrap().len(), 2);

        let missing = json!({"id": "1234"});
        assert!(accessor.find_by_where(Some(&missing)).await.unwrap().is_empty());

        let unsupported = json!({"name": "Charlie"});
        assert!(accessor
            .find_by_where(Some(&unsupported))
            .await
            .unwrap()
            .is_empty());
    }

    // -----------------------------------------------------------------------
    // Destroy
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn destroy_is_idempotent() {
        let (_store, accessor) = setup();

        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        assert_eq!(accessor.destroy_by_id("0").await.unwrap(), 1);
        assert_eq!(accessor.destroy_by_id("0").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn destroy_absent_id_is_zero_not_an_error() {
        let (_store, accessor) = setup();
        assert_eq!(accessor.destroy_by_id("2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn destroy_rejects_empty_id() {
        let (_store, accessor) = setup();
        let err = accessor.destroy_by_id("").await.unwrap_err();
        assert!(matches!(err, AccessError::InvalidId(_)));
    }

    #[tokio::test]
    async fn destroy_by_membership_counts_removed_only() {
        let (_store, accessor) = setup();

        for (id, name) in [("0", "Charlie"), ("1", "Mary"), ("2", "David")] {
            accessor.create_with_id(id, &person(name, 24.0)).await.unwrap();
        }

        let first_two = json!({"id": {"inq": ["0", "1"]}});
        assert_eq!(accessor.destroy_by_where(Some(&first_two)).await.unwrap(), 2);
        assert_eq!(accessor.destroy_by_where(Some(&first_two)).await.unwrap(), 0);

        // One member saved, one already gone: only the removal counts.
        let mixed = json!({"id": {"inq": ["0", "2"]}});
        assert_eq!(accessor.destroy_by_where(Some(&mixed)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn destroy_everything_empties_the_namespace() {
        let store = Arc::new(InMemoryStore::new());
        let people = accessor_for(&store, person_schema());
        let orders = accessor_for(&store, ModelSchema::new("order").unwrap());

        for (id, name) in [("0", "Charlie"), ("1", "Mary"), ("2", "David")] {
            people.create_with_id(id, &person(name, 24.0)).await.unwrap();
        }
        orders
            .create_with_id("0", &Record::from([("total".to_string(), FieldValue::from(9.5))]))
            .await
            .unwrap();

        assert_eq!(people.destroy_by_where(None).await.unwrap(), 3);
        assert!(people.find_all().await.unwrap().is_empty());
        assert_eq!(people.destroy_by_where(None).await.unwrap(), 0);

        // Other namespaces are untouched.
        assert!(orders.exists_by_id("0").await.unwrap());
    }

    #[tokio::test]
    async fn destroy_with_unsupported_predicate_is_zero() {
        let (_store, accessor) = setup();

        accessor.create_with_id("0", &person("Charlie", 24.0)).await.unwrap();
        let unsupported = json!({"age": {"gt": 20}});
        assert_eq!(accessor.destroy_by_where(Some(&unsupported)).await.unwrap(), 0);
        assert!(accessor.exists_by_id("0").await.unwrap());
    }

    // -----------------------------------------------------------------------
    // Null round-trip through storage
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn nulled_field_reads_back_as_null() {
        let (_store, accessor) = setup();

        let record = Record::from([
            ("name".to_string(), FieldValue::from("Charlie")),
            ("age".to_string(), FieldValue::Null),
        ]);
        accessor.create_with_id("0", &record).await.unwrap();

        let found = accessor.find_by_id("0").await.unwrap();
        assert_eq!(found.get("age"), Some(&FieldValue::Null));
    }
}
