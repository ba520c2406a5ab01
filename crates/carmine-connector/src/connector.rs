use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use carmine_accessor::Accessor;
use carmine_lock::Lease;
use carmine_store::StoreCommands;
use carmine_types::{ModelSchema, Record};

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};

/// The host object tying the stack together.
///
/// Owns the shared store handle and the model registry; builds a per-model
/// [`Accessor`] for each operation. Accessors are cheap (a schema clone and
/// two `Arc` bumps), so nothing is cached between calls.
pub struct Connector {
    store: Arc<dyn StoreCommands>,
    config: ConnectorConfig,
    models: RwLock<HashMap<String, ModelSchema>>,
}

impl Connector {
    /// Create a connector with the default configuration.
    pub fn new(store: Arc<dyn StoreCommands>) -> Self {
        Self::with_config(store, ConnectorConfig::default())
    }

    /// Create a connector with an explicit configuration.
    pub fn with_config(store: Arc<dyn StoreCommands>, config: ConnectorConfig) -> Self {
        Self {
            store,
            config,
            models: RwLock::new(HashMap::new()),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Register a model schema, replacing any prior definition of the name.
    pub fn define_model(&self, schema: ModelSchema) {
        debug!(model = schema.name(), "model defined");
        self.models
            .write()
            .expect("lock poisoned")
            .insert(schema.name().to_string(), schema);
    }

    /// Build the accessor for a registered model.
    pub fn accessor(&self, model: &str) -> ConnectorResult<Accessor> {
        let schema = self
            .models
            .read()
            .expect("lock poisoned")
            .get(model)
            .cloned()
            .ok_or_else(|| ConnectorError::UnknownModel {
                model: model.to_string(),
            })?;
        Ok(Accessor::new(Arc::clone(&self.store), schema)
            .with_lock_ttl(self.config.lock_ttl)
            .with_id_strategy(self.config.id_strategy))
    }

    /// Acquire the create-path lease for a record directly.
    ///
    /// The one entry point where lock contention surfaces as a lock error
    /// instead of a conflict.
    pub async fn lock_by_id(
        &self,
        model: &str,
        id: &str,
        ttl: Option<Duration>,
    ) -> ConnectorResult<Lease> {
        Ok(self.accessor(model)?.lock_by_id(id, ttl).await?)
    }

    // -- Upstream persistence surface ---------------------------------------

    /// Create a record with a generated id. Returns the id and the record
    /// as stored.
    pub async fn create(&self, model: &str, record: &Record) -> ConnectorResult<(String, Record)> {
        Ok(self.accessor(model)?.create(record).await?)
    }

    /// Create a record at an explicit id; fails on a duplicate.
    pub async fn create_with_id(
        &self,
        model: &str,
        id: &str,
        record: &Record,
    ) -> ConnectorResult<Record> {
        Ok(self.accessor(model)?.create_with_id(id, record).await?)
    }

    /// Update-or-create: unconditional full overwrite at the id.
    pub async fn save(&self, model: &str, id: &str, record: &Record) -> ConnectorResult<Record> {
        Ok(self.accessor(model)?.put(id, record).await?)
    }

    /// Returns `true` iff a record exists at the id.
    pub async fn exists(&self, model: &str, id: &str) -> ConnectorResult<bool> {
        Ok(self.accessor(model)?.exists_by_id(id).await?)
    }

    /// Read one record; fails when absent.
    pub async fn find_by_id(&self, model: &str, id: &str) -> ConnectorResult<Record> {
        Ok(self.accessor(model)?.find_by_id(id).await?)
    }

    /// Read the records a predicate restricts to; `None` reads everything.
    pub async fn find(
        &self,
        model: &str,
        where_clause: Option<&Value>,
    ) -> ConnectorResult<Vec<(String, Record)>> {
        Ok(self.accessor(model)?.find_by_where(where_clause).await?)
    }

    /// Delete one record; idempotent, returns the affected count.
    pub async fn destroy_by_id(&self, model: &str, id: &str) -> ConnectorResult<u64> {
        Ok(self.accessor(model)?.destroy_by_id(id).await?)
    }

    /// Delete the records a predicate restricts to; `None` empties the
    /// model's namespace. Returns the affected count.
    pub async fn destroy_all(
        &self,
        model: &str,
        where_clause: Option<&Value>,
    ) -> ConnectorResult<u64> {
        Ok(self.accessor(model)?.destroy_by_where(where_clause).await?)
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let model_count = self.models.read().expect("lock poisoned").len();
        f.debug_struct("Connector")
            .field("config", &self.config)
            .field("model_count", &model_count)
            .finish_non_exhaustive()
    }
}
