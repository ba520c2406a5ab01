use std::time::Duration;

use serde::{Deserialize, Serialize};

use carmine_lock::DEFAULT_TTL;
use carmine_types::IdStrategy;

/// Deployment configuration for a connector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Time-to-live for create-path leases. A holder that crashes inside
    /// the critical section is reclaimed after this long.
    pub lock_ttl: Duration,
    /// Id assignment for creates without an explicit id. Pick one per
    /// deployment; sequential and random ids must not be mixed.
    pub id_strategy: IdStrategy,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            lock_ttl: DEFAULT_TTL,
            id_strategy: IdStrategy::Random,
        }
    }
}
