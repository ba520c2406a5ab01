use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use carmine_store::StoreCommands;

use crate::error::{LockError, LockResult};

/// Default lease time-to-live.
pub const DEFAULT_TTL: Duration = Duration::from_millis(1000);

/// Acquires TTL-bound leases over resource keys in a shared store.
///
/// Acquisition is a single atomic set-if-absent attempt with a random owner
/// token — zero retries. Contention is a fast-fail signal, not a wait
/// condition.
pub struct LockManager {
    store: Arc<dyn StoreCommands>,
}

impl LockManager {
    /// Create a manager over the shared store handle.
    pub fn new(store: Arc<dyn StoreCommands>) -> Self {
        Self { store }
    }

    /// Attempt to acquire a lease on `resource`.
    ///
    /// Fails with [`LockError::Contended`] immediately if the resource is
    /// already held. On success the returned [`Lease`] must be released on
    /// every exit path of the critical section; if the holder crashes first,
    /// the TTL reclaims the key.
    pub async fn acquire(&self, resource: &str, ttl: Duration) -> LockResult<Lease> {
        let token = random_token();
        if !self.store.set_if_absent(resource, &token, ttl).await? {
            debug!(resource, "lease contended");
            return Err(LockError::Contended {
                resource: resource.to_string(),
            });
        }
        debug!(resource, ttl_ms = ttl.as_millis() as u64, "lease acquired");
        Ok(Lease {
            store: Arc::clone(&self.store),
            resource: resource.to_string(),
            token,
            released: false,
        })
    }
}

/// A 128-bit random owner token, hex-encoded.
fn random_token() -> String {
    let mut bytes = [0u8; 16];
    rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
    hex::encode(bytes)
}

/// A held lease. Scoped to the critical section it protects.
///
/// Release is owner-checked: if the lease expired and another holder
/// reacquired the resource, the delete is refused by the store and only
/// logged here — the completed critical section is not failed retroactively.
#[must_use = "a lease must be released when the critical section exits"]
pub struct Lease {
    store: Arc<dyn StoreCommands>,
    resource: String,
    token: String,
    released: bool,
}

impl Lease {
    /// The resource key this lease covers.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Release the lease. Never fails: ownership mismatches and store
    /// errors are reported through the log only.
    pub async fn release(mut self) {
        self.released = true;
        match self
            .store
            .delete_if_token_matches(&self.resource, &self.token)
            .await
        {
            Ok(true) => debug!(resource = %self.resource, "lease released"),
            Ok(false) => warn!(resource = %self.resource, "failed to unlock: ownership lost"),
            Err(e) => warn!(resource = %self.resource, error = %e, "failed to unlock"),
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if !self.released {
            // No async release from Drop; the TTL reclaims the key.
            warn!(resource = %self.resource, "lease dropped without release");
        }
    }
}

impl std::fmt::Debug for Lease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lease")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}
