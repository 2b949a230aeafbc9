//! Authority → connection cache.
//!
//! One [`ConnectionHandle`] per authority, created lazily and kept until the
//! whole cache is closed. The map lock is held only for the lookup-or-insert
//! itself, never across a dial or a round trip.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use h3trip_proto::Authority;
use tracing::{debug, warn};

use crate::connection::{ConnectionFactory, ConnectionHandle};
use crate::error::{ClientError, Result};
use crate::options::TransportOptions;

pub struct ConnectionCache {
    factory: Arc<dyn ConnectionFactory>,
    options: Arc<TransportOptions>,
    clients: Mutex<HashMap<Authority, Arc<ConnectionHandle>>>,
}

impl ConnectionCache {
    pub fn new(factory: Arc<dyn ConnectionFactory>, options: Arc<TransportOptions>) -> Self {
        Self {
            factory,
            options,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Return the handle cached for `authority`, creating it when
    /// `allow_create` is set.
    ///
    /// A new handle is published immediately, before it is dialed, so
    /// concurrent lookups for the same authority converge on it. Existing
    /// entries are never replaced.
    pub fn get_or_create(
        &self,
        authority: &Authority,
        allow_create: bool,
    ) -> Result<Arc<ConnectionHandle>> {
        let mut clients = self.lock();

        if let Some(handle) = clients.get(authority) {
            debug!(%authority, "connection cache hit");
            return Ok(Arc::clone(handle));
        }

        if !allow_create {
            debug!(%authority, "connection cache miss, creation not allowed");
            return Err(ClientError::NoCachedConn);
        }

        let conn = self.factory.new_connection(authority, &self.options)?;
        let handle = Arc::new(ConnectionHandle::new(authority.clone(), conn));
        clients.insert(authority.clone(), Arc::clone(&handle));
        debug!(%authority, cached = clients.len(), "connection created");

        Ok(handle)
    }

    /// Close every cached connection and empty the cache.
    ///
    /// The map is drained under the lock and the handles are closed after it
    /// is released, so the cache accepts new connections immediately. Every
    /// handle is closed even if some fail; all failures are returned
    /// together.
    pub async fn close_all(&self) -> Result<()> {
        let drained: Vec<_> = self.lock().drain().collect();

        let mut failures = Vec::new();
        for (authority, handle) in drained {
            if let Err(e) = handle.close().await {
                warn!(%authority, error = %e, "failed to close connection");
                failures.push((authority, e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Close(failures))
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, authority: &Authority) -> bool {
        self.lock().contains_key(authority)
    }

    /// Authorities currently cached, sorted.
    pub fn authorities(&self) -> Vec<Authority> {
        let mut authorities: Vec<_> = self.lock().keys().cloned().collect();
        authorities.sort();
        authorities
    }

    // A panic while holding the lock cannot leave the map half-updated:
    // every mutation is a single insert or drain.
    fn lock(&self) -> MutexGuard<'_, HashMap<Authority, Arc<ConnectionHandle>>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
