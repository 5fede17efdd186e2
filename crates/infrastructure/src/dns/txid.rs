//! Transaction id allocation.
//!
//! One registry is shared by every lookup in the process. Ids come from an
//! atomic counter seeded at random, and an id is only handed out if no other
//! query to the same server is currently using it.

use dashmap::DashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, LazyLock};

static GLOBAL_REGISTRY: LazyLock<Arc<TxidRegistry>> =
    LazyLock::new(|| Arc::new(TxidRegistry::new()));

/// The process-wide registry. Engines receive it explicitly; this is only
/// the default they are built with.
pub fn global() -> Arc<TxidRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

#[derive(Debug)]
pub struct TxidRegistry {
    next: AtomicU16,
    in_flight: DashSet<(SocketAddr, u16)>,
}

impl TxidRegistry {
    pub fn new() -> Self {
        Self::with_seed(fastrand::u16(..))
    }

    pub fn with_seed(seed: u16) -> Self {
        Self {
            next: AtomicU16::new(seed),
            in_flight: DashSet::new(),
        }
    }

    /// Reserves an id for a query to `server`. Returns `None` only when all
    /// 65536 ids are in flight to that server.
    pub fn allocate(self: &Arc<Self>, server: SocketAddr) -> Option<TxidGuard> {
        for _ in 0..=u16::MAX as u32 {
            let id = self.next.fetch_add(1, Ordering::Relaxed);
            if self.in_flight.insert((server, id)) {
                return Some(TxidGuard {
                    registry: Arc::clone(self),
                    server,
                    id,
                });
            }
        }
        None
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn release(&self, server: SocketAddr, id: u16) {
        self.in_flight.remove(&(server, id));
    }
}

impl Default for TxidRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// An id reserved for one outstanding query. Dropping the guard releases it,
/// so a late answer carrying this id no longer matches anything.
#[derive(Debug)]
pub struct TxidGuard {
    registry: Arc<TxidRegistry>,
    server: SocketAddr,
    id: u16,
}

impl TxidGuard {
    pub fn id(&self) -> u16 {
        self.id
    }
}

impl Drop for TxidGuard {
    fn drop(&mut self) {
        self.registry.release(self.server, self.id);
    }
}
