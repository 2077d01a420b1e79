//! Snapshot board - one writer, many readers
//!
//! The tick loop is the only writer. Renderers and monitors may run on other
//! threads; they read whole [`SignalSnapshot`] values. The writer replaces
//! the stored value in one assignment under the lock, so a reader never sees
//! fields from two different ticks.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::SignalSnapshot;

#[derive(Clone, Copy, Debug)]
struct Published {
    version: u64,
    snapshot: SignalSnapshot,
}

/// Exclusive publishing side. Not `Clone`.
pub struct BoardWriter {
    inner: Arc<RwLock<Published>>,
    version: u64,
}

/// Cloneable reading side
#[derive(Clone)]
pub struct SignalBoard {
    inner: Arc<RwLock<Published>>,
}

impl SignalBoard {
    /// Create a board holding `initial` and its single writer
    pub fn channel(initial: SignalSnapshot) -> (BoardWriter, SignalBoard) {
        let inner = Arc::new(RwLock::new(Published {
            version: 0,
            snapshot: initial,
        }));
        let writer = BoardWriter {
            inner: Arc::clone(&inner),
            version: 0,
        };
        (writer, SignalBoard { inner })
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SignalSnapshot {
        self.inner.read().snapshot
    }

    /// Snapshot together with its publish counter.
    /// Readers polling per frame can skip redraws when the version is unchanged.
    pub fn versioned(&self) -> (u64, SignalSnapshot) {
        let published = *self.inner.read();
        (published.version, published.snapshot)
    }
}

impl BoardWriter {
    /// Replace the published snapshot
    pub fn publish(&mut self, snapshot: SignalSnapshot) {
        self.version += 1;
        *self.inner.write() = Published {
            version: self.version,
            snapshot,
        };
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of live reader handles
    pub fn readers(&self) -> usize {
        Arc::strong_count(&self.inner) - 1
    }
}
