//! Unload-time flush into durable key-value storage
//!
//! Each buffered pair is written individually, in insertion order, with no
//! batching and no rollback. A write that fails mid-flush ends the flush:
//! earlier pairs stay persisted, later ones are not attempted. Unload must
//! never be aborted over it, so the failure is logged and swallowed.

use crate::state::Snapshot;

/// A single failed storage write
#[derive(Debug, thiserror::Error)]
#[error("storage write failed for key `{key}`: {reason}")]
pub struct StoreError {
    pub key: String,
    pub reason: String,
}

/// Write side of a durable string-to-string store
pub trait StateStore {
    /// Persist one pair, overwriting any prior value for the key
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Flush a point-in-time snapshot into a store.
///
/// Returns how many pairs were written. A partial flush (quota, etc.) is an
/// accepted degradation, reported at warn level only.
pub fn flush(snapshot: &Snapshot, store: &mut dyn StateStore) -> usize {
    for (written, (key, value)) in snapshot.iter().enumerate() {
        if let Err(err) = store.set(key, value) {
            log::warn!(
                "partial state flush, {written} of {} pairs persisted: {err}",
                snapshot.len()
            );
            return written;
        }
    }
    snapshot.len()
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn new(storage: web_sys::Storage) -> Self {
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl StateStore for LocalStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(|err| StoreError {
            key: key.to_owned(),
            reason: err
                .as_string()
                .unwrap_or_else(|| format!("{err:?}")),
        })
    }
}
