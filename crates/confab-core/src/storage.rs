//! Durable key-value storage port.
//!
//! Defines the interface the conversation store persists through.

use crate::error::Result;

/// An abstract key-value store for durable persistence.
///
/// This trait defines the contract for the durable storage collaborator,
/// decoupling the conversation store from the specific mechanism (a file per
/// key, an in-memory map, a browser-style storage area).
///
/// Calls are synchronous: the store persists before control returns to the
/// presentation layer, so implementations must not queue or debounce writes.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: a value is stored under the key
    /// - `Ok(None)`: nothing stored under the key
    /// - `Err(_)`: the storage layer failed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage layer fails (e.g. quota exceeded,
    /// unwritable directory). Callers decide whether the failure is fatal;
    /// the conversation store treats it as a logged degradation.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
