//! Durable key-value storage for session continuity.
//!
//! `KeyValueStore` is the only way the session store touches persistent
//! state, so backends can be swapped freely:
//! - `FileStore`: a JSON file in the user's data directory
//! - `KeyringStore`: the OS keychain
//! - `MemoryStore`: process-local, for tests and throwaway sessions

pub mod file;
pub mod keychain;
pub mod memory;

use anyhow::Result;

pub use self::file::FileStore;
pub use self::keychain::KeyringStore;
pub use self::memory::MemoryStore;

/// String key-value storage that outlives the running client.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a key that isn't there is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
