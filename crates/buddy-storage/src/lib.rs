mod error;
mod kv;
mod storage;

pub use error::StorageError;
pub use kv::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use storage::{Collection, CorruptionHook, DiscardedValue, Storage, StorageKeys};
