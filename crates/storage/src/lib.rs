//! Persistent key-value storage and the authentication-token slot built on it.
//! - `KeyValueStore` is the injectable seam; callers hold `Arc<dyn KeyValueStore>`.
//! - `JsonFileStore` persists to disk, `MemoryStore` lives only in-process.

pub mod errors;
pub mod kv_store;
pub mod json_file_store;
pub mod memory_store;
pub mod token;

pub use errors::StorageError;
pub use json_file_store::JsonFileStore;
pub use kv_store::KeyValueStore;
pub use memory_store::MemoryStore;
pub use token::TokenStore;
