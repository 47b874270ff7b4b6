pub mod backend;
pub mod config;
pub mod error;
pub mod stream;

mod address;
mod upload;


use async_trait::async_trait;

pub use backend::ObjectStoreBackend;
pub use config::{StorageConfig, TransferOptions};
pub use error::{ErrorKind, Result, StorageError};
pub use shared_types::{ObjectAddress, StoreResult};
pub use stream::ByteStream;

/// Provider-agnostic blob storage.
///
/// Implementations hold no state between calls besides their backend
/// client, so every method may be called concurrently for any address.
/// Concurrent stores to the same address are last-write-wins.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create or overwrite the object at `container/key` with the bytes of
    /// `data`, creating the container first if the backend needs that.
    ///
    /// `data` is consumed incrementally and may be of unknown length.
    ///
    /// # Errors
    /// * `StorageError::WriteConflict` if the address is malformed or the
    ///   backend refuses the write
    /// * `StorageError::StreamAborted` if `data` yields an error
    /// * `StorageError::BackendUnavailable` on connectivity or auth failure
    ///
    /// If the returned future is dropped mid-upload the object may be left
    /// absent, at its old value, or at the new value. Check with a fresh
    /// `get` when that matters.
    async fn store(&self, container: &str, key: &str, data: ByteStream) -> Result<StoreResult>;

    /// Open the object at `container/key` for reading.
    ///
    /// Fails with `StorageError::ObjectNotFound` before returning a stream if
    /// there is no such object.
    async fn get(&self, container: &str, key: &str) -> Result<ByteStream>;

    /// Remove the object at `container/key`. Returns `false` when there was
    /// nothing to remove.
    async fn delete(&self, container: &str, key: &str) -> Result<bool>;
}
