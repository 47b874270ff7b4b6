use anyhow::Context;
use async_trait::async_trait;
use futures::StreamExt;
use object_store::ObjectStore as ObjectClient;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use shared_types::{ObjectAddress, StoreResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::ObjectStore;
use crate::address::object_path;
use crate::config::{StorageConfig, TransferOptions};
use crate::error::{Result, StorageError};
use crate::stream::ByteStream;
use crate::upload::upload;

/// [`ObjectStore`] over any `object_store` client.
///
/// The client is fixed at construction and shared by every call. Containers
/// are the first path segment below the client's root.
pub struct ObjectStoreBackend {
    client: Arc<dyn ObjectClient>,
    local_root: Option<PathBuf>,
    transfer: TransferOptions,
}

impl ObjectStoreBackend {
    /// Wrap an already configured client, e.g. a test double.
    pub fn new(client: Arc<dyn ObjectClient>) -> Self {
        Self {
            client,
            local_root: None,
            transfer: TransferOptions::default(),
        }
    }

    pub fn from_config(config: StorageConfig) -> anyhow::Result<Self> {
        let mut local_root = None;
        let client: Arc<dyn ObjectClient> = match config {
            StorageConfig::Memory => {
                info!("Initializing in-memory storage");
                Arc::new(InMemory::new())
            }
            StorageConfig::Local { path } => {
                info!("Initializing local storage at: {:?}", path);
                std::fs::create_dir_all(&path)
                    .with_context(|| format!("Failed to create storage directory {path:?}"))?;
                let client = LocalFileSystem::new_with_prefix(&path)?;
                local_root = Some(path);
                Arc::new(client)
            }
            StorageConfig::S3 {
                bucket,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
                allow_http,
            } => {
                info!("Initializing S3 storage in bucket: {}", bucket);
                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(bucket)
                    .with_allow_http(allow_http);
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                if let Some(access_key_id) = access_key_id {
                    builder = builder.with_access_key_id(access_key_id);
                }
                if let Some(secret_access_key) = secret_access_key {
                    builder = builder.with_secret_access_key(secret_access_key);
                }
                Arc::new(builder.build()?)
            }
            StorageConfig::Azure {
                account,
                container,
                access_key,
                endpoint,
                use_emulator,
            } => {
                info!(
                    "Initializing Azure storage in account {} container {}",
                    account, container
                );
                let mut builder = MicrosoftAzureBuilder::new()
                    .with_account(account)
                    .with_container_name(container)
                    .with_use_emulator(use_emulator);
                if let Some(access_key) = access_key {
                    builder = builder.with_access_key(access_key);
                }
                if let Some(endpoint) = endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                Arc::new(builder.build()?)
            }
        };

        Ok(Self {
            client,
            local_root,
            transfer: TransferOptions::default(),
        })
    }

    pub fn with_transfer_options(mut self, transfer: TransferOptions) -> anyhow::Result<Self> {
        transfer.validate()?;
        self.transfer = transfer;
        Ok(self)
    }

    pub fn transfer_options(&self) -> &TransferOptions {
        &self.transfer
    }

    /// Whether an object currently exists at `container/key`.
    ///
    /// Useful to verify a store that was cancelled part way through.
    #[instrument(skip(self))]
    pub async fn exists(&self, container: &str, key: &str) -> Result<bool> {
        let address = ObjectAddress::new(container, key);
        let Ok(path) = object_path(&address) else {
            return Ok(false);
        };
        if self.name_clash(&path).await.is_some() {
            return Ok(false);
        }
        self.head(&path, &address).await
    }

    async fn head(&self, path: &Path, address: &ObjectAddress) -> Result<bool> {
        match self.client.head(path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::unavailable(address, e)),
        }
    }

    /// On the local filesystem a key cannot be both an object and a prefix of
    /// other objects: `a` blocks `a/b` and `a/b` blocks `a`. Returns why
    /// `path` is unusable, or `None` if it is free or the backend is not local.
    async fn name_clash(&self, path: &Path) -> Option<String> {
        let root = self.local_root.as_ref()?;
        let parts: Vec<_> = path.parts().collect();
        let mut current = root.clone();

        for (i, part) in parts.iter().enumerate() {
            current.push(part.as_ref());
            let Ok(metadata) = tokio::fs::metadata(&current).await else {
                return None;
            };

            let is_last = i + 1 == parts.len();
            if !is_last && metadata.is_file() {
                let prefix: Vec<&str> = parts[..=i].iter().map(|part| part.as_ref()).collect();
                return Some(format!("{} is an object, not a prefix", prefix.join("/")));
            }
            if is_last && metadata.is_dir() {
                return Some(format!("{path} is a prefix of other objects"));
            }
        }
        None
    }

    /// Create the container if the backend needs it to exist before writing.
    /// Only the local filesystem does; elsewhere containers are key prefixes.
    async fn ensure_container(&self, address: &ObjectAddress) -> Result<()> {
        let Some(root) = &self.local_root else {
            return Ok(());
        };

        tokio::fs::create_dir_all(root.join(&address.container))
            .await
            .map_err(|e| StorageError::BackendUnavailable {
                address: address.to_path(),
                source: Box::new(e),
            })
    }
}

#[async_trait]
impl ObjectStore for ObjectStoreBackend {
    #[instrument(skip(self, data))]
    async fn store(&self, container: &str, key: &str, data: ByteStream) -> Result<StoreResult> {
        let address = ObjectAddress::new(container, key);
        info!("Attempting to store object {}", address);

        let path = object_path(&address).map_err(|reason| StorageError::WriteConflict {
            address: address.to_path(),
            reason,
        })?;

        if let Some(reason) = self.name_clash(&path).await {
            return Err(StorageError::WriteConflict {
                address: address.to_path(),
                reason,
            });
        }

        self.ensure_container(&address).await?;

        // Not atomic with the upload below: concurrent first writers can all
        // report a create.
        let was_update = self.head(&path, &address).await?;
        if was_update {
            info!("Updating existing object {}", address);
        }

        upload(self.client.as_ref(), &path, &address, data, &self.transfer).await?;

        info!("Stored object {}", address);
        Ok(StoreResult::new(&address, was_update))
    }

    #[instrument(skip(self))]
    async fn get(&self, container: &str, key: &str) -> Result<ByteStream> {
        let address = ObjectAddress::new(container, key);
        info!("Attempting to retrieve object {}", address);

        let path = object_path(&address).map_err(|reason| {
            debug!("Rejecting malformed address {}: {}", address, reason);
            StorageError::ObjectNotFound(address.to_path())
        })?;

        if let Some(reason) = self.name_clash(&path).await {
            debug!("No object at {}: {}", address, reason);
            return Err(StorageError::ObjectNotFound(address.to_path()));
        }

        let result = self
            .client
            .get(&path)
            .await
            .map_err(|e| StorageError::from_read(&address, e))?;

        let stream = result
            .into_stream()
            .map(move |chunk| chunk.map_err(|e| StorageError::aborted(&address, e)));
        Ok(stream.boxed())
    }

    #[instrument(skip(self))]
    async fn delete(&self, container: &str, key: &str) -> Result<bool> {
        let address = ObjectAddress::new(container, key);
        info!("Attempting to delete object {}", address);

        let Ok(path) = object_path(&address) else {
            info!("Nothing to delete at malformed address {}", address);
            return Ok(false);
        };

        if let Some(reason) = self.name_clash(&path).await {
            info!("Nothing to delete at {}: {}", address, reason);
            return Ok(false);
        }

        if !self.head(&path, &address).await? {
            info!("Nothing to delete at {}", address);
            return Ok(false);
        }

        match self.client.delete(&path).await {
            Ok(()) => {}
            // Removed by someone else between the check and the delete
            Err(object_store::Error::NotFound { .. }) => {
                info!("Nothing to delete at {}", address);
                return Ok(false);
            }
            Err(e) => return Err(StorageError::unavailable(&address, e)),
        }

        info!("Deleted object {}", address);
        Ok(true)
    }
}
