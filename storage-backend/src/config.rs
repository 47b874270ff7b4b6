use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StorageConfig {
    /// Process-local store, contents are lost on drop
    Memory,
    Local {
        path: PathBuf,
    },
    S3 {
        bucket: String,
        region: Option<String>,
        endpoint: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        allow_http: bool,
    },
    Azure {
        account: String,
        container: String,
        access_key: Option<String>,
        endpoint: Option<String>,
        use_emulator: bool,
    },
}

impl StorageConfig {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    pub fn s3(
        bucket: impl Into<String>,
        region: Option<String>,
        endpoint: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        allow_http: bool,
    ) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            region,
            endpoint,
            access_key_id,
            secret_access_key,
            allow_http,
        }
    }

    pub fn azure(
        account: impl Into<String>,
        container: impl Into<String>,
        access_key: Option<String>,
        endpoint: Option<String>,
        use_emulator: bool,
    ) -> Self {
        Self::Azure {
            account: account.into(),
            container: container.into(),
            access_key,
            endpoint,
            use_emulator,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".to_string());

        match backend.as_str() {
            "memory" => Ok(Self::Memory),
            "local" => {
                let path = std::env::var("STORAGE_PATH").unwrap_or_else(|_| "./data".to_string());
                Ok(Self::local(path))
            }
            "s3" => {
                let bucket = std::env::var("AWS_BUCKET")
                    .map_err(|_| anyhow::anyhow!("AWS_BUCKET is required for S3 backend"))?;

                Ok(Self::s3(
                    bucket,
                    std::env::var("AWS_REGION").ok(),
                    std::env::var("AWS_ENDPOINT").ok(),
                    std::env::var("AWS_ACCESS_KEY_ID").ok(),
                    std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
                    env_flag("AWS_ALLOW_HTTP"),
                ))
            }
            "azure" => {
                let account = std::env::var("AZURE_STORAGE_ACCOUNT").map_err(|_| {
                    anyhow::anyhow!("AZURE_STORAGE_ACCOUNT is required for Azure backend")
                })?;
                let container = std::env::var("AZURE_CONTAINER")
                    .map_err(|_| anyhow::anyhow!("AZURE_CONTAINER is required for Azure backend"))?;

                Ok(Self::azure(
                    account,
                    container,
                    std::env::var("AZURE_STORAGE_ACCESS_KEY").ok(),
                    std::env::var("AZURE_ENDPOINT").ok(),
                    env_flag("AZURE_USE_EMULATOR"),
                ))
            }
            _ => bail!(
                "Unknown storage backend: {}. Must be 'memory', 'local', 's3' or 'azure'",
                backend
            ),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false)
}

fn env_size(name: &str, default: usize) -> anyhow::Result<usize> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<usize>()
            .with_context(|| format!("{name} must be a non-negative integer, got {value:?}")),
        Err(_) => Ok(default),
    }
}

/// Tuning for uploads. None of these affect what is stored, only how the
/// bytes travel to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferOptions {
    /// Size in bytes of each part of a multipart upload. S3 rejects parts
    /// under 5 MiB other than the last one.
    pub block_size: usize,

    /// Maximum number of parts in flight at once.
    pub max_concurrency: usize,

    /// Uploads no larger than this are sent as a single request instead of a
    /// multipart upload.
    pub max_single_upload_size: usize,
}

impl TransferOptions {
    pub const DEFAULT_BLOCK_SIZE: usize = 5 * 1024 * 1024;
    pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
    pub const DEFAULT_MAX_SINGLE_UPLOAD_SIZE: usize = 8 * 1024 * 1024;

    pub fn from_env() -> anyhow::Result<Self> {
        let options = Self {
            block_size: env_size("STORAGE_BLOCK_SIZE", Self::DEFAULT_BLOCK_SIZE)?,
            max_concurrency: env_size("STORAGE_MAX_CONCURRENCY", Self::DEFAULT_MAX_CONCURRENCY)?,
            max_single_upload_size: env_size(
                "STORAGE_MAX_SINGLE_UPLOAD_SIZE",
                Self::DEFAULT_MAX_SINGLE_UPLOAD_SIZE,
            )?,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.block_size == 0 {
            bail!("block_size must be greater than zero");
        }
        if self.max_concurrency == 0 {
            bail!("max_concurrency must be greater than zero");
        }
        if self.max_single_upload_size == 0 {
            bail!("max_single_upload_size must be greater than zero");
        }
        Ok(())
    }
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            block_size: Self::DEFAULT_BLOCK_SIZE,
            max_concurrency: Self::DEFAULT_MAX_CONCURRENCY,
            max_single_upload_size: Self::DEFAULT_MAX_SINGLE_UPLOAD_SIZE,
        }
    }
}
