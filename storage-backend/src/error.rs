use shared_types::ObjectAddress;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Write conflict on {address}: {reason}")]
    WriteConflict { address: String, reason: String },

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Backend unavailable for {address}: {source}")]
    BackendUnavailable {
        address: String,
        #[source]
        source: BoxError,
    },

    #[error("Stream aborted for {address}: {reason}")]
    StreamAborted { address: String, reason: String },
}

/// The kind of a [`StorageError`], for callers that only need to branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    WriteConflict,
    ObjectNotFound,
    BackendUnavailable,
    StreamAborted,
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::WriteConflict { .. } => ErrorKind::WriteConflict,
            StorageError::ObjectNotFound(_) => ErrorKind::ObjectNotFound,
            StorageError::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
            StorageError::StreamAborted { .. } => ErrorKind::StreamAborted,
        }
    }

    /// The `container/key` the failing operation was addressing
    pub fn address(&self) -> &str {
        match self {
            StorageError::WriteConflict { address, .. }
            | StorageError::BackendUnavailable { address, .. }
            | StorageError::StreamAborted { address, .. } => address,
            StorageError::ObjectNotFound(address) => address,
        }
    }

    pub(crate) fn unavailable(address: &ObjectAddress, err: object_store::Error) -> Self {
        StorageError::BackendUnavailable {
            address: address.to_path(),
            source: Box::new(err),
        }
    }

    pub(crate) fn aborted(address: &ObjectAddress, reason: impl ToString) -> Self {
        StorageError::StreamAborted {
            address: address.to_path(),
            reason: reason.to_string(),
        }
    }

    /// Map a provider error raised while reading or probing an object
    pub(crate) fn from_read(address: &ObjectAddress, err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { .. } => {
                StorageError::ObjectNotFound(address.to_path())
            }
            other => Self::unavailable(address, other),
        }
    }

    /// Map a provider error raised while writing an object
    pub(crate) fn from_write(address: &ObjectAddress, err: object_store::Error) -> Self {
        match err {
            object_store::Error::AlreadyExists { .. }
            | object_store::Error::Precondition { .. }
            | object_store::Error::InvalidPath { .. }
            | object_store::Error::NotSupported { .. }
            | object_store::Error::NotImplemented { .. } => StorageError::WriteConflict {
                address: address.to_path(),
                reason: err.to_string(),
            },
            other => Self::unavailable(address, other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ObjectAddress {
        ObjectAddress::new("images", "cat.png")
    }

    fn generic(message: &str) -> object_store::Error {
        object_store::Error::Generic {
            store: "test",
            source: message.to_string().into(),
        }
    }

    #[test]
    fn test_read_not_found_maps_to_object_not_found() {
        let err = object_store::Error::NotFound {
            path: "images/cat.png".to_string(),
            source: "missing".to_string().into(),
        };
        let mapped = StorageError::from_read(&address(), err);
        assert_eq!(mapped.kind(), ErrorKind::ObjectNotFound);
        assert_eq!(mapped.address(), "images/cat.png");
    }

    #[test]
    fn test_generic_failure_maps_to_backend_unavailable() {
        let mapped = StorageError::from_read(&address(), generic("connection reset"));
        assert_eq!(mapped.kind(), ErrorKind::BackendUnavailable);
        assert!(mapped.to_string().contains("connection reset"));
        assert!(std::error::Error::source(&mapped).is_some());

        let mapped = StorageError::from_write(&address(), generic("connection reset"));
        assert_eq!(mapped.kind(), ErrorKind::BackendUnavailable);
    }

    #[test]
    fn test_illegal_write_maps_to_write_conflict() {
        let err = object_store::Error::AlreadyExists {
            path: "images/cat.png".to_string(),
            source: "exists".to_string().into(),
        };
        let mapped = StorageError::from_write(&address(), err);
        assert_eq!(mapped.kind(), ErrorKind::WriteConflict);
        assert_eq!(mapped.address(), "images/cat.png");
    }
}
