use futures::StreamExt;
use object_store::path::Path;
use object_store::{ObjectStore as ObjectClient, PutPayload, WriteMultipart};
use shared_types::ObjectAddress;
use tracing::{debug, warn};

use crate::config::TransferOptions;
use crate::error::{Result, StorageError};
use crate::stream::ByteStream;

/// Stream `data` to `path`, overwriting whatever is there.
///
/// Small payloads go out as one request. Once more than
/// `max_single_upload_size` bytes have been buffered the upload switches to
/// multipart with at most `max_concurrency` parts in flight.
pub(crate) async fn upload(
    client: &dyn ObjectClient,
    path: &Path,
    address: &ObjectAddress,
    mut data: ByteStream,
    options: &TransferOptions,
) -> Result<()> {
    let mut pending = Vec::new();
    let mut buffered = 0usize;

    while buffered <= options.max_single_upload_size {
        match data.next().await {
            Some(Ok(chunk)) => {
                buffered += chunk.len();
                pending.push(chunk);
            }
            Some(Err(e)) => {
                warn!("Input stream for {} failed before upload: {}", address, e);
                return Err(StorageError::aborted(address, e));
            }
            None => {
                debug!("Uploading {} bytes to {} in a single request", buffered, address);
                let payload: PutPayload = pending.into_iter().collect();
                client
                    .put(path, payload)
                    .await
                    .map_err(|e| StorageError::from_write(address, e))?;
                return Ok(());
            }
        }
    }

    debug!(
        "Uploading {} in blocks of {} bytes, {} in flight",
        address, options.block_size, options.max_concurrency
    );
    let multipart = client
        .put_multipart(path)
        .await
        .map_err(|e| StorageError::from_write(address, e))?;
    let mut writer = WriteMultipart::new_with_chunk_size(multipart, options.block_size);
    let mut chunks = futures::stream::iter(pending.into_iter().map(Ok)).chain(data);

    while let Some(chunk) = chunks.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!("Input stream for {} failed mid-upload: {}", address, e);
                abort(writer, address).await;
                return Err(StorageError::aborted(address, e));
            }
        };

        if let Err(e) = writer.wait_for_capacity(options.max_concurrency).await {
            abort(writer, address).await;
            return Err(StorageError::from_write(address, e));
        }
        writer.write(&chunk);
    }

    writer
        .finish()
        .await
        .map_err(|e| StorageError::from_write(address, e))?;
    Ok(())
}

async fn abort(writer: WriteMultipart, address: &ObjectAddress) {
    if let Err(e) = writer.abort().await {
        warn!("Failed to abort multipart upload for {}: {}", address, e);
    }
}
