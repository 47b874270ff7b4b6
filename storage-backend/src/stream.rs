//! Byte streams exchanged with an [`ObjectStore`](crate::ObjectStore).
//!
//! A [`ByteStream`] is lazy, forward-only and single-pass. Dropping it part
//! way through releases whatever transport resource is producing it.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};

use crate::error::Result;

pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// A stream yielding `data` as a single chunk
pub fn from_bytes(data: impl Into<Bytes>) -> ByteStream {
    stream::once(futures::future::ready(Ok(data.into()))).boxed()
}

/// A stream yielding each chunk in order
pub fn from_chunks<I>(chunks: I) -> ByteStream
where
    I: IntoIterator<Item = Bytes>,
    I::IntoIter: Send + 'static,
{
    stream::iter(chunks.into_iter().map(Ok)).boxed()
}

/// Drain a stream into one contiguous buffer.
///
/// Only meant for objects known to fit in memory.
pub async fn collect(mut stream: ByteStream) -> Result<Bytes> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer.freeze())
}
