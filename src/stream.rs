//! Rendered image streams.
//!
//! A successful conversion hands back an [`ImageStream`]: the response body
//! of the service, chunk by chunk. The caller owns it; dropping it releases
//! the underlying connection. The client never inspects the image bytes, so
//! the stream only remembers which `format` was requested.
//!
//! [`save_stream_to_file`] is the local-file sink. It writes to a uniquely
//! named temp file in the destination directory and renames it into place,
//! so an interrupted copy never leaves a truncated image behind.

use crate::error::Pdf2ImgError;
use crate::transport::ByteStream;
use bytes::{Bytes, BytesMut};
use futures::stream::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Body of a successful conversion.
pub struct ImageStream {
    inner: ByteStream,
    format: String,
}

impl ImageStream {
    pub(crate) fn new(inner: ByteStream, format: impl Into<String>) -> Self {
        Self {
            inner,
            format: format.into(),
        }
    }

    /// The image format that was requested for this conversion.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Collect the whole image into memory.
    pub async fn into_bytes(mut self) -> Result<Bytes, Pdf2ImgError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Copy the image to `path`. See [`save_stream_to_file`].
    pub async fn save_to_file(self, path: impl AsRef<Path>) -> Result<u64, Pdf2ImgError> {
        save_stream_to_file(self, path).await
    }

    /// Give up the typed wrapper and take the raw body stream.
    pub fn into_inner(self) -> ByteStream {
        self.inner
    }
}

impl Stream for ImageStream {
    type Item = Result<Bytes, Pdf2ImgError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner
            .poll_next_unpin(cx)
            .map(|item| item.map(|chunk| chunk.map_err(Pdf2ImgError::Request)))
    }
}

impl std::fmt::Debug for ImageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStream")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Write every chunk of `stream` to `path`, returning the byte count.
///
/// # Errors
/// - [`Pdf2ImgError::LocalFile`] if the output (or its directory) cannot be created.
/// - [`Pdf2ImgError::WriteFailed`] if writing or renaming fails partway.
/// - [`Pdf2ImgError::Request`] if the body breaks mid-download.
///
/// In every error case the destination is left untouched.
pub async fn save_stream_to_file(
    mut stream: ImageStream,
    path: impl AsRef<Path>,
) -> Result<u64, Pdf2ImgError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| Pdf2ImgError::LocalFile {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let tmp = tempfile::Builder::new()
        .prefix(".pdf2img-")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(|source| Pdf2ImgError::LocalFile {
            path: dir.clone(),
            source,
        })?;
    // The temp path deletes itself on drop until it is persisted.
    let (std_file, tmp_path) = tmp.into_parts();
    let mut file = tokio::fs::File::from_std(std_file);

    let mut written = 0u64;
    let copied: Result<(), Pdf2ImgError> = async {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|source| Pdf2ImgError::WriteFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|source| Pdf2ImgError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })
    }
    .await;
    drop(file);

    if let Err(e) = copied {
        warn!("Discarding partial output {}: {}", tmp_path.display(), e);
        return Err(e);
    }

    tmp_path
        .persist(path)
        .map_err(|e| Pdf2ImgError::WriteFailed {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    debug!("Saved {} bytes to {}", written, path.display());
    Ok(written)
}
