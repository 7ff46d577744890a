//! PDF input sources.
//!
//! A [`PdfSource`] is consumed exactly once per conversion. Byte buffers and
//! readers belong to the caller until they are moved in; a
//! [`PdfSource::Path`] is opened, read and closed by the client itself.

use crate::error::Pdf2ImgError;
use bytes::Bytes;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// The readable PDF handed to [`crate::Pdf2ImgClient::convert`].
pub enum PdfSource {
    /// PDF already in memory.
    Bytes(Bytes),
    /// Any async reader, drained to its end when the request is built.
    Reader(Box<dyn AsyncRead + Send + Unpin>),
    /// Local file opened by the client.
    Path(PathBuf),
}

impl PdfSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        PdfSource::Path(path.into())
    }

    pub fn reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        PdfSource::Reader(Box::new(reader))
    }

    /// Read the whole source into memory.
    ///
    /// Fails with [`Pdf2ImgError::LocalFile`] when a path cannot be opened
    /// or read, and with [`Pdf2ImgError::SourceRead`] when a reader fails.
    pub async fn into_bytes(self) -> Result<Bytes, Pdf2ImgError> {
        match self {
            PdfSource::Bytes(b) => Ok(b),
            PdfSource::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .await
                    .map_err(Pdf2ImgError::SourceRead)?;
                Ok(Bytes::from(buf))
            }
            PdfSource::Path(path) => {
                let data = tokio::fs::read(&path)
                    .await
                    .map_err(|source| Pdf2ImgError::LocalFile {
                        path: path.clone(),
                        source,
                    })?;
                debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Bytes::from(data))
            }
        }
    }
}

impl fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfSource::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            PdfSource::Reader(_) => f.write_str("Reader(<dyn AsyncRead>)"),
            PdfSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
        }
    }
}

impl From<Bytes> for PdfSource {
    fn from(b: Bytes) -> Self {
        PdfSource::Bytes(b)
    }
}

impl From<Vec<u8>> for PdfSource {
    fn from(v: Vec<u8>) -> Self {
        PdfSource::Bytes(Bytes::from(v))
    }
}

impl From<&'static [u8]> for PdfSource {
    fn from(s: &'static [u8]) -> Self {
        PdfSource::Bytes(Bytes::from_static(s))
    }
}

impl From<tokio::fs::File> for PdfSource {
    fn from(f: tokio::fs::File) -> Self {
        PdfSource::reader(f)
    }
}

/// Open `path` for reading and wrap it as a [`PdfSource`].
///
/// The file handle is owned by the returned source and closed once the
/// conversion has read it.
pub async fn create_stream_from_file(path: impl AsRef<Path>) -> Result<PdfSource, Pdf2ImgError> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| Pdf2ImgError::LocalFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(PdfSource::from(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::io::Write;

    #[tokio::test]
    async fn bytes_source_is_returned_as_is() {
        let src = PdfSource::from(vec![1u8, 2, 3]);
        assert_eq!(&src.into_bytes().await.unwrap()[..], &[1, 2, 3]);
    }

    #[tokio::test]
    async fn reader_source_is_drained() {
        let src = PdfSource::reader(std::io::Cursor::new(b"%PDF-1.7".to_vec()));
        assert_eq!(&src.into_bytes().await.unwrap()[..], b"%PDF-1.7");
    }

    #[tokio::test]
    async fn missing_path_is_a_local_file_error() {
        let err = PdfSource::path("/definitely/not/here.pdf")
            .into_bytes()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LocalFile);
    }

    #[tokio::test]
    async fn create_stream_from_file_reads_contents() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.4 body").unwrap();
        let src = create_stream_from_file(tmp.path()).await.unwrap();
        assert!(matches!(src, PdfSource::Reader(_)));
        assert_eq!(&src.into_bytes().await.unwrap()[..], b"%PDF-1.4 body");
    }

    #[tokio::test]
    async fn create_stream_from_missing_file_fails() {
        let err = create_stream_from_file("/definitely/not/here.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2ImgError::LocalFile { .. }));
    }
}
