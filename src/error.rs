//! Error types for the pdf2img client.
//!
//! Every failure surfaces as a [`Pdf2ImgError`]. The variants carry the
//! context needed for diagnostics (the path that failed to open, the status
//! and body the service replied with, the chained transport error), while
//! [`Pdf2ImgError::kind`] collapses them into the flat [`ErrorKind`] tag for
//! callers that only need to branch on the failure class.
//!
//! Nothing here is retried internally. Retry policy belongs to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by a [`crate::transport::Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors returned by the pdf2img client.
#[derive(Debug, Error)]
pub enum Pdf2ImgError {
    // ── Local errors ──────────────────────────────────────────────────────
    /// A local file could not be opened. Raised before any network activity.
    #[error("Unable to open local file '{path}': {source}")]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The caller-supplied reader failed while the request body was built.
    #[error("Unable to read the PDF source: {0}")]
    SourceRead(#[source] std::io::Error),

    /// Copying the rendered image to disk failed partway.
    #[error("Failed to write output file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Network errors ────────────────────────────────────────────────────
    /// The request could not be sent or its body could not be received.
    #[error("An error occurred while sending the request to the PDF2IMG API: {0}")]
    Request(#[source] BoxError),

    /// The service answered with a status other than 200.
    #[error("The PDF2IMG API returned an error {status}: {body}")]
    Response { status: u16, body: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Client construction was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Flat classification of a [`Pdf2ImgError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A local path or reader could not be used. Never involves the network.
    LocalFile,
    /// Transport-level failure (connection, DNS, timeout, broken body).
    Request,
    /// The server replied with a non-200 status.
    Response,
    /// The output sink could not be written.
    Write,
    /// The client was misconfigured.
    Config,
}

impl Pdf2ImgError {
    /// Flat kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2ImgError::LocalFile { .. } | Pdf2ImgError::SourceRead(_) => ErrorKind::LocalFile,
            Pdf2ImgError::Request(_) => ErrorKind::Request,
            Pdf2ImgError::Response { .. } => ErrorKind::Response,
            Pdf2ImgError::WriteFailed { .. } => ErrorKind::Write,
            Pdf2ImgError::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    /// HTTP status of a [`Pdf2ImgError::Response`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Pdf2ImgError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn response_display_carries_status_and_body() {
        let e = Pdf2ImgError::Response {
            status: 422,
            body: "invalid page".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("422"), "got: {msg}");
        assert!(msg.contains("invalid page"), "got: {msg}");
        assert_eq!(e.status(), Some(422));
        assert_eq!(e.kind(), ErrorKind::Response);
    }

    #[test]
    fn local_file_display_names_path() {
        let e = Pdf2ImgError::LocalFile {
            path: PathBuf::from("/nope/file.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(e.to_string().contains("/nope/file.pdf"));
        assert_eq!(e.kind(), ErrorKind::LocalFile);
        assert_eq!(e.status(), None);
    }

    #[test]
    fn source_read_is_a_local_file_kind() {
        let e = Pdf2ImgError::SourceRead(std::io::Error::other("boom"));
        assert_eq!(e.kind(), ErrorKind::LocalFile);
    }

    #[test]
    fn request_chains_the_transport_error() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let e = Pdf2ImgError::Request(Box::new(inner));
        assert_eq!(e.kind(), ErrorKind::Request);
        let source = e.source().expect("request error keeps its source");
        assert_eq!(source.to_string(), "refused");
    }

    #[test]
    fn write_failed_kind() {
        let e = Pdf2ImgError::WriteFailed {
            path: PathBuf::from("out.webp"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(e.kind(), ErrorKind::Write);
        assert!(e.to_string().contains("disk full"));
    }
}
