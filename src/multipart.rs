//! multipart/form-data encoding.
//!
//! The whole body is assembled in memory: the service needs the complete
//! PDF before it can render anything, and a single `Bytes` buffer lets the
//! transport set `Content-Length` instead of falling back to chunked upload.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Clone)]
struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// An ordered multipart/form-data body under construction.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// Start a form with a fresh random boundary.
    pub fn new() -> Self {
        Self::with_boundary(format!("pdf2img-{}", Uuid::new_v4().simple()))
    }

    /// Start a form with a fixed boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Append a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        });
        self
    }

    /// Append a plain text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.into(),
            filename: None,
            content_type: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    /// Part names in insertion order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Serialize the form.
    pub fn build(self) -> Bytes {
        let payload: usize = self.parts.iter().map(|p| p.data.len() + 128).sum();
        let mut buf = BytesMut::with_capacity(payload + self.boundary.len() + 8);

        for part in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(CRLF);

            buf.put_slice(b"Content-Disposition: form-data; name=\"");
            buf.put_slice(escape_quoted(&part.name).as_bytes());
            buf.put_slice(b"\"");
            if let Some(ref filename) = part.filename {
                buf.put_slice(b"; filename=\"");
                buf.put_slice(escape_quoted(filename).as_bytes());
                buf.put_slice(b"\"");
            }
            buf.put_slice(CRLF);

            if let Some(ref ct) = part.content_type {
                buf.put_slice(b"Content-Type: ");
                buf.put_slice(ct.as_bytes());
                buf.put_slice(CRLF);
            }
            buf.put_slice(CRLF);
            buf.put_slice(&part.data);
            buf.put_slice(CRLF);
        }

        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--");
        buf.put_slice(CRLF);
        buf.freeze()
    }
}

fn escape_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
