//! # pdf2img-client
//!
//! Client for the [pdf2img](https://github.com/codeinchq/pdf2img) service:
//! send a PDF, get back a rendered page as an image.
//!
//! No PDF or image processing happens in this crate. It builds the
//! multipart request, talks HTTP, checks the reply and hands the image bytes
//! back as a stream.
//!
//! ## Request Flow
//!
//! ```text
//! PdfSource ──▶ multipart body ──▶ Transport ──▶ status check ──▶ ImageStream
//! (bytes/reader/path)  (file + 7 fields)  (reqwest)   (200 or error)    (caller owns)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2img_client::{ConvertOptions, Pdf2ImgClient, PdfSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Base URL from PDF2IMG_BASE_URL, or http://localhost:3000
//!     let client = Pdf2ImgClient::from_env()?;
//!     if !client.check_service_health().await {
//!         eprintln!("pdf2img is down");
//!         return Ok(());
//!     }
//!
//!     let options = ConvertOptions::builder().format("jpeg").quality(90).build();
//!     let image = client.convert(PdfSource::path("document.pdf"), &options).await?;
//!     let written = image.save_to_file("page-1.jpg").await?;
//!     eprintln!("wrote {written} bytes");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2img-client = { version = "0.3", default-features = false }
//! ```
//!
//! ## Custom transports
//!
//! Implement [`Transport`] to route requests through your own HTTP stack
//! (middleware, proxies, test doubles) and pass it to
//! [`Pdf2ImgClient::with_transport`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod multipart;
pub mod options;
pub mod source;
pub mod stream;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{Pdf2ImgClient, Pdf2ImgClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{BoxError, ErrorKind, Pdf2ImgError};
pub use options::{ConvertOptions, ConvertOptionsBuilder};
pub use source::{create_stream_from_file, PdfSource};
pub use stream::{save_stream_to_file, ImageStream};
pub use transport::{ByteStream, HttpRequest, HttpResponse, ReqwestTransport, Transport};
