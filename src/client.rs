//! The pdf2img HTTP client.
//!
//! [`Pdf2ImgClient`] turns a PDF plus [`ConvertOptions`] into a
//! `POST {base}/convert` multipart request and hands back the rendered image
//! as an [`ImageStream`]. It keeps no mutable state between calls: every
//! request gets its own boundary and body, so one client can be cloned and
//! shared across tasks freely.
//!
//! ## Failure policy
//!
//! [`Pdf2ImgClient::convert`] reports every failure as a
//! [`Pdf2ImgError`] and never retries. [`Pdf2ImgClient::check_service_health`]
//! is lossy: it folds every failure into `false`.

use crate::config::ClientConfig;
use crate::error::Pdf2ImgError;
use crate::multipart::MultipartForm;
use crate::options::ConvertOptions;
use crate::source::{self, PdfSource};
use crate::stream::{self as image_stream, ImageStream};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};
use bytes::Bytes;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Client for a pdf2img service.
///
/// # Example
/// ```rust,no_run
/// use pdf2img_client::{ConvertOptions, Pdf2ImgClient, PdfSource};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Pdf2ImgClient::new("http://localhost:3000")?;
/// let options = ConvertOptions::builder().format("jpeg").density(72).build();
/// let image = client.convert(PdfSource::path("document.pdf"), &options).await?;
/// image.save_to_file("page-1.jpg").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Pdf2ImgClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Pdf2ImgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pdf2ImgClient")
            .field("base_url", &self.base_url)
            .field("transport", &"<dyn Transport>")
            .finish()
    }
}

impl Pdf2ImgClient {
    /// Client using the default `reqwest` transport.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Pdf2ImgError> {
        Self::builder(base_url).build()
    }

    /// Client sending every request through `transport`.
    ///
    /// `base_url` is taken as-is. Use
    /// [`builder(..).transport(..)`](Pdf2ImgClientBuilder::transport) to get
    /// the same validation as [`new`](Self::new).
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// Client built from a [`ClientConfig`] with the default transport.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Pdf2ImgError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(config.base_url.clone(), Arc::new(transport)))
    }

    /// Client pointed at `PDF2IMG_BASE_URL` (or `http://localhost:3000`).
    pub fn from_env() -> Result<Self, Pdf2ImgError> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    /// Create a new builder for `Pdf2ImgClient`.
    pub fn builder(base_url: impl Into<String>) -> Pdf2ImgClientBuilder {
        Pdf2ImgClientBuilder {
            config: ClientConfig::builder(base_url),
            transport: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert a PDF into an image.
    ///
    /// `source` is consumed. A [`PdfSource::Path`] is read before anything is
    /// sent, so a missing file fails with [`Pdf2ImgError::LocalFile`] without
    /// touching the network.
    ///
    /// # Errors
    /// - [`Pdf2ImgError::LocalFile`] / [`Pdf2ImgError::SourceRead`]: the source could not be read
    /// - [`Pdf2ImgError::Request`]: the transport failed
    /// - [`Pdf2ImgError::Response`]: the service answered with a non-200 status
    pub async fn convert(
        &self,
        source: impl Into<PdfSource>,
        options: &ConvertOptions,
    ) -> Result<ImageStream, Pdf2ImgError> {
        let start = Instant::now();
        let pdf = source.into().into_bytes().await?;
        let pdf_len = pdf.len();

        let form = build_form(pdf, options);
        let content_type = form.content_type();
        let url = self.endpoint_uri("/convert");
        info!(
            "Converting {} bytes of PDF (page {}, {} @ {} dpi)",
            pdf_len, options.page, options.format, options.density
        );

        let request = HttpRequest::post(&url, form.build()).header("Content-Type", content_type);
        let response = self.transport.send(request).await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            Pdf2ImgError::Request(e)
        })?;

        if response.status != 200 {
            let status = response.status;
            let body = match response.bytes().await {
                Ok(b) => String::from_utf8_lossy(&b).into_owned(),
                Err(e) => format!("<unreadable body: {e}>"),
            };
            warn!("{} answered {}: {}", url, status, body);
            return Err(Pdf2ImgError::Response { status, body });
        }

        debug!("Conversion accepted after {}ms", start.elapsed().as_millis());
        Ok(ImageStream::new(response.body, options.format.clone()))
    }

    /// [`convert`](Self::convert) with default options.
    pub async fn convert_default(
        &self,
        source: impl Into<PdfSource>,
    ) -> Result<ImageStream, Pdf2ImgError> {
        self.convert(source, &ConvertOptions::default()).await
    }

    /// Convert the PDF at `path`.
    pub async fn convert_file(
        &self,
        path: impl AsRef<Path>,
        options: &ConvertOptions,
    ) -> Result<ImageStream, Pdf2ImgError> {
        self.convert(PdfSource::path(path.as_ref()), options).await
    }

    /// Convert the PDF at `input` and write the image to `output`.
    ///
    /// Returns the number of bytes written.
    pub async fn convert_to_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        options: &ConvertOptions,
    ) -> Result<u64, Pdf2ImgError> {
        let image = self.convert_file(input, options).await?;
        image_stream::save_stream_to_file(image, output).await
    }

    /// Open a local file as a conversion source.
    pub async fn create_stream_from_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<PdfSource, Pdf2ImgError> {
        source::create_stream_from_file(path).await
    }

    /// Copy a conversion result to a local file.
    pub async fn save_stream_to_file(
        &self,
        stream: ImageStream,
        path: impl AsRef<Path>,
    ) -> Result<u64, Pdf2ImgError> {
        image_stream::save_stream_to_file(stream, path).await
    }

    /// Whether the service reports itself as up.
    ///
    /// `true` only for HTTP 200 with a JSON object whose `status` is `"up"`.
    /// Every other outcome, including an unreachable host, is `false`; the
    /// reason is logged at debug level.
    pub async fn check_service_health(&self) -> bool {
        let url = self.endpoint_uri("/health");

        let response = match self.transport.send(HttpRequest::get(&url)).await {
            Ok(r) => r,
            Err(e) => {
                debug!("Health check {}: transport error: {}", url, e);
                return false;
            }
        };
        if response.status != 200 {
            debug!("Health check {}: status {}", url, response.status);
            return false;
        }
        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                debug!("Health check {}: unreadable body: {}", url, e);
                return false;
            }
        };
        let healthy = is_up(&body);
        if !healthy {
            debug!(
                "Health check {}: unexpected body {:?}",
                url,
                String::from_utf8_lossy(&body)
            );
        }
        healthy
    }

    /// Blocking [`convert`](Self::convert), returning the whole image.
    ///
    /// Creates a temporary tokio runtime internally.
    ///
    /// # Errors
    /// [`Pdf2ImgError::InvalidConfig`] when called from inside a tokio
    /// runtime, otherwise the same errors as [`convert`](Self::convert).
    pub fn convert_sync(
        &self,
        source: impl Into<PdfSource>,
        options: &ConvertOptions,
    ) -> Result<Bytes, Pdf2ImgError> {
        let source = source.into();
        blocking_runtime()?.block_on(async {
            self.convert(source, options).await?.into_bytes().await
        })
    }

    /// Blocking [`check_service_health`](Self::check_service_health).
    ///
    /// Returns `false` when called from inside a tokio runtime.
    pub fn check_service_health_sync(&self) -> bool {
        match blocking_runtime() {
            Ok(rt) => rt.block_on(self.check_service_health()),
            Err(e) => {
                debug!("Health check: {}", e);
                false
            }
        }
    }

    /// Absolute URI of `endpoint` under the base URL.
    pub fn endpoint_uri(&self, endpoint: &str) -> String {
        join_endpoint(&self.base_url, endpoint)
    }
}

/// Builder for [`Pdf2ImgClient`].
pub struct Pdf2ImgClientBuilder {
    config: crate::config::ClientConfigBuilder,
    transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for Pdf2ImgClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pdf2ImgClientBuilder")
            .field("config", &self.config)
            .field("transport", &self.transport.as_ref().map(|_| "<dyn Transport>"))
            .finish()
    }
}

impl Pdf2ImgClientBuilder {
    /// Whole-call timeout for the default transport.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config = self.config.user_agent(agent);
        self
    }

    /// Send requests through `transport` instead of the default one.
    /// Timeout and user agent are then the transport's concern.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<Pdf2ImgClient, Pdf2ImgError> {
        let config = self.config.build()?;
        match self.transport {
            Some(t) => Ok(Pdf2ImgClient::with_transport(config.base_url, t)),
            None => Pdf2ImgClient::from_config(&config),
        }
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn build_form(pdf: Bytes, options: &ConvertOptions) -> MultipartForm {
    let form = MultipartForm::new().file("file", "file.pdf", "application/pdf", pdf);
    options
        .form_fields()
        .into_iter()
        .fold(form, |form, (name, value)| form.text(name, value))
}

/// Join `base` and `endpoint` with exactly one `/`, trimming at most one
/// trailing slash from the base and one leading slash from the endpoint.
pub(crate) fn join_endpoint(base: &str, endpoint: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
    format!("{base}/{endpoint}")
}

fn is_up(body: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("status")?.as_str().map(|s| s == "up"))
        .unwrap_or(false)
}

fn blocking_runtime() -> Result<tokio::runtime::Runtime, Pdf2ImgError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(Pdf2ImgError::InvalidConfig(
            "blocking calls cannot run inside an async runtime; use the async methods".into(),
        ));
    }
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Pdf2ImgError::InvalidConfig(format!("Failed to create tokio runtime: {e}")))
}
