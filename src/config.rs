//! Client configuration.
//!
//! [`ClientConfig`] carries everything the default transport needs besides
//! the per-call [`crate::ConvertOptions`]: where the service lives, how long
//! a call may take, and how the client identifies itself. It is built via
//! [`ClientConfig::builder()`] or read from the environment with
//! [`ClientConfig::from_env()`].

use crate::error::Pdf2ImgError;
use std::time::Duration;

/// Environment variable holding the service base URL.
pub const BASE_URL_ENV: &str = "PDF2IMG_BASE_URL";

/// Base URL used when [`BASE_URL_ENV`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration for a [`crate::Pdf2ImgClient`].
///
/// # Example
/// ```rust
/// use pdf2img_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder("http://localhost:3000/")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "http://localhost:3000/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:3000`. A trailing `/` is allowed.
    pub base_url: String,

    /// Whole-call timeout applied by the default transport. Default: 60 s.
    ///
    /// Rendering a dense page at 300 DPI can take several seconds on a busy
    /// service; the timeout covers connect, upload and download.
    pub timeout: Duration,

    /// `User-Agent` header sent by the default transport.
    /// Default: `pdf2img-client/<crate version>`.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self {
                base_url: base_url.into(),
                timeout: Duration::from_secs(60),
                user_agent: concat!("pdf2img-client/", env!("CARGO_PKG_VERSION")).to_string(),
            },
        }
    }

    /// Read the base URL from `PDF2IMG_BASE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`]. Other fields keep their defaults.
    pub fn from_env() -> Result<Self, Pdf2ImgError> {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::builder(base_url).build()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, Pdf2ImgError> {
        let c = &self.config;
        if c.base_url.trim().is_empty() {
            return Err(Pdf2ImgError::InvalidConfig(
                "base URL must not be empty".into(),
            ));
        }
        if c.timeout.is_zero() {
            return Err(Pdf2ImgError::InvalidConfig(
                "timeout must be greater than zero".into(),
            ));
        }
        Ok(self.config)
    }
}
