//! Rendering parameters sent with every conversion.
//!
//! [`ConvertOptions`] is a plain value object: the client never validates
//! its fields, the remote service does. It can be built with a struct
//! literal over [`Default`] or through [`ConvertOptions::builder()`].

use serde::{Deserialize, Serialize};

/// Parameters controlling a remote conversion.
///
/// # Example
/// ```rust
/// use pdf2img_client::ConvertOptions;
///
/// let options = ConvertOptions::builder()
///     .format("jpeg")
///     .density(72)
///     .height(300)
///     .width(300)
///     .build();
/// assert_eq!(options.page, 1);
/// assert_eq!(options.quality, 80);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Target image format (`webp`, `jpeg`, `png`, ...). Default: `webp`.
    pub format: String,

    /// 1-based page index to render. Default: 1.
    pub page: u32,

    /// Rendering density in DPI. Default: 300.
    pub density: u32,

    /// Maximum output height in pixels. Default: 1000.
    pub height: u32,

    /// Maximum output width in pixels. Default: 1000.
    pub width: u32,

    /// Background colour name or spec. Default: `white`.
    pub background: String,

    /// Encoder quality, 0–100. Default: 80.
    pub quality: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: "webp".to_string(),
            page: 1,
            density: 300,
            height: 1000,
            width: 1000,
            background: "white".to_string(),
            quality: 80,
        }
    }
}

impl ConvertOptions {
    /// Create a new builder for `ConvertOptions`.
    pub fn builder() -> ConvertOptionsBuilder {
        ConvertOptionsBuilder {
            options: Self::default(),
        }
    }

    /// The non-file form fields, in the order the service expects them.
    pub fn form_fields(&self) -> [(&'static str, String); 7] {
        [
            ("format", self.format.clone()),
            ("density", self.density.to_string()),
            ("height", self.height.to_string()),
            ("width", self.width.to_string()),
            ("background", self.background.clone()),
            ("quality", self.quality.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}

/// Builder for [`ConvertOptions`].
#[derive(Debug)]
pub struct ConvertOptionsBuilder {
    options: ConvertOptions,
}

impl ConvertOptionsBuilder {
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.options.format = format.into();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.options.page = page;
        self
    }

    pub fn density(mut self, density: u32) -> Self {
        self.options.density = density;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.options.height = height;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.options.width = width;
        self
    }

    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.options.background = background.into();
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.options.quality = quality;
        self
    }

    pub fn build(self) -> ConvertOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_defaults() {
        let o = ConvertOptions::default();
        assert_eq!(o.format, "webp");
        assert_eq!(o.page, 1);
        assert_eq!(o.density, 300);
        assert_eq!(o.height, 1000);
        assert_eq!(o.width, 1000);
        assert_eq!(o.background, "white");
        assert_eq!(o.quality, 80);
    }

    #[test]
    fn builder_and_literal_are_structurally_equal() {
        let built = ConvertOptions::builder()
            .format("jpeg")
            .density(72)
            .height(300)
            .width(300)
            .build();
        let literal = ConvertOptions {
            format: "jpeg".into(),
            density: 72,
            height: 300,
            width: 300,
            ..Default::default()
        };
        assert_eq!(built, literal);
    }

    #[test]
    fn form_fields_are_in_wire_order() {
        let o = ConvertOptions {
            format: "png".into(),
            page: 3,
            density: 150,
            height: 640,
            width: 480,
            background: "#ff0000".into(),
            quality: 0,
        };
        let fields = o.form_fields();
        let names: Vec<_> = fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            ["format", "density", "height", "width", "background", "quality", "page"]
        );
        let values: Vec<_> = fields.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, ["png", "150", "640", "480", "#ff0000", "0", "3"]);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let o: ConvertOptions = serde_json::from_str(r#"{"format":"jpeg","page":2}"#).unwrap();
        assert_eq!(o.format, "jpeg");
        assert_eq!(o.page, 2);
        assert_eq!(o.density, 300);
    }
}
