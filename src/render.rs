//! Render descriptions for responsive images.
//!
//! Once a style id is resolved, the rendering layer needs a record telling it
//! to run the responsive image formatter on an image with that style. This
//! module only shapes that record; it does no validation and cannot fail.
//!
//! Serialized with camelCase keys:
//!
//! ```json
//! {
//!   "kind": "responsive_image_formatter",
//!   "item": "images/dawn.jpg",
//!   "itemAttributes": { "class": "hero" },
//!   "responsiveImageStyleId": "hero_wide"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Renderer that consumes [`RenderDescription`]s.
pub const RESPONSIVE_IMAGE_FORMATTER: &str = "responsive_image_formatter";

/// HTML attributes passed through to the rendered image.
pub type Attributes = BTreeMap<String, String>;

/// Instructions for rendering one image with a responsive style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDescription<T> {
    pub kind: String,
    pub item: T,
    pub item_attributes: Attributes,
    pub responsive_image_style_id: String,
}

/// Build the render description for `image` with a resolved style id.
///
/// An empty style id is passed through as-is; the formatter renders the
/// image without responsive variants.
pub fn build_image_render_description<T>(
    image: T,
    style_id: impl Into<String>,
    attributes: Attributes,
) -> RenderDescription<T> {
    RenderDescription {
        kind: RESPONSIVE_IMAGE_FORMATTER.to_string(),
        item: image,
        item_attributes: attributes,
        responsive_image_style_id: style_id.into(),
    }
}

/// Parse `key=value` pairs into attributes. Later keys win; entries without
/// `=` become valueless attributes (`""`).
pub fn parse_attributes<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Attributes {
    pairs
        .into_iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.to_string()),
            None => (pair.trim().to_string(), String::new()),
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
