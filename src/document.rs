//! The theme's responsive image layout document.
//!
//! A theme ships `<theme>.responsive_image_layouts.yml` in its directory.
//! The file maps layout → section layout → image style slot → responsive
//! image style, with one reserved top-level `fallback` entry:
//!
//! ```yaml
//! fallback:
//!   one_column: full
//!
//! one_column:
//!   full:
//!     hero: hero_wide
//!     teaser: teaser_large
//!
//! two_column:
//!   halves:
//!     teaser: [teaser_half, teaser_half]
//!   narrow_wide:
//!     teaser: [teaser_third, teaser_two_thirds]
//! ```
//!
//! A cell holds either a single style, or a sequence with one style per zone
//! (column) of the section layout. The shape is decided once here, when the
//! YAML tree is lowered into [`StyleConfigDocument`]; lookups never inspect
//! raw YAML.
//!
//! ## Lowering
//!
//! The file is untrusted theme input. Only the top level is checked strictly:
//! it must be a mapping (or empty). Below that, entries that don't fit the
//! expected shape are skipped with a warning and behave as missing keys.
//! Scalar keys and values (numbers, booleans) are converted to strings, so
//! a section named `2:` is looked up as `"2"`.

use serde_yaml::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Reserved top-level key naming the default layout pair.
pub const FALLBACK_KEY: &str = "fallback";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("expected a mapping at the top level, found {0}")]
    NotAMapping(&'static str),
}

/// Why the fallback pair could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackError {
    /// No `fallback` entry, or one without a usable `layout: section` pair.
    Missing,
    /// More than one candidate layout; no way to tell which one wins.
    Ambiguous(Vec<String>),
}

/// A configured style cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleCell {
    /// One style for every zone.
    Scalar(String),
    /// One style per zone, in zone order.
    Sequence(Vec<String>),
}

/// Image style slot → cell.
pub type Section = BTreeMap<String, StyleCell>;

/// Section layout → its slots.
pub type Layout = BTreeMap<String, Section>;

/// Parsed layout document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleConfigDocument {
    layouts: BTreeMap<String, Layout>,
    /// Every entry of the `fallback` mapping; `None` values are entries
    /// whose section layout is not a scalar.
    fallback: Option<Vec<(String, Option<String>)>>,
}

impl StyleConfigDocument {
    /// Parse raw file bytes.
    ///
    /// Empty files and files holding only comments produce an empty document.
    pub fn parse(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        if is_blank(text) {
            return Ok(Self::default());
        }
        let mut value: Value = serde_yaml::from_str(text)?;
        value.apply_merge()?;
        Self::from_value(value)
    }

    /// Lower a parsed YAML tree.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let root = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(m) => m,
            other => return Err(DocumentError::NotAMapping(kind_name(&other))),
        };

        let mut doc = Self::default();
        for (key, value) in root {
            let Some(key) = scalar_string(&key) else {
                tracing::warn!("skipping non-scalar top-level key");
                continue;
            };
            if key == FALLBACK_KEY {
                doc.fallback = Some(lower_fallback(value));
                continue;
            }
            match value {
                Value::Mapping(sections) => {
                    doc.layouts.insert(key.clone(), lower_layout(&key, sections));
                }
                other => tracing::warn!(
                    layout = %key,
                    found = kind_name(&other),
                    "skipping layout that is not a mapping"
                ),
            }
        }
        Ok(doc)
    }

    /// Probe `layout → section_layout → image_style`, stopping at the first miss.
    pub fn lookup(&self, layout: &str, section_layout: &str, image_style: &str) -> Option<&StyleCell> {
        self.layouts.get(layout)?.get(section_layout)?.get(image_style)
    }

    /// The single `(layout, section_layout)` pair from the `fallback` entry.
    pub fn fallback(&self) -> Result<(&str, &str), FallbackError> {
        match self.fallback.as_deref() {
            None | Some([]) | Some([(_, None)]) => Err(FallbackError::Missing),
            Some([(layout, Some(section))]) => Ok((layout.as_str(), section.as_str())),
            Some(pairs) => Err(FallbackError::Ambiguous(
                pairs.iter().map(|(layout, _)| layout.clone()).collect(),
            )),
        }
    }

    /// All layouts, sorted by key.
    pub fn layouts(&self) -> &BTreeMap<String, Layout> {
        &self.layouts
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty() && self.fallback.is_none()
    }
}

fn lower_fallback(value: Value) -> Vec<(String, Option<String>)> {
    let entries = match value {
        Value::Mapping(entries) => entries,
        other => {
            tracing::warn!(found = kind_name(&other), "fallback is not a mapping");
            return Vec::new();
        }
    };
    entries
        .iter()
        .map(|(k, v)| {
            let layout = scalar_string(k).unwrap_or_else(|| kind_name(k).to_string());
            (layout, scalar_string(v))
        })
        .collect()
}

fn lower_layout(layout: &str, sections: serde_yaml::Mapping) -> Layout {
    let mut lowered = Layout::new();
    for (key, value) in sections {
        let Some(section) = scalar_string(&key) else {
            continue;
        };
        let slots = match value {
            Value::Mapping(slots) => slots,
            other => {
                tracing::warn!(
                    layout,
                    section = %section,
                    found = kind_name(&other),
                    "skipping section layout that is not a mapping"
                );
                continue;
            }
        };
        let mut cells = Section::new();
        for (slot, cell) in slots {
            let Some(slot) = scalar_string(&slot) else {
                continue;
            };
            match lower_cell(cell) {
                Some(cell) => {
                    cells.insert(slot, cell);
                }
                None => tracing::warn!(
                    layout,
                    section = %section,
                    slot = %slot,
                    "skipping image style with no usable value"
                ),
            }
        }
        lowered.insert(section, cells);
    }
    lowered
}

fn lower_cell(value: Value) -> Option<StyleCell> {
    match value {
        Value::Sequence(items) => Some(StyleCell::Sequence(
            // Keep positions stable: a bad item still occupies its zone.
            items.iter().map(|v| scalar_string(v).unwrap_or_default()).collect(),
        )),
        Value::Tagged(tagged) => lower_cell(tagged.value),
        other => scalar_string(&other).map(StyleCell::Scalar),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// True when the text holds nothing but whitespace and `#` comments.
fn is_blank(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| line.is_empty() || line.starts_with('#'))
}
