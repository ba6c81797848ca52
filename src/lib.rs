//! # Layout Styles
//!
//! Picks the responsive image style for an image from where it sits on the
//! page. A theme describes its page structure in a YAML file, mapping each
//! layout / section layout / image slot to a named responsive image style;
//! this crate looks placements up in that file.
//!
//! ```text
//! resolve("two_column", "narrow_wide", "teaser", zone2)
//!   → themes/northwind/northwind.responsive_image_layouts.yml
//!   → two_column.narrow_wide.teaser = [teaser_third, teaser_two_thirds]
//!   → "teaser_two_thirds"
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | `StyleResolver`: fallback, lookup, zone selection, diagnostics |
//! | [`document`] | Typed layout document lowered from YAML |
//! | [`zone`] | `zoneN` designator parser |
//! | [`theme`] | Active theme and file access (`ThemeConfigSource`) |
//! | [`render`] | Render description record for the responsive image formatter |
//! | [`config`] | `layout-styles.toml` host config loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Cache
//!
//! The layout file is read and parsed on every call. Theme authors edit it
//! while pages render, and a single small YAML file is cheap to parse. Hosts
//! that need more can cache above the resolver.
//!
//! ## Injected Collaborators
//!
//! The resolver never discovers the theme or reads files on its own. A
//! [`theme::ThemeConfigSource`] supplies both, and a
//! [`resolve::NotificationSink`] receives diagnostics. The bundled CLI wires
//! in the filesystem and stderr; tests wire in memory.
//!
//! ## Empty String Means No Match
//!
//! A placement missing from the file resolves to `""`, never an error. The
//! rendering layer treats an empty style as "render without responsive
//! variants". Only a broken file or a missing fallback is an error.

pub mod config;
pub mod document;
pub mod output;
pub mod render;
pub mod resolve;
pub mod theme;
pub mod zone;

pub use document::{StyleCell, StyleConfigDocument};
pub use render::{RenderDescription, build_image_render_description};
pub use resolve::{NotificationSink, Placement, ResolveError, StyleResolver};
pub use theme::{ActiveTheme, FsThemeSource, ThemeConfigSource};

#[cfg(test)]
pub(crate) mod test_helpers;
