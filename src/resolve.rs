//! Responsive image style resolution.
//!
//! [`StyleResolver::resolve`] answers one question: which responsive image
//! style should an image use, given where it sits on the page?
//!
//! ```text
//! placement (layout, section layout, image style, zone)
//!   → read <theme>.responsive_image_layouts.yml     (fresh every call)
//!   → substitute the fallback pair if layout context is missing
//!   → document[layout][section][image_style]
//!   → pick by zone when the cell is a sequence
//!   → style id, or "" for no match
//! ```
//!
//! ## Missing layout context
//!
//! When either the layout or the section layout is empty, the image belongs to
//! a section that hasn't been saved yet, so nothing about its real context is
//! known. Both values are replaced by the document's `fallback` pair, which
//! theme authors point at their largest image sizes.
//!
//! ## No match
//!
//! A lookup that finds nothing is not an error: the result is the empty string
//! and callers render without a responsive style. Administrators get a
//! diagnostic through the [`NotificationSink`] so theme authors can spot the
//! gap in their layout file; nobody else does.
//!
//! ## State
//!
//! The resolver holds its two collaborators and nothing else. Every call
//! re-reads the document, so a resolver can be shared across renders and
//! always sees the current file.

use crate::document::{DocumentError, FallbackError, StyleCell, StyleConfigDocument};
use crate::theme::ThemeConfigSource;
use crate::zone::{Zone, parse_zone};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} contains invalid YAML: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
    #[error("layout context is missing and {} has no fallback entry", .path.display())]
    MissingFallback { path: PathBuf },
    #[error(
        "layout context is missing and the fallback entry in {} names several layouts: {}",
        .path.display(),
        .layouts.join(", ")
    )]
    AmbiguousFallback { path: PathBuf, layouts: Vec<String> },
}

/// Receives diagnostics about unmatched lookups.
pub trait NotificationSink {
    fn report_error(&self, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn report_error(&self, message: &str) {
        (**self).report_error(message)
    }
}

/// Writes diagnostics to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl NotificationSink for StderrSink {
    fn report_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// Emits diagnostics as `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn report_error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Where an image sits on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub layout: String,
    pub section_layout: String,
    pub image_style: String,
    /// Zone designator such as `zone2`; only consulted for sequence cells.
    pub zone: Option<String>,
}

impl Placement {
    pub fn new(
        layout: impl Into<String>,
        section_layout: impl Into<String>,
        image_style: impl Into<String>,
    ) -> Self {
        Self {
            layout: layout.into(),
            section_layout: section_layout.into(),
            image_style: image_style.into(),
            zone: None,
        }
    }

    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    fn lacks_layout_context(&self) -> bool {
        self.layout.is_empty() || self.section_layout.is_empty()
    }
}

/// Resolves placements to responsive image style ids.
#[derive(Debug, Clone)]
pub struct StyleResolver<S, N> {
    source: S,
    sink: N,
}

impl<S: ThemeConfigSource, N: NotificationSink> StyleResolver<S, N> {
    pub fn new(source: S, sink: N) -> Self {
        Self { source, sink }
    }

    /// Load the active theme's layout document.
    ///
    /// A missing file is an empty document. Returns the file path alongside
    /// the document so callers can name it in messages.
    pub fn load_document(&self) -> Result<(PathBuf, StyleConfigDocument), ResolveError> {
        let path = self.source.active_theme().layouts_file();
        tracing::debug!(path = %path.display(), "loading responsive image layouts");

        let bytes = self
            .source
            .read_file(&path)
            .map_err(|source| ResolveError::Read {
                path: path.clone(),
                source,
            })?;
        let document = match bytes {
            Some(bytes) => StyleConfigDocument::parse(&bytes).map_err(|source| {
                ResolveError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            None => StyleConfigDocument::default(),
        };
        Ok((path, document))
    }

    /// Resolve the responsive image style for a placement.
    ///
    /// Returns `Ok("")` when nothing matches. `is_administrator` only
    /// controls whether a miss is reported to the sink.
    pub fn resolve(
        &self,
        placement: &Placement,
        is_administrator: bool,
    ) -> Result<String, ResolveError> {
        let (path, document) = self.load_document()?;

        let (layout, section_layout) = if placement.lacks_layout_context() {
            let (layout, section_layout) = document.fallback().map_err(|e| match e {
                FallbackError::Missing => ResolveError::MissingFallback { path: path.clone() },
                FallbackError::Ambiguous(layouts) => ResolveError::AmbiguousFallback {
                    path: path.clone(),
                    layouts,
                },
            })?;
            tracing::debug!(layout, section_layout, "using fallback layout");
            (layout, section_layout)
        } else {
            (
                placement.layout.as_str(),
                placement.section_layout.as_str(),
            )
        };

        let style = document
            .lookup(layout, section_layout, &placement.image_style)
            .and_then(|cell| select_style(cell, placement.zone.as_deref()))
            .unwrap_or_default()
            .to_string();

        if style.is_empty() && is_administrator {
            self.sink.report_error(&unmatched_message(
                &path,
                layout,
                section_layout,
                &placement.image_style,
                placement.zone.as_deref(),
            ));
        }

        Ok(style)
    }
}

fn select_style<'a>(cell: &'a StyleCell, zone: Option<&str>) -> Option<&'a str> {
    match cell {
        StyleCell::Scalar(style) => Some(style.as_str()),
        StyleCell::Sequence(styles) => {
            let parsed = parse_zone(zone);
            if parsed == Zone::Unparsed {
                tracing::warn!(zone = ?zone, "zone is not of the form zone<N>; using the first style");
            }
            parsed.select(styles)
        }
    }
}

fn unmatched_message(
    path: &std::path::Path,
    layout: &str,
    section_layout: &str,
    image_style: &str,
    zone: Option<&str>,
) -> String {
    let mut message = format!(
        "The responsive image style could not be matched. Please check that {} has a matching \
         responsive image style set for your variables {layout} {section_layout} {image_style}",
        path.display()
    );
    if let Some(zone) = zone.filter(|z| !z.is_empty()) {
        message.push(' ');
        message.push_str(zone);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn resolve_in(yaml: &str, placement: Placement) -> Result<String, ResolveError> {
        let source = MemorySource::with_layouts(yaml);
        let sink = RecordingSink::default();
        StyleResolver::new(&source, &sink).resolve(&placement, false)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    #[test]
    fn scalar_cell_is_the_result() {
        let style = resolve_in(
            "hero:\n  full:\n    image: style_a\n",
            Placement::new("hero", "full", "image"),
        )
        .unwrap();
        assert_eq!(style, "style_a");
    }

    #[test]
    fn scalar_cell_ignores_zone() {
        let style = resolve_in(
            "hero:\n  full:\n    image: style_a\n",
            Placement::new("hero", "full", "image").in_zone("zone3"),
        )
        .unwrap();
        assert_eq!(style, "style_a");
    }

    #[test]
    fn sequence_without_zone_takes_first() {
        let style = resolve_in(
            "hero:\n  full:\n    image: [s1, s2, s3]\n",
            Placement::new("hero", "full", "image"),
        )
        .unwrap();
        assert_eq!(style, "s1");
    }

    #[test]
    fn sequence_indexed_by_zone() {
        let yaml = "hero:\n  full:\n    image: [s1, s2, s3]\n";
        for (zone, expected) in [("zone1", "s1"), ("zone2", "s2"), ("zone3", "s3")] {
            let style = resolve_in(yaml, Placement::new("hero", "full", "image").in_zone(zone))
                .unwrap();
            assert_eq!(style, expected, "zone {zone}");
        }
    }

    #[test]
    fn zone_out_of_bounds_is_no_match() {
        let yaml = "hero:\n  full:\n    image: [s1, s2, s3]\n";
        for zone in ["zone9", "zone4", "zone0"] {
            let style = resolve_in(yaml, Placement::new("hero", "full", "image").in_zone(zone))
                .unwrap();
            assert_eq!(style, "", "zone {zone}");
        }
    }

    #[test]
    fn zone_too_large_to_index_is_no_match() {
        let style = resolve_in(
            "hero:\n  full:\n    image: [s1, s2, s3]\n",
            Placement::new("hero", "full", "image").in_zone("zone99999999999999999999999"),
        )
        .unwrap();
        assert_eq!(style, "");
    }

    #[test]
    fn sections_inherit_through_merge_keys() {
        let yaml = "defaults: &d {hero: hero_wide}\none_column:\n  full:\n    <<: *d\n    teaser: t\n";
        let style = resolve_in(yaml, Placement::new("one_column", "full", "hero")).unwrap();
        assert_eq!(style, "hero_wide");
    }

    #[test]
    fn unparseable_zone_takes_first() {
        let style = resolve_in(
            "hero:\n  full:\n    image: [s1, s2]\n",
            Placement::new("hero", "full", "image").in_zone("zoneabc"),
        )
        .unwrap();
        assert_eq!(style, "s1");
    }

    #[test]
    fn empty_zone_takes_first() {
        let style = resolve_in(
            "hero:\n  full:\n    image: [s1, s2]\n",
            Placement::new("hero", "full", "image").in_zone(""),
        )
        .unwrap();
        assert_eq!(style, "s1");
    }

    #[test]
    fn misses_at_any_level_are_empty() {
        let yaml = "hero:\n  full:\n    image: style_a\n";
        for placement in [
            Placement::new("other", "full", "image"),
            Placement::new("hero", "other", "image"),
            Placement::new("hero", "full", "other"),
            Placement::new("hero", "full", ""),
        ] {
            assert_eq!(resolve_in(yaml, placement).unwrap(), "");
        }
    }

    #[test]
    fn empty_file_is_no_match() {
        let style = resolve_in("", Placement::new("hero", "full", "image")).unwrap();
        assert_eq!(style, "");
    }

    #[test]
    fn missing_file_is_no_match() {
        let source = MemorySource::without_layouts();
        let sink = RecordingSink::default();
        let style = StyleResolver::new(&source, &sink)
            .resolve(&Placement::new("hero", "full", "image"), false)
            .unwrap();
        assert_eq!(style, "");
    }

    // =========================================================================
    // Fallback
    // =========================================================================

    const WITH_FALLBACK: &str = "\
fallback:
  one_column: full
one_column:
  full:
    image: largest
hero:
  full:
    image: style_a
";

    #[test]
    fn both_empty_uses_fallback() {
        let style = resolve_in(WITH_FALLBACK, Placement::new("", "", "image")).unwrap();
        assert_eq!(style, "largest");
    }

    #[test]
    fn one_empty_overrides_both() {
        // The given layout is discarded along with the empty section.
        let style = resolve_in(WITH_FALLBACK, Placement::new("hero", "", "image")).unwrap();
        assert_eq!(style, "largest");
        let style = resolve_in(WITH_FALLBACK, Placement::new("", "full", "image")).unwrap();
        assert_eq!(style, "largest");
    }

    #[test]
    fn full_context_ignores_fallback() {
        let style = resolve_in(WITH_FALLBACK, Placement::new("hero", "full", "image")).unwrap();
        assert_eq!(style, "style_a");
    }

    #[test]
    fn missing_fallback_is_error() {
        let err = resolve_in(
            "hero:\n  full:\n    image: style_a\n",
            Placement::new("", "", "image"),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::MissingFallback { .. }));
        assert!(err.to_string().contains(TEST_LAYOUTS_FILE));
    }

    #[test]
    fn missing_fallback_in_empty_file_is_error() {
        let err = resolve_in("", Placement::new("", "", "image")).unwrap_err();
        assert!(matches!(err, ResolveError::MissingFallback { .. }));
    }

    #[test]
    fn fallback_only_needed_without_context() {
        // No fallback entry, but full context: plain miss, not an error.
        let style = resolve_in("", Placement::new("hero", "full", "image")).unwrap();
        assert_eq!(style, "");
    }

    #[test]
    fn ambiguous_fallback_is_error() {
        let err = resolve_in(
            "fallback:\n  one_column: full\n  two_column: halves\n",
            Placement::new("", "", "image"),
        )
        .unwrap_err();
        match err {
            ResolveError::AmbiguousFallback { layouts, .. } => {
                assert_eq!(layouts, vec!["one_column", "two_column"]);
            }
            other => panic!("expected AmbiguousFallback, got {other:?}"),
        }
    }

    #[test]
    fn fallback_with_non_scalar_second_entry_is_ambiguous() {
        let yaml = WITH_FALLBACK.replacen(
            "fallback:\n  one_column: full\n",
            "fallback:\n  one_column: full\n  two_column: [halves]\n",
            1,
        );
        let err = resolve_in(&yaml, Placement::new("", "", "image")).unwrap_err();
        assert!(matches!(err, ResolveError::AmbiguousFallback { .. }));
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn malformed_yaml_names_the_file() {
        let err = resolve_in("hero: [unterminated\n", Placement::new("hero", "full", "image"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Parse { .. }));
        let msg = err.to_string();
        assert!(msg.contains(TEST_LAYOUTS_FILE), "message was: {msg}");
        assert!(msg.contains("invalid YAML"));
    }

    #[test]
    fn top_level_scalar_is_parse_error() {
        let err = resolve_in("just a string\n", Placement::new("hero", "full", "image"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Parse { .. }));
    }

    #[test]
    fn read_failure_is_error() {
        let source = MemorySource::failing();
        let sink = RecordingSink::default();
        let err = StyleResolver::new(&source, &sink)
            .resolve(&Placement::new("hero", "full", "image"), true)
            .unwrap_err();
        assert!(matches!(err, ResolveError::Read { .. }));
        assert!(sink.messages().is_empty());
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    #[test]
    fn administrator_is_told_about_misses() {
        let source = MemorySource::with_layouts("hero:\n  full:\n    image: style_a\n");
        let sink = RecordingSink::default();
        let resolver = StyleResolver::new(&source, &sink);

        let style = resolver
            .resolve(&Placement::new("hero", "full", "teaser").in_zone("zone2"), true)
            .unwrap();

        assert_eq!(style, "");
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        let msg = &messages[0];
        assert!(msg.contains(TEST_LAYOUTS_FILE));
        assert!(msg.contains("hero full teaser zone2"), "message was: {msg}");
    }

    #[test]
    fn diagnostic_names_fallback_coordinates() {
        let source = MemorySource::with_layouts(WITH_FALLBACK);
        let sink = RecordingSink::default();
        StyleResolver::new(&source, &sink)
            .resolve(&Placement::new("", "", "teaser"), true)
            .unwrap();
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].ends_with("one_column full teaser"));
    }

    #[test]
    fn visitors_are_not_told() {
        let source = MemorySource::with_layouts("hero:\n  full:\n    image: style_a\n");
        let sink = RecordingSink::default();
        let style = StyleResolver::new(&source, &sink)
            .resolve(&Placement::new("hero", "full", "teaser"), false)
            .unwrap();
        assert_eq!(style, "");
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn hits_are_silent_for_administrators() {
        let source = MemorySource::with_layouts("hero:\n  full:\n    image: style_a\n");
        let sink = RecordingSink::default();
        StyleResolver::new(&source, &sink)
            .resolve(&Placement::new("hero", "full", "image"), true)
            .unwrap();
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn empty_configured_style_counts_as_miss() {
        let source = MemorySource::with_layouts("hero:\n  full:\n    image: ''\n    list: []\n");
        let sink = RecordingSink::default();
        let resolver = StyleResolver::new(&source, &sink);
        assert_eq!(
            resolver.resolve(&Placement::new("hero", "full", "image"), true).unwrap(),
            ""
        );
        assert_eq!(
            resolver.resolve(&Placement::new("hero", "full", "list"), true).unwrap(),
            ""
        );
        assert_eq!(sink.messages().len(), 2);
    }

    // =========================================================================
    // Freshness
    // =========================================================================

    #[test]
    fn document_is_reread_every_call() {
        let source = MemorySource::with_layouts("hero:\n  full:\n    image: before\n");
        let sink = RecordingSink::default();
        let resolver = StyleResolver::new(&source, &sink);
        let placement = Placement::new("hero", "full", "image");

        assert_eq!(resolver.resolve(&placement, false).unwrap(), "before");
        source.set_layouts("hero:\n  full:\n    image: after\n");
        assert_eq!(resolver.resolve(&placement, false).unwrap(), "after");
    }

    #[test]
    fn resolves_against_fixture_theme() {
        let tmp = setup_fixtures();
        let source = fixture_source(tmp.path());
        let sink = RecordingSink::default();
        let resolver = StyleResolver::new(&source, &sink);

        assert_eq!(
            resolver
                .resolve(&Placement::new("two_column", "narrow_wide", "teaser").in_zone("zone2"), false)
                .unwrap(),
            "teaser_two_thirds"
        );
        assert_eq!(
            resolver.resolve(&Placement::new("", "", "hero"), false).unwrap(),
            "hero_wide"
        );
    }
}
