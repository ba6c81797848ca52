//! Shared test utilities for the layout-styles test suite.
//!
//! Provides an in-memory [`ThemeConfigSource`], a sink that records
//! diagnostics, and a copy of the on-disk fixture site.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = MemorySource::with_layouts("hero:\n  full:\n    image: a\n");
//! let sink = RecordingSink::default();
//! let resolver = StyleResolver::new(&source, &sink);
//! ```

use std::cell::RefCell;
use std::io;
use std::path::Path;
use tempfile::TempDir;

use crate::config::load_config;
use crate::resolve::NotificationSink;
use crate::theme::{ActiveTheme, FsThemeSource, ThemeConfigSource};

/// Layout file path served by [`MemorySource`].
pub const TEST_LAYOUTS_FILE: &str = "themes/testtheme/testtheme.responsive_image_layouts.yml";

// =========================================================================
// In-memory collaborators
// =========================================================================

/// Serves one layout file from memory. Contents can be swapped between calls.
pub struct MemorySource {
    layouts: RefCell<Option<Vec<u8>>>,
    fail_reads: bool,
}

impl MemorySource {
    pub fn with_layouts(yaml: &str) -> Self {
        Self {
            layouts: RefCell::new(Some(yaml.as_bytes().to_vec())),
            fail_reads: false,
        }
    }

    /// The theme ships no layout file.
    pub fn without_layouts() -> Self {
        Self {
            layouts: RefCell::new(None),
            fail_reads: false,
        }
    }

    /// Every read fails with a permission error.
    pub fn failing() -> Self {
        Self {
            layouts: RefCell::new(None),
            fail_reads: true,
        }
    }

    pub fn set_layouts(&self, yaml: &str) {
        *self.layouts.borrow_mut() = Some(yaml.as_bytes().to_vec());
    }
}

impl ThemeConfigSource for MemorySource {
    fn active_theme(&self) -> ActiveTheme {
        ActiveTheme::new("testtheme", "themes/testtheme")
    }

    fn read_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        if self.fail_reads {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        if path != Path::new(TEST_LAYOUTS_FILE) {
            return Ok(None);
        }
        Ok(self.layouts.borrow().clone())
    }
}

/// Collects every reported diagnostic.
#[derive(Default)]
pub struct RecordingSink {
    messages: RefCell<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn report_error(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

/// Filesystem source for a fixture copy, configured from its host config.
pub fn fixture_source(root: &Path) -> FsThemeSource {
    let config = load_config(root).unwrap();
    FsThemeSource::from_config(root, &config)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
