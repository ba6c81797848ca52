//! Where the layout document comes from.
//!
//! The resolver never looks up the active theme or touches the filesystem
//! itself. It asks a [`ThemeConfigSource`] for the active theme and for the
//! bytes of the layout file. [`FsThemeSource`] is the filesystem-backed
//! implementation driven by the host config; hosts embedding the resolver
//! can supply their own.

use crate::config::HostConfig;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix appended to the theme name to form the layout file name.
pub const LAYOUTS_FILE_SUFFIX: &str = ".responsive_image_layouts.yml";

/// The active theme: machine name plus its directory relative to the
/// application root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTheme {
    pub name: String,
    pub directory: PathBuf,
}

impl ActiveTheme {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
        }
    }

    /// Relative path of the theme's layout file:
    /// `<directory>/<name>.responsive_image_layouts.yml`.
    pub fn layouts_file(&self) -> PathBuf {
        self.directory
            .join(format!("{}{}", self.name, LAYOUTS_FILE_SUFFIX))
    }
}

/// Supplies the active theme and raw file contents.
pub trait ThemeConfigSource {
    fn active_theme(&self) -> ActiveTheme;

    /// Read a file relative to the application root.
    ///
    /// Returns `Ok(None)` when the file doesn't exist.
    fn read_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;
}

impl<T: ThemeConfigSource + ?Sized> ThemeConfigSource for &T {
    fn active_theme(&self) -> ActiveTheme {
        (**self).active_theme()
    }

    fn read_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        (**self).read_file(path)
    }
}

/// Filesystem-backed source rooted at the application directory.
#[derive(Debug, Clone)]
pub struct FsThemeSource {
    root: PathBuf,
    theme: ActiveTheme,
}

impl FsThemeSource {
    pub fn new(root: impl Into<PathBuf>, theme: ActiveTheme) -> Self {
        Self {
            root: root.into(),
            theme,
        }
    }

    /// Build from a loaded host config.
    pub fn from_config(root: impl Into<PathBuf>, config: &HostConfig) -> Self {
        Self::new(
            root,
            ActiveTheme::new(config.theme.name.trim(), &config.theme.path),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ThemeConfigSource for FsThemeSource {
    fn active_theme(&self) -> ActiveTheme {
        self.theme.clone()
    }

    fn read_file(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(self.root.join(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
