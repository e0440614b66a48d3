//! Executable discovery across a colon-delimited search path.
//!
//! The supervisor locates the dnsmasq binary exactly once, when the server
//! instance is built. The inherited `PATH` is read but never modified; a copy
//! is extended with the conventional system-binary directory so dnsmasq is
//! found even when the caller's `PATH` omits `/usr/sbin`.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Directory guaranteed to be part of every [`SearchPath`].
pub const SYSTEM_BINARY_DIR: &str = "/usr/sbin";

const RESOLVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::resolver");

/// Ordered set of directories searched for an executable.
///
/// ```
/// use dnsmasq_dhcp::SearchPath;
///
/// let search_path = SearchPath::new(["/opt/dnsmasq/bin"]);
/// assert_eq!(search_path.directories().len(), 2);
/// assert!(search_path.directories().ends_with(&["/usr/sbin".into()]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    directories: Vec<PathBuf>,
}

impl SearchPath {
    /// Builds a search path from the given directories, appending
    /// [`SYSTEM_BINARY_DIR`] when it is missing. Empty entries are skipped.
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut searched: Vec<PathBuf> = directories
            .into_iter()
            .map(Into::into)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect();
        let system_dir = Path::new(SYSTEM_BINARY_DIR);
        if !searched.iter().any(|dir| dir == system_dir) {
            searched.push(system_dir.to_path_buf());
        }
        Self {
            directories: searched,
        }
    }

    /// Builds a search path from the inherited `PATH` variable.
    #[must_use]
    pub fn from_env() -> Self {
        match env::var_os("PATH") {
            Some(raw) => Self::new(env::split_paths(&raw)),
            None => Self::new(Vec::<PathBuf>::new()),
        }
    }

    /// Directories in search order.
    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Locates `name` in the search path.
    ///
    /// Every directory is inspected and the last one holding a regular file
    /// called `name` wins. Returns `None` when no directory contains it.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let resolved = self
            .directories
            .iter()
            .map(|dir| dir.join(name))
            .filter(|candidate| candidate.is_file())
            .inspect(|candidate| {
                debug!(
                    target: RESOLVER_TARGET,
                    candidate = %candidate.display(),
                    "found executable candidate"
                );
            })
            .last();
        match &resolved {
            Some(path) => debug!(
                target: RESOLVER_TARGET,
                binary = name,
                path = %path.display(),
                "resolved executable"
            ),
            None => debug!(
                target: RESOLVER_TARGET,
                binary = name,
                searched = ?self.directories,
                "executable not found in search path"
            ),
        }
        resolved
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::from_env()
    }
}
