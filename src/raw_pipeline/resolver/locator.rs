//! Discovery of the decode engine's shared library on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::resolver::version::parse_api_version;

/// Environment variable naming an explicit library file to use.
pub const LIBRARY_PATH_ENV: &str = "LIBRAW_LIBRARY_PATH";

/// Directories scanned for `libraw.so.*` / `libraw.*.dylib`.
const SEARCH_DIRS: &[&str] = &[
    // Debian/Ubuntu multiarch
    "/usr/lib/x86_64-linux-gnu",
    "/usr/lib/aarch64-linux-gnu",
    // Fedora/RHEL
    "/usr/lib64",
    // Arch/generic
    "/usr/lib",
    "/usr/local/lib",
    // Homebrew
    "/opt/homebrew/lib",
];

/// Finds the decode engine's library file.
pub trait EngineLocator: Send + Sync {
    fn locate(&self) -> Result<PathBuf>;
}

/// Locates the engine through the environment and conventional library directories.
#[derive(Debug, Clone)]
pub struct SystemLocator {
    search_dirs: Vec<PathBuf>,
    scan_env: bool,
}

impl Default for SystemLocator {
    fn default() -> Self {
        Self {
            search_dirs: SEARCH_DIRS.iter().map(PathBuf::from).collect(),
            scan_env: true,
        }
    }
}

impl SystemLocator {
    /// Only scan `dirs`, ignoring the environment.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs: dirs,
            scan_env: false,
        }
    }

    fn candidate_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.search_dirs.clone();
        if self.scan_env {
            for var in ["LD_LIBRARY_PATH", "DYLD_LIBRARY_PATH"] {
                if let Some(value) = std::env::var_os(var) {
                    dirs.extend(std::env::split_paths(&value).filter(|d| !d.as_os_str().is_empty()));
                }
            }
        }
        dirs
    }
}

impl EngineLocator for SystemLocator {
    /// Search order:
    /// 1. `LIBRAW_LIBRARY_PATH`
    /// 2. Well-known directories
    /// 3. `LD_LIBRARY_PATH` / `DYLD_LIBRARY_PATH` directories
    fn locate(&self) -> Result<PathBuf> {
        if self.scan_env {
            if let Some(explicit) = std::env::var_os(LIBRARY_PATH_ENV) {
                let explicit = PathBuf::from(explicit);
                if explicit.is_file() {
                    return Ok(explicit);
                }
                warn!(
                    "{}={} set but is not a file, falling back to search",
                    LIBRARY_PATH_ENV,
                    explicit.display()
                );
            }
        }

        for dir in self.candidate_dirs() {
            if let Some(found) = find_libraw_in_dir(&dir) {
                debug!("Found decode engine at {}", found.display());
                return Ok(found);
            }
        }

        Err(RawError::EngineNotFound(format!(
            "no libraw shared library found; install LibRaw or set {}",
            LIBRARY_PATH_ENV
        )))
    }
}

/// Scan one directory for versioned engine libraries, preferring the highest version.
pub fn find_libraw_in_dir(dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;

    entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("libraw.so.") || (n.starts_with("libraw.") && n.ends_with(".dylib")))
        })
        .filter_map(|path| parse_api_version(&path).map(|version| (version, path)))
        .max_by(|(a_ver, a_path), (b_ver, b_path)| {
            // among equal versions prefer the shortest name (the soname link)
            a_ver
                .cmp(b_ver)
                .then_with(|| b_path.as_os_str().len().cmp(&a_path.as_os_str().len()))
        })
        .map(|(_, path)| path)
}
