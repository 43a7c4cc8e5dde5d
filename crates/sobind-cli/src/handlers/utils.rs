//! Shared utilities for command handlers

use crate::adapter::CoreLibrary;
use crate::config::Config;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

/// Environment variables whose entries are searched for the library
const SEARCH_PATH_VARS: &[&str] = &["LD_LIBRARY_PATH", "DYLD_LIBRARY_PATH", "PATH"];

/// Work out which file to load
///
/// An explicit path (flag or environment, then config) wins. Otherwise the
/// platform filename for `library.name` is looked up in the configured search
/// paths and the loader-related environment variables; if nothing matches,
/// the bare filename is handed to the dynamic loader.
pub fn resolve_library_path(flag: Option<&Path>, config: &Config) -> PathBuf {
    if let Some(path) = flag.or(config.library.path.as_deref()) {
        debug!(path = %path.display(), "Using explicit library path");
        return path.to_path_buf();
    }

    let filename = PathBuf::from(libloading::library_filename(&config.library.name));
    let env_dirs = SEARCH_PATH_VARS
        .iter()
        .filter_map(std::env::var_os)
        .flat_map(|value| std::env::split_paths(&value).collect::<Vec<_>>());
    let dirs = config.library.search_paths.iter().cloned().chain(env_dirs);

    match find_in_dirs(&filename, dirs) {
        Some(found) => {
            debug!(path = %found.display(), "Found library in search paths");
            found
        }
        None => {
            debug!(filename = %filename.display(), "Deferring to the dynamic loader");
            filename
        }
    }
}

/// First `dir/filename` that exists
pub fn find_in_dirs(filename: &Path, dirs: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    dirs.into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

/// Resolve, load and verify the library, then apply the configured seed
pub fn open_library(flag: Option<&Path>, config: &Config) -> Result<CoreLibrary> {
    let path = resolve_library_path(flag, config);
    let library = info_span!("open_library", path = %path.display())
        .in_scope(|| CoreLibrary::open(&path))?;
    debug!(
        path = %library.path().display(),
        version = library.version(),
        "Library ready"
    );

    if let Some(seed) = config.random.seed {
        library.seed_random(seed);
    }

    Ok(library)
}
