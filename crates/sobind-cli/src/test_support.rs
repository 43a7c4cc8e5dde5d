//! Helpers shared by the unit tests

use crate::cli::OutputFormat;
use crate::output::OutputWriter;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Locate the built `example` library in the workspace target directory
///
/// `sobind-ffi` is a dev-dependency, so building these tests also builds the
/// cdylib. Cargo leaves it either at the profile root or, with a hash
/// suffix, under `deps/`.
pub fn built_library() -> Option<PathBuf> {
    let exact = exact_name();
    let hashed_prefix = format!("{}{}-", DLL_PREFIX, sobind_core::LIBRARY_NAME);
    let target = std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../../target"));

    let is_library = |name: &str| {
        name == exact || (name.starts_with(&hashed_prefix) && name.ends_with(DLL_SUFFIX))
    };

    ["debug", "release"].iter().find_map(|profile| {
        let root = target.join(profile);
        [root.clone(), root.join("deps")].into_iter().find_map(|dir| {
            std::fs::read_dir(dir)
                .ok()?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .find(|path| path.file_name().and_then(|n| n.to_str()).is_some_and(|name| is_library(name)))
        })
    })
}

/// Path of the built library; a missing build fails the test
pub fn library_path() -> PathBuf {
    built_library().unwrap_or_else(|| {
        panic!(
            "{} not found under the target directory; run `cargo build -p sobind-ffi`",
            exact_name()
        )
    })
}

fn exact_name() -> String {
    libloading::library_filename(sobind_core::LIBRARY_NAME)
        .to_string_lossy()
        .into_owned()
}

/// Open the built library, failing the test when it is absent or rejected
macro_rules! require_library {
    () => {
        $crate::adapter::CoreLibrary::open($crate::test_support::library_path())
            .expect("built library should verify")
    };
}
pub(crate) use require_library;

/// Clonable in-memory sink so tests can read back what was written
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An uncolored writer over a fresh buffer
pub fn buffered_writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
    (writer, buffer)
}

