//! Runtime binding to the `example` shared library
//!
//! [`CoreLibrary::open`] loads the library, reads its ABI version and
//! interface descriptor, and refuses to go further unless they match the
//! descriptor this binary was compiled against. Only then are the operation
//! symbols resolved, once, into typed function pointers.
//!
//! Strings returned by the library are wrapped in [`OwnedResult`], which
//! hands them back to `free_result` when dropped.

use libloading::Library;
use sobind_core::{ErrorCode, InterfaceDescriptor};
use std::ffi::{CStr, CString, NulError};
use std::marker::PhantomData;
use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};
use std::str::Utf8Error;
use tracing::{debug, info};

type FactorialFn = unsafe extern "C" fn(i64) -> i64;
type StrToOwnedFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
type RepeatStringFn = unsafe extern "C" fn(*const c_char, i64) -> *mut c_char;
type ShoutItFn = unsafe extern "C" fn(*const c_char);
type MaybeFn = unsafe extern "C" fn() -> c_int;
type FreeResultFn = unsafe extern "C" fn(*mut c_char);
type ErrorCodeFn = unsafe extern "C" fn() -> i32;
type StaticStrFn = unsafe extern "C" fn() -> *const c_char;
type SeedFn = unsafe extern "C" fn(u64);
type VoidFn = unsafe extern "C" fn();
type AbiVersionFn = unsafe extern "C" fn() -> u32;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while loading or calling the library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dynamic loader could not open the file
    #[error("Failed to load library {}: {source}", path.display())]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// A required symbol is not exported
    #[error("Symbol '{name}' not found: {source}")]
    MissingSymbol {
        name: String,
        #[source]
        source: libloading::Error,
    },

    /// The library's interface differs from the one this adapter expects
    #[error("Incompatible library: {0}")]
    Incompatible(#[source] sobind_core::Error),

    /// The library reported a failure
    #[error("{message} ({code:?})")]
    Core { code: ErrorCode, message: String },

    /// The library returned text that is not UTF-8
    #[error("Library returned invalid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),

    /// An argument contains a NUL byte and cannot be passed as a C string
    #[error("Argument contains a NUL byte: {0}")]
    Nul(#[from] NulError),
}

struct Symbols {
    factorial: FactorialFn,
    greet: StrToOwnedFn,
    repeat_string: RepeatStringFn,
    shout_it: ShoutItFn,
    maybe: MaybeFn,
    sort_json_array: StrToOwnedFn,
    free_result: FreeResultFn,
    last_error_code: ErrorCodeFn,
    last_error_message: StaticStrFn,
    seed_random: SeedFn,
    reseed_from_entropy: VoidFn,
}

/// A loaded, verified `example` library
pub struct CoreLibrary {
    path: PathBuf,
    version: String,
    descriptor: InterfaceDescriptor,
    symbols: Symbols,
    // Must outlive every function pointer in `symbols`
    _library: Library,
}

impl std::fmt::Debug for CoreLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreLibrary")
            .field("path", &self.path)
            .field("version", &self.version)
            .field("abi_version", &self.descriptor.abi_version)
            .finish()
    }
}

/// Resolve `name` as a value of function pointer type `T`
///
/// # Safety
/// `T` must match the symbol's real signature.
unsafe fn resolve<T: Copy>(library: &Library, name: &str) -> Result<T> {
    library
        .get::<T>(name.as_bytes())
        .map(|symbol| *symbol)
        .map_err(|source| Error::MissingSymbol {
            name: name.to_string(),
            source,
        })
}

/// Copy a library-owned string
///
/// # Safety
/// A non-null `ptr` must reference a NUL-terminated string.
unsafe fn copy_static_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

impl CoreLibrary {
    /// Load and verify the library at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading library");

        let library = unsafe { Library::new(path) }.map_err(|source| Error::LibraryLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let expected = InterfaceDescriptor::current();
        let descriptor = unsafe { Self::read_descriptor(&library)? };
        expected
            .check_compatible(&descriptor)
            .map_err(Error::Incompatible)?;

        let symbols = unsafe {
            Symbols {
                factorial: resolve(&library, "factorial")?,
                greet: resolve(&library, "greet")?,
                repeat_string: resolve(&library, "repeat_string")?,
                shout_it: resolve(&library, "shout_it")?,
                maybe: resolve(&library, "maybe")?,
                sort_json_array: resolve(&library, "sort_json_array")?,
                free_result: resolve(&library, "free_result")?,
                last_error_code: resolve(&library, "sobind_last_error_code")?,
                last_error_message: resolve(&library, "sobind_last_error_message")?,
                seed_random: resolve(&library, "sobind_seed_random")?,
                reseed_from_entropy: resolve(&library, "sobind_reseed_from_entropy")?,
            }
        };

        let version = unsafe {
            let version_fn: StaticStrFn = resolve(&library, "sobind_version")?;
            copy_static_str(version_fn()).unwrap_or_default()
        };

        info!(
            path = %path.display(),
            version = %version,
            abi_version = descriptor.abi_version,
            "library loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            version,
            descriptor,
            symbols,
            _library: library,
        })
    }

    /// Load the library only far enough to read its descriptor, unchecked
    pub fn inspect(path: impl AsRef<Path>) -> Result<InterfaceDescriptor> {
        let path = path.as_ref();
        let library = unsafe { Library::new(path) }.map_err(|source| Error::LibraryLoad {
            path: path.to_path_buf(),
            source,
        })?;
        unsafe { Self::read_descriptor(&library) }
    }

    /// Read the ABI version first, then the full descriptor
    unsafe fn read_descriptor(library: &Library) -> Result<InterfaceDescriptor> {
        let abi_version: AbiVersionFn = resolve(library, "sobind_abi_version")?;
        let found_version = abi_version();
        if found_version != sobind_core::ABI_VERSION {
            return Err(Error::Incompatible(sobind_core::Error::InterfaceMismatch {
                symbol: "sobind_abi_version".to_string(),
                expected: format!("ABI v{}", sobind_core::ABI_VERSION),
                found: format!("ABI v{}", found_version),
            }));
        }

        let interface: StaticStrFn = resolve(library, "sobind_interface")?;
        let json = copy_static_str(interface()).ok_or_else(|| {
            Error::Incompatible(sobind_core::Error::internal(
                "sobind_interface returned null",
            ))
        })?;

        InterfaceDescriptor::from_json(&json).map_err(Error::Incompatible)
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Version string reported by the library
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `n!`
    pub fn factorial(&self, n: i64) -> Result<i64> {
        let result = unsafe { (self.symbols.factorial)(n) };
        self.check()?;
        Ok(result)
    }

    /// Greeting for `name`
    pub fn greet(&self, name: &str) -> Result<String> {
        let name = CString::new(name)?;
        let result = unsafe { (self.symbols.greet)(name.as_ptr()) };
        self.take(result)?.into_string()
    }

    /// `s` repeated `count` times
    pub fn repeat_string(&self, s: &str, count: i64) -> Result<String> {
        let s = CString::new(s)?;
        let result = unsafe { (self.symbols.repeat_string)(s.as_ptr(), count) };
        self.take(result)?.into_string()
    }

    /// Let the library print an emphasized `text` on stdout
    pub fn shout_it(&self, text: &str) -> Result<()> {
        let text = CString::new(text)?;
        unsafe { (self.symbols.shout_it)(text.as_ptr()) };
        self.check()
    }

    /// Coin flip
    pub fn maybe(&self) -> bool {
        unsafe { (self.symbols.maybe)() != 0 }
    }

    /// Sort a JSON array of numbers
    pub fn sort_json_array(&self, json: &str) -> Result<String> {
        let json = CString::new(json)?;
        let result = unsafe { (self.symbols.sort_json_array)(json.as_ptr()) };
        self.take(result)?.into_string()
    }

    /// Make `maybe` deterministic
    pub fn seed_random(&self, seed: u64) {
        debug!(seed, "seeding library random source");
        unsafe { (self.symbols.seed_random)(seed) }
    }

    /// Make `maybe` nondeterministic again
    pub fn reseed_from_entropy(&self) {
        unsafe { (self.symbols.reseed_from_entropy)() }
    }

    /// Wrap a returned string, or turn a null sentinel into an error
    fn take(&self, ptr: *mut c_char) -> Result<OwnedResult<'_>> {
        if ptr.is_null() {
            return Err(self.last_error());
        }
        Ok(OwnedResult {
            ptr,
            free: self.symbols.free_result,
            _library: PhantomData,
        })
    }

    fn check(&self) -> Result<()> {
        let raw = unsafe { (self.symbols.last_error_code)() };
        match ErrorCode::from_raw(raw) {
            Some(code) if code.is_success() => Ok(()),
            _ => Err(self.last_error()),
        }
    }

    fn last_error(&self) -> Error {
        let raw = unsafe { (self.symbols.last_error_code)() };
        let message = unsafe { copy_static_str((self.symbols.last_error_message)()) };
        let code = ErrorCode::from_raw(raw).unwrap_or(ErrorCode::InternalError);
        Error::Core {
            code,
            message: message.unwrap_or_else(|| code.message().to_string()),
        }
    }
}

/// A string owned by the library until this guard drops
pub struct OwnedResult<'lib> {
    ptr: *mut c_char,
    free: FreeResultFn,
    _library: PhantomData<&'lib CoreLibrary>,
}

impl OwnedResult<'_> {
    /// Borrow the raw C string
    pub fn as_c_str(&self) -> &CStr {
        unsafe { CStr::from_ptr(self.ptr) }
    }

    /// Borrow as UTF-8 text
    pub fn to_str(&self) -> Result<&str> {
        Ok(self.as_c_str().to_str()?)
    }

    /// Copy out as an owned `String`, releasing the library buffer
    pub fn into_string(self) -> Result<String> {
        let text = self.to_str()?.to_owned();
        Ok(text)
    }
}

impl Drop for OwnedResult<'_> {
    fn drop(&mut self) {
        unsafe { (self.free)(self.ptr) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::require_library;

    #[test]
    fn test_missing_library_is_a_load_error() {
        let err = CoreLibrary::open("/nonexistent/libexample.so").unwrap_err();
        assert!(matches!(err, Error::LibraryLoad { .. }));
        assert!(err.to_string().contains("/nonexistent/libexample.so"));
    }

    #[test]
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    fn test_library_without_interface_is_rejected() {
        // Loadable, but exports none of our symbols
        match CoreLibrary::open("libc.so.6") {
            Err(Error::MissingSymbol { name, .. }) => assert_eq!(name, "sobind_abi_version"),
            result => panic!("unexpected result: {:?}", result),
        }
    }

    #[test]
    fn test_calls_through_built_library() {
        let lib = require_library!();

        assert_eq!(lib.factorial(10).unwrap(), 3_628_800);
        assert_eq!(lib.greet("World").unwrap(), "Hello, World!");
        assert_eq!(lib.repeat_string("ha", 3).unwrap(), "hahaha");
        assert_eq!(lib.repeat_string("ha", 0).unwrap(), "");
        assert_eq!(
            lib.sort_json_array("[3,1,4,1,5,9,2,6]").unwrap(),
            "[1,1,2,3,4,5,6,9]"
        );
        assert!(lib.version().contains("sobind"));
    }

    #[test]
    fn test_library_errors_become_adapter_errors() {
        let lib = require_library!();

        match lib.factorial(-1) {
            Err(Error::Core { code, .. }) => assert_eq!(code, ErrorCode::InvalidArgument),
            other => panic!("unexpected result: {:?}", other),
        }
        match lib.sort_json_array("not json") {
            Err(Error::Core { code, message }) => {
                assert_eq!(code, ErrorCode::JsonError);
                assert!(message.contains("JSON"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(lib.greet("a\0b"), Err(Error::Nul(_))));
    }

    #[test]
    fn test_inspect_reads_descriptor() {
        let descriptor = CoreLibrary::inspect(crate::test_support::library_path()).unwrap();
        assert_eq!(descriptor, InterfaceDescriptor::current());
    }

    #[test]
    #[serial_test::serial]
    fn test_seeded_maybe_through_library() {
        let lib = require_library!();

        lib.seed_random(11);
        let first: Vec<bool> = (0..32).map(|_| lib.maybe()).collect();
        lib.seed_random(11);
        let second: Vec<bool> = (0..32).map(|_| lib.maybe()).collect();
        lib.reseed_from_entropy();

        assert_eq!(first, second);
    }
}
