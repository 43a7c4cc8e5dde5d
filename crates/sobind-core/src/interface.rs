//! Versioned description of the exported C interface
//!
//! The library publishes this descriptor as JSON through `sobind_interface`.
//! A caller compares it with the descriptor it was compiled against before
//! resolving any operation symbol, so a mismatched library fails at load
//! time with a named symbol instead of deep inside a call.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Version of the C ABI; bumped on any incompatible signature change
pub const ABI_VERSION: u32 = 1;

/// Name of the shared library (`libexample.so`, `example.dll`, ...)
pub const LIBRARY_NAME: &str = "example";

/// Text encoding of every string crossing the boundary
pub const ENCODING: &str = "UTF-8";

/// C-level types that appear in exported signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbiType {
    /// No value
    Void,
    /// `int`
    I32,
    /// `int64_t` / `long long`
    I64,
    /// `uint32_t`
    U32,
    /// `uint64_t`
    U64,
    /// Borrowed NUL-terminated UTF-8 input
    CStr,
    /// Heap string the caller must release with `free_result`
    OwnedCStr,
    /// Library-owned string that must never be freed
    StaticCStr,
    /// `SobindErrorCode`
    ErrorCode,
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AbiType::Void => "void",
            AbiType::I32 => "int",
            AbiType::I64 => "int64_t",
            AbiType::U32 => "uint32_t",
            AbiType::U64 => "uint64_t",
            AbiType::CStr => "const char*",
            AbiType::OwnedCStr => "char* (owned)",
            AbiType::StaticCStr => "const char* (static)",
            AbiType::ErrorCode => "SobindErrorCode",
        };
        f.write_str(name)
    }
}

/// Signature of one exported symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSpec {
    /// Exported symbol name
    pub name: String,
    /// Parameter types in order
    pub params: Vec<AbiType>,
    /// Return type
    pub returns: AbiType,
}

impl SymbolSpec {
    fn new(name: &str, params: &[AbiType], returns: AbiType) -> Self {
        Self {
            name: name.to_string(),
            params: params.to_vec(),
            returns,
        }
    }

    /// Whether the symbol hands back memory the caller must free
    pub fn allocates(&self) -> bool {
        self.returns == AbiType::OwnedCStr
    }
}

impl fmt::Display for SymbolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} {}({})", self.returns, self.name, params)
    }
}

/// The full exported surface of one library build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    /// Library name without platform prefix or suffix
    pub library: String,
    /// ABI version, see [`ABI_VERSION`]
    pub abi_version: u32,
    /// String encoding, always UTF-8
    pub encoding: String,
    /// Exported symbols
    pub symbols: Vec<SymbolSpec>,
}

impl InterfaceDescriptor {
    /// Descriptor of this build
    pub fn current() -> Self {
        use AbiType::*;

        Self {
            library: LIBRARY_NAME.to_string(),
            abi_version: ABI_VERSION,
            encoding: ENCODING.to_string(),
            symbols: vec![
                SymbolSpec::new("factorial", &[I64], I64),
                SymbolSpec::new("greet", &[CStr], OwnedCStr),
                SymbolSpec::new("repeat_string", &[CStr, I64], OwnedCStr),
                SymbolSpec::new("shout_it", &[CStr], Void),
                SymbolSpec::new("maybe", &[], I32),
                SymbolSpec::new("sort_json_array", &[CStr], OwnedCStr),
                SymbolSpec::new("free_result", &[OwnedCStr], Void),
                SymbolSpec::new("sobind_last_error_code", &[], ErrorCode),
                SymbolSpec::new("sobind_last_error_message", &[], StaticCStr),
                SymbolSpec::new("sobind_clear_error", &[], Void),
                SymbolSpec::new("sobind_seed_random", &[U64], Void),
                SymbolSpec::new("sobind_reseed_from_entropy", &[], Void),
                SymbolSpec::new("sobind_abi_version", &[], U32),
                SymbolSpec::new("sobind_interface", &[], StaticCStr),
                SymbolSpec::new("sobind_version", &[], StaticCStr),
            ],
        }
    }

    /// Look up a symbol by name
    pub fn symbol(&self, name: &str) -> Option<&SymbolSpec> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Parse a descriptor published by a library
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check that `found` provides everything `self` expects
    ///
    /// Extra symbols in `found` are fine. The first missing symbol or
    /// differing signature is reported.
    pub fn check_compatible(&self, found: &InterfaceDescriptor) -> Result<()> {
        if self.abi_version != found.abi_version {
            return Err(Error::InterfaceMismatch {
                symbol: "sobind_abi_version".to_string(),
                expected: format!("ABI v{}", self.abi_version),
                found: format!("ABI v{}", found.abi_version),
            });
        }

        if !self.encoding.eq_ignore_ascii_case(&found.encoding) {
            return Err(Error::InterfaceMismatch {
                symbol: "encoding".to_string(),
                expected: self.encoding.clone(),
                found: found.encoding.clone(),
            });
        }

        for expected in &self.symbols {
            match found.symbol(&expected.name) {
                None => {
                    return Err(Error::InterfaceMismatch {
                        symbol: expected.name.clone(),
                        expected: expected.to_string(),
                        found: "nothing".to_string(),
                    })
                }
                Some(actual) if actual != expected => {
                    return Err(Error::InterfaceMismatch {
                        symbol: expected.name.clone(),
                        expected: expected.to_string(),
                        found: actual.to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}
