//! Interface command handler
//!
//! Reads the descriptor without the load-time check so that an incompatible
//! library can still be examined, then reports whether it would be accepted.

use crate::adapter::{self, CoreLibrary};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use serde::Serialize;
use sobind_core::InterfaceDescriptor;
use std::path::{Path, PathBuf};

/// Compatibility report for machine formats
#[derive(Debug, Serialize)]
pub struct InterfaceReport {
    pub path: PathBuf,
    pub compatible: bool,
    pub mismatch: Option<String>,
    pub descriptor: InterfaceDescriptor,
}

impl InterfaceReport {
    /// Compare `descriptor` with the one this binary was built against
    pub fn new(path: PathBuf, descriptor: InterfaceDescriptor) -> Self {
        let mismatch = InterfaceDescriptor::current()
            .check_compatible(&descriptor)
            .err()
            .map(|e| e.to_string());

        Self {
            path,
            compatible: mismatch.is_none(),
            mismatch,
            descriptor,
        }
    }
}

/// Handle the interface command
pub fn handle_interface(flag: Option<&Path>, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let path = super::utils::resolve_library_path(flag, config);
    let descriptor = CoreLibrary::inspect(&path)?;
    let report = InterfaceReport::new(path, descriptor);
    write_report(&report, output)?;

    match InterfaceDescriptor::current().check_compatible(&report.descriptor) {
        Ok(()) => Ok(()),
        Err(e) => Err(Error::Adapter(adapter::Error::Incompatible(e))),
    }
}

fn write_report(report: &InterfaceReport, output: &mut OutputWriter) -> Result<()> {
    if !output.is_human() {
        return output.data(report);
    }

    output.writeln(&format!("path: {}", report.path.display()))?;
    output.interface(&report.descriptor)?;
    match &report.mismatch {
        None => output.success("compatible: yes"),
        Some(reason) => output.warning(&format!("compatible: no ({})", reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::test_support::buffered_writer;
    use sobind_core::{AbiType, SymbolSpec};

    #[test]
    fn test_report_for_current_descriptor() {
        let report = InterfaceReport::new(
            PathBuf::from("libexample.so"),
            InterfaceDescriptor::current(),
        );
        assert!(report.compatible);
        assert_eq!(report.mismatch, None);
    }

    #[test]
    fn test_report_names_changed_symbol() {
        let mut descriptor = InterfaceDescriptor::current();
        let greet = descriptor
            .symbols
            .iter_mut()
            .find(|s| s.name == "greet")
            .unwrap();
        *greet = SymbolSpec {
            name: "greet".to_string(),
            params: vec![AbiType::CStr],
            returns: AbiType::StaticCStr,
        };

        let report = InterfaceReport::new(PathBuf::from("libexample.so"), descriptor);
        assert!(!report.compatible);
        assert!(report.mismatch.unwrap().contains("greet"));
    }

    #[test]
    fn test_human_report_warns_on_mismatch() {
        let mut descriptor = InterfaceDescriptor::current();
        descriptor.symbols.retain(|s| s.name != "maybe");
        let report = InterfaceReport::new(PathBuf::from("/lib/libexample.so"), descriptor);

        let (mut out, buffer) = buffered_writer(OutputFormat::Human, false);
        write_report(&report, &mut out).unwrap();

        let text = buffer.contents();
        assert!(text.starts_with("path: /lib/libexample.so\nlibrary: example\n"));
        assert!(text.contains("WARNING: compatible: no"));
        assert!(text.contains("maybe"));
    }

    #[test]
    fn test_json_report_shape() {
        let report = InterfaceReport::new(
            PathBuf::from("libexample.so"),
            InterfaceDescriptor::current(),
        );
        let (mut out, buffer) = buffered_writer(OutputFormat::Json, false);
        write_report(&report, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_str(&buffer.contents()).unwrap();
        assert_eq!(value["compatible"], true);
        assert!(value["mismatch"].is_null());
        assert_eq!(value["descriptor"]["abi_version"], 1);
    }
}
