pub mod fields;
pub mod list;
pub mod resolve;
pub mod show;

use anyhow::{Result, anyhow};
use esmap::RecordDescriptor;

use crate::context::ProjectContext;
use crate::output::OutputManager;
use crate::scanner::{RecordCatalog, scan_project};

/// Scans the project and reports shadowed duplicates.
pub(crate) fn load_catalog(ctx: &ProjectContext, output: &OutputManager) -> Result<RecordCatalog> {
    let (catalog, shadowed) = scan_project(ctx)?;
    for record in shadowed {
        output.warning(&format!(
            "{} in {}:{} ignored, a record with the same name was found first",
            record.name, record.relative_path, record.line
        ));
    }
    output.verbose(&format!(
        "{} records found under {}",
        catalog.len(),
        ctx.config.scan.dirs.join(", ")
    ));
    Ok(catalog)
}

pub(crate) fn find_descriptor(catalog: &RecordCatalog, name: &str) -> Result<RecordDescriptor> {
    catalog.descriptor(name).ok_or_else(|| {
        let known: Vec<&str> = catalog.records().map(|record| record.name.as_str()).collect();
        if known.is_empty() {
            anyhow!("Record {name} not found; no SearchRecord types were found in the scan directories")
        } else {
            anyhow!("Record {name} not found. Known records: {}", known.join(", "))
        }
    })
}
