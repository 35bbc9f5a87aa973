//! Record scanning: finds `#[derive(SearchRecord)]` structs in source and turns them into
//! the descriptors the derive would generate, without compiling the project.

mod descriptors;
mod discovery;
mod parser;

use anyhow::{Context, Result};

use crate::context::ProjectContext;

pub use descriptors::RecordCatalog;
pub use discovery::discover_records;
pub use parser::{ScannedRecord, parse_record_file};
#[cfg(test)]
pub use parser::parse_record_source;

/// Scans the project's configured directories. Duplicate record names are returned
/// separately so the caller can report them.
pub fn scan_project(ctx: &ProjectContext) -> Result<(RecordCatalog, Vec<ScannedRecord>)> {
    let files = discover_records(&ctx.project_root, &ctx.scan_dirs()).context("Failed to discover record files")?;

    let mut scanned = Vec::new();
    for file in &files {
        scanned.extend(parse_record_file(&file.path, &file.relative_path)?);
    }
    log::debug!("scanned {} records from {} files", scanned.len(), files.len());

    Ok(RecordCatalog::new(scanned))
}
