use anyhow::{Context, Result};
use clap::Args;
use esmap::{build_schema, resolve_field_path, resolve_sort_path};
use serde::Serialize;

use crate::commands::{find_descriptor, load_catalog};
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputFormat, OutputManager};
use crate::scanner::RecordCatalog;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Resolve Paths",
    commands: &[
        "esmap resolve User Name.Title    # Property path for a record field path",
        "esmap resolve User Nick --sort   # Path to sort on (adds .raw when sortable)",
    ],
}];

#[derive(Args)]
pub struct ResolveArgs {
    /// Record type name, e.g. UserProfile
    pub record: String,

    /// Dotted path of record field names, e.g. Name.Title
    pub path: String,

    /// Resolve the path to sort on
    #[arg(long)]
    pub sort: bool,
}

#[derive(Debug, Serialize)]
pub struct ResolvedPath {
    pub record: String,
    pub logical_path: String,
    pub property_path: String,
}

pub fn resolve_path(catalog: &RecordCatalog, record: &str, path: &str, sort: bool) -> Result<ResolvedPath> {
    let descriptor = find_descriptor(catalog, record)?;
    let schema = build_schema(&descriptor).into_value();
    let resolved = if sort {
        resolve_sort_path(&schema, path)
    } else {
        resolve_field_path(&schema, path)
    };
    let property_path = resolved.with_context(|| format!("Cannot resolve {path} on {record}"))?;
    Ok(ResolvedPath {
        record: record.to_string(),
        logical_path: path.to_string(),
        property_path,
    })
}

pub fn handle_resolve(args: ResolveArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let catalog = load_catalog(&ctx, output)?;
    let resolved = resolve_path(&catalog, &args.record, &args.path, args.sort)?;

    if output.options.quiet {
        return Ok(());
    }
    match output.options.output_format {
        OutputFormat::Table => {
            output.key_value("record", &resolved.record);
            output.key_value("field", &resolved.logical_path);
            output.key_value("property", &resolved.property_path);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
        OutputFormat::Compact => println!("{}", resolved.property_path),
    }
    Ok(())
}
