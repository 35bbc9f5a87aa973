use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use esmap::{PropertySchema, SchemaDocument, build_schema};
use serde::Serialize;

use crate::commands::{find_descriptor, load_catalog};
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};
use crate::scanner::RecordCatalog;
use crate::theme::CHECK;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Field Paths",
    commands: &[
        "esmap fields User                # Record field to property path table",
        "esmap fields User --output json  # Same, as JSON rows",
    ],
}];

#[derive(Args)]
pub struct FieldsArgs {
    /// Record type name, e.g. UserProfile
    pub record: String,
}

#[derive(Debug, Serialize)]
pub struct FieldRow {
    pub logical_path: String,
    pub property_path: String,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    pub sortable: bool,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct FieldTable(pub Vec<FieldRow>);

impl TableDisplay for FieldTable {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(
            options,
            &mut table,
            &["Field", "Property", "Type", "Analyzer", "Sortable"],
        );
        for row in &self.0 {
            table.add_row(vec![
                Cell::new(&row.logical_path),
                Cell::new(&row.property_path),
                Cell::new(&row.property_type),
                Cell::new(row.analyzer.as_deref().unwrap_or("")),
                Cell::new(if row.sortable { CHECK } else { "" }),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|row| format!("{}={}", row.logical_path, row.property_path))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One row per property, depth first, pairing record field paths with property paths.
pub fn field_rows(schema: &SchemaDocument) -> FieldTable {
    let mut rows = Vec::new();
    collect_rows(&schema.properties, "", "", &mut rows);
    FieldTable(rows)
}

fn collect_rows(
    properties: &BTreeMap<String, PropertySchema>,
    logical_prefix: &str,
    property_prefix: &str,
    rows: &mut Vec<FieldRow>,
) {
    for (name, property) in properties {
        let logical_path = join(logical_prefix, &property.field_name);
        let property_path = join(property_prefix, name);
        rows.push(FieldRow {
            logical_path: logical_path.clone(),
            property_path: property_path.clone(),
            property_type: property.property_type.as_str().to_string(),
            analyzer: property.analyzer.clone(),
            sortable: property.is_sortable(),
        });
        collect_rows(&property.properties, &logical_path, &property_path, rows);
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn rows_for(catalog: &RecordCatalog, record: &str) -> Result<(FieldTable, Option<String>)> {
    let descriptor = find_descriptor(catalog, record)?;
    let (schema, error) = build_schema(&descriptor).into_parts();
    Ok((field_rows(&schema), error.map(|err| err.to_string())))
}

pub fn handle_fields(args: FieldsArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let catalog = load_catalog(&ctx, output)?;

    let (table, error) = rows_for(&catalog, &args.record)?;
    if let Some(error) = error {
        output.warning(&format!("{}: {error}", args.record));
    }

    output.heading(&format!("Fields of {}", args.record));
    if table.0.is_empty() {
        output.info("Record has no mapped fields.");
        return Ok(());
    }
    output.display(&table)
}
