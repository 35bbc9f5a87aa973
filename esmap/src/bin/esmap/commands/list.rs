use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use esmap::{build_schema, collect_analyzers, naming};
use serde::Serialize;

use crate::commands::load_catalog;
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputFormat, OutputManager, TableDisplay, add_table_header, create_table};
use crate::scanner::RecordCatalog;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "List Records",
    commands: &[
        "esmap list                       # All records in the scan directories",
        "esmap list --output json         # Machine-readable summary",
    ],
}];

#[derive(Args)]
pub struct ListArgs {}

#[derive(Debug, Serialize)]
pub struct RecordSummary {
    pub record: String,
    pub file: String,
    pub line: usize,
    pub index: String,
    pub type_name: String,
    pub properties: usize,
    pub analyzers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RecordList(pub Vec<RecordSummary>);

impl TableDisplay for RecordList {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(
            options,
            &mut table,
            &["Record", "Index", "Type", "Properties", "Analyzers", "Location"],
        );
        for summary in &self.0 {
            let properties = match &summary.error {
                Some(_) => format!("{} (incomplete)", summary.properties),
                None => summary.properties.to_string(),
            };
            table.add_row(vec![
                Cell::new(&summary.record),
                Cell::new(&summary.index),
                Cell::new(&summary.type_name),
                Cell::new(properties),
                Cell::new(summary.analyzers.join(", ")),
                Cell::new(format!("{}:{}", summary.file, summary.line)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|summary| format!("{}={}", summary.record, summary.index))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn summarize(catalog: &RecordCatalog) -> RecordList {
    let summaries = catalog
        .records()
        .filter_map(|record| {
            let descriptor = catalog.descriptor(&record.name)?;
            let (schema, error) = build_schema(&descriptor).into_parts();
            Some(RecordSummary {
                record: record.name.clone(),
                file: record.relative_path.clone(),
                line: record.line,
                index: naming::index_name(&record.name),
                type_name: naming::type_name(&record.name),
                properties: schema.walk().len(),
                analyzers: collect_analyzers(&schema).into_iter().collect(),
                error: error.map(|err| err.to_string()),
            })
        })
        .collect();
    RecordList(summaries)
}

pub fn handle_list(_args: ListArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let catalog = load_catalog(&ctx, output)?;

    output.heading("Search Records");
    if catalog.is_empty() {
        output.info("No SearchRecord types found.");
        return Ok(());
    }

    let list = summarize(&catalog);
    output.display(&list)?;

    let incomplete: Vec<&RecordSummary> = list.0.iter().filter(|summary| summary.error.is_some()).collect();
    if !incomplete.is_empty() && output.options.output_format == OutputFormat::Table {
        output.warning(&format!("{} records have incomplete mappings:", incomplete.len()));
        for summary in incomplete {
            output.bullet(&format!("{}: {}", summary.record, summary.error.as_deref().unwrap_or_default()));
        }
    }
    Ok(())
}
