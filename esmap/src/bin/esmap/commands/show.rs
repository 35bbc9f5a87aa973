use anyhow::{Context, Result};
use clap::Args;
use esmap::{IndexDefinition, IndexSettings, MappingError, Partial, build_schema, naming};

use crate::commands::{find_descriptor, load_catalog};
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputFormat, OutputManager};
use crate::scanner::RecordCatalog;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Index Definitions",
    commands: &[
        "esmap show User                  # Index creation body for User",
        "esmap show User --shards 3       # Override the configured shard count",
        "esmap show User --output compact # Single-line JSON, e.g. for curl",
    ],
}];

#[derive(Args)]
pub struct ShowArgs {
    /// Record type name, e.g. UserProfile
    pub record: String,

    /// Number of primary shards (overrides esmap.toml)
    #[arg(long)]
    pub shards: Option<u32>,

    /// Number of replicas (overrides esmap.toml)
    #[arg(long)]
    pub replicas: Option<u32>,
}

/// Index name and definition for one scanned record.
pub fn definition_for(
    catalog: &RecordCatalog,
    record: &str,
    settings: IndexSettings,
) -> Result<(String, Partial<IndexDefinition>)> {
    let descriptor = find_descriptor(catalog, record)?;
    let (schema, schema_error) = build_schema(&descriptor).into_parts();
    let (definition, build_error) = IndexDefinition::builder()
        .settings(settings)
        .mapping(naming::type_name(record), schema)
        .build()
        .into_parts();
    Ok((
        naming::index_name(record),
        Partial::with_error(definition, schema_error.or(build_error)),
    ))
}

pub fn handle_show(args: ShowArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let catalog = load_catalog(&ctx, output)?;
    output.verbose(&format!("settings from {}", ctx.config_path.display()));

    let settings = ctx.index_settings(args.shards, args.replicas);
    let (index, definition) = definition_for(&catalog, &args.record, settings)?;
    let (definition, error) = definition.into_parts();

    output.heading(&format!("Index definition for {}", args.record));
    if output.options.output_format == OutputFormat::Table && !output.options.quiet {
        output.key_value("index", &index);
        println!();
    }
    if !output.options.quiet {
        let body = match output.options.output_format {
            OutputFormat::Compact => serde_json::to_string(&definition)?,
            OutputFormat::Table | OutputFormat::Json => serde_json::to_string_pretty(&definition)?,
        };
        println!("{body}");
    }

    report_schema_error(error, &args.record)
}

fn report_schema_error(error: Option<MappingError>, record: &str) -> Result<()> {
    match error {
        Some(err) => Err(err).with_context(|| format!("Mapping for {record} is incomplete")),
        None => Ok(()),
    }
}
