mod commands;
mod context;
mod examples;
mod output;
mod scanner;
mod theme;

use anyhow::Result;
use clap::{ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::control::ShouldColorize;

use commands::{fields, list, resolve, show};
use examples::{ExampleGroup, render_examples};
use output::{GlobalOptions, OutputFormat, OutputManager};

const ENVIRONMENT_HELP: &str = "\
Environment:
  RUST_LOG   Log filter for diagnostics (defaults to warn, or debug with --verbose)
  NO_COLOR   Disable colored output

Shard/replica defaults and scan directories are read from esmap.toml next to Cargo.toml.
Run 'esmap <command> --help' for examples.";

/// Inspect Elasticsearch mappings derived from SearchRecord types.
///
/// Records are found by reading `#[derive(SearchRecord)]` structs from source, so the
/// project does not need to build first.
#[derive(Parser)]
#[command(name = "esmap", version, arg_required_else_help = true, after_long_help = ENVIRONMENT_HELP)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print scan and config details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List SearchRecord types with their index and mapping type names
    List(list::ListArgs),
    /// Print the index creation body for a record
    Show(show::ShowArgs),
    /// Show every property of a record with its field path
    Fields(fields::FieldsArgs),
    /// Translate a record field path into a property path
    Resolve(resolve::ResolveArgs),
}

const COMMAND_EXAMPLES: [(&str, &[ExampleGroup]); 4] = [
    ("list", list::EXAMPLES),
    ("show", show::EXAMPLES),
    ("fields", fields::EXAMPLES),
    ("resolve", resolve::EXAMPLES),
];

fn cli_command() -> Command {
    let color = if ShouldColorize::from_env().should_colorize() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    COMMAND_EXAMPLES.iter().fold(
        Cli::command().styles(theme::help_styles()).color(color),
        |command, (name, groups)| command.mut_subcommand(*name, |sub| sub.after_long_help(render_examples(groups))),
    )
}

fn main() {
    let matches = cli_command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    if let Err(err) = execute(cli.command, &output) {
        output.error(&format!("Error: {err:#}"));
        std::process::exit(1);
    }
}

fn execute(command: Commands, output: &OutputManager) -> Result<()> {
    match command {
        Commands::List(args) => list::handle_list(args, output),
        Commands::Show(args) => show::handle_show(args, output),
        Commands::Fields(args) => fields::handle_fields(args, output),
        Commands::Resolve(args) => resolve::handle_resolve(args, output),
    }
}
