//! CLI entry point for `schema2model`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{debug, info};
use schema2model::generator::enums::RandomIdentifiers;
use schema2model::generator::naming::NamingConvention;
use schema2model::generator::{self, GeneratorOptions};
use schema2model::output::formatter;
use schema2model::parser::snapshot;

#[derive(Parser)]
#[command(
    name = "schema2model",
    about = "Infer ORM relationships and enum types from a relational schema"
)]
struct Cli {
    /// Input schema files (.sql DDL or .json snapshots)
    #[arg(required_unless_present = "schema_dir")]
    input: Vec<PathBuf>,

    /// Process all .sql and .json files in directory
    #[arg(long)]
    schema_dir: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "schema2model-output")]
    output_dir: PathBuf,

    /// Name relationship attributes in lowerCamelCase
    #[arg(long)]
    camel_case: bool,

    /// Print verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut input_files = cli.input.clone();
    if let Some(dir) = &cli.schema_dir {
        match std::fs::read_dir(dir) {
            Ok(entries) => {
                let mut found: Vec<PathBuf> = entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|path| path.extension().is_some_and(|e| e == "sql" || e == "json"))
                    .collect();
                found.sort();
                input_files.extend(found);
            }
            Err(e) => {
                eprintln!("Error reading schema directory: {e}");
                process::exit(2);
            }
        }
    }

    if input_files.is_empty() {
        eprintln!("No input schema files provided");
        process::exit(2);
    }

    let schema = match snapshot::load_schema(&input_files) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };
    info!("Loaded {} tables from {} files", schema.tables.len(), input_files.len());

    let options = GeneratorOptions {
        convention: if cli.camel_case {
            NamingConvention::CamelCase
        } else {
            NamingConvention::SnakeCase
        },
        ..GeneratorOptions::default()
    };
    debug!("Naming convention: {:?}", options.convention);

    let output = match generator::generate(&schema, &options, &mut RandomIdentifiers::from_entropy())
    {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Generation error: {e}");
            process::exit(2);
        }
    };

    let name = input_files
        .first()
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    if let Err(e) = formatter::write_output(&cli.output_dir, name, &schema, &output) {
        eprintln!("Error writing output: {e}");
        process::exit(2);
    }
}
