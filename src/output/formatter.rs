use std::path::{Component, Path};

use serde::Serialize;

use crate::error::GenerationError;
use crate::generator::emit;
use crate::generator::enums::EnumDescriptor;
use crate::generator::relationships::RelationshipDescriptor;
use crate::generator::GenerationOutput;
use crate::output::report;
use crate::parser::names::class_name;
use crate::parser::schema::Schema;

#[derive(Serialize)]
struct RelationshipDocument<'a> {
    tables: Vec<TableEntry<'a>>,
    enums: &'a [EnumDescriptor],
    ternary_tables: Vec<String>,
}

#[derive(Serialize)]
struct TableEntry<'a> {
    table: String,
    class_name: String,
    relationships: &'a [RelationshipDescriptor],
}

/// Serialize the registry and enums as pretty-printed JSON, tables in schema order.
pub fn render_json(schema: &Schema, output: &GenerationOutput) -> Result<String, GenerationError> {
    let document = RelationshipDocument {
        tables: schema
            .tables
            .iter()
            .map(|table| TableEntry {
                table: table.id.to_string(),
                class_name: class_name(table.name()),
                relationships: output.registry.get(&table.id),
            })
            .collect(),
        enums: &output.enums,
        ternary_tables: output
            .registry
            .ternary_tables()
            .iter()
            .map(ToString::to_string)
            .collect(),
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| GenerationError::Io(format!("Failed to serialize relationships: {e}")))
}

fn write_file(path: &Path, content: &str) -> Result<(), GenerationError> {
    std::fs::write(path, content)
        .map_err(|e| GenerationError::Io(format!("Failed to write {}: {e}", path.display())))
}

/// Write all output files to the specified directory.
pub fn write_output(
    output_dir: &Path,
    name: &str,
    schema: &Schema,
    output: &GenerationOutput,
) -> Result<(), GenerationError> {
    validate_output_name(name)?;

    std::fs::create_dir_all(output_dir)
        .map_err(|e| GenerationError::Io(format!("Failed to create output directory: {e}")))?;

    write_file(
        &output_dir.join(format!("{name}_relationships.json")),
        &render_json(schema, output)?,
    )?;
    write_file(
        &output_dir.join(format!("{name}_models.py")),
        &emit::render_model_module(schema, output),
    )?;
    write_file(
        &output_dir.join(format!("{name}_report.md")),
        &report::build_report(schema, output),
    )?;

    Ok(())
}

fn validate_output_name(name: &str) -> Result<(), GenerationError> {
    let invalid = |reason: &str| GenerationError::Io(format!("Invalid output name '{name}': {reason}"));
    if name.trim().is_empty() {
        return Err(GenerationError::Io(
            "Output name must not be empty".to_string(),
        ));
    }
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return Err(invalid("absolute paths are not allowed"));
    }
    if candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return Err(invalid("traversal segments are not allowed"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("path separators are not allowed"));
    }
    Ok(())
}
