use std::path::{Path, PathBuf};

use crate::error::GenerationError;
use crate::parser::schema::Schema;
use crate::parser::sql_parser;

/// Parse a JSON schema snapshot (`{"tables": [...]}`).
pub fn parse_json_schema(json: &str) -> Result<Schema, GenerationError> {
    serde_json::from_str(json)
        .map_err(|e| GenerationError::SchemaParse(format!("Invalid schema snapshot JSON: {e}")))
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Load and merge schema inputs.
///
/// JSON snapshots contribute their tables in file order; all SQL files are
/// concatenated and parsed as one script so cross-file references resolve.
pub fn load_schema(paths: &[PathBuf]) -> Result<Schema, GenerationError> {
    let mut schema = Schema::default();
    let mut combined_sql = String::new();

    for path in paths {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GenerationError::Io(format!("Error reading {}: {e}", path.display())))?;
        if is_json(path) {
            schema.tables.extend(parse_json_schema(&content)?.tables);
        } else {
            combined_sql.push_str(&content);
            combined_sql.push('\n');
        }
    }

    if !combined_sql.trim().is_empty() {
        schema
            .tables
            .extend(sql_parser::parse_schema(&combined_sql)?.tables);
    }
    Ok(schema)
}
