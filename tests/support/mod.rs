#![allow(dead_code)]

use std::path::PathBuf;

use schema2model::generator::enums::RandomIdentifiers;
use schema2model::generator::{self, GenerationOutput, GeneratorOptions};
use schema2model::parser::schema::{Schema, TableId};
use schema2model::parser::{snapshot, sql_parser};

pub(crate) fn fixture_dir(fixture: &str) -> PathBuf {
    PathBuf::from("tests/fixtures").join(fixture)
}

pub(crate) fn read_fixture_sql(fixture: &str) -> String {
    let path = fixture_dir(fixture).join("input.sql");
    std::fs::read_to_string(path).expect("fixture SQL should be readable")
}

pub(crate) fn parse_fixture_schema(fixture: &str) -> Schema {
    sql_parser::parse_schema(&read_fixture_sql(fixture)).expect("fixture SQL should parse")
}

pub(crate) fn load_fixture_snapshot(fixture: &str) -> Schema {
    let path = fixture_dir(fixture).join("input.json");
    snapshot::load_schema(&[path]).expect("fixture snapshot should load")
}

pub(crate) fn generate_fixture(fixture: &str, options: &GeneratorOptions) -> (Schema, GenerationOutput) {
    let schema = parse_fixture_schema(fixture);
    let output = generator::generate(&schema, options, &mut RandomIdentifiers::seeded(42))
        .expect("fixture should generate");
    (schema, output)
}

pub(crate) fn table(name: &str) -> TableId {
    TableId::new(None, name)
}

pub(crate) fn attribute_names(output: &GenerationOutput, table_name: &str) -> Vec<String> {
    output
        .registry
        .get(&table(table_name))
        .iter()
        .map(|d| d.attribute_name.clone())
        .collect()
}

pub(crate) fn unique_temp_dir(prefix: &str) -> PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{nanos}"));
    std::fs::create_dir_all(&dir).expect("should create temp dir");
    dir
}
