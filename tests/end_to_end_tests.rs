mod support;

use schema2model::generator::emit;
use schema2model::generator::GeneratorOptions;
use schema2model::output::{formatter, report};

use support::generate_fixture;

/// Full pipeline for the shop schema: parse, resolve, render.
/// This is the primary acceptance test.
#[test]
fn end_to_end_shop() {
    let (schema, output) = generate_fixture("shop", &GeneratorOptions::default());
    assert_eq!(schema.tables.len(), 9, "Should parse all 9 tables");
    assert_eq!(output.registry.len(), 14);
    assert!(output.registry.ternary_tables().is_empty());

    let module = emit::render_model_module(&schema, &output);
    insta::assert_snapshot!("shop_models", module.trim());

    let json = formatter::render_json(&schema, &output).expect("json should render");
    insta::assert_snapshot!("shop_relationships", json.trim());

    let report = report::build_report(&schema, &output);
    insta::assert_snapshot!("shop_report", report.trim());
}

/// Bridge-shaped table over three targets: every key stays a plain relationship.
#[test]
fn end_to_end_ternary() {
    let (schema, output) = generate_fixture("ternary", &GeneratorOptions::default());
    assert_eq!(output.registry.len(), 6);
    assert!(output.enums.is_empty());

    let module = emit::render_model_module(&schema, &output);
    insta::assert_snapshot!("ternary_models", module.trim());

    let json = formatter::render_json(&schema, &output).expect("json should render");
    insta::assert_snapshot!("ternary_relationships", json.trim());

    let report = report::build_report(&schema, &output);
    insta::assert_snapshot!("ternary_report", report.trim());
}

#[test]
fn end_to_end_json_lists_tables_in_schema_order() {
    let (schema, output) = generate_fixture("shop", &GeneratorOptions::default());
    let json = formatter::render_json(&schema, &output).expect("json should render");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json should parse");

    let tables: Vec<&str> = value["tables"]
        .as_array()
        .expect("tables array")
        .iter()
        .map(|t| t["table"].as_str().expect("table name"))
        .collect();
    assert_eq!(tables[0], "users");
    assert_eq!(tables[8], "employee_relationships");

    let orders_end = &value["tables"][0]["relationships"][1];
    assert_eq!(orders_end["attribute_name"], "orders");
    assert!(orders_end.get("secondary_table").is_none());
}
