mod support;

use std::process::Command;

use support::unique_temp_dir;

#[test]
fn cli_writes_all_artifacts_named_after_first_input() {
    let temp = unique_temp_dir("schema2model_cli_ok");
    let output_dir = temp.join("out");

    let status = Command::new(env!("CARGO_BIN_EXE_schema2model"))
        .arg("tests/fixtures/shop/input.sql")
        .arg("--output-dir")
        .arg(&output_dir)
        .status()
        .expect("should run schema2model binary");
    assert!(status.success(), "expected success, got {status:?}");

    for file in ["input_relationships.json", "input_models.py", "input_report.md"] {
        let path = output_dir.join(file);
        assert!(path.exists(), "missing {}", path.display());
    }
    let models = std::fs::read_to_string(output_dir.join("input_models.py"))
        .unwrap_or_else(|e| panic!("failed to read model stub: {e}"));
    assert!(models.contains("sub_categories: List[\"Categories\"]"));
}

#[test]
fn cli_camel_case_flag_changes_attribute_names() {
    let temp = unique_temp_dir("schema2model_cli_camel");
    let output_dir = temp.join("out");

    let status = Command::new(env!("CARGO_BIN_EXE_schema2model"))
        .arg("tests/fixtures/shop/input.sql")
        .arg("--camel-case")
        .arg("--output-dir")
        .arg(&output_dir)
        .status()
        .expect("should run schema2model binary");
    assert!(status.success());

    let models = std::fs::read_to_string(output_dir.join("input_models.py"))
        .unwrap_or_else(|e| panic!("failed to read model stub: {e}"));
    assert!(models.contains("subCategories: List[\"Categories\"]"));
    assert!(!models.contains("sub_categories"));
}

#[test]
fn cli_schema_dir_picks_up_json_snapshots() {
    let temp = unique_temp_dir("schema2model_cli_dir");
    let schema_dir = temp.join("schema");
    std::fs::create_dir_all(&schema_dir).expect("should create schema dir");
    std::fs::copy(
        "tests/fixtures/snapshot/input.json",
        schema_dir.join("snapshot.json"),
    )
    .expect("should copy snapshot");
    std::fs::write(schema_dir.join("notes.txt"), "ignored").expect("should write notes");
    let output_dir = temp.join("out");

    let status = Command::new(env!("CARGO_BIN_EXE_schema2model"))
        .arg("--schema-dir")
        .arg(&schema_dir)
        .arg("--output-dir")
        .arg(&output_dir)
        .status()
        .expect("should run schema2model binary");
    assert!(status.success());

    let json = std::fs::read_to_string(output_dir.join("snapshot_relationships.json"))
        .unwrap_or_else(|e| panic!("failed to read relationships: {e}"));
    assert!(json.contains("\"messages_set\""));
}

#[test]
fn cli_unresolved_reference_exits_with_code_2() {
    let temp = unique_temp_dir("schema2model_cli_unresolved");
    let input_path = temp.join("broken.sql");
    std::fs::write(
        &input_path,
        "CREATE TABLE orders (id INT PRIMARY KEY, user_id INT REFERENCES users (id));",
    )
    .expect("should write input sql");

    let output = Command::new(env!("CARGO_BIN_EXE_schema2model"))
        .arg(&input_path)
        .arg("--output-dir")
        .arg(temp.join("out"))
        .output()
        .expect("should run schema2model binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Foreign key on orders references unknown table users"),
        "unexpected stderr: {stderr}"
    );
    assert!(!temp.join("out").exists(), "no artifacts on failure");
}

#[test]
fn cli_parse_error_exits_with_code_2() {
    let temp = unique_temp_dir("schema2model_cli_parse_err");
    let input_path = temp.join("invalid.sql");
    std::fs::write(&input_path, "not sql").expect("should write invalid sql file");

    let output = Command::new(env!("CARGO_BIN_EXE_schema2model"))
        .arg(&input_path)
        .arg("--output-dir")
        .arg(temp.join("out"))
        .output()
        .expect("should run schema2model binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Schema parse error:"), "unexpected stderr: {stderr}");
}
