use std::fmt::Write;

use crate::generator::emit::literal_repr;
use crate::generator::relationships::RelationshipDescriptor;
use crate::generator::GenerationOutput;
use crate::parser::names::class_name;
use crate::parser::schema::Schema;

/// Build a markdown report with per-table relationships, enums, and limitations.
pub fn build_report(schema: &Schema, output: &GenerationOutput) -> String {
    let mut report = String::new();
    writeln!(report, "# schema2model Generation Report").unwrap();
    writeln!(report).unwrap();
    writeln!(
        report,
        "{} tables, {} relationship ends, {} enum types.",
        schema.tables.len(),
        output.registry.len(),
        output.enums.len()
    )
    .unwrap();

    writeln!(report).unwrap();
    writeln!(report, "## Relationships").unwrap();
    for table in &schema.tables {
        let relationships = output.registry.get(&table.id);
        if relationships.is_empty() {
            continue;
        }
        writeln!(report).unwrap();
        writeln!(report, "### {} (`{}`)", class_name(table.name()), table.id).unwrap();
        writeln!(report).unwrap();
        writeln!(report, "| Attribute | Target | Type | Back-populates | Notes |").unwrap();
        writeln!(report, "|-----------|--------|------|----------------|-------|").unwrap();
        for descriptor in relationships {
            writeln!(
                report,
                "| {} | {} | {} | {} | {} |",
                descriptor.attribute_name,
                descriptor.target_class,
                descriptor.relation_type,
                descriptor.back_populates,
                format_notes(descriptor)
            )
            .unwrap();
        }
    }

    if !output.enums.is_empty() {
        writeln!(report).unwrap();
        writeln!(report, "## Enums").unwrap();
        writeln!(report).unwrap();
        for descriptor in &output.enums {
            let members: Vec<String> = descriptor
                .members
                .iter()
                .map(|m| format!("{}={}", m.name, literal_repr(&m.value)))
                .collect();
            writeln!(
                report,
                "- **{}** ({}): {}",
                descriptor.name,
                descriptor.columns.join(", "),
                members.join(", ")
            )
            .unwrap();
        }
    }

    let ternary = output.registry.ternary_tables();
    if !ternary.is_empty() {
        writeln!(report).unwrap();
        writeln!(report, "## Known Limitations").unwrap();
        writeln!(report).unwrap();
        for table in ternary {
            writeln!(
                report,
                "- `{table}` links three or more tables; its foreign keys were mapped as plain relationships."
            )
            .unwrap();
        }
    }

    report
}

fn format_notes(descriptor: &RelationshipDescriptor) -> String {
    let mut notes = Vec::new();
    if let Some(secondary) = &descriptor.secondary_table {
        notes.push(format!("via {secondary}"));
    }
    if descriptor.remote_side.is_some() {
        notes.push("self-referencing".to_string());
    }
    if descriptor.primaryjoin.is_some() {
        notes.push("explicit joins".to_string());
    }
    if descriptor.nullable {
        notes.push("nullable".to_string());
    }
    notes.join("; ")
}
