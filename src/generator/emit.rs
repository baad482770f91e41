use std::fmt::Write;

use crate::classifier::cardinality::RelationType;
use crate::generator::enums::EnumDescriptor;
use crate::generator::relationships::{ColumnRef, RelationshipDescriptor};
use crate::generator::GenerationOutput;
use crate::parser::names::class_name;
use crate::parser::schema::{Literal, Schema};

/// How an argument is passed at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Passed by position.
    Positional,
    /// Passed as `name=value`.
    Keyword,
}

/// One parameter of an emitted call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name.
    pub name: &'static str,
    /// Passing style.
    pub kind: ParamKind,
    /// Rendered default; an argument equal to it is left out.
    pub default: Option<&'static str>,
}

/// Parameter list of a callable the generated code invokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSignature {
    /// Name of the callable.
    pub callee: &'static str,
    /// Parameters in declaration order.
    pub params: Vec<Param>,
}

impl CallSignature {
    /// Keyword arguments of the model library's `Relationship(...)` helper.
    pub fn relationship() -> Self {
        let keyword = |name: &'static str| Param {
            name,
            kind: ParamKind::Keyword,
            default: Some("None"),
        };
        Self {
            callee: "Relationship",
            params: vec![
                keyword("back_populates"),
                keyword("link_model"),
                keyword("sa_relationship_kwargs"),
            ],
        }
    }

    /// Render a call with the given `(name, rendered value)` arguments.
    ///
    /// Arguments follow parameter order; names the signature does not know
    /// and values equal to the default are dropped.
    pub fn render(&self, args: &[(&str, String)]) -> String {
        let rendered: Vec<String> = self
            .params
            .iter()
            .filter_map(|param| {
                let (_, value) = args.iter().find(|(name, _)| *name == param.name)?;
                if param.default == Some(value.as_str()) {
                    return None;
                }
                Some(match param.kind {
                    ParamKind::Positional => value.clone(),
                    ParamKind::Keyword => format!("{}={value}", param.name),
                })
            })
            .collect();
        format!("{}({})", self.callee, rendered.join(", "))
    }
}

/// Source form of a literal value.
pub fn literal_repr(value: &Literal) -> String {
    match value {
        Literal::Text(text) => {
            let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
            format!("'{escaped}'")
        }
        Literal::Integer(int) => int.to_string(),
        Literal::Float(float) => format!("{float:?}"),
        Literal::Boolean(true) => "True".to_string(),
        Literal::Boolean(false) => "False".to_string(),
        Literal::Null => "None".to_string(),
    }
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

fn column_list(refs: &[ColumnRef]) -> String {
    let joined: Vec<String> = refs.iter().map(ToString::to_string).collect();
    quoted(&format!("[{}]", joined.join(", ")))
}

/// Render an enum class with one `member = literal` line per member.
pub fn render_enum(descriptor: &EnumDescriptor) -> String {
    let mut out = String::new();
    writeln!(out, "class {}(Enum):", descriptor.name).unwrap();
    if descriptor.members.is_empty() {
        writeln!(out, "    pass").unwrap();
    }
    for member in descriptor.members.iter() {
        writeln!(out, "    {} = {}", member.name, literal_repr(&member.value)).unwrap();
    }
    out
}

fn type_annotation(descriptor: &RelationshipDescriptor) -> String {
    let target = quoted(&descriptor.target_class);
    match descriptor.relation_type {
        RelationType::OneToMany | RelationType::ManyToMany => format!("List[{target}]"),
        _ if descriptor.nullable => format!("Optional[{target}]"),
        _ => target,
    }
}

fn sa_kwargs(descriptor: &RelationshipDescriptor) -> Option<String> {
    let mut entries = Vec::new();
    if let Some(refs) = &descriptor.foreign_keys {
        entries.push(format!("\"foreign_keys\": {}", column_list(refs)));
    }
    if let Some(refs) = &descriptor.remote_side {
        entries.push(format!("\"remote_side\": {}", column_list(refs)));
    }
    if let Some(join) = &descriptor.primaryjoin {
        entries.push(format!("\"primaryjoin\": {}", quoted(join)));
    }
    if let Some(join) = &descriptor.secondaryjoin {
        entries.push(format!("\"secondaryjoin\": {}", quoted(join)));
    }
    (!entries.is_empty()).then(|| format!("{{{}}}", entries.join(", ")))
}

/// Render one relationship attribute line (without indentation).
pub fn render_relationship_attribute(
    descriptor: &RelationshipDescriptor,
    signature: &CallSignature,
) -> String {
    let mut args = vec![("back_populates", quoted(&descriptor.back_populates))];
    if let Some(secondary) = &descriptor.secondary_table {
        args.push(("link_model", secondary.clone()));
    }
    if let Some(kwargs) = sa_kwargs(descriptor) {
        args.push(("sa_relationship_kwargs", kwargs));
    }
    format!(
        "{}: {} = {}",
        descriptor.attribute_name,
        type_annotation(descriptor),
        signature.render(&args)
    )
}

/// Render a model module: imports, enum classes, then one class per table.
pub fn render_model_module(schema: &Schema, output: &GenerationOutput) -> String {
    let signature = CallSignature::relationship();
    let mut out = String::new();
    writeln!(out, "from enum import Enum").unwrap();
    writeln!(out, "from typing import List, Optional").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "from sqlmodel import Field, Relationship, SQLModel").unwrap();

    for descriptor in &output.enums {
        write!(out, "\n\n{}", render_enum(descriptor)).unwrap();
    }

    for table in &schema.tables {
        writeln!(out, "\n\nclass {}(SQLModel, table=True):", class_name(table.name())).unwrap();
        writeln!(out, "    __tablename__ = {}", quoted(table.name())).unwrap();
        if let Some(db_schema) = &table.id.schema {
            writeln!(out, "    __table_args__ = {{\"schema\": {}}}", quoted(db_schema)).unwrap();
        }
        let relationships = output.registry.get(&table.id);
        if !relationships.is_empty() {
            writeln!(out).unwrap();
        }
        for descriptor in relationships {
            writeln!(
                out,
                "    {}",
                render_relationship_attribute(descriptor, &signature)
            )
            .unwrap();
        }
    }
    out
}
