use sqlparser::ast::{
    ColumnOption, CreateTable, Expr, Ident, ObjectName, ReferentialAction, Statement,
    TableConstraint, Value,
};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::GenerationError;
use crate::parser::names::split_schema_and_relation;
use crate::parser::schema::{Column, ForeignKey, Literal, Schema, Table, TableId};

/// Parse SQL DDL into a normalized [`Schema`].
///
/// Only `CREATE TABLE` statements contribute; everything else is skipped.
pub fn parse_schema(sql: &str) -> Result<Schema, GenerationError> {
    let statements = Parser::parse_sql(&PostgreSqlDialect {}, sql)
        .map_err(|e| GenerationError::SchemaParse(e.to_string()))?;

    let mut schema = Schema::default();
    for statement in &statements {
        if let Statement::CreateTable(create) = statement {
            schema.tables.push(table_from_create(create));
        }
    }
    fill_implicit_referred_columns(&mut schema);
    Ok(schema)
}

fn table_id(name: &ObjectName) -> TableId {
    let (schema, relation) = split_schema_and_relation(&name.to_string());
    TableId {
        schema,
        name: relation,
    }
}

fn ident_names(idents: &[Ident]) -> Vec<String> {
    idents.iter().map(|ident| ident.value.clone()).collect()
}

fn action_text(action: Option<&ReferentialAction>) -> Option<String> {
    action.map(ToString::to_string)
}

fn table_from_create(create: &CreateTable) -> Table {
    let mut table = Table::new(table_id(&create.name));

    for def in &create.columns {
        let mut column = Column::new(def.name.value.clone(), def.data_type.to_string());
        for option_def in &def.options {
            match &option_def.option {
                ColumnOption::NotNull => column.nullable = false,
                ColumnOption::Unique {
                    is_primary: true, ..
                } => column = column.primary_key(),
                ColumnOption::Unique {
                    is_primary: false,
                    ..
                } => column.unique = true,
                ColumnOption::ForeignKey {
                    foreign_table,
                    referred_columns,
                    on_delete,
                    on_update,
                    ..
                } => {
                    let referred = table_id(foreign_table);
                    table.foreign_keys.push(ForeignKey {
                        name: option_def.name.as_ref().map(|n| n.value.clone()),
                        constrained_columns: vec![def.name.value.clone()],
                        referred_schema: referred.schema,
                        referred_table: referred.name,
                        referred_columns: ident_names(referred_columns),
                        on_delete: action_text(on_delete.as_ref()),
                        on_update: action_text(on_update.as_ref()),
                        comment: None,
                    });
                }
                ColumnOption::Check(expr) => {
                    if let Some((target, values)) = literal_domain(expr) {
                        if target == column.name {
                            column.enum_values = Some(values);
                        }
                    }
                }
                _ => {}
            }
        }
        table.columns.push(column);
    }

    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey { columns, .. } => {
                for name in ident_names(columns) {
                    if let Some(column) = table.columns.iter_mut().find(|c| c.name == name) {
                        column.primary_key = true;
                        column.nullable = false;
                    }
                }
            }
            TableConstraint::Unique { columns, .. } => {
                let names = ident_names(columns);
                if let [single] = names.as_slice() {
                    if let Some(column) = table.columns.iter_mut().find(|c| &c.name == single) {
                        column.unique = true;
                    }
                } else if !names.is_empty() {
                    table.unique_constraints.push(names);
                }
            }
            TableConstraint::ForeignKey {
                name,
                columns,
                foreign_table,
                referred_columns,
                on_delete,
                on_update,
                ..
            } => {
                let referred = table_id(foreign_table);
                table.foreign_keys.push(ForeignKey {
                    name: name.as_ref().map(|n| n.value.clone()),
                    constrained_columns: ident_names(columns),
                    referred_schema: referred.schema,
                    referred_table: referred.name,
                    referred_columns: ident_names(referred_columns),
                    on_delete: action_text(on_delete.as_ref()),
                    on_update: action_text(on_update.as_ref()),
                    comment: None,
                });
            }
            TableConstraint::Check { expr, .. } => {
                if let Some((target, values)) = literal_domain(expr) {
                    if let Some(column) = table.columns.iter_mut().find(|c| c.name == target) {
                        column.enum_values = Some(values);
                    }
                }
            }
            _ => {}
        }
    }

    table
}

/// `REFERENCES t` without a column list points at `t`'s primary key.
fn fill_implicit_referred_columns(schema: &mut Schema) {
    let mut fills = Vec::new();
    for (table_idx, table) in schema.tables.iter().enumerate() {
        for (fk_idx, fk) in table.foreign_keys.iter().enumerate() {
            if !fk.referred_columns.is_empty() {
                continue;
            }
            if let Some(target) = schema.table(&fk.referred_table_id(&table.id)) {
                let pk: Vec<String> = target.primary_key().into_iter().map(String::from).collect();
                fills.push((table_idx, fk_idx, pk));
            }
        }
    }
    for (table_idx, fk_idx, pk) in fills {
        schema.tables[table_idx].foreign_keys[fk_idx].referred_columns = pk;
    }
}

/// Recognize `col IN (lit, ...)` and return the column with its literal set.
fn literal_domain(expr: &Expr) -> Option<(String, Vec<Literal>)> {
    match expr {
        Expr::Nested(inner) => literal_domain(inner),
        Expr::InList {
            expr,
            list,
            negated: false,
        } => {
            let column = column_name(expr)?;
            let values = list.iter().map(literal).collect::<Option<Vec<_>>>()?;
            (!values.is_empty()).then_some((column, values))
        }
        _ => None,
    }
}

fn column_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.clone()),
        Expr::CompoundIdentifier(parts) => Some(parts.last()?.value.clone()),
        Expr::Nested(inner) => column_name(inner),
        Expr::Cast { expr, .. } => column_name(expr),
        _ => None,
    }
}

fn literal(expr: &Expr) -> Option<Literal> {
    match expr {
        Expr::Value(Value::SingleQuotedString(s)) => Some(Literal::Text(s.clone())),
        Expr::Value(Value::Boolean(b)) => Some(Literal::Boolean(*b)),
        Expr::Value(Value::Null) => Some(Literal::Null),
        Expr::Nested(inner) => literal(inner),
        Expr::Cast { expr, .. } => literal(expr),
        other => {
            let text = other.to_string();
            if let Ok(int) = text.parse::<i64>() {
                Some(Literal::Integer(int))
            } else {
                text.parse::<f64>().ok().map(Literal::Float)
            }
        }
    }
}
