use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key of a table across the reflected database.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId {
    /// Schema the table lives in, when the reflection reported one.
    #[serde(default)]
    pub schema: Option<String>,
    /// Bare table name.
    pub name: String,
}

impl TableId {
    /// Build an identifier from an optional schema and a table name.
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.map(ToString::to_string),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A literal value from a column's fixed-value domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// `TRUE` / `FALSE`.
    Boolean(bool),
    /// Integral number.
    Integer(i64),
    /// Non-integral number.
    Float(f64),
    /// Quoted string.
    Text(String),
    /// SQL `NULL`.
    Null,
}

impl Literal {
    /// Name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Boolean(_) => "bool",
            Literal::Integer(_) => "int",
            Literal::Float(_) => "float",
            Literal::Text(_) => "str",
            Literal::Null => "null",
        }
    }

    /// The text payload, if this is a string literal.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Literal::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

/// A reflected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as declared.
    pub name: String,
    /// Declared SQL type, verbatim.
    #[serde(default)]
    pub data_type: String,
    /// Whether the column accepts `NULL`.
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Part of the table's primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Carries a single-column unique constraint.
    #[serde(default)]
    pub unique: bool,
    /// Fixed literal domain (enum type or `CHECK (col IN (...))`).
    #[serde(default)]
    pub enum_values: Option<Vec<Literal>>,
    /// Name of the enum type backing the column, when the database has one.
    #[serde(default)]
    pub enum_name: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Column {
    /// A nullable, unconstrained column of the given type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            primary_key: false,
            unique: false,
            enum_values: None,
            enum_name: None,
        }
    }

    /// Mark the column as (part of) the primary key. Implies `NOT NULL`.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Mark the column `NOT NULL`.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark the column `UNIQUE`.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Restrict the column to a fixed literal domain.
    #[must_use]
    pub fn with_enum(mut self, name: Option<&str>, values: Vec<Literal>) -> Self {
        self.enum_name = name.map(ToString::to_string);
        self.enum_values = Some(values);
        self
    }
}

/// A reflected foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name, if any.
    #[serde(default)]
    pub name: Option<String>,
    /// Local columns, positionally matching `referred_columns`.
    pub constrained_columns: Vec<String>,
    /// Schema of the referenced table; `None` means the owning table's schema.
    #[serde(default)]
    pub referred_schema: Option<String>,
    /// Referenced table name.
    pub referred_table: String,
    /// Referenced columns.
    pub referred_columns: Vec<String>,
    /// `ON DELETE` action.
    #[serde(default)]
    pub on_delete: Option<String>,
    /// `ON UPDATE` action.
    #[serde(default)]
    pub on_update: Option<String>,
    /// Constraint comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl ForeignKey {
    /// A single- or multi-column key `columns -> table(referred)`.
    pub fn new(columns: &[&str], referred_table: &str, referred_columns: &[&str]) -> Self {
        Self {
            name: None,
            constrained_columns: columns.iter().map(ToString::to_string).collect(),
            referred_schema: None,
            referred_table: referred_table.to_string(),
            referred_columns: referred_columns.iter().map(ToString::to_string).collect(),
            on_delete: None,
            on_update: None,
            comment: None,
        }
    }

    /// Identifier of the referenced table, resolved against the owner's schema.
    pub fn referred_table_id(&self, owner: &TableId) -> TableId {
        TableId {
            schema: self
                .referred_schema
                .clone()
                .or_else(|| owner.schema.clone()),
            name: self.referred_table.clone(),
        }
    }
}

/// A reflected table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Schema-qualified identity.
    #[serde(flatten)]
    pub id: TableId,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Foreign keys in declaration order.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    /// Multi-column unique constraints (column name lists).
    #[serde(default)]
    pub unique_constraints: Vec<Vec<String>>,
    /// Table comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Table {
    /// An empty table.
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            unique_constraints: Vec::new(),
            comment: None,
        }
    }

    /// Bare table name.
    pub fn name(&self) -> &str {
        &self.id.name
    }

    /// Primary key column names in declaration order.
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Look up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Every column name that some foreign key constrains.
    pub fn foreign_key_columns(&self) -> Vec<&str> {
        self.foreign_keys
            .iter()
            .flat_map(|fk| fk.constrained_columns.iter().map(String::as_str))
            .collect()
    }
}

/// Normalized description of a reflected database, in caller order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Tables, pre-sorted by the caller.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Resolve a table by identifier.
    ///
    /// Falls back to a schema-less match so snapshots mixing qualified and
    /// unqualified references still resolve.
    pub fn table(&self, id: &TableId) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| &t.id == id)
            .or_else(|| {
                self.tables
                    .iter()
                    .find(|t| t.id.name == id.name && (t.id.schema.is_none() || id.schema.is_none()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referred_table_inherits_owner_schema() {
        let owner = TableId::new(Some("public"), "orders");
        let fk = ForeignKey::new(&["user_id"], "users", &["id"]);
        assert_eq!(
            fk.referred_table_id(&owner),
            TableId::new(Some("public"), "users")
        );
    }

    #[test]
    fn schema_lookup_tolerates_missing_schema() {
        let schema = Schema {
            tables: vec![Table::new(TableId::new(Some("public"), "users"))],
        };
        assert!(schema.table(&TableId::new(None, "users")).is_some());
        assert!(schema.table(&TableId::new(Some("other"), "users")).is_none());
    }

    #[test]
    fn literal_deserializes_untagged() {
        let values: Vec<Literal> = serde_json::from_str(r#"["a", 1, 1.5, true, null]"#)
            .expect("literals should parse");
        assert_eq!(
            values,
            vec![
                Literal::Text("a".to_string()),
                Literal::Integer(1),
                Literal::Float(1.5),
                Literal::Boolean(true),
                Literal::Null,
            ]
        );
        assert_eq!(values[1].type_name(), "int");
    }
}
