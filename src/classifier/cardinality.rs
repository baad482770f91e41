use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::parser::schema::{ForeignKey, Table};

/// Cardinality of one relationship end, seen from the table that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    /// One row on each side.
    OneToOne,
    /// One row here, many rows on the target.
    OneToMany,
    /// Many rows here per target row.
    ManyToOne,
    /// Many on both sides, through a bridge table.
    ManyToMany,
}

impl RelationType {
    /// The cardinality seen from the opposite end.
    pub fn inverse(self) -> Self {
        match self {
            RelationType::OneToMany => RelationType::ManyToOne,
            RelationType::ManyToOne => RelationType::OneToMany,
            other => other,
        }
    }

    /// True when this end holds at most one related row.
    pub fn is_to_one(self) -> bool {
        matches!(self, RelationType::OneToOne | RelationType::ManyToOne)
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::OneToOne => write!(f, "one-to-one"),
            RelationType::OneToMany => write!(f, "one-to-many"),
            RelationType::ManyToOne => write!(f, "many-to-one"),
            RelationType::ManyToMany => write!(f, "many-to-many"),
        }
    }
}

/// True when `columns` is exactly the primary key or exactly one unique constraint.
pub fn is_unique_column_set(table: &Table, columns: &[String]) -> bool {
    let wanted: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
    if wanted.is_empty() {
        return false;
    }

    let primary_key: BTreeSet<&str> = table.primary_key().into_iter().collect();
    if primary_key == wanted {
        return true;
    }

    if let [single] = columns {
        if table.column(single).is_some_and(|c| c.unique) {
            return true;
        }
    }

    table.unique_constraints.iter().any(|constraint| {
        constraint.iter().map(String::as_str).collect::<BTreeSet<_>>() == wanted
    })
}

/// Classify a foreign key from the owning table's point of view.
///
/// A key whose full column set is unique on `table` is one-to-one; anything
/// else is many-to-one. The referenced side is always [`RelationType::inverse`].
pub fn classify_fk(table: &Table, fk: &ForeignKey) -> RelationType {
    if is_unique_column_set(table, &fk.constrained_columns) {
        RelationType::OneToOne
    } else {
        RelationType::ManyToOne
    }
}
