use thiserror::Error;

/// Failure modes of a generation run.
///
/// Every variant is a deterministic function of the input schema: a run either
/// succeeds completely or aborts with one of these before any registry is
/// handed back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Every candidate attribute name collided on the owning table.
    #[error("No suitable relationship attribute name found for {target_table} in Table: {owning_table}")]
    NamingExhaustion {
        /// Table that would own the attribute.
        owning_table: String,
        /// Table the relationship points at.
        target_table: String,
    },

    /// A non-text value was handed to identifier normalization.
    #[error("Cannot convert value of type '{type_name}' to an identifier")]
    InvalidIdentifierSource {
        /// Type name of the offending value.
        type_name: String,
    },

    /// Join hints for a relationship could not be derived.
    #[error("Ambiguous join from {table} to {target}: {detail}")]
    AmbiguousJoin {
        /// Table owning the foreign key(s).
        table: String,
        /// Referenced table.
        target: String,
        /// What made the join ambiguous.
        detail: String,
    },

    /// A foreign key references a table that is not part of the snapshot.
    #[error("Foreign key on {table} references unknown table {target}")]
    UnresolvedReference {
        /// Table owning the foreign key.
        table: String,
        /// Missing referenced table.
        target: String,
    },

    /// A relationship end has no matching twin on its target table.
    #[error("Relationship attribute '{attribute}' on {table} has no matching back-reference")]
    AsymmetricRelationship {
        /// Table owning the broken descriptor.
        table: String,
        /// Attribute name of the broken descriptor.
        attribute: String,
    },

    /// Schema input could not be parsed.
    #[error("Schema parse error: {0}")]
    SchemaParse(String),

    /// Reading input or writing artifacts failed.
    #[error("{0}")]
    Io(String),
}
