//! Relationship and enum inference over a normalized schema.
//!
//! [`generate`] is the single entry point: it resolves every relationship end
//! through [`relationships::build_relationships`] and synthesizes enum types
//! through [`enums::synthesize_enums`]. Rendering of the result lives in
//! [`emit`].

use log::info;

use crate::error::GenerationError;
use crate::parser::names::ReservedWords;
use crate::parser::schema::Schema;

/// Text rendering of enum classes, relationship attributes, and model stubs.
pub mod emit;
/// Enum type synthesis from fixed-value column domains.
pub mod enums;
/// Attribute naming conventions and per-table collision tracking.
pub mod naming;
/// Relationship graph construction with symmetric back-references.
pub mod relationships;

use enums::{EnumDescriptor, IdentifierGenerator};
use naming::NamingConvention;
use relationships::RelationshipRegistry;

/// Knobs shared by every generation stage.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Style of generated relationship attribute names.
    pub convention: NamingConvention,
    /// Names generated identifiers must avoid.
    pub reserved: ReservedWords,
}

/// Everything inferred for one schema.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// Relationship ends per table.
    pub registry: RelationshipRegistry,
    /// Synthesized enum types, in discovery order.
    pub enums: Vec<EnumDescriptor>,
}

/// Run relationship resolution and enum synthesis over `schema`.
///
/// Fails without partial output if any relationship cannot be resolved.
pub fn generate(
    schema: &Schema,
    options: &GeneratorOptions,
    identifiers: &mut dyn IdentifierGenerator,
) -> Result<GenerationOutput, GenerationError> {
    let registry = relationships::build_relationships(schema, options)?;
    let enums = enums::synthesize_enums(schema, &options.reserved, identifiers);
    info!(
        "Generated {} relationship ends and {} enum types for {} tables",
        registry.len(),
        enums.len(),
        schema.tables.len()
    );
    Ok(GenerationOutput { registry, enums })
}
