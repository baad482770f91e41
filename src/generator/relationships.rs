use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::{debug, info, warn};
use serde::{Serialize, Serializer};

use crate::classifier::cardinality::{classify_fk, RelationType};
use crate::classifier::junction::{is_bridge_table, is_ternary_association};
use crate::error::GenerationError;
use crate::generator::naming::AttributeNamespace;
use crate::generator::GeneratorOptions;
use crate::parser::names::{class_name, pluralize, singularize, strip_id_suffix};
use crate::parser::schema::{ForeignKey, Schema, Table, TableId};

/// A `Class.column` reference used in join hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Generated class owning the column.
    pub class_name: String,
    /// Column name.
    pub column: String,
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class_name, self.column)
    }
}

impl Serialize for ColumnRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One end of a relationship, attached to the class that owns the attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipDescriptor {
    /// Attribute name, unique on the owning class.
    pub attribute_name: String,
    /// Table on the far side.
    pub target_table: TableId,
    /// Class generated for `target_table`.
    pub target_class: String,
    /// Attribute on the target class pointing back here.
    pub back_populates: String,
    /// Cardinality from the owning class's perspective.
    pub relation_type: RelationType,
    /// Whether the attribute may be empty.
    pub nullable: bool,
    /// Bridge class for many-to-many ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_table: Option<String>,
    /// Explicit join columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_keys: Option<Vec<ColumnRef>>,
    /// Far-side columns of a self-referencing relationship.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_side: Option<Vec<ColumnRef>>,
    /// Join from the owning class into the bridge (self-referencing many-to-many).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primaryjoin: Option<String>,
    /// Join from the bridge to the far class (self-referencing many-to-many).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondaryjoin: Option<String>,
}

impl RelationshipDescriptor {
    fn new(
        attribute_name: &str,
        target: &Table,
        back_populates: &str,
        relation_type: RelationType,
        nullable: bool,
    ) -> Self {
        Self {
            attribute_name: attribute_name.to_string(),
            target_table: target.id.clone(),
            target_class: class_name(target.name()),
            back_populates: back_populates.to_string(),
            relation_type,
            nullable,
            secondary_table: None,
            foreign_keys: None,
            remote_side: None,
            primaryjoin: None,
            secondaryjoin: None,
        }
    }
}

/// Relationship ends per table, in discovery order.
///
/// Every descriptor has a twin on its target table whose `back_populates`
/// names it and vice versa.
#[derive(Debug, Clone, Default)]
pub struct RelationshipRegistry {
    relationships: BTreeMap<TableId, Vec<RelationshipDescriptor>>,
    ternary_tables: Vec<TableId>,
}

impl RelationshipRegistry {
    /// Descriptors attached to `table` (empty when it has none).
    pub fn get(&self, table: &TableId) -> &[RelationshipDescriptor] {
        self.relationships
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over tables that own at least one descriptor.
    pub fn iter(&self) -> impl Iterator<Item = (&TableId, &[RelationshipDescriptor])> {
        self.relationships
            .iter()
            .map(|(table, descriptors)| (table, descriptors.as_slice()))
    }

    /// Total number of relationship ends.
    pub fn len(&self) -> usize {
        self.relationships.values().map(Vec::len).sum()
    }

    /// True when no relationship was inferred.
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Bridge-shaped tables over three or more targets, resolved as plain
    /// foreign keys instead of a many-to-many collapse.
    pub fn ternary_tables(&self) -> &[TableId] {
        &self.ternary_tables
    }

    fn push(&mut self, table: &TableId, descriptor: RelationshipDescriptor) {
        debug!(
            "{table}.{} -> {} ({}, back_populates={})",
            descriptor.attribute_name,
            descriptor.target_class,
            descriptor.relation_type,
            descriptor.back_populates
        );
        self.relationships
            .entry(table.clone())
            .or_default()
            .push(descriptor);
    }

    /// Check name uniqueness per table and back-reference symmetry.
    pub fn validate_symmetry(&self) -> Result<(), GenerationError> {
        for (table, descriptors) in &self.relationships {
            let mut seen = BTreeSet::new();
            for descriptor in descriptors {
                let broken = || GenerationError::AsymmetricRelationship {
                    table: table.to_string(),
                    attribute: descriptor.attribute_name.clone(),
                };
                if !seen.insert(descriptor.attribute_name.as_str()) {
                    return Err(broken());
                }
                let has_twin = self.get(&descriptor.target_table).iter().any(|twin| {
                    twin.attribute_name == descriptor.back_populates
                        && twin.back_populates == descriptor.attribute_name
                        && &twin.target_table == table
                });
                if !has_twin {
                    return Err(broken());
                }
            }
        }
        Ok(())
    }
}

/// Build the relationship registry for every table of `schema`.
///
/// Tables are visited in caller order. Any failure aborts the whole run.
pub fn build_relationships(
    schema: &Schema,
    options: &GeneratorOptions,
) -> Result<RelationshipRegistry, GenerationError> {
    let mut builder = RelationshipBuilder {
        schema,
        options,
        namespace: AttributeNamespace::new(schema),
        registry: RelationshipRegistry::default(),
    };

    for table in &schema.tables {
        builder.visit(table)?;
    }

    let registry = builder.registry;
    registry.validate_symmetry()?;
    info!(
        "Resolved {} relationship ends across {} tables",
        registry.len(),
        registry.relationships.len()
    );
    Ok(registry)
}

struct RelationshipBuilder<'a> {
    schema: &'a Schema,
    options: &'a GeneratorOptions,
    namespace: AttributeNamespace,
    registry: RelationshipRegistry,
}

impl<'a> RelationshipBuilder<'a> {
    fn visit(&mut self, table: &'a Table) -> Result<(), GenerationError> {
        for fk in &table.foreign_keys {
            validate_foreign_key(table, fk)?;
        }

        match is_bridge_table(table) {
            (true, false) => self.add_many_to_many(table),
            (true, true) => self.add_self_many_to_many(table),
            _ => {
                if is_ternary_association(table) {
                    warn!(
                        "{} links three or more tables; resolving its foreign keys individually",
                        table.id
                    );
                    self.registry.ternary_tables.push(table.id.clone());
                }
                check_parallel_keys(table)?;
                for fk in &table.foreign_keys {
                    self.add_direct(table, fk)?;
                }
                Ok(())
            }
        }
    }

    fn target_of(&self, table: &Table, fk: &ForeignKey) -> Result<&'a Table, GenerationError> {
        let target_id = fk.referred_table_id(&table.id);
        self.schema
            .table(&target_id)
            .ok_or_else(|| GenerationError::UnresolvedReference {
                table: table.id.to_string(),
                target: target_id.to_string(),
            })
    }

    /// Resolve and reserve an attribute name on `owning`.
    fn claim_name(
        &mut self,
        raw_base: &str,
        owning: &TableId,
        target: &TableId,
        prefer_singular: bool,
    ) -> Result<String, GenerationError> {
        let convention = self.options.convention;
        let base = convention.attribute_base(raw_base, &self.options.reserved);
        let name = self.namespace.find_unique_attribute_name(
            &base,
            owning,
            target,
            prefer_singular,
            convention,
        )?;
        self.namespace.claim(owning, name.clone());
        Ok(name)
    }

    fn add_direct(&mut self, table: &Table, fk: &ForeignKey) -> Result<(), GenerationError> {
        let target = self.target_of(table, fk)?;
        let owning_type = classify_fk(table, fk);
        let inverse_type = owning_type.inverse();
        let self_referencing = target.id == table.id;

        let owning_base = match fk.constrained_columns.as_slice() {
            [single] => strip_id_suffix(single).map(ToString::to_string),
            _ => None,
        }
        .unwrap_or_else(|| singularize(target.name()));
        let owning_name = self.claim_name(&owning_base, &table.id, &target.id, true)?;

        let inverse_raw = if inverse_type.is_to_one() {
            singularize(table.name())
        } else {
            table.name().to_string()
        };
        let inverse_base = if self_referencing {
            format!("sub_{inverse_raw}")
        } else {
            inverse_raw
        };
        let inverse_name = self.claim_name(
            &inverse_base,
            &target.id,
            &table.id,
            inverse_type.is_to_one(),
        )?;

        let owning_class = class_name(table.name());
        let join_columns: Vec<ColumnRef> = fk
            .constrained_columns
            .iter()
            .map(|column| ColumnRef {
                class_name: owning_class.clone(),
                column: column.clone(),
            })
            .collect();
        let owning_nullable = fk
            .constrained_columns
            .iter()
            .any(|column| table.column(column).is_some_and(|c| c.nullable));

        let mut owning_end = RelationshipDescriptor::new(
            &owning_name,
            target,
            &inverse_name,
            owning_type,
            owning_nullable,
        );
        owning_end.foreign_keys = Some(join_columns.clone());
        if self_referencing {
            let target_class = class_name(target.name());
            owning_end.remote_side = Some(
                fk.referred_columns
                    .iter()
                    .map(|column| ColumnRef {
                        class_name: target_class.clone(),
                        column: column.clone(),
                    })
                    .collect(),
            );
        }

        let mut inverse_end = RelationshipDescriptor::new(
            &inverse_name,
            table,
            &owning_name,
            inverse_type,
            inverse_type == RelationType::OneToOne,
        );
        inverse_end.foreign_keys = Some(join_columns);

        self.registry.push(&table.id, owning_end);
        self.registry.push(&target.id, inverse_end);
        Ok(())
    }

    fn add_many_to_many(&mut self, bridge: &Table) -> Result<(), GenerationError> {
        let [first, second] = bridge.foreign_keys.as_slice() else {
            return Ok(());
        };
        let left = self.target_of(bridge, first)?;
        let right = self.target_of(bridge, second)?;

        let left_name = self.claim_name(&pluralize(right.name()), &left.id, &right.id, false)?;
        let right_name = self.claim_name(&pluralize(left.name()), &right.id, &left.id, false)?;
        let secondary = class_name(bridge.name());

        let mut left_end =
            RelationshipDescriptor::new(&left_name, right, &right_name, RelationType::ManyToMany, false);
        left_end.secondary_table = Some(secondary.clone());
        let mut right_end =
            RelationshipDescriptor::new(&right_name, left, &left_name, RelationType::ManyToMany, false);
        right_end.secondary_table = Some(secondary);

        self.registry.push(&left.id, left_end);
        self.registry.push(&right.id, right_end);
        Ok(())
    }

    fn add_self_many_to_many(&mut self, bridge: &Table) -> Result<(), GenerationError> {
        let [first, second] = bridge.foreign_keys.as_slice() else {
            return Ok(());
        };
        let target = self.target_of(bridge, first)?;

        let first_columns: BTreeSet<&String> = first.constrained_columns.iter().collect();
        let second_columns: BTreeSet<&String> = second.constrained_columns.iter().collect();
        if first_columns == second_columns {
            return Err(GenerationError::AmbiguousJoin {
                table: bridge.id.to_string(),
                target: target.id.to_string(),
                detail: "both foreign keys use the same columns".to_string(),
            });
        }

        // Each end joins locally through one key and is named after the other.
        let via_first_name =
            self.claim_name(&far_end_base(second), &target.id, &target.id, false)?;
        let via_second_name =
            self.claim_name(&far_end_base(first), &target.id, &target.id, false)?;

        let secondary = class_name(bridge.name());
        let first_join = join_condition(first, &secondary);
        let second_join = join_condition(second, &secondary);

        let mut via_first = RelationshipDescriptor::new(
            &via_first_name,
            target,
            &via_second_name,
            RelationType::ManyToMany,
            false,
        );
        via_first.secondary_table = Some(secondary.clone());
        via_first.primaryjoin = Some(first_join.clone());
        via_first.secondaryjoin = Some(second_join.clone());

        let mut via_second = RelationshipDescriptor::new(
            &via_second_name,
            target,
            &via_first_name,
            RelationType::ManyToMany,
            false,
        );
        via_second.secondary_table = Some(secondary);
        via_second.primaryjoin = Some(second_join);
        via_second.secondaryjoin = Some(first_join);

        self.registry.push(&target.id, via_first);
        self.registry.push(&target.id, via_second);
        Ok(())
    }
}

fn validate_foreign_key(table: &Table, fk: &ForeignKey) -> Result<(), GenerationError> {
    let ambiguous = |detail: String| GenerationError::AmbiguousJoin {
        table: table.id.to_string(),
        target: fk.referred_table_id(&table.id).to_string(),
        detail,
    };
    if fk.constrained_columns.is_empty() {
        return Err(ambiguous("foreign key has no columns".to_string()));
    }
    if fk.constrained_columns.len() != fk.referred_columns.len() {
        return Err(ambiguous(format!(
            "{} constrained columns but {} referenced columns",
            fk.constrained_columns.len(),
            fk.referred_columns.len()
        )));
    }
    if let Some(missing) = fk
        .constrained_columns
        .iter()
        .find(|column| table.column(column).is_none())
    {
        return Err(ambiguous(format!("column '{missing}' does not exist")));
    }
    Ok(())
}

/// Two keys to the same target over the same columns cannot be told apart.
fn check_parallel_keys(table: &Table) -> Result<(), GenerationError> {
    let mut seen: BTreeSet<(TableId, BTreeSet<&str>)> = BTreeSet::new();
    for fk in &table.foreign_keys {
        let target = fk.referred_table_id(&table.id);
        let columns = fk.constrained_columns.iter().map(String::as_str).collect();
        if !seen.insert((target.clone(), columns)) {
            return Err(GenerationError::AmbiguousJoin {
                table: table.id.to_string(),
                target: target.to_string(),
                detail: format!(
                    "duplicate foreign keys over ({})",
                    fk.constrained_columns.join(", ")
                ),
            });
        }
    }
    Ok(())
}

/// Base name for the end of a self-referencing bridge reached through `fk`.
fn far_end_base(fk: &ForeignKey) -> String {
    let stem = match fk.constrained_columns.as_slice() {
        [single] => strip_id_suffix(single).unwrap_or(single).to_string(),
        columns => columns.join("_"),
    };
    pluralize(&stem)
}

/// `ref_col == Bridge.c.fk_col`, wrapped in `and_(...)` for composite keys.
fn join_condition(fk: &ForeignKey, bridge_class: &str) -> String {
    let parts: Vec<String> = fk
        .referred_columns
        .iter()
        .zip(&fk.constrained_columns)
        .map(|(referred, local)| format!("{referred} == {bridge_class}.c.{local}"))
        .collect();
    match parts.as_slice() {
        [single] => single.clone(),
        _ => format!("and_({})", parts.join(", ")),
    }
}
