use std::collections::BTreeMap;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::parser::names::{convert_to_identifier, identifier_from_text, ReservedWords};
use crate::parser::schema::{Literal, Schema};

/// Source of fallback identifiers for literals that cannot name a member.
///
/// Implementations must eventually produce a name not yet used, or
/// [`find_enum_member_name`] will not terminate.
pub trait IdentifierGenerator {
    /// Produce the next candidate identifier text.
    fn next_identifier(&mut self) -> String;
}

/// Random lowercase identifiers drawn from an [`Rng`].
#[derive(Debug, Clone)]
pub struct RandomIdentifiers<R> {
    rng: R,
    length: usize,
}

impl<R: Rng> RandomIdentifiers<R> {
    /// Wrap an RNG, producing names of `length` letters.
    pub fn new(rng: R, length: usize) -> Self {
        Self { rng, length }
    }
}

impl RandomIdentifiers<StdRng> {
    /// OS-seeded generator.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy(), 8)
    }

    /// Deterministic generator for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), 8)
    }
}

impl<R: Rng> IdentifierGenerator for RandomIdentifiers<R> {
    fn next_identifier(&mut self) -> String {
        (0..self.length)
            .map(|_| char::from(self.rng.gen_range(b'a'..=b'z')))
            .collect()
    }
}

/// One enum member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumMember {
    /// Generated member name.
    pub name: String,
    /// Literal the member stands for.
    pub value: Literal,
}

/// Member name ↔ literal mapping, kept in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumMembers {
    by_name: BTreeMap<String, usize>,
    entries: Vec<EnumMember>,
}

impl EnumMembers {
    /// True when `name` already names a member.
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// True when `value` already has a member.
    pub fn contains_value(&self, value: &Literal) -> bool {
        self.entries.iter().any(|member| &member.value == value)
    }

    /// Member name for a literal, if it has one.
    pub fn name_of(&self, value: &Literal) -> Option<&str> {
        self.entries
            .iter()
            .find(|member| &member.value == value)
            .map(|member| member.name.as_str())
    }

    /// Literal behind a member name.
    pub fn value_of(&self, name: &str) -> Option<&Literal> {
        self.by_name.get(name).map(|&idx| &self.entries[idx].value)
    }

    /// Add a member; refused when either side is already mapped.
    pub fn insert(&mut self, name: String, value: Literal) -> bool {
        if self.contains_name(&name) || self.contains_value(&value) {
            return false;
        }
        self.by_name.insert(name.clone(), self.entries.len());
        self.entries.push(EnumMember { name, value });
        true
    }

    /// Members in source order.
    pub fn iter(&self) -> impl Iterator<Item = &EnumMember> {
        self.entries.iter()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no members.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An enumerated type synthesized from a fixed-value column domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDescriptor {
    /// Type name.
    pub name: String,
    /// Members in literal order.
    #[serde(serialize_with = "serialize_members")]
    pub members: EnumMembers,
    /// `table.column` locations using this type.
    pub columns: Vec<String>,
}

fn serialize_members<S: serde::Serializer>(
    members: &EnumMembers,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(members.iter())
}

/// Derive a member name for `value` that is not yet used in `existing`.
///
/// Text literals are normalized; anything that cannot be normalized, or whose
/// normalized name is already taken, gets a generated name instead.
pub fn find_enum_member_name(
    value: &Literal,
    existing: &EnumMembers,
    reserved: &ReservedWords,
    generator: &mut dyn IdentifierGenerator,
) -> String {
    if let Ok(name) = convert_to_identifier(value, reserved) {
        if !existing.contains_name(&name) {
            return name;
        }
    }
    loop {
        let candidate = identifier_from_text(&generator.next_identifier(), reserved);
        if !existing.contains_name(&candidate) {
            return candidate;
        }
    }
}

fn build_members(
    values: &[Literal],
    reserved: &ReservedWords,
    generator: &mut dyn IdentifierGenerator,
) -> EnumMembers {
    let mut members = EnumMembers::default();
    for value in values {
        if members.contains_value(value) {
            continue;
        }
        let name = find_enum_member_name(value, &members, reserved, generator);
        members.insert(name, value.clone());
    }
    members
}

fn dedup_literals(values: &[Literal]) -> Vec<Literal> {
    let mut unique: Vec<Literal> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(value) {
            unique.push(value.clone());
        }
    }
    unique
}

/// Emit one enum descriptor per distinct fixed-value domain in `schema`.
///
/// Columns sharing a type name and literal set share one descriptor; a name
/// reused for a different literal set gets a numeric suffix.
pub fn synthesize_enums(
    schema: &Schema,
    reserved: &ReservedWords,
    generator: &mut dyn IdentifierGenerator,
) -> Vec<EnumDescriptor> {
    let mut enums: Vec<EnumDescriptor> = Vec::new();
    // Un-suffixed type name each descriptor was derived from.
    let mut bases: Vec<String> = Vec::new();

    for table in &schema.tables {
        for column in &table.columns {
            let Some(values) = column.enum_values.as_deref() else {
                continue;
            };
            let values = dedup_literals(values);
            if values.is_empty() {
                continue;
            }
            let location = format!("{}.{}", table.id, column.name);
            let raw_name = column
                .enum_name
                .clone()
                .unwrap_or_else(|| format!("{}_{}", table.name(), column.name));
            let base = identifier_from_text(&raw_name, reserved);

            let shared = enums.iter_mut().zip(&bases).find(|(candidate, origin)| {
                **origin == base && candidate.members.iter().map(|m| &m.value).eq(values.iter())
            });
            if let Some((shared, _)) = shared {
                shared.columns.push(location);
                continue;
            }

            let mut name = base.clone();
            let mut idx = 2usize;
            while enums.iter().any(|candidate| candidate.name == name) {
                name = format!("{base}_{idx}");
                idx += 1;
            }

            let members = build_members(&values, reserved, generator);
            debug!("Enum {name} with {} members for {location}", members.len());
            enums.push(EnumDescriptor {
                name,
                members,
                columns: vec![location],
            });
            bases.push(base);
        }
    }

    enums
}
