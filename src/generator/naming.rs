use std::collections::{BTreeSet, HashMap};

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::parser::names::{identifier_from_text, ReservedWords};
use crate::parser::schema::{Schema, TableId};

/// Naming style of generated relationship attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamingConvention {
    /// `order_items`, `user_detail`.
    #[default]
    SnakeCase,
    /// `orderItems`, `userDetail`.
    CamelCase,
}

impl NamingConvention {
    /// Ordered disambiguation suffixes; the last one is the catch-all.
    pub fn suffixes(self, prefer_singular: bool) -> &'static [&'static str] {
        match (self, prefer_singular) {
            (NamingConvention::SnakeCase, true) => &["_detail", "_instance", "_data"],
            (NamingConvention::SnakeCase, false) => &["_set", "_list", "_data"],
            (NamingConvention::CamelCase, true) => &["Detail", "Instance", "Data"],
            (NamingConvention::CamelCase, false) => &["Set", "List", "Data"],
        }
    }

    /// Turn raw text into an attribute base name in this convention.
    pub fn attribute_base(self, raw: &str, reserved: &ReservedWords) -> String {
        let identifier = identifier_from_text(raw, reserved);
        match self {
            NamingConvention::SnakeCase => identifier,
            NamingConvention::CamelCase => {
                identifier_from_text(&identifier.to_case(Case::Camel), reserved)
            }
        }
    }
}

/// Names already in use on each table: its columns plus claimed attributes.
#[derive(Debug, Clone, Default)]
pub struct AttributeNamespace {
    taken: HashMap<TableId, BTreeSet<String>>,
}

impl AttributeNamespace {
    /// Seed the namespace with every table's column names.
    pub fn new(schema: &Schema) -> Self {
        let taken = schema
            .tables
            .iter()
            .map(|table| {
                let columns: BTreeSet<String> =
                    table.columns.iter().map(|c| c.name.clone()).collect();
                (table.id.clone(), columns)
            })
            .collect();
        Self { taken }
    }

    /// True when `name` is a column or a claimed attribute of `table`.
    pub fn is_taken(&self, table: &TableId, name: &str) -> bool {
        self.taken
            .get(table)
            .is_some_and(|names| names.contains(name))
    }

    /// Record `name` as used on `table`.
    pub fn claim(&mut self, table: &TableId, name: impl Into<String>) {
        self.taken
            .entry(table.clone())
            .or_default()
            .insert(name.into());
    }

    /// Pick a free attribute name on `owning_table`.
    ///
    /// `base_name` is used as-is when free; otherwise each suffix of the
    /// convention's list is appended in order and the first free candidate
    /// wins.
    pub fn find_unique_attribute_name(
        &self,
        base_name: &str,
        owning_table: &TableId,
        target_table: &TableId,
        prefer_singular: bool,
        convention: NamingConvention,
    ) -> Result<String, GenerationError> {
        self.find_with_suffixes(
            base_name,
            owning_table,
            target_table,
            convention.suffixes(prefer_singular),
        )
    }

    /// [`Self::find_unique_attribute_name`] with an explicit suffix list.
    pub fn find_with_suffixes(
        &self,
        base_name: &str,
        owning_table: &TableId,
        target_table: &TableId,
        suffixes: &[&str],
    ) -> Result<String, GenerationError> {
        std::iter::once(base_name.to_string())
            .chain(suffixes.iter().map(|suffix| format!("{base_name}{suffix}")))
            .find(|candidate| !self.is_taken(owning_table, candidate))
            .ok_or_else(|| GenerationError::NamingExhaustion {
                owning_table: owning_table.name.clone(),
                target_table: target_table.name.clone(),
            })
    }
}
