use std::collections::BTreeSet;

use convert_case::{Case, Casing};

use crate::error::GenerationError;
use crate::parser::schema::Literal;

/// Keywords of the emitted model language; never usable as bare names.
const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Symbols the emitted model module imports.
const IMPORTED: &[&str] = &[
    "Enum",
    "Field",
    "List",
    "Optional",
    "Relationship",
    "SQLModel",
];

/// Names a generated identifier must not shadow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedWords {
    /// Language keywords.
    pub keywords: BTreeSet<String>,
    /// Symbols already imported into the generated module.
    pub imported: BTreeSet<String>,
}

impl ReservedWords {
    /// Build a reserved set from explicit keyword and import lists.
    pub fn new<'a>(
        keywords: impl IntoIterator<Item = &'a str>,
        imported: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            keywords: keywords.into_iter().map(ToString::to_string).collect(),
            imported: imported.into_iter().map(ToString::to_string).collect(),
        }
    }

    /// Keywords only, with no import conflicts checked.
    pub fn keywords_only() -> Self {
        Self::new(KEYWORDS.iter().copied(), [])
    }

    /// True when `name` is a keyword or an imported symbol.
    pub fn contains(&self, name: &str) -> bool {
        self.keywords.contains(name) || self.imported.contains(name)
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self::new(KEYWORDS.iter().copied(), IMPORTED.iter().copied())
    }
}

/// Return the identifier without surrounding double quotes.
pub fn unquote_identifier(ident: &str) -> &str {
    ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(ident)
}

/// Split a potentially schema-qualified name into `(schema, relation)`.
///
/// Handles dots inside quoted identifiers, e.g. `"my.schema"."table.name"`.
/// Unqualified names come back with no schema.
pub fn split_schema_and_relation(name: &str) -> (Option<String>, String) {
    let mut in_quotes = false;
    let mut start = 0usize;
    let mut parts: Vec<&str> = Vec::new();

    for (idx, ch) in name.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => {
                parts.push(name[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(name[start..].trim());

    let relation = unquote_identifier(parts[parts.len() - 1]).to_string();
    if parts.len() < 2 {
        return (None, relation);
    }
    let schema = unquote_identifier(parts[parts.len() - 2]).to_string();
    (Some(schema), relation)
}

/// Normalize text into a valid identifier.
///
/// Rules:
/// - every run of non-alphanumeric characters (underscores included)
///   collapses to a single `_`
/// - empty results and names starting with any numeric character get a
///   leading `_`
/// - names in `reserved` get trailing `_` until they no longer clash
pub fn identifier_from_text(raw: &str, reserved: &ReservedWords) -> String {
    let mut normalized = String::with_capacity(raw.len() + 1);
    let mut previous_was_underscore = false;

    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            normalized.push(ch);
            previous_was_underscore = false;
        } else if !previous_was_underscore {
            normalized.push('_');
            previous_was_underscore = true;
        }
    }

    if normalized.is_empty() {
        normalized.push('_');
    } else if normalized.starts_with(char::is_numeric) {
        normalized.insert(0, '_');
    }

    while reserved.contains(&normalized) {
        normalized.push('_');
    }
    normalized
}

/// Normalize a literal value into a valid identifier.
///
/// Only text literals can name a symbol; anything else is rejected with its
/// type name.
pub fn convert_to_identifier(
    raw: &Literal,
    reserved: &ReservedWords,
) -> Result<String, GenerationError> {
    match raw {
        Literal::Text(text) => Ok(identifier_from_text(text, reserved)),
        other => Err(GenerationError::InvalidIdentifierSource {
            type_name: other.type_name().to_string(),
        }),
    }
}

/// Drop a trailing `_id` / `Id` from a column name.
///
/// Returns `None` when there is no such suffix or nothing would remain.
pub fn strip_id_suffix(column: &str) -> Option<&str> {
    let snake_suffix = column
        .len()
        .checked_sub(3)
        .and_then(|start| column.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case("_id"));
    let stem = if snake_suffix {
        &column[..column.len() - 3]
    } else if column.ends_with("Id") {
        &column[..column.len() - 2]
    } else {
        return None;
    };
    let stem = stem.trim_end_matches('_');
    (!stem.is_empty()).then_some(stem)
}

/// Best-effort English singular of a (usually table) name.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if lower.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Best-effort English plural; words that already look plural are kept.
pub fn pluralize(word: &str) -> String {
    if singularize(word) != word {
        return word.to_string();
    }
    let lower = word.to_ascii_lowercase();
    let consonant_y = lower.ends_with('y')
        && !lower
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|ch| "aeiou".contains(ch));
    if consonant_y && lower.len() > 1 {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Class name for a table: normalized, then PascalCase.
pub fn class_name(table_name: &str) -> String {
    let normalized = identifier_from_text(table_name, &ReservedWords::new([], []));
    let pascal = normalized.to_case(Case::Pascal);
    if pascal.is_empty() || pascal.starts_with(char::is_numeric) {
        return format!("_{pascal}");
    }
    pascal
}
