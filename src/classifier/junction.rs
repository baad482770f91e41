use std::collections::BTreeSet;

use crate::parser::schema::{Table, TableId};

/// Distinct tables referenced by `table`'s foreign keys, in first-seen order.
pub fn distinct_targets(table: &Table) -> Vec<TableId> {
    let mut targets = Vec::new();
    for fk in &table.foreign_keys {
        let target = fk.referred_table_id(&table.id);
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets
}

/// True when the table has no identity beyond its foreign-key columns:
/// either no primary key, or one made only of foreign-key columns.
fn identity_is_foreign_keys(table: &Table) -> bool {
    let fk_columns: BTreeSet<&str> = table.foreign_key_columns().into_iter().collect();
    table
        .primary_key()
        .iter()
        .all(|column| fk_columns.contains(column))
}

/// Decide whether `table` is a pure many-to-many bridge.
///
/// Returns `(is_many_to_many, is_self_referencing)`. A bridge has exactly two
/// foreign keys (each possibly composite) and no identity of its own. The
/// self-referencing flag is set when both keys reference the same table, so
/// both relationship ends land on one class.
pub fn is_bridge_table(table: &Table) -> (bool, bool) {
    let [first, second] = table.foreign_keys.as_slice() else {
        return (false, false);
    };
    if !identity_is_foreign_keys(table) {
        return (false, false);
    }
    let same_target = first.referred_table_id(&table.id) == second.referred_table_id(&table.id);
    (true, same_target)
}

/// Bridge-shaped tables linking three or more distinct tables.
///
/// These are not collapsed into many-to-many pairs; each of their foreign
/// keys becomes an ordinary relationship.
pub fn is_ternary_association(table: &Table) -> bool {
    table.foreign_keys.len() >= 3
        && distinct_targets(table).len() >= 3
        && identity_is_foreign_keys(table)
}
