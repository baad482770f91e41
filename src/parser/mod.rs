/// Identifier normalization, reserved words, and naming inflection heuristics.
pub mod names;
/// Normalized table / column / foreign-key model handed over by reflection.
pub mod schema;
/// Loading schema snapshots from JSON and SQL files.
pub mod snapshot;
/// SQL DDL parsing into the normalized schema model.
pub mod sql_parser;
